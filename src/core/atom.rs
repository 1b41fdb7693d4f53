//! 核素常量查找表
//!
//! 热中子吸收截面（barn）与天然丰度。每次约化只激活样品和参考各一个条目，
//! 通过 [`AtomTable`] 注入而不是写死在计算里。

use crate::error::{NdpError, NdpResult};
use crate::tools::constants::reference_standard;
use serde::Serialize;
use std::collections::BTreeMap;

/// 单个核素的常量
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Atom {
    /// 中子吸收截面 (barn)
    pub cross_section: f64,

    /// 天然丰度
    pub abundance: f64,
}

/// 以核素标识为键的查找表
#[derive(Debug, Clone, PartialEq)]
pub struct AtomTable {
    entries: BTreeMap<String, Atom>,
}

impl Default for AtomTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("He", 5322.73, 0.00000134);
        table.insert("Li", 939.09, 0.0759);
        table.insert("B", 3600.48, 0.196);
        table.insert("N", 1.86, 0.99636);
        table
    }
}

impl AtomTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// 添加或覆盖一个条目
    pub fn insert(&mut self, id: &str, cross_section: f64, abundance: f64) {
        self.entries.insert(
            id.to_string(),
            Atom {
                cross_section,
                abundance,
            },
        );
    }

    /// 按标识查找（未知核素属于配置错误）
    pub fn get(&self, id: &str) -> NdpResult<Atom> {
        self.entries.get(id).copied().ok_or_else(|| {
            NdpError::Configuration(format!(
                "未知核素 '{id}'，可用: {}",
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// 带不确定度的标量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Measured {
    pub value: f64,
    pub uncertainty: f64,
}

impl Measured {
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Self { value, uncertainty }
    }
}

/// 参考定标所需的每样品常量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleInputs {
    /// 样品核素标识
    pub sample_nuclide: String,

    /// 参考样品核素标识
    pub reference_nuclide: String,

    /// 反应分支比
    pub branch_fraction: f64,

    /// 参考样品面浓度 (atoms/cm²) 及不确定度
    pub reference_concentration: Measured,
}

impl Default for ScaleInputs {
    fn default() -> Self {
        Self {
            sample_nuclide: reference_standard::NUCLIDE.to_string(),
            reference_nuclide: reference_standard::NUCLIDE.to_string(),
            branch_fraction: reference_standard::BRANCH_FRACTION,
            reference_concentration: Measured::new(
                reference_standard::CONCENTRATION,
                reference_standard::CONCENTRATION_UNCERT,
            ),
        }
    }
}
