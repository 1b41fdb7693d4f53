//! 操作日志
//!
//! 每个数据集按应用顺序记录已执行的约化步骤，用于复现审计。
//! 同一步骤只记录一次，重复执行仍会重新计算但不会重复追加。

use serde::{Serialize, Serializer};
use std::fmt;

/// 约化步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ChannelSum,
    DeadtimeScaled,
    Normalized,
    Corrected,
    IntegratedPeaks,
    ScaledToReference,
}

impl Operation {
    /// 人类可读的步骤名称（写入导出文件）
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChannelSum => "Channel Sum",
            Self::DeadtimeScaled => "Deadtime Scaled",
            Self::Normalized => "Normalized",
            Self::Corrected => "Corrected",
            Self::IntegratedPeaks => "Integrated Peaks",
            Self::ScaledToReference => "Scaled to Reference",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// 有序、去重的操作日志
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OperationLog {
    entries: Vec<Operation>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加步骤；已存在时不追加并返回false
    pub fn record(&mut self, operation: Operation) -> bool {
        if self.entries.contains(&operation) {
            return false;
        }
        self.entries.push(operation);
        true
    }

    #[inline]
    pub fn contains(&self, operation: Operation) -> bool {
        self.entries.contains(&operation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 步骤名称列表
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(Operation::label).collect()
    }
}
