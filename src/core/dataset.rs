//! 数据集与阶段产物
//!
//! 六种逻辑数据集（样品/本底/参考 × 数据/监测器），每个保存汇总后的原始计数
//! 以及各约化阶段提交的强类型结果。每个逐通道序列都与其不确定度序列等长对齐。

use crate::core::atom::Measured;
use crate::core::operations::{Operation, OperationLog};
use crate::error::{NdpResult, stage_not_ready};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// 数据集角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DatasetRole {
    SampleData,
    SampleMonitor,
    BackgroundData,
    BackgroundMonitor,
    ReferenceData,
    ReferenceMonitor,
}

impl DatasetRole {
    /// 全部角色（固定顺序）
    pub const ALL: [DatasetRole; 6] = [
        Self::SampleData,
        Self::SampleMonitor,
        Self::BackgroundData,
        Self::BackgroundMonitor,
        Self::ReferenceData,
        Self::ReferenceMonitor,
    ];

    /// 需要监测器归一化的数据角色
    pub const DATA: [DatasetRole; 3] = [Self::SampleData, Self::BackgroundData, Self::ReferenceData];

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 简称（与schema和导出文件一致）
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::SampleData => "Sam Dat",
            Self::SampleMonitor => "Sam Mon",
            Self::BackgroundData => "Bgd Dat",
            Self::BackgroundMonitor => "Bgd Mon",
            Self::ReferenceData => "Ref Dat",
            Self::ReferenceMonitor => "Ref Mon",
        }
    }

    /// 导出文件中的描述名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SampleData => "Sample Data",
            Self::SampleMonitor => "Sample Monitor",
            Self::BackgroundData => "Background Data",
            Self::BackgroundMonitor => "Background Monitor",
            Self::ReferenceData => "Reference Data",
            Self::ReferenceMonitor => "Reference Monitor",
        }
    }

    /// 数据角色对应的监测器；监测器本身返回None
    pub fn monitor(&self) -> Option<DatasetRole> {
        match self {
            Self::SampleData => Some(Self::SampleMonitor),
            Self::BackgroundData => Some(Self::BackgroundMonitor),
            Self::ReferenceData => Some(Self::ReferenceMonitor),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// 逐通道数值及其不确定度
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    pub values: Vec<f64>,
    pub uncertainty: Vec<f64>,
}

impl Series {
    pub fn new(values: Vec<f64>, uncertainty: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), uncertainty.len());
        Self {
            values,
            uncertainty,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 一个数据集的汇总原始测量
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Measurement {
    /// 来源文件（按加载顺序）
    pub files: Vec<String>,

    /// 每个文件的探测器名称（不去重）
    pub detectors: Vec<String>,

    /// 每个文件的标签（不去重）
    pub labels: Vec<String>,

    /// 累计活时间 (s)
    pub live_time: f64,

    /// 累计真实时间 (s)
    pub real_time: f64,

    /// 采集时间（仅取第一个文件）
    pub datetime: Option<NaiveDateTime>,

    /// 逐通道累计计数
    pub counts: Vec<f64>,
}

/// 死时间校正结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadTimeCorrected {
    /// 活时间/真实时间
    pub ratio: f64,

    /// Counts/Dt 及不确定度
    pub counts: Series,
}

/// 监测器归一化结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    /// alpha窗口内的监测器计数和
    pub monitor: Measured,

    /// 归一化计数及不确定度
    pub counts: Series,
}

/// 参考样品两个alpha峰的积分
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePeaks {
    /// 次同位素峰
    pub alpha_star: Measured,

    /// 主峰
    pub alpha: Measured,
}

/// 面浓度与体浓度
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concentration {
    /// atoms/cm²
    pub areal: Series,

    /// atoms/cm³
    pub volumetric: Series,
}

/// 单个数据集：原始测量 + 各阶段产物
///
/// 每个阶段只写自己的槽位；读取前置结果时若尚未提交则返回
/// `NdpError::StageNotReady`。
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    role: DatasetRole,
    measurement: Option<Measurement>,
    operations: OperationLog,
    deadtime: Option<DeadTimeCorrected>,
    normalized: Option<Normalized>,
    corrected: Option<Series>,
    peaks: Option<ReferencePeaks>,
    concentration: Option<Concentration>,
}

impl Dataset {
    pub fn new(role: DatasetRole) -> Self {
        Self {
            role,
            measurement: None,
            operations: OperationLog::new(),
            deadtime: None,
            normalized: None,
            corrected: None,
            peaks: None,
            concentration: None,
        }
    }

    #[inline]
    pub fn role(&self) -> DatasetRole {
        self.role
    }

    #[inline]
    pub fn operations(&self) -> &OperationLog {
        &self.operations
    }

    pub fn measurement(&self) -> NdpResult<&Measurement> {
        self.measurement
            .as_ref()
            .ok_or_else(|| stage_not_ready(self.role, Operation::ChannelSum))
    }

    pub fn deadtime(&self) -> NdpResult<&DeadTimeCorrected> {
        self.deadtime
            .as_ref()
            .ok_or_else(|| stage_not_ready(self.role, Operation::DeadtimeScaled))
    }

    pub fn normalized(&self) -> NdpResult<&Normalized> {
        self.normalized
            .as_ref()
            .ok_or_else(|| stage_not_ready(self.role, Operation::Normalized))
    }

    pub fn corrected(&self) -> NdpResult<&Series> {
        self.corrected
            .as_ref()
            .ok_or_else(|| stage_not_ready(self.role, Operation::Corrected))
    }

    pub fn peaks(&self) -> NdpResult<&ReferencePeaks> {
        self.peaks
            .as_ref()
            .ok_or_else(|| stage_not_ready(self.role, Operation::IntegratedPeaks))
    }

    pub fn concentration(&self) -> NdpResult<&Concentration> {
        self.concentration
            .as_ref()
            .ok_or_else(|| stage_not_ready(self.role, Operation::ScaledToReference))
    }

    // ==================== 阶段提交 ====================
    // 重复提交会覆盖结果，但操作日志只记录一次

    pub fn commit_measurement(&mut self, measurement: Measurement) {
        self.operations.record(Operation::ChannelSum);
        self.measurement = Some(measurement);
    }

    pub fn commit_deadtime(&mut self, result: DeadTimeCorrected) {
        self.operations.record(Operation::DeadtimeScaled);
        self.deadtime = Some(result);
    }

    pub fn commit_normalized(&mut self, result: Normalized) {
        self.operations.record(Operation::Normalized);
        self.normalized = Some(result);
    }

    pub fn commit_corrected(&mut self, result: Series) {
        self.operations.record(Operation::Corrected);
        self.corrected = Some(result);
    }

    pub fn commit_peaks(&mut self, result: ReferencePeaks) {
        self.operations.record(Operation::IntegratedPeaks);
        self.peaks = Some(result);
    }

    pub fn commit_concentration(&mut self, result: Concentration) {
        self.operations.record(Operation::ScaledToReference);
        self.concentration = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NdpError;

    #[test]
    fn test_role_pairs() {
        assert_eq!(DatasetRole::SampleData.monitor(), Some(DatasetRole::SampleMonitor));
        assert_eq!(DatasetRole::ReferenceMonitor.monitor(), None);
        for (i, role) in DatasetRole::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn test_missing_stage_reports_role_and_stage() {
        let ds = Dataset::new(DatasetRole::BackgroundData);
        match ds.normalized() {
            Err(NdpError::StageNotReady { role, stage }) => {
                assert_eq!(role, "Bgd Dat");
                assert_eq!(stage, "Normalized");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_recommit_does_not_duplicate_operation() {
        let mut ds = Dataset::new(DatasetRole::SampleData);
        let result = DeadTimeCorrected {
            ratio: 1.0,
            counts: Series::new(vec![1.0], vec![1.0]),
        };
        ds.commit_deadtime(result.clone());
        ds.commit_deadtime(DeadTimeCorrected {
            ratio: 0.5,
            ..result
        });
        assert_eq!(ds.operations().len(), 1);
        assert_eq!(ds.deadtime().unwrap().ratio, 0.5);
    }
}
