//! NDP Reduce - 中子深度剖析 (NDP) 数据约化工具
//!
//! 把一个样品的原始NDP探测器计数，结合本底、参考标准测量和TRIM射程模拟，
//! 约化为带不确定度的深度-浓度剖面。
//!
//! ## 处理流程
//! - 射程模型：TRIM厚度-能量二次最小二乘拟合（含束流能量锚点）
//! - 通道刻度：通道 → 能量（线性）→ 深度（二次）→ 零通道校正深度
//! - 计数汇总：同一数据集的多个文件逐通道求和
//! - 死时间校正 → 监测器归一化 → 本底扣除 → 参考峰积分 → 参考定标
//! - 分箱：粗深度分箱（能量/深度取中位数，浓度取均值）
//! - 导出：六列CSV + JSON来源记录

pub mod core;
pub mod error;
pub mod input;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use core::{DatasetRole, Instrument, RangeFit, RangeProfile, SampleState};
pub use error::{NdpError, NdpResult};
pub use processing::{BinnedProfile, CountRecord, ReductionPipeline, ReductionSettings};
