//! 数值约化模块
//!
//! 计数汇总、死时间校正、监测器归一化、本底扣除、参考峰积分、参考定标和分箱。
//! 每个阶段都是纯函数，由 [`ReductionPipeline`] 按顺序编排。

pub mod aggregate;
pub mod background;
pub mod binning;
pub mod deadtime;
pub mod normalize;
pub mod numeric;
pub mod pipeline;
pub mod reference;
pub mod scale;

// 重新导出公共接口
pub use aggregate::CountRecord;
pub use binning::BinnedProfile;
pub use pipeline::{ReductionPipeline, ReductionSettings};
pub use reference::PeakWindows;
