//! 核心数据模型模块
//!
//! 仪器常量、核素表、射程模型、通道刻度以及约化状态。

pub mod atom;
pub mod calibration;
pub mod dataset;
pub mod instrument;
pub mod operations;
pub mod range_model;
pub mod state;

// 重新导出公共接口
pub use atom::{Atom, AtomTable, Measured, ScaleInputs};
pub use calibration::DetectorProfile;
pub use dataset::{
    Concentration, Dataset, DatasetRole, DeadTimeCorrected, Measurement, Normalized,
    ReferencePeaks, Series,
};
pub use instrument::Instrument;
pub use operations::{Operation, OperationLog};
pub use range_model::{RangeFit, RangeProfile};
pub use state::SampleState;
