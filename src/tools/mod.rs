//! 工具模块集合
//!
//! 包含CLI、约化执行、扫描展示、格式化等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod constants;
pub mod formatter;
pub mod processor;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{
    AppConfig, init_logging, parse_args, parse_args_from, show_completion_info, show_startup_info,
};
pub use formatter::{
    Provenance, build_provenance, create_csv_report, provenance_json, summary_table, write_output,
};
pub use processor::{
    ReductionOutput, output_results, run_reduction, show_reduction_summary,
};
pub use scanner::{generate_output_path, show_scan_results};
