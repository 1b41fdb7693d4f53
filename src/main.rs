//! NDP Reduce - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成一次数据约化。

use ndp_reduce::{
    error::{ErrorCategory, NdpError},
    tools,
};
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 配置/参数错误
    pub const CONFIGURATION_ERROR: i32 = 2;
    /// 数据集发现失败
    pub const DISCOVERY_ERROR: i32 = 3;
    /// 文件内容格式错误
    pub const RECORD_ERROR: i32 = 4;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &NdpError) -> &'static str {
    match error {
        NdpError::InvalidInput(_) => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check if command-line arguments are correct, use --help to see full usage"
        }
        NdpError::StageNotReady { .. } => {
            "约化阶段顺序异常，请确认所有数据集均已加载 / Stage ordering problem, make sure all datasets were loaded"
        }
        _ => match ErrorCategory::from_ndp_error(error) {
            ErrorCategory::Configuration => {
                "检查 NDPInstrumParms.dat 与 NDPDataSchema.dat 的行布局 / Check the line layout of NDPInstrumParms.dat and NDPDataSchema.dat"
            }
            ErrorCategory::Discovery => {
                "检查schema中的目录和文件过滤串是否匹配实际文件 / Check that schema directories and filters match existing files"
            }
            ErrorCategory::Record => {
                "计数文件或TRIM文件格式不符，请检查头部和数据行 / Count or TRIM file layout is wrong, check header and data rows"
            }
            ErrorCategory::Io => {
                "检查文件路径是否正确，文件是否存在且可读 / Check if file path is correct, file exists and is readable"
            }
            ErrorCategory::Other => {
                "请检查输入文件和参数设置 / Please check input files and parameter settings"
            }
        },
    }
}

/// 错误处理和建议
fn handle_error(error: NdpError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");

    let category = ErrorCategory::from_ndp_error(&error);
    eprintln!("[INFO] 类别 / Category: {}", category.display_name());
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match &error {
        NdpError::InvalidInput(_) => exit_codes::CONFIGURATION_ERROR,
        _ => match category {
            ErrorCategory::Configuration => exit_codes::CONFIGURATION_ERROR,
            ErrorCategory::Discovery => exit_codes::DISCOVERY_ERROR,
            ErrorCategory::Record => exit_codes::RECORD_ERROR,
            ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
        },
    };

    process::exit(exit_code);
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), NdpError> {
    // 1. 解析命令行参数
    let config = tools::parse_args();
    tools::init_logging(config.verbose);

    // 2. 显示启动信息
    tools::show_startup_info(&config);

    // 3. 约化并输出
    let output = tools::run_reduction(&config)?;
    let csv_path = tools::output_results(&output, &config)?;
    tools::show_reduction_summary(&output, &csv_path);

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
