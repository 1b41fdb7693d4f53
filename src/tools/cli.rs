//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理、日志初始化和程序信息展示。

use super::constants::{defaults, reference_peaks, reference_standard};
use crate::core::atom::{AtomTable, Measured, ScaleInputs};
use crate::error::{NdpError, NdpResult};
use crate::processing::{PeakWindows, ReductionSettings};
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据目录（包含仪器参数文件和schema文件）
    pub input_path: PathBuf,

    /// 仪器参数文件（默认 `<input>/NDPInstrumParms.dat`）
    pub instrument_path: Option<PathBuf>,

    /// schema文件（默认 `<input>/NDPDataSchema.dat`）
    pub schema_path: Option<PathBuf>,

    /// CSV输出路径（可选，未指定时自动生成）
    pub output_path: Option<PathBuf>,

    /// JSON来源记录输出路径（可选）
    pub provenance_path: Option<PathBuf>,

    /// 分箱宽度（通道数）
    pub bin_width: usize,

    /// 参考峰积分窗口
    pub peak_windows: PeakWindows,

    /// 样品核素
    pub sample_nuclide: String,

    /// 参考核素
    pub reference_nuclide: String,

    /// 参考反应分支比
    pub branch_fraction: f64,

    /// 参考标准浓度及不确定度 (atoms/cm²)
    pub reference_concentration: Measured,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl AppConfig {
    /// 按数据目录构造默认配置
    pub fn for_directory(input_path: impl Into<PathBuf>) -> Self {
        let scale = ScaleInputs::default();
        Self {
            input_path: input_path.into(),
            instrument_path: None,
            schema_path: None,
            output_path: None,
            provenance_path: None,
            bin_width: defaults::BIN_WIDTH,
            peak_windows: PeakWindows::default(),
            sample_nuclide: scale.sample_nuclide,
            reference_nuclide: scale.reference_nuclide,
            branch_fraction: scale.branch_fraction,
            reference_concentration: scale.reference_concentration,
            verbose: false,
        }
    }

    pub fn instrument_file(&self) -> PathBuf {
        self.instrument_path
            .clone()
            .unwrap_or_else(|| self.input_path.join(defaults::INSTRUMENT_FILE))
    }

    pub fn schema_file(&self) -> PathBuf {
        self.schema_path
            .clone()
            .unwrap_or_else(|| self.input_path.join(defaults::SCHEMA_FILE))
    }

    /// 由命令行参数构造约化参数，核素须在默认核素表中
    pub fn reduction_settings(&self) -> NdpResult<ReductionSettings> {
        if self.bin_width == 0 {
            return Err(NdpError::InvalidInput("分箱宽度必须大于0".to_string()));
        }
        if !(self.branch_fraction.is_finite() && self.branch_fraction > 0.0) {
            return Err(NdpError::InvalidInput(format!(
                "分支比无效: {}",
                self.branch_fraction
            )));
        }

        let atoms = AtomTable::default();
        atoms.get(&self.sample_nuclide)?;
        atoms.get(&self.reference_nuclide)?;

        Ok(ReductionSettings {
            bin_width: self.bin_width,
            peak_windows: self.peak_windows,
            atoms,
            scale: ScaleInputs {
                sample_nuclide: self.sample_nuclide.clone(),
                reference_nuclide: self.reference_nuclide.clone(),
                branch_fraction: self.branch_fraction,
                reference_concentration: self.reference_concentration,
            },
        })
    }
}

fn build_command() -> Command {
    Command::new("ndp-reduce")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("INPUT")
                .help("数据目录（包含 NDPInstrumParms.dat 与 NDPDataSchema.dat）。如果不指定，将使用可执行文件所在目录")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("instrument")
                .long("instrument")
                .help("仪器参数文件路径")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .help("数据schema文件路径")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出CSV文件路径")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("provenance")
                .long("provenance")
                .help("输出JSON来源记录文件路径")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("bin-width")
                .long("bin-width")
                .short('w')
                .help("分箱宽度（通道数）")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value(defaults::BIN_WIDTH.to_string()),
        )
        .arg(
            Arg::new("alpha-star-window")
                .long("alpha-star-window")
                .help("alpha* 峰积分通道窗口 [低, 高)")
                .value_names(["LOW", "HIGH"])
                .num_args(2)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("alpha-window")
                .long("alpha-window")
                .help("alpha 峰积分通道窗口 [低, 高)")
                .value_names(["LOW", "HIGH"])
                .num_args(2)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("sample-nuclide")
                .long("sample-nuclide")
                .help("样品核素 (He, Li, B, N)")
                .default_value(reference_standard::NUCLIDE),
        )
        .arg(
            Arg::new("reference-nuclide")
                .long("reference-nuclide")
                .help("参考标准核素")
                .default_value(reference_standard::NUCLIDE),
        )
        .arg(
            Arg::new("branch-fraction")
                .long("branch-fraction")
                .help("参考反应分支比")
                .value_parser(value_parser!(f64))
                .default_value(reference_standard::BRANCH_FRACTION.to_string()),
        )
        .arg(
            Arg::new("reference-concentration")
                .long("reference-concentration")
                .help("参考标准面浓度 (atoms/cm²)")
                .value_parser(value_parser!(f64))
                .default_value(reference_standard::CONCENTRATION.to_string()),
        )
        .arg(
            Arg::new("reference-uncertainty")
                .long("reference-uncertainty")
                .help("参考标准面浓度不确定度 (atoms/cm²)")
                .value_parser(value_parser!(f64))
                .default_value(reference_standard::CONCENTRATION_UNCERT.to_string()),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(ArgAction::SetTrue),
        )
}

fn window_arg(matches: &clap::ArgMatches, id: &str, default: (usize, usize)) -> (usize, usize) {
    matches
        .get_many::<usize>(id)
        .map(|values| values.copied().collect::<Vec<_>>())
        .and_then(|v| match v.as_slice() {
            [low, high] => Some((*low, *high)),
            _ => None,
        })
        .unwrap_or(default)
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> AppConfig {
    config_from_matches(&build_command().get_matches())
}

/// 从参数列表解析配置（测试和嵌入调用）
pub fn parse_args_from<I, T>(args: I) -> Result<AppConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(config_from_matches(&build_command().try_get_matches_from(args)?))
}

fn config_from_matches(matches: &clap::ArgMatches) -> AppConfig {
    // 未指定目录时使用可执行文件所在目录
    let input_path = match matches.get_one::<String>("INPUT") {
        Some(input) => PathBuf::from(input),
        None => {
            let exe_path = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
            super::utils::get_parent_dir(&exe_path).to_path_buf()
        }
    };
    let path_arg = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);
    let number = |id: &str, default: f64| matches.get_one::<f64>(id).copied().unwrap_or(default);
    let text = |id: &str| {
        matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_else(|| reference_standard::NUCLIDE.to_string())
    };

    AppConfig {
        input_path,
        instrument_path: path_arg("instrument"),
        schema_path: path_arg("schema"),
        output_path: path_arg("output"),
        provenance_path: path_arg("provenance"),
        bin_width: matches
            .get_one::<usize>("bin-width")
            .copied()
            .unwrap_or(defaults::BIN_WIDTH),
        peak_windows: PeakWindows {
            alpha_star: window_arg(
                matches,
                "alpha-star-window",
                reference_peaks::ALPHA_STAR_WINDOW,
            ),
            alpha: window_arg(matches, "alpha-window", reference_peaks::ALPHA_WINDOW),
        },
        sample_nuclide: text("sample-nuclide"),
        reference_nuclide: text("reference-nuclide"),
        branch_fraction: number("branch-fraction", reference_standard::BRANCH_FRACTION),
        reference_concentration: Measured::new(
            number("reference-concentration", reference_standard::CONCENTRATION),
            number(
                "reference-uncertainty",
                reference_standard::CONCENTRATION_UNCERT,
            ),
        ),
        verbose: matches.get_flag("verbose"),
    }
}

/// 安装tracing订阅器（仅verbose模式；RUST_LOG优先）
pub fn init_logging(verbose: bool) {
    if !verbose {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    // 订阅器已存在时忽略
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("🚀 NDP Reduce v{VERSION} 启动");
    println!("📝 {DESCRIPTION}");
    if config.verbose {
        println!("📁 数据目录: {}", config.input_path.display());
        println!("   仪器参数 / Instrument: {}", config.instrument_file().display());
        println!("   数据schema / Schema: {}", config.schema_file().display());
        println!(
            "   分箱宽度 / Bin width: {}   核素 / Nuclide: {} (参考 / reference {})",
            config.bin_width, config.sample_nuclide, config.reference_nuclide
        );
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("✅ 数据约化完成！");
    }
}
