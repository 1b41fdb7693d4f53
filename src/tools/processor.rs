//! 约化流程执行模块
//!
//! 读取仪器参数、schema和所有输入文件，驱动 [`ReductionPipeline`]，并输出结果。

use super::cli::AppConfig;
use super::{formatter, scanner, utils};
use crate::core::dataset::DatasetRole;
use crate::core::range_model::RangeProfile;
use crate::core::state::SampleState;
use crate::error::NdpResult;
use crate::input::{self, DataSchema};
use crate::processing::{CountRecord, ReductionPipeline, ReductionSettings};
use std::path::{Path, PathBuf};

/// 一次完整约化的结果
#[derive(Debug, Clone)]
pub struct ReductionOutput {
    pub state: SampleState,
    pub settings: ReductionSettings,
    pub schema: DataSchema,
}

/// 读取全部TRIM文件
pub fn load_range_profiles(files: &[PathBuf]) -> NdpResult<Vec<RangeProfile>> {
    files.iter().map(|f| input::read_trim_file(f)).collect()
}

/// 读取一个数据集的全部计数文件
pub fn load_count_records(files: &[PathBuf], num_channels: usize) -> NdpResult<Vec<CountRecord>> {
    files
        .iter()
        .map(|f| input::read_count_file(f, num_channels))
        .collect()
}

/// 执行schema驱动的完整约化
pub fn run_reduction(config: &AppConfig) -> NdpResult<ReductionOutput> {
    let settings = config.reduction_settings()?;
    let instrument = input::read_instrument(&config.instrument_file())?;
    if config.verbose {
        println!(
            "[INFO] 仪器配置 / Instrument: {} ({} 通道 / channels, 零通道 / zero channel {}, 束流能量 / beam {} keV)",
            instrument.configuration,
            instrument.num_channels,
            instrument.zero_channel,
            instrument.beam_energy
        );
    }

    let schema = input::read_schema(&config.schema_file())?;
    scanner::show_scan_results(config, &schema);

    let pipeline = ReductionPipeline::new(settings);
    let num_channels = instrument.num_channels;
    let mut state = SampleState::new(instrument)?;

    let profiles = load_range_profiles(schema.trim_files()?)?;
    pipeline.calibrate(&mut state, &profiles)?;
    if config.verbose {
        let fit = state.range_fit()?;
        println!(
            "[INFO] 射程拟合 / Range fit: {} 个点 / points, 系数 / coeffs {:?}",
            fit.points.len(),
            fit.coeffs
        );
    }

    for role in DatasetRole::ALL {
        let files = schema.dataset_files(role)?;
        if config.verbose {
            println!(
                "[PROCESSING] 汇总 / Aggregating {}: {} 个文件 / files",
                role.display_name(),
                files.len()
            );
        }
        let records = load_count_records(files, num_channels)?;
        pipeline.load(&mut state, role, &records)?;
    }

    pipeline.run_corrections(&mut state)?;

    Ok(ReductionOutput {
        settings: pipeline.settings().clone(),
        state,
        schema,
    })
}

/// 输出CSV（以及可选的JSON来源记录），返回CSV路径
pub fn output_results(output: &ReductionOutput, config: &AppConfig) -> NdpResult<PathBuf> {
    let binned = output.state.binned()?;
    if config.verbose {
        println!("{}", formatter::summary_table(binned));
    }

    let csv_path = scanner::generate_output_path(config, &output.schema);
    formatter::write_output(&formatter::create_csv_report(&output.state)?, &csv_path)?;

    if let Some(provenance_path) = &config.provenance_path {
        let provenance = formatter::build_provenance(&output.state, &output.settings)?;
        formatter::write_output(&formatter::provenance_json(&provenance)?, provenance_path)?;
    }

    Ok(csv_path)
}

/// 显示约化汇总
pub fn show_reduction_summary(output: &ReductionOutput, csv_path: &Path) {
    let sample = output.state.dataset(DatasetRole::SampleData);
    println!();
    println!("📊 约化完成 / Reduction complete");
    println!(
        "   样品操作 / Operations: {}",
        sample.operations().labels().join(", ")
    );
    if let Ok(binned) = output.state.binned() {
        println!(
            "   分箱 / Bins: {} (宽度 / width {})",
            binned.len(),
            binned.width
        );
    }
    println!("   📄 {}", utils::extract_filename_lossy(csv_path));
}
