//! 输出格式化模块
//!
//! 负责约化结果的CSV导出、JSON来源记录和控制台汇总表。

use super::utils;
use crate::core::atom::ScaleInputs;
use crate::core::dataset::DatasetRole;
use crate::core::instrument::Instrument;
use crate::core::range_model::RangeFit;
use crate::core::state::SampleState;
use crate::error::{NdpError, NdpResult, io_error};
use crate::processing::binning::BinnedProfile;
use crate::processing::{PeakWindows, ReductionSettings};
use chrono::NaiveDateTime;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::path::Path;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

const CSV_TITLE: &str = "NIST Neutron Depth Profiling Data File";
const CSV_COLUMNS: [&str; 6] = [
    "Energy (keV)",
    "Depth (nm)",
    "Atoms/cm2",
    "Uncertainty",
    "Atoms/cm3",
    "Uncertainty",
];
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 头部中文件列表的顺序
const FILE_LIST_ORDER: [DatasetRole; 6] = [
    DatasetRole::SampleData,
    DatasetRole::SampleMonitor,
    DatasetRole::BackgroundData,
    DatasetRole::BackgroundMonitor,
    DatasetRole::ReferenceData,
    DatasetRole::ReferenceMonitor,
];

fn format_datetime(datetime: Option<NaiveDateTime>) -> String {
    datetime
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// 生成六列CSV报告（头部 + 每个分箱一行）
///
/// 头部行为单字段，数据行为六字段（flexible写出器）。
pub fn create_csv_report(state: &SampleState) -> NdpResult<String> {
    let binned = state.binned()?;
    let sample = state.dataset(DatasetRole::SampleData);
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record([CSV_TITLE])?;
    for role in FILE_LIST_ORDER {
        let files = &state.dataset(role).measurement()?.files;
        writer.write_record([format!("{} Files", role.display_name())])?;
        writer.write_record([utils::join_names(files)])?;
    }

    writer.write_record(["Sample Data Operations"])?;
    writer.write_record([sample.operations().labels().join(", ")])?;
    writer.write_record([format_datetime(sample.measurement()?.datetime)])?;
    writer.write_record([" "])?;
    writer.write_record(CSV_COLUMNS)?;

    for i in 0..binned.len() {
        writer.write_record(binned.row(i).iter().map(|v| v.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| NdpError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| NdpError::IoError(std::io::Error::other(e)))
}

/// 单个数据集的来源记录
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProvenance {
    pub role: DatasetRole,
    pub files: Vec<String>,
    pub detectors: Vec<String>,
    pub labels: Vec<String>,
    pub live_time: f64,
    pub real_time: f64,
    pub datetime: Option<NaiveDateTime>,
    pub operations: Vec<&'static str>,
}

/// 一次约化的完整来源记录
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub tool: String,
    pub log_date: String,
    pub instrument: Instrument,
    pub range_fit: RangeFit,
    pub bin_width: usize,
    pub peak_windows: PeakWindows,
    pub scale: ScaleInputs,
    pub datasets: Vec<DatasetProvenance>,
}

/// 从约化状态收集来源记录
pub fn build_provenance(
    state: &SampleState,
    settings: &ReductionSettings,
) -> NdpResult<Provenance> {
    let datasets = state
        .datasets()
        .map(|dataset| {
            let m = dataset.measurement()?;
            Ok(DatasetProvenance {
                role: dataset.role(),
                files: m.files.clone(),
                detectors: m.detectors.clone(),
                labels: m.labels.clone(),
                live_time: m.live_time,
                real_time: m.real_time,
                datetime: m.datetime,
                operations: dataset.operations().labels(),
            })
        })
        .collect::<NdpResult<Vec<_>>>()?;

    Ok(Provenance {
        tool: format!("ndp-reduce v{VERSION}"),
        log_date: chrono::Local::now().format(DATETIME_FORMAT).to_string(),
        instrument: state.instrument().clone(),
        range_fit: state.range_fit()?.clone(),
        bin_width: settings.bin_width,
        peak_windows: settings.peak_windows,
        scale: settings.scale.clone(),
        datasets,
    })
}

/// 来源记录序列化为JSON
pub fn provenance_json(provenance: &Provenance) -> NdpResult<String> {
    Ok(serde_json::to_string_pretty(provenance)?)
}

/// 分箱结果汇总表（控制台）
pub fn summary_table(binned: &BinnedProfile) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Bin",
        "Energy (keV)",
        "Depth (nm)",
        "Atoms/cm2",
        "± / 不确定度",
        "Atoms/cm3",
        "± / 不确定度",
    ]);

    for i in 0..binned.len() {
        let [energy, depth, areal, areal_u, volumetric, volumetric_u] = binned.row(i);
        table.add_row(vec![
            Cell::new(i).set_alignment(CellAlignment::Right),
            Cell::new(format!("{energy:.1}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{depth:.1}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{areal:.4e}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{areal_u:.2e}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{volumetric:.4e}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{volumetric_u:.2e}")).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// 写出文件并提示
pub fn write_output(content: &str, path: &Path) -> NdpResult<()> {
    std::fs::write(path, content).map_err(|e| io_error(path, e))?;
    println!("📄 结果已保存到 / Saved to: {}", path.display());
    Ok(())
}
