//! ndp-trim - TRIM射程模拟评估工具
//!
//! 读取一个目录下的TRIM透射文件，拟合射程模型（厚度-能量二次多项式），
//! 输出每个模拟点、拟合值和系数。用于在完整约化前检查TRIM输入。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, ValueEnum};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use walkdir::WalkDir;

use ndp_reduce::input::{read_instrument, read_trim_file};
use ndp_reduce::{RangeFit, RangeProfile};

#[derive(Parser)]
#[command(name = "ndp-trim")]
#[command(about = "TRIM射程模型评估工具 / TRIM range model evaluation tool")]
#[command(version)]
struct Cli {
    /// TRIM文件目录
    /// Directory containing TRIM transmit files
    path: PathBuf,

    /// 束流能量 (keV)，与 --instrument 二选一
    /// Beam energy in keV (alternative to --instrument)
    #[arg(long, short = 'e')]
    beam_energy: Option<f64>,

    /// 从仪器参数文件读取束流能量
    /// Read the beam energy from an instrument parameter file
    #[arg(long, short = 'i')]
    instrument: Option<PathBuf>,

    /// 文件名过滤串（默认全部文件）
    /// File-name filter (default: all files)
    #[arg(long, default_value = "")]
    filter: String,

    /// 递归扫描子目录
    /// Recurse into subdirectories
    #[arg(long, short = 'r')]
    recursive: bool,

    /// 输出格式：table, json（默认table）
    /// Output format: table, json (default: table)
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// 单个模拟点的评估结果
#[derive(Serialize)]
struct PointReport {
    source: String,
    energy_kev: f64,
    thickness_nm: f64,
    fitted_nm: f64,
    residual_nm: f64,
}

#[derive(Serialize)]
struct TrimReport {
    directory: String,
    beam_energy_kev: f64,
    coeffs: [f64; 3],
    anchor_residual_nm: f64,
    points: Vec<PointReport>,
    timestamp: String,
}

fn collect_trim_files(dir: &Path, filter: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Not a directory / 不是目录: {}", dir.display());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry =
            entry.with_context(|| format!("Failed to scan / 扫描失败: {}", dir.display()))?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().contains(filter) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn resolve_beam_energy(cli: &Cli) -> Result<f64> {
    match (cli.beam_energy, &cli.instrument) {
        (Some(energy), _) => Ok(energy),
        (None, Some(path)) => {
            let instrument = read_instrument(path).with_context(|| {
                format!("Failed to read instrument / 读取仪器参数失败: {}", path.display())
            })?;
            Ok(instrument.beam_energy)
        }
        (None, None) => bail!("Beam energy required / 需要束流能量：使用 -e 或 -i 指定"),
    }
}

fn build_report(
    dir: &Path,
    beam_energy: f64,
    profiles: &[RangeProfile],
    fit: &RangeFit,
) -> TrimReport {
    let points = profiles
        .iter()
        .map(|p| {
            let fitted = fit.thickness(p.median_energy);
            PointReport {
                source: p.source.clone(),
                energy_kev: p.median_energy,
                thickness_nm: p.mean_thickness,
                fitted_nm: fitted,
                residual_nm: p.mean_thickness - fitted,
            }
        })
        .collect();

    TrimReport {
        directory: dir.display().to_string(),
        beam_energy_kev: beam_energy,
        coeffs: fit.coeffs,
        anchor_residual_nm: fit.anchor_residual(),
        points,
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn output_table(report: &TrimReport) {
    println!("TRIM Range Model / 射程模型");
    println!("================================");
    println!("Directory / 目录: {}", report.directory);
    println!("Beam energy / 束流能量: {} keV", report.beam_energy_kev);
    println!("Date / 日期: {}", report.timestamp);
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "File / 文件",
        "Energy (keV)",
        "Thickness (nm)",
        "Fit (nm)",
        "Residual (nm)",
    ]);
    for p in &report.points {
        table.add_row(vec![
            Cell::new(&p.source),
            Cell::new(format!("{:.2}", p.energy_kev)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", p.thickness_nm)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", p.fitted_nm)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:+.3}", p.residual_nm)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");

    let [a, b, c] = report.coeffs;
    println!();
    println!("thickness(E) = {a:.6e}·E² + {b:.6e}·E + {c:.6e}");
    println!(
        "Anchor residual / 锚点残差: {:.3e} nm",
        report.anchor_residual_nm
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let beam_energy = resolve_beam_energy(&cli)?;

    let files = collect_trim_files(&cli.path, &cli.filter, cli.recursive)?;
    if files.is_empty() {
        bail!(
            "No TRIM files found / 未找到TRIM文件: {} (filter '{}')",
            cli.path.display(),
            cli.filter
        );
    }
    eprintln!("Reading / 读取 {} TRIM files...", files.len());

    let profiles = files
        .iter()
        .map(|f| {
            read_trim_file(f)
                .with_context(|| format!("Failed to parse / 解析失败: {}", f.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let fit = RangeFit::fit(beam_energy, &profiles).context("Range fit failed / 射程拟合失败")?;
    let report = build_report(&cli.path, beam_energy, &profiles, &fit);

    match cli.format {
        OutputFormat::Table => output_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
