//! 文件驱动的完整约化测试
//!
//! 在临时目录中写出仪器参数、schema、TRIM和计数文件，走完 读取 → 约化 → 导出。

use ndp_reduce::error::NdpError;
use ndp_reduce::input;
use ndp_reduce::tools::{self, AppConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn log(msg_zh: impl AsRef<str>, msg_en: impl AsRef<str>) {
    println!("{} / {}", msg_zh.as_ref(), msg_en.as_ref());
}

const INSTRUMENT: &str = "\
NDP Instrument Parameters
Eight channel test rig
----
Values below are read by line
Configuration label: test rig
Beam Energy (keV): 10
Number of Channels: 8
Zero Channel: 2
Alpha Channels
2
6
Calibration (m, b)
1.0
0.0
";

/// (目录, 过滤串)：TRIM, BgdDat, BgdMon, RefDat, RefMon, SamDat, SamMon
fn schema_text(entries: [(&str, &str); 7]) -> String {
    let mut lines = vec![String::new(); 23];
    lines[0] = "NDP Data Schema".to_string();
    lines[1] = "----".to_string();
    lines[2] = "TRIM simulations".to_string();
    let slots = [(3, 4), (7, 8), (9, 10), (13, 14), (15, 16), (19, 20), (21, 22)];
    for ((path_line, filter_line), (dir, filter)) in slots.into_iter().zip(entries) {
        lines[path_line] = format!("Path: {dir}");
        lines[filter_line] = format!("Filter: {filter}");
    }
    lines.join("\n")
}

fn count_text(counts: &[f64], seconds: f64) -> String {
    let mut text = format!(
        "Detector: Det1\nLabel: B implant\nStart Time: Thu Mar 08 14:21:07 EST 2018\n\
         Live Time: {seconds}\nReal Time: {seconds}\nPreset: none\nGain: 1\nChannel Counts\n"
    );
    for (c, n) in counts.iter().enumerate() {
        text.push_str(&format!("{c} {n}\n"));
    }
    text
}

fn trim_text(energy_ev: &str, depth_angstrom: &str) -> String {
    let mut text = String::new();
    for i in 0..12 {
        text.push_str(&format!("TRIM header {i}\n"));
    }
    text.push_str(&format!("T 1 2 {energy_ev} {depth_angstrom} 0.5\n"));
    text
}

/// 写出完整的数据目录
fn write_fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("NDPInstrumParms.dat"), INSTRUMENT).unwrap();

    fs::create_dir(root.join("trim")).unwrap();
    fs::write(root.join("trim/range_5kev.txt"), trim_text(".5000E+04", "500E-01")).unwrap();
    fs::write(root.join("trim/range_2kev.txt"), trim_text(".2000E+04", "800E-01")).unwrap();

    fs::create_dir(root.join("counts")).unwrap();
    let peak = [0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 0.0, 0.0];
    for prefix in ["sam", "samMon", "ref", "refMon", "bgdMon"] {
        for i in 1..=2 {
            fs::write(
                root.join(format!("counts/{prefix}_{i}.dat")),
                count_text(&peak, 10.0),
            )
            .unwrap();
        }
    }
    fs::write(root.join("counts/bgd_1.dat"), count_text(&[0.0; 8], 10.0)).unwrap();

    let schema = schema_text([
        ("trim", "range_"),
        ("counts", "bgd_"),
        ("counts", "bgdMon_"),
        ("counts", "ref_"),
        ("counts", "refMon_"),
        ("counts", "sam_"),
        ("counts", "samMon_"),
    ]);
    fs::write(root.join("NDPDataSchema.dat"), schema).unwrap();
    dir
}

fn config_for(root: &Path) -> AppConfig {
    let mut config = AppConfig::for_directory(root);
    config.peak_windows.alpha_star = (2, 4);
    config.peak_windows.alpha = (4, 6);
    config
}

#[test]
fn test_schema_discovery_resolves_relative_paths() {
    let fixture = write_fixture();
    let schema = input::read_schema(&fixture.path().join("NDPDataSchema.dat")).unwrap();

    let trim: Vec<String> = schema
        .trim_files()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(trim, vec!["range_2kev.txt", "range_5kev.txt"]);

    let sam = schema
        .dataset_files(ndp_reduce::DatasetRole::SampleData)
        .unwrap();
    assert_eq!(sam.len(), 2);
    assert!(sam.iter().all(|p| p.starts_with(fixture.path())));
}

#[test]
fn test_full_reduction_writes_csv_and_provenance() {
    log("=== 完整约化（文件） ===", "=== Full file-based reduction ===");

    let fixture = write_fixture();
    let root = fixture.path();
    let mut config = config_for(root);
    config.output_path = Some(root.join("profile.csv"));
    config.provenance_path = Some(root.join("profile.json"));
    config.bin_width = 4;

    let output = tools::run_reduction(&config).unwrap();
    let csv_path = tools::output_results(&output, &config).unwrap();
    assert_eq!(csv_path, root.join("profile.csv"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    log(
        format!("CSV共 {} 行", lines.len()),
        format!("CSV has {} lines", lines.len()),
    );

    assert_eq!(lines[0], "NIST Neutron Depth Profiling Data File");
    assert_eq!(lines[1], "Sample Data Files");
    assert_eq!(lines[2], "\"sam_1.dat, sam_2.dat\"");
    assert_eq!(lines[3], "Sample Monitor Files");
    assert_eq!(lines[7], "Background Monitor Files");
    assert_eq!(lines[6], "bgd_1.dat");
    assert_eq!(lines[13], "Sample Data Operations");
    assert_eq!(
        lines[14],
        "\"Channel Sum, Deadtime Scaled, Normalized, Corrected, Scaled to Reference\""
    );
    assert_eq!(lines[15], "2018-03-08 14:21:07");
    assert_eq!(lines[16], " ");
    assert_eq!(
        lines[17],
        "Energy (keV),Depth (nm),Atoms/cm2,Uncertainty,Atoms/cm3,Uncertainty"
    );

    // 8 / 4 + 1 = 3 个分箱
    let rows = &lines[18..];
    assert_eq!(rows.len(), 3);
    for row in rows {
        let fields: Vec<f64> = row.split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 6);
        assert!(fields.iter().all(|v| v.is_finite()));
    }

    // 头部单字段行与六列数据行混排，按CSV读回时字段不被逗号拆开
    let records: Vec<csv::StringRecord> = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&csv_path)
        .unwrap()
        .records()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), lines.len());
    assert_eq!(records[2].len(), 1);
    assert_eq!(&records[2][0], "sam_1.dat, sam_2.dat");
    assert_eq!(records[14].len(), 1);
    assert_eq!(records[17].len(), 6);
    assert_eq!(records[18].len(), 6);

    let json = fs::read_to_string(root.join("profile.json")).unwrap();
    let provenance: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(provenance["instrument"]["num_channels"], 8);
    assert_eq!(provenance["bin_width"], 4);
    assert_eq!(provenance["datasets"].as_array().unwrap().len(), 6);
    assert_eq!(provenance["datasets"][0]["role"], "SampleData");
    assert_eq!(provenance["datasets"][0]["live_time"], 20.0);
    assert_eq!(provenance["datasets"][0]["operations"][4], "Scaled to Reference");
}

#[test]
fn test_missing_dataset_directory_is_discovery_error() {
    let fixture = write_fixture();
    let root = fixture.path();
    fs::remove_file(root.join("counts/bgd_1.dat")).unwrap();

    match tools::run_reduction(&config_for(root)) {
        Err(NdpError::Discovery(msg)) => {
            log(format!("预期错误: {msg}"), format!("Expected error: {msg}"));
            assert!(msg.contains("Bgd Dat"));
        }
        other => panic!("应返回Discovery错误 / expected Discovery: {other:?}"),
    }
}

#[test]
fn test_short_count_file_is_malformed() {
    let fixture = write_fixture();
    let root = fixture.path();
    fs::write(root.join("counts/sam_2.dat"), count_text(&[1.0; 5], 10.0)).unwrap();

    match tools::run_reduction(&config_for(root)) {
        Err(NdpError::MalformedRecord { file, .. }) => assert_eq!(file, "sam_2.dat"),
        other => panic!("应返回MalformedRecord / expected MalformedRecord: {other:?}"),
    }
}

#[test]
fn test_repeated_channel_row_is_malformed() {
    let fixture = write_fixture();
    let root = fixture.path();
    let mut text = count_text(&[1.0; 8], 10.0);
    text = text.replace("\n6 1\n", "\n5 1\n");
    fs::write(root.join("counts/ref_1.dat"), text).unwrap();

    match tools::run_reduction(&config_for(root)) {
        Err(NdpError::MalformedRecord { file, reason }) => {
            log(format!("预期错误: {reason}"), format!("Expected error: {reason}"));
            assert_eq!(file, "ref_1.dat");
        }
        other => panic!("应返回MalformedRecord / expected MalformedRecord: {other:?}"),
    }
}

#[test]
fn test_missing_instrument_file_is_configuration_error() {
    let fixture = write_fixture();
    let mut config = config_for(fixture.path());
    config.instrument_path = Some(PathBuf::from("/nonexistent/NDPInstrumParms.dat"));

    assert!(matches!(
        tools::run_reduction(&config),
        Err(NdpError::Configuration(_))
    ));
}
