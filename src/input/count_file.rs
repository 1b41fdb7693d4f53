//! 原始计数文件读取
//!
//! 固定布局（0起行号）：
//! - 0: 探测器　1: 标签　2: 开始时间　3: 活时间　4: 真实时间（均为 `label: value`）
//! - 8 起: 每行 `channel count`，共 NumChannels 行

use super::{field_value, line_at};
use crate::error::{NdpResult, io_error, malformed};
use crate::processing::aggregate::CountRecord;
use crate::tools::constants::defaults::COUNT_DATA_FIRST_LINE;
use crate::tools::utils;
use chrono::NaiveDateTime;
use std::path::Path;

const DETECTOR_LINE: usize = 0;
const LABEL_LINE: usize = 1;
const START_TIME_LINE: usize = 2;
const LIVE_TIME_LINE: usize = 3;
const REAL_TIME_LINE: usize = 4;

/// 开始时间支持的格式（时区缩写在解析前移除）
const START_TIME_FORMATS: &[&str] = &[
    "%a %b %d %H:%M:%S %Y",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// 读取一个计数文件
pub fn read_count_file(path: &Path, num_channels: usize) -> NdpResult<CountRecord> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_count_text(path, &text, num_channels)
}

/// 解析计数文件文本
///
/// 最多读取 `num_channels` 行通道数据；行数不足由汇总阶段报告。
pub fn parse_count_text(path: &Path, text: &str, num_channels: usize) -> NdpResult<CountRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let header = |index: usize, name: &str| {
        line_at(&lines, index, || malformed(path, format!("缺少{name}行"))).map(field_value)
    };

    let detector = header(DETECTOR_LINE, "探测器")?.to_string();
    let label = header(LABEL_LINE, "标签")?.to_string();
    let start_raw = header(START_TIME_LINE, "开始时间")?;
    let live_time = parse_seconds(path, header(LIVE_TIME_LINE, "活时间")?, "活时间")?;
    let real_time = parse_seconds(path, header(REAL_TIME_LINE, "真实时间")?, "真实时间")?;

    let start_time = parse_start_time(start_raw);
    if start_time.is_none() {
        tracing::warn!(file = %path.display(), raw = start_raw, "unrecognised start time");
    }

    let channels = lines
        .iter()
        .enumerate()
        .skip(COUNT_DATA_FIRST_LINE)
        .filter(|(_, l)| !l.trim().is_empty())
        .take(num_channels)
        .map(|(index, l)| parse_channel_row(path, index, l))
        .collect::<NdpResult<Vec<_>>>()?;

    Ok(CountRecord {
        source: utils::extract_filename_lossy(path),
        detector,
        label,
        start_time,
        live_time,
        real_time,
        channels,
    })
}

fn parse_seconds(path: &Path, raw: &str, name: &str) -> NdpResult<f64> {
    let value: f64 = raw
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .parse()
        .map_err(|e| malformed(path, format!("{name} '{raw}': {e}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed(path, format!("{name}无效: {value}")));
    }
    Ok(value)
}

fn parse_channel_row(path: &Path, index: usize, line: &str) -> NdpResult<(usize, f64)> {
    let mut fields = line.split_whitespace();
    let row_error =
        |what: &str| malformed(path, format!("第{}行{what}: '{}'", index + 1, line.trim()));

    let channel = fields
        .next()
        .and_then(|f| f.parse::<usize>().ok())
        .ok_or_else(|| row_error("通道号无效"))?;
    let count = fields
        .next()
        .and_then(|f| f.parse::<f64>().ok())
        .filter(|c| c.is_finite())
        .ok_or_else(|| row_error("计数无效"))?;

    Ok((channel, count))
}

/// 解析开始时间，例如 `Thu Mar 08 14:21:07 EST 2018`
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    // 去掉时间与年份之间的时区缩写
    let has_zone = tokens.len() == 6 && tokens[4].chars().all(char::is_alphabetic);
    let candidate = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| !(has_zone && *i == 4))
        .map(|(_, t)| *t)
        .collect::<Vec<_>>()
        .join(" ");

    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt).ok())
}
