//! TRIM/SRIM 透射文件读取
//!
//! 前12行为头部；之后每行取第一个带 `E+` 指数的字段为能量 (eV)，
//! 第一个带 `E-` 指数的字段为深度 (Å)。

use crate::core::range_model::RangeProfile;
use crate::error::{NdpResult, io_error, malformed};
use crate::tools::constants::defaults::TRIM_HEADER_LINES;
use crate::tools::utils;
use std::path::Path;

/// 读取一个TRIM文件并归约为射程点
pub fn read_trim_file(path: &Path) -> NdpResult<RangeProfile> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_trim_text(path, &text)
}

/// 解析TRIM文本
pub fn parse_trim_text(path: &Path, text: &str) -> NdpResult<RangeProfile> {
    let samples = text
        .lines()
        .enumerate()
        .skip(TRIM_HEADER_LINES)
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(index, line)| parse_row(path, index, line))
        .collect::<NdpResult<Vec<_>>>()?;

    RangeProfile::from_samples(&utils::extract_filename_lossy(path), &samples)
}

fn parse_row(path: &Path, index: usize, line: &str) -> NdpResult<(f64, f64)> {
    let field = |marker: &str| {
        line.split_whitespace()
            .find(|t| t.to_ascii_uppercase().contains(marker))
            .and_then(|t| t.parse::<f64>().ok())
    };

    match (field("E+"), field("E-")) {
        (Some(energy), Some(depth)) => Ok((energy, depth)),
        _ => Err(malformed(
            path,
            format!("第{}行缺少能量(E+)或深度(E-)字段: '{}'", index + 1, line.trim()),
        )),
    }
}
