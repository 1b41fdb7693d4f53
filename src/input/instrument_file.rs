//! 仪器参数文件读取
//!
//! 固定行布局（0起行号）：
//! - 4: 配置标签　5: 束流能量 (keV)　6: 通道数　7: 零通道
//! - 9, 10: alpha通道窗口下限/上限
//! - 12, 13: 刻度斜率/截距

use super::{field_value, line_at};
use crate::core::instrument::Instrument;
use crate::error::{NdpError, NdpResult, configuration_error};
use std::path::Path;
use std::str::FromStr;

const CONFIGURATION_LINE: usize = 4;
const BEAM_ENERGY_LINE: usize = 5;
const NUM_CHANNELS_LINE: usize = 6;
const ZERO_CHANNEL_LINE: usize = 7;
const ALPHA_LOW_LINE: usize = 9;
const ALPHA_HIGH_LINE: usize = 10;
const CALIB_SLOPE_LINE: usize = 12;
const CALIB_INTERCEPT_LINE: usize = 13;

/// 读取并校验仪器参数文件
pub fn read_instrument(path: &Path) -> NdpResult<Instrument> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        NdpError::Configuration(format!("无法读取仪器参数文件 {}: {e}", path.display()))
    })?;
    parse_instrument_text(&text)
}

/// 解析仪器参数文本
pub fn parse_instrument_text(text: &str) -> NdpResult<Instrument> {
    let lines: Vec<&str> = text.lines().collect();

    let instrument = Instrument {
        configuration: field_value(line(&lines, CONFIGURATION_LINE, "配置标签")?).to_string(),
        beam_energy: parse_field(&lines, BEAM_ENERGY_LINE, "束流能量")?,
        num_channels: parse_field(&lines, NUM_CHANNELS_LINE, "通道数")?,
        zero_channel: parse_field(&lines, ZERO_CHANNEL_LINE, "零通道")?,
        alpha_channels: (
            parse_field(&lines, ALPHA_LOW_LINE, "alpha通道下限")?,
            parse_field(&lines, ALPHA_HIGH_LINE, "alpha通道上限")?,
        ),
        calib_coeffs: (
            parse_field(&lines, CALIB_SLOPE_LINE, "刻度斜率")?,
            parse_field(&lines, CALIB_INTERCEPT_LINE, "刻度截距")?,
        ),
    };

    instrument.validate()?;
    Ok(instrument)
}

fn line<'a>(lines: &[&'a str], index: usize, name: &str) -> NdpResult<&'a str> {
    line_at(lines, index, || {
        NdpError::Configuration(format!("仪器参数文件缺少第{}行（{name}）", index + 1))
    })
}

fn parse_field<T>(lines: &[&str], index: usize, name: &str) -> NdpResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field_value(line(lines, index, name)?);
    raw.parse::<T>()
        .map_err(|e| configuration_error(&format!("{name} '{raw}'"), e))
}
