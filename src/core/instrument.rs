//! 仪器常量
//!
//! 每次约化只加载一次：束流能量、通道数、零深度通道、alpha峰监测窗口、
//! 通道→能量线性刻度系数。

use crate::error::{NdpError, NdpResult};
use crate::processing::numeric::clamp_window;
use serde::Serialize;
use std::ops::Range;

/// 仪器常量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instrument {
    /// 配置标签
    pub configuration: String,

    /// 束流能量 (keV)
    pub beam_energy: f64,

    /// 探测器通道数
    pub num_channels: usize,

    /// 零深度参考通道
    pub zero_channel: usize,

    /// 监测器alpha峰求和窗口 [low, high)
    pub alpha_channels: (usize, usize),

    /// 线性刻度系数 (斜率 m, 截距 b)：Energy = m·channel + b
    pub calib_coeffs: (f64, f64),
}

impl Instrument {
    /// 校验常量的一致性，失败时在任何数值阶段之前终止
    pub fn validate(&self) -> NdpResult<()> {
        if self.num_channels == 0 {
            return Err(NdpError::Configuration("通道数必须大于0".to_string()));
        }

        if self.zero_channel >= self.num_channels {
            return Err(NdpError::Configuration(format!(
                "零通道({})超出通道范围(0..{})",
                self.zero_channel, self.num_channels
            )));
        }

        let (low, high) = self.alpha_channels;
        if low > high {
            return Err(NdpError::Configuration(format!(
                "alpha通道窗口无效: {low} > {high}"
            )));
        }

        if !self.beam_energy.is_finite() || self.beam_energy <= 0.0 {
            return Err(NdpError::Configuration(format!(
                "束流能量无效: {}",
                self.beam_energy
            )));
        }

        let (m, b) = self.calib_coeffs;
        if !m.is_finite() || !b.is_finite() {
            return Err(NdpError::Configuration(
                "刻度系数必须为有限值".to_string(),
            ));
        }

        Ok(())
    }

    /// 监测器窗口（已裁剪到通道范围）
    #[inline]
    pub fn alpha_window(&self) -> Range<usize> {
        clamp_window(self.alpha_channels.0, self.alpha_channels.1, self.num_channels)
    }

    /// 通道对应的能量
    #[inline]
    pub fn channel_energy(&self, channel: usize) -> f64 {
        let (m, b) = self.calib_coeffs;
        m * channel as f64 + b
    }
}
