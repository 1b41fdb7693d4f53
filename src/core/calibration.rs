//! 通道→能量→深度刻度
//!
//! 生成每个通道的能量、深度、修正深度（零通道处为0）以及体浓度所需的
//! 通道深度间隔宽度及其不确定度。

use crate::core::instrument::Instrument;
use crate::core::range_model::RangeFit;
use crate::error::NdpResult;
use crate::tools::constants::physics::{DEL_DEPTH_UNCERT_FRACTION, NM_TO_CM};
use serde::Serialize;

/// 探测器逐通道刻度量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorProfile {
    /// 能量 (keV)
    pub energy: Vec<f64>,

    /// 由射程模型得到的深度 (nm)
    pub depth: Vec<f64>,

    /// 以零通道为原点的深度 (nm)
    pub corrected_depth: Vec<f64>,

    /// 通道深度间隔 (cm)，带符号
    pub del_depth: Vec<f64>,

    /// 深度间隔不确定度 (cm)
    pub del_depth_uncert: Vec<f64>,
}

impl DetectorProfile {
    /// 由仪器刻度和射程模型计算逐通道深度
    pub fn calibrate(instrument: &Instrument, fit: &RangeFit) -> NdpResult<Self> {
        instrument.validate()?;

        let energy: Vec<f64> = (0..instrument.num_channels)
            .map(|ch| instrument.channel_energy(ch))
            .collect();
        let depth: Vec<f64> = energy.iter().map(|&e| fit.thickness(e)).collect();

        let origin = depth[instrument.zero_channel];
        let corrected_depth: Vec<f64> = depth.iter().map(|&d| d - origin).collect();

        let del_depth = channel_widths(&corrected_depth);
        let del_depth_uncert = del_depth
            .iter()
            .map(|&d| DEL_DEPTH_UNCERT_FRACTION * d)
            .collect();

        Ok(Self {
            energy,
            depth,
            corrected_depth,
            del_depth,
            del_depth_uncert,
        })
    }

    pub fn num_channels(&self) -> usize {
        self.energy.len()
    }
}

/// 通道深度间隔：1e-7·(d[c-1] - d[c])，c ∈ [0, N-1)
///
/// c = 0 读取 d[N-1]（环绕到最后一个通道），最后一个通道不计算，保持为0。
pub fn channel_widths(corrected_depth: &[f64]) -> Vec<f64> {
    let n = corrected_depth.len();
    let mut widths = vec![0.0; n];
    for c in 0..n.saturating_sub(1) {
        let previous = corrected_depth[(c + n - 1) % n];
        widths[c] = NM_TO_CM * (previous - corrected_depth[c]);
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn instrument(n: usize, zero: usize) -> Instrument {
        Instrument {
            configuration: "test".to_string(),
            beam_energy: 1472.0,
            num_channels: n,
            zero_channel: zero,
            alpha_channels: (0, n),
            calib_coeffs: (1.0, 0.0),
        }
    }

    fn linear_fit() -> RangeFit {
        // depth = 1472 - E
        RangeFit {
            coeffs: [0.0, -1.0, 1472.0],
            points: vec![(1472.0, 0.0)],
        }
    }

    #[test]
    fn test_corrected_depth_is_zero_at_zero_channel() {
        let profile = DetectorProfile::calibrate(&instrument(8, 2), &linear_fit()).unwrap();
        assert_eq!(profile.corrected_depth[2], 0.0);
        assert_eq!(profile.energy, (0..8).map(|c| c as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_del_depth_wraps_at_channel_zero() {
        let profile = DetectorProfile::calibrate(&instrument(8, 2), &linear_fit()).unwrap();
        let cd = &profile.corrected_depth;

        // 通道0读取最后一个通道
        assert_relative_eq!(profile.del_depth[0], 1e-7 * (cd[7] - cd[0]));
        // 常规通道：深度随能量递减，间隔为正
        assert_relative_eq!(profile.del_depth[3], 1e-7 * 1.0);
        // 最后一个通道不计算
        assert_eq!(profile.del_depth[7], 0.0);
    }

    #[test]
    fn test_del_depth_uncertainty_is_five_percent() {
        let profile = DetectorProfile::calibrate(&instrument(8, 2), &linear_fit()).unwrap();
        for (d, u) in profile.del_depth.iter().zip(&profile.del_depth_uncert) {
            assert_relative_eq!(*u, 0.05 * d);
        }
    }

    #[test]
    fn test_single_channel_has_no_widths() {
        assert_eq!(channel_widths(&[3.0]), vec![0.0]);
        assert!(channel_widths(&[]).is_empty());
    }
}
