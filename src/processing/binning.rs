//! 通道分箱
//!
//! 把逐通道剖面聚合成较粗的深度箱：能量和深度取中位数，浓度取平均，
//! 不确定度取 sqrt(Σ U²)/w（合并不确定度除以通道数的近似）。
//!
//! 箱数为 floor(N/w)+1。最后一个箱覆盖 [(箱数-1)·w, N)，不确定度除数为 N mod w；
//! 当该范围为空或余数为0时结果为0。
//!
//! 最后一个箱从 (箱数-1)·w 开始，不与前一箱重叠，并且包含通道 N-1。

use super::numeric::{mean, median, quadrature, safe_divide};
use crate::core::calibration::DetectorProfile;
use crate::core::dataset::{Concentration, Series};
use crate::error::{NdpError, NdpResult};
use serde::Serialize;
use std::ops::Range;

/// 分箱后的剖面（六列等长）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedProfile {
    /// 箱宽（通道数）
    pub width: usize,

    /// 能量中位数 (keV)
    pub energy: Vec<f64>,

    /// 修正深度中位数 (nm)
    pub depth: Vec<f64>,

    /// atoms/cm² 平均值及合并不确定度
    pub areal: Series,

    /// atoms/cm³ 平均值及合并不确定度
    pub volumetric: Series,
}

impl BinnedProfile {
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// 第 i 行：(Energy, Depth, Atoms/cm2, Uncert, Atoms/cm3, Uncert)
    pub fn row(&self, i: usize) -> [f64; 6] {
        [
            self.energy[i],
            self.depth[i],
            self.areal.values[i],
            self.areal.uncertainty[i],
            self.volumetric.values[i],
            self.volumetric.uncertainty[i],
        ]
    }
}

/// 每个箱的通道范围及不确定度除数
fn bin_layout(num_channels: usize, width: usize) -> Vec<(Range<usize>, usize)> {
    let num_bins = num_channels / width + 1;
    let mut layout: Vec<(Range<usize>, usize)> = (0..num_bins - 1)
        .map(|b| (b * width..(b + 1) * width, width))
        .collect();

    let last_start = (num_bins - 1) * width;
    layout.push((last_start..num_channels, num_channels % width));
    layout
}

/// 对样品剖面分箱
///
/// # 错误
///
/// * `NdpError::InvalidInput` - 箱宽为0或序列长度不一致
pub fn bin_channels(
    detector: &DetectorProfile,
    concentration: &Concentration,
    width: usize,
) -> NdpResult<BinnedProfile> {
    if width == 0 {
        return Err(NdpError::InvalidInput("分箱宽度必须大于0".to_string()));
    }

    let n = detector.num_channels();
    if concentration.areal.len() != n || concentration.volumetric.len() != n {
        return Err(NdpError::InvalidInput(format!(
            "浓度序列长度与通道数({n})不一致"
        )));
    }

    let layout = bin_layout(n, width);
    let pooled = |u: &[f64], range: &Range<usize>, divisor: usize| {
        safe_divide(quadrature(&u[range.clone()]), divisor as f64)
    };

    let mut binned = BinnedProfile {
        width,
        energy: Vec::with_capacity(layout.len()),
        depth: Vec::with_capacity(layout.len()),
        areal: Series::default(),
        volumetric: Series::default(),
    };

    for (range, divisor) in &layout {
        binned.energy.push(median(&detector.energy[range.clone()]));
        binned
            .depth
            .push(median(&detector.corrected_depth[range.clone()]));

        binned
            .areal
            .values
            .push(mean(&concentration.areal.values[range.clone()]));
        binned
            .areal
            .uncertainty
            .push(pooled(&concentration.areal.uncertainty, range, *divisor));

        binned
            .volumetric
            .values
            .push(mean(&concentration.volumetric.values[range.clone()]));
        binned
            .volumetric
            .uncertainty
            .push(pooled(&concentration.volumetric.uncertainty, range, *divisor));
    }

    tracing::debug!(bins = binned.len(), width, "channels binned");
    Ok(binned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn profile(n: usize) -> (DetectorProfile, Concentration) {
        let ramp: Vec<f64> = (0..n).map(|c| c as f64).collect();
        let detector = DetectorProfile {
            energy: ramp.clone(),
            depth: ramp.clone(),
            corrected_depth: ramp.iter().map(|c| 2.0 * c).collect(),
            del_depth: vec![1.0; n],
            del_depth_uncert: vec![0.05; n],
        };
        let conc = Concentration {
            areal: Series::new(ramp.iter().map(|c| 10.0 * c).collect(), vec![2.0; n]),
            volumetric: Series::new(ramp.iter().map(|c| 100.0 * c).collect(), vec![3.0; n]),
        };
        (detector, conc)
    }

    #[test]
    fn test_layout_with_ragged_tail() {
        let layout = bin_layout(10, 4);
        assert_eq!(layout, vec![(0..4, 4), (4..8, 4), (8..10, 2)]);
    }

    #[test]
    fn test_full_and_ragged_bins() {
        let (det, conc) = profile(10);
        let binned = bin_channels(&det, &conc, 4).unwrap();
        assert_eq!(binned.len(), 3);

        assert_relative_eq!(binned.energy[0], 1.5);
        assert_relative_eq!(binned.depth[0], 3.0);
        assert_relative_eq!(binned.areal.values[0], 15.0);
        // sqrt(4·2²)/4
        assert_relative_eq!(binned.areal.uncertainty[0], 1.0);

        // 最后一个箱 [8, 10)，除数 10 mod 4 = 2
        assert_relative_eq!(binned.energy[2], 8.5);
        assert_relative_eq!(binned.volumetric.values[2], 850.0);
        assert_relative_eq!(binned.volumetric.uncertainty[2], (2.0f64 * 9.0).sqrt() / 2.0);
    }

    #[test]
    fn test_width_equal_to_channel_count() {
        let (det, conc) = profile(8);
        let binned = bin_channels(&det, &conc, 8).unwrap();
        assert_eq!(binned.len(), 2);
        assert_relative_eq!(binned.areal.values[0], mean(&conc.areal.values));
        // 余数为0：最后一个箱为空，结果为0
        assert_eq!(binned.row(1), [0.0; 6]);
    }

    #[test]
    fn test_width_one_reproduces_channels() {
        let (det, conc) = profile(5);
        let binned = bin_channels(&det, &conc, 1).unwrap();
        assert_eq!(binned.len(), 6);
        for c in 0..5 {
            assert_eq!(binned.energy[c], det.energy[c]);
            assert_eq!(binned.depth[c], det.corrected_depth[c]);
            assert_eq!(binned.areal.values[c], conc.areal.values[c]);
            assert_eq!(binned.areal.uncertainty[c], conc.areal.uncertainty[c]);
            assert_eq!(binned.volumetric.values[c], conc.volumetric.values[c]);
        }
        assert!(binned.row(5).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_width_rejected() {
        let (det, conc) = profile(4);
        assert!(matches!(
            bin_channels(&det, &conc, 0),
            Err(NdpError::InvalidInput(_))
        ));
    }
}
