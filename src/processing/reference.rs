//! 参考样品alpha峰积分
//!
//! 在两个固定通道窗口内对本底扣除后的计数求和：alpha*（次同位素峰）和
//! alpha（主峰），不确定度为窗口内 sqrt(Σ U²)。

use super::numeric::{clamp_window, window_quadrature, window_sum};
use crate::core::atom::Measured;
use crate::core::dataset::{ReferencePeaks, Series};
use crate::tools::constants::reference_peaks::{ALPHA_STAR_WINDOW, ALPHA_WINDOW};
use serde::Serialize;

/// 两个峰的积分窗口 [low, high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakWindows {
    pub alpha_star: (usize, usize),
    pub alpha: (usize, usize),
}

impl Default for PeakWindows {
    fn default() -> Self {
        Self {
            alpha_star: ALPHA_STAR_WINDOW,
            alpha: ALPHA_WINDOW,
        }
    }
}

/// 积分参考样品的两个alpha峰
pub fn integrate(corrected: &Series, windows: &PeakWindows) -> ReferencePeaks {
    let n = corrected.len();
    let peak = |(low, high): (usize, usize)| {
        let window = clamp_window(low, high, n);
        Measured::new(
            window_sum(&corrected.values, window.clone()),
            window_quadrature(&corrected.uncertainty, window),
        )
    };

    ReferencePeaks {
        alpha_star: peak(windows.alpha_star),
        alpha: peak(windows.alpha),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrates_both_windows() {
        let corr = Series::new(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            vec![0.0, 3.0, 4.0, 0.0, 6.0, 8.0],
        );
        let windows = PeakWindows {
            alpha_star: (1, 3),
            alpha: (4, 6),
        };
        let peaks = integrate(&corr, &windows);
        assert_relative_eq!(peaks.alpha_star.value, 5.0);
        assert_relative_eq!(peaks.alpha_star.uncertainty, 5.0);
        assert_relative_eq!(peaks.alpha.value, 11.0);
        assert_relative_eq!(peaks.alpha.uncertainty, 10.0);
    }

    #[test]
    fn test_windows_beyond_channels_integrate_to_zero() {
        let corr = Series::new(vec![1.0; 8], vec![1.0; 8]);
        let peaks = integrate(&corr, &PeakWindows::default());
        assert_eq!(peaks.alpha_star.value, 0.0);
        assert_eq!(peaks.alpha.uncertainty, 0.0);
    }
}
