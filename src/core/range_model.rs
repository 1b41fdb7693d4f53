//! TRIM射程模型
//!
//! 由一组离子输运模拟结果拟合能量→厚度的二次多项式：
//! - 每个模拟取能量列中位数（eV→keV）与深度列平均值（Å→nm）
//! - 在最前面加入锚点 (束流能量, 厚度0)
//! - 最小二乘拟合 Thickness(E) = a·E² + b·E + c

use crate::error::{NdpError, NdpResult};
use crate::processing::numeric::{mean, median};
use crate::tools::constants::physics::{ANGSTROM_PER_NM, EV_PER_KEV};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// 单次模拟导出的 (中位能量, 平均厚度) 点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeProfile {
    /// 来源文件标识
    pub source: String,

    /// 中位能量 (keV)
    pub median_energy: f64,

    /// 平均厚度 (nm)
    pub mean_thickness: f64,
}

impl RangeProfile {
    /// 由原始 (能量eV, 深度Å) 采样点构建
    pub fn from_samples(source: &str, samples: &[(f64, f64)]) -> NdpResult<Self> {
        if samples.is_empty() {
            return Err(NdpError::MalformedRecord {
                file: source.to_string(),
                reason: "TRIM模拟没有可用数据行".to_string(),
            });
        }

        let energies: Vec<f64> = samples.iter().map(|s| s.0).collect();
        let depths: Vec<f64> = samples.iter().map(|s| s.1).collect();

        Ok(Self {
            source: source.to_string(),
            median_energy: median(&energies) / EV_PER_KEV,
            mean_thickness: mean(&depths) / ANGSTROM_PER_NM,
        })
    }
}

/// 二次拟合结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeFit {
    /// 多项式系数 [a, b, c]（最高次在前）
    pub coeffs: [f64; 3],

    /// 参与拟合的点（第一个为锚点）
    pub points: Vec<(f64, f64)>,
}

impl RangeFit {
    /// 拟合射程模型
    ///
    /// # 错误
    ///
    /// * `NdpError::Discovery` - 没有任何模拟结果
    /// * `NdpError::InvalidInput` - 拟合矩阵无法求解（非有限输入）
    pub fn fit(beam_energy: f64, profiles: &[RangeProfile]) -> NdpResult<Self> {
        if profiles.is_empty() {
            return Err(NdpError::Discovery(
                "射程模型至少需要一个TRIM模拟文件".to_string(),
            ));
        }

        let mut points = Vec::with_capacity(profiles.len() + 1);
        points.push((beam_energy, 0.0));
        points.extend(profiles.iter().map(|p| (p.median_energy, p.mean_thickness)));

        let coeffs = polyfit2(&points)?;
        tracing::debug!(?coeffs, points = points.len(), "range model fitted");

        Ok(Self { coeffs, points })
    }

    /// 给定能量的厚度 (nm)
    #[inline]
    pub fn thickness(&self, energy: f64) -> f64 {
        let [a, b, c] = self.coeffs;
        a * energy * energy + b * energy + c
    }

    /// 锚点处的拟合残差
    pub fn anchor_residual(&self) -> f64 {
        let (energy, thickness) = self.points[0];
        self.thickness(energy) - thickness
    }
}

/// 二次多项式最小二乘（列缩放 + SVD，秩亏时取最小范数解）
fn polyfit2(points: &[(f64, f64)]) -> NdpResult<[f64; 3]> {
    let rows = points.len();
    let mut vander = DMatrix::from_fn(rows, 3, |r, c| points[r].0.powi(2 - c as i32));
    let y = DVector::from_iterator(rows, points.iter().map(|p| p.1));

    if vander.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(NdpError::InvalidInput(
            "射程拟合输入包含非有限值".to_string(),
        ));
    }

    let mut scale = [1.0; 3];
    for (col, s) in scale.iter_mut().enumerate() {
        let norm = vander.column(col).norm();
        if norm > 0.0 {
            *s = norm;
            vander.column_mut(col).unscale_mut(norm);
        }
    }

    let svd = vander.svd(true, true);
    let rcond = rows as f64 * f64::EPSILON * svd.singular_values.max();
    let solution = svd
        .solve(&y, rcond)
        .map_err(|e| NdpError::InvalidInput(format!("射程拟合求解失败: {e}")))?;

    Ok([
        solution[0] / scale[0],
        solution[1] / scale[1],
        solution[2] / scale[2],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn profile(energy: f64, thickness: f64) -> RangeProfile {
        RangeProfile {
            source: "sim".to_string(),
            median_energy: energy,
            mean_thickness: thickness,
        }
    }

    #[test]
    fn test_profile_from_samples_units() {
        let samples = [(1_400_000.0, 100.0), (1_300_000.0, 300.0), (1_200_000.0, 200.0)];
        let p = RangeProfile::from_samples("t.txt", &samples).unwrap();
        assert_relative_eq!(p.median_energy, 1300.0);
        assert_relative_eq!(p.mean_thickness, 20.0);
    }

    #[test]
    fn test_profile_without_samples_is_malformed() {
        let result = RangeProfile::from_samples("empty.txt", &[]);
        assert!(matches!(result, Err(NdpError::MalformedRecord { .. })));
    }

    #[test]
    fn test_fit_recovers_exact_quadratic() {
        // thickness = 0.001·(1472 - E)² + 2·(1472 - E)
        let truth = |e: f64| 0.001 * (1472.0 - e).powi(2) + 2.0 * (1472.0 - e);
        let profiles: Vec<_> = [1400.0, 1300.0, 1100.0, 900.0]
            .iter()
            .map(|&e| profile(e, truth(e)))
            .collect();

        let fit = RangeFit::fit(1472.0, &profiles).unwrap();
        for &e in &[1472.0, 1350.0, 1000.0] {
            assert_relative_eq!(fit.thickness(e), truth(e), epsilon = 1e-6, max_relative = 1e-8);
        }
        assert!(fit.anchor_residual().abs() < 1e-6);
    }

    #[test]
    fn test_fit_with_single_profile_passes_through_anchor() {
        let fit = RangeFit::fit(1472.0, &[profile(1200.0, 500.0)]).unwrap();
        assert_eq!(fit.points.len(), 2);
        assert!(fit.anchor_residual().abs() < 1e-6);
        assert_relative_eq!(fit.thickness(1200.0), 500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_requires_a_profile() {
        assert!(matches!(
            RangeFit::fit(1472.0, &[]),
            Err(NdpError::Discovery(_))
        ));
    }
}
