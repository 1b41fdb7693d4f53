//! 数值辅助函数
//!
//! 所有比值都经过 [`safe_divide`]：分母为零或结果非有限值时返回0，
//! 不依赖任何全局浮点陷阱模式。零信号边缘通道的退化在这里被吸收。

use std::ops::Range;

/// 安全除法：0/0、n/0 以及任何非有限结果都返回0
#[inline]
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// 相对不确定度的平方 (u/v)²，v为零时为0
#[inline]
pub fn relative_sq(uncertainty: f64, value: f64) -> f64 {
    safe_divide(uncertainty, value).powi(2)
}

/// 平方和开方（绝对量的正交合成）
#[inline]
pub fn quadrature(terms: &[f64]) -> f64 {
    terms.iter().map(|t| t * t).sum::<f64>().sqrt()
}

/// 将 [low, high) 窗口裁剪到 [0, len)，行为与切片越界截断一致
#[inline]
pub fn clamp_window(low: usize, high: usize, len: usize) -> Range<usize> {
    let start = low.min(len);
    let end = high.min(len).max(start);
    start..end
}

/// 窗口内求和
#[inline]
pub fn window_sum(values: &[f64], window: Range<usize>) -> f64 {
    values[window].iter().sum()
}

/// 窗口内平方和开方，用于积分区间的不确定度
#[inline]
pub fn window_quadrature(uncertainties: &[f64], window: Range<usize>) -> f64 {
    quadrature(&uncertainties[window])
}

/// 算术平均，空切片返回0
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 中位数（偶数长度取中间两值的平均），空切片返回0
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_divide_degenerate_cases() {
        assert_eq!(safe_divide(0.0, 0.0), 0.0);
        assert_eq!(safe_divide(5.0, 0.0), 0.0);
        assert_eq!(safe_divide(-5.0, 0.0), 0.0);
        assert_eq!(safe_divide(f64::NAN, 2.0), 0.0);
        assert_eq!(safe_divide(6.0, 3.0), 2.0);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_clamp_window_like_slicing() {
        assert_eq!(clamp_window(2, 6, 8), 2..6);
        assert_eq!(clamp_window(1791, 2142, 8), 8..8);
        assert_eq!(clamp_window(5, 20, 8), 5..8);
        assert_eq!(clamp_window(6, 2, 8), 6..6);
    }

    #[test]
    fn test_window_quadrature() {
        let u = [3.0, 4.0, 12.0];
        assert_eq!(window_quadrature(&u, 0..2), 5.0);
        assert_eq!(window_quadrature(&u, 0..3), 13.0);
    }
}
