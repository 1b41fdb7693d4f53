//! 本底扣除
//!
//! CorrCounts = Norm(X) − Norm(本底)，不确定度为两者绝对不确定度的正交和。

use crate::core::dataset::{Normalized, Series};

/// 从归一化数据中扣除归一化本底
pub fn subtract(data: &Normalized, background: &Normalized) -> Series {
    let values = data
        .counts
        .values
        .iter()
        .zip(&background.counts.values)
        .map(|(&x, &bg)| x - bg)
        .collect();

    let uncertainty = data
        .counts
        .uncertainty
        .iter()
        .zip(&background.counts.uncertainty)
        .map(|(&ux, &ubg)| (ux * ux + ubg * ubg).sqrt())
        .collect();

    Series::new(values, uncertainty)
}
