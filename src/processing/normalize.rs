//! 监测器归一化
//!
//! 数据计数除以配对监测器在alpha峰窗口内的死时间校正计数和，
//! 相对不确定度按正交方式合成。

use super::numeric::{relative_sq, safe_divide, window_sum};
use crate::core::atom::Measured;
use crate::core::dataset::{DeadTimeCorrected, Normalized, Series};
use std::ops::Range;

/// 监测器窗口求和，不确定度为 sqrt(和)
pub fn monitor_sum(monitor: &DeadTimeCorrected, window: Range<usize>) -> Measured {
    let sum = window_sum(&monitor.counts.values, window);
    Measured::new(sum, sum.max(0.0).sqrt())
}

/// 用监测器归一化一个数据集
pub fn normalize(
    data: &DeadTimeCorrected,
    monitor: &DeadTimeCorrected,
    window: Range<usize>,
) -> Normalized {
    let mon = monitor_sum(monitor, window);
    let monitor_rel = relative_sq(mon.uncertainty, mon.value);

    let values: Vec<f64> = data
        .counts
        .values
        .iter()
        .map(|&c| safe_divide(c, mon.value))
        .collect();

    let uncertainty = values
        .iter()
        .zip(data.counts.values.iter().zip(&data.counts.uncertainty))
        .map(|(&norm, (&cdt, &cdt_u))| norm * (relative_sq(cdt_u, cdt) + monitor_rel).sqrt())
        .collect();

    Normalized {
        monitor: mon,
        counts: Series::new(values, uncertainty),
    }
}
