//! 死时间校正
//!
//! Counts/Dt = Counts × RealTime / LiveTime，不确定度为 (Counts/Dt)/sqrt(Counts)。

use super::numeric::safe_divide;
use crate::core::dataset::{DeadTimeCorrected, Measurement, Series};

/// 对一个数据集做死时间校正
pub fn correct(measurement: &Measurement) -> DeadTimeCorrected {
    let ratio = safe_divide(measurement.live_time, measurement.real_time);
    let scale = safe_divide(measurement.real_time, measurement.live_time);

    let values: Vec<f64> = measurement.counts.iter().map(|&c| c * scale).collect();
    let uncertainty = values
        .iter()
        .zip(&measurement.counts)
        .map(|(&scaled, &raw)| safe_divide(scaled, raw.sqrt()))
        .collect();

    DeadTimeCorrected {
        ratio,
        counts: Series::new(values, uncertainty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn measurement(counts: Vec<f64>, live: f64, real: f64) -> Measurement {
        Measurement {
            counts,
            live_time: live,
            real_time: real,
            ..Measurement::default()
        }
    }

    #[test]
    fn test_scaling_and_uncertainty() {
        let result = correct(&measurement(vec![0.0, 4.0, 100.0], 8.0, 10.0));
        assert_relative_eq!(result.ratio, 0.8);
        assert_eq!(result.counts.values[0], 0.0);
        assert_relative_eq!(result.counts.values[1], 5.0);
        assert_relative_eq!(result.counts.uncertainty[1], 2.5);
        assert_relative_eq!(result.counts.uncertainty[2], 12.5);
        // 零计数：0/0 强制为0
        assert_eq!(result.counts.uncertainty[0], 0.0);
    }

    #[test]
    fn test_ratio_is_at_most_one() {
        for (live, real) in [(1.0, 1.0), (3.0, 7.0), (0.0, 2.0)] {
            let result = correct(&measurement(vec![1.0], live, real));
            assert!(result.ratio <= 1.0);
        }
    }

    #[test]
    fn test_zero_live_time_is_coerced() {
        let result = correct(&measurement(vec![5.0, 0.0], 0.0, 0.0));
        assert_eq!(result.ratio, 0.0);
        assert!(result.counts.values.iter().all(|v| v.is_finite()));
        assert!(result.counts.uncertainty.iter().all(|v| v.is_finite()));
    }
}
