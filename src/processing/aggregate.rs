//! 计数文件汇总
//!
//! 同一逻辑数据集的多个重复采集文件逐通道求和，累加活时间与真实时间。

use crate::core::dataset::{DatasetRole, Measurement};
use crate::error::{NdpError, NdpResult};
use chrono::NaiveDateTime;

/// 单个原始计数文件的解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct CountRecord {
    /// 来源文件标识
    pub source: String,

    /// 探测器名称
    pub detector: String,

    /// 标签
    pub label: String,

    /// 采集开始时间（无法解析时为None）
    pub start_time: Option<NaiveDateTime>,

    /// 活时间 (s)
    pub live_time: f64,

    /// 真实时间 (s)
    pub real_time: f64,

    /// (通道, 计数) 对
    pub channels: Vec<(usize, f64)>,
}

/// 汇总一个数据集的全部计数文件
///
/// 采集时间只取第一个文件；探测器名称和标签按文件顺序追加，不去重。
///
/// # 错误
///
/// * `NdpError::Discovery` - 文件列表为空
/// * `NdpError::MalformedRecord` - 条目数不等于通道数，或通道号与行位置不符
pub fn aggregate(
    role: DatasetRole,
    records: &[CountRecord],
    num_channels: usize,
) -> NdpResult<Measurement> {
    if records.is_empty() {
        return Err(NdpError::Discovery(format!("数据集 {role} 没有任何计数文件")));
    }

    let mut measurement = Measurement {
        counts: vec![0.0; num_channels],
        ..Measurement::default()
    };

    for (index, record) in records.iter().enumerate() {
        if record.channels.len() != num_channels {
            return Err(NdpError::MalformedRecord {
                file: record.source.clone(),
                reason: format!(
                    "{role}: 通道条目数({})与通道数({num_channels})不一致",
                    record.channels.len()
                ),
            });
        }

        // 第 i 行必须是通道 i
        for (position, (&(channel, count), slot)) in
            record.channels.iter().zip(&mut measurement.counts).enumerate()
        {
            if channel != position {
                return Err(NdpError::MalformedRecord {
                    file: record.source.clone(),
                    reason: format!("{role}: 第{position}个条目的通道号为 {channel}，应为 {position}"),
                });
            }
            *slot += count;
        }

        if index == 0 {
            measurement.datetime = record.start_time;
        }
        measurement.files.push(record.source.clone());
        measurement.detectors.push(record.detector.clone());
        measurement.labels.push(record.label.clone());
        measurement.live_time += record.live_time;
        measurement.real_time += record.real_time;
    }

    tracing::debug!(
        role = %role,
        files = records.len(),
        live_time = measurement.live_time,
        real_time = measurement.real_time,
        "channel sum"
    );

    Ok(measurement)
}
