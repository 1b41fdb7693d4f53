//! 约化流程协调器
//!
//! 按固定顺序编排各阶段：射程模型 → 通道刻度 → 计数汇总 → 死时间 → 归一化 →
//! 本底扣除 → 参考峰积分 → 参考定标 → 分箱。每个阶段从 [`SampleState`] 读取前置结果，
//! 调用纯函数计算，再把结果提交回自己的槽位。

use super::aggregate::{self, CountRecord};
use super::background;
use super::binning;
use super::deadtime;
use super::normalize;
use super::reference::{self, PeakWindows};
use super::scale;
use crate::core::atom::{AtomTable, ScaleInputs};
use crate::core::calibration::DetectorProfile;
use crate::core::dataset::DatasetRole;
use crate::core::range_model::{RangeFit, RangeProfile};
use crate::core::state::SampleState;
use crate::error::NdpResult;
use crate::tools::constants::defaults;

/// 约化参数（每次运行由外部注入）
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionSettings {
    /// 分箱宽度
    pub bin_width: usize,

    /// 参考峰积分窗口
    pub peak_windows: PeakWindows,

    /// 核素查找表
    pub atoms: AtomTable,

    /// 参考定标常量
    pub scale: ScaleInputs,
}

impl Default for ReductionSettings {
    fn default() -> Self {
        Self {
            bin_width: defaults::BIN_WIDTH,
            peak_windows: PeakWindows::default(),
            atoms: AtomTable::default(),
            scale: ScaleInputs::default(),
        }
    }
}

/// 约化流程
#[derive(Debug, Clone, Default)]
pub struct ReductionPipeline {
    settings: ReductionSettings,
}

impl ReductionPipeline {
    pub fn new(settings: ReductionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReductionSettings {
        &self.settings
    }

    /// 拟合射程模型并计算逐通道深度
    pub fn calibrate(&self, state: &mut SampleState, profiles: &[RangeProfile]) -> NdpResult<()> {
        let fit = RangeFit::fit(state.instrument().beam_energy, profiles)?;
        let detector = DetectorProfile::calibrate(state.instrument(), &fit)?;
        tracing::info!(
            coeffs = ?fit.coeffs,
            anchor_residual = fit.anchor_residual(),
            "detector calibrated"
        );
        state.commit_calibration(fit, detector)
    }

    /// 汇总一个数据集的计数文件
    pub fn load(
        &self,
        state: &mut SampleState,
        role: DatasetRole,
        records: &[CountRecord],
    ) -> NdpResult<()> {
        let measurement = aggregate::aggregate(role, records, state.num_channels())?;
        state.dataset_mut(role).commit_measurement(measurement);
        Ok(())
    }

    /// 死时间校正（给定角色）
    pub fn apply_deadtime(&self, state: &mut SampleState, roles: &[DatasetRole]) -> NdpResult<()> {
        for &role in roles {
            let result = deadtime::correct(state.dataset(role).measurement()?);
            tracing::debug!(role = %role, ratio = result.ratio, "deadtime scaled");
            state.dataset_mut(role).commit_deadtime(result);
        }
        Ok(())
    }

    /// 用配对监测器归一化数据集
    pub fn normalize(&self, state: &mut SampleState, roles: &[DatasetRole]) -> NdpResult<()> {
        let window = state.instrument().alpha_window();
        for &role in roles {
            let Some(monitor_role) = role.monitor() else {
                tracing::warn!(role = %role, "monitor dataset cannot be normalized, skipped");
                continue;
            };
            let result = normalize::normalize(
                state.dataset(role).deadtime()?,
                state.dataset(monitor_role).deadtime()?,
                window.clone(),
            );
            tracing::debug!(role = %role, monitor = result.monitor.value, "normalized");
            state.dataset_mut(role).commit_normalized(result);
        }
        Ok(())
    }

    /// 扣除本底数据
    pub fn correct(&self, state: &mut SampleState, roles: &[DatasetRole]) -> NdpResult<()> {
        for &role in roles {
            let result = background::subtract(
                state.dataset(role).normalized()?,
                state.dataset(DatasetRole::BackgroundData).normalized()?,
            );
            state.dataset_mut(role).commit_corrected(result);
        }
        Ok(())
    }

    /// 积分参考样品的alpha峰
    pub fn integrate_reference(&self, state: &mut SampleState) -> NdpResult<()> {
        let role = DatasetRole::ReferenceData;
        let peaks = reference::integrate(
            state.dataset(role).corrected()?,
            &self.settings.peak_windows,
        );
        tracing::debug!(
            alpha_star = peaks.alpha_star.value,
            alpha = peaks.alpha.value,
            "reference peaks integrated"
        );
        state.dataset_mut(role).commit_peaks(peaks);
        Ok(())
    }

    /// 样品换算为面/体浓度
    pub fn scale_to_reference(&self, state: &mut SampleState) -> NdpResult<()> {
        let role = DatasetRole::SampleData;
        let concentration = scale::scale_to_reference(
            state.dataset(role).corrected()?,
            state.dataset(DatasetRole::ReferenceData).peaks()?,
            &self.settings.scale,
            &self.settings.atoms,
            state.detector()?,
        )?;
        state.dataset_mut(role).commit_concentration(concentration);
        Ok(())
    }

    /// 样品剖面分箱
    pub fn bin(&self, state: &mut SampleState) -> NdpResult<()> {
        let binned = binning::bin_channels(
            state.detector()?,
            state.dataset(DatasetRole::SampleData).concentration()?,
            self.settings.bin_width,
        )?;
        state.commit_binned(binned);
        Ok(())
    }

    /// 依次执行全部校正阶段（要求刻度和六个数据集均已加载）
    pub fn run_corrections(&self, state: &mut SampleState) -> NdpResult<()> {
        self.apply_deadtime(state, &DatasetRole::ALL)?;
        self.normalize(state, &DatasetRole::DATA)?;
        self.correct(
            state,
            &[DatasetRole::SampleData, DatasetRole::ReferenceData],
        )?;
        self.integrate_reference(state)?;
        self.scale_to_reference(state)?;
        self.bin(state)?;
        tracing::info!(bins = state.binned()?.len(), "reduction complete");
        Ok(())
    }
}
