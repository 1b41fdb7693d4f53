//! 单次约化的累积状态
//!
//! 一个样品的全部数据集、刻度结果和分箱结果。只由约化流程按顺序写入，
//! 流程外不做任何修改。

use crate::core::calibration::DetectorProfile;
use crate::core::dataset::{Dataset, DatasetRole};
use crate::core::instrument::Instrument;
use crate::core::range_model::RangeFit;
use crate::error::{NdpError, NdpResult, stage_not_ready};
use crate::processing::binning::BinnedProfile;

/// 单次约化的样品状态
#[derive(Debug, Clone)]
pub struct SampleState {
    instrument: Instrument,
    range_fit: Option<RangeFit>,
    detector: Option<DetectorProfile>,
    datasets: Vec<Dataset>,
    binned: Option<BinnedProfile>,
}

impl SampleState {
    /// 以校验过的仪器常量创建空状态
    pub fn new(instrument: Instrument) -> NdpResult<Self> {
        instrument.validate()?;
        Ok(Self {
            instrument,
            range_fit: None,
            detector: None,
            datasets: DatasetRole::ALL.iter().map(|&r| Dataset::new(r)).collect(),
            binned: None,
        })
    }

    #[inline]
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.instrument.num_channels
    }

    #[inline]
    pub fn dataset(&self, role: DatasetRole) -> &Dataset {
        &self.datasets[role.index()]
    }

    #[inline]
    pub fn dataset_mut(&mut self, role: DatasetRole) -> &mut Dataset {
        &mut self.datasets[role.index()]
    }

    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn range_fit(&self) -> NdpResult<&RangeFit> {
        self.range_fit
            .as_ref()
            .ok_or_else(|| stage_not_ready("TRIM", "Range Fit"))
    }

    pub fn detector(&self) -> NdpResult<&DetectorProfile> {
        self.detector
            .as_ref()
            .ok_or_else(|| stage_not_ready("Detector", "Calibration"))
    }

    pub fn binned(&self) -> NdpResult<&BinnedProfile> {
        self.binned
            .as_ref()
            .ok_or_else(|| stage_not_ready(DatasetRole::SampleData, "Binned"))
    }

    pub fn commit_calibration(&mut self, fit: RangeFit, detector: DetectorProfile) -> NdpResult<()> {
        if detector.num_channels() != self.num_channels() {
            return Err(NdpError::InvalidInput(format!(
                "刻度通道数({})与仪器通道数({})不一致",
                detector.num_channels(),
                self.num_channels()
            )));
        }
        self.range_fit = Some(fit);
        self.detector = Some(detector);
        Ok(())
    }

    pub fn commit_binned(&mut self, binned: BinnedProfile) {
        self.binned = Some(binned);
    }
}
