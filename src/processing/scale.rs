//! 参考定标
//!
//! 用参考样品alpha*峰积分把本底扣除后的样品计数换算为面浓度 (atoms/cm²)，
//! 再除以通道深度间隔得到体浓度 (atoms/cm³)。
//!
//! ```text
//! ScaleCoeff = (RefConc × RefCrossSection) / (RefAlphaStar × SampleCrossSection)
//! Atoms/cm2  = ScaleCoeff × SampleCorr / (BranchFraction × Abundance)
//! Atoms/cm3  = Atoms/cm2 / DelDepth
//! ```

use super::numeric::{relative_sq, safe_divide};
use crate::core::atom::{AtomTable, ScaleInputs};
use crate::core::calibration::DetectorProfile;
use crate::core::dataset::{Concentration, ReferencePeaks, Series};
use crate::error::{NdpError, NdpResult};

/// 换算样品浓度
///
/// # 错误
///
/// * `NdpError::Configuration` - 核素不在查找表中
/// * `NdpError::InvalidInput` - 通道数与刻度不一致
pub fn scale_to_reference(
    sample_corrected: &Series,
    peaks: &ReferencePeaks,
    inputs: &ScaleInputs,
    atoms: &AtomTable,
    detector: &DetectorProfile,
) -> NdpResult<Concentration> {
    if sample_corrected.len() != detector.num_channels() {
        return Err(NdpError::InvalidInput(format!(
            "样品通道数({})与刻度通道数({})不一致",
            sample_corrected.len(),
            detector.num_channels()
        )));
    }

    let sample = atoms.get(&inputs.sample_nuclide)?;
    let reference = atoms.get(&inputs.reference_nuclide)?;
    let ref_conc = inputs.reference_concentration;
    let alpha_star = peaks.alpha_star;

    let scale_coeff = safe_divide(
        ref_conc.value * reference.cross_section,
        alpha_star.value * sample.cross_section,
    );
    let yield_factor = inputs.branch_fraction * sample.abundance;

    // 与通道无关的相对不确定度项
    let common_rel = relative_sq(alpha_star.uncertainty, alpha_star.value)
        + relative_sq(ref_conc.uncertainty, ref_conc.value);

    let areal_values: Vec<f64> = sample_corrected
        .values
        .iter()
        .map(|&corr| safe_divide(scale_coeff * corr, yield_factor))
        .collect();

    let areal_uncert: Vec<f64> = areal_values
        .iter()
        .zip(sample_corrected.values.iter().zip(&sample_corrected.uncertainty))
        .map(|(&areal, (&corr, &corr_u))| {
            areal * (common_rel + relative_sq(corr_u, corr)).sqrt()
        })
        .collect();

    let volumetric_values: Vec<f64> = areal_values
        .iter()
        .zip(&detector.del_depth)
        .map(|(&areal, &width)| safe_divide(areal, width))
        .collect();

    let volumetric_uncert = volumetric_values
        .iter()
        .zip(areal_values.iter().zip(&areal_uncert))
        .zip(detector.del_depth.iter().zip(&detector.del_depth_uncert))
        .map(|((&vol, (&areal, &areal_u)), (&width, &width_u))| {
            vol * (relative_sq(areal_u, areal) + relative_sq(width_u, width)).sqrt()
        })
        .collect();

    tracing::debug!(
        scale_coeff,
        alpha_star = alpha_star.value,
        sample = %inputs.sample_nuclide,
        reference = %inputs.reference_nuclide,
        "scaled to reference"
    );

    Ok(Concentration {
        areal: Series::new(areal_values, areal_uncert),
        volumetric: Series::new(volumetric_values, volumetric_uncert),
    })
}
