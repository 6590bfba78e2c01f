//! Geometric sanity checks on a stack of slices.
//!
//! Each check can be switched off through [`ValidationSettings`], which is
//! passed down explicitly by the caller.

use crate::dicom_tags;
use crate::error::{ConversionError, Result};
use crate::slice::DicomSlice;

use nalgebra::Vector3;
use tracing::debug;

/// Which checks to enforce. All are enabled by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationSettings {
    pub slice_count: bool,
    pub orientation: bool,
    pub orthogonal: bool,
    pub slice_increment: bool,
    pub multiframe_implicit: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            slice_count: true,
            orientation: true,
            orthogonal: true,
            slice_increment: true,
            multiframe_implicit: true,
        }
    }
}

impl ValidationSettings {
    /// Every check disabled.
    pub fn none() -> Self {
        Self {
            slice_count: false,
            orientation: false,
            orthogonal: false,
            slice_increment: false,
            multiframe_implicit: false,
        }
    }

    pub fn with_slice_count(mut self, enabled: bool) -> Self {
        self.slice_count = enabled;
        self
    }

    pub fn with_orientation(mut self, enabled: bool) -> Self {
        self.orientation = enabled;
        self
    }

    pub fn with_orthogonal(mut self, enabled: bool) -> Self {
        self.orthogonal = enabled;
        self
    }

    pub fn with_slice_increment(mut self, enabled: bool) -> Self {
        self.slice_increment = enabled;
        self
    }

    pub fn with_multiframe_implicit(mut self, enabled: bool) -> Self {
        self.multiframe_implicit = enabled;
        self
    }
}

const ORIENTATION_TOLERANCE: f64 = 0.001;
const GEOMETRY_TOLERANCE: f64 = 0.05;
pub const MIN_SLICES: usize = 4;

/// Element-wise `|a - b| <= atol + rtol * |b|`.
pub fn all_close(a: &Vector3<f64>, b: &Vector3<f64>, rtol: f64, atol: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() <= atol + rtol * y.abs())
}

/// Run every enabled check on one spatial stack.
pub fn validate_volume(slices: &[&DicomSlice], settings: &ValidationSettings) -> Result<()> {
    if settings.slice_count {
        validate_slice_count(slices)?;
    }
    if settings.orientation {
        validate_orientation(slices)?;
    }
    if settings.orthogonal {
        validate_orthogonal(slices)?;
    }
    if settings.slice_increment {
        validate_slice_increment(slices)?;
    }
    Ok(())
}

pub fn validate_slice_count(slices: &[&DicomSlice]) -> Result<()> {
    if slices.len() < MIN_SLICES {
        return Err(ConversionError::TooFewSlices(slices.len()));
    }
    Ok(())
}

pub fn validate_orientation(slices: &[&DicomSlice]) -> Result<()> {
    let Some(first) = slices.first() else {
        return Ok(());
    };
    let (first_row, first_col) = first.require_orientation()?;
    for slice in slices {
        let (row, col) = slice.require_orientation()?;
        if !all_close(&row, &first_row, ORIENTATION_TOLERANCE, ORIENTATION_TOLERANCE)
            || !all_close(&col, &first_col, ORIENTATION_TOLERANCE, ORIENTATION_TOLERANCE)
        {
            debug!(?row, ?col, ?first_row, ?first_col, "orientation mismatch");
            return Err(ConversionError::OrientationInconsistent);
        }
    }
    Ok(())
}

/// The slice normal must be parallel to the first to last slice direction.
pub fn validate_orthogonal(slices: &[&DicomSlice]) -> Result<()> {
    let (Some(first), Some(last)) = (slices.first(), slices.last()) else {
        return Ok(());
    };
    if slices.len() < 2 {
        return Ok(());
    }
    let (row, col) = first.require_orientation()?;
    let normal = row.cross(&col).normalize();
    let combined = last.require_position()? - first.require_position()?;
    if combined.norm() == 0.0 {
        return Err(ConversionError::NotAVolume(
            "first and last slice share the same position".to_string(),
        ));
    }
    let combined = combined.normalize();
    if !all_close(&normal, &combined, GEOMETRY_TOLERANCE, GEOMETRY_TOLERANCE)
        && !all_close(&normal, &-combined, GEOMETRY_TOLERANCE, GEOMETRY_TOLERANCE)
    {
        debug!(?normal, ?combined, "orthogonality check failed");
        return Err(ConversionError::NonCubicalImage);
    }
    Ok(())
}

/// Consecutive positions must step by the same vector.
pub fn validate_slice_increment(slices: &[&DicomSlice]) -> Result<()> {
    if slices.len() < 3 {
        return Ok(());
    }
    let positions = slices
        .iter()
        .map(|s| s.require_position())
        .collect::<Result<Vec<_>>>()?;
    let baseline = positions[1] - positions[0];
    for pair in positions.windows(2).skip(1) {
        let increment = pair[1] - pair[0];
        if !all_close(&increment, &baseline, GEOMETRY_TOLERANCE, GEOMETRY_TOLERANCE) {
            debug!(?increment, ?baseline, "slice increment mismatch");
            return Err(ConversionError::SliceIncrementInconsistent);
        }
    }
    Ok(())
}

/// Enhanced objects written with implicit VR lose the types of their private tags.
pub fn validate_multiframe_explicit_vr(slice: &DicomSlice, settings: &ValidationSettings) -> Result<()> {
    if settings.multiframe_implicit
        && slice.transfer_syntax() == dicom_tags::IMPLICIT_VR_LITTLE_ENDIAN
    {
        return Err(ConversionError::ImplicitVrEnhancedDicom);
    }
    Ok(())
}
