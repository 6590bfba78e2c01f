//! Voxel to patient space matrices.
//!
//! Patient coordinates in DICOM run towards Left, Posterior and Superior.
//! NIfTI expects Right, Anterior, Superior, so the X and Y rows of every
//! matrix built here are negated.

use crate::error::{ConversionError, Result};
use crate::slice::DicomSlice;

use nalgebra::{Matrix4, Vector3};

pub type AffineMatrix = Matrix4<f64>;

/// Assemble an affine from its geometric parts.
///
/// `spacing` is the DICOM PixelSpacing pair (row spacing, column spacing),
/// `step` is the vector from one slice to the next.
pub fn build_affine(
    row: Vector3<f64>,
    col: Vector3<f64>,
    spacing: (f64, f64),
    step: Vector3<f64>,
    origin: Vector3<f64>,
) -> AffineMatrix {
    let (delta_r, delta_c) = spacing;
    Matrix4::new(
        -row.x * delta_r,
        -col.x * delta_c,
        -step.x,
        -origin.x,
        -row.y * delta_r,
        -col.y * delta_c,
        -step.y,
        -origin.y,
        row.z * delta_r,
        col.z * delta_c,
        step.z,
        origin.z,
        0.0,
        0.0,
        0.0,
        1.0,
    )
}

/// Affine of an ordered stack, stepping from the first to the last slice.
pub fn affine_from_slices(slices: &[&DicomSlice]) -> Result<AffineMatrix> {
    let first = slices
        .first()
        .ok_or_else(|| ConversionError::NotAVolume("no slices".to_string()))?;
    let (row, col) = first.require_orientation()?;
    let spacing = first.require_spacing()?;
    let origin = first.require_position()?;
    let step = match slices.last() {
        Some(last) if slices.len() > 1 => {
            (last.require_position()? - origin) / (slices.len() - 1) as f64
        }
        _ => Vector3::new(0.0, 0.0, -1.0),
    };
    Ok(build_affine(row, col, spacing, step, origin))
}

/// Affine of a block whose slices step along the slice normal.
pub fn affine_from_normal(
    row: Vector3<f64>,
    col: Vector3<f64>,
    spacing: (f64, f64),
    slice_spacing: f64,
    origin: Vector3<f64>,
) -> AffineMatrix {
    let step = row.cross(&col) * slice_spacing;
    build_affine(row, col, spacing, step, origin)
}

/// Voxel sizes along the three spatial axes.
pub fn voxel_sizes(affine: &AffineMatrix) -> Vector3<f64> {
    Vector3::new(
        affine.fixed_view::<3, 1>(0, 0).norm(),
        affine.fixed_view::<3, 1>(0, 1).norm(),
        affine.fixed_view::<3, 1>(0, 2).norm(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::axial_stack;

    #[test]
    fn stack_affine_negates_x_and_y() {
        let slices = axial_stack(20, 2, -2.5);
        let refs: Vec<_> = slices.iter().collect();
        let affine = affine_from_slices(&refs).unwrap();
        assert_eq!(affine.column(0).xyz(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(affine.column(1).xyz(), Vector3::new(0.0, -1.0, 0.0));
        assert!((affine.column(2).xyz() - Vector3::new(0.0, 0.0, -2.5)).norm() < 1e-9);
        assert_eq!(affine[(3, 3)], 1.0);
    }

    #[test]
    fn single_slice_steps_down() {
        let slices = axial_stack(1, 2, 1.0);
        let refs: Vec<_> = slices.iter().collect();
        let affine = affine_from_slices(&refs).unwrap();
        assert_eq!(affine.column(2).xyz(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn normal_step_and_voxel_sizes() {
        let affine = affine_from_normal(
            Vector3::x(),
            Vector3::y(),
            (0.5, 0.75),
            3.0,
            Vector3::new(10.0, 20.0, 30.0),
        );
        assert_eq!(voxel_sizes(&affine), Vector3::new(0.5, 0.75, 3.0));
        assert_eq!(affine[(0, 3)], -10.0);
        assert_eq!(affine[(1, 3)], -20.0);
        assert_eq!(affine[(2, 3)], 30.0);
    }
}
