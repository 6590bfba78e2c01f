//! Reorder and flip voxel axes so they follow the patient axes.
//!
//! After reorientation voxel axis 0 runs towards the patient's left, axis 1
//! towards posterior and axis 2 towards superior. The fourth axis, if any,
//! is left alone.

use crate::affine::AffineMatrix;
use crate::volume::VoxelBlock;

use nalgebra::Vector3;
use ndarray::Axis;
use tracing::debug;

/// Affine column sign each voxel axis should end up with.
const TARGET_SIGNS: [f64; 3] = [-1.0, -1.0, 1.0];

/// `perm[patient_axis] = voxel_axis`, assigning the largest components first.
fn dominant_axes(affine: &AffineMatrix) -> [usize; 3] {
    let mut perm = [usize::MAX; 3];
    let mut used_voxel = [false; 3];
    for _ in 0..3 {
        let mut best: Option<(usize, usize, f64)> = None;
        for patient in (0..3).filter(|&p| perm[p] == usize::MAX) {
            for voxel in (0..3).filter(|&v| !used_voxel[v]) {
                let weight = affine[(patient, voxel)].abs();
                if best.is_none_or(|(_, _, w)| weight > w) {
                    best = Some((patient, voxel, weight));
                }
            }
        }
        if let Some((patient, voxel, _)) = best {
            perm[patient] = voxel;
            used_voxel[voxel] = true;
        }
    }
    perm
}

pub fn reorient(block: VoxelBlock, affine: &AffineMatrix) -> (VoxelBlock, AffineMatrix) {
    let perm = dominant_axes(affine);
    let mut axes: Vec<usize> = perm.to_vec();
    axes.extend(3..block.ndim());
    let mut data = block.data.permuted_axes(axes);

    let mut reoriented = *affine;
    for (new_axis, &old_axis) in perm.iter().enumerate() {
        reoriented.set_column(new_axis, &affine.column(old_axis));
    }

    for (axis, target) in TARGET_SIGNS.iter().enumerate() {
        let component = reoriented[(axis, axis)];
        if component != 0.0 && component.signum() != *target {
            let length = data.len_of(Axis(axis));
            let column: Vector3<f64> = reoriented.fixed_view::<3, 1>(0, axis).into_owned();
            let origin = reoriented.fixed_view::<3, 1>(0, 3) + column * (length as f64 - 1.0);
            reoriented.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin);
            reoriented.fixed_view_mut::<3, 1>(0, axis).copy_from(&-column);
            data.invert_axis(Axis(axis));
        }
    }
    debug!(?perm, "reoriented voxel axes");

    let data = data.as_standard_layout().into_owned();
    (VoxelBlock::new(data, block.dtype), reoriented)
}
