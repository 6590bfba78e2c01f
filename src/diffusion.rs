use crate::error::Result;
use crate::volume::VoxelBlock;

use nalgebra::Vector3;
use std::fs;
use std::path::Path;
use tracing::info;

/// b-values and gradient directions, one entry per volume.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiffusionVectorSet {
    pub bvals: Vec<f64>,
    pub bvecs: Vec<Vector3<f64>>,
}

impl DiffusionVectorSet {
    pub fn new(bvals: Vec<f64>, bvecs: Vec<Vector3<f64>>) -> Self {
        debug_assert_eq!(bvals.len(), bvecs.len());
        Self { bvals, bvecs }
    }

    /// `count` zero b-values and zero vectors.
    pub fn zeros(count: usize) -> Self {
        Self::new(vec![0.0; count], vec![Vector3::zeros(); count])
    }

    pub fn len(&self) -> usize {
        self.bvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bvals.is_empty()
    }

    /// Whether any b-value or vector component is nonzero.
    pub fn has_signal(&self) -> bool {
        self.bvals.iter().any(|&b| b != 0.0) || self.bvecs.iter().any(|v| v != &Vector3::zeros())
    }

    /// A zero b-value with a zero vector appended after real directions.
    pub fn has_trailing_reference(&self) -> bool {
        let any_direction = self.bvecs.iter().any(|v| v != &Vector3::zeros());
        match (self.bvals.last(), self.bvecs.last()) {
            (Some(&bval), Some(bvec)) => any_direction && bval == 0.0 && bvec == &Vector3::zeros(),
            _ => false,
        }
    }

    pub fn truncate_last(&mut self) {
        self.bvals.pop();
        self.bvecs.pop();
    }

    /// One line of space separated b-values.
    pub fn bval_text(&self) -> String {
        let line = self
            .bvals
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}\n", line)
    }

    /// Three lines holding the x, y and z components.
    pub fn bvec_text(&self) -> String {
        (0..3)
            .map(|axis| {
                let line = self
                    .bvecs
                    .iter()
                    .map(|v| v[axis].to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{}\n", line)
            })
            .collect()
    }

    pub fn write_bval(&self, path: &Path) -> Result<()> {
        info!("Saving BVAL file: {}", path.display());
        fs::write(path, self.bval_text())?;
        Ok(())
    }

    pub fn write_bvec(&self, path: &Path) -> Result<()> {
        info!("Saving BVEC file: {}", path.display());
        fs::write(path, self.bvec_text())?;
        Ok(())
    }
}

/// Remove a trailing reference volume from the block and the table together.
pub fn truncate_trailing_reference(block: &mut VoxelBlock, vectors: &mut DiffusionVectorSet) -> bool {
    if !vectors.has_trailing_reference() || block.timepoints() != vectors.len() {
        return false;
    }
    block.truncate_last_timepoint();
    vectors.truncate_last();
    true
}
