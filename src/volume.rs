use crate::enums::DataType;
use crate::error::{ConversionError, Result};
use crate::rescale::{RescaleParams, rescale};
use crate::slice::{DicomSlice, PixelBlock};

use ndarray::{Array2, Array3, ArrayD, ArrayView3, Axis, Ix3, s};

/// Assembled voxels, indexed `[x, y, z]` or `[x, y, z, t]`.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelBlock {
    pub data: ArrayD<f64>,
    pub dtype: DataType,
}

impl VoxelBlock {
    pub fn new(data: ArrayD<f64>, dtype: DataType) -> Self {
        Self { data, dtype }
    }

    /// Get the dimensions of the volume
    pub fn dim(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Number of volumes along the fourth axis, 1 for a 3D block.
    pub fn timepoints(&self) -> usize {
        if self.ndim() == 4 {
            self.data.len_of(Axis(3))
        } else {
            1
        }
    }

    /// Stack 3D blocks of equal shape along a new fourth axis.
    pub fn from_timepoints(blocks: Vec<VoxelBlock>) -> Result<Self> {
        let first_shape = blocks
            .first()
            .map(|b| b.dim().to_vec())
            .ok_or_else(|| ConversionError::NotAVolume("no timepoints".to_string()))?;
        if blocks.iter().any(|b| b.dim() != first_shape.as_slice()) {
            return Err(ConversionError::MissingDicomFiles(
                "timepoints do not all have the same number of slices".to_string(),
            ));
        }
        let dtype = promote_all(blocks.iter().map(|b| b.dtype));
        let views = blocks
            .iter()
            .map(|b| b.data.view().into_dimensionality::<Ix3>())
            .collect::<std::result::Result<Vec<ArrayView3<f64>>, _>>()
            .map_err(|e| ConversionError::InvalidPixelData(e.to_string()))?;
        let data = ndarray::stack(Axis(3), &views)
            .map_err(|e| ConversionError::InvalidPixelData(e.to_string()))?;
        Ok(Self::new(data.into_dyn(), dtype))
    }

    /// Drop the last volume of a 4D block.
    pub fn truncate_last_timepoint(&mut self) {
        let count = self.timepoints();
        if self.ndim() == 4 && count > 1 {
            self.data = self
                .data
                .slice_axis(Axis(3), (0..count - 1).into())
                .to_owned();
        }
    }
}

fn promote_all(types: impl Iterator<Item = DataType>) -> DataType {
    types
        .reduce(DataType::promote)
        .unwrap_or(DataType::U16)
}

/// Place `(rows, columns)` images as z slices of an `(columns, rows, n)` array.
pub fn stack_frames(frames: Vec<PixelBlock>) -> Result<VoxelBlock> {
    let images = frames
        .iter()
        .map(|f| f.data.view().into_dimensionality::<ndarray::Ix2>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ConversionError::InvalidPixelData(e.to_string()))?;
    let Some(first) = images.first() else {
        return Err(ConversionError::NotAVolume("no slices".to_string()));
    };
    let (rows, columns) = first.dim();
    if images.iter().any(|img| img.dim() != (rows, columns)) {
        return Err(ConversionError::UnsupportedData(
            "inconsistent image dimensions".to_string(),
        ));
    }
    let mut volume = Array3::<f64>::zeros((columns, rows, images.len()));
    for (i, image) in images.iter().enumerate() {
        volume.slice_mut(s![.., .., i]).assign(&image.t());
    }
    let dtype = promote_all(frames.iter().map(|f| f.dtype));
    Ok(VoxelBlock::new(volume.into_dyn(), dtype))
}

/// First frame of a slice as a `(rows, columns)` block.
pub fn first_frame(slice: &DicomSlice) -> Result<PixelBlock> {
    let frames = slice.pixel_frames()?;
    let image: Array2<f64> = frames
        .data
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|e| ConversionError::InvalidPixelData(e.to_string()))?
        .index_axis(Axis(0), 0)
        .to_owned();
    Ok(PixelBlock::new(image.into_dyn(), frames.dtype))
}

/// Decode, rescale and stack one spatial stack of single frame slices.
pub fn stack_slices<F>(slices: &[&DicomSlice], params: F) -> Result<VoxelBlock>
where
    F: Fn(&DicomSlice) -> Result<RescaleParams>,
{
    let frames = slices
        .iter()
        .map(|slice| Ok(rescale(first_frame(slice)?, &params(slice)?)))
        .collect::<Result<Vec<_>>>()?;
    stack_frames(frames)
}

/// Stack every group into 3D and the groups along the fourth axis.
pub fn stack_timepoints<F>(groups: &[Vec<&DicomSlice>], params: F) -> Result<VoxelBlock>
where
    F: Fn(&DicomSlice) -> Result<RescaleParams>,
{
    let blocks = groups
        .iter()
        .map(|group| stack_slices(group, &params))
        .collect::<Result<Vec<_>>>()?;
    VoxelBlock::from_timepoints(blocks)
}
