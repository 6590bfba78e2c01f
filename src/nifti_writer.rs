use crate::affine::{AffineMatrix, voxel_sizes};
use crate::enums::DataType;
use crate::error::Result;
use crate::volume::VoxelBlock;

use nifti::NiftiHeader;
use nifti::writer::WriterOptions;
use std::path::Path;
use tracing::info;

const NIFTI_XFORM_SCANNER_ANAT: i16 = 1;
const NIFTI_UNITS_MM: u8 = 2;
const NIFTI_UNITS_SEC: u8 = 8;

/// Repetition and echo time in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub repetition_time: f64,
    pub echo_time: f64,
}

/// Header carrying the affine as sform and the optional timing fields.
pub fn build_header(affine: &AffineMatrix, timing: Option<Timing>) -> NiftiHeader {
    let mut header = NiftiHeader::default();
    let row = |r: usize| {
        [
            affine[(r, 0)] as f32,
            affine[(r, 1)] as f32,
            affine[(r, 2)] as f32,
            affine[(r, 3)] as f32,
        ]
    };
    header.srow_x = row(0);
    header.srow_y = row(1);
    header.srow_z = row(2);
    header.sform_code = NIFTI_XFORM_SCANNER_ANAT;
    header.qform_code = 0;

    let sizes = voxel_sizes(affine);
    header.pixdim[0] = 1.0;
    header.pixdim[1] = sizes.x as f32;
    header.pixdim[2] = sizes.y as f32;
    header.pixdim[3] = sizes.z as f32;
    header.xyzt_units = NIFTI_UNITS_MM | NIFTI_UNITS_SEC;

    if let Some(timing) = timing {
        header.pixdim[4] = (timing.repetition_time / 1000.0) as f32;
        let text = format!(
            "?TR:{:.3} TE:{}",
            timing.repetition_time, timing.echo_time as i64
        );
        let mut db_name = [0_u8; 18];
        for (dst, src) in db_name.iter_mut().zip(text.bytes()) {
            *dst = src;
        }
        header.db_name = db_name;
    }
    header
}

/// Write `block` to `path`, gzipped when the name ends in `.gz`.
///
/// The voxels are cast to the block's data type, which already covers the
/// rescaled range.
pub fn write_nifti(
    path: &Path,
    block: &VoxelBlock,
    affine: &AffineMatrix,
    timing: Option<Timing>,
) -> Result<()> {
    let header = build_header(affine, timing);
    let writer = WriterOptions::new(path).reference_header(&header);
    let data = &block.data;
    match block.dtype {
        DataType::U8 => writer.write_nifti(&data.mapv(|v| v as u8))?,
        DataType::I8 => writer.write_nifti(&data.mapv(|v| v as i8))?,
        DataType::U16 => writer.write_nifti(&data.mapv(|v| v as u16))?,
        DataType::I16 => writer.write_nifti(&data.mapv(|v| v as i16))?,
        DataType::U32 => writer.write_nifti(&data.mapv(|v| v as u32))?,
        DataType::I32 => writer.write_nifti(&data.mapv(|v| v as i32))?,
        DataType::I64 => writer.write_nifti(&data.mapv(|v| v as i64))?,
        DataType::F32 => writer.write_nifti(&data.mapv(|v| v as f32))?,
        DataType::F64 => writer.write_nifti(data)?,
    }
    info!(
        "Saved {} volume {:?} to {}",
        block.dtype,
        block.dim(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::build_affine;
    use nalgebra::Vector3;
    use ndarray::ArrayD;
    use nifti::{NiftiObject, NiftiType, ReaderOptions};
    use tempfile::tempdir;

    #[test]
    fn header_fields() {
        let affine = build_affine(
            Vector3::x(),
            Vector3::y(),
            (0.5, 0.5),
            Vector3::new(0.0, 0.0, 3.0),
            Vector3::new(1.0, 2.0, 3.0),
        );
        let header = build_header(
            &affine,
            Some(Timing {
                repetition_time: 2000.0,
                echo_time: 30.7,
            }),
        );
        assert_eq!(header.srow_x, [-0.5, 0.0, 0.0, -1.0]);
        assert_eq!(header.srow_z, [0.0, 0.0, 3.0, 3.0]);
        assert_eq!(header.pixdim[1..5], [0.5, 0.5, 3.0, 2.0]);
        assert_eq!(&header.db_name[..], b"?TR:2000.000 TE:30");
        assert_eq!(header.sform_code, 1);
    }

    #[test]
    fn writes_the_requested_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.nii.gz");
        let data = ArrayD::from_shape_fn(vec![2, 3, 4], |d| (d[0] + d[1] * 2 + d[2] * 6) as f64);
        let block = VoxelBlock::new(data, DataType::I16);
        write_nifti(&path, &block, &AffineMatrix::identity(), None).unwrap();

        let object = ReaderOptions::new().read_file(&path).unwrap();
        assert_eq!(object.header().data_type().unwrap(), NiftiType::Int16);
        assert_eq!(&object.header().dim[..4], &[3, 2, 3, 4]);
    }
}
