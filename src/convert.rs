//! Conversion of one series: workspace, decoding, reconstruction and output.

use crate::affine::AffineMatrix;
use crate::decompress::decompress_series;
use crate::diffusion::DiffusionVectorSet;
use crate::enums::ScanKind;
use crate::error::{ConversionError, Result};
use crate::nifti_writer::{Timing, write_nifti};
use crate::reorient::reorient;
use crate::slice::DicomSlice;
use crate::validation::ValidationSettings;
use crate::vendor::{Reconstruction, Vendor, check_imaging};
use crate::volume::VoxelBlock;
use crate::volume_loader::VolumeLoader;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Settings shared by every conversion entry point.
#[derive(Clone, Debug)]
pub struct ConversionOptions {
    pub validation: ValidationSettings,
    /// Reorder voxel axes along the patient axes before writing.
    pub reorient: bool,
    /// `gdcmconv` to use for compressed input instead of searching `PATH`.
    pub gdcmconv: Option<PathBuf>,
    /// Write `.nii.gz` rather than `.nii` when the file name is chosen here.
    pub compress: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            validation: ValidationSettings::default(),
            reorient: true,
            gdcmconv: None,
            compress: true,
        }
    }
}

impl ConversionOptions {
    pub fn with_validation(mut self, validation: ValidationSettings) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_reorientation(mut self, enabled: bool) -> Self {
        self.reorient = enabled;
        self
    }

    pub fn with_gdcmconv(mut self, program: impl Into<PathBuf>) -> Self {
        self.gdcmconv = Some(program.into());
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// File extension matching [`ConversionOptions::compress`].
    pub fn extension(&self) -> &'static str {
        if self.compress { "nii.gz" } else { "nii" }
    }
}

/// The converted series and, when an output path was given, its files.
#[derive(Clone, Debug)]
pub struct ConversionResult {
    pub vendor: Vendor,
    pub kind: ScanKind,
    pub block: VoxelBlock,
    pub affine: AffineMatrix,
    pub diffusion: Option<DiffusionVectorSet>,
    pub timing: Option<Timing>,
    pub nifti_file: Option<PathBuf>,
    pub bval_file: Option<PathBuf>,
    pub bvec_file: Option<PathBuf>,
}

impl ConversionResult {
    /// Write the volume to `path` and the diffusion table next to it.
    pub fn write(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_nifti(path, &self.block, &self.affine, self.timing)?;
        info!("Wrote {}", path.display());
        self.nifti_file = Some(path.to_path_buf());

        if let Some(vectors) = &self.diffusion {
            let bval = sidecar_path(path, "bval");
            let bvec = sidecar_path(path, "bvec");
            vectors.write_bval(&bval)?;
            vectors.write_bvec(&bvec)?;
            info!("Wrote {} and {}", bval.display(), bvec.display());
            self.bval_file = Some(bval);
            self.bvec_file = Some(bvec);
        }
        Ok(())
    }
}

/// `scan.nii.gz` → `scan.<extension>`
pub fn sidecar_path(nifti: &Path, extension: &str) -> PathBuf {
    let name = nifti
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(".nii.gz")
        .or_else(|| name.strip_suffix(".nii"))
        .unwrap_or(&name);
    nifti.with_file_name(format!("{}.{}", stem, extension))
}

/// Copy every file below `source` into `target`, keeping relative paths.
fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| ConversionError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ConversionError::Io(std::io::Error::other(e)))?;
        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &destination)?;
        count += 1;
    }
    Ok(count)
}

/// Copy `paths` flat into `target`, prefixed by their index to keep names unique.
pub(crate) fn copy_files(paths: &[&Path], target: &Path) -> Result<()> {
    for (i, path) in paths.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        fs::copy(path, target.join(format!("{:06}_{}", i, name)))?;
    }
    Ok(())
}

/// Convert the single series stored below `input`.
///
/// The input is copied into a temporary directory first, so that
/// decompression never touches the original files. With an `output` path
/// the NIfTI file and, for diffusion data, `.bval`/`.bvec` files are
/// written.
///
/// # Errors
///
/// Any [`ConversionError`]; nothing is written unless the reconstruction
/// succeeded.
pub fn dicom_series_to_nifti(
    input: &Path,
    output: Option<&Path>,
    options: &ConversionOptions,
) -> Result<ConversionResult> {
    let workdir = tempfile::tempdir()?;
    let copied = copy_tree(input, workdir.path())?;
    debug!(copied, workdir = %workdir.path().display(), "copied input");
    let slices = VolumeLoader::load_from_directory(workdir.path())?;
    let slices = decompress_series(slices, options.gdcmconv.as_deref())?;
    dicom_array_to_nifti(&slices, output, options)
}

/// Convert slices that are already loaded and uncompressed.
pub fn dicom_array_to_nifti(
    slices: &[DicomSlice],
    output: Option<&Path>,
    options: &ConversionOptions,
) -> Result<ConversionResult> {
    check_imaging(slices)?;
    let vendor = Vendor::classify(slices);
    let Reconstruction {
        block,
        affine,
        diffusion,
        timing,
        kind,
    } = vendor.reconstruct(slices, &options.validation)?;
    let (block, affine) = if options.reorient {
        reorient(block, &affine)
    } else {
        (block, affine)
    };

    let mut result = ConversionResult {
        vendor,
        kind,
        block,
        affine,
        diffusion,
        timing,
        nifti_file: None,
        bval_file: None,
        bvec_file: None,
    };
    if let Some(path) = output {
        result.write(path)?;
    }
    Ok(result)
}
