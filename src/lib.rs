//! # dicom2nifti library
//!
//! This crate converts a DICOM series into a NIfTI-1 volume. It builds on
//! the dicom-rs ecosystem for reading the files and on the `nifti` crate for
//! writing the result.
//!
//! A series is a flat collection of 2D slices (or a single multiframe
//! object). The converter works out how these map onto a 3D grid and, for
//! functional and diffusion data, a fourth dimension, then computes the
//! voxel to patient affine and the diffusion gradient table. The way this
//! is stored differs per vendor:
//!  - Siemens: mosaics (all slices of a volume tiled into one image) and
//!    classic one file per slice series
//!  - GE: stacks split by in-stack position
//!  - Philips: enhanced multiframe objects and classic single frame series
//!  - Hitachi and everything else: anatomical 3D stacks
//!
//! Before a volume is assembled its geometry is validated (slice count,
//! orientation, orthogonality and slice increment). Each check can be
//! disabled through [`ValidationSettings`]. Compressed transfer syntaxes
//! are converted with the external `gdcmconv` tool of the GDCM toolkit,
//! always on a temporary copy of the input. If the environment supports it
//! the DICOM files are loaded in parallel using rayon.
//!
//!  The written volume is reoriented by default, so that its voxel axes run
//!  towards the patient's left, posterior and superior.
//!
//! # Examples
//!
//! ## Converting one series
//!
//! To convert all DICOM files from the dicom/ directory into a gzipped
//! NIfTI file. Diffusion data also gets a `.bval` and `.bvec` file next to
//! the volume.
//!
//! ```no_run
//! # use dicom2nifti::{ConversionOptions, dicom_series_to_nifti};
//! # use std::path::Path;
//! let result = dicom_series_to_nifti(
//!     Path::new("dicom"),
//!     Some(Path::new("out/series.nii.gz")),
//!     &ConversionOptions::default(),
//! )
//! .expect("should have converted the series");
//! println!("{} {} volume of shape {:?}", result.vendor, result.kind, result.block.dim());
//! ```
//!
//! ## Relaxing validation
//!
//! Localizers and other short series are refused because they have fewer
//! than four slices:
//!
//! ```no_run
//! # use dicom2nifti::{ConversionOptions, ValidationSettings, convert_directory};
//! # use std::path::Path;
//! let options = ConversionOptions::default()
//!     .with_validation(ValidationSettings::default().with_slice_count(false))
//!     .with_compression(false);
//! let report = convert_directory(Path::new("study"), Path::new("nifti"), &options)
//!     .expect("should have scanned the study");
//! for (uid, error) in &report.failed {
//!     eprintln!("{}: {}", uid, error);
//! }
//! ```

pub mod accessor;
pub mod affine;
pub mod convert;
pub mod convert_directory;
pub mod decompress;
pub mod dicom_tags;
pub mod diffusion;
pub mod enums;
pub mod error;
pub mod nifti_writer;
pub mod reorient;
pub mod rescale;
pub mod slice;
#[cfg(test)]
mod test_support;
pub mod validation;
pub mod vendor;
pub mod volume;
pub mod volume_loader;

pub use convert::{ConversionOptions, ConversionResult, dicom_array_to_nifti, dicom_series_to_nifti};
pub use convert_directory::{DirectoryReport, convert_directory};
pub use error::{ConversionError, Result};
pub use slice::DicomSlice;
pub use validation::ValidationSettings;
pub use vendor::Vendor;
pub use volume_loader::VolumeLoader;
