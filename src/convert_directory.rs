//! Conversion of a whole directory tree, one NIfTI file per series.

use crate::accessor::TagAccess;
use crate::convert::{ConversionOptions, ConversionResult, copy_files, dicom_array_to_nifti};
use crate::decompress::{decompress_series, is_compressed};
use crate::error::{ConversionError, Result};
use crate::slice::DicomSlice;
use crate::volume_loader::VolumeLoader;

use dicom_dictionary_std::tags;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of [`convert_directory`].
#[derive(Debug, Default)]
pub struct DirectoryReport {
    pub converted: Vec<ConversionResult>,
    /// SeriesInstanceUID and the reason of every series that failed.
    pub failed: Vec<(String, ConversionError)>,
}

/// Lower case ASCII name made of letters, digits, `_` and `-`.
///
/// Runs of whitespace and hyphens collapse into a single underscore.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' ' | '\t'))
        .collect();
    let mut result = String::with_capacity(kept.len());
    let mut separator = false;
    for c in kept.trim().chars() {
        if c == '-' || c.is_ascii_whitespace() {
            separator = true;
            continue;
        }
        if separator {
            result.push('_');
            separator = false;
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// `SeriesNumber_description`, falling back to the SeriesInstanceUID.
pub fn series_filename(slice: &DicomSlice) -> String {
    let base = match slice.string(tags::SERIES_NUMBER) {
        Some(number) => {
            let description = [tags::SERIES_DESCRIPTION, tags::SEQUENCE_NAME, tags::PROTOCOL_NAME]
                .into_iter()
                .find_map(|tag| slice.string(tag).filter(|s| !s.is_empty()));
            match description {
                Some(description) => format!("{}_{}", number, description),
                None => number,
            }
        }
        None => slice.series_instance_uid().unwrap_or_default(),
    };
    sanitize_filename(&base)
}

/// Bucket slices by SeriesInstanceUID, dropping those without one.
pub fn group_by_series(slices: Vec<DicomSlice>) -> BTreeMap<String, Vec<DicomSlice>> {
    let mut series: BTreeMap<String, Vec<DicomSlice>> = BTreeMap::new();
    for slice in slices {
        match slice.series_instance_uid() {
            Some(uid) => series.entry(uid).or_default().push(slice),
            None => warn!("Skipping {} without SeriesInstanceUID", slice.path().display()),
        }
    }
    series
}

/// Decompress a series through a private copy of its files.
fn uncompressed(slices: Vec<DicomSlice>, options: &ConversionOptions) -> Result<Vec<DicomSlice>> {
    if !slices.iter().any(is_compressed) {
        return Ok(slices);
    }
    let workdir = tempfile::tempdir()?;
    let paths: Vec<&Path> = slices.iter().map(DicomSlice::path).collect();
    copy_files(&paths, workdir.path())?;
    let copies = VolumeLoader::load_from_directory(workdir.path())?;
    decompress_series(copies, options.gdcmconv.as_deref())
}

fn unique_name(base: String, used: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut counter = 1;
    while !used.insert(name.clone()) {
        counter += 1;
        name = format!("{}_{}", base, counter);
    }
    name
}

/// Convert every series found below `input` into `output`.
///
/// A series that cannot be converted is logged and recorded in the report,
/// the remaining series are still converted.
pub fn convert_directory(
    input: &Path,
    output: &Path,
    options: &ConversionOptions,
) -> Result<DirectoryReport> {
    fs::create_dir_all(output)?;
    let slices = VolumeLoader::load_from_directory(input)?;
    let series = group_by_series(slices);
    info!("Found {} series in {}", series.len(), input.display());

    let mut report = DirectoryReport::default();
    let mut used = HashSet::new();
    for (uid, slices) in series {
        let name = unique_name(series_filename(&slices[0]), &mut used);
        let path: PathBuf = output.join(format!("{}.{}", name, options.extension()));
        info!("Converting series {} to {}", uid, path.display());
        let converted = uncompressed(slices, options)
            .and_then(|slices| dicom_array_to_nifti(&slices, Some(&path), options));
        match converted {
            Ok(result) => report.converted.push(result),
            Err(e) => {
                warn!("Unable to convert series {}: {} ({})", uid, e, e.code());
                report.failed.push((uid, e));
            }
        }
    }
    Ok(report)
}
