use crate::error::{ConversionError, Result};
use crate::slice::DicomSlice;

use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const PREAMBLE_LENGTH: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Whether `path` starts with the DICOM Part 10 preamble and `DICM` magic.
pub fn is_dicom_file(path: &Path) -> bool {
    let mut header = [0u8; PREAMBLE_LENGTH + 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut header))
        .is_ok_and(|()| &header[PREAMBLE_LENGTH..] == MAGIC)
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load every DICOM file below `path` as a slice
    ///
    /// # Arguments
    ///
    /// * `path` - Directory that is searched recursively
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NoDicomFilesFound`] when no readable file
    /// carries the DICOM magic
    pub fn load_from_directory(path: impl AsRef<Path>) -> Result<Vec<DicomSlice>> {
        let paths = Self::find_dicom_files(path)?;
        Self::load_from_file_paths(&paths)
    }

    /// Paths of all DICOM files below `path`, sorted
    pub fn find_dicom_files(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(path.as_ref()).follow_links(true) {
            let entry = entry.map_err(|e| ConversionError::Io(e.into()))?;
            if entry.file_type().is_file() && is_dicom_file(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        debug!(count = paths.len(), dir = %path.as_ref().display(), "found DICOM files");
        Ok(paths)
    }

    /// Parse the given files in parallel
    ///
    /// Files that fail to parse are skipped with a warning. The result keeps
    /// the order of `paths`.
    pub fn load_from_file_paths(paths: &[impl AsRef<Path> + Sync]) -> Result<Vec<DicomSlice>> {
        let slices: Vec<DicomSlice> = paths
            .par_iter()
            .filter_map(|path| match DicomSlice::open(path.as_ref()) {
                Ok(slice) => Some(slice),
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", path.as_ref().display(), e);
                    None
                }
            })
            .collect();

        if slices.is_empty() {
            return Err(ConversionError::NoDicomFilesFound);
        }
        Ok(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::axial_stack;
    use std::fs;

    #[test]
    fn finds_dicom_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        for (i, slice) in axial_stack(3, 2, 1.0).iter().enumerate() {
            let target = if i == 0 {
                dir.path().join("nested").join("0.dcm")
            } else {
                dir.path().join(format!("{}", i))
            };
            slice.object().write_to_file(&target).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "not dicom").unwrap();

        let paths = VolumeLoader::find_dicom_files(dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        let slices = VolumeLoader::load_from_directory(dir.path()).unwrap();
        assert_eq!(slices.len(), 3);
        assert!(slices.iter().all(|s| s.rows().unwrap() == 2));
    }

    #[test]
    fn empty_directory_has_no_dicom_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("short"), "DICM").unwrap();
        let error = VolumeLoader::load_from_directory(dir.path()).unwrap_err();
        assert_eq!(error.code(), "NO_DICOM_FILES_FOUND");
    }
}
