//! Conversion of compressed transfer syntaxes to native pixel data.
//!
//! Compressed files are rewritten in place with `gdcmconv -w`, so this must
//! only ever run on the private working copy of the input.

use crate::dicom_tags;
use crate::error::{ConversionError, Result};
use crate::slice::DicomSlice;

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

#[cfg(windows)]
const GDCMCONV: &str = "gdcmconv.exe";
#[cfg(not(windows))]
const GDCMCONV: &str = "gdcmconv";

/// Rewrites one file in place with uncompressed pixel data.
pub trait Decompressor {
    fn decompress(&self, path: &Path) -> Result<()>;
}

/// The `gdcmconv` tool of the GDCM toolkit.
#[derive(Clone, Debug)]
pub struct GdcmConv {
    program: PathBuf,
}

impl GdcmConv {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `explicit` when given, otherwise search `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(program) = explicit {
            return if program.is_file() {
                Ok(Self::new(program))
            } else {
                Err(ConversionError::DecompressorNotFound)
            };
        }
        let path = env::var_os("PATH").ok_or(ConversionError::DecompressorNotFound)?;
        env::split_paths(&path)
            .map(|dir| dir.join(GDCMCONV))
            .find(|candidate| candidate.is_file())
            .map(Self::new)
            .ok_or(ConversionError::DecompressorNotFound)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Decompressor for GdcmConv {
    fn decompress(&self, path: &Path) -> Result<()> {
        debug!(program = %self.program.display(), file = %path.display(), "running gdcmconv");
        let output = Command::new(&self.program)
            .arg("-w")
            .arg(path)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ConversionError::Decompression {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(ConversionError::Decompression {
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Whether the pixel data is stored in anything but a native transfer syntax.
pub fn is_compressed(slice: &DicomSlice) -> bool {
    !dicom_tags::UNCOMPRESSED_TRANSFER_SYNTAXES.contains(&slice.transfer_syntax())
}

/// Decompress every compressed slice, locating `gdcmconv` only when needed.
pub fn decompress_series(slices: Vec<DicomSlice>, gdcmconv: Option<&Path>) -> Result<Vec<DicomSlice>> {
    if !slices.iter().any(is_compressed) {
        return Ok(slices);
    }
    let tool = GdcmConv::locate(gdcmconv)?;
    info!("Decompressing DICOM files with {}", tool.program().display());
    decompress_with(slices, &tool)
}

/// Run `tool` over the compressed slices and read them back.
pub fn decompress_with(slices: Vec<DicomSlice>, tool: &impl Decompressor) -> Result<Vec<DicomSlice>> {
    slices
        .into_iter()
        .map(|slice| {
            if !is_compressed(&slice) {
                return Ok(slice);
            }
            tool.decompress(slice.path())?;
            let reloaded = DicomSlice::open(slice.path())?;
            if is_compressed(&reloaded) {
                return Err(ConversionError::Decompression {
                    path: slice.path().to_path_buf(),
                    reason: format!("still encoded as {}", reloaded.transfer_syntax()),
                });
            }
            Ok(reloaded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SliceBuilder;
    use std::cell::RefCell;

    const JPEG_BASELINE: &str = "1.2.840.10008.1.2.4.50";

    /// Replaces each file with an uncompressed fixture.
    struct Rewriter {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl Decompressor for Rewriter {
        fn decompress(&self, path: &Path) -> Result<()> {
            self.calls.borrow_mut().push(path.to_path_buf());
            SliceBuilder::new(2, 2)
                .filled(5)
                .build()
                .object()
                .write_to_file(path)
                .map_err(|e| ConversionError::Decompression {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
        }
    }

    #[test]
    fn detects_compressed_transfer_syntax() {
        assert!(!is_compressed(&SliceBuilder::new(2, 2).build()));
        let jpeg = SliceBuilder::new(2, 2).transfer_syntax(JPEG_BASELINE).build();
        assert!(is_compressed(&jpeg));
    }

    #[test]
    fn only_compressed_slices_are_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let compressed = SliceBuilder::new(2, 2).transfer_syntax(JPEG_BASELINE).build();
        let compressed = DicomSlice::new(dir.path().join("a.dcm"), compressed.object().clone());
        let plain = SliceBuilder::new(2, 2).build();

        let tool = Rewriter {
            calls: RefCell::new(Vec::new()),
        };
        let slices = decompress_with(vec![compressed, plain], &tool).unwrap();
        assert_eq!(tool.calls.borrow().as_slice(), &[dir.path().join("a.dcm")]);
        assert!(slices.iter().all(|s| !is_compressed(s)));
        assert_eq!(slices[0].path(), dir.path().join("a.dcm"));
    }

    #[test]
    fn uncompressed_series_needs_no_tool() {
        let slices = vec![SliceBuilder::new(2, 2).build()];
        let missing = Path::new("/nonexistent/gdcmconv");
        assert_eq!(decompress_series(slices, Some(missing)).unwrap().len(), 1);
    }

    #[test]
    fn missing_tool_is_reported() {
        let slices = vec![SliceBuilder::new(2, 2).transfer_syntax(JPEG_BASELINE).build()];
        let missing = Path::new("/nonexistent/gdcmconv");
        let error = decompress_series(slices, Some(missing)).unwrap_err();
        assert_eq!(error.code(), "GDCMCONV_NOT_FOUND");
    }
}
