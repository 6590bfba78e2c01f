use dicom::core::Tag;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a conversion can fail.
///
/// The [`Display`](std::fmt::Display) text is meant for humans, while
/// [`ConversionError::code`] returns a stable identifier that callers and
/// tests can branch on.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("No DICOM files found in the input")]
    NoDicomFilesFound,

    #[error("Compressed DICOM input requires gdcmconv, which could not be found")]
    DecompressorNotFound,

    #[error("Failed to decompress {path}: {reason}")]
    Decompression { path: PathBuf, reason: String },

    #[error("The DICOM files do not contain volumetric image data")]
    NonImagingDicom,

    #[error("Unsupported data: {0}")]
    UnsupportedData(String),

    #[error("Enhanced (multiframe) DICOM with implicit VR transfer syntax is not supported")]
    ImplicitVrEnhancedDicom,

    #[error("Missing DICOM files: {0}")]
    MissingDicomFiles(String),

    #[error("At least 4 slices are needed for a volume, found {0}")]
    TooFewSlices(usize),

    #[error("Image orientations are not consistent through all slices")]
    OrientationInconsistent,

    #[error("Volume is not orthogonal (gantry tilt or non cubical image)")]
    NonCubicalImage,

    #[error("Slice increment is not consistent through all slices")]
    SliceIncrementInconsistent,

    #[error("Slices do not form a volume: {0}")]
    NotAVolume(String),

    #[error("Acquisition numbers of the mosaics are not strictly increasing")]
    InconsistentAcquisitionNumbers,

    #[error("Siemens DTI conversion requires a head first supine (HFS) patient position")]
    SiemensDtiNotHfs,

    #[error("Unable to determine the Siemens mosaic layout: {0}")]
    MosaicTypeNotSupported(String),

    #[error("Missing DICOM tag {0}")]
    MissingTag(Tag),

    #[error("Failed to decode tag {tag}: {reason}")]
    TagDecoding { tag: Tag, reason: String },

    #[error("Invalid pixel data: {0}")]
    InvalidPixelData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),
}

impl ConversionError {
    /// Machine readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::NoDicomFilesFound => "NO_DICOM_FILES_FOUND",
            ConversionError::DecompressorNotFound => "GDCMCONV_NOT_FOUND",
            ConversionError::Decompression { .. } => "DECOMPRESSION_FAILED",
            ConversionError::NonImagingDicom => "NON_IMAGING_DICOM_FILES",
            ConversionError::UnsupportedData(_) => "UNSUPPORTED_DATA",
            ConversionError::ImplicitVrEnhancedDicom => "IMPLICIT_VR_ENHANCED_DICOM",
            ConversionError::MissingDicomFiles(_) => "MISSING_DICOM_FILES",
            ConversionError::TooFewSlices(_) => "TOO_FEW_SLICES",
            ConversionError::OrientationInconsistent => "IMAGE_ORIENTATION_INCONSISTENT",
            ConversionError::NonCubicalImage => "NON_CUBICAL_IMAGE",
            ConversionError::SliceIncrementInconsistent => "SLICE_INCREMENT_INCONSISTENT",
            ConversionError::NotAVolume(_) => "NOT_A_VOLUME",
            ConversionError::InconsistentAcquisitionNumbers => "INCONSISTENT_ACQUISITION_NUMBERS",
            ConversionError::SiemensDtiNotHfs => "SIEMENS_DTI_NOT_HFS",
            ConversionError::MosaicTypeNotSupported(_) => "MOSAIC_TYPE_NOT_SUPPORTED",
            ConversionError::MissingTag(_) => "MISSING_DICOM_TAG",
            ConversionError::TagDecoding { .. } => "TAG_DECODING_ERROR",
            ConversionError::InvalidPixelData(_) => "INVALID_PIXEL_DATA",
            ConversionError::Io(_) => "IO_ERROR",
            ConversionError::Dicom(_) => "DICOM_READ_ERROR",
            ConversionError::Nifti(_) => "NIFTI_WRITE_ERROR",
        }
    }

    /// Whether the error comes from a geometric check that
    /// [`ValidationSettings`](crate::validation::ValidationSettings) can disable.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConversionError::TooFewSlices(_)
                | ConversionError::OrientationInconsistent
                | ConversionError::NonCubicalImage
                | ConversionError::SliceIncrementInconsistent
                | ConversionError::ImplicitVrEnhancedDicom
        )
    }
}

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_independent_of_messages() {
        let error = ConversionError::TooFewSlices(3);
        assert_eq!(error.code(), "TOO_FEW_SLICES");
        assert!(error.to_string().contains('3'));
        assert!(error.is_validation());
        assert!(!ConversionError::NoDicomFilesFound.is_validation());
    }
}
