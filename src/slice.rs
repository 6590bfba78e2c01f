use crate::accessor::TagAccess;
use crate::dicom_tags;
use crate::enums::DataType;
use crate::error::{ConversionError, Result};

use dicom::core::Tag;
use dicom::object::mem::InMemElement;
use dicom::object::{DefaultDicomObject, open_file};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption};
use dicom_dictionary_std::tags;
use nalgebra::Vector3;
use ndarray::{ArrayD, s};
use std::path::{Path, PathBuf};

/// Pixel values together with the type they are meant to be stored as.
///
/// Values are held as `f64`, which is exact for every supported integer
/// width, so rescaling and stacking never lose information before the
/// final cast in the NIfTI writer.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBlock {
    pub data: ArrayD<f64>,
    pub dtype: DataType,
}

impl PixelBlock {
    pub fn new(data: ArrayD<f64>, dtype: DataType) -> Self {
        Self { data, dtype }
    }

    /// Smallest and largest value, `None` for an empty block.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// One DICOM file: a single 2D image, a mosaic or an enhanced multiframe object.
#[derive(Clone, Debug)]
pub struct DicomSlice {
    path: PathBuf,
    object: DefaultDicomObject,
}

impl DicomSlice {
    pub fn new(path: impl Into<PathBuf>, object: DefaultDicomObject) -> Self {
        Self {
            path: path.into(),
            object,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let object = open_file(path)?;
        Ok(Self::new(path, object))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn object(&self) -> &DefaultDicomObject {
        &self.object
    }

    pub fn transfer_syntax(&self) -> &str {
        self.object
            .meta()
            .transfer_syntax()
            .trim_end_matches(['\0', ' '])
    }

    pub fn sop_class_uid(&self) -> &str {
        self.object
            .meta()
            .media_storage_sop_class_uid()
            .trim_end_matches(['\0', ' '])
    }

    pub fn is_enhanced_mr(&self) -> bool {
        self.sop_class_uid() == dicom_tags::ENHANCED_MR_IMAGE_STORAGE
    }

    pub fn manufacturer(&self) -> String {
        self.string(tags::MANUFACTURER)
            .unwrap_or_default()
            .to_uppercase()
    }

    pub fn modality(&self) -> String {
        self.string(tags::MODALITY).unwrap_or_default().to_uppercase()
    }

    /// ImageType values, upper cased.
    pub fn image_type(&self) -> Vec<String> {
        self.strings(tags::IMAGE_TYPE)
            .into_iter()
            .map(|s| s.to_uppercase())
            .collect()
    }

    pub fn instance_number(&self) -> Option<i64> {
        self.int(tags::INSTANCE_NUMBER)
    }

    pub fn acquisition_number(&self) -> Option<i64> {
        self.int(tags::ACQUISITION_NUMBER)
    }

    pub fn series_instance_uid(&self) -> Option<String> {
        self.string(tags::SERIES_INSTANCE_UID)
    }

    pub fn image_position(&self) -> Option<Vector3<f64>> {
        let values = self.floats(tags::IMAGE_POSITION_PATIENT)?;
        (values.len() >= 3).then(|| Vector3::new(values[0], values[1], values[2]))
    }

    /// Row and column direction cosines.
    pub fn image_orientation(&self) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let v = self.floats(tags::IMAGE_ORIENTATION_PATIENT)?;
        (v.len() >= 6).then(|| {
            (
                Vector3::new(v[0], v[1], v[2]),
                Vector3::new(v[3], v[4], v[5]),
            )
        })
    }

    /// PixelSpacing as stored: (row spacing, column spacing).
    pub fn pixel_spacing(&self) -> Option<(f64, f64)> {
        let values = self.floats(tags::PIXEL_SPACING)?;
        (values.len() >= 2).then(|| (values[0], values[1]))
    }

    pub fn require_position(&self) -> Result<Vector3<f64>> {
        self.image_position()
            .ok_or(ConversionError::MissingTag(tags::IMAGE_POSITION_PATIENT))
    }

    pub fn require_orientation(&self) -> Result<(Vector3<f64>, Vector3<f64>)> {
        self.image_orientation()
            .ok_or(ConversionError::MissingTag(tags::IMAGE_ORIENTATION_PATIENT))
    }

    pub fn require_spacing(&self) -> Result<(f64, f64)> {
        self.pixel_spacing()
            .ok_or(ConversionError::MissingTag(tags::PIXEL_SPACING))
    }

    pub fn rows(&self) -> Result<usize> {
        Ok(self.require_int(tags::ROWS)? as usize)
    }

    pub fn columns(&self) -> Result<usize> {
        Ok(self.require_int(tags::COLUMNS)? as usize)
    }

    pub fn number_of_frames(&self) -> usize {
        self.int(tags::NUMBER_OF_FRAMES)
            .filter(|&n| n > 0)
            .map_or(1, |n| n as usize)
    }

    pub fn repetition_time(&self) -> Option<f64> {
        self.float(tags::REPETITION_TIME)
    }

    pub fn echo_time(&self) -> Option<f64> {
        self.float(tags::ECHO_TIME)
    }

    pub fn spacing_between_slices(&self) -> Option<f64> {
        self.float(tags::SPACING_BETWEEN_SLICES)
    }

    pub fn slice_thickness(&self) -> Option<f64> {
        self.float(tags::SLICE_THICKNESS)
    }

    pub fn patient_position(&self) -> Option<String> {
        self.string(tags::PATIENT_POSITION)
    }

    /// Storage type of the pixel cells.
    pub fn pixel_type(&self) -> Result<DataType> {
        let bits = self.require_int(tags::BITS_ALLOCATED)? as u16;
        let signed = self.int(tags::PIXEL_REPRESENTATION).unwrap_or(0) == 1;
        DataType::from_pixel_format(bits, signed).ok_or_else(|| {
            ConversionError::UnsupportedData(format!("{} bits allocated per pixel", bits))
        })
    }

    /// Decode the pixel data into `(frames, rows, columns)`.
    ///
    /// Values are the stored values: no modality or VOI LUT is applied,
    /// rescaling happens later per vendor.
    pub fn pixel_frames(&self) -> Result<PixelBlock> {
        let samples = self.int(tags::SAMPLES_PER_PIXEL).unwrap_or(1);
        if samples != 1 {
            return Err(ConversionError::UnsupportedData(format!(
                "{} samples per pixel",
                samples
            )));
        }
        let dtype = self.pixel_type()?;
        let (frames, rows, columns) = (self.number_of_frames(), self.rows()?, self.columns()?);
        let element = self
            .element_of(tags::PIXEL_DATA)
            .ok_or(ConversionError::MissingTag(tags::PIXEL_DATA))?;
        // native data only, encapsulated fragments are checked by the decoder
        if let Ok(bytes) = element.to_bytes() {
            let expected = frames * rows * columns * (dtype.bits() / 8) as usize;
            if bytes.len() < expected {
                return Err(ConversionError::InvalidPixelData(format!(
                    "expected {} bytes of pixel data, found {}",
                    expected,
                    bytes.len()
                )));
            }
        }

        let options = ConvertOptions::new()
            .with_modality_lut(ModalityLutOption::None)
            .with_voi_lut(VoiLutOption::Identity);
        let mut data = self
            .object
            .decode_pixel_data()
            .map_err(|e| ConversionError::InvalidPixelData(e.to_string()))?
            .to_ndarray_with_options::<f64>(&options)
            .map_err(|e| ConversionError::InvalidPixelData(e.to_string()))?
            .slice_move(s![.., .., .., 0]);
        if data.dim() != (frames, rows, columns) {
            return Err(ConversionError::InvalidPixelData(format!(
                "decoded {:?}, expected ({}, {}, {})",
                data.dim(),
                frames,
                rows,
                columns
            )));
        }

        let bits_stored = self
            .int(tags::BITS_STORED)
            .filter(|&b| b > 0)
            .map_or(dtype.bits(), |b| b as u32);
        if dtype.is_signed() && bits_stored < dtype.bits() {
            data.mapv_inplace(|v| sign_extend(v, bits_stored));
        }
        Ok(PixelBlock::new(data.into_dyn(), dtype))
    }
}

impl TagAccess for DicomSlice {
    fn element_of(&self, tag: Tag) -> Option<&InMemElement> {
        self.object.element_opt(tag).ok().flatten()
    }
}

/// Reads the low `bits` of a stored value as two's complement.
fn sign_extend(value: f64, bits: u32) -> f64 {
    let value = value as i64;
    let low = value & ((1_i64 << bits) - 1);
    if low & (1_i64 << (bits - 1)) != 0 {
        (low - (1_i64 << bits)) as f64
    } else {
        low as f64
    }
}
