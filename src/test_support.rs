//! In-memory DICOM fixtures for unit tests.

use crate::slice::DicomSlice;

use dicom::core::value::DataSetSequence;
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};

pub const MR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.4";

pub fn decimal_strings(values: &[f64]) -> PrimitiveValue {
    PrimitiveValue::Strs(values.iter().map(|v| v.to_string()).collect())
}

pub fn item(elements: Vec<DataElement<InMemDicomObject>>) -> InMemDicomObject {
    InMemDicomObject::from_element_iter(elements)
}

pub fn sequence(tag: Tag, items: Vec<InMemDicomObject>) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::SQ, DataSetSequence::from(items))
}

pub fn ds(tag: Tag, values: &[f64]) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::DS, decimal_strings(values))
}

pub fn fd(tag: Tag, values: &[f64]) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::FD, PrimitiveValue::F64(values.iter().copied().collect()))
}

pub fn fl(tag: Tag, value: f32) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::FL, PrimitiveValue::from(value))
}

pub fn text(tag: Tag, vr: VR, value: &str) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, vr, PrimitiveValue::from(value))
}

pub fn int_string(tag: Tag, value: i64) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::IS, PrimitiveValue::from(value.to_string()))
}

pub fn unsigned_long(tag: Tag, value: u32) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::UL, PrimitiveValue::from(value))
}

/// Builds a [`DicomSlice`] with sensible MR defaults.
pub struct SliceBuilder {
    object: InMemDicomObject,
    rows: usize,
    columns: usize,
    frames: usize,
    pixels: Option<(Vec<u8>, bool)>,
    sop_class: String,
    transfer_syntax: String,
}

impl SliceBuilder {
    pub fn new(rows: usize, columns: usize) -> Self {
        let mut builder = Self {
            object: InMemDicomObject::new_empty(),
            rows,
            columns,
            frames: 1,
            pixels: None,
            sop_class: MR_IMAGE_STORAGE.to_string(),
            transfer_syntax: uids::EXPLICIT_VR_LITTLE_ENDIAN.to_string(),
        };
        builder.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows as u16)));
        builder.put(DataElement::new(
            tags::COLUMNS,
            VR::US,
            PrimitiveValue::from(columns as u16),
        ));
        builder.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
        builder.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
        builder.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
        builder.put(text(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2"));
        builder.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
        builder.put(text(tags::MANUFACTURER, VR::LO, "ACME"));
        builder.put(text(tags::MODALITY, VR::CS, "MR"));
        builder.put(text(tags::SERIES_INSTANCE_UID, VR::UI, "1.2.3.4"));
        builder
    }

    pub fn put(&mut self, element: DataElement<InMemDicomObject>) -> &mut Self {
        self.object.put(element);
        self
    }

    pub fn with(mut self, element: DataElement<InMemDicomObject>) -> Self {
        self.object.put(element);
        self
    }

    pub fn position(self, position: [f64; 3]) -> Self {
        self.with(ds(tags::IMAGE_POSITION_PATIENT, &position))
    }

    pub fn orientation(self, orientation: [f64; 6]) -> Self {
        self.with(ds(tags::IMAGE_ORIENTATION_PATIENT, &orientation))
    }

    pub fn spacing(self, row: f64, column: f64) -> Self {
        self.with(ds(tags::PIXEL_SPACING, &[row, column]))
    }

    pub fn instance_number(self, number: i64) -> Self {
        self.with(int_string(tags::INSTANCE_NUMBER, number))
    }

    pub fn acquisition_number(self, number: i64) -> Self {
        self.with(int_string(tags::ACQUISITION_NUMBER, number))
    }

    pub fn manufacturer(self, manufacturer: &str) -> Self {
        self.with(text(tags::MANUFACTURER, VR::LO, manufacturer))
    }

    pub fn modality(self, modality: &str) -> Self {
        self.with(text(tags::MODALITY, VR::CS, modality))
    }

    pub fn image_type(self, values: &[&str]) -> Self {
        self.with(DataElement::new(
            tags::IMAGE_TYPE,
            VR::CS,
            PrimitiveValue::Strs(values.iter().map(|s| s.to_string()).collect()),
        ))
    }

    pub fn rescale(self, slope: f64, intercept: f64) -> Self {
        self.with(ds(tags::RESCALE_SLOPE, &[slope]))
            .with(ds(tags::RESCALE_INTERCEPT, &[intercept]))
    }

    pub fn frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self.with(int_string(tags::NUMBER_OF_FRAMES, frames as i64))
    }

    pub fn sop_class(mut self, uid: &str) -> Self {
        self.sop_class = uid.to_string();
        self
    }

    pub fn transfer_syntax(mut self, uid: &str) -> Self {
        self.transfer_syntax = uid.to_string();
        self
    }

    /// Unsigned 16 bit pixel values, row major.
    pub fn pixels(mut self, values: Vec<u16>) -> Self {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.pixels = Some((bytes, false));
        self
    }

    /// Signed 16 bit pixel values, row major.
    pub fn signed_pixels(mut self, values: Vec<i16>) -> Self {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.pixels = Some((bytes, true));
        self
    }

    /// Every pixel of the image set to `value`.
    pub fn filled(self, value: u16) -> Self {
        let count = self.rows * self.columns * self.frames;
        self.pixels(vec![value; count])
    }

    pub fn build(self) -> DicomSlice {
        let count = self.rows * self.columns * self.frames;
        let (bytes, signed) = self.pixels.unwrap_or_else(|| (vec![0; count * 2], false));
        let mut object = self.object;
        object.put(DataElement::new(
            tags::PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(u16::from(signed)),
        ));
        object.put(DataElement::new(tags::PIXEL_DATA, VR::OW, PrimitiveValue::from(bytes)));
        let file = object
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(self.transfer_syntax)
                    .media_storage_sop_class_uid(self.sop_class)
                    .media_storage_sop_instance_uid("1.2.3.4.5"),
            )
            .expect("valid file meta");
        DicomSlice::new("memory.dcm", file)
    }
}

/// A stack of `count` axial slices of `size`×`size` pixels stepping `step` in z.
pub fn axial_stack(count: usize, size: usize, step: f64) -> Vec<DicomSlice> {
    (0..count)
        .map(|i| {
            SliceBuilder::new(size, size)
                .position([0.0, 0.0, i as f64 * step])
                .orientation([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
                .spacing(1.0, 1.0)
                .instance_number(i as i64 + 1)
                .filled(i as u16)
                .build()
        })
        .collect()
}
