//! Synthetic DICOM series written to disk.

#![allow(dead_code)]

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};
use std::path::Path;

const MR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.4";

fn decimal_strings(values: &[f64]) -> PrimitiveValue {
    PrimitiveValue::Strs(values.iter().map(|v| v.to_string()).collect())
}

/// Description of one single frame slice.
pub struct SliceSpec<'a> {
    pub size: usize,
    pub position: [f64; 3],
    pub orientation: [f64; 6],
    pub instance: i64,
    pub series_uid: &'a str,
    pub series_number: i64,
    pub manufacturer: &'a str,
    pub value: u16,
}

impl Default for SliceSpec<'_> {
    fn default() -> Self {
        Self {
            size: 4,
            position: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            instance: 1,
            series_uid: "1.2.826.0.1.3680043.2.1",
            series_number: 1,
            manufacturer: "ACME",
            value: 0,
        }
    }
}

pub fn write_slice(path: &Path, spec: &SliceSpec) {
    let mut object = InMemDicomObject::new_empty();
    let size = spec.size as u16;
    object.put(DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("MR")));
    object.put(DataElement::new(
        tags::MANUFACTURER,
        VR::LO,
        PrimitiveValue::from(spec.manufacturer),
    ));
    object.put(DataElement::new(
        tags::SERIES_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(spec.series_uid),
    ));
    object.put(DataElement::new(
        tags::SERIES_NUMBER,
        VR::IS,
        PrimitiveValue::from(spec.series_number.to_string()),
    ));
    object.put(DataElement::new(
        tags::INSTANCE_NUMBER,
        VR::IS,
        PrimitiveValue::from(spec.instance.to_string()),
    ));
    object.put(DataElement::new(
        tags::IMAGE_POSITION_PATIENT,
        VR::DS,
        decimal_strings(&spec.position),
    ));
    object.put(DataElement::new(
        tags::IMAGE_ORIENTATION_PATIENT,
        VR::DS,
        decimal_strings(&spec.orientation),
    ));
    object.put(DataElement::new(tags::PIXEL_SPACING, VR::DS, decimal_strings(&[1.0, 1.0])));
    object.put(DataElement::new(tags::REPETITION_TIME, VR::DS, decimal_strings(&[2000.0])));
    object.put(DataElement::new(tags::ECHO_TIME, VR::DS, decimal_strings(&[30.0])));
    object.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(size)));
    object.put(DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(size)));
    object.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));
    object.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
    object.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
    object.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
    object.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
    object.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0_u16),
    ));
    let pixels: Vec<u8> = (0..spec.size * spec.size)
        .flat_map(|_| spec.value.to_le_bytes())
        .collect();
    object.put(DataElement::new(tags::PIXEL_DATA, VR::OW, PrimitiveValue::from(pixels)));

    let file = object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(MR_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(format!("{}.{}", spec.series_uid, spec.instance)),
        )
        .expect("valid file meta");
    file.write_to_file(path).expect("fixture written");
}

/// `count` axial slices stepping `step` mm along z, one file each.
pub fn write_axial_series(dir: &Path, count: usize, step: f64, series_uid: &str, series_number: i64) {
    std::fs::create_dir_all(dir).expect("fixture directory");
    for i in 0..count {
        let spec = SliceSpec {
            position: [0.0, 0.0, i as f64 * step],
            instance: i as i64 + 1,
            series_uid,
            series_number,
            value: i as u16,
            ..SliceSpec::default()
        };
        write_slice(&dir.join(format!("slice{:03}.dcm", i)), &spec);
    }
}
