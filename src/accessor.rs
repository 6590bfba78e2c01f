//! Typed access to DICOM attributes.
//!
//! Files written with an implicit VR transfer syntax (and private tags in
//! general) often surface numeric values as opaque `OB`/`UN` byte blobs.
//! The caller knows from the dictionary what the attribute should hold, so
//! the decoding here is driven by an expected [`SemanticType`] instead of the
//! declared VR.

use crate::error::{ConversionError, Result};

use byteorder::{ByteOrder, LittleEndian};
use dicom::core::{Tag, VR};
use dicom::object::InMemDicomObject;
use dicom::object::mem::InMemElement;

/// The value type an attribute is known to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// `SS`, 2 byte signed integer
    SignedShort,
    /// `FL`, 4 byte float
    Float,
    /// `FD`, 8 byte float
    Double,
    /// `IS`, integer formatted as ASCII digits
    IntegerString,
}

impl SemanticType {
    fn width(self) -> Option<usize> {
        match self {
            SemanticType::SignedShort => Some(2),
            SemanticType::Float => Some(4),
            SemanticType::Double => Some(8),
            SemanticType::IntegerString => None,
        }
    }
}

fn is_generic_binary(vr: VR) -> bool {
    matches!(vr, VR::OB | VR::UN)
}

fn decoding_error(tag: Tag, reason: impl ToString) -> ConversionError {
    ConversionError::TagDecoding {
        tag,
        reason: reason.to_string(),
    }
}

fn ascii_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

fn decode_binary(tag: Tag, bytes: &[u8], kind: SemanticType) -> Result<f64> {
    if let Some(width) = kind.width() {
        if bytes.len() != width {
            return Err(decoding_error(
                tag,
                format!("expected {} bytes, found {}", width, bytes.len()),
            ));
        }
    }
    match kind {
        SemanticType::SignedShort => Ok(LittleEndian::read_i16(bytes) as f64),
        SemanticType::Float => Ok(LittleEndian::read_f32(bytes) as f64),
        SemanticType::Double => Ok(LittleEndian::read_f64(bytes)),
        SemanticType::IntegerString => {
            let digits: String = ascii_text(bytes).chars().filter(|c| *c != ' ').collect();
            digits
                .parse::<i64>()
                .map(|v| v as f64)
                .map_err(|e| decoding_error(tag, e))
        }
    }
}

/// Decode a single value, reinterpreting `OB`/`UN` bytes as `kind`.
pub fn typed_value(element: &InMemElement, kind: SemanticType) -> Result<f64> {
    let tag = element.header().tag;
    if is_generic_binary(element.header().vr) {
        let bytes = element.to_bytes().map_err(|e| decoding_error(tag, e))?;
        return decode_binary(tag, &bytes, kind);
    }
    match kind {
        SemanticType::SignedShort | SemanticType::IntegerString => element
            .to_int::<i64>()
            .map(|v| v as f64)
            .map_err(|e| decoding_error(tag, e)),
        SemanticType::Float | SemanticType::Double => {
            element.to_float64().map_err(|e| decoding_error(tag, e))
        }
    }
}

/// Decode `count` consecutive fixed width values.
pub fn typed_array(element: &InMemElement, kind: SemanticType, count: usize) -> Result<Vec<f64>> {
    let tag = element.header().tag;
    if is_generic_binary(element.header().vr) {
        let width = kind
            .width()
            .ok_or_else(|| decoding_error(tag, "integer strings cannot be unpacked as an array"))?;
        let bytes = element.to_bytes().map_err(|e| decoding_error(tag, e))?;
        if bytes.len() != count * width {
            return Err(decoding_error(
                tag,
                format!(
                    "expected {} values of {} bytes, found {} bytes",
                    count,
                    width,
                    bytes.len()
                ),
            ));
        }
        return bytes
            .chunks_exact(width)
            .map(|chunk| decode_binary(tag, chunk, kind))
            .collect();
    }
    let values = element
        .to_multi_float64()
        .map_err(|e| decoding_error(tag, e))?;
    if values.len() < count {
        return Err(decoding_error(
            tag,
            format!("expected {} values, found {}", count, values.len()),
        ));
    }
    Ok(values[..count].to_vec())
}

/// Decode backslash separated numbers, also when stored as ASCII under `OB`/`UN`.
pub fn ascii_values(element: &InMemElement) -> Result<Vec<f64>> {
    let tag = element.header().tag;
    if is_generic_binary(element.header().vr) {
        let bytes = element.to_bytes().map_err(|e| decoding_error(tag, e))?;
        return ascii_text(&bytes)
            .split('\\')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|e| decoding_error(tag, e))
            })
            .collect();
    }
    element
        .to_multi_float64()
        .map_err(|e| decoding_error(tag, e))
}

/// Convenience getters over an in-memory data set.
///
/// Implemented for [`InMemDicomObject`] so that the same helpers work on a
/// file object (through deref) and on sequence items.
pub trait TagAccess {
    fn element_of(&self, tag: Tag) -> Option<&InMemElement>;

    fn has(&self, tag: Tag) -> bool {
        self.element_of(tag).is_some()
    }

    fn string(&self, tag: Tag) -> Option<String> {
        self.element_of(tag)?
            .to_str()
            .ok()
            .map(|s| s.trim_matches(|c: char| c == '\0' || c == ' ').to_string())
    }

    fn strings(&self, tag: Tag) -> Vec<String> {
        self.element_of(tag)
            .and_then(|e| e.to_multi_str().ok())
            .map(|values| {
                values
                    .iter()
                    .map(|s| s.trim_matches(|c: char| c == '\0' || c == ' ').to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn int(&self, tag: Tag) -> Option<i64> {
        self.element_of(tag)?.to_int::<i64>().ok()
    }

    fn float(&self, tag: Tag) -> Option<f64> {
        self.element_of(tag)?.to_float64().ok()
    }

    fn floats(&self, tag: Tag) -> Option<Vec<f64>> {
        self.element_of(tag)?
            .to_multi_float64()
            .ok()
    }

    /// Like [`typed_value`], `Ok(None)` when the attribute is absent.
    fn typed(&self, tag: Tag, kind: SemanticType) -> Result<Option<f64>> {
        self.element_of(tag)
            .map(|e| typed_value(e, kind))
            .transpose()
    }

    fn items(&self, tag: Tag) -> &[InMemDicomObject] {
        self.element_of(tag)
            .and_then(|e| e.items())
            .unwrap_or(&[])
    }

    fn item(&self, tag: Tag, index: usize) -> Option<&InMemDicomObject> {
        self.items(tag).get(index)
    }

    fn require_float(&self, tag: Tag) -> Result<f64> {
        self.float(tag).ok_or(ConversionError::MissingTag(tag))
    }

    fn require_int(&self, tag: Tag) -> Result<i64> {
        self.int(tag).ok_or(ConversionError::MissingTag(tag))
    }

    fn require_floats(&self, tag: Tag, count: usize) -> Result<Vec<f64>> {
        match self.floats(tag) {
            Some(values) if values.len() >= count => Ok(values),
            Some(values) => Err(decoding_error(
                tag,
                format!("expected {} values, found {}", count, values.len()),
            )),
            None => Err(ConversionError::MissingTag(tag)),
        }
    }
}

impl TagAccess for InMemDicomObject {
    fn element_of(&self, tag: Tag) -> Option<&InMemElement> {
        self.element_opt(tag).ok().flatten()
    }
}
