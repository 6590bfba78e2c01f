use crate::accessor::{SemanticType, TagAccess};
use crate::dicom_tags;
use crate::enums::DataType;
use crate::error::Result;
use crate::slice::PixelBlock;

use dicom_dictionary_std::tags;

/// Linear transform from stored pixel values to output values.
///
/// A private pair other than the identity replaces the standard pair, the
/// two are never composed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RescaleParams {
    pub slope: f64,
    pub intercept: f64,
    pub private_slope: f64,
    pub private_intercept: f64,
}

impl Default for RescaleParams {
    fn default() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
            private_slope: 1.0,
            private_intercept: 0.0,
        }
    }
}

impl RescaleParams {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self {
            slope,
            intercept,
            ..Self::default()
        }
    }

    pub fn with_private(mut self, slope: f64, intercept: f64) -> Self {
        self.private_slope = slope;
        self.private_intercept = intercept;
        self
    }

    /// Read RescaleSlope/RescaleIntercept, and with `include_private` the
    /// Philips private scale tags, from a header or a functional group item.
    pub fn from_header(header: &impl TagAccess, include_private: bool) -> Result<Self> {
        let mut params = Self::new(
            header.float(tags::RESCALE_SLOPE).unwrap_or(1.0),
            header.float(tags::RESCALE_INTERCEPT).unwrap_or(0.0),
        );
        if include_private {
            params.private_slope = header
                .typed(dicom_tags::PHILIPS_SCALE_SLOPE, SemanticType::Float)?
                .unwrap_or(1.0);
            params.private_intercept = header
                .typed(dicom_tags::PHILIPS_SCALE_INTERCEPT, SemanticType::Float)?
                .unwrap_or(0.0);
        }
        Ok(params)
    }

    fn has_private_override(&self) -> bool {
        self.private_slope != 1.0 || self.private_intercept != 0.0
    }

    /// The pair that is actually applied.
    pub fn effective(&self) -> (f64, f64) {
        if self.has_private_override() {
            (self.private_slope, self.private_intercept)
        } else {
            (self.slope, self.intercept)
        }
    }

    pub fn is_identity(&self) -> bool {
        self.effective() == (1.0, 0.0)
    }

    fn needs_float(&self) -> bool {
        [
            self.slope,
            self.intercept,
            self.private_slope,
            self.private_intercept,
        ]
        .iter()
        .any(|v| v.fract() != 0.0)
    }

    fn apply(&self, value: f64) -> f64 {
        let (slope, intercept) = self.effective();
        value * slope + intercept
    }

    /// Output type for a block of `dtype` spanning `[min, max]`.
    pub fn output_type(&self, dtype: DataType, range: Option<(f64, f64)>) -> DataType {
        if dtype.is_float() {
            return dtype;
        }
        if self.needs_float() {
            return DataType::F32;
        }
        let Some((min, max)) = range else {
            return dtype;
        };
        let candidates = [min, max, self.apply(min), self.apply(max)];
        let lowest = candidates.iter().copied().fold(f64::INFINITY, f64::min);
        let highest = candidates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if lowest < 0.0 {
            let magnitude = highest.max(-lowest);
            if magnitude < 2f64.powi(7) {
                DataType::I8
            } else if magnitude < 2f64.powi(15) {
                DataType::I16
            } else if magnitude < 2f64.powi(31) {
                DataType::I32
            } else {
                DataType::F32
            }
        } else if highest < 2f64.powi(8) {
            DataType::U8
        } else if highest < 2f64.powi(16) {
            DataType::U16
        } else if highest < 2f64.powi(32) {
            DataType::U32
        } else {
            DataType::F32
        }
    }
}

/// Apply `params` to `block` and pick the output type.
pub fn rescale(mut block: PixelBlock, params: &RescaleParams) -> PixelBlock {
    if params.is_identity() {
        return block;
    }
    let dtype = params.output_type(block.dtype, block.min_max());
    let (slope, intercept) = params.effective();
    block.data.par_mapv_inplace(|v| v * slope + intercept);
    block.dtype = dtype;
    block
}
