//! Tags that the standard dictionary names poorly or not at all.
//!
//! Vendor private tags are only meaningful inside files of that vendor,
//! the enhanced MR tags are listed here so that the multiframe code reads
//! as a table of the attributes it walks through.

use dicom::core::Tag;

// Enhanced MR functional groups
pub const FRAME_CONTENT_SEQUENCE: Tag = Tag(0x0020, 0x9111);
pub const PLANE_POSITION_SEQUENCE: Tag = Tag(0x0020, 0x9113);
pub const PLANE_ORIENTATION_SEQUENCE: Tag = Tag(0x0020, 0x9116);
pub const STACK_ID: Tag = Tag(0x0020, 0x9056);
pub const IN_STACK_POSITION_NUMBER: Tag = Tag(0x0020, 0x9057);
pub const TEMPORAL_POSITION_INDEX: Tag = Tag(0x0020, 0x9128);
pub const DIMENSION_INDEX_VALUES: Tag = Tag(0x0020, 0x9157);
pub const DIMENSION_INDEX_SEQUENCE: Tag = Tag(0x0020, 0x9222);
pub const DIMENSION_DESCRIPTION_LABEL: Tag = Tag(0x0020, 0x9421);
pub const PIXEL_MEASURES_SEQUENCE: Tag = Tag(0x0028, 0x9110);
pub const PIXEL_VALUE_TRANSFORMATION_SEQUENCE: Tag = Tag(0x0028, 0x9145);
pub const MR_TIMING_AND_RELATED_PARAMETERS_SEQUENCE: Tag = Tag(0x0018, 0x9112);
pub const MR_ECHO_SEQUENCE: Tag = Tag(0x0018, 0x9114);
pub const EFFECTIVE_ECHO_TIME: Tag = Tag(0x0018, 0x9082);
pub const MR_DIFFUSION_SEQUENCE: Tag = Tag(0x0018, 0x9117);
pub const DIFFUSION_DIRECTIONALITY: Tag = Tag(0x0018, 0x9075);
pub const DIFFUSION_GRADIENT_DIRECTION_SEQUENCE: Tag = Tag(0x0018, 0x9076);
pub const DIFFUSION_B_VALUE: Tag = Tag(0x0018, 0x9087);
pub const DIFFUSION_GRADIENT_ORIENTATION: Tag = Tag(0x0018, 0x9089);
pub const PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE: Tag = Tag(0x5200, 0x9230);
pub const SHARED_FUNCTIONAL_GROUPS_SEQUENCE: Tag = Tag(0x5200, 0x9229);

// Siemens
pub const SIEMENS_B_VALUE: Tag = Tag(0x0019, 0x100C);
pub const SIEMENS_GRADIENT_DIRECTION: Tag = Tag(0x0019, 0x100E);
pub const SIEMENS_SERIES_HEADER_INFO: Tag = Tag(0x0029, 0x1020);
pub const SIEMENS_ACQUISITION_MATRIX_TEXT: Tag = Tag(0x0051, 0x100B);

// GE
pub const GE_DIFFUSION_X: Tag = Tag(0x0019, 0x10BB);
pub const GE_DIFFUSION_Y: Tag = Tag(0x0019, 0x10BC);
pub const GE_DIFFUSION_Z: Tag = Tag(0x0019, 0x10BD);
pub const GE_B_VALUES: Tag = Tag(0x0043, 0x1039);

// Philips
pub const PHILIPS_B_VALUE: Tag = Tag(0x2001, 0x1003);
pub const PHILIPS_SLICE_NUMBER_MR: Tag = Tag(0x2001, 0x100A);
pub const PHILIPS_NUMBER_OF_STACK_SLICES: Tag = Tag(0x2001, 0x102D);
pub const PHILIPS_STACK_SEQUENCE: Tag = Tag(0x2001, 0x105F);
pub const PHILIPS_SCALE_INTERCEPT: Tag = Tag(0x2005, 0x100D);
pub const PHILIPS_SCALE_SLOPE: Tag = Tag(0x2005, 0x100E);
pub const PHILIPS_GRADIENT_X: Tag = Tag(0x2005, 0x10B0);
pub const PHILIPS_GRADIENT_Y: Tag = Tag(0x2005, 0x10B1);
pub const PHILIPS_GRADIENT_Z: Tag = Tag(0x2005, 0x10B2);
pub const PHILIPS_PRIVATE_FRAME_SEQUENCE: Tag = Tag(0x2005, 0x140F);

// SOP classes and transfer syntaxes
pub const ENHANCED_MR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.4.1";
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
pub const UNCOMPRESSED_TRANSFER_SYNTAXES: [&str; 4] = [
    "1.2.840.10008.1.2",
    "1.2.840.10008.1.2.1",
    "1.2.840.10008.1.2.1.99",
    "1.2.840.10008.1.2.2",
];
