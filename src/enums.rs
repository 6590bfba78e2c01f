use std::fmt;

/// Element type of a pixel or voxel block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    I64,
    F32,
    F64,
}

impl DataType {
    /// Storage type of a DICOM pixel cell.
    pub fn from_pixel_format(bits_allocated: u16, signed: bool) -> Option<Self> {
        match (bits_allocated, signed) {
            (8, false) => Some(DataType::U8),
            (8, true) => Some(DataType::I8),
            (16, false) => Some(DataType::U16),
            (16, true) => Some(DataType::I16),
            (32, false) => Some(DataType::U32),
            (32, true) => Some(DataType::I32),
            _ => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, DataType::U8 | DataType::U16 | DataType::U32)
    }

    pub fn bits(self) -> u32 {
        match self {
            DataType::U8 | DataType::I8 => 8,
            DataType::U16 | DataType::I16 => 16,
            DataType::U32 | DataType::I32 | DataType::F32 => 32,
            DataType::I64 | DataType::F64 => 64,
        }
    }

    fn signed_with_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(DataType::I8),
            16 => Some(DataType::I16),
            32 => Some(DataType::I32),
            64 => Some(DataType::I64),
            _ => None,
        }
    }

    /// The smallest type that represents every value of both inputs.
    ///
    /// Integers of at most 16 bits fit into `F32`, wider integers combined
    /// with a float need `F64`. Mixing signedness widens the signed side
    /// until it holds the unsigned range.
    pub fn promote(self, other: DataType) -> DataType {
        if self == other {
            return self;
        }
        match (self.is_float(), other.is_float()) {
            (true, true) => DataType::F64,
            (true, false) | (false, true) => {
                let (float, int) = if self.is_float() {
                    (self, other)
                } else {
                    (other, self)
                };
                if float == DataType::F32 && int.bits() <= 16 {
                    DataType::F32
                } else {
                    DataType::F64
                }
            }
            (false, false) => {
                if self.is_signed() == other.is_signed() {
                    return if self.bits() >= other.bits() {
                        self
                    } else {
                        other
                    };
                }
                let (signed, unsigned) = if self.is_signed() {
                    (self, other)
                } else {
                    (other, self)
                };
                if signed.bits() > unsigned.bits() {
                    signed
                } else {
                    DataType::signed_with_bits(unsigned.bits() * 2).unwrap_or(DataType::F64)
                }
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::U8 => "uint8",
            DataType::I8 => "int8",
            DataType::U16 => "uint16",
            DataType::I16 => "int16",
            DataType::U32 => "uint32",
            DataType::I32 => "int32",
            DataType::I64 => "int64",
            DataType::F32 => "float32",
            DataType::F64 => "float64",
        };
        f.write_str(name)
    }
}

/// What kind of acquisition a reconstructor recognised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanKind {
    Anatomical,
    Functional,
    Diffusion,
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanKind::Anatomical => f.write_str("anatomical"),
            ScanKind::Functional => f.write_str("fMRI"),
            ScanKind::Diffusion => f.write_str("DTI"),
        }
    }
}

/// Direction in which mosaic tiles walk through the volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MosaicOrder {
    #[default]
    Ascending,
    Descending,
}
