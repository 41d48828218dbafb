use serde::{Deserialize, Serialize};

use crate::UINT32_MAX;

/// Reports whether either size is too large for the 32 bit header fields
pub fn needs_zip64(compressed_size: u64, uncompressed_size: u64) -> bool {
    compressed_size > UINT32_MAX as u64 || uncompressed_size > UINT32_MAX as u64
}

/// The value to store in a 32 bit size field. Sizes that do not fit become
/// the all-ones sentinel, which tells readers to use the zip64 field.
pub fn legacy_size(size: u64) -> u32 {
    u32::try_from(size).unwrap_or(UINT32_MAX)
}

/// Compressed and uncompressed sizes of an entry.
///
/// The 64 bit values are authoritative. The 32 bit fields and the zip64 flag
/// are derived from them on construction, so they can never disagree.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Default)]
#[serde(from = "SizesRepr", into = "SizesRepr")]
pub struct EntrySizes {
    compressed_size_64:   u64,
    uncompressed_size_64: u64,
    compressed_size:      u32,
    uncompressed_size:    u32,
    zip64:                bool,
}

impl EntrySizes {
    /// Sizes for an entry with the given compressed and uncompressed lengths
    pub fn new(compressed_size_64: u64, uncompressed_size_64: u64) -> Self {
        Self {
            compressed_size_64,
            uncompressed_size_64,
            compressed_size: legacy_size(compressed_size_64),
            uncompressed_size: legacy_size(uncompressed_size_64),
            zip64: needs_zip64(compressed_size_64, uncompressed_size_64),
        }
    }

    /// Authoritative compressed size
    pub fn compressed_size_64(&self) -> u64 {
        self.compressed_size_64
    }

    /// Authoritative uncompressed size
    pub fn uncompressed_size_64(&self) -> u64 {
        self.uncompressed_size_64
    }

    /// Value for the 32 bit compressed size field
    pub fn compressed_size(&self) -> u32 {
        self.compressed_size
    }

    /// Value for the 32 bit uncompressed size field
    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// Whether the entry needs the zip64 extra field
    pub fn is_zip64(&self) -> bool {
        self.zip64
    }
}

#[derive(Serialize, Deserialize)]
struct SizesRepr {
    compressed:   u64,
    uncompressed: u64,
}

impl From<SizesRepr> for EntrySizes {
    fn from(v: SizesRepr) -> Self {
        EntrySizes::new(v.compressed, v.uncompressed)
    }
}

impl From<EntrySizes> for SizesRepr {
    fn from(v: EntrySizes) -> Self {
        Self {
            compressed:   v.compressed_size_64,
            uncompressed: v.uncompressed_size_64,
        }
    }
}
