#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]

//! Zip entry metadata and the codecs for its legacy fields.
//!
//! A [`FileHeader`] carries everything the central directory says about one
//! entry. The MS-DOS timestamp, the unix/MS-DOS attribute words and the
//! 32/64 bit size pair are decoded on demand through [`dostime`], [`mode`]
//! and [`size`]. Reading and writing the container itself is left to the
//! caller.
//!
//! For compatibility every header has both 32 and 64 bit size fields. The 64
//! bit fields always hold the real value; when it does not fit, the 32 bit
//! field holds `0xffffffff` and the zip64 extra field must be written.

pub use config::{Config, TimestampPolicy};
pub use encryption::{Encryption, EncryptionMethod, PasswordFn, AES_VENDOR_VERSION};
pub use error::EntryError;
pub use header::{entry_name, validate_name, CompressionMethod, FileHeader, FLAG_ENCRYPTED};
pub use info::FileInfo;
pub use mode::{decode_mode, encode_mode, EntryKind, FileMode, Platform};
pub use size::{needs_zip64, EntrySizes};

/// Config file for building headers from disk
mod config;
/// MS-DOS date and time codec
pub mod dostime;
/// Encryption parameters
mod encryption;
/// Error codes
mod error;
/// The entry header and its accessors
mod header;
/// Generic file attributes and the bridge to and from headers
pub mod info;
/// Unix and MS-DOS permission codec
pub mod mode;
/// Size fields and the zip64 rule
pub mod size;

/// Compression method: stored
pub const STORE: u16 = 0;
/// Compression method: deflate
pub const DEFLATE: u16 = 8;

/// Creator platform: MS-DOS / FAT
pub const CREATOR_FAT: u8 = 0;
/// Creator platform: unix
pub const CREATOR_UNIX: u8 = 3;
/// Creator platform: NTFS
pub const CREATOR_NTFS: u8 = 11;
/// Creator platform: VFAT
pub const CREATOR_VFAT: u8 = 14;
/// Creator platform: Mac OS X
pub const CREATOR_MACOSX: u8 = 19;

/// Format version 2.0
pub const ZIP_VERSION_20: u16 = 20;
/// Format version 4.5, which reads and writes zip64
pub const ZIP_VERSION_45: u16 = 45;

/// Largest value of a 32 bit field, and the sentinel meaning "see zip64"
pub const UINT32_MAX: u32 = u32::MAX;

/// Zip64 extended information extra field
pub const ZIP64_EXTRA_ID: u16 = 0x0001;
/// WinZip AES extra field
pub const WINZIP_AES_EXTRA_ID: u16 = 0x9901;

/// Whether an extra field ID belongs to one of the records the container
/// reader and writer handle themselves
pub fn is_reserved_extra_id(id: u16) -> bool {
    matches!(id, ZIP64_EXTRA_ID | WINZIP_AES_EXTRA_ID)
}
