use std::path::{Component, Path};

use anyhow::Result;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use lexiclean::Lexiclean;
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, TimestampPolicy},
    dostime::{
        datetime_to_dos, dos_to_datetime, is_representable, saturating_datetime, try_datetime_to_dos,
    },
    encryption::{Encryption, EncryptionMethod, PasswordFn},
    error::EntryError,
    info::FileInfo,
    mode::{decode_mode, encode_mode, EntryKind, FileMode, Platform},
    size::EntrySizes,
    ZIP_VERSION_20, ZIP_VERSION_45,
};

/// General purpose flag: the entry is encrypted
pub const FLAG_ENCRYPTED: u16 = 0x1;

/// How an entry's payload is compressed
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone)]
pub enum CompressionMethod {
    /// Stored without compression
    Store,
    /// Deflate compressed
    Deflate,
}

impl TryFrom<u16> for CompressionMethod {
    type Error = EntryError;

    fn try_from(v: u16) -> Result<Self, Self::Error> {
        match v {
            crate::STORE => Ok(CompressionMethod::Store),
            crate::DEFLATE => Ok(CompressionMethod::Deflate),
            other => Err(EntryError::UnsupportedMethod(other)),
        }
    }
}

impl From<CompressionMethod> for u16 {
    fn from(v: CompressionMethod) -> Self {
        match v {
            CompressionMethod::Store => crate::STORE,
            CompressionMethod::Deflate => crate::DEFLATE,
        }
    }
}

/// Describes a file within a zip archive.
///
/// The container reader fills one of these from a central directory record;
/// the writer builds one (usually from a [`FileInfo`]) and serializes it.
/// Nothing here reads or writes the raw bytes.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FileHeader {
    /// Name of the entry. A relative path with forward slashes; a trailing
    /// slash marks a directory. See [`validate_name`].
    pub name:            String,
    /// Writer's platform in the high byte, format version in the low byte
    pub creator_version: u16,
    /// Minimum format version needed to extract
    pub reader_version:  u16,
    /// General purpose bit flags
    pub flags:           u16,
    /// Compression method
    pub method:          u16,
    /// MS-DOS time
    pub modified_time:   u16,
    /// MS-DOS date
    pub modified_date:   u16,
    /// CRC-32 of the uncompressed payload
    pub crc32:           u32,
    sizes:               EntrySizes,
    /// Extra field records, unparsed
    pub extra:           Vec<u8>,
    /// Meaning depends on the platform in `creator_version`
    pub external_attrs:  u32,
    /// Entry comment
    pub comment:         String,
    /// Encryption parameters, if the entry is encrypted
    pub encryption:      Option<Encryption>,
}

impl FileHeader {
    /// Create an empty header for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a header for a file on disk, named relative to `root`
    pub fn from_path(root: &Path, path: &Path, config: &Config) -> Result<FileHeader> {
        let info = FileInfo::from_path(path)?;
        if config.timestamps == TimestampPolicy::Reject {
            try_datetime_to_dos(&saturating_datetime(info.modified))?;
        }

        let mut fh = FileHeader::from(&info);
        fh.name = entry_name(root, path, info.is_dir())?;
        if config.strict_names {
            validate_name(&fh.name)?;
        }
        fh.creator_version = fh.creator_version & 0xff00 | u16::from(config.creator_version);
        fh.reader_version = fh.required_reader_version();

        log::debug!("{}: {} {} bytes", fh.name, fh.mode(), fh.sizes.uncompressed_size_64());
        Ok(fh)
    }

    /// The platform that wrote the external attributes
    pub fn platform(&self) -> Platform {
        Platform::from_creator_version(self.creator_version)
    }

    /// The modification time in UTC, with two second resolution
    pub fn mod_time(&self) -> DateTime<Utc> {
        dos_to_datetime(self.modified_date, self.modified_time)
    }

    /// Set the MS-DOS date and time fields from `t`, in UTC.
    ///
    /// Years outside 1980-2107 wrap; see [`crate::dostime::datetime_to_dos`].
    pub fn set_mod_time<Tz: TimeZone>(&mut self, t: &DateTime<Tz>) {
        let utc = t.with_timezone(&Utc);
        if !is_representable(utc.year()) {
            log::warn!("{}: modification time {} does not fit, wrapping", self.name, utc);
        }
        let (date, time) = datetime_to_dos(&utc);
        self.modified_date = date;
        self.modified_time = time;
    }

    /// The permission and type bits of the entry.
    ///
    /// A name ending in a slash is always a directory.
    pub fn mode(&self) -> FileMode {
        let mut mode = decode_mode(self.platform(), self.external_attrs);
        if self.name.ends_with('/') {
            mode.kind = EntryKind::Directory;
        }
        mode
    }

    /// Set the permission and type bits. Marks the entry as written on unix
    /// and sets the matching MS-DOS attributes too.
    pub fn set_mode(&mut self, mode: &FileMode) {
        let (platform, attrs) = encode_mode(mode);
        self.creator_version = self.creator_version & 0xff | u16::from(platform) << 8;
        self.external_attrs = attrs;
    }

    /// Whether the entry is a directory
    pub fn is_dir(&self) -> bool {
        self.mode().is_dir()
    }

    /// The entry's sizes
    pub fn sizes(&self) -> EntrySizes {
        self.sizes
    }

    /// Set the compressed and uncompressed sizes
    pub fn set_sizes(&mut self, compressed_size_64: u64, uncompressed_size_64: u64) {
        self.sizes = EntrySizes::new(compressed_size_64, uncompressed_size_64);
    }

    /// Whether the sizes need the zip64 extra field
    pub fn is_zip64(&self) -> bool {
        self.sizes.is_zip64()
    }

    /// Format version a reader needs for this entry
    pub fn required_reader_version(&self) -> u16 {
        if self.is_zip64() {
            ZIP_VERSION_45
        } else {
            ZIP_VERSION_20
        }
    }

    /// The compression method, if it is one this crate knows
    pub fn compression_method(&self) -> Result<CompressionMethod, EntryError> {
        CompressionMethod::try_from(self.method)
    }

    /// Set the compression method
    pub fn set_compression_method(&mut self, method: CompressionMethod) {
        self.method = method.into();
    }

    /// Whether the encrypted flag is set
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// Mark the entry as encrypted with `method`, taking the password from
    /// `password` when the payload is processed
    pub fn set_password(&mut self, method: EncryptionMethod, password: PasswordFn) {
        self.encryption = Some(Encryption::new(method, password));
        self.flags |= FLAG_ENCRYPTED;
    }

    /// Check the entry name; see [`validate_name`]
    pub fn validate_name(&self) -> Result<(), EntryError> {
        validate_name(&self.name)
    }
}

/// Check that `name` is a relative path with forward slashes: not empty, no
/// leading slash, no drive letter and no backslashes
pub fn validate_name(name: &str) -> Result<(), EntryError> {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return Err(EntryError::EmptyName);
    }
    if bytes[0] == b'/' {
        return Err(EntryError::AbsoluteName(name.to_string()));
    }
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return Err(EntryError::DriveLetter(name.to_string()));
    }
    if bytes.contains(&b'\\') {
        return Err(EntryError::Backslash(name.to_string()));
    }
    Ok(())
}

/// The archive name of `path` relative to `root`: lexically cleaned, joined
/// with forward slashes, and with a trailing slash for directories
pub fn entry_name(root: &Path, path: &Path, is_dir: bool) -> Result<String, EntryError> {
    let outside = || EntryError::OutsideRoot {
        root: root.display().to_string(),
        path: path.display().to_string(),
    };

    let root = root.lexiclean();
    let path = path.lexiclean();
    let rel = if root.as_os_str().is_empty() || root == Path::new(".") {
        path.as_path()
    } else {
        path.strip_prefix(&root).map_err(|_| outside())?
    };

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(s) => parts.push(s.to_str().ok_or(EntryError::StringConversion)?),
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }

    let mut name = parts.join("/");
    if is_dir && !name.is_empty() {
        name.push('/');
    }
    Ok(name)
}
