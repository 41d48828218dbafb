use std::{
    fs::{self, Metadata},
    io,
    path::Path,
    time::SystemTime,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{dostime::saturating_datetime, header::FileHeader, mode::FileMode};

/// Generic file attributes, as a directory listing would show them
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Base name of the file
    pub name:     String,
    /// Length in bytes
    pub size:     u64,
    /// Modification time
    pub modified: SystemTime,
    /// Type and permission bits
    pub mode:     FileMode,
}

impl FileInfo {
    /// Create a FileInfo from filesystem metadata
    pub fn from_metadata(name: impl Into<String>, meta: &Metadata) -> io::Result<FileInfo> {
        let mode = mode_from_meta(meta);
        Ok(FileInfo {
            name: name.into(),
            size: if mode.is_dir() { 0 } else { meta.len() },
            modified: meta.modified()?,
            mode,
        })
    }

    /// Stat a path without following symlinks
    pub fn from_path(path: &Path) -> Result<FileInfo> {
        let meta = fs::symlink_metadata(path)
            .with_context(|| format!("Failed to stat '{}'", path.display()))?;
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => path.display().to_string(),
        };
        Ok(FileInfo::from_metadata(name, &meta)?)
    }

    /// Whether this is a directory
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }
}

#[cfg(unix)]
fn mode_from_meta(meta: &Metadata) -> FileMode {
    use std::os::unix::fs::MetadataExt;
    FileMode::from_unix(meta.mode())
}

#[cfg(not(unix))]
fn mode_from_meta(meta: &Metadata) -> FileMode {
    use crate::mode::EntryKind;

    let ft = meta.file_type();
    let mut mode = if ft.is_dir() {
        FileMode::new(EntryKind::Directory, 0o777)
    } else if ft.is_symlink() {
        FileMode::new(EntryKind::Symlink, 0o777)
    } else {
        FileMode::new(EntryKind::RegularFile, 0o666)
    };
    if meta.permissions().readonly() {
        mode.perm &= !0o222;
    }
    mode
}

/// Builds a partially populated header. The name is the FileInfo's name,
/// which is usually only the base name; callers archiving a tree should
/// replace it with the full path.
impl From<&FileInfo> for FileHeader {
    fn from(v: &FileInfo) -> Self {
        let mut fh = FileHeader::new(v.name.clone());
        fh.set_sizes(0, v.size);
        fh.set_mod_time(&saturating_datetime(v.modified));
        fh.set_mode(&v.mode);
        fh
    }
}

impl FileHeader {
    /// View the header as generic file attributes. Type and permissions are
    /// decoded here, so a header from an unknown platform still produces a
    /// view, with empty permission bits.
    pub fn file_info(&self) -> FileInfo {
        let sizes = self.sizes();
        let size = match sizes.uncompressed_size_64() {
            0 => u64::from(sizes.uncompressed_size()),
            n => n,
        };
        FileInfo {
            name: base_name(&self.name).to_string(),
            size,
            modified: SystemTime::from(self.mod_time()),
            mode: self.mode(),
        }
    }
}

/// The last element of a slash separated path. Trailing slashes are
/// ignored; an empty name gives "." and a name of only slashes gives "/".
pub fn base_name(name: &str) -> &str {
    if name.is_empty() {
        return ".";
    }
    let trimmed = name.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}
