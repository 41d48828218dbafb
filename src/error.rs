use thiserror::Error;

/// An error enum for return from entry methods that may fail
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EntryError {
    /// Entry names may not be empty
    #[error("Entry name is empty")]
    EmptyName,
    /// Entry names are relative; a leading slash is not allowed
    #[error("Entry name {0:?} starts with a slash")]
    AbsoluteName(String),
    /// Entry names may not carry a drive designator
    #[error("Entry name {0:?} starts with a drive letter")]
    DriveLetter(String),
    /// Only forward slashes separate path segments
    #[error("Entry name {0:?} contains a backslash")]
    Backslash(String),
    /// Cannot convert a path to unicode
    #[error("String conversion Error")]
    StringConversion,
    /// The path does not live under the root it was named against
    #[error("Path {path:?} is not inside {root:?}")]
    OutsideRoot { root: String, path: String },
    /// The timestamp cannot be stored in the packed date field
    #[error("Year {year} is outside the representable range 1980-2107")]
    DateTimeRange { year: i32 },
    /// The compression method is not one this crate knows
    #[error("Unsupported compression method {0}")]
    UnsupportedMethod(u16),
    /// The config has no version field
    #[error("Config has no version")]
    NoVersion,
    /// The config version is not an unsigned integer
    #[error("Config version is not a number")]
    VersionType,
    /// Trying to load a config written for a different format version
    #[error("Version Mismatch (expected {expected:?}, got {found:?})")]
    VersionMismatch { expected: u32, found: u32 },
}
