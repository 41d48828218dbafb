use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::EntryError, ZIP_VERSION_20};

/// Version of the config file format
pub const CONFIG_VERSION: u32 = 0;

/// What to do with modification times the packed date cannot hold
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Store them anyway; the year wraps
    Wrap,
    /// Refuse to build the header
    Reject,
}

/// Settings for building headers from files on disk
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version:         u32,
    /// Format version written to the low byte of `creator_version`
    pub creator_version: u8,
    /// Handling of out of range timestamps
    pub timestamps:      TimestampPolicy,
    /// Reject entry names that fail [`crate::validate_name`]
    pub strict_names:    bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version:         CONFIG_VERSION,
            creator_version: ZIP_VERSION_20 as u8,
            timestamps:      TimestampPolicy::Wrap,
            strict_names:    true,
        }
    }
}

fn get_config_version(buf: &[u8]) -> Result<u32> {
    let contents: serde_yaml::Mapping = serde_yaml::from_slice(buf)?;
    let version = contents
        .get(&serde_yaml::Value::String("version".to_string()))
        .ok_or(EntryError::NoVersion)?;
    if let serde_yaml::Value::Number(ver) = version {
        let ver = ver.as_u64().ok_or(EntryError::VersionType)?;
        Ok(u32::try_from(ver).map_err(|_| EntryError::VersionType)?)
    } else {
        Err(EntryError::VersionType.into())
    }
}

impl Config {
    /// Parse a YAML config
    pub fn from_slice(buf: &[u8]) -> Result<Config> {
        // Check the version first, as the full deserialization may fail if fields have changed.
        let ver = get_config_version(buf)?;
        if ver != CONFIG_VERSION {
            return Err(EntryError::VersionMismatch {
                expected: CONFIG_VERSION,
                found:    ver,
            }
            .into());
        }
        Ok(serde_yaml::from_slice(buf)?)
    }

    /// Load a YAML config from disk
    pub fn load(path: &Path) -> Result<Config> {
        let buf = fs::read(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Config::from_slice(&buf).with_context(|| format!("Invalid config '{}'", path.display()))
    }
}
