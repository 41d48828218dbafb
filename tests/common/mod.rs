#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use rand_pcg::Pcg64;
use tempfile::TempDir;

/// A scratch directory that files can be created in
pub struct Fixture {
    path:     PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    pub fn blank() -> Self {
        let tempdir = tempfile::tempdir().unwrap();
        Fixture {
            path:     tempdir.path().to_path_buf(),
            _tempdir: tempdir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.path.join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }
}

/// A random UTC timestamp that the packed format stores exactly
pub fn random_even_time(rng: &mut Pcg64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(
        rng.gen_range(1980..=2107),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
        rng.gen_range(0..24),
        rng.gen_range(0..60),
        rng.gen_range(0..30) * 2,
    )
    .unwrap()
}
