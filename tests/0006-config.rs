use std::{fs, time::SystemTime};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use zipentry::{Config, EntryError, FileHeader, Platform, TimestampPolicy};

mod common;
use common::Fixture;

#[test]
fn default_config() {
    let c = Config::default();
    assert_eq!(c.version, 0);
    assert_eq!(c.creator_version, 20);
    assert_eq!(c.timestamps, TimestampPolicy::Wrap);
    assert!(c.strict_names);
}

#[test]
fn parse_config() {
    let c = Config::from_slice(b"version: 0\ncreator_version: 45\ntimestamps: reject\nstrict_names: false\n")
        .unwrap();
    assert_eq!(
        c,
        Config {
            version:         0,
            creator_version: 45,
            timestamps:      TimestampPolicy::Reject,
            strict_names:    false,
        }
    );
}

#[test]
fn partial_config_uses_defaults() {
    let c = Config::from_slice(b"version: 0\ntimestamps: reject\n").unwrap();
    assert_eq!(c.creator_version, 20);
    assert_eq!(c.timestamps, TimestampPolicy::Reject);
    assert!(c.strict_names);
}

#[test]
fn version_mismatch() {
    let err = Config::from_slice(b"version: 3\nsomething_new: true\n").unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::VersionMismatch {
            expected: 0,
            found:    3,
        })
    );
}

#[test]
fn missing_version() {
    let err = Config::from_slice(b"strict_names: true\n").unwrap_err();
    assert_eq!(err.downcast_ref::<EntryError>(), Some(&EntryError::NoVersion));

    let err = Config::from_slice(b"version: zero\n").unwrap_err();
    assert_eq!(err.downcast_ref::<EntryError>(), Some(&EntryError::VersionType));
}

#[test]
fn oversized_version() {
    let err = Config::from_slice(b"version: 4294967296\n").unwrap_err();
    assert_eq!(err.downcast_ref::<EntryError>(), Some(&EntryError::VersionType));
}

#[test]
fn load_from_disk() {
    let f = Fixture::blank();
    let path = f.file("config.yaml", b"version: 0\ncreator_version: 63\n");
    let c = Config::load(&path).unwrap();
    assert_eq!(c.creator_version, 63);

    let err = Config::load(&f.root().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

#[test]
fn header_from_path() {
    let f = Fixture::blank();
    let dir = f.dir("pkg/bin");
    let file = f.file("pkg/bin/tool", b"#!/bin/sh\n");
    let config = Config {
        creator_version: 30,
        ..Default::default()
    };

    let fh = FileHeader::from_path(f.root(), &file, &config).unwrap();
    assert_eq!(fh.name, "pkg/bin/tool");
    assert_eq!(fh.creator_version, 0x031e);
    assert_eq!(fh.platform(), Platform::Unix);
    assert_eq!(fh.reader_version, 20);
    assert_eq!(fh.sizes().uncompressed_size_64(), 10);
    assert!(!fh.is_dir());

    let fh = FileHeader::from_path(f.root(), &dir, &config).unwrap();
    assert_eq!(fh.name, "pkg/bin/");
    assert!(fh.is_dir());
    assert_eq!(fh.file_info().name, "bin");
}

#[test]
fn header_from_path_outside_root() {
    let f = Fixture::blank();
    let other = Fixture::blank();
    let file = other.file("x", b"x");
    let err = FileHeader::from_path(f.root(), &file, &Config::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EntryError>(),
        Some(EntryError::OutsideRoot { .. })
    ));
}

#[test]
fn reject_policy() {
    let f = Fixture::blank();
    let file = f.file("old.txt", b"old");
    let old = SystemTime::from(Utc.with_ymd_and_hms(1975, 6, 1, 0, 0, 0).unwrap());
    fs::File::options()
        .write(true)
        .open(&file)
        .unwrap()
        .set_modified(old)
        .unwrap();

    let reject = Config {
        timestamps: TimestampPolicy::Reject,
        ..Default::default()
    };
    let err = FileHeader::from_path(f.root(), &file, &reject).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::DateTimeRange { year: 1975 })
    );

    // wrapping keeps going, with the year folded into the 7 bit field
    let fh = FileHeader::from_path(f.root(), &file, &Config::default()).unwrap();
    assert_eq!(fh.modified_date >> 9, (1975 - 1980 + 128) as u16);
}
