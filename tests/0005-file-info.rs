use std::time::{Duration, SystemTime};

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use zipentry::{dostime::datetime_to_dos, info::base_name, EntryKind, FileHeader, FileInfo, FileMode, Platform, UINT32_MAX};

mod common;
use common::{random_even_time, Fixture};

#[test]
fn base_names() {
    assert_eq!(base_name("a/b/c.txt"), "c.txt");
    assert_eq!(base_name("c.txt"), "c.txt");
    assert_eq!(base_name("a/b/"), "b");
    assert_eq!(base_name("a//"), "a");
    assert_eq!(base_name("/"), "/");
    assert_eq!(base_name(""), ".");
}

#[test]
fn adapter_roundtrip() {
    let mut rng = Pcg64::seed_from_u64(0);
    for i in 0..500 {
        let kind = EntryKind::ALL[rng.gen_range(0..EntryKind::ALL.len())];
        let info = FileInfo {
            name:     format!("file{}", i),
            size:     rng.gen_range(0..u64::from(UINT32_MAX) * 4),
            modified: SystemTime::from(random_even_time(&mut rng))
                + Duration::from_millis(rng.gen_range(0..2000)),
            mode:     FileMode {
                kind,
                perm: rng.gen_range(0..=0o777),
                setuid: rng.gen(),
                setgid: rng.gen(),
                sticky: rng.gen(),
            },
        };

        let fh = FileHeader::from(&info);
        let back = fh.file_info();
        assert_eq!(back.name, info.name);
        assert_eq!(back.size, info.size);
        assert_eq!(back.mode, info.mode);

        let secs = info.modified.duration_since(SystemTime::UNIX_EPOCH).unwrap().as_secs();
        let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(secs - secs % 2);
        assert_eq!(back.modified, expected);
    }
}

#[test]
fn from_generic_fields() {
    let info = FileInfo {
        name:     "huge.bin".to_string(),
        size:     u64::from(UINT32_MAX) + 10,
        modified: SystemTime::from(Utc.with_ymd_and_hms(2017, 1, 1, 10, 48, 0).unwrap()),
        mode:     FileMode::new(EntryKind::RegularFile, 0o444),
    };
    let fh = FileHeader::from(&info);
    assert_eq!(fh.name, "huge.bin");
    assert_eq!(fh.platform(), Platform::Unix);
    assert_eq!((fh.modified_date, fh.modified_time), (0x4A21, 0x5600));
    assert_eq!(fh.sizes().uncompressed_size(), UINT32_MAX);
    assert_eq!(fh.sizes().uncompressed_size_64(), u64::from(UINT32_MAX) + 10);
    assert_eq!(fh.external_attrs, (0x8000 | 0o444) << 16 | 0x01);
    assert!(fh.is_zip64());
}

#[test]
fn as_generic_uses_base_name() {
    let mut fh = FileHeader::new("some/deep/dir/");
    fh.set_mode(&FileMode::new(EntryKind::Directory, 0o755));
    let info = fh.file_info();
    assert_eq!(info.name, "dir");
    assert!(info.is_dir());
}

#[test]
fn as_generic_unknown_platform() {
    let mut fh = FileHeader::new("notes.txt");
    fh.creator_version = 0x0714;
    fh.external_attrs = 0xffff_ffff;
    fh.set_sizes(3, 5);
    let info = fh.file_info();
    assert_eq!(info.name, "notes.txt");
    assert_eq!(info.size, 5);
    assert_eq!(info.mode, FileMode::default());
}

#[test]
fn from_disk_file() {
    let f = Fixture::blank();
    let path = f.file("foo.txt", b"foo");
    let info = FileInfo::from_path(&path).unwrap();
    assert_eq!(info.name, "foo.txt");
    assert_eq!(info.size, 3);
    assert_eq!(info.mode.kind, EntryKind::RegularFile);
    assert!(!info.is_dir());

    let fh = FileHeader::from(&info);
    assert_eq!(fh.file_info().size, 3);
    assert_eq!(fh.file_info().mode, info.mode);
}

#[test]
fn from_disk_dir() {
    let f = Fixture::blank();
    let path = f.dir("sub");
    let info = FileInfo::from_path(&path).unwrap();
    assert_eq!(info.name, "sub");
    assert_eq!(info.size, 0);
    assert!(info.is_dir());
}

#[cfg(unix)]
#[test]
fn from_disk_symlink() {
    let f = Fixture::blank();
    f.file("target.txt", b"target");
    let link = f.root().join("link");
    std::os::unix::fs::symlink("target.txt", &link).unwrap();
    let info = FileInfo::from_path(&link).unwrap();
    assert_eq!(info.mode.kind, EntryKind::Symlink);
    assert_eq!(info.size, "target.txt".len() as u64);
}

#[cfg(unix)]
#[test]
fn from_disk_permissions() {
    use std::{fs, os::unix::fs::PermissionsExt};

    let f = Fixture::blank();
    let path = f.file("ro.txt", b"x");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
    let fh = FileHeader::from(&FileInfo::from_path(&path).unwrap());
    assert_eq!(fh.mode(), FileMode::new(EntryKind::RegularFile, 0o444));
    assert_eq!(fh.external_attrs & 0x01, 0x01);
}

#[test]
fn missing_path() {
    let f = Fixture::blank();
    let err = FileInfo::from_path(&f.root().join("nope")).unwrap_err();
    assert!(err.to_string().contains("Failed to stat"));
}

#[test]
fn from_generic_extreme_times() {
    let far = Duration::from_secs(1 << 44);
    for (modified, clamped) in [
        (SystemTime::UNIX_EPOCH + far, DateTime::<Utc>::MAX_UTC),
        (SystemTime::UNIX_EPOCH - far, DateTime::<Utc>::MIN_UTC),
    ] {
        let info = FileInfo {
            name: "far.txt".to_string(),
            size: 1,
            modified,
            mode: FileMode::new(EntryKind::RegularFile, 0o644),
        };
        let fh = FileHeader::from(&info);
        assert_eq!((fh.modified_date, fh.modified_time), datetime_to_dos(&clamped));
        assert_eq!(fh.file_info().size, 1);
    }
}
