use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CREATOR_FAT, CREATOR_MACOSX, CREATOR_NTFS, CREATOR_UNIX, CREATOR_VFAT};

// Unix constants. The zip format doesn't define them, but these are the
// values tools agree on.
const S_IFMT: u32 = 0xf000;
const S_IFSOCK: u32 = 0xc000;
const S_IFLNK: u32 = 0xa000;
const S_IFREG: u32 = 0x8000;
const S_IFBLK: u32 = 0x6000;
const S_IFDIR: u32 = 0x4000;
const S_IFCHR: u32 = 0x2000;
const S_IFIFO: u32 = 0x1000;
const S_ISUID: u32 = 0x800;
const S_ISGID: u32 = 0x400;
const S_ISVTX: u32 = 0x200;

/// MS-DOS directory attribute
pub const MSDOS_DIR: u32 = 0x10;
/// MS-DOS read-only attribute
pub const MSDOS_READONLY: u32 = 0x01;

/// The operating system family that wrote an entry, from the high byte of
/// the creator version
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone)]
pub enum Platform {
    /// MS-DOS and OS/2 FAT
    Fat,
    /// Unix
    Unix,
    /// Windows NTFS
    Ntfs,
    /// Windows VFAT
    Vfat,
    /// Mac OS X (Darwin)
    MacOsx,
    /// Any other tag; no attribute information can be recovered
    Unknown(u8),
}

impl Platform {
    /// The platform encoded in the high byte of a creator version
    pub fn from_creator_version(creator_version: u16) -> Self {
        Self::from((creator_version >> 8) as u8)
    }

    /// Unix-family platforms keep a mode word in the high half of the
    /// external attributes
    pub fn is_unix(self) -> bool {
        matches!(self, Platform::Unix | Platform::MacOsx)
    }

    /// DOS-family platforms keep attribute bits in the low byte
    pub fn is_msdos(self) -> bool {
        matches!(self, Platform::Fat | Platform::Ntfs | Platform::Vfat)
    }
}

impl From<u8> for Platform {
    fn from(v: u8) -> Self {
        match v {
            CREATOR_FAT => Platform::Fat,
            CREATOR_UNIX => Platform::Unix,
            CREATOR_NTFS => Platform::Ntfs,
            CREATOR_VFAT => Platform::Vfat,
            CREATOR_MACOSX => Platform::MacOsx,
            other => Platform::Unknown(other),
        }
    }
}

impl From<Platform> for u8 {
    fn from(v: Platform) -> Self {
        match v {
            Platform::Fat => CREATOR_FAT,
            Platform::Unix => CREATOR_UNIX,
            Platform::Ntfs => CREATOR_NTFS,
            Platform::Vfat => CREATOR_VFAT,
            Platform::MacOsx => CREATOR_MACOSX,
            Platform::Unknown(other) => other,
        }
    }
}

/// The type of an entry
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, Copy, Clone, Default)]
pub enum EntryKind {
    /// A regular file
    #[default]
    RegularFile,
    /// A directory
    Directory,
    /// A symlink
    Symlink,
    /// A named pipe
    NamedPipe,
    /// A unix domain socket
    Socket,
    /// A block device
    BlockDevice,
    /// A character device
    CharDevice,
}

impl EntryKind {
    /// All entry kinds
    pub const ALL: [EntryKind; 7] = [
        EntryKind::RegularFile,
        EntryKind::Directory,
        EntryKind::Symlink,
        EntryKind::NamedPipe,
        EntryKind::Socket,
        EntryKind::BlockDevice,
        EntryKind::CharDevice,
    ];

    fn from_unix(m: u32) -> Self {
        match m & S_IFMT {
            S_IFSOCK => EntryKind::Socket,
            S_IFLNK => EntryKind::Symlink,
            S_IFBLK => EntryKind::BlockDevice,
            S_IFDIR => EntryKind::Directory,
            S_IFCHR => EntryKind::CharDevice,
            S_IFIFO => EntryKind::NamedPipe,
            // S_IFREG, and anything without a known type
            _ => EntryKind::RegularFile,
        }
    }

    fn to_unix(self) -> u32 {
        match self {
            EntryKind::RegularFile => S_IFREG,
            EntryKind::Directory => S_IFDIR,
            EntryKind::Symlink => S_IFLNK,
            EntryKind::NamedPipe => S_IFIFO,
            EntryKind::Socket => S_IFSOCK,
            EntryKind::BlockDevice => S_IFBLK,
            EntryKind::CharDevice => S_IFCHR,
        }
    }

    fn symbol(self) -> char {
        match self {
            EntryKind::RegularFile => '-',
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::NamedPipe => 'p',
            EntryKind::Socket => 's',
            EntryKind::BlockDevice => 'b',
            EntryKind::CharDevice => 'c',
        }
    }
}

/// Platform independent type and permission bits of an entry.
///
/// The default value is a regular file with no permissions, which is also
/// what an entry from an unknown platform decodes to.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Default)]
pub struct FileMode {
    /// The type of the entry
    pub kind:   EntryKind,
    /// Owner, group and other rwx bits. Only the low nine bits are kept.
    pub perm:   u32,
    /// Set user ID on execution
    pub setuid: bool,
    /// Set group ID on execution
    pub setgid: bool,
    /// Restricted deletion flag
    pub sticky: bool,
}

impl FileMode {
    /// A mode with the given type and permission bits
    pub fn new(kind: EntryKind, perm: u32) -> Self {
        Self {
            kind,
            perm: perm & 0o777,
            ..Default::default()
        }
    }

    /// Whether this mode describes a directory
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Decode a unix `st_mode` style word
    pub fn from_unix(m: u32) -> Self {
        Self {
            kind:   EntryKind::from_unix(m),
            perm:   m & 0o777,
            setuid: m & S_ISUID != 0,
            setgid: m & S_ISGID != 0,
            sticky: m & S_ISVTX != 0,
        }
    }

    /// Encode as a unix `st_mode` style word
    pub fn to_unix(&self) -> u32 {
        let mut m = self.kind.to_unix();
        if self.setuid {
            m |= S_ISUID;
        }
        if self.setgid {
            m |= S_ISGID;
        }
        if self.sticky {
            m |= S_ISVTX;
        }
        m | (self.perm & 0o777)
    }

    /// Decode MS-DOS attribute bits
    pub fn from_msdos(attrs: u32) -> Self {
        let mut mode = if attrs & MSDOS_DIR != 0 {
            Self::new(EntryKind::Directory, 0o777)
        } else {
            Self::new(EntryKind::RegularFile, 0o666)
        };
        if attrs & MSDOS_READONLY != 0 {
            mode.perm &= !0o222;
        }
        mode
    }

    /// The MS-DOS attribute bits that describe this mode
    pub fn msdos_attrs(&self) -> u32 {
        let mut attrs = 0;
        if self.is_dir() {
            attrs |= MSDOS_DIR;
        }
        if self.perm & 0o200 == 0 {
            attrs |= MSDOS_READONLY;
        }
        attrs
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(10);
        out.push(self.kind.symbol());
        for (shift, special, lower, upper) in [
            (6, self.setuid, 's', 'S'),
            (3, self.setgid, 's', 'S'),
            (0, self.sticky, 't', 'T'),
        ] {
            let bits = self.perm >> shift;
            out.push(if bits & 4 != 0 { 'r' } else { '-' });
            out.push(if bits & 2 != 0 { 'w' } else { '-' });
            out.push(match (bits & 1 != 0, special) {
                (true, true) => lower,
                (false, true) => upper,
                (true, false) => 'x',
                (false, false) => '-',
            });
        }
        f.write_str(&out)
    }
}

/// Decode external attributes according to the platform that wrote them.
///
/// The entry name is not consulted here; see [`crate::FileHeader::mode`]
/// for the trailing slash rule.
pub fn decode_mode(platform: Platform, external_attrs: u32) -> FileMode {
    match platform {
        Platform::Unix | Platform::MacOsx => FileMode::from_unix(external_attrs >> 16),
        Platform::Fat | Platform::Ntfs | Platform::Vfat => FileMode::from_msdos(external_attrs),
        Platform::Unknown(tag) => {
            log::trace!("no attribute information for platform tag {}", tag);
            FileMode::default()
        }
    }
}

/// Encode a mode as a `(platform tag, external attributes)` pair.
///
/// The platform is always unix. The MS-DOS directory and read-only bits are
/// set in the low byte as well, for readers that only understand those.
pub fn encode_mode(mode: &FileMode) -> (u8, u32) {
    (
        CREATOR_UNIX,
        mode.to_unix() << 16 | mode.msdos_attrs(),
    )
}
