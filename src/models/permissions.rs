use serde::Serialize;
use std::path::PathBuf;

const SETUID: u32 = 0o4000;
const SETGID: u32 = 0o2000;
const STICKY: u32 = 0o1000;

/// user, group, other × read, write, execute, in display order.
const RWX_BITS: [(u32, char); 9] = [
    (0o400, 'r'), (0o200, 'w'), (0o100, 'x'),
    (0o040, 'r'), (0o020, 'w'), (0o010, 'x'),
    (0o004, 'r'), (0o002, 'w'), (0o001, 'x'),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Other,
}

impl FileKind {
    pub fn type_char(&self) -> char {
        match self {
            FileKind::Directory => 'd',
            FileKind::Symlink   => 'l',
            FileKind::Regular | FileKind::Other => '-',
        }
    }
}

/// Decoded permission bits of one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSet {
    /// Low nine bits as three octal digits, e.g. "755".
    pub octal:    String,
    /// Type char plus nine rwx chars, e.g. "drwxr-xr-x".
    pub symbolic: String,
    pub setuid:   bool,
    pub setgid:   bool,
    pub sticky:   bool,
    pub owner_id: u32,
    pub group_id: u32,
}

impl PermissionSet {
    /// Decode a raw mode. Special bits are reported as flags only; they never
    /// turn an `x` into `s`/`t` in the symbolic string.
    pub fn decode(mode: u32, kind: FileKind) -> Self {
        let mut symbolic = String::with_capacity(10);
        symbolic.push(kind.type_char());
        for (bit, ch) in RWX_BITS {
            symbolic.push(if mode & bit != 0 { ch } else { '-' });
        }

        Self {
            octal:    format!("{:03o}", mode & 0o777),
            symbolic,
            setuid:   mode & SETUID != 0,
            setgid:   mode & SETGID != 0,
            sticky:   mode & STICKY != 0,
            owner_id: 0,
            group_id: 0,
        }
    }

    pub fn owned_by(mut self, owner_id: u32, group_id: u32) -> Self {
        self.owner_id = owner_id;
        self.group_id = group_id;
        self
    }
}

/// A decoded permission set together with the absolute path it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionReport {
    pub path:  PathBuf,
    pub kind:  FileKind,
    #[serde(flatten)]
    pub perms: PermissionSet,
}
