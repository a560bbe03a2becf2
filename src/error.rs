use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Typed failures surfaced by the introspection collectors.
///
/// Per-volume problems during partition enumeration are logged and folded into
/// partial records; every other operation returns one of these to its caller.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("unsupported hash type '{0}' (expected md5, sha1 or sha256)")]
    UnsupportedAlgorithm(String),

    /// The platform lacks the requested primitive; callers fall back to a degraded result.
    #[cfg_attr(unix, allow(dead_code))] // only raised where statvfs is missing
    #[error("{0} is not available on this platform")]
    ProbeUnavailable(&'static str),

    #[error("could not fully describe volume {volume}: {reason}")]
    PartialEnumeration { volume: String, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound         => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::AlreadyExists    => FsError::AlreadyExists(path.to_path_buf()),
            _ => FsError::Io { path: path.to_path_buf(), source: err },
        }
    }
}
