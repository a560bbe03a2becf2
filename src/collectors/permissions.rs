use crate::error::FsError;
use crate::models::permissions::{FileKind, PermissionReport, PermissionSet};
use std::fs::{self, FileType, Metadata};
use std::path::Path;

fn kind_of(ft: FileType) -> FileKind {
    if ft.is_symlink()   { FileKind::Symlink }
    else if ft.is_dir()  { FileKind::Directory }
    else if ft.is_file() { FileKind::Regular }
    else                 { FileKind::Other }
}

#[cfg(unix)]
fn raw_mode(meta: &Metadata) -> (u32, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (meta.mode(), meta.uid(), meta.gid())
}

/// No mode bits here: derive them from the read-only flag.
#[cfg(not(unix))]
fn raw_mode(meta: &Metadata) -> (u32, u32, u32) {
    let ro = meta.permissions().readonly();
    let mode = match (meta.is_dir(), ro) {
        (true, false)  => 0o755,
        (true, true)   => 0o555,
        (false, false) => 0o666,
        (false, true)  => 0o444,
    };
    (mode, 0, 0)
}

/// Decode the permissions of `path` itself (symlinks are not followed).
pub fn permissions_for(path: &Path) -> Result<PermissionReport, FsError> {
    let meta = fs::symlink_metadata(path).map_err(|e| FsError::from_io(path, e))?;
    let kind = kind_of(meta.file_type());
    let (mode, uid, gid) = raw_mode(&meta);

    let abs = std::path::absolute(path).map_err(|e| FsError::from_io(path, e))?;
    Ok(PermissionReport {
        path:  abs,
        kind,
        perms: PermissionSet::decode(mode, kind).owned_by(uid, gid),
    })
}
