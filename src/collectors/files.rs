use crate::error::FsError;
use crate::models::entry::{DirEntryInfo, EntryKind};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use tracing::debug;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> FsError + '_ {
    move |e| FsError::from_io(path, e)
}

/// Entries of `dir` in the order the OS returns them.
pub fn list(dir: &Path, detailed: bool) -> Result<Vec<DirEntryInfo>, FsError> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // follows symlinks, so a link to a file lists as a file
        let meta = match fs::metadata(&path) {
            Ok(m)  => m,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let kind = if meta.is_file() { EntryKind::File } else { EntryKind::Folder };

        let (size, modified) = if detailed {
            let size = (kind == EntryKind::File).then(|| meta.len());
            let modified = meta.modified().ok().map(|t| {
                DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string()
            });
            (size, modified)
        } else {
            (None, None)
        };

        out.push(DirEntryInfo { name, kind, size, modified });
    }
    Ok(out)
}

pub fn create_file(path: &Path, content: &str) -> Result<(), FsError> {
    fs::write(path, content).map_err(io_err(path))
}

pub fn read_file(path: &Path) -> Result<String, FsError> {
    fs::read_to_string(path).map_err(io_err(path))
}

pub fn file_size(path: &Path) -> Result<u64, FsError> {
    let meta = fs::metadata(path).map_err(io_err(path))?;
    if !meta.is_file() {
        return Err(FsError::NotAFile(path.to_path_buf()));
    }
    Ok(meta.len())
}

pub fn delete_file(path: &Path) -> Result<(), FsError> {
    if !path.is_file() {
        return Err(if path.exists() { FsError::NotAFile(path.to_path_buf()) } else { FsError::NotFound(path.to_path_buf()) });
    }
    fs::remove_file(path).map_err(io_err(path))
}

/// Create `path` and any missing parents. An existing path is an error.
pub fn create_folder(path: &Path) -> Result<(), FsError> {
    if path.exists() {
        return Err(FsError::AlreadyExists(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(io_err(path))
}

/// Without `recursive` only an empty folder can be removed.
pub fn delete_folder(path: &Path, recursive: bool) -> Result<(), FsError> {
    if !path.is_dir() {
        return Err(if path.exists() { FsError::NotADirectory(path.to_path_buf()) } else { FsError::NotFound(path.to_path_buf()) });
    }
    if recursive {
        fs::remove_dir_all(path).map_err(io_err(path))
    } else {
        fs::remove_dir(path).map_err(io_err(path))
    }
}

/// Delete whatever is at `path`: a file, or else a folder.
pub fn delete(path: &Path, recursive: bool) -> Result<(), FsError> {
    match delete_file(path) {
        Err(FsError::NotAFile(_)) => delete_folder(path, recursive),
        other => other,
    }
}

/// Copy a file. A directory destination receives the file under its own name.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, FsError> {
    if !src.is_file() {
        return Err(if src.exists() { FsError::NotAFile(src.to_path_buf()) } else { FsError::NotFound(src.to_path_buf()) });
    }
    let target = match (dst.is_dir(), src.file_name()) {
        (true, Some(name)) => dst.join(name),
        _ => dst.to_path_buf(),
    };
    fs::copy(src, &target).map_err(io_err(&target))
}

/// Move a file or folder, copying then deleting when a rename cannot cross devices.
pub fn move_path(src: &Path, dst: &Path) -> Result<(), FsError> {
    let target = match (dst.is_dir(), src.file_name()) {
        (true, Some(name)) => dst.join(name),
        _ => dst.to_path_buf(),
    };
    match fs::rename(src, &target) {
        Ok(()) => Ok(()),
        Err(e) if src.is_file() && e.kind() != std::io::ErrorKind::NotFound => {
            debug!(error = %e, "rename failed, falling back to copy + delete");
            fs::copy(src, &target).map_err(io_err(&target))?;
            fs::remove_file(src).map_err(io_err(src))
        }
        Err(e) => Err(FsError::from_io(src, e)),
    }
}

pub fn rename(old: &Path, new: &Path) -> Result<(), FsError> {
    fs::rename(old, new).map_err(io_err(old))
}
