use crate::collectors::space::{SpaceProbe, SystemProbe};
use crate::error::FsError;
use crate::models::filesystem::{FilesystemStats, RawVfsCounters};
use std::path::Path;
use tracing::debug;

/// Block, inode and space statistics for the filesystem holding `path`.
///
/// Falls back to the space probe alone when the platform has no
/// block-level statistics call.
pub fn collect(path: &Path) -> Result<FilesystemStats, FsError> {
    collect_with(path, read_counters, &SystemProbe)
}

/// `collect` with the counter reader and space probe supplied by the caller.
pub fn collect_with<F>(path: &Path, read: F, probe: &dyn SpaceProbe) -> Result<FilesystemStats, FsError>
where
    F: Fn(&Path) -> Result<RawVfsCounters, FsError>,
{
    let abs = std::path::absolute(path).map_err(|e| FsError::from_io(path, e))?;

    match read(path) {
        Ok(raw) => Ok(FilesystemStats::from_counters(abs, &raw)),
        Err(FsError::ProbeUnavailable(what)) => {
            debug!(what, "no block-level statistics, using space probe only");
            let space = probe.probe(path)?;
            Ok(FilesystemStats::from_drive_space(abs, &space))
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
pub fn read_counters(path: &Path) -> Result<RawVfsCounters, FsError> {
    use nix::sys::statvfs::statvfs;
    let stat = statvfs(path).map_err(|e| FsError::from_io(path, std::io::Error::from(e)))?;

    Ok(RawVfsCounters {
        block_size:       stat.block_size() as u64,
        fragment_size:    stat.fragment_size() as u64,
        blocks:           stat.blocks() as u64,
        blocks_free:      stat.blocks_free() as u64,
        blocks_available: stat.blocks_available() as u64,
        files:            stat.files() as u64,
        files_free:       stat.files_free() as u64,
        files_available:  stat.files_available() as u64,
        filesystem_id:    stat.filesystem_id() as u64,
        mount_flags:      stat.flags().bits() as u64,
        name_max:         stat.name_max() as u64,
    })
}

#[cfg(not(unix))]
pub fn read_counters(_path: &Path) -> Result<RawVfsCounters, FsError> {
    Err(FsError::ProbeUnavailable("statvfs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::volume::DriveSpace;
    use std::cell::Cell;
    use std::path::PathBuf;

    struct FixedProbe {
        space: DriveSpace,
        calls: Cell<u32>,
    }

    impl FixedProbe {
        fn new(total: u64, free: u64) -> Self {
            Self { space: DriveSpace::new(total, free), calls: Cell::new(0) }
        }
    }

    impl SpaceProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> Result<DriveSpace, FsError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.space)
        }
    }

    fn no_statvfs(_: &Path) -> Result<RawVfsCounters, FsError> {
        Err(FsError::ProbeUnavailable("statvfs"))
    }

    #[test]
    fn collects_for_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let st = collect(dir.path()).unwrap();
        assert!(st.path.is_absolute());
        assert!(st.space.used <= st.space.total);
        assert!(st.space.usage_percent >= 0.0 && st.space.usage_percent <= 100.0);
        if let Some(ino) = st.inodes {
            assert_eq!(ino.used_inodes, ino.total_inodes - ino.free_inodes);
        }
    }

    #[test]
    fn counters_give_full_stats_without_probing() {
        let raw = RawVfsCounters {
            block_size:       4096,
            fragment_size:    4096,
            blocks:           10,
            blocks_free:      4,
            blocks_available: 3,
            files:            8,
            files_free:       2,
            ..RawVfsCounters::default()
        };
        let probe = FixedProbe::new(1, 1);
        let st = collect_with(Path::new("."), |_| Ok(raw), &probe).unwrap();
        assert!(!st.is_degraded());
        assert_eq!(st.space.used, 6 * 4096);
        assert_eq!(st.inodes.unwrap().used_inodes, 6);
        assert_eq!(probe.calls.get(), 0);
    }

    #[test]
    fn falls_back_to_space_probe() {
        let probe = FixedProbe::new(100, 40);
        let st = collect_with(Path::new("."), no_statvfs, &probe).unwrap();
        assert!(st.is_degraded());
        assert!(st.inodes.is_none());
        assert!(st.path.is_absolute());
        assert_eq!(st.space.total, 100);
        assert_eq!(st.space.used, 60);
        assert_eq!(st.space.usage_percent, 60.0);
        assert_eq!(probe.calls.get(), 1);
    }

    #[test]
    fn other_errors_are_not_degraded() {
        let probe = FixedProbe::new(100, 40);
        let denied = |p: &Path| -> Result<RawVfsCounters, FsError> {
            Err(FsError::PermissionDenied(p.to_path_buf()))
        };
        let err = collect_with(Path::new("."), denied, &probe).unwrap_err();
        assert!(matches!(err, FsError::PermissionDenied(_)));
        assert_eq!(probe.calls.get(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn unix_has_block_level_stats() {
        let st = collect(Path::new("/")).unwrap();
        assert!(!st.is_degraded());
        let b = st.blocks.unwrap();
        assert!(b.fragment_size > 0);
        assert_eq!(st.space.total, b.total_blocks * b.fragment_size);
    }

    #[test]
    fn missing_path_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/fscli");
        assert!(matches!(collect(&missing), Err(FsError::NotFound(_))));
    }
}
