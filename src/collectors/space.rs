use crate::error::FsError;
use crate::models::volume::DriveSpace;
use std::path::Path;

/// Capacity lookup for the volume containing a path.
///
/// A failed probe is an `Err`; a volume that genuinely has zero capacity is
/// `Ok` with zero totals.
pub trait SpaceProbe {
    fn probe(&self, path: &Path) -> Result<DriveSpace, FsError>;
}

/// Uses the platform's own disk-usage primitive.
pub struct SystemProbe;

impl SpaceProbe for SystemProbe {
    fn probe(&self, path: &Path) -> Result<DriveSpace, FsError> {
        drive_space(path)
    }
}

/// Total/used/free bytes for the volume holding `path`. Used matches the
/// `stats` figure: blocks in use, not counting the root reserve.
#[cfg(unix)]
pub fn drive_space(path: &Path) -> Result<DriveSpace, FsError> {
    let raw = crate::collectors::filesystem::read_counters(path)?;
    Ok(DriveSpace::from_counters(&raw))
}

#[cfg(windows)]
pub fn drive_space(path: &Path) -> Result<DriveSpace, FsError> {
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;

    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(std::iter::once(0)).collect();
    let mut total: u64 = 0;
    let mut free_total: u64 = 0;
    unsafe {
        GetDiskFreeSpaceExW(
            PCWSTR(wide.as_ptr()),
            None,
            Some(&mut total as *mut u64),
            Some(&mut free_total as *mut u64),
        )
    }
    .map_err(|e| FsError::from_io(path, std::io::Error::from_raw_os_error(e.code().0 & 0xFFFF)))?;

    Ok(DriveSpace::new(total, free_total))
}

#[cfg(not(any(unix, windows)))]
pub fn drive_space(_path: &Path) -> Result<DriveSpace, FsError> {
    Err(FsError::ProbeUnavailable("disk usage"))
}
