//! Drive-letter enumeration: a 26-bit availability mask plus per-drive
//! classification, label and filesystem queries.

use crate::collectors::command::CommandRunner;
use crate::collectors::partitions::VolumeSource;
use crate::collectors::space::SpaceProbe;
use crate::error::FsError;
use crate::models::volume::{DriveCategory, VolumeInfo};
use std::path::Path;
use tracing::{debug, warn};

/// Low-level drive queries of drive-letter platforms.
pub trait DriveQuery {
    /// Bit 0 = A:, bit 25 = Z:.
    fn logical_drives(&self) -> u32;
    /// Raw drive-type code for a root such as `C:\`.
    fn drive_type(&self, root: &str) -> u32;
}

pub struct SystemDriveQuery;

#[cfg(windows)]
impl DriveQuery for SystemDriveQuery {
    fn logical_drives(&self) -> u32 {
        use windows::Win32::Storage::FileSystem::GetLogicalDrives;
        unsafe { GetLogicalDrives() }
    }

    fn drive_type(&self, root: &str) -> u32 {
        use windows::core::PCWSTR;
        use windows::Win32::Storage::FileSystem::GetDriveTypeW;
        let wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
        unsafe { GetDriveTypeW(PCWSTR(wide.as_ptr())) }
    }
}

// Platforms without drive letters expose none.
#[cfg(not(windows))]
impl DriveQuery for SystemDriveQuery {
    fn logical_drives(&self) -> u32 { 0 }
    fn drive_type(&self, _root: &str) -> u32 { 0 }
}

/// Letters whose bit is set, ascending.
pub fn drive_letters(mask: u32) -> Vec<char> {
    (0..26u8)
        .filter(|i| mask & (1 << i) != 0)
        .map(|i| (b'A' + i) as char)
        .collect()
}

/// Label from `vol X:` output: the text after " is " on the
/// "Volume in drive X is LABEL" line. Unlabelled drives yield `None`.
pub fn extract_volume_label(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let start = line.find("Volume in drive")?;
        let rest = &line[start + "Volume in drive".len()..];
        let idx = rest.find(" is ")?;
        let label = rest[idx + " is ".len()..].trim();
        if label.is_empty() { None } else { Some(label.to_string()) }
    })
}

/// Filesystem name from `fsutil fsinfo volumeinfo X:` output.
pub fn extract_filesystem_name(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        if !line.contains("File System Name") { return None; }
        let (_, value) = line.split_once(':')?;
        let value = value.trim();
        if value.is_empty() { None } else { Some(value.to_string()) }
    })
}

pub struct DriveMaskSource<Q, R, P> {
    query:  Q,
    runner: R,
    probe:  P,
}

impl<Q: DriveQuery, R: CommandRunner, P: SpaceProbe> DriveMaskSource<Q, R, P> {
    pub fn new(query: Q, runner: R, probe: P) -> Self {
        Self { query, runner, probe }
    }

    fn volume_label(&self, drive: &str) -> String {
        self.runner
            .run("cmd", &["/c", "vol", drive])
            .and_then(|out| extract_volume_label(&out))
            .unwrap_or_default()
    }

    fn filesystem_name(&self, drive: &str) -> String {
        self.runner
            .run("fsutil", &["fsinfo", "volumeinfo", drive])
            .and_then(|out| extract_filesystem_name(&out))
            .unwrap_or_default()
    }

    fn describe(&self, letter: char) -> VolumeInfo {
        let drive = format!("{}:", letter);
        let root  = format!("{}:\\", letter);

        let category = DriveCategory::from_code(self.query.drive_type(&root));
        let label    = self.volume_label(&drive);
        let fs_type  = self.filesystem_name(&drive);
        let space = match self.probe.probe(Path::new(&root)) {
            Ok(s)  => Some(s),
            Err(e) => {
                // empty card readers and optical drives land here routinely
                let err = FsError::PartialEnumeration { volume: drive.clone(), reason: e.to_string() };
                debug!(error = %err, "reporting drive without usage numbers");
                None
            }
        };

        VolumeInfo {
            device:          drive.clone(),
            mount_point:     drive,
            filesystem_type: fs_type,
            mount_options:   String::new(),
            drive_category:  Some(category),
            volume_label:    label,
            space,
        }
    }
}

impl<Q: DriveQuery, R: CommandRunner, P: SpaceProbe> VolumeSource for DriveMaskSource<Q, R, P> {
    /// Every drive letter is a real volume, so `include_virtual` has no effect here.
    fn volumes(&self, _include_virtual: bool) -> Vec<VolumeInfo> {
        let mask = self.query.logical_drives();
        if mask == 0 {
            warn!("no logical drives reported");
            return Vec::new();
        }
        drive_letters(mask).into_iter().map(|l| self.describe(l)).collect()
    }
}
