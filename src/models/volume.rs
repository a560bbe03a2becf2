use crate::models::filesystem::RawVfsCounters;
use crate::util::human::{percent, round2};
use serde::Serialize;

/// Drive classification reported by drive-letter platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveCategory {
    Unknown,
    NoRootDir,
    Removable,
    Fixed,
    Remote,
    Cdrom,
    Ramdisk,
}

impl DriveCategory {
    /// Map the platform's drive-type code; anything out of range is `Unknown`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => DriveCategory::NoRootDir,
            2 => DriveCategory::Removable,
            3 => DriveCategory::Fixed,
            4 => DriveCategory::Remote,
            5 => DriveCategory::Cdrom,
            6 => DriveCategory::Ramdisk,
            _ => DriveCategory::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DriveCategory::Unknown   => "UNKNOWN",
            DriveCategory::NoRootDir => "NO_ROOT_DIR",
            DriveCategory::Removable => "REMOVABLE",
            DriveCategory::Fixed     => "FIXED",
            DriveCategory::Remote    => "REMOTE",
            DriveCategory::Cdrom     => "CDROM",
            DriveCategory::Ramdisk   => "RAMDISK",
        }
    }
}

/// Capacity of the volume holding some path. `used + free == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriveSpace {
    pub total_bytes:  u64,
    pub used_bytes:   u64,
    pub free_bytes:   u64,
    /// 0–100, two decimals; 0 for a zero-capacity volume.
    pub used_percent: f64,
}

impl DriveSpace {
    pub fn new(total_bytes: u64, free_bytes: u64) -> Self {
        let free_bytes = free_bytes.min(total_bytes);
        let used_bytes = total_bytes - free_bytes;
        Self {
            total_bytes,
            used_bytes,
            free_bytes,
            used_percent: round2(percent(used_bytes, total_bytes)),
        }
    }

    /// Space from raw statvfs counters. Used is `blocks - blocks_free`, the
    /// same figure filesystem statistics report, so root-reserved blocks
    /// count as free here.
    #[cfg_attr(not(unix), allow(dead_code))]
    pub fn from_counters(raw: &RawVfsCounters) -> Self {
        let unit = raw.unit();
        Self::new(raw.blocks.saturating_mul(unit), raw.blocks_free.saturating_mul(unit))
    }
}

/// One discovered volume. Built once per enumeration and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeInfo {
    pub device:          String,
    pub mount_point:     String,
    pub filesystem_type: String,
    pub mount_options:   String,
    /// Only drive-letter platforms classify drives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_category:  Option<DriveCategory>,
    pub volume_label:    String,
    /// `None` when the space probe failed for this volume.
    #[serde(flatten)]
    pub space:           Option<DriveSpace>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_codes_follow_the_fixed_table() {
        assert_eq!(DriveCategory::from_code(0), DriveCategory::Unknown);
        assert_eq!(DriveCategory::from_code(1), DriveCategory::NoRootDir);
        assert_eq!(DriveCategory::from_code(3), DriveCategory::Fixed);
        assert_eq!(DriveCategory::from_code(6), DriveCategory::Ramdisk);
        assert_eq!(DriveCategory::from_code(42), DriveCategory::Unknown);
        assert_eq!(DriveCategory::Cdrom.label(), "CDROM");
    }

    #[test]
    fn space_is_consistent() {
        let s = DriveSpace::new(1000, 250);
        assert_eq!(s.used_bytes + s.free_bytes, s.total_bytes);
        assert_eq!(s.used_percent, 75.0);

        let empty = DriveSpace::new(0, 0);
        assert_eq!(empty.used_percent, 0.0);

        // a probe reporting more free than total is clamped
        let odd = DriveSpace::new(100, 500);
        assert_eq!(odd.used_bytes, 0);
        assert_eq!(odd.free_bytes, 100);
    }

    #[test]
    fn counters_agree_with_filesystem_stats() {
        use crate::models::filesystem::FilesystemStats;
        use std::path::PathBuf;

        // 100 blocks reserved for root: free 400, available 300
        let raw = RawVfsCounters {
            block_size:       4096,
            fragment_size:    0,
            blocks:           1000,
            blocks_free:      400,
            blocks_available: 300,
            ..RawVfsCounters::default()
        };
        let space = DriveSpace::from_counters(&raw);
        let stats = FilesystemStats::from_counters(PathBuf::from("/"), &raw);
        assert_eq!(space.used_bytes, stats.space.used);
        assert_eq!(space.used_bytes, 600 * 4096);
        assert_eq!(space.free_bytes, 400 * 4096);
        assert_eq!(space.used_bytes + space.free_bytes, space.total_bytes);
        assert_eq!(space.used_percent, stats.space.usage_percent);
    }

    #[test]
    fn missing_space_is_omitted_from_json() {
        let v = VolumeInfo {
            device:          "/dev/sdz1".into(),
            mount_point:     "/mnt/z".into(),
            filesystem_type: "ext4".into(),
            mount_options:   "rw".into(),
            drive_category:  None,
            volume_label:    String::new(),
            space:           None,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert!(json.get("total_bytes").is_none());
        assert!(json.get("drive_category").is_none());
        assert_eq!(json["mount_point"], "/mnt/z");
    }

    #[test]
    fn serializes_flat_with_stable_names() {
        let v = VolumeInfo {
            device:          "C:".into(),
            mount_point:     "C:".into(),
            filesystem_type: "NTFS".into(),
            mount_options:   String::new(),
            drive_category:  Some(DriveCategory::Fixed),
            volume_label:    "Windows".into(),
            space:           Some(DriveSpace::new(200, 50)),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["drive_category"], "FIXED");
        assert_eq!(json["total_bytes"], 200);
        assert_eq!(json["used_bytes"], 150);
        assert_eq!(json["used_percent"], 75.0);
    }
}
