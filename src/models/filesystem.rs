use crate::models::volume::DriveSpace;
use crate::util::human::percent;
use serde::Serialize;
use std::path::PathBuf;

/// Raw counters as read from the platform's filesystem-statistics call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawVfsCounters {
    pub block_size:       u64,
    /// 0 means the platform left it unset.
    pub fragment_size:    u64,
    pub blocks:           u64,
    pub blocks_free:      u64,
    pub blocks_available: u64,
    pub files:            u64,
    pub files_free:       u64,
    pub files_available:  u64,
    pub filesystem_id:    u64,
    pub mount_flags:      u64,
    pub name_max:         u64,
}

impl RawVfsCounters {
    /// Sizes are counted in fragments, the real allocation unit; an unset
    /// fragment size falls back to the block size.
    pub fn unit(&self) -> u64 {
        if self.fragment_size == 0 { self.block_size } else { self.fragment_size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    pub block_size:       u64,
    pub fragment_size:    u64,
    pub total_blocks:     u64,
    pub free_blocks:      u64,
    pub available_blocks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InodeStats {
    pub total_inodes:     u64,
    pub free_inodes:      u64,
    pub available_inodes: u64,
    pub used_inodes:      u64,
    pub usage_percent:    f64,
}

/// Byte-level usage. `available` is what unprivileged users may still allocate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpaceUsage {
    pub total:             u64,
    pub free:              u64,
    pub available:         u64,
    pub used:              u64,
    pub usage_percent:     f64,
    pub available_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VfsDetails {
    pub filesystem_id:       u64,
    pub mount_flags:         u64,
    pub max_filename_length: u64,
}

/// Statistics for the filesystem holding `path`.
///
/// `blocks`, `inodes` and `details` are absent on platforms without
/// block-level introspection; that is a valid degraded result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilesystemStats {
    pub path:    PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks:  Option<BlockStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inodes:  Option<InodeStats>,
    pub space:   SpaceUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<VfsDetails>,
}

impl FilesystemStats {
    pub fn from_counters(path: PathBuf, raw: &RawVfsCounters) -> Self {
        let fragment_size = raw.unit();

        let total     = raw.blocks.saturating_mul(fragment_size);
        let free      = raw.blocks_free.saturating_mul(fragment_size);
        let available = raw.blocks_available.saturating_mul(fragment_size);
        let used      = total.saturating_sub(free);

        let used_inodes = raw.files.saturating_sub(raw.files_free);

        Self {
            path,
            blocks: Some(BlockStats {
                block_size:       raw.block_size,
                fragment_size,
                total_blocks:     raw.blocks,
                free_blocks:      raw.blocks_free,
                available_blocks: raw.blocks_available,
            }),
            inodes: Some(InodeStats {
                total_inodes:     raw.files,
                free_inodes:      raw.files_free,
                available_inodes: raw.files_available,
                used_inodes,
                usage_percent:    percent(used_inodes, raw.files),
            }),
            space: SpaceUsage {
                total,
                free,
                available,
                used,
                usage_percent:     percent(used, total),
                available_percent: percent(available, total),
            },
            details: Some(VfsDetails {
                filesystem_id:       raw.filesystem_id,
                mount_flags:         raw.mount_flags,
                max_filename_length: raw.name_max,
            }),
        }
    }

    /// Degraded result built from the volume space probe alone.
    pub fn from_drive_space(path: PathBuf, space: &DriveSpace) -> Self {
        Self {
            path,
            blocks:  None,
            inodes:  None,
            space: SpaceUsage {
                total:             space.total_bytes,
                free:              space.free_bytes,
                available:         space.free_bytes,
                used:              space.used_bytes,
                usage_percent:     percent(space.used_bytes, space.total_bytes),
                available_percent: percent(space.free_bytes, space.total_bytes),
            },
            details: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.blocks.is_none()
    }
}
