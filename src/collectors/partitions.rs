use crate::collectors::command::SystemRunner;
use crate::collectors::drives::{DriveMaskSource, SystemDriveQuery};
use crate::collectors::mount_table::MountTableSource;
use crate::collectors::space::SystemProbe;
use crate::models::volume::VolumeInfo;
use tracing::info;

/// How the host exposes its volumes. Resolved once at startup and passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Drive-letter bitmask plus external label/filesystem queries.
    DriveLetters,
    /// Text mount table from the `mount` command.
    MountTable,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(windows) { Platform::DriveLetters } else { Platform::MountTable }
    }
}

/// A way of discovering volumes. Never fails as a whole: a volume that cannot
/// be fully described is returned with whatever fields could be read.
pub trait VolumeSource {
    fn volumes(&self, include_virtual: bool) -> Vec<VolumeInfo>;
}

pub fn source_for(platform: Platform) -> Box<dyn VolumeSource> {
    match platform {
        Platform::DriveLetters => Box::new(DriveMaskSource::new(SystemDriveQuery, SystemRunner, SystemProbe)),
        Platform::MountTable   => Box::new(MountTableSource::new(SystemRunner, SystemProbe)),
    }
}

/// All visible volumes in discovery order.
pub fn enumerate(platform: Platform, include_virtual: bool) -> Vec<VolumeInfo> {
    let vols = source_for(platform).volumes(include_virtual);
    info!(?platform, include_virtual, count = vols.len(), "enumerated volumes");
    vols
}
