use crate::collectors::command::CommandRunner;
use crate::collectors::partitions::VolumeSource;
use crate::collectors::space::SpaceProbe;
use crate::error::FsError;
use crate::models::volume::VolumeInfo;
use std::path::Path;
use tracing::{debug, warn};

/// Pseudo filesystems hidden unless virtual volumes are requested.
const VIRTUAL_FS: &[&str] = &["proc", "sysfs", "devpts", "devtmpfs", "tmpfs"];

const VIRTUAL_DEVICE_PREFIX: &[&str] = &["none", "/dev/loop", "udev"];

/// One parsed line of `mount` output, e.g.
/// `/dev/sda1 on / type ext4 (rw,relatime)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device:  String,
    pub mount:   String,
    pub fs_type: String,
    pub options: String,
}

impl MountEntry {
    pub fn is_virtual(&self) -> bool {
        VIRTUAL_FS.contains(&self.fs_type.as_str())
            || VIRTUAL_DEVICE_PREFIX.iter().any(|p| self.device.starts_with(p))
    }
}

/// Parse a single line; lines with fewer than five fields yield `None`.
pub fn parse_mount_line(line: &str) -> Option<MountEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 { return None; }

    let options = fields
        .get(5)
        .map(|o| o.trim_matches(|c| c == '(' || c == ')').to_string())
        .unwrap_or_default();

    Some(MountEntry {
        device:  fields[0].to_string(),
        mount:   fields[2].to_string(),
        fs_type: fields[4].to_string(),
        options,
    })
}

/// Parse full `mount` output in line order, dropping virtual mounts unless asked.
pub fn parse_mount_table(text: &str, include_virtual: bool) -> Vec<MountEntry> {
    text.lines()
        .filter_map(|line| {
            let entry = parse_mount_line(line);
            if entry.is_none() && !line.trim().is_empty() {
                debug!(line, "skipping malformed mount line");
            }
            entry
        })
        .filter(|e| include_virtual || !e.is_virtual())
        .collect()
}

/// Volumes from the system mount table, one per surviving line.
pub struct MountTableSource<R, P> {
    runner: R,
    probe:  P,
}

impl<R: CommandRunner, P: SpaceProbe> MountTableSource<R, P> {
    pub fn new(runner: R, probe: P) -> Self {
        Self { runner, probe }
    }
}

impl<R: CommandRunner, P: SpaceProbe> VolumeSource for MountTableSource<R, P> {
    fn volumes(&self, include_virtual: bool) -> Vec<VolumeInfo> {
        let text = match self.runner.run("mount", &[]) {
            Some(t) => t,
            None    => {
                warn!("could not read the mount table");
                return Vec::new();
            }
        };

        parse_mount_table(&text, include_virtual)
            .into_iter()
            .map(|e| {
                // A mount we cannot stat is still a partition, just without usage numbers.
                let space = match self.probe.probe(Path::new(&e.mount)) {
                    Ok(s)  => Some(s),
                    Err(err) => {
                        let err = FsError::PartialEnumeration { volume: e.mount.clone(), reason: err.to_string() };
                        warn!(error = %err, "reporting mount without usage numbers");
                        None
                    }
                };
                VolumeInfo {
                    device:          e.device,
                    mount_point:     e.mount,
                    filesystem_type: e.fs_type,
                    mount_options:   e.options,
                    drive_category:  None,
                    volume_label:    String::new(),
                    space,
                }
            })
            .collect()
    }
}
