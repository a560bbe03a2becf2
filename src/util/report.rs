use crate::models::entry::{DirEntryInfo, FileSize};
use crate::models::filesystem::FilesystemStats;
use crate::models::hash::HashResult;
use crate::models::permissions::PermissionReport;
use crate::models::volume::{DriveSpace, VolumeInfo};
use crate::util::human::{fmt_opt_bytes, fmt_pct, fmt_size};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

const NA: &str = "N/A";

/// Page geometry and the timestamp stamped into every header.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width:     usize,
    pub decimals:  usize,
    pub timestamp: String,
}

impl Layout {
    pub fn now(width: usize, decimals: usize) -> Self {
        Self {
            width,
            decimals,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn size(&self, bytes: u64) -> String {
        fmt_size(bytes as f64, self.decimals)
    }
}

/// Write `text` to stdout; a reader that went away (`fscli ... | head`) is not an error.
fn write_stdout<W: Write>(mut out: W, text: &str) -> io::Result<()> {
    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Print `text` and append it to `output_file` when one is configured.
pub fn emit(text: &str, output_file: Option<&Path>) {
    if let Err(e) = write_stdout(io::stdout().lock(), text) {
        warn!(error = %e, "could not write report to stdout");
    }
    let Some(path) = output_file else { return };
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut file) => {
            if let Err(e) = file.write_all(text.as_bytes()) {
                warn!(path = %path.display(), error = %e, "could not write report to output file");
            }
        }
        Err(e) => warn!(path = %path.display(), error = %e, "could not open output file"),
    }
}

fn header(out: &mut String, title: &str, layout: &Layout) {
    let rule = "=".repeat(layout.width);
    out.push_str(&format!("\n{}\n{}\nTimestamp: {}\n{}\n", rule, title, layout.timestamp, rule));
}

/// `Label: value` rows with labels padded to the widest one.
fn kv_rows(out: &mut String, indent: &str, rows: &[(&str, String)]) {
    let w = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (label, value) in rows {
        out.push_str(&format!("{}{:<w$}: {}\n", indent, label, value, w = w));
    }
}

/// Left-aligned columns, two spaces apart, with a rule under the header.
fn table(out: &mut String, headers: &[&str], rows: &[Vec<String>], layout: &Layout) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells.iter().zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(&"-".repeat(layout.width));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
}

pub fn listing(title: &str, items: &[DirEntryInfo], detailed: bool, layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    if items.is_empty() {
        out.push_str("No items found.\n");
        return out;
    }

    if detailed {
        let rows: Vec<Vec<String>> = items.iter().map(|it| vec![
            it.name.clone(),
            it.kind.label().to_string(),
            fmt_opt_bytes(it.size, layout.decimals),
            it.modified.clone().unwrap_or_else(|| NA.to_string()),
        ]).collect();
        table(&mut out, &["Name", "Type", "Size", "Modified"], &rows, layout);
    } else {
        for it in items {
            out.push_str(&format!("{} ({})\n", it.name, it.kind.label()));
        }
    }
    out
}

pub fn drive_space(title: &str, space: &DriveSpace, layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    kv_rows(&mut out, "", &[
        ("Total Space",  layout.size(space.total_bytes)),
        ("Used Space",   layout.size(space.used_bytes)),
        ("Free Space",   layout.size(space.free_bytes)),
        ("Used Percent", fmt_pct(space.used_percent)),
    ]);
    out
}

pub fn partitions(title: &str, volumes: &[VolumeInfo], layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    if volumes.is_empty() {
        out.push_str("No partition information available.\n");
        return out;
    }

    // drive columns only mean something on drive-letter platforms
    let drives = volumes.iter().any(|v| v.drive_category.is_some());

    let mut headers = vec!["Device", "Mountpoint", "FSType"];
    if drives {
        headers.extend(["Drive Type", "Volume Name"]);
    }
    headers.extend(["Total", "Used", "Free", "Used %"]);

    let rows: Vec<Vec<String>> = volumes.iter().map(|v| {
        let mut row = vec![
            v.device.clone(),
            v.mount_point.clone(),
            if v.filesystem_type.is_empty() { NA.to_string() } else { v.filesystem_type.clone() },
        ];
        if drives {
            row.push(v.drive_category.map_or(NA, |c| c.label()).to_string());
            row.push(v.volume_label.clone());
        }
        match v.space {
            Some(s) => {
                row.push(layout.size(s.total_bytes));
                row.push(layout.size(s.used_bytes));
                row.push(layout.size(s.free_bytes));
                row.push(fmt_pct(s.used_percent));
            }
            None => row.extend(std::iter::repeat(NA.to_string()).take(4)),
        }
        row
    }).collect();

    table(&mut out, &headers, &rows, layout);
    out
}

pub fn filesystem_stats(title: &str, stats: &FilesystemStats, layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    out.push_str(&format!("Path: {}\n", stats.path.display()));
    out.push_str(&"-".repeat(layout.width));
    out.push('\n');

    let s = &stats.space;
    out.push_str("Space Usage:\n");
    kv_rows(&mut out, "  ", &[
        ("Total Size",     layout.size(s.total)),
        ("Used Size",      layout.size(s.used)),
        ("Free Size",      layout.size(s.free)),
        ("Available Size", layout.size(s.available)),
        ("Usage Percent",  fmt_pct(s.usage_percent)),
    ]);

    if stats.is_degraded() {
        out.push_str("\nBlock and inode statistics are not available on this platform.\n");
    }

    if let Some(b) = &stats.blocks {
        out.push_str("\nFilesystem Stats:\n");
        let mut rows = vec![
            ("Block Size",       format!("{} bytes", b.block_size)),
            ("Fragment Size",    format!("{} bytes", b.fragment_size)),
            ("Total Blocks",     b.total_blocks.to_string()),
            ("Free Blocks",      b.free_blocks.to_string()),
            ("Available Blocks", b.available_blocks.to_string()),
        ];
        if let Some(i) = &stats.inodes {
            rows.push(("Total Inodes",     i.total_inodes.to_string()));
            rows.push(("Free Inodes",      i.free_inodes.to_string()));
            rows.push(("Available Inodes", i.available_inodes.to_string()));
        }
        if let Some(d) = &stats.details {
            rows.push(("Filesystem ID",           d.filesystem_id.to_string()));
            rows.push(("Mount Flags",             format!("{:#x}", d.mount_flags)));
            rows.push(("Maximum Filename Length", d.max_filename_length.to_string()));
        }
        kv_rows(&mut out, "  ", &rows);
    }

    if let Some(i) = &stats.inodes {
        out.push_str("\nInode Usage:\n");
        kv_rows(&mut out, "  ", &[
            ("Used Inodes",   i.used_inodes.to_string()),
            ("Usage Percent", fmt_pct(i.usage_percent)),
        ]);
    }
    out
}

pub fn permissions(title: &str, rep: &PermissionReport, layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    let p = &rep.perms;
    kv_rows(&mut out, "", &[
        ("Path",                 rep.path.display().to_string()),
        ("Octal Permissions",    p.octal.clone()),
        ("Symbolic Permissions", p.symbolic.clone()),
        ("Owner ID",             p.owner_id.to_string()),
        ("Group ID",             p.group_id.to_string()),
        ("SetUID",               p.setuid.to_string()),
        ("SetGID",               p.setgid.to_string()),
        ("Sticky Bit",           p.sticky.to_string()),
    ]);
    out
}

pub fn file_size(title: &str, size: &FileSize, layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    kv_rows(&mut out, "", &[
        ("Path",  size.path.display().to_string()),
        ("Size",  layout.size(size.bytes)),
        ("Bytes", size.bytes.to_string()),
    ]);
    out
}

pub fn file_hash(title: &str, hash: &HashResult, layout: &Layout) -> String {
    let mut out = String::new();
    header(&mut out, title, layout);
    out.push_str(&format!("{} Hash: {}\n", hash.algorithm.label(), hash.digest_hex));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::EntryKind;
    use crate::models::filesystem::RawVfsCounters;
    use crate::models::hash::HashAlgorithm;
    use crate::models::permissions::{FileKind, PermissionSet};
    use crate::models::volume::DriveCategory;
    use std::path::PathBuf;

    fn layout() -> Layout {
        Layout { width: 20, decimals: 2, timestamp: "2026-01-02 03:04:05".into() }
    }

    fn vol(device: &str, mount: &str, space: Option<DriveSpace>) -> VolumeInfo {
        VolumeInfo {
            device:          device.into(),
            mount_point:     mount.into(),
            filesystem_type: "ext4".into(),
            mount_options:   "rw".into(),
            drive_category:  None,
            volume_label:    String::new(),
            space,
        }
    }

    #[test]
    fn header_has_title_and_timestamp() {
        let text = drive_space("Drive Space Information", &DriveSpace::new(2048, 1024), &layout());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "=".repeat(20));
        assert_eq!(lines[2], "Drive Space Information");
        assert_eq!(lines[3], "Timestamp: 2026-01-02 03:04:05");
        assert!(text.contains("Total Space : 2.00 KB\n"));
        assert!(text.contains("Used Percent: 50.00%\n"));
    }

    #[test]
    fn partition_columns_align() {
        let vols = vec![
            vol("/dev/nvme0n1p2", "/", Some(DriveSpace::new(1024, 512))),
            vol("/dev/sdb1", "/data", None),
        ];
        let text = partitions("Disk Partitions", &vols, &layout());
        let body: Vec<&str> = text.lines().skip(5).collect();
        assert!(body[0].starts_with("Device          Mountpoint  FSType"));
        assert!(!body[0].contains("Drive Type"));
        assert_eq!(body[1], "-".repeat(20));
        assert!(body[2].starts_with("/dev/nvme0n1p2  /           ext4"));
        assert!(body[2].ends_with("50.00%"));
        assert!(body[3].starts_with("/dev/sdb1       /data"));
        assert!(body[3].ends_with("N/A"));
    }

    #[test]
    fn drive_columns_on_drive_platforms() {
        let mut c = vol("C:", "C:", Some(DriveSpace::new(10, 5)));
        c.drive_category = Some(DriveCategory::Fixed);
        c.volume_label = "Windows".into();
        let text = partitions("Disk Partitions", &[c], &layout());
        assert!(text.contains("Drive Type"));
        assert!(text.contains("FIXED"));
        assert!(text.contains("Windows"));
    }

    #[test]
    fn empty_results() {
        assert!(partitions("P", &[], &layout()).ends_with("No partition information available.\n"));
        assert!(listing("L", &[], false, &layout()).ends_with("No items found.\n"));
    }

    #[test]
    fn stats_sections() {
        let raw = RawVfsCounters {
            block_size: 4096, fragment_size: 4096, blocks: 100, blocks_free: 50,
            blocks_available: 40, files: 10, files_free: 0, files_available: 0,
            filesystem_id: 1, mount_flags: 0x400, name_max: 255,
        };
        let full = filesystem_stats("Filesystem Statistics", &FilesystemStats::from_counters(PathBuf::from("/"), &raw), &layout());
        assert!(full.contains("Path: /\n"));
        assert!(full.contains("\nFilesystem Stats:\n"));
        assert!(full.contains("  Mount Flags            : 0x400\n"));
        assert!(full.contains("\nInode Usage:\n  Used Inodes  : 10\n  Usage Percent: 100.00%\n"));

        let degraded = filesystem_stats(
            "Filesystem Statistics",
            &FilesystemStats::from_drive_space(PathBuf::from("/"), &DriveSpace::new(100, 25)),
            &layout(),
        );
        assert!(degraded.contains("Space Usage:"));
        assert!(!degraded.contains("Filesystem Stats:"));
        assert!(!degraded.contains("Inode Usage:"));
        assert!(degraded.contains("not available on this platform"));
        assert!(!full.contains("not available on this platform"));
    }

    #[test]
    fn permission_and_hash_blocks() {
        let rep = PermissionReport {
            path:  PathBuf::from("/tmp/x"),
            kind:  FileKind::Regular,
            perms: PermissionSet::decode(0o4755, FileKind::Regular).owned_by(0, 0),
        };
        let text = permissions("Permissions for x", &rep, &layout());
        assert!(text.contains("Symbolic Permissions: -rwxr-xr-x\n"));
        assert!(text.contains("SetUID              : true\n"));

        let h = HashResult { path: PathBuf::from("x"), algorithm: HashAlgorithm::Sha1, digest_hex: "ab".into() };
        assert!(file_hash("Hash for x", &h, &layout()).ends_with("SHA1 Hash: ab\n"));
    }

    #[test]
    fn detailed_listing() {
        let items = vec![
            DirEntryInfo { name: "a.txt".into(), kind: EntryKind::File, size: Some(1536), modified: Some("2026-01-01 00:00:00".into()) },
            DirEntryInfo { name: "dir".into(), kind: EntryKind::Folder, size: None, modified: None },
        ];
        let text = listing("Directory Listing", &items, true, &layout());
        assert!(text.contains("a.txt  file    1.50 KB  2026-01-01 00:00:00\n"));
        assert!(text.contains("dir    folder  N/A      N/A\n"));
    }

    #[test]
    fn file_size_block() {
        let size = FileSize { path: PathBuf::from("/tmp/x"), bytes: 1536 };
        let text = file_size("File Size", &size, &layout());
        assert!(text.contains("Path : /tmp/x\n"));
        assert!(text.contains("Size : 1.50 KB\n"));
        assert!(text.ends_with("Bytes: 1536\n"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn closed_reader_is_not_an_error() {
        assert!(write_stdout(ClosedPipe, "Device  Mountpoint\n").is_ok());
        assert!(write_stdout(FullDisk, "x").is_err());

        let mut buf = Vec::new();
        write_stdout(&mut buf, "abc\n").unwrap();
        assert_eq!(buf, b"abc\n");
    }

    #[test]
    fn emit_appends_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("out.log");
        emit("first\n", Some(&log));
        emit("second\n", Some(&log));
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "first\nsecond\n");
    }
}
