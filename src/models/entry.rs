use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File   => "file",
            EntryKind::Folder => "folder",
        }
    }
}

/// One directory listing row. `size`/`modified` are only filled for detailed listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntryInfo {
    pub name:     String,
    pub kind:     EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size:     Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSize {
    pub path:  PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub path:    PathBuf,
    pub content: String,
}
