pub mod entry;
pub mod filesystem;
pub mod hash;
pub mod permissions;
pub mod volume;
