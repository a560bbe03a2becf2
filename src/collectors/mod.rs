pub mod command;
pub mod drives;
pub mod files;
pub mod filesystem;
pub mod hash;
pub mod mount_table;
pub mod partitions;
pub mod permissions;
pub mod space;
