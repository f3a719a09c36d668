//! Install-tree files: layout, the config-file line model and the write lock.
pub mod file;
pub mod ini;
pub mod layout;
pub mod lock;
