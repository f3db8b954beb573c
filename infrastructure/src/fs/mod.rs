//! Local file system access.

mod local;

pub use local::LocalFileSystem;
