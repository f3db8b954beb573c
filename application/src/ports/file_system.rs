//! File system port
//!
//! Synchronous primitives used by `file_operation` and `code_gen` steps and
//! by project application. No sandboxing beyond what the OS enforces.

use std::io;
use std::path::Path;

pub trait FileSystemPort: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write `content`, creating missing parent directories
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Remove a file, or a directory with everything in it
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Entry names directly inside `path`, sorted
    fn list(&self, path: &Path) -> io::Result<Vec<String>>;
}
