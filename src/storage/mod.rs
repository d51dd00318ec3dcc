//! # Persistent file store abstraction
//!
//! The shell and editor only need a handful of operations from the device's file
//! system: open a file for reading, writing or appending, move bytes through the
//! resulting handle, and rename, remove or list whole files. [`FileStore`] captures
//! exactly that, so SPIFFS, LittleFS, FAT or a RAM disk can sit behind it.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │      Shell      │    │     Editor      │
//! │    builtins     │    │   r / w / ed    │
//! └─────────────────┘    └─────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────────────────────────────┐
//! │            FileStore trait              │
//! └─────────────────────────────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │  Flash FS port  │    │  RamFs (hosts,  │
//! │  (per device)   │    │     tests)      │
//! └─────────────────┘    └─────────────────┘
//! ```
//!
//! All paths handed to a store are absolute; use [`absolute`] on user input first.
//!
//! # Usage Examples
//!
//! ```rust
//! use tasksh::storage::{FileStore, ram::RamFs};
//!
//! let mut fs = RamFs::new();
//! let mut handle = fs.open_write("/notes.txt").unwrap();
//! fs.write_line(&mut handle, "first").unwrap();
//! fs.close(handle);
//!
//! assert_eq!(fs.contents("/notes.txt"), Some(&b"first\n"[..]));
//! ```

#![deny(unsafe_code)]

use alloc::string::String;
use alloc::vec::Vec;

/// Common error types for storage operations
pub mod error;

/// RAM-backed file store
pub mod ram;


pub use error::Error;

/// Prefix `path` with `/` unless it already starts with one.
///
/// # Examples
///
/// ```rust
/// use tasksh::storage::absolute;
///
/// assert_eq!(absolute("boot.txt"), "/boot.txt");
/// assert_eq!(absolute("/boot.txt"), "/boot.txt");
/// ```
pub fn absolute(path: &str) -> String {
    let mut full = String::with_capacity(path.len() + 1);
    if !path.starts_with('/') {
        full.push('/');
    }
    full.push_str(path);
    full
}

/// A path-addressed byte store with simple sequential file handles.
///
/// Handles are owned values: every successful `open_*` must be paired with
/// [`close`](FileStore::close).
pub trait FileStore {
    /// An open file.
    type Handle;

    /// Open an existing file for sequential reading.
    fn open_read(&mut self, path: &str) -> Result<Self::Handle, Error>;

    /// Create or truncate a file and open it for writing.
    fn open_write(&mut self, path: &str) -> Result<Self::Handle, Error>;

    /// Open a file for writing at its end, creating it if needed.
    fn open_append(&mut self, path: &str) -> Result<Self::Handle, Error>;

    /// Read the next byte, or `None` at end of file.
    fn read_byte(&mut self, handle: &mut Self::Handle) -> Option<u8>;

    /// Write bytes at the handle's position.
    fn write(&mut self, handle: &mut Self::Handle, bytes: &[u8]) -> Result<(), Error>;

    /// Write `text` followed by a line feed.
    fn write_line(&mut self, handle: &mut Self::Handle, text: &str) -> Result<(), Error> {
        self.write(handle, text.as_bytes())?;
        self.write(handle, b"\n")
    }

    /// Release a handle, committing anything buffered.
    fn close(&mut self, handle: Self::Handle);

    /// Rename a file.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), Error>;

    /// Delete a file.
    fn remove(&mut self, path: &str) -> Result<(), Error>;

    /// Call `visit(path, size)` for every file in the store.
    fn list(&mut self, visit: &mut dyn FnMut(&str, usize)) -> Result<(), Error>;

    /// Remove every file.
    fn format(&mut self) -> Result<(), Error> {
        let mut paths = Vec::new();
        self.list(&mut |path, _| paths.push(String::from(path)))?;
        for path in paths {
            self.remove(&path)?;
        }
        Ok(())
    }
}
