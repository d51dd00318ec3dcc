//! A [`FileStore`] kept entirely in RAM.
//!
//! Useful on hosts, in simulators and in tests. An optional byte budget makes the store
//! report [`Error::NoSpace`] the way a small flash partition would.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::{Error, FileStore};

/// Handle to a file open in a [`RamFs`].
#[derive(Debug)]
pub struct RamHandle {
    path: String,
    pos: usize,
    writable: bool,
}

/// RAM-backed file store.
#[derive(Debug, Default)]
pub struct RamFs {
    files: BTreeMap<String, Vec<u8>>,
    capacity: Option<usize>,
}

impl RamFs {
    /// Create an empty store with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `bytes` bytes of file data.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            files: BTreeMap::new(),
            capacity: Some(bytes),
        }
    }

    /// Store `bytes` at `path`, replacing any existing file.
    pub fn insert(&mut self, path: &str, bytes: &[u8]) {
        self.files.insert(String::from(path), bytes.to_vec());
    }

    /// Borrow the contents of the file at `path`.
    pub fn contents(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Number of files in the store.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// `true` if the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn used(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    fn check_path(path: &str) -> Result<(), Error> {
        if path.len() < 2 || !path.starts_with('/') {
            return Err(Error::InvalidPath);
        }
        Ok(())
    }
}

impl FileStore for RamFs {
    type Handle = RamHandle;

    fn open_read(&mut self, path: &str) -> Result<RamHandle, Error> {
        Self::check_path(path)?;
        if !self.files.contains_key(path) {
            return Err(Error::NotFound);
        }
        Ok(RamHandle {
            path: String::from(path),
            pos: 0,
            writable: false,
        })
    }

    fn open_write(&mut self, path: &str) -> Result<RamHandle, Error> {
        Self::check_path(path)?;
        self.files.insert(String::from(path), Vec::new());
        Ok(RamHandle {
            path: String::from(path),
            pos: 0,
            writable: true,
        })
    }

    fn open_append(&mut self, path: &str) -> Result<RamHandle, Error> {
        Self::check_path(path)?;
        let pos = self.files.entry(String::from(path)).or_default().len();
        Ok(RamHandle {
            path: String::from(path),
            pos,
            writable: true,
        })
    }

    fn read_byte(&mut self, handle: &mut RamHandle) -> Option<u8> {
        let byte = *self.files.get(&handle.path)?.get(handle.pos)?;
        handle.pos += 1;
        Some(byte)
    }

    fn write(&mut self, handle: &mut RamHandle, bytes: &[u8]) -> Result<(), Error> {
        if !handle.writable {
            return Err(Error::WriteError);
        }
        if let Some(capacity) = self.capacity {
            if self.used() + bytes.len() > capacity {
                return Err(Error::NoSpace);
            }
        }
        let file = self.files.get_mut(&handle.path).ok_or(Error::NotFound)?;
        file.truncate(handle.pos);
        file.extend_from_slice(bytes);
        handle.pos += bytes.len();
        Ok(())
    }

    fn close(&mut self, _handle: RamHandle) {}

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Error> {
        Self::check_path(from)?;
        Self::check_path(to)?;
        let bytes = self.files.remove(from).ok_or(Error::NotFound)?;
        self.files.insert(String::from(to), bytes);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), Error> {
        Self::check_path(path)?;
        self.files.remove(path).map(|_| ()).ok_or(Error::NotFound)
    }

    fn list(&mut self, visit: &mut dyn FnMut(&str, usize)) -> Result<(), Error> {
        for (path, bytes) in &self.files {
            visit(path, bytes.len());
        }
        Ok(())
    }
}
