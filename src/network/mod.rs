//! A network abstraction layer for the shell's transfer builtins.
//!
//! The traits here describe a blocking byte connection and a connector that opens
//! one. Boards implement them over their TCP stack; [`http`] speaks HTTP/1.1 over any
//! [`Connection`] and [`transfer`] builds the `get`/`put`/`reflash` operations on top.
//!
//! ```text
//! Shell ──> Transfer ──> HttpTransfer ──> http::Client ──> Connection
//!                              │
//!                              └──> ota::Updater ──> ota::Platform
//! ```

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Streaming HTTP/1.1 client
pub mod http;

/// File and firmware transfer over HTTP
pub mod transfer;

/// Re-exports of common traits
pub mod prelude {
    pub use super::transfer::Transfer;
    pub use super::{Close, Connect, Connection, Read, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection; `Ok(0)` means the peer closed it
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`, given as `host:port`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
