//! Common error types for storage operations

/// A common error type for file store operations.
///
/// This enum defines the failures a path-addressed store can report. It is designed
/// to be simple and portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No file exists at the given path.
    NotFound,
    /// The path is empty or not absolute.
    InvalidPath,
    /// An error occurred during a read operation.
    ReadError,
    /// An error occurred during a write operation.
    WriteError,
    /// The store has no room left for the data.
    NoSpace,
    /// An operation was attempted on a store that was not initialized.
    NotInitialized,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotFound => defmt::write!(f, "NotFound"),
            Error::InvalidPath => defmt::write!(f, "InvalidPath"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::NoSpace => defmt::write!(f, "NoSpace"),
            Error::NotInitialized => defmt::write!(f, "NotInitialized"),
        }
    }
}
