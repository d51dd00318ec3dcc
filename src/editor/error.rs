//! Errors reported by editor commands.

use alloc::string::String;
use core::fmt;

/// Why an editor command did nothing.
///
/// Every variant leaves the session exactly as it was before the command, except
/// that `r` has already taken its undo snapshot when a read fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wrong argument count or shape; carries the command's usage line.
    Syntax(&'static str),
    /// A line number outside `1..=N`, or an empty document.
    Range,
    /// `w` without a filename while the session has none.
    NoFilename,
    /// The named file could not be read.
    Read(String),
    /// The named file could not be written.
    Write(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(usage) => write!(f, "Syntax: {}", usage),
            Error::Range => f.write_str("Line number out of range."),
            Error::NoFilename => f.write_str("No current filename. Syntax: w [fn]"),
            Error::Read(path) => write!(f, "Can't read file [{}]", path),
            Error::Write(path) => write!(f, "Can't write file [{}]", path),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Syntax(usage) => defmt::write!(f, "Syntax({=str})", *usage),
            Error::Range => defmt::write!(f, "Range"),
            Error::NoFilename => defmt::write!(f, "NoFilename"),
            Error::Read(path) => defmt::write!(f, "Read({=str})", path.as_str()),
            Error::Write(path) => defmt::write!(f, "Write({=str})", path.as_str()),
        }
    }
}
