//! Common error types for network operations

/// A common error type for network operations.
///
/// Connection-specific errors are folded into these variants so the transfer layer
/// can report them without knowing the board's network stack.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A connection attempt was refused or the connector gave up.
    ConnectionRefused,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The peer closed the connection before the message was complete.
    ConnectionClosed,
    /// The response head was malformed or did not fit the receive buffer.
    ProtocolError,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
