//! Non-blocking line input.
//!
//! [`LineReader`] assembles one line from a [`CharStream`] across as many scheduler
//! ticks as it takes. Each call to [`poll`](LineReader::poll) consumes whatever bytes
//! are available and returns [`Poll::Pending`] when the stream runs dry, so the
//! caller can yield and try again on the next tick.
//!
//! # Character Handling
//!
//! - **CR**: ends the line, echoed as a newline
//! - **LF**: ends the line, unless it directly follows a CR (CRLF counts once)
//! - **Backspace**: removes the last character with visual feedback
//! - **Anything else**: appended and echoed verbatim

use alloc::string::String;
use core::task::Poll;

use super::io::{ASCII_BACKSPACE, ASCII_CR, ASCII_LF, CharStream};
use crate::config::MAX_LINE_LEN;

/// Resumable reader for a single input line.
///
/// # Examples
///
/// ```rust
/// use core::task::Poll;
/// use tasksh::system::io::CharStream;
/// use tasksh::system::readline::LineReader;
///
/// struct Script(&'static [u8]);
///
/// impl CharStream for Script {
///     fn try_read_byte(&mut self) -> Option<u8> {
///         let (first, rest) = self.0.split_first()?;
///         self.0 = rest;
///         Some(*first)
///     }
///     fn write_bytes(&mut self, _bytes: &[u8]) {}
/// }
///
/// let mut reader = LineReader::new();
/// let mut uart = Script(b"he");
/// assert_eq!(reader.poll(&mut uart), Poll::Pending);
///
/// let mut uart = Script(b"llo\r\n");
/// assert_eq!(reader.poll(&mut uart), Poll::Ready(String::from("hello")));
/// ```
#[derive(Debug)]
pub struct LineReader {
    buffer: heapless::Vec<u8, MAX_LINE_LEN>,
    last_was_cr: bool,
    echo: bool,
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader {
    /// Create a reader with echo enabled.
    pub fn new() -> Self {
        Self {
            buffer: heapless::Vec::new(),
            last_was_cr: false,
            echo: true,
        }
    }

    /// Enable or disable echoing of typed characters.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo = enabled;
    }

    /// Bytes collected so far for the line in progress.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume available input and return the line once it is complete.
    ///
    /// The returned line never contains CR or LF. Bytes that do not fit in
    /// [`MAX_LINE_LEN`] are dropped without echo.
    pub fn poll<S: CharStream + ?Sized>(&mut self, io: &mut S) -> Poll<String> {
        while let Some(byte) = io.try_read_byte() {
            match byte {
                ASCII_BACKSPACE => {
                    if self.buffer.pop().is_some() {
                        self.echo_bytes(io, b"\x08 \x08");
                    }
                    self.last_was_cr = false;
                }
                ASCII_CR => {
                    self.last_was_cr = true;
                    self.echo_bytes(io, b"\n");
                    return Poll::Ready(self.take_line());
                }
                ASCII_LF if self.last_was_cr => {
                    self.last_was_cr = false;
                }
                ASCII_LF => {
                    self.echo_bytes(io, b"\n");
                    return Poll::Ready(self.take_line());
                }
                _ => {
                    self.last_was_cr = false;
                    if self.buffer.push(byte).is_ok() {
                        self.echo_bytes(io, &[byte]);
                    }
                }
            }
        }
        Poll::Pending
    }

    fn echo_bytes<S: CharStream + ?Sized>(&self, io: &mut S, bytes: &[u8]) {
        if self.echo {
            io.write_bytes(bytes);
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        line
    }
}
