//! Character stream abstraction for the console the shell talks to.
//!
//! The shell never blocks on input: [`CharStream::try_read_byte`] returns `None`
//! when nothing is pending, and the caller suspends until the next scheduler tick.

use core::fmt;

/// ASCII backspace character (0x08).
pub const ASCII_BACKSPACE: u8 = 0x08;
/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;

/// A non-blocking byte source and sink, typically a UART.
///
/// Echoing typed characters is the caller's job; implementations only move bytes.
///
/// # Examples
///
/// ```rust
/// use tasksh::system::io::CharStream;
///
/// struct Uart {
///     rx: Option<u8>,
/// }
///
/// impl CharStream for Uart {
///     fn try_read_byte(&mut self) -> Option<u8> {
///         self.rx.take()
///     }
///
///     fn write_bytes(&mut self, _bytes: &[u8]) {}
/// }
///
/// let mut uart = Uart { rx: Some(b'x') };
/// assert_eq!(uart.try_read_byte(), Some(b'x'));
/// assert_eq!(uart.try_read_byte(), None);
/// ```
pub trait CharStream {
    /// Return the next received byte, or `None` if nothing is available yet.
    fn try_read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Write a string slice.
    fn write_str(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Formatted output, so `write!`/`writeln!` can target a stream directly.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::write(&mut Adapter(self), args);
    }
}

impl<S: CharStream + ?Sized> CharStream for &mut S {
    fn try_read_byte(&mut self) -> Option<u8> {
        (**self).try_read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes)
    }
}

struct Adapter<'a, S: ?Sized>(&'a mut S);

impl<S: CharStream + ?Sized> fmt::Write for Adapter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_bytes(s.as_bytes());
        Ok(())
    }
}
