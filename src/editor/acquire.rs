//! Multi-line text entry terminated by a lone `.`.
//!
//! ```text
//! first line
//! ..starts with a dot     -> stored as ".starts with a dot"
//! .                       -> ends entry, not stored
//! ```
//!
//! Any line starting with a dot loses exactly one, so `..` stores `.` and `...`
//! stores `..`.

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;
use core::task::Poll;

use crate::system::io::CharStream;
use crate::system::readline::LineReader;

/// Resumable collector for dot-terminated input.
#[derive(Debug, Default)]
pub struct DotReader {
    lines: Vec<String>,
}

impl DotReader {
    /// Start a new acquisition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read lines until the terminating `.` and return everything before it.
    pub fn poll<S: CharStream + ?Sized>(
        &mut self,
        reader: &mut LineReader,
        io: &mut S,
    ) -> Poll<Vec<String>> {
        loop {
            let Poll::Ready(line) = reader.poll(io) else {
                return Poll::Pending;
            };
            if line == "." {
                return Poll::Ready(mem::take(&mut self.lines));
            }
            self.lines.push(match line.strip_prefix('.') {
                Some(rest) => String::from(rest),
                None => line,
            });
        }
    }
}
