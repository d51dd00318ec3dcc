//! Text held by an editing session.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Logical cursor of a [`Document`].
///
/// Lines are numbered from 1. [`Cursor::PastEnd`] means "after the last line"; it is
/// the cursor of an empty document and of one whose tail was just deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// On a 1-based line.
    Line(usize),
    /// Past the last line.
    #[default]
    PastEnd,
}

impl Cursor {
    /// Line number as shown to the user, `-1` for [`Cursor::PastEnd`].
    pub fn number(self) -> i64 {
        match self {
            Cursor::Line(line) => line as i64,
            Cursor::PastEnd => -1,
        }
    }

    /// `true` if the cursor sits on `line`.
    pub fn is_on(self, line: usize) -> bool {
        self == Cursor::Line(line)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Ordered lines plus the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
    cursor: Cursor,
}

impl Document {
    /// An empty document with the cursor past the end.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document holding `lines`, cursor on line 1.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            cursor: Cursor::Line(1),
        }
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` if the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Cursor as a line number, counting past-end as `len + 1`.
    pub(crate) fn cursor_or_after_end(&self) -> usize {
        match self.cursor {
            Cursor::Line(line) => line,
            Cursor::PastEnd => self.lines.len() + 1,
        }
    }

    /// Text of 1-based `line`.
    pub fn line(&self, line: usize) -> Option<&str> {
        let index = line.checked_sub(1)?;
        self.lines.get(index).map(String::as_str)
    }

    pub(crate) fn line_mut(&mut self, line: usize) -> Option<&mut String> {
        let index = line.checked_sub(1)?;
        self.lines.get_mut(index)
    }

    /// Copy of lines `first..=last` (1-based, already validated).
    pub(crate) fn copy_range(&self, first: usize, last: usize) -> Vec<String> {
        self.lines[first - 1..last].to_vec()
    }

    /// Remove lines `first..=last` (1-based, already validated) and return them.
    pub(crate) fn remove_range(&mut self, first: usize, last: usize) -> Vec<String> {
        self.lines.drain(first - 1..last).collect()
    }

    /// Insert `lines` so the first of them lands at 0-based `index`.
    pub(crate) fn insert_at(&mut self, index: usize, lines: &[String]) {
        let index = index.min(self.lines.len());
        self.lines.splice(index..index, lines.iter().cloned());
    }
}

/// Scratch lines filled by cut, copy and insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasteBuffer {
    lines: Vec<String>,
    origin: usize,
}

impl PasteBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffered lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// First document line the contents came from, 0 for typed-in lines.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace the contents.
    pub fn replace(&mut self, lines: Vec<String>, origin: usize) {
        self.lines = lines;
        self.origin = origin;
    }
}
