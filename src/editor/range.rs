//! Line-number arguments and range resolution.
//!
//! Commands that act on lines (`c d f s sa t`) take up to two numbers. `-1` stands for
//! the last line and `*` for the current one. With no numbers, cursor-anchored
//! commands act on the current line and whole-document commands on every line.

use super::document::{Cursor, Document};
use super::error::Error;

/// What a range covers when no line numbers are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDefault {
    /// `(current, current)`.
    Cursor,
    /// `(1, N)`.
    WholeDocument,
}

/// An inclusive, validated range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line.
    pub first: usize,
    /// Last line, `>= first`.
    pub last: usize,
}

impl LineRange {
    /// Iterate the line numbers in the range.
    pub fn lines(self) -> core::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Parse one line-number argument.
///
/// `*` is the cursor line (0 when the cursor is past the end, which no range
/// accepts). Anything that is not an integer is a syntax error.
pub fn parse_line(word: &str, document: &Document, usage: &'static str) -> Result<i64, Error> {
    if word == "*" {
        return Ok(match document.cursor() {
            Cursor::Line(line) => line as i64,
            Cursor::PastEnd => 0,
        });
    }
    word.parse::<i64>().map_err(|_| Error::Syntax(usage))
}

/// Resolve up to two line-number arguments against `document`.
///
/// # Examples
///
/// ```rust
/// use tasksh::editor::document::{Cursor, Document};
/// use tasksh::editor::range::{resolve, LineRange, RangeDefault};
///
/// let mut doc = Document::from_lines((1..=5).map(|n| n.to_string()).collect());
/// doc.set_cursor(Cursor::Line(3));
///
/// let none: [&str; 0] = [];
/// assert_eq!(resolve(&none, RangeDefault::Cursor, &doc, "d").unwrap(), LineRange { first: 3, last: 3 });
/// assert_eq!(resolve(&["5", "2"], RangeDefault::Cursor, &doc, "d").unwrap(), LineRange { first: 2, last: 5 });
/// assert!(resolve(&["6"], RangeDefault::Cursor, &doc, "d").is_err());
/// ```
pub fn resolve<S: AsRef<str>>(
    args: &[S],
    default: RangeDefault,
    document: &Document,
    usage: &'static str,
) -> Result<LineRange, Error> {
    let len = document.len() as i64;
    let last_if_minus_one = |line: i64| if line == -1 { len } else { line };

    let (first, last) = match args {
        [] => match default {
            RangeDefault::Cursor => {
                let line = match document.cursor() {
                    Cursor::Line(line) => line as i64,
                    Cursor::PastEnd => 0,
                };
                (line, line)
            }
            RangeDefault::WholeDocument => (1, len),
        },
        [only] => {
            let line = last_if_minus_one(parse_line(only.as_ref(), document, usage)?);
            (line, line)
        }
        [first, last] => {
            let first = last_if_minus_one(parse_line(first.as_ref(), document, usage)?);
            let last = last_if_minus_one(parse_line(last.as_ref(), document, usage)?);
            if first > last { (last, first) } else { (first, last) }
        }
        _ => return Err(Error::Syntax(usage)),
    };

    if len == 0 || first < 1 || last > len {
        return Err(Error::Range);
    }
    Ok(LineRange {
        first: first as usize,
        last: last as usize,
    })
}
