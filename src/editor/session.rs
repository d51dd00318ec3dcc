//! Editor state and the command set.
//!
//! A [`Session`] owns everything one `ed` invocation edits: the document, the paste
//! buffer, the undo slot and the file metadata. [`Session::execute`] runs one tokenized
//! command against it. Commands that need more input (`ia`, `ib`) return
//! [`Outcome::Acquire`]; the caller collects the lines and hands them to
//! [`Session::finish_insert`].

use alloc::string::String;
use alloc::vec::Vec;

use super::document::{Cursor, Document, PasteBuffer};
use super::error::Error;
use super::range::{LineRange, RangeDefault, parse_line, resolve};
use super::undo::UndoSnapshot;
use crate::storage::{self, FileStore};
use crate::system::io::CharStream;

const USAGE_INFO: &str = "?";
const USAGE_QUIT: &str = "q";
const USAGE_FORWARD: &str = "+ [nlines]";
const USAGE_BACKWARD: &str = "- [nlines]";
const USAGE_GOTO: &str = "g line";
const USAGE_TYPE: &str = "t [line1 [line2]]";
const USAGE_TYPE_ALL: &str = "ta";
const USAGE_WINDOW: &str = "tw [nlines]";
const USAGE_COPY: &str = "c [line1 [line2]]";
const USAGE_DELETE: &str = "d [line1 [line2]]";
const USAGE_INSERT_AFTER: &str = "ia [line]";
const USAGE_INSERT_BEFORE: &str = "ib [line]";
const USAGE_PASTE_AFTER: &str = "pa [line]";
const USAGE_PASTE_BEFORE: &str = "pb [line]";
const USAGE_FIND: &str = "f str [line1 [line2]]";
const USAGE_SUBSTITUTE: &str = "s strOld strNew [line1 [line2]]";
const USAGE_SUBSTITUTE_ALL: &str = "sa strOld strNew [line1 [line2]]";
const USAGE_UNDO: &str = "u";
const USAGE_READ: &str = "r fn";
const USAGE_WRITE: &str = "w [fn]";

const HELP: &str = "\
r w -- file read/write
q ? h -- quit, info, help
g + - -- goto line; go forward or backwards by lines
t ta tw -- type lines: specific, all, window around current line
f b s sa -- find forward/backward; substitute first/all occurrences of a string
d c -- delete or copy lines to pastebuffer
ia ib pa pb -- insert new | paste pastebuffer after/before current line
u -- undo last operation that modified the text
";

/// What the editor loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Prompt for the next command.
    Continue,
    /// Leave the editor.
    Quit,
    /// Collect dot-terminated lines, then call [`Session::finish_insert`] with this
    /// 0-based insertion index.
    Acquire(usize),
}

/// Which side of the anchor line an insertion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    After,
    Before,
}

/// State of one editing session.
#[derive(Debug, Default)]
pub struct Session {
    document: Document,
    paste: PasteBuffer,
    undo: UndoSnapshot,
    filename: String,
    modified: bool,
}

impl Session {
    /// An empty, unnamed session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document being edited.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The paste buffer.
    pub fn paste_buffer(&self) -> &PasteBuffer {
        &self.paste
    }

    /// The undo slot.
    pub fn undo(&self) -> &UndoSnapshot {
        &self.undo
    }

    /// Current filename, empty if none.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// `true` if the document changed since it was last read or written.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Replace the document with the contents of `path`.
    ///
    /// On failure the session is left untouched.
    pub fn load<F: FileStore>(&mut self, store: &mut F, path: &str) -> Result<(), Error> {
        let lines = read_lines(store, path).map_err(|_| Error::Read(String::from(path)))?;
        debug!("loaded {} lines from {}", lines.len(), path);
        self.document = Document::from_lines(lines);
        self.filename = String::from(path);
        self.modified = false;
        Ok(())
    }

    /// Run one tokenized command. `argv` must not be empty.
    pub fn execute<S, F>(
        &mut self,
        argv: &[String],
        io: &mut S,
        store: &mut F,
    ) -> Result<Outcome, Error>
    where
        S: CharStream + ?Sized,
        F: FileStore,
    {
        let Some(command) = argv.first() else {
            return Ok(Outcome::Continue);
        };
        let args = &argv[1..];

        match command.as_str() {
            "?" => self.info(args, io)?,
            "q" => {
                expect_none(args, USAGE_QUIT)?;
                return Ok(Outcome::Quit);
            }
            "h" => io.write_str(HELP),
            "g" => self.goto(args)?,
            "t" => self.type_range(args, io)?,
            "ta" => self.type_all(args, io)?,
            "tw" => self.type_window(args, io)?,
            "c" => self.copy(args)?,
            "d" => self.delete(args, io)?,
            "ia" => return self.begin_insert(args, Side::After, USAGE_INSERT_AFTER),
            "ib" => return self.begin_insert(args, Side::Before, USAGE_INSERT_BEFORE),
            "pa" => self.paste(args, Side::After, USAGE_PASTE_AFTER)?,
            "pb" => self.paste(args, Side::Before, USAGE_PASTE_BEFORE)?,
            "f" => self.find(args, io)?,
            "s" => self.substitute(args, io)?,
            "sa" => self.substitute_all(args, io)?,
            "u" => {
                expect_none(args, USAGE_UNDO)?;
                if self.undo.restore(&mut self.document, &mut self.paste) {
                    self.modified = true;
                }
            }
            "r" => self.read(args, store)?,
            "w" => self.write(args, store)?,
            motion if motion.starts_with('+') => self.step(motion, args, true)?,
            motion if motion.starts_with('-') => self.step(motion, args, false)?,
            _ => io.write_str("unknown command.\n"),
        }
        Ok(Outcome::Continue)
    }

    /// Insert acquired `lines` at 0-based `index` after an `ia`/`ib`.
    ///
    /// The lines replace the paste buffer. Nothing else changes if `lines` is empty.
    pub fn finish_insert(&mut self, index: usize, lines: Vec<String>) {
        self.paste.replace(lines, 0);
        if !self.paste.is_empty() {
            self.insert_paste(index);
        }
    }

    fn info<S: CharStream + ?Sized>(&self, args: &[String], io: &mut S) -> Result<(), Error> {
        expect_none(args, USAGE_INFO)?;
        writeln!(
            io,
            "Filename: [{}].  Number of lines: {}. Current line is {}{}",
            self.filename,
            self.document.len(),
            self.document.cursor(),
            if self.modified { " (modified)" } else { "" }
        );
        Ok(())
    }

    fn goto(&mut self, args: &[String]) -> Result<(), Error> {
        let [target] = args else {
            return Err(Error::Syntax(USAGE_GOTO));
        };
        let line = parse_line(target, &self.document, USAGE_GOTO)?;
        if line == 0 || line < -1 {
            return Err(Error::Syntax(USAGE_GOTO));
        }
        let len = self.document.len();
        if len == 0 {
            return Err(Error::Range);
        }
        let line = if line == -1 { len } else { (line as usize).min(len) };
        self.document.set_cursor(Cursor::Line(line));
        Ok(())
    }

    /// `+`/`-` in any of the forms `+`, `+ n`, `+n`; `-1` means all the way.
    fn step(&mut self, command: &str, args: &[String], forward: bool) -> Result<(), Error> {
        let usage = if forward { USAGE_FORWARD } else { USAGE_BACKWARD };
        let inline = &command[1..];
        let count = match (inline.is_empty(), args) {
            (true, []) => Some(1),
            (true, [word]) => parse_count(word, usage)?,
            (false, []) => parse_count(inline, usage)?,
            _ => return Err(Error::Syntax(usage)),
        };

        let len = self.document.len();
        if len == 0 {
            return Err(Error::Range);
        }
        let from = self.document.cursor_or_after_end();
        let line = match (forward, count) {
            (true, None) => len,
            (false, None) => 1,
            (true, Some(count)) => from.saturating_add(count).min(len),
            (false, Some(count)) => from.saturating_sub(count).clamp(1, len),
        };
        self.document.set_cursor(Cursor::Line(line));
        Ok(())
    }

    fn type_range<S: CharStream + ?Sized>(&self, args: &[String], io: &mut S) -> Result<(), Error> {
        let range = resolve(args, RangeDefault::Cursor, &self.document, USAGE_TYPE)?;
        self.print_lines(range, io);
        Ok(())
    }

    fn type_all<S: CharStream + ?Sized>(&self, args: &[String], io: &mut S) -> Result<(), Error> {
        expect_none(args, USAGE_TYPE_ALL)?;
        if !self.document.is_empty() {
            self.print_lines(
                LineRange {
                    first: 1,
                    last: self.document.len(),
                },
                io,
            );
        }
        Ok(())
    }

    fn type_window<S: CharStream + ?Sized>(
        &self,
        args: &[String],
        io: &mut S,
    ) -> Result<(), Error> {
        let span = match args {
            [] => 1,
            [word] => word
                .parse::<usize>()
                .map_err(|_| Error::Syntax(USAGE_WINDOW))?,
            _ => return Err(Error::Syntax(USAGE_WINDOW)),
        };
        let len = self.document.len();
        let center = self.document.cursor_or_after_end();
        let first = center.saturating_sub(span).max(1);
        let last = center.saturating_add(span).min(len);
        if first <= last {
            self.print_lines(LineRange { first, last }, io);
        }
        Ok(())
    }

    fn copy(&mut self, args: &[String]) -> Result<(), Error> {
        if args.len() > 2 {
            return Err(Error::Syntax(USAGE_COPY));
        }
        let range = resolve(args, RangeDefault::Cursor, &self.document, USAGE_COPY)?;
        self.paste
            .replace(self.document.copy_range(range.first, range.last), range.first);
        Ok(())
    }

    fn delete<S: CharStream + ?Sized>(&mut self, args: &[String], io: &mut S) -> Result<(), Error> {
        if args.len() > 2 {
            return Err(Error::Syntax(USAGE_DELETE));
        }
        let range = resolve(args, RangeDefault::Cursor, &self.document, USAGE_DELETE)?;
        if range.first == range.last {
            writeln!(io, "Deleting line {}", range.first);
        } else {
            writeln!(
                io,
                "Deleting {} through {} to pastebuffer",
                range.first, range.last
            );
        }

        self.snapshot();
        let removed = self.document.remove_range(range.first, range.last);
        self.paste.replace(removed, range.first);
        self.document.set_cursor(if range.first > self.document.len() {
            Cursor::PastEnd
        } else {
            Cursor::Line(range.first)
        });
        self.modified = true;
        Ok(())
    }

    fn begin_insert(
        &mut self,
        args: &[String],
        side: Side,
        usage: &'static str,
    ) -> Result<Outcome, Error> {
        let index = self.insertion_index(args, side, usage)?;
        self.snapshot();
        Ok(Outcome::Acquire(index))
    }

    fn paste(&mut self, args: &[String], side: Side, usage: &'static str) -> Result<(), Error> {
        if args.len() > 1 {
            return Err(Error::Syntax(usage));
        }
        let index = self.insertion_index(args, side, usage)?;
        if self.paste.is_empty() {
            return Ok(());
        }
        self.snapshot();
        self.insert_paste(index);
        Ok(())
    }

    /// 0-based index the first inserted line will occupy.
    ///
    /// `ia` accepts anchors `0..=N` (0 inserts at the top), `ib` accepts `1..=N+1`.
    /// Without an anchor, or with `*`, the cursor line is used; a cursor past the last
    /// line appends.
    fn insertion_index(
        &self,
        args: &[String],
        side: Side,
        usage: &'static str,
    ) -> Result<usize, Error> {
        let len = self.document.len();
        let anchor = match args {
            [] => None,
            [word] if word == "*" => None,
            [word] => match parse_line(word, &self.document, usage)? {
                -1 => Some(len as i64),
                line => Some(line),
            },
            _ => return Err(Error::Syntax(usage)),
        };
        let anchor = match (anchor, self.document.cursor()) {
            (Some(anchor), _) => anchor,
            (None, Cursor::Line(line)) if line <= len => line as i64,
            (None, _) => return Ok(len),
        };

        let index = match side {
            Side::After => anchor,
            Side::Before => anchor - 1,
        };
        if index < 0 || index > len as i64 {
            return Err(Error::Range);
        }
        Ok(index as usize)
    }

    fn insert_paste(&mut self, index: usize) {
        self.document.insert_at(index, self.paste.lines());
        self.document.set_cursor(Cursor::Line(index + 1));
        self.modified = true;
    }

    fn find<S: CharStream + ?Sized>(&mut self, args: &[String], io: &mut S) -> Result<(), Error> {
        let Some((needle, lines)) = args.split_first().filter(|(_, rest)| rest.len() <= 2) else {
            return Err(Error::Syntax(USAGE_FIND));
        };
        let range = resolve(lines, RangeDefault::WholeDocument, &self.document, USAGE_FIND)?;

        let hit = range
            .lines()
            .find(|&line| self.document.line(line).is_some_and(|text| text.contains(needle.as_str())));
        match hit {
            Some(line) => {
                self.document.set_cursor(Cursor::Line(line));
                self.print_lines(LineRange { first: line, last: line }, io);
            }
            None => io.write_str("Search string not found.\n"),
        }
        Ok(())
    }

    fn substitute<S: CharStream + ?Sized>(
        &mut self,
        args: &[String],
        io: &mut S,
    ) -> Result<(), Error> {
        let (old, new, range) =
            self.substitution_args(args, RangeDefault::Cursor, USAGE_SUBSTITUTE)?;
        self.snapshot();

        for line in range.lines() {
            let Some(text) = self.document.line_mut(line) else {
                continue;
            };
            if let Some(at) = text.find(old) {
                text.replace_range(at..at + old.len(), new);
                self.document.set_cursor(Cursor::Line(line));
                self.modified = true;
                return Ok(());
            }
        }
        io.write_str("Search string not found.\n");
        Ok(())
    }

    fn substitute_all<S: CharStream + ?Sized>(
        &mut self,
        args: &[String],
        io: &mut S,
    ) -> Result<(), Error> {
        let (old, new, range) =
            self.substitution_args(args, RangeDefault::WholeDocument, USAGE_SUBSTITUTE_ALL)?;
        self.snapshot();

        let mut last_touched = None;
        for line in range.lines() {
            let Some(text) = self.document.line_mut(line) else {
                continue;
            };
            let mut from = 0;
            while let Some(found) = text[from..].find(old) {
                let at = from + found;
                text.replace_range(at..at + old.len(), new);
                from = at + new.len();
                last_touched = Some(line);
            }
        }

        match last_touched {
            Some(line) => {
                self.document.set_cursor(Cursor::Line(line));
                self.modified = true;
            }
            None => io.write_str("Search string not found.\n"),
        }
        Ok(())
    }

    fn substitution_args<'a>(
        &self,
        args: &'a [String],
        default: RangeDefault,
        usage: &'static str,
    ) -> Result<(&'a str, &'a str, LineRange), Error> {
        let [old, new, lines @ ..] = args else {
            return Err(Error::Syntax(usage));
        };
        if old.is_empty() || lines.len() > 2 {
            return Err(Error::Syntax(usage));
        }
        let range = resolve(lines, default, &self.document, usage)?;
        Ok((old.as_str(), new.as_str(), range))
    }

    fn read<F: FileStore>(&mut self, args: &[String], store: &mut F) -> Result<(), Error> {
        let [path] = args else {
            return Err(Error::Syntax(USAGE_READ));
        };
        if path.is_empty() {
            return Err(Error::Syntax(USAGE_READ));
        }
        self.snapshot();
        self.load(store, path)
    }

    fn write<F: FileStore>(&mut self, args: &[String], store: &mut F) -> Result<(), Error> {
        let path = match args {
            [] => self.filename.clone(),
            [path] => path.clone(),
            _ => return Err(Error::Syntax(USAGE_WRITE)),
        };
        if path.is_empty() {
            return Err(Error::NoFilename);
        }

        write_lines(store, &path, self.document.lines()).map_err(|err| {
            warn!("write of {} failed: {}", path.as_str(), err);
            Error::Write(path.clone())
        })?;
        debug!("wrote {} lines to {}", self.document.len(), path.as_str());
        self.filename = path;
        self.modified = false;
        Ok(())
    }

    fn snapshot(&mut self) {
        self.undo.save(&self.document, &self.paste);
    }

    fn print_lines<S: CharStream + ?Sized>(&self, range: LineRange, io: &mut S) {
        let cursor = self.document.cursor();
        for line in range.lines() {
            if let Some(text) = self.document.line(line) {
                let marker = if cursor.is_on(line) { '*' } else { ' ' };
                writeln!(io, "{}{:03}: {}", marker, line, text);
            }
        }
    }
}

fn expect_none(args: &[String], usage: &'static str) -> Result<(), Error> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(Error::Syntax(usage))
    }
}

/// `None` for `-1` (move all the way), otherwise a positive count.
fn parse_count(word: &str, usage: &'static str) -> Result<Option<usize>, Error> {
    match word.parse::<i64>() {
        Ok(-1) => Ok(None),
        Ok(count) if count > 0 => Ok(Some(count as usize)),
        _ => Err(Error::Syntax(usage)),
    }
}

/// Read `path` and split it on line feeds, keeping a trailing partial line.
pub(crate) fn read_lines<F: FileStore>(
    store: &mut F,
    path: &str,
) -> Result<Vec<String>, storage::Error> {
    let mut handle = store.open_read(&storage::absolute(path))?;
    let mut bytes = Vec::new();
    while let Some(byte) = store.read_byte(&mut handle) {
        bytes.push(byte);
    }
    store.close(handle);

    let mut lines: Vec<String> = bytes
        .split(|&byte| byte == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect();
    // A file ending in '\n' yields one empty piece after the last terminator.
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    Ok(lines)
}

fn write_lines<F: FileStore>(
    store: &mut F,
    path: &str,
    lines: &[String],
) -> Result<(), storage::Error> {
    let mut handle = store.open_write(&storage::absolute(path))?;
    let result = lines
        .iter()
        .try_for_each(|line| store.write_line(&mut handle, line));
    store.close(handle);
    result
}
