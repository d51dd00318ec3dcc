//! Line-oriented text editor.
//!
//! The editor runs inside the shell as a resumable task. Each [`Editor::poll`] consumes
//! whatever input is available and returns [`Poll::Pending`] as soon as it would have
//! to wait for more, so the rest of the device keeps running while a user types.
//!
//! ```text
//!   Prompt ──"ed: "──> Command ──line──> Session::execute
//!     ^                   │                 │        │
//!     │                   │            Acquire(at)  Quit ──> Ready
//!     │                   │                 │
//!     └───────────────────┴──── DotReader ──┘
//! ```
//!
//! Line input comes through the shell's [`LineReader`] so a CR/LF pair split across
//! the shell and the editor is still seen as a single line ending.
//!
//! # Example
//!
//! ```rust
//! use core::task::Poll;
//! use tasksh::editor::Editor;
//! use tasksh::storage::ram::RamFs;
//! use tasksh::system::io::CharStream;
//! use tasksh::system::readline::LineReader;
//!
//! struct Script(Vec<u8>, usize, String);
//!
//! impl CharStream for Script {
//!     fn try_read_byte(&mut self) -> Option<u8> {
//!         let byte = self.0.get(self.1).copied();
//!         self.1 += 1;
//!         byte
//!     }
//!     fn write_bytes(&mut self, bytes: &[u8]) {
//!         self.2.push_str(core::str::from_utf8(bytes).unwrap());
//!     }
//! }
//!
//! let mut io = Script(b"ia\nhello\n.\nw /greeting\nq\n".to_vec(), 0, String::new());
//! let mut fs = RamFs::new();
//! let mut reader = LineReader::new();
//! let mut editor = Editor::new();
//!
//! editor.open(&[], &mut io, &mut fs);
//! assert_eq!(editor.poll(&mut reader, &mut io, &mut fs), Poll::Ready(()));
//! assert_eq!(fs.contents("/greeting"), Some(&b"hello\n"[..]));
//! ```

use alloc::string::String;
use core::task::Poll;

use crate::storage::FileStore;
use crate::system::io::CharStream;
use crate::system::readline::LineReader;
use crate::system::tokenizer::tokenize;

pub mod acquire;
pub mod document;
pub mod error;
pub mod range;
pub mod session;
pub mod undo;


pub use acquire::DotReader;
pub use error::Error;
pub use session::{Outcome, Session};

const PROMPT: &str = "ed: ";

#[derive(Debug, Default)]
enum State {
    #[default]
    Prompt,
    Command,
    Acquire {
        reader: DotReader,
        at: usize,
    },
}

/// The editor task.
#[derive(Debug, Default)]
pub struct Editor {
    session: Session,
    state: State,
}

impl Editor {
    /// A fresh editor with an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session being edited.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start a new session, loading `argv[0]` if given.
    ///
    /// A file that cannot be read is reported and the session stays empty.
    pub fn open<S, F>(&mut self, argv: &[String], io: &mut S, store: &mut F)
    where
        S: CharStream + ?Sized,
        F: FileStore,
    {
        self.session = Session::new();
        self.state = State::Prompt;
        if let Some(path) = argv.first() {
            if let Err(err) = self.session.load(store, path) {
                writeln!(io, "{}", err);
            }
        }
    }

    /// Run until input runs dry or the user quits.
    ///
    /// Returns [`Poll::Ready`] once `q` has been executed; the session is cleared at
    /// that point.
    pub fn poll<S, F>(&mut self, reader: &mut LineReader, io: &mut S, store: &mut F) -> Poll<()>
    where
        S: CharStream + ?Sized,
        F: FileStore,
    {
        loop {
            match &mut self.state {
                State::Prompt => {
                    io.write_str(PROMPT);
                    self.state = State::Command;
                }
                State::Command => {
                    let Poll::Ready(line) = reader.poll(io) else {
                        return Poll::Pending;
                    };
                    let argv = tokenize(&line);
                    if argv.is_empty() {
                        self.state = State::Prompt;
                        continue;
                    }
                    trace!("ed command {}", argv[0].as_str());

                    match self.session.execute(&argv, io, store) {
                        Ok(Outcome::Continue) => self.state = State::Prompt,
                        Ok(Outcome::Acquire(at)) => {
                            self.state = State::Acquire {
                                reader: DotReader::new(),
                                at,
                            }
                        }
                        Ok(Outcome::Quit) => {
                            debug!("leaving editor");
                            self.session = Session::new();
                            self.state = State::Prompt;
                            return Poll::Ready(());
                        }
                        Err(err) => {
                            writeln!(io, "{}", err);
                            self.state = State::Prompt;
                        }
                    }
                }
                State::Acquire { reader: lines, at } => {
                    let Poll::Ready(acquired) = lines.poll(reader, io) else {
                        return Poll::Pending;
                    };
                    let at = *at;
                    self.session.finish_insert(at, acquired);
                    self.state = State::Prompt;
                }
            }
        }
    }
}
