//! Fixed-capacity table of user commands.
//!
//! Entries are kept in registration order and looked up by a linear scan with an exact,
//! case-sensitive name match, so the first registration of a name wins.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::task::Poll;

use super::io::CharStream;
use crate::config::{MAX_COMMAND_LEN, MAX_COMMANDS};

/// Identifier a host scheduler uses for a command task.
pub type TaskId = u8;

/// Result type for shell operations.
///
/// # Examples
///
/// ```rust
/// use core::task::Poll;
/// use tasksh::system::io::CharStream;
/// use tasksh::system::registry::{Registry, ShellResult};
///
/// fn uptime(_argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
///     io.write_str("up 3 days\n");
///     Poll::Ready(())
/// }
///
/// let mut registry = Registry::new();
/// assert_eq!(registry.register(200, "uptime", uptime), ShellResult::Ok);
/// assert_eq!(
///     registry.register(201, "a-name-that-is-too-long", uptime),
///     ShellResult::NameTooLong
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ShellResult {
    /// Operation completed successfully.
    Ok,
    /// An empty command name was provided.
    InvalidParameter,
    /// The registry already holds [`MAX_COMMANDS`] commands.
    Full,
    /// The name is longer than [`MAX_COMMAND_LEN`] bytes.
    NameTooLong,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ShellResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ShellResult::Ok => defmt::write!(f, "Ok"),
            ShellResult::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            ShellResult::Full => defmt::write!(f, "Full"),
            ShellResult::NameTooLong => defmt::write!(f, "NameTooLong"),
        }
    }
}

/// A resumable command invoked from the shell.
///
/// The shell polls the task once per tick with the same arguments until it returns
/// [`Poll::Ready`]. A task that waits on anything (input, a timer, another device)
/// returns [`Poll::Pending`] and keeps its progress in its own fields.
///
/// Any `FnMut(&[String], &mut dyn CharStream) -> Poll<()>` is a command task, which
/// covers commands that finish in a single step.
pub trait CommandTask {
    /// Advance the command. `argv[0]` is the command name.
    fn poll(&mut self, argv: &[String], io: &mut dyn CharStream) -> Poll<()>;
}

impl<F> CommandTask for F
where
    F: FnMut(&[String], &mut dyn CharStream) -> Poll<()>,
{
    fn poll(&mut self, argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
        self(argv, io)
    }
}

/// A registered command.
pub struct Entry {
    /// Scheduler id of the command task.
    pub id: TaskId,
    /// Name typed by the user.
    pub name: heapless::String<MAX_COMMAND_LEN>,
    /// The command implementation.
    pub task: Box<dyn CommandTask>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Name → command table, written at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    entries: heapless::Vec<Entry, MAX_COMMANDS>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `task`.
    ///
    /// # Returns
    ///
    /// * [`ShellResult::Ok`] - Command registered
    /// * [`ShellResult::InvalidParameter`] - Empty name
    /// * [`ShellResult::NameTooLong`] - Name exceeds [`MAX_COMMAND_LEN`]
    /// * [`ShellResult::Full`] - Table already holds [`MAX_COMMANDS`] entries
    pub fn register<T>(&mut self, id: TaskId, name: &str, task: T) -> ShellResult
    where
        T: CommandTask + 'static,
    {
        if name.is_empty() {
            return ShellResult::InvalidParameter;
        }
        if self.entries.is_full() {
            return ShellResult::Full;
        }
        let mut stored = heapless::String::new();
        if stored.push_str(name).is_err() {
            return ShellResult::NameTooLong;
        }

        let entry = Entry {
            id,
            name: stored,
            task: Box::new(task),
        };
        if self.entries.push(entry).is_err() {
            return ShellResult::Full;
        }
        debug!("registered command {} as task {}", name, id);
        ShellResult::Ok
    }

    /// Index of the first entry named exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Borrow an entry by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
