//! Command shell interface for embedded systems.
//!
//! The shell is the resident console task. It prints a prompt, reads a line without
//! blocking, tokenizes it and dispatches it to a registered command, a builtin or the
//! editor. It never finishes; the host calls [`Shell::tick`] from its main loop and the
//! shell returns as soon as it would have to wait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   LineReader    │───▶│   Tokenizer     │───▶│   Registry      │
//! │  (non-blocking) │    │                 │    │  (first match)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!          ▲                                             │ no match
//!          │                                             ▼
//! ┌─────────────────┐                          ┌─────────────────┐
//! │     Editor      │◀──────── ed ─────────────│    Builtins     │
//! │  (nested loop)  │                          │ store / network │
//! └─────────────────┘                          └─────────────────┘
//! ```
//!
//! Store builtins (`ls cat echoTo appendTo cp mv rm format ed`) exist only once a
//! [`FileStore`] has been attached with [`Shell::with_store`]; network builtins
//! (`get put reflash`) only once a [`Transfer`] has been attached with
//! [`Shell::with_transfer`]. Without them those names are invalid commands.
//!
//! # Usage Examples
//!
//! ```rust
//! use core::task::Poll;
//! use tasksh::storage::ram::RamFs;
//! use tasksh::system::io::CharStream;
//! use tasksh::system::registry::ShellResult;
//! use tasksh::system::shell::Shell;
//!
//! struct Console { input: Vec<u8>, output: String }
//!
//! impl CharStream for Console {
//!     fn try_read_byte(&mut self) -> Option<u8> {
//!         if self.input.is_empty() { None } else { Some(self.input.remove(0)) }
//!     }
//!     fn write_bytes(&mut self, bytes: &[u8]) {
//!         self.output.push_str(&String::from_utf8_lossy(bytes));
//!     }
//! }
//!
//! fn hello(argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
//!     writeln!(io, "Hello, {}!", argv.get(1).map_or("World", String::as_str));
//!     Poll::Ready(())
//! }
//!
//! let mut shell = Shell::new().with_store(RamFs::new());
//! shell.set_echo(false);
//! assert_eq!(shell.register(1, "hello", hello), ShellResult::Ok);
//!
//! let mut console = Console { input: b"hello rust\r\necho1 x\r\n".to_vec(), output: String::new() };
//! shell.tick(&mut console);
//! assert_eq!(console.output, "cmd: Hello, rust!\ncmd: Invalid command.\ncmd: ");
//! ```

use core::task::Poll;

use super::builtins::{self, STORE_USAGE, TRANSFER_USAGE};
use super::io::CharStream;
use super::readline::LineReader;
use super::registry::{CommandTask, Registry, ShellResult, TaskId};
use super::tokenizer::{Argv, tokenize};
use crate::config::Config;
use crate::editor::Editor;
use crate::network::transfer::{self, Transfer};
use crate::ota;
use crate::storage::{self, FileStore};

const PROMPT: &str = "cmd: ";

/// Function signature for the reboot hook.
///
/// Called by the `reboot` builtin after the console has been told. On hardware it
/// resets the device and does not return.
///
/// # Examples
///
/// ```rust
/// use tasksh::system::shell::RebootFn;
///
/// let reset: RebootFn = || {
///     // cortex_m::peripheral::SCB::sys_reset();
/// };
/// ```
pub type RebootFn = fn();

/// Placeholder for a collaborator that has not been configured in.
///
/// It has no values, so a shell typed with it can never reach the builtins that would
/// use one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unconfigured {}

impl FileStore for Unconfigured {
    type Handle = Unconfigured;

    fn open_read(&mut self, _path: &str) -> Result<Self::Handle, storage::Error> {
        match *self {}
    }

    fn open_write(&mut self, _path: &str) -> Result<Self::Handle, storage::Error> {
        match *self {}
    }

    fn open_append(&mut self, _path: &str) -> Result<Self::Handle, storage::Error> {
        match *self {}
    }

    fn read_byte(&mut self, _handle: &mut Self::Handle) -> Option<u8> {
        match *self {}
    }

    fn write(&mut self, _handle: &mut Self::Handle, _bytes: &[u8]) -> Result<(), storage::Error> {
        match *self {}
    }

    fn close(&mut self, _handle: Self::Handle) {
        match *self {}
    }

    fn rename(&mut self, _from: &str, _to: &str) -> Result<(), storage::Error> {
        match *self {}
    }

    fn remove(&mut self, _path: &str) -> Result<(), storage::Error> {
        match *self {}
    }

    fn list(&mut self, _visit: &mut dyn FnMut(&str, usize)) -> Result<(), storage::Error> {
        match *self {}
    }
}

impl Transfer for Unconfigured {
    fn get<F: FileStore>(
        &mut self,
        _store: &mut F,
        _remote: &str,
        _local: &str,
    ) -> Result<usize, transfer::Error> {
        match *self {}
    }

    fn put<F: FileStore>(
        &mut self,
        _store: &mut F,
        _local: &str,
        _remote: &str,
    ) -> Result<usize, transfer::Error> {
        match *self {}
    }

    fn reflash(&mut self, _remote: &str) -> Result<ota::Image, transfer::Error> {
        match *self {}
    }
}

/// Where the shell resumes on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Prompt,
    Reading,
    Command(usize),
    Editing,
}

/// Main shell structure: line input, dispatch and the nested editor.
///
/// `F` is the file store and `N` the transfer collaborator; either can be left as
/// [`Unconfigured`].
pub struct Shell<F = Unconfigured, N = Unconfigured> {
    registry: Registry,
    reader: LineReader,
    editor: Editor,
    state: State,
    // Kept across ticks while a registered command is still running.
    argv: Argv,
    config: Config,
    store: Option<F>,
    transfer: Option<N>,
    reboot_fn: Option<RebootFn>,
}

impl<F: core::fmt::Debug, N: core::fmt::Debug> core::fmt::Debug for Shell<F, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shell")
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("config", &self.config)
            .field("store", &self.store)
            .field("transfer", &self.transfer)
            .finish_non_exhaustive()
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Create a shell with no store, no transfer and the default [`Config`].
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            reader: LineReader::new(),
            editor: Editor::new(),
            state: State::Prompt,
            argv: Argv::new(),
            config: Config::default(),
            store: None,
            transfer: None,
            reboot_fn: None,
        }
    }
}

impl<F, N> Shell<F, N> {
    /// Attach a file store, enabling the store builtins and `ed`.
    pub fn with_store<G: FileStore>(self, store: G) -> Shell<G, N> {
        Shell {
            registry: self.registry,
            reader: self.reader,
            editor: self.editor,
            state: self.state,
            argv: self.argv,
            config: self.config,
            store: Some(store),
            transfer: self.transfer,
            reboot_fn: self.reboot_fn,
        }
    }

    /// Attach a transfer collaborator, enabling `get`, `put` and `reflash`.
    pub fn with_transfer<M: Transfer>(self, transfer: M) -> Shell<F, M> {
        Shell {
            registry: self.registry,
            reader: self.reader,
            editor: self.editor,
            state: self.state,
            argv: self.argv,
            config: self.config,
            store: self.store,
            transfer: Some(transfer),
            reboot_fn: self.reboot_fn,
        }
    }

    /// Apply a runtime configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.reader.set_echo(config.echo);
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The attached file store, if any.
    pub fn store(&self) -> Option<&F> {
        self.store.as_ref()
    }

    /// Enable or disable echoing of typed characters.
    ///
    /// Echo is on by default; scripted input usually turns it off.
    pub fn set_echo(&mut self, enabled: bool) {
        self.config.echo = enabled;
        self.reader.set_echo(enabled);
    }

    /// Set the function `reboot` calls.
    pub fn set_reboot_function(&mut self, reboot_fn: RebootFn) {
        self.reboot_fn = Some(reboot_fn);
    }

    /// Register a command task under `name`.
    ///
    /// Registration happens at startup; the table is read-only afterwards. A name
    /// registered twice keeps resolving to the first registration.
    ///
    /// # Returns
    ///
    /// * [`ShellResult::Ok`] - Command registered
    /// * [`ShellResult::InvalidParameter`] - Empty name
    /// * [`ShellResult::NameTooLong`] - Name exceeds the fixed name length
    /// * [`ShellResult::Full`] - Command table is full
    pub fn register<T>(&mut self, id: TaskId, name: &str, task: T) -> ShellResult
    where
        T: CommandTask + 'static,
    {
        self.registry.register(id, name, task)
    }

    /// The command table.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl<F: FileStore, N: Transfer> Shell<F, N> {
    /// Run the shell until it has to wait for input or for a command task.
    pub fn tick<S: CharStream>(&mut self, io: &mut S) {
        loop {
            match self.state {
                State::Prompt => {
                    io.write_str(PROMPT);
                    self.state = State::Reading;
                }
                State::Reading => {
                    let Poll::Ready(line) = self.reader.poll(io) else {
                        return;
                    };
                    self.argv = tokenize(&line);
                    self.state = if self.argv.is_empty() {
                        State::Prompt
                    } else {
                        self.dispatch(io)
                    };
                }
                State::Command(index) => {
                    let Some(entry) = self.registry.get_mut(index) else {
                        self.state = State::Prompt;
                        continue;
                    };
                    if entry.task.poll(&self.argv, io).is_pending() {
                        return;
                    }
                    trace!("command task {} finished", entry.id);
                    self.state = State::Prompt;
                }
                State::Editing => {
                    let Some(store) = self.store.as_mut() else {
                        self.state = State::Prompt;
                        continue;
                    };
                    if self.editor.poll(&mut self.reader, io, store).is_pending() {
                        return;
                    }
                    self.state = State::Prompt;
                }
            }
        }
    }

    /// Same as [`tick`](Self::tick), reported as a task that never completes.
    pub fn poll<S: CharStream>(&mut self, io: &mut S) -> Poll<()> {
        self.tick(io);
        Poll::Pending
    }

    /// `true` while the editor owns the console.
    pub fn is_editing(&self) -> bool {
        self.state == State::Editing
    }

    /// The editor, for inspecting the session in progress.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Route one non-empty command line and return the state to resume in.
    fn dispatch<S: CharStream>(&mut self, io: &mut S) -> State {
        let argv = &self.argv[..];
        let command = argv[0].as_str();

        if let Some(index) = self.registry.position(command) {
            debug!("dispatching {} to task", command);
            return State::Command(index);
        }

        match command {
            "help" => self.help(io),
            "reboot" => {
                if argv.len() != 1 {
                    io.write_str("Syntax: reboot\n");
                } else {
                    io.write_str("Rebooting...\n");
                    warn!("reboot requested from console");
                    if let Some(reboot) = self.reboot_fn {
                        reboot();
                    }
                }
            }
            "ed" if self.store.is_some() => {
                if argv.len() > 2 || argv.get(1).is_some_and(|path| path.is_empty()) {
                    io.write_str("Syntax: ed [filename]\n");
                } else if let Some(store) = self.store.as_mut() {
                    self.editor.open(&argv[1..], io, store);
                    return State::Editing;
                }
            }
            _ => {
                let handled = match self.store.as_mut() {
                    Some(store) => builtins::run_store_command(store, argv, io),
                    None => false,
                } || match self.transfer.as_mut() {
                    Some(transfer) => builtins::run_transfer_command(
                        transfer,
                        self.store.as_mut(),
                        &self.config,
                        argv,
                        io,
                    ),
                    None => false,
                };
                if !handled {
                    io.write_str("Invalid command.\n");
                }
            }
        }
        State::Prompt
    }

    fn help<S: CharStream>(&self, io: &mut S) {
        for name in self.registry.names() {
            writeln!(io, "  {}", name);
        }
        io.write_str("  help\n  reboot\n");
        if self.store.is_some() {
            io.write_str(STORE_USAGE);
        }
        if self.transfer.is_some() {
            io.write_str(TRANSFER_USAGE);
        }
    }
}
