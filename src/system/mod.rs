//! Console-side building blocks.
//!
//! Everything the resident shell needs to talk to a user over a byte stream without
//! ever blocking the device's single thread.
//!
//! # Available Utilities
//!
//! - **[`io`]**: the non-blocking [`CharStream`](io::CharStream) the console runs on
//! - **[`tokenizer`]**: splits a command line into arguments
//! - **[`readline`]**: assembles one line across scheduler ticks
//! - **[`registry`]**: fixed-capacity table of user command tasks
//! - **[`shell`]**: the resident prompt/dispatch loop
//!
//! # Usage
//!
//! ```rust,no_run
//! use core::task::Poll;
//! use tasksh::system::io::CharStream;
//! use tasksh::system::shell::Shell;
//! # struct Uart;
//! # impl CharStream for Uart {
//! #     fn try_read_byte(&mut self) -> Option<u8> { None }
//! #     fn write_bytes(&mut self, _bytes: &[u8]) {}
//! # }
//!
//! fn status(_argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
//!     io.write_str("Device: Online\n");
//!     Poll::Ready(())
//! }
//!
//! let mut shell = Shell::new();
//! shell.register(1, "status", status);
//!
//! let mut uart = Uart;
//! loop {
//!     shell.tick(&mut uart);
//!     // run the rest of the device's tasks
//! }
//! ```

mod builtins;
pub mod io;
pub mod readline;
pub mod registry;

/// Command shell interface for embedded systems.
///
/// Prompt, non-blocking line input, dispatch to registered commands and builtins,
/// and the nested editor.
pub mod shell;
pub mod tokenizer;
