//! # tasksh - non-blocking console shell and line editor
//!
//! An interactive command shell and a line-oriented text editor for severely
//! memory-constrained devices, driven over a character stream (usually a serial
//! console) and a small file store. Nothing in the crate ever blocks waiting for
//! input: every long-running piece is a resumable task that returns
//! [`Poll::Pending`](core::task::Poll::Pending) when it would have to wait, so the
//! rest of the firmware keeps running on the same thread.
//!
//! ## Features
//!
//! ### Shell
//! - Non-blocking line input with backspace and CR/LF handling
//! - Quoting-aware tokenizer
//! - Fixed-capacity registry of user command tasks
//! - File builtins (`ls`, `cat`, `cp`, `mv`, `rm`, ...) over any [`storage::FileStore`]
//! - `get`/`put`/`reflash` over HTTP through [`network::transfer`]
//!
//! ### Editor
//! - `ed`-style commands with line ranges, search and substitute
//! - Paste buffer and single-level undo
//! - Dot-terminated text entry
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tasksh = "0.1.0"
//! ```
//!
//! ### Basic Shell Example
//!
//! ```rust,no_run
//! use tasksh::config::Config;
//! use tasksh::storage::ram::RamFs;
//! use tasksh::system::shell::Shell;
//! # use tasksh::system::io::CharStream;
//! # struct Uart;
//! # impl CharStream for Uart {
//! #     fn try_read_byte(&mut self) -> Option<u8> { None }
//! #     fn write_bytes(&mut self, _bytes: &[u8]) {}
//! # }
//!
//! let mut shell = Shell::new()
//!     .with_config(Config::default())
//!     .with_store(RamFs::new());
//! shell.set_reboot_function(|| { /* reset the MCU */ });
//!
//! let mut uart = Uart;
//! loop {
//!     shell.tick(&mut uart);
//! }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers with a global allocator (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices and host test builds
//!
//! ## Optional Features
//!
//! - `std`: Build against the standard library (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate alloc;

#[macro_use]
mod fmt;

/// Compile-time capacities and the runtime [`Config`](config::Config).
pub mod config;

/// The line editor entered with `ed`.
pub mod editor;

/// Network abstraction layer and the HTTP transfer collaborator.
///
/// Provides the connection traits boards implement plus the `get`/`put`/`reflash`
/// operations built on them.
pub mod network;

/// Firmware image updates fed by `reflash`.
pub mod ota;

/// Storage abstraction layer for the shell's file builtins and the editor.
///
/// Provides a unified interface over flash file systems, plus a RAM-backed store.
pub mod storage;

/// Console utilities for embedded devices.
///
/// Contains the character stream, line input, tokenizer, command registry and the
/// shell itself.
pub mod system;
