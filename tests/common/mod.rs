//! Shared console double for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use tasksh::system::io::CharStream;

/// Scripted console: bytes queued with [`Console::feed`] are handed out one at a time,
/// everything written is collected.
#[derive(Default)]
pub struct Console {
    input: VecDeque<u8>,
    output: String,
}

impl Console {
    pub fn new(input: &str) -> Self {
        let mut console = Self::default();
        console.feed(input);
        console
    }

    pub fn feed(&mut self, input: &str) {
        self.input.extend(input.bytes());
    }

    /// Everything written since the last call.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn has_input(&self) -> bool {
        !self.input.is_empty()
    }
}

impl CharStream for Console {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.push_str(&String::from_utf8_lossy(bytes));
    }
}
