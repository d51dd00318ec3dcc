//! Splits a command line into arguments.
//!
//! ```text
//! ls                                  # 1 arg:  ["ls"]
//! echoTo notes.txt "hello world"      # 3 args: ["echoTo", "notes.txt", "hello world"]
//! s "say \"hi\"" bye                  # 3 args: ["s", "say \"hi\"", "bye"]
//! path "C:\\Program Files"            # 2 args: ["path", "C:\Program Files"]
//! ```
//!
//! Inside quotes a backslash is removed and the following character kept as-is; there
//! are no `\n`-style escapes. An unterminated quote runs to the end of the line, and an
//! unquoted token keeps any `"` it contains. Malformed input never produces an error.

use alloc::string::String;

use crate::config::MAX_TOKENS;

/// Argument vector produced by [`tokenize`]. `argv[0]` is the command name.
pub type Argv = heapless::Vec<String, MAX_TOKENS>;

/// Tokenize `line` into at most [`MAX_TOKENS`] arguments.
///
/// Tokens past the capacity are dropped without error.
///
/// # Examples
///
/// ```rust
/// use tasksh::system::tokenizer::tokenize;
///
/// let argv = tokenize("  cp \"my file\" backup  ");
/// assert_eq!(argv.len(), 3);
/// assert_eq!(argv[1], "my file");
/// assert!(tokenize(" \t ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Argv {
    let mut argv = Argv::new();
    let mut chars = line.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(' ' | '\t')) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    _ => token.push(c),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ' ' || c == '\t' {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }

        if argv.push(token).is_err() {
            trace!("token capacity reached, dropping rest of line");
            break;
        }
    }

    argv
}
