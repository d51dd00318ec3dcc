//! Deployment constants and runtime configuration.
//!
//! Capacities are compile-time constants so the memory budget of a build is fixed.
//! Everything a device may want to change in the field lives in [`Config`], which can
//! be read from a small JSON file in the persistent store:
//!
//! ```json
//! { "host": "192.168.1.20", "port": 8080, "firmware_path": "/bin/app.bin" }
//! ```
//!
//! Missing keys keep their defaults.

use heapless::String;
use serde::Deserialize;

use crate::storage::FileStore;

/// Maximum number of arguments per command line, including the command name.
pub const MAX_TOKENS: usize = 10;

/// Maximum number of commands in the registry.
pub const MAX_COMMANDS: usize = 32;

/// Maximum length of a registered command name, in bytes.
pub const MAX_COMMAND_LEN: usize = 16;

/// Maximum length of an input line, in bytes.
pub const MAX_LINE_LEN: usize = 256;

/// Maximum length of host names and remote paths held in [`Config`].
pub const MAX_CONFIG_STR: usize = 64;

/// Largest configuration file accepted by [`Config::load`].
pub const MAX_CONFIG_FILE: usize = 512;

/// Errors raised while loading a configuration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The configuration file could not be read.
    Unreadable,
    /// The file is larger than [`MAX_CONFIG_FILE`].
    TooLarge,
    /// The contents are not valid JSON for [`Config`].
    Malformed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Unreadable => defmt::write!(f, "Unreadable"),
            Error::TooLarge => defmt::write!(f, "TooLarge"),
            Error::Malformed => defmt::write!(f, "Malformed"),
        }
    }
}

/// Runtime settings for the shell and its transfer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Echo typed characters back to the console.
    pub echo: bool,
    /// Transfer server host name or address.
    pub host: String<MAX_CONFIG_STR>,
    /// Transfer server TCP port.
    pub port: u16,
    /// Server path that accepts `put` uploads.
    pub upload_path: String<MAX_CONFIG_STR>,
    /// Image fetched by `reflash` when no file is named.
    pub firmware_path: String<MAX_CONFIG_STR>,
    /// How many times a transfer retries the connection before giving up.
    pub connect_retries: u8,
}

impl Default for Config {
    fn default() -> Self {
        let mut upload_path = String::new();
        let _ = upload_path.push_str("/upload");
        let mut firmware_path = String::new();
        let _ = firmware_path.push_str("/firmware.bin");

        Self {
            echo: true,
            host: String::new(),
            port: 80,
            upload_path,
            firmware_path,
            connect_retries: 20,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tasksh::config::Config;
    ///
    /// let config = Config::from_json(r#"{"host":"10.0.0.2","echo":false}"#).unwrap();
    /// assert_eq!(config.host, "10.0.0.2");
    /// assert!(!config.echo);
    /// assert_eq!(config.port, 80);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json_core::from_str::<Config>(text)
            .map(|(config, _)| config)
            .map_err(|_| Error::Malformed)
    }

    /// Read and parse a configuration file from `store`.
    pub fn load<F: FileStore>(store: &mut F, path: &str) -> Result<Self, Error> {
        let mut handle = store
            .open_read(&crate::storage::absolute(path))
            .map_err(|_| Error::Unreadable)?;

        let mut bytes: heapless::Vec<u8, MAX_CONFIG_FILE> = heapless::Vec::new();
        let mut overflow = false;
        while let Some(byte) = store.read_byte(&mut handle) {
            if bytes.push(byte).is_err() {
                overflow = true;
                break;
            }
        }
        store.close(handle);

        if overflow {
            return Err(Error::TooLarge);
        }
        let text = core::str::from_utf8(&bytes).map_err(|_| Error::Malformed)?;
        Self::from_json(text)
    }
}
