//! `get`, `put` and `reflash` over HTTP.
//!
//! These operations run to completion inside one shell step. They talk to a single
//! configured server and retry only the connection attempt, so a dead server costs at
//! most `connect_retries` connect calls.

use core::fmt::Write as _;

use heapless::String;

use super::http::{Client, Method};
use super::{Connect, Connection, error};
use crate::config::{Config, MAX_CONFIG_STR};
use crate::ota;
use crate::storage::{self, FileStore};

const BOUNDARY: &str = "00000--TASKSH--99999";
const CHUNK: usize = 256;

/// Errors raised by a transfer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Every connection attempt failed.
    Connect,
    /// The connection failed mid-transfer.
    Network(error::Error),
    /// The server answered with a status other than 200.
    Status(u16),
    /// A local file could not be opened, read or written.
    Storage(storage::Error),
    /// The firmware response had no usable `Content-Length`.
    MissingLength,
    /// The image sink rejected the firmware.
    Ota(ota::Error),
}

impl From<error::Error> for Error {
    fn from(err: error::Error) -> Self {
        Error::Network(err)
    }
}

impl From<storage::Error> for Error {
    fn from(err: storage::Error) -> Self {
        Error::Storage(err)
    }
}

impl From<ota::Error> for Error {
    fn from(err: ota::Error) -> Self {
        Error::Ota(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Connect => f.write_str("Connect failure."),
            Error::Network(err) => write!(f, "Network error: {:?}.", err),
            Error::Status(code) => write!(f, "Server replied {}.", code),
            Error::Storage(err) => write!(f, "File error: {:?}.", err),
            Error::MissingLength => f.write_str("Reply has no Content-Length."),
            Error::Ota(err) => write!(f, "Image rejected: {:?}.", err),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Connect => defmt::write!(f, "Connect"),
            Error::Network(err) => defmt::write!(f, "Network({})", err),
            Error::Status(code) => defmt::write!(f, "Status({})", code),
            Error::Storage(err) => defmt::write!(f, "Storage({})", err),
            Error::MissingLength => defmt::write!(f, "MissingLength"),
            Error::Ota(err) => defmt::write!(f, "Ota({})", err),
        }
    }
}

/// Remote file operations available to the shell.
pub trait Transfer {
    /// Fetch `remote` into the local file `local`. Returns the bytes written.
    fn get<F: FileStore>(
        &mut self,
        store: &mut F,
        remote: &str,
        local: &str,
    ) -> Result<usize, Error>;

    /// Upload the local file `local` as `remote`. Returns the bytes sent.
    fn put<F: FileStore>(
        &mut self,
        store: &mut F,
        local: &str,
        remote: &str,
    ) -> Result<usize, Error>;

    /// Fetch `remote` as a firmware image and make it the next boot image.
    fn reflash(&mut self, remote: &str) -> Result<ota::Image, Error>;
}

/// [`Transfer`] against one HTTP server, with images going to an [`ota::Updater`].
#[derive(Debug)]
pub struct HttpTransfer<K: Connect, P: ota::Platform> {
    connector: K,
    updater: ota::Updater<P>,
    host: String<MAX_CONFIG_STR>,
    port: u16,
    upload_path: String<MAX_CONFIG_STR>,
    connect_retries: u8,
}

impl<K: Connect, P: ota::Platform> HttpTransfer<K, P> {
    /// Create a transfer for the server named in `config`.
    pub fn new(connector: K, platform: P, config: &Config) -> Self {
        Self {
            connector,
            updater: ota::Updater::new(platform),
            host: config.host.clone(),
            port: config.port,
            upload_path: config.upload_path.clone(),
            connect_retries: config.connect_retries,
        }
    }

    /// The firmware updater.
    pub fn updater(&self) -> &ota::Updater<P> {
        &self.updater
    }

    /// Server host as configured.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn connect(&mut self) -> Result<Client<K::Connection>, Error> {
        let mut remote: String<{ MAX_CONFIG_STR + 6 }> = String::new();
        write!(remote, "{}:{}", self.host, self.port).map_err(|_| Error::Connect)?;

        for attempt in 0..=self.connect_retries {
            match self.connector.connect(&remote) {
                Ok(connection) => return Ok(Client::new(connection)),
                Err(_) => trace!("connect attempt {} failed", attempt),
            }
        }
        warn!("connect failure to {}", remote.as_str());
        Err(Error::Connect)
    }

    fn get_head(&mut self, remote: &str) -> Result<(Client<K::Connection>, Option<usize>), Error> {
        let mut client = self.connect()?;
        client.send_head(Method::Get, &self.host, remote, &[], None)?;
        let head = client.read_head()?;
        if head.status_code != 200 {
            close(client);
            return Err(Error::Status(head.status_code));
        }
        Ok((client, head.content_length))
    }
}

impl<K: Connect, P: ota::Platform> Transfer for HttpTransfer<K, P> {
    fn get<F: FileStore>(
        &mut self,
        store: &mut F,
        remote: &str,
        local: &str,
    ) -> Result<usize, Error> {
        let (mut client, length) = self.get_head(remote)?;
        let mut handle = match store.open_write(&storage::absolute(local)) {
            Ok(handle) => handle,
            Err(err) => {
                close(client);
                return Err(err.into());
            }
        };

        let mut chunk = [0u8; CHUNK];
        let mut total = 0;
        let result = loop {
            if length.is_some_and(|length| total >= length) {
                break Ok(total);
            }
            match client.read_body(&mut chunk) {
                Ok(0) => break Ok(total),
                Ok(n) => {
                    let n = length.map_or(n, |length| n.min(length - total));
                    if let Err(err) = store.write(&mut handle, &chunk[..n]) {
                        break Err(err.into());
                    }
                    total += n;
                }
                Err(err) => break Err(err.into()),
            }
        };
        store.close(handle);
        close(client);
        debug!("fetched {} bytes", total);
        result
    }

    fn put<F: FileStore>(
        &mut self,
        store: &mut F,
        local: &str,
        remote: &str,
    ) -> Result<usize, Error> {
        let path = storage::absolute(local);
        let size = file_size(store, &path)?;

        let mut preamble = alloc::string::String::new();
        let _ = write!(
            preamble,
            "--{b}\r\nContent-Disposition: form-data; name=\"filename\"\r\n\r\n{remote}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"contents\"; filename=\"{remote}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            remote = remote,
        );
        let mut epilogue: String<64> = String::new();
        let _ = write!(epilogue, "\r\n--{}--\r\n", BOUNDARY);

        let mut client = self.connect()?;
        let sent = upload(
            &mut client,
            store,
            &self.host,
            &self.upload_path,
            &path,
            &preamble,
            &epilogue,
            size,
        );
        close(client);
        sent
    }

    fn reflash(&mut self, remote: &str) -> Result<ota::Image, Error> {
        let (mut client, length) = self.get_head(remote)?;
        let Some(length) = length else {
            close(client);
            return Err(Error::MissingLength);
        };
        let result = stream_image(&mut client, &mut self.updater, length);
        close(client);
        result
    }
}

fn close<C: Connection>(client: Client<C>) {
    if client.into_inner().close().is_err() {
        trace!("close failed");
    }
}

#[allow(clippy::too_many_arguments)]
fn upload<C: Connection, F: FileStore>(
    client: &mut Client<C>,
    store: &mut F,
    host: &str,
    upload_path: &str,
    path: &str,
    preamble: &str,
    epilogue: &str,
    size: usize,
) -> Result<usize, Error> {
    let mut content_type: String<96> = String::new();
    let _ = write!(content_type, "multipart/form-data; boundary={}", BOUNDARY);

    client.send_head(
        Method::Post,
        host,
        upload_path,
        &[("Content-Type", content_type.as_str())],
        Some(preamble.len() + size + epilogue.len()),
    )?;
    client.send_body(preamble.as_bytes())?;
    send_file(client, store, path)?;
    client.send_body(epilogue.as_bytes())?;

    let head = client.read_head()?;
    if head.status_code != 200 {
        return Err(Error::Status(head.status_code));
    }
    Ok(size)
}

fn stream_image<C: Connection, P: ota::Platform>(
    client: &mut Client<C>,
    updater: &mut ota::Updater<P>,
    length: usize,
) -> Result<ota::Image, Error> {
    updater.begin(length)?;
    let mut chunk = [0u8; CHUNK];
    let mut total = 0;
    while total < length {
        let n = client.read_body(&mut chunk)?;
        if n == 0 {
            break;
        }
        let n = n.min(length - total);
        updater.write(&chunk[..n])?;
        total += n;
    }
    let image = updater.finish()?;
    updater.activate()?;
    Ok(image)
}

fn file_size<F: FileStore>(store: &mut F, path: &str) -> Result<usize, Error> {
    let mut size = None;
    store.list(&mut |name, len| {
        if name == path {
            size = Some(len);
        }
    })?;
    size.ok_or(Error::Storage(storage::Error::NotFound))
}

fn send_file<C: Connection, F: FileStore>(
    client: &mut Client<C>,
    store: &mut F,
    path: &str,
) -> Result<(), Error> {
    let mut handle = store.open_read(path)?;
    let mut chunk = [0u8; CHUNK];
    let result = loop {
        let mut n = 0;
        while n < CHUNK {
            match store.read_byte(&mut handle) {
                Some(byte) => {
                    chunk[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        if n == 0 {
            break Ok(());
        }
        if let Err(err) = client.send_body(&chunk[..n]) {
            break Err(err.into());
        }
    };
    store.close(handle);
    result
}
