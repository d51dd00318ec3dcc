//! Minimal HTTP/1.1 client that streams bodies.
//!
//! Firmware images and files do not fit in RAM, so unlike a buffered request/response
//! client this one sends the request head, lets the caller stream the body, then parses
//! only the response head and hands the body out in caller-sized chunks.
//!
//! ```rust,no_run
//! use tasksh::network::http::{Client, Method};
//! # use tasksh::network::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl tasksh::network::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl tasksh::network::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl tasksh::network::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let mut client = Client::new(MockConnection);
//! client.send_head(Method::Get, "10.0.0.2", "/notes.txt", &[], None)?;
//! let head = client.read_head()?;
//! let mut chunk = [0u8; 256];
//! while client.read_body(&mut chunk)? > 0 {}
//! # Ok::<(), tasksh::network::error::Error>(())
//! ```

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::network::Connection;
use crate::network::error::Error;

const MAX_REQUEST_HEAD: usize = 512;
const MAX_RESPONSE_HEAD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Status line and framing of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    pub status_code: u16,
    pub content_length: Option<usize>,
}

#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
    /// Body bytes that arrived in the same reads as the response head.
    pending: Vec<u8, MAX_RESPONSE_HEAD>,
    consumed: usize,
}

impl<C: Connection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            pending: Vec::new(),
            consumed: 0,
        }
    }

    /// Give the connection back, e.g. to close it.
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Send the request line and headers.
    ///
    /// With `content_length` set, the caller must follow up with exactly that many
    /// bytes through [`send_body`](Self::send_body).
    pub fn send_head(
        &mut self,
        method: Method,
        host: &str,
        path: &str,
        headers: &[(&str, &str)],
        content_length: Option<usize>,
    ) -> Result<(), Error> {
        let mut head: String<MAX_REQUEST_HEAD> = String::new();
        write!(head, "{} {} HTTP/1.1\r\nHost: {}\r\n", method.as_str(), path, host)
            .map_err(|_| Error::WriteError)?;
        for (name, value) in headers {
            write!(head, "{}: {}\r\n", name, value).map_err(|_| Error::WriteError)?;
        }
        if let Some(len) = content_length {
            write!(head, "Content-Length: {}\r\n", len).map_err(|_| Error::WriteError)?;
        }
        head.push_str("Connection: close\r\n\r\n")
            .map_err(|_| Error::WriteError)?;

        trace!("http {} {}", method.as_str(), path);
        self.send_body(head.as_bytes())
    }

    /// Write request body bytes.
    pub fn send_body(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        while !bytes.is_empty() {
            match self.connection.write(bytes) {
                Ok(0) | Err(_) => return Err(Error::WriteError),
                Ok(n) => bytes = &bytes[n..],
            }
        }
        self.connection.flush().map_err(|_| Error::WriteError)
    }

    /// Read and parse the response head.
    pub fn read_head(&mut self) -> Result<Head, Error> {
        let mut buf = [0u8; MAX_RESPONSE_HEAD];
        let mut total_read = 0;
        let head_end = loop {
            if let Some(pos) = find_slice(&buf[..total_read], b"\r\n\r\n") {
                break pos;
            }
            if total_read == buf.len() {
                return Err(Error::ProtocolError);
            }
            match self.connection.read(&mut buf[total_read..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => total_read += n,
                Err(_) => return Err(Error::ReadError),
            }
        };

        let header_str =
            core::str::from_utf8(&buf[..head_end]).map_err(|_| Error::ProtocolError)?;
        let mut lines = header_str.split("\r\n");

        let status_line = lines.next().ok_or(Error::ProtocolError)?;
        let mut status_parts = status_line.splitn(3, ' ');
        status_parts.next(); // Skip HTTP version
        let status_code = status_parts
            .next()
            .and_then(|code| code.parse::<u16>().ok())
            .ok_or(Error::ProtocolError)?;

        let mut content_length = None;
        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case("Content-Length") {
                content_length = value.trim().parse::<usize>().ok();
            }
        }

        self.pending.clear();
        self.consumed = 0;
        self.pending
            .extend_from_slice(&buf[head_end + 4..total_read])
            .map_err(|_| Error::ProtocolError)?;

        debug!("http status {}", status_code);
        Ok(Head {
            status_code,
            content_length,
        })
    }

    /// Read the next chunk of the response body; `Ok(0)` once the peer closes.
    pub fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.consumed < self.pending.len() {
            let available = &self.pending[self.consumed..];
            let n = available.len().min(buf.len());
            buf[..n].copy_from_slice(&available[..n]);
            self.consumed += n;
            return Ok(n);
        }
        self.connection.read(buf).map_err(|_| Error::ReadError)
    }
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
