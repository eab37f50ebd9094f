//! Static file server.
//!
//! Serves a directory over plain HTTP/1.1, one connection at a time, until the
//! process is killed. Only `GET` and `HEAD` are supported; every response
//! closes the connection.
//!
//! ## Path Mapping
//!
//! ```text
//! /                    → <root>/index.html
//! /images/a.png?v=2    → <root>/images/a.png
//! /docs/               → <root>/docs/index.html
//! /%D0%B2.png          → <root>/в.png
//! /../secret           → 403
//! ```
//!
//! [`respond`] is the pure request-to-response mapping; [`Server`] only adds
//! socket plumbing and request logging around it.
//!
//! ## Request Head Limits
//!
//! The request line and headers must arrive within [`HEAD_TIMEOUT`] in total
//! and fit in [`MAX_HEAD_BYTES`]. A head that is too large or whose request
//! line is not UTF-8 gets `400`; a client that misses the deadline is dropped.

use crate::output;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Largest request head (request line plus headers) the server reads.
pub const MAX_HEAD_BYTES: u64 = 8 * 1024;

/// Time a client has to deliver its whole request head.
pub const HEAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Cannot bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    NotImplemented,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::NotImplemented => 501,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::NotImplemented => "Not Implemented",
        }
    }
}

#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub content_type: &'static str,
    /// Length of the entity; equals `body.len()` except for `HEAD`.
    pub content_length: usize,
    pub body: Vec<u8>,
}

impl Response {
    fn file(body: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            status: Status::Ok,
            content_type,
            content_length: body.len(),
            body,
        }
    }

    fn error(status: Status) -> Self {
        let body = format!("{} {}", status.code(), status.reason()).into_bytes();
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            content_length: body.len(),
            body,
        }
    }

    fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }

    fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let header = format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.content_length,
        );
        out.write_all(header.as_bytes())?;
        out.write_all(&self.body)?;
        out.flush()
    }
}

/// A bound listener plus the directory it serves.
pub struct Server {
    listener: TcpListener,
    root: PathBuf,
    head_timeout: Duration,
}

impl Server {
    pub fn bind(addr: &str, root: impl Into<PathBuf>) -> Result<Self, ServeError> {
        let listener = TcpListener::bind(addr).map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self {
            listener,
            root: root.into(),
            head_timeout: HEAD_TIMEOUT,
        })
    }

    /// Replace the [`HEAD_TIMEOUT`] deadline.
    pub fn with_head_timeout(mut self, head_timeout: Duration) -> Self {
        self.head_timeout = head_timeout;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Accept and answer connections forever.
    ///
    /// Returns only if the listener itself fails. Errors on an individual
    /// connection are logged and the loop moves on.
    pub fn serve_forever(self) -> Result<(), ServeError> {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) if is_transient(&e) => continue,
                Err(e) => return Err(e.into()),
            };
            if let Err(e) = self.handle(stream) {
                output::print_connection_error(&e);
            }
        }
        Ok(())
    }

    fn handle(&self, stream: TcpStream) -> io::Result<()> {
        let peer = stream.peer_addr()?;
        let reader = BufReader::new(DeadlineReader {
            stream: &stream,
            deadline: Instant::now() + self.head_timeout,
        });

        let (request_line, response) = match read_head(reader)? {
            RequestHead::Empty => return Ok(()),
            RequestHead::Line(line) => {
                let response = respond(&line, &self.root);
                (line, response)
            }
            RequestHead::Malformed(line) => (line, Response::error(Status::BadRequest)),
        };
        output::print_request(peer, &request_line, response.status.code());
        response.write_to(&mut &stream)
    }
}

/// Reads from a socket, failing once `deadline` has passed no matter how the
/// bytes are spread across individual reads.
struct DeadlineReader<'a> {
    stream: &'a TcpStream,
    deadline: Instant,
}

impl Read for DeadlineReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "request head not received in time",
            ));
        }
        self.stream.set_read_timeout(Some(remaining))?;
        self.stream.read(buf)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum RequestHead {
    /// The client closed the connection without sending anything.
    Empty,
    /// A UTF-8 request line, headers drained.
    Line(String),
    /// Not UTF-8, or larger than [`MAX_HEAD_BYTES`]. Carries a lossy copy
    /// of the request line for the log.
    Malformed(String),
}

/// Read the request line and drain the headers; nothing in them changes the
/// response.
fn read_head(reader: impl BufRead) -> io::Result<RequestHead> {
    let mut head = reader.take(MAX_HEAD_BYTES);

    let mut line = Vec::new();
    if head.read_until(b'\n', &mut line)? == 0 {
        return Ok(RequestHead::Empty);
    }

    let mut blank_line_seen = false;
    if line.ends_with(b"\n") {
        let mut header = Vec::new();
        loop {
            header.clear();
            if head.read_until(b'\n', &mut header)? == 0 {
                break;
            }
            if header.trim_ascii().is_empty() {
                blank_line_seen = true;
                break;
            }
        }
    }
    let oversized = head.limit() == 0 && !blank_line_seen;

    let request_line = String::from_utf8_lossy(&line).trim_end().to_string();
    if oversized || std::str::from_utf8(&line).is_err() {
        Ok(RequestHead::Malformed(request_line))
    } else {
        Ok(RequestHead::Line(request_line))
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// Map a raw request line to a response.
pub fn respond(request_line: &str, root: &Path) -> Response {
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let (method, target) = match parts.as_slice() {
        [method, target, version] if version.starts_with("HTTP/") => (*method, *target),
        _ => return Response::error(Status::BadRequest),
    };

    let head = match method {
        "GET" => false,
        "HEAD" => true,
        _ => return Response::error(Status::NotImplemented),
    };

    let response = match resolve_path(root, target) {
        Ok(path) => match std::fs::read(&path) {
            Ok(body) => Response::file(body, content_type(&path)),
            Err(_) => Response::error(Status::NotFound),
        },
        Err(status) => Response::error(status),
    };

    if head { response.without_body() } else { response }
}

/// Resolve a request target to a file under `root`.
///
/// Directories resolve to their `index.html`.
pub fn resolve_path(root: &Path, target: &str) -> Result<PathBuf, Status> {
    let path = target.split(['?', '#']).next().unwrap_or("");
    if !path.starts_with('/') {
        return Err(Status::BadRequest);
    }
    let decoded = urlencoding::decode(path).map_err(|_| Status::BadRequest)?;

    let mut resolved = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Status::Forbidden);
            }
        }
    }

    if resolved.is_dir() {
        resolved.push("index.html");
    }
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(Status::NotFound)
    }
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
