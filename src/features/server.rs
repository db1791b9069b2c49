use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread;

use percent_encoding::percent_decode_str;
use thiserror::Error;

const NEWLINE: &str = "\r\n";
const INDEX_FILE: &str = "index.html";
const HEADERS_LIMIT: usize = 8192;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Cannot bind {address} - {source}")]
    Bind { address: String, source: io::Error },

    #[error("Connection failed - {0}")]
    Io(#[from] io::Error),
}

type ServerResult<T> = anyhow::Result<T, ServerError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

/// `Content-Type` for a file, by extension.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn new(status: Status, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    fn text(status: Status, body: impl Into<String>) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Status line, headers and, unless `head_only`, the body.
    pub fn construct(&self, head_only: bool) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 {}{NEWLINE}Content-Type: {}{NEWLINE}Content-Length: {}{NEWLINE}Connection: close{NEWLINE}{NEWLINE}",
            self.status,
            self.content_type,
            self.body.len()
        )
        .into_bytes();

        if !head_only {
            response.extend_from_slice(&self.body);
        }

        response
    }
}

/// Maps a request path onto a file under `root`. `None` when the path tries to
/// leave the root.
fn resolve(root: &Path, location: &str) -> Option<PathBuf> {
    let relative = Path::new(location.trim_start_matches('/'));
    let mut path = root.to_path_buf();

    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if path.is_dir() {
        path.push(INDEX_FILE);
    }

    Some(path)
}

/// Answers one request against the files under `root`.
pub fn respond(root: &Path, method: &str, target: &str) -> Response {
    let location = target.split('?').next().unwrap_or("/");

    if Method::parse(method).is_none() {
        return Response::text(Status::NotFound, format!("Cannot {method} {location}"));
    }

    // Traversal is checked on the decoded path so `%2e%2e` is caught too.
    let decoded = match percent_decode_str(location).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => return Response::text(Status::BadRequest, Status::BadRequest.message()),
    };

    let path = if decoded == "/" {
        root.join(INDEX_FILE)
    } else {
        match resolve(root, &decoded) {
            Some(path) => path,
            None => return Response::text(Status::Forbidden, Status::Forbidden.message()),
        }
    };

    match fs::read(&path) {
        Ok(body) => Response::new(Status::Ok, content_type(&path), body),
        Err(e) => {
            debug!("{} unavailable: {e}", path.display());
            Response::text(Status::NotFound, format!("Cannot {method} {location}"))
        }
    }
}

/// Reads the request line and skips the headers. `None` for anything that is
/// not `METHOD TARGET VERSION`.
fn read_request(reader: &mut impl BufRead) -> io::Result<Option<(String, String)>> {
    let line = read_line_within(reader, HEADERS_LIMIT)?;
    let request = String::from_utf8(line).ok().and_then(|line| parse_request_line(&line));

    let mut read = 0;
    loop {
        let header = read_line_within(reader, HEADERS_LIMIT)?;
        read += header.len();
        if header.is_empty() || header == b"\r\n" || header == b"\n" || read > HEADERS_LIMIT {
            break;
        }
    }

    Ok(request)
}

/// One line as raw bytes, cut off after `limit` bytes.
fn read_line_within(reader: &mut impl BufRead, limit: usize) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    reader.by_ref().take(limit as u64).read_until(b'\n', &mut line)?;
    Ok(line)
}

fn parse_request_line(line: &str) -> Option<(String, String)> {
    let mut parts = line.trim_end().split(' ');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None)
            if !method.is_empty() && target.starts_with('/') && version.starts_with("HTTP/") =>
        {
            Some((method.to_string(), target.to_string()))
        }
        _ => None,
    }
}

fn handle_connection(root: &Path, stream: TcpStream) -> ServerResult<()> {
    let peer = stream.peer_addr()?;
    let mut reader = BufReader::new(&stream);

    let (response, head_only) = match read_request(&mut reader)? {
        Some((method, target)) => {
            let response = respond(root, &method, &target);
            info!("{peer} {method} {target} {}", response.status.code());
            (response, Method::parse(&method) == Some(Method::Head))
        }
        None => {
            warn!("{peer} sent a malformed request line");
            (Response::text(Status::BadRequest, Status::BadRequest.message()), false)
        }
    };

    let mut stream = &stream;
    stream.write_all(&response.construct(head_only))?;
    stream.flush()?;
    Ok(())
}

/// Serves the files under a root directory, one thread per connection.
pub struct StaticServer {
    listener: TcpListener,
    root: Arc<PathBuf>,
}

impl StaticServer {
    pub fn bind(address: impl ToSocketAddrs + Display, root: impl Into<PathBuf>) -> ServerResult<Self> {
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;

        Ok(Self {
            listener,
            root: Arc::new(root.into()),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the listener fails.
    pub fn serve(self) -> ServerResult<()> {
        info!("Server is running on http://{}", self.local_addr()?);

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("accept failed: {e}");
                    continue;
                }
            };

            let root = Arc::clone(&self.root);
            thread::spawn(move || {
                if let Err(e) = handle_connection(&root, stream) {
                    warn!("{e}");
                }
            });
        }

        Ok(())
    }
}
