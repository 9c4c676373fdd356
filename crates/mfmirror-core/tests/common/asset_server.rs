//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table, one request per connection, and counts hits
//! per path so tests can assert how many requests were made.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How the server answers one path.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Bare status with a short text body.
    Status(u16),
    /// 302 to the given path on this server.
    Redirect(String),
    /// Read the request, then close without answering (transport fault).
    Drop,
}

#[derive(Clone)]
pub struct AssetServer {
    pub base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl AssetServer {
    /// Absolute URL for `path_and_query` (must start with `/`).
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    /// `127.0.0.1:<port>`, the host directory artifacts land in.
    pub fn host(&self) -> &str {
        self.base.trim_start_matches("http://")
    }

    pub fn hits(&self, path_and_query: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .get(path_and_query)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

/// Starts a server in a background thread. Unknown paths answer 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Reply)>) -> AssetServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Reply>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    AssetServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Reply>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(target) = read_request_target(&mut stream) else {
        return;
    };
    *hits.lock().unwrap().entry(target.clone()).or_insert(0) += 1;

    match routes.get(&target) {
        Some(Reply::Body(body)) => respond(&mut stream, "200 OK", &[], body),
        Some(Reply::Status(code)) => {
            let status = format!("{} Status", code);
            respond(&mut stream, &status, &[], b"error page")
        }
        Some(Reply::Redirect(to)) => {
            let location = format!("Location: {}", to);
            respond(&mut stream, "302 Found", &[&location], b"")
        }
        Some(Reply::Drop) => {}
        None => respond(&mut stream, "404 Not Found", &[], b"not found"),
    }
}

fn respond(stream: &mut TcpStream, status: &str, headers: &[&str], body: &[u8]) {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for h in headers {
        head.push_str(h);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// Reads the request head and returns the request target (path + query).
fn read_request_target(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}
