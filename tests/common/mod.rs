//! Shared helpers for integration tests
//!
//! A minimal one-shot HTTP responder on a loopback port, so the cached
//! fetcher can be exercised end to end without touching the real services.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serves exactly one request with the given body, returning the base URL
///
/// The listener accepts a single connection, reads the request headers, and
/// answers with a 200 response. Tests prove "no network call happened" by
/// pointing a second fetch at [`refused_url`] instead.
pub fn serve_once(content_type: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    thread::spawn(move || {
        let (mut stream, _) = match listener.accept() {
            Ok(conn) => conn,
            Err(_) => return,
        };
        // Drain the request head before answering
        let mut request = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    request.extend_from_slice(&chunk[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                Err(_) => return,
            }
        }
        let header = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(header.as_bytes());
        let _ = stream.write_all(&body);
    });

    format!("http://{addr}")
}

/// Serves one request answering with a JSON body
pub fn serve_json(body: &str) -> String {
    serve_once("application/json", body.as_bytes().to_vec())
}

/// A URL that refuses connections immediately
///
/// Port 1 is reserved and closed on any sane test host; a fetch that
/// succeeds against this URL can only have been served from cache.
pub fn refused_url() -> String {
    "http://127.0.0.1:1/refused".to_string()
}
