//! Minimal one-connection-per-response HTTP server for provider tests

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// Serve `responses` (status, JSON body) to consecutive connections
///
/// Returns the base URL and a handle yielding the request bodies received.
pub(crate) fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));

    let handle = std::thread::spawn(move || {
        let mut bodies = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().expect("accept");
            bodies.push(read_request_body(&mut stream));

            let reply = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).expect("write reply");
            stream.flush().expect("flush");
        }
        bodies
    });

    (url, handle)
}

fn read_request_body(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            return String::new();
        }
        data.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut chunk).expect("read body");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&data[header_end..]).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
