#![allow(dead_code)]

use bijux_labeler_server::{build_router, AppState, ServerConfig};
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const BOUNDARY: &str = "----labeler-test-boundary";

pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
}

pub async fn spawn_server(config: ServerConfig) -> TestServer {
    let root = tempfile::tempdir().expect("tempdir");
    let config = ServerConfig {
        data_root: root.path().to_path_buf(),
        ..config
    };
    let state = AppState::open(config).expect("open state");
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    TestServer { addr, root }
}

pub async fn send_raw(
    method: &str,
    addr: SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> (u16, String, Vec<u8>) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request head");
    stream.write_all(body).await.expect("write request body");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("http response must have separator");
    let head = String::from_utf8_lossy(&response[..split]).to_string();
    let body = response[split + 4..].to_vec();
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head, body)
}

pub async fn send_json(
    method: &str,
    addr: SocketAddr,
    path: &str,
    body: serde_json::Value,
) -> (u16, serde_json::Value) {
    let bytes = serde_json::to_vec(&body).expect("encode body");
    let (status, _, body) = send_raw(
        method,
        addr,
        path,
        &[("Content-Type", "application/json")],
        &bytes,
    )
    .await;
    (status, parse_json(&body))
}

pub async fn get_json(addr: SocketAddr, path: &str) -> (u16, serde_json::Value) {
    let (status, _, body) = send_raw("GET", addr, path, &[], &[]).await;
    (status, parse_json(&body))
}

pub fn parse_json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).expect("json body")
}

pub fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

/// Builds a `multipart/form-data` body with a `path` field followed by one
/// `files` part per entry.
pub fn multipart_body(path: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"path\"\r\n\r\n{path}\r\n"
        )
        .as_bytes(),
    );
    for (name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn upload(
    addr: SocketAddr,
    path: &str,
    files: &[(&str, &[u8])],
) -> (u16, serde_json::Value) {
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    let body = multipart_body(path, files);
    let (status, _, body) = send_raw(
        "POST",
        addr,
        "/upload",
        &[("Content-Type", content_type.as_str())],
        &body,
    )
    .await;
    (status, parse_json(&body))
}

pub async fn seed_label(addr: SocketAddr, project: &str, label: &str) {
    let (status, _) = send_json(
        "POST",
        addr,
        "/project/create",
        serde_json::json!({"projectName": project}),
    )
    .await;
    assert!(status == 200 || status == 409, "create project: {status}");
    let (status, body) = send_json(
        "POST",
        addr,
        "/label/create",
        serde_json::json!({"projectName": project, "labelName": label}),
    )
    .await;
    assert_eq!(status, 200, "create label: {body}");
}
