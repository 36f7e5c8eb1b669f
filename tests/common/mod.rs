//! Shared utilities for integration tests.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use hyper::StatusCode;
use reload_verifier::config::VerifierConfig;
use reload_verifier::ReloadVerifier;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};

pub fn socket_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("nginx-config-version.sock")
}

/// Verifier for `path` with the default backoff and the given budget.
#[allow(dead_code)]
pub fn verifier(path: &Path, timeout_ms: u64) -> ReloadVerifier {
    let mut config = VerifierConfig::default();
    config.endpoint.socket_path = path.display().to_string();
    config.timeouts.reload_ms = timeout_ms;
    ReloadVerifier::from_config(&config)
}

/// Read the request head so the client never writes into a closed socket.
async fn read_request_head(socket: &mut UnixStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 512];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Start a programmable endpoint; `f` picks the status and body per request.
pub async fn start_programmable_endpoint<F, Fut>(path: &Path, f: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = UnixListener::bind(path).unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let status = StatusCode::from_u16(status).unwrap();

                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status.as_u16(),
                            status.canonical_reason().unwrap_or("Unknown"),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start an endpoint that always answers `200` with a fixed body.
#[allow(dead_code)]
pub async fn start_fixed_endpoint(path: &Path, body: &'static str) {
    start_programmable_endpoint(path, move || async move { (200, body.to_string()) }).await;
}

/// Start an endpoint that hangs up without answering.
#[allow(dead_code)]
pub async fn start_hangup_endpoint(path: &Path) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            read_request_head(&mut socket).await;
            drop(socket);
        }
    });
}
