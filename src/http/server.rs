//! Axum server answering config version queries on a unix socket.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::IntoResponse, routing::get, Router};
use tokio::net::UnixListener;
use tower_http::trace::TraceLayer;

use crate::template::{version_mismatch, EXPECTED_VERSION_HEADER};
use crate::verify::client::CONFIG_VERSION_PATH;
use crate::version::ConfigVersion;

/// Carries the `$config_version_mismatch` value for the request.
pub const MISMATCH_RESPONSE_HEADER: &str = "x-config-version-mismatch";

/// Holds the version currently "served" and answers queries for it.
///
/// Clones share the same version, so a test or operator can flip it while the
/// server runs to simulate a reload.
#[derive(Debug, Clone)]
pub struct VersionResponder {
    version: Arc<AtomicU64>,
}

impl VersionResponder {
    pub fn new(version: ConfigVersion) -> Self {
        Self {
            version: Arc::new(AtomicU64::new(version.get())),
        }
    }

    pub fn version(&self) -> ConfigVersion {
        ConfigVersion(self.version.load(Ordering::SeqCst))
    }

    /// Simulate the proxy cutting over to a new configuration.
    pub fn set_version(&self, version: ConfigVersion) {
        self.version.store(version.get(), Ordering::SeqCst);
        tracing::info!(%version, "Serving new config version");
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(CONFIG_VERSION_PATH, get(config_version))
            .with_state(self.version.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until `shutdown` completes.
    pub async fn run<F>(self, listener: UnixListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            address = ?listener.local_addr()?,
            version = %self.version(),
            "Config version endpoint starting"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Config version endpoint stopped");
        Ok(())
    }
}

async fn config_version(
    State(version): State<Arc<AtomicU64>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let current = ConfigVersion(version.load(Ordering::SeqCst));
    let expected = headers
        .get(EXPECTED_VERSION_HEADER)
        .and_then(|value| value.to_str().ok());

    (
        [(MISMATCH_RESPONSE_HEADER, version_mismatch(expected, current))],
        current.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::MISMATCH_MARKER;
    use crate::verify::client::VersionClient;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixStream;

    async fn raw_get(path: &std::path::Path, extra_header: &str) -> String {
        let mut stream = UnixStream::connect(path).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: config-version\r\n{}Connection: close\r\n\r\n",
            CONFIG_VERSION_PATH, extra_header
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response.to_ascii_lowercase()
    }

    #[tokio::test]
    async fn test_serves_and_switches_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let responder = VersionResponder::new(ConfigVersion(1));
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(responder.clone().run(listener, async move {
            let _ = stop_rx.await;
        }));

        let client = VersionClient::new(&path);
        assert_eq!(client.get_config_version().await.unwrap(), ConfigVersion(1));

        responder.set_version(ConfigVersion(2));
        assert_eq!(client.get_config_version().await.unwrap(), ConfigVersion(2));

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_reports_expected_version_header_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.sock");
        let listener = UnixListener::bind(&path).unwrap();
        tokio::spawn(VersionResponder::new(ConfigVersion(5)).run(listener, std::future::pending()));

        let matching = raw_get(&path, "X-Expected-Config-Version: 5\r\n").await;
        assert!(matching.starts_with("http/1.1 200"));
        assert!(matching.contains(&format!("{}: \r\n", MISMATCH_RESPONSE_HEADER)));

        let stale = raw_get(&path, "X-Expected-Config-Version: 4\r\n").await;
        assert!(stale.contains(&format!("{}: {}\r\n", MISMATCH_RESPONSE_HEADER, MISMATCH_MARKER)));

        let absent = raw_get(&path, "").await;
        assert!(absent.contains(&format!("{}: {}\r\n", MISMATCH_RESPONSE_HEADER, MISMATCH_MARKER)));
        assert!(absent.ends_with("\r\n\r\n5"));
    }
}
