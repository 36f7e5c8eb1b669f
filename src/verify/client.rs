//! Client for the proxy's private config version endpoint.

use std::future::Future;
use std::path::{Path, PathBuf};

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{header, Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;

use crate::verify::error::QueryError;
use crate::version::ConfigVersion;

/// Path served by the version endpoint block.
pub const CONFIG_VERSION_PATH: &str = "/configVersion";

/// Host header sent over the socket; nginx ignores it for unix listeners.
const CONFIG_VERSION_HOST: &str = "config-version";

/// Anything that can report the configuration version the proxy is serving.
pub trait VersionSource: Send + Sync {
    /// Issue exactly one query. Implementations must not retry.
    fn current_version(&self) -> impl Future<Output = Result<ConfigVersion, QueryError>> + Send;
}

/// HTTP/1.1 client bound to the version endpoint's unix socket.
#[derive(Debug, Clone)]
pub struct VersionClient {
    socket_path: PathBuf,
}

impl VersionClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Get the version number the running proxy has in its config.
    pub async fn get_config_version(&self) -> Result<ConfigVersion, QueryError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| QueryError::Connect {
                path: self.socket_path.clone(),
                source,
            })?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "Config version connection closed with error");
            }
        });

        let request = Request::builder()
            .method(Method::GET)
            .uri(CONFIG_VERSION_PATH)
            .header(header::HOST, CONFIG_VERSION_HOST)
            .body(Empty::<Bytes>::new())?;

        let response = sender.send_request(request).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(QueryError::Status(status));
        }

        let body = response.into_body().collect().await?.to_bytes();
        parse_version(&body)
    }
}

impl VersionSource for VersionClient {
    fn current_version(&self) -> impl Future<Output = Result<ConfigVersion, QueryError>> + Send {
        self.get_config_version()
    }
}

/// Parse a response body holding a bare decimal version.
pub(crate) fn parse_version(body: &[u8]) -> Result<ConfigVersion, QueryError> {
    let text = String::from_utf8_lossy(body);
    text.parse::<ConfigVersion>()
        .map_err(|source| QueryError::MalformedBody {
            body: text.into_owned(),
            source,
        })
}
