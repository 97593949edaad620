use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

const APP_USER_AGENT: &str = concat!("CraftLaunch/", env!("CARGO_PKG_VERSION"));

/// Chunks of a streamed response body.
pub type ByteStream = BoxStream<'static, LauncherResult<Vec<u8>>>;

/// An opened response whose body has not been read yet.
pub struct RemoteBody {
    pub content_length: Option<u64>,
    pub chunks: ByteStream,
}

/// Everything the core needs from the network.
///
/// Implementations must map a non-success status to
/// [`LauncherError::RequestFailed`] before any body is consumed.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// GET `url` and return the whole body as text.
    async fn get_text(&self, url: &str) -> LauncherResult<String>;

    /// GET `url` and hand back the body as a chunk stream.
    async fn get_stream(&self, url: &str) -> LauncherResult<RemoteBody>;
}

pub fn build_http_client(connect_timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .connect_timeout(connect_timeout)
        .build()
}

/// [`RemoteSource`] backed by reqwest.
///
/// Text requests are bounded by `request_timeout`. Streams are not, since a
/// client jar can take minutes on a slow link; the downloader applies its own
/// per-chunk stall timeout instead.
pub struct HttpRemote {
    client: Client,
    request_timeout: Duration,
}

impl HttpRemote {
    pub fn new(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    async fn send(&self, url: &str, timeout: Option<Duration>) -> LauncherResult<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(LauncherError::RequestFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn get_text(&self, url: &str) -> LauncherResult<String> {
        let response = self.send(url, Some(self.request_timeout)).await?;
        Ok(response.text().await?)
    }

    async fn get_stream(&self, url: &str) -> LauncherResult<RemoteBody> {
        let response = self.send(url, None).await?;
        let content_length = response.content_length();
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(LauncherError::from))
            .boxed();

        Ok(RemoteBody {
            content_length,
            chunks,
        })
    }
}
