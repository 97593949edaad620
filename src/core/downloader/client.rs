use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RemoteSource;

/// Streams a remote artifact straight to disk, hashing as it goes.
pub struct Downloader {
    source: Arc<dyn RemoteSource>,
    /// Longest wait for the next chunk before giving up.
    stall_timeout: Duration,
}

impl Downloader {
    pub fn new(source: Arc<dyn RemoteSource>, stall_timeout: Duration) -> Self {
        Self {
            source,
            stall_timeout,
        }
    }

    /// Download `url` to `dest`, optionally validating SHA-1 and size.
    ///
    /// The body is never held in memory as a whole. `dest` is left behind on
    /// failure; callers download into a staging area they can discard.
    /// Without `size_expected` the response's Content-Length is checked.
    /// Returns the number of bytes written.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
        size_expected: Option<u64>,
    ) -> LauncherResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let body = self.source.get_stream(url).await?;
        let mut chunks = body.chunks;
        let mut hasher = Sha1::new();
        let mut written: u64 = 0;

        // Write inside a block so the handle is dropped before verification.
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;

            loop {
                let next = tokio::time::timeout(self.stall_timeout, chunks.next())
                    .await
                    .map_err(|_| LauncherError::DownloadStalled {
                        url: url.to_string(),
                        secs: self.stall_timeout.as_secs(),
                    })?;
                let Some(chunk) = next else { break };
                let chunk = chunk?;

                hasher.update(&chunk);
                file.write_all(&chunk)
                    .await
                    .map_err(|e| LauncherError::io(dest, e))?;
                written += chunk.len() as u64;
            }

            file.flush().await.map_err(|e| LauncherError::io(dest, e))?;
        }

        if let Some(expected) = size_expected.or(body.content_length) {
            if expected != written {
                return Err(LauncherError::TruncatedDownload {
                    url: url.to_string(),
                    expected,
                    actual: written,
                });
            }
        }

        if let Some(expected) = sha1_expected {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        info!("Downloaded {} bytes: {} -> {:?}", written, url, dest);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::stream;

    use super::*;
    use crate::core::http::fake::{FakeRemote, FakeResponse};
    use crate::core::http::RemoteBody;

    fn sha1_hex(data: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    fn downloader(remote: FakeRemote) -> Downloader {
        Downloader::new(Arc::new(remote), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn streams_body_to_file_and_verifies_hash() {
        let dir = tempfile::tempdir().unwrap();
        let body = b"pretend this is a client jar";
        let dest = dir.path().join("nested").join("client.jar");

        let written = downloader(FakeRemote::new().with_bytes("jar", body))
            .download_file("jar", &dest, Some(&sha1_hex(body)), Some(body.len() as u64))
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn hash_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");

        let err = downloader(FakeRemote::new().with_bytes("jar", b"abc"))
            .download_file("jar", &dest, Some("0000"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::Sha1Mismatch { .. }));
    }

    #[tokio::test]
    async fn non_success_status_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");

        let err = downloader(FakeRemote::new().with_response("jar", FakeResponse::Status(404)))
            .download_file("jar", &dest, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::RequestFailed { status: 404, .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn interrupted_stream_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");
        let remote = FakeRemote::new()
            .with_response("jar", FakeResponse::Broken(vec![b"part".to_vec()]));

        let err = downloader(remote)
            .download_file("jar", &dest, None, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LauncherError::TruncatedDownload { expected: 5, actual: 4, .. }
        ));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn short_body_fails_against_published_size() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");

        let err = downloader(FakeRemote::new().with_bytes("jar", b"abc"))
            .download_file("jar", &dest, None, Some(999_999))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LauncherError::TruncatedDownload { expected: 999_999, actual: 3, .. }
        ));
        assert!(err.is_network());
    }

    struct StalledRemote;

    #[async_trait::async_trait]
    impl RemoteSource for StalledRemote {
        async fn get_text(&self, _url: &str) -> LauncherResult<String> {
            unimplemented!()
        }

        async fn get_stream(&self, _url: &str) -> LauncherResult<RemoteBody> {
            Ok(RemoteBody {
                content_length: None,
                chunks: stream::pending().boxed(),
            })
        }
    }

    #[tokio::test]
    async fn stalled_stream_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");
        let downloader = Downloader::new(Arc::new(StalledRemote), Duration::from_millis(20));

        let err = downloader
            .download_file("slow", &dest, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::DownloadStalled { .. }));
        assert!(err.is_network());
    }
}
