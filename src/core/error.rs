use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launcher core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed: HTTP {status}")]
    RequestFailed { url: String, status: u16 },

    #[error("Download from {url} stalled: no data for {secs}s")]
    DownloadStalled { url: String, secs: u64 },

    #[error("Download from {url} incomplete: expected {expected} bytes, got {actual}")]
    TruncatedDownload {
        url: String,
        expected: u64,
        actual: u64,
    },

    #[error("Version {0} has no client download")]
    MissingClientDownload(String),

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Versions ────────────────────────────────────────
    #[error("Version not found in manifest: {0}")]
    VersionNotFound(String),

    #[error("Version not installed: {0}")]
    VersionNotInstalled(String),

    #[error("Version already installed: {0}")]
    VersionAlreadyInstalled(String),

    #[error("Invalid version name: {0:?}")]
    InvalidVersionName(String),

    // ── Accounts ────────────────────────────────────────
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Invalid account name: {0:?}")]
    InvalidAccountName(String),

    // ── Launch ──────────────────────────────────────────
    #[error("Failed to start {program:?}: {source}")]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    /// Whether the failure came from a remote call rather than local state.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            LauncherError::Http(_)
                | LauncherError::RequestFailed { .. }
                | LauncherError::DownloadStalled { .. }
                | LauncherError::TruncatedDownload { .. }
                | LauncherError::MissingClientDownload(_)
                | LauncherError::Sha1Mismatch { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}
