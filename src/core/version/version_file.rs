// ─── Version File ───
// The per-version detail document. Only the client download is read.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Where to fetch a client binary and how to check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDownload {
    pub url: String,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

impl VersionJson {
    pub fn into_client_download(self) -> Option<ClientDownload> {
        let client = self.downloads?.client?;
        if client.url.trim().is_empty() {
            return None;
        }
        Some(ClientDownload {
            url: client.url,
            sha1: client.sha1,
            size: client.size,
        })
    }
}
