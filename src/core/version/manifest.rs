// ─── Version Manifest ───
// Fetches the Mojang version manifest and resolves version ids to client downloads.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RemoteSource;

use super::version_file::{ClientDownload, VersionJson};

pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    /// Detail document for this version.
    pub url: String,
    #[serde(rename = "type", default)]
    pub version_type: Option<String>,
    #[serde(rename = "releaseTime", default)]
    pub release_time: Option<String>,
}

impl VersionManifest {
    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Stable releases only.
    pub fn releases(&self) -> Vec<&VersionEntry> {
        self.versions
            .iter()
            .filter(|v| v.version_type.as_deref() == Some("release"))
            .collect()
    }
}

/// Reads the remote manifest. Holds no local state, so every call is
/// safe to retry.
pub struct ManifestFetcher {
    source: Arc<dyn RemoteSource>,
    manifest_url: String,
}

impl ManifestFetcher {
    pub fn new(source: Arc<dyn RemoteSource>, manifest_url: impl Into<String>) -> Self {
        Self {
            source,
            manifest_url: manifest_url.into(),
        }
    }

    pub async fn fetch_manifest(&self) -> LauncherResult<VersionManifest> {
        info!("Fetching Minecraft version manifest...");

        let raw = self.source.get_text(&self.manifest_url).await?;
        let manifest: VersionManifest = serde_json::from_str(&raw)?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    pub async fn list_versions(&self) -> LauncherResult<Vec<VersionEntry>> {
        Ok(self.fetch_manifest().await?.versions)
    }

    /// Resolve `version_id` to its client artifact, including the checksum
    /// when the detail document publishes one.
    pub async fn resolve_client(&self, version_id: &str) -> LauncherResult<ClientDownload> {
        let manifest = self.fetch_manifest().await?;
        let entry = manifest
            .find_version(version_id)
            .ok_or_else(|| LauncherError::VersionNotFound(version_id.to_string()))?;

        debug!("Fetching version details for {} from {}", version_id, entry.url);
        let raw = self.source.get_text(&entry.url).await?;
        let version_json: VersionJson = serde_json::from_str(&raw)?;

        version_json
            .into_client_download()
            .ok_or_else(|| LauncherError::MissingClientDownload(version_id.to_string()))
    }

    pub async fn resolve_download_url(&self, version_id: &str) -> LauncherResult<String> {
        Ok(self.resolve_client(version_id).await?.url)
    }
}
