use tracing::{error, info, warn};

use super::staging::StagingDir;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::{self, GameLayout};
use crate::core::store::{InstallType, InstalledVersion, StoreHandle, VersionSidecar};
use crate::core::version::ManifestFetcher;

/// Installs one version: resolve, stream the client jar, write the sidecar,
/// then record it in the store.
///
/// Resolution and download run without holding the store lock; only the
/// final move-into-place and append are serialized.
pub struct VersionInstaller {
    fetcher: ManifestFetcher,
    downloader: Downloader,
    layout: GameLayout,
    store: StoreHandle,
}

impl VersionInstaller {
    pub fn new(
        fetcher: ManifestFetcher,
        downloader: Downloader,
        layout: GameLayout,
        store: StoreHandle,
    ) -> Self {
        Self {
            fetcher,
            downloader,
            layout,
            store,
        }
    }

    pub fn fetcher(&self) -> &ManifestFetcher {
        &self.fetcher
    }

    /// Install `version_id`. Fails with `VersionAlreadyInstalled` if the store
    /// already has it; nothing is retried.
    pub async fn install(
        &self,
        version_id: &str,
        install_type: InstallType,
        display_name: &str,
    ) -> LauncherResult<InstalledVersion> {
        layout::validate_version_name(version_id)?;
        self.ensure_not_installed(version_id).await?;

        info!("Installing {} ({})", version_id, install_type);

        // 1. Resolve the client artifact
        let client = self.fetcher.resolve_client(version_id).await?;

        // 2. Stream it into a staging directory
        let staging = StagingDir::create(&self.layout.versions_dir(), version_id).await?;
        let jar_path = staging.path().join(layout::client_jar_file_name(version_id));
        self.downloader
            .download_file(&client.url, &jar_path, client.sha1.as_deref(), client.size)
            .await?;

        // 3. Sidecar metadata next to the jar
        let record = InstalledVersion::new(version_id, install_type, display_name);
        let sidecar_path = staging.path().join(layout::sidecar_file_name());
        let sidecar = serde_json::to_string_pretty(&VersionSidecar::from(&record))?;
        tokio::fs::write(&sidecar_path, sidecar)
            .await
            .map_err(|e| LauncherError::io(&sidecar_path, e))?;

        // 4. Move into place and record, under the store lock
        let mut store = self.store.lock().await;
        if store.contains_version(version_id) {
            return Err(LauncherError::VersionAlreadyInstalled(version_id.to_string()));
        }

        let version_dir = self.layout.version_dir(version_id)?;
        staging.commit(&version_dir).await?;

        if let Err(e) = store.add_version(record.clone()).await {
            error!("Recording {} failed, removing its files: {}", version_id, e);
            if let Err(cleanup) = tokio::fs::remove_dir_all(&version_dir).await {
                warn!("Failed to remove {:?}: {}", version_dir, cleanup);
            }
            return Err(e);
        }

        info!("Installed {} as {}", version_id, record.label());
        Ok(record)
    }

    async fn ensure_not_installed(&self, version_id: &str) -> LauncherResult<()> {
        if self.store.lock().await.contains_version(version_id) {
            return Err(LauncherError::VersionAlreadyInstalled(version_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::core::http::fake::{FakeRemote, FakeResponse};
    use crate::core::store::InstallationStore;

    const MANIFEST: &str = "https://meta.test/manifest.json";

    fn remote_with_jar(jar: FakeResponse) -> FakeRemote {
        remote_with_client(json!({"url": "jar"}), jar)
    }

    fn remote_with_client(client: serde_json::Value, jar: FakeResponse) -> FakeRemote {
        FakeRemote::new()
            .with_json(
                MANIFEST,
                json!({"versions": [{"id": "1.20.1", "type": "release", "url": "detail"}]}),
            )
            .with_json("detail", json!({"downloads": {"client": client}}))
            .with_response("jar", jar)
    }

    fn leftover_entries(data_dir: &Path) -> Vec<String> {
        let versions_dir = GameLayout::new(data_dir).versions_dir();
        match std::fs::read_dir(versions_dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    async fn installer(data_dir: &Path, remote: FakeRemote) -> (VersionInstaller, StoreHandle) {
        let remote = Arc::new(remote);
        let store = InstallationStore::load(data_dir.join("versions.json"))
            .await
            .into_handle();
        let installer = VersionInstaller::new(
            ManifestFetcher::new(remote.clone(), MANIFEST),
            Downloader::new(remote, Duration::from_secs(5)),
            GameLayout::new(data_dir),
            store.clone(),
        );
        (installer, store)
    }

    #[tokio::test]
    async fn install_writes_jar_sidecar_and_store_entry() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) =
            installer(dir.path(), remote_with_jar(FakeResponse::Body(b"jar-bytes".to_vec()))).await;

        let installed = installer
            .install("1.20.1", InstallType::Fabric, "Fabric Survival")
            .await
            .unwrap();
        assert_eq!(installed.display_name, "Fabric Survival");

        let layout = GameLayout::new(dir.path());
        assert_eq!(std::fs::read(layout.client_jar("1.20.1").unwrap()).unwrap(), b"jar-bytes");

        let sidecar: VersionSidecar = serde_json::from_str(
            &std::fs::read_to_string(layout.version_dir("1.20.1").unwrap().join("version.json"))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(sidecar, VersionSidecar::from(&installed));

        let store = store.lock().await;
        assert_eq!(store.versions().iter().filter(|v| v.name == "1.20.1").count(), 1);

        let reloaded = InstallationStore::load(dir.path().join("versions.json")).await;
        assert_eq!(reloaded.versions(), store.versions());
    }

    #[tokio::test]
    async fn second_install_of_same_version_fails_and_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) =
            installer(dir.path(), remote_with_jar(FakeResponse::Body(b"jar".to_vec()))).await;

        installer.install("1.20.1", InstallType::Original, "first").await.unwrap();
        let err = installer
            .install("1.20.1", InstallType::Forge, "second")
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::VersionAlreadyInstalled(_)));
        let store = store.lock().await;
        assert_eq!(store.versions().len(), 1);
        assert_eq!(store.versions()[0].display_name, "first");
    }

    #[tokio::test]
    async fn interrupted_download_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) = installer(
            dir.path(),
            remote_with_jar(FakeResponse::Broken(vec![b"half".to_vec()])),
        )
        .await;

        let err = installer
            .install("1.20.1", InstallType::Original, "")
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert!(store.lock().await.versions().is_empty());
        let versions_dir = GameLayout::new(dir.path()).versions_dir();
        assert_eq!(std::fs::read_dir(versions_dir).unwrap().count(), 0);
        assert!(!dir.path().join("versions.json").exists());
    }

    #[tokio::test]
    async fn body_shorter_than_published_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) = installer(
            dir.path(),
            remote_with_client(
                json!({"url": "jar", "size": 999_999}),
                FakeResponse::Body(b"abc".to_vec()),
            ),
        )
        .await;

        let err = installer
            .install("1.20.1", InstallType::Original, "")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LauncherError::TruncatedDownload { expected: 999_999, actual: 3, .. }
        ));
        assert!(store.lock().await.versions().is_empty());
        assert!(leftover_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn concurrent_installs_of_same_version_record_it_once() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) =
            installer(dir.path(), remote_with_jar(FakeResponse::Body(b"jar-bytes".to_vec()))).await;

        let (first, second) = tokio::join!(
            installer.install("1.20.1", InstallType::Original, "first"),
            installer.install("1.20.1", InstallType::Fabric, "second"),
        );

        let (won, lost) = match (first, second) {
            (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
            (first, second) => panic!("expected one success, got {first:?} and {second:?}"),
        };
        assert!(matches!(lost, LauncherError::VersionAlreadyInstalled(_)));

        let store = store.lock().await;
        assert_eq!(store.versions().len(), 1);
        assert_eq!(store.versions()[0], won);

        assert_eq!(leftover_entries(dir.path()), vec!["1.20.1".to_string()]);
        let jar = GameLayout::new(dir.path()).client_jar("1.20.1").unwrap();
        assert_eq!(std::fs::read(jar).unwrap(), b"jar-bytes");
    }

    #[tokio::test]
    async fn unknown_version_fails_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) =
            installer(dir.path(), remote_with_jar(FakeResponse::Body(b"jar".to_vec()))).await;

        let err = installer
            .install("1.0.0-missing", InstallType::Original, "")
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::VersionNotFound(_)));
        assert!(store.lock().await.versions().is_empty());
        assert!(!GameLayout::new(dir.path()).versions_dir().exists());
    }

    #[tokio::test]
    async fn download_status_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) =
            installer(dir.path(), remote_with_jar(FakeResponse::Status(502))).await;

        let err = installer
            .install("1.20.1", InstallType::Original, "")
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert!(store.lock().await.versions().is_empty());
    }

    #[tokio::test]
    async fn failed_store_write_removes_installed_files() {
        let dir = tempfile::tempdir().unwrap();
        let (installer, store) =
            installer(dir.path(), remote_with_jar(FakeResponse::Body(b"jar".to_vec()))).await;
        // Occupy the store path with a non-empty directory so the save fails.
        std::fs::create_dir(dir.path().join("versions.json")).unwrap();
        std::fs::write(dir.path().join("versions.json").join("x"), "x").unwrap();

        assert!(installer.install("1.20.1", InstallType::Original, "").await.is_err());
        assert!(store.lock().await.versions().is_empty());
        assert!(!GameLayout::new(dir.path()).version_dir("1.20.1").unwrap().exists());
    }
}
