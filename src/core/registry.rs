// ─── Version / Account Registry ───
// CRUD over the installation store for the presentation layer.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::GameLayout;
use crate::core::store::{Account, InstalledVersion, StoreHandle};

/// Account used when none has been created.
pub const FALLBACK_ACCOUNT: &str = "offline_user";

#[derive(Clone)]
pub struct Registry {
    store: StoreHandle,
    layout: GameLayout,
}

impl Registry {
    pub fn new(store: StoreHandle, layout: GameLayout) -> Self {
        Self { store, layout }
    }

    pub async fn versions(&self) -> Vec<InstalledVersion> {
        self.store.lock().await.versions().to_vec()
    }

    pub async fn find_version(&self, name: &str) -> LauncherResult<InstalledVersion> {
        self.store
            .lock()
            .await
            .find_version(name)
            .cloned()
            .ok_or_else(|| LauncherError::VersionNotInstalled(name.to_string()))
    }

    pub async fn rename_version(
        &self,
        name: &str,
        display_name: &str,
    ) -> LauncherResult<InstalledVersion> {
        let renamed = self
            .store
            .lock()
            .await
            .rename_version_display(name, display_name)
            .await?;
        info!("Renamed {} to '{}'", name, renamed.display_name);
        Ok(renamed)
    }

    /// Drop the record for `name`, then its files. Unknown names are a no-op
    /// and leave the disk alone. A recorded name that is not a safe directory
    /// name only loses its record.
    pub async fn delete_version(&self, name: &str) -> LauncherResult<Option<InstalledVersion>> {
        let dir = self.layout.version_dir(name).ok();

        let mut store = self.store.lock().await;
        let Some(removed) = store.remove_version(name).await? else {
            return Ok(None);
        };

        let Some(dir) = dir else {
            warn!("Deleted record {:?} without touching files: unsafe name", name);
            return Ok(Some(removed));
        };
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(LauncherError::io(dir, e)),
        }

        info!("Deleted version {}", name);
        Ok(Some(removed))
    }

    /// Folder holding a version's files.
    pub fn version_dir(&self, name: &str) -> LauncherResult<PathBuf> {
        self.layout.version_dir(name)
    }

    pub async fn accounts(&self) -> Vec<Account> {
        self.store.lock().await.accounts().to_vec()
    }

    pub async fn create_account(&self, name: &str) -> LauncherResult<Account> {
        let account = self.store.lock().await.add_account(name).await?;
        info!("Created account '{}'", account.name);
        Ok(account)
    }

    pub async fn rename_account(&self, name: &str, new_name: &str) -> LauncherResult<Account> {
        let account = self.store.lock().await.rename_account(name, new_name).await?;
        info!("Renamed account '{}' to '{}'", name, account.name);
        Ok(account)
    }

    pub async fn delete_account(&self, name: &str) -> LauncherResult<Option<Account>> {
        self.store.lock().await.remove_account(name).await
    }

    /// First configured account, or [`FALLBACK_ACCOUNT`].
    pub async fn default_account(&self) -> String {
        self.store
            .lock()
            .await
            .accounts()
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| FALLBACK_ACCOUNT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{InstallType, InstallationStore};

    async fn registry(dir: &tempfile::TempDir) -> Registry {
        let store = InstallationStore::load(dir.path().join("versions.json"))
            .await
            .into_handle();
        Registry::new(store, GameLayout::new(dir.path()))
    }

    async fn seed_version(registry: &Registry, name: &str) {
        let dir = registry.version_dir(name).unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.jar")), b"jar").unwrap();
        registry
            .store
            .lock()
            .await
            .add_version(InstalledVersion::new(name, InstallType::Original, ""))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_removes_record_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir).await;
        seed_version(&registry, "1.20.1").await;

        let removed = registry.delete_version("1.20.1").await.unwrap();
        assert_eq!(removed.unwrap().name, "1.20.1");
        assert!(registry.versions().await.is_empty());
        assert!(!registry.version_dir("1.20.1").unwrap().exists());
    }

    #[tokio::test]
    async fn delete_of_unknown_version_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir).await;
        seed_version(&registry, "1.20.1").await;
        // Files of an unrecorded version stay put.
        std::fs::create_dir_all(registry.version_dir("1.8.9").unwrap()).unwrap();

        assert!(registry.delete_version("1.8.9").await.unwrap().is_none());
        assert_eq!(registry.versions().await.len(), 1);
        assert!(registry.version_dir("1.8.9").unwrap().exists());
    }

    #[tokio::test]
    async fn legacy_record_with_unsafe_name_is_deleted_without_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("versions.json"),
            r#"{"versions": [{"name": "../evil", "type": "original"}], "accounts": []}"#,
        )
        .unwrap();
        let outside = dir.path().join(".minecraft").join("evil");
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("keep.txt"), "keep").unwrap();
        let registry = registry(&dir).await;
        assert_eq!(registry.versions().await.len(), 1);

        let removed = registry.delete_version("../evil").await.unwrap();
        assert_eq!(removed.unwrap().name, "../evil");
        assert!(registry.versions().await.is_empty());
        assert!(outside.join("keep.txt").exists());

        let reloaded = InstallationStore::load(dir.path().join("versions.json")).await;
        assert!(reloaded.versions().is_empty());
    }

    #[tokio::test]
    async fn rename_changes_only_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir).await;
        seed_version(&registry, "1.20.1").await;

        registry.rename_version("1.20.1", "Hardcore").await.unwrap();
        let version = registry.find_version("1.20.1").await.unwrap();
        assert_eq!(version.display_name, "Hardcore");
        assert!(matches!(
            registry.find_version("Hardcore").await,
            Err(LauncherError::VersionNotInstalled(_))
        ));
    }

    #[tokio::test]
    async fn default_account_prefers_first_created() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir).await;
        assert_eq!(registry.default_account().await, FALLBACK_ACCOUNT);

        registry.create_account("Steve").await.unwrap();
        registry.create_account("Alex").await.unwrap();
        assert_eq!(registry.default_account().await, "Steve");

        registry.rename_account("Steve", "Notch").await.unwrap();
        registry.delete_account("Alex").await.unwrap();
        let names: Vec<_> = registry.accounts().await.into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Notch"]);
    }
}
