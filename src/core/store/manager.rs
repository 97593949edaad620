use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::model::{Account, InstalledVersion, StoreData};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::validate_version_name;

/// Shared handle. The mutex is the single writer for the store file.
pub type StoreHandle = Arc<Mutex<InstallationStore>>;

/// Durable record of installed versions and accounts.
///
/// Every mutation is written through before it returns. Mutations are
/// staged on a copy and only swapped in once the write succeeded, so a
/// failed save leaves the in-memory view untouched.
#[derive(Debug)]
pub struct InstallationStore {
    path: PathBuf,
    data: StoreData,
}

impl InstallationStore {
    /// Read the store at `path`. A missing or malformed file yields an
    /// empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<StoreData>(&raw) {
                Ok(data) => dedupe(data),
                Err(e) => {
                    warn!("Corrupt store at {:?}, starting empty: {}", path, e);
                    StoreData::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {:?}, starting empty", path);
                StoreData::default()
            }
            Err(e) => {
                warn!("Cannot read store at {:?}, starting empty: {}", path, e);
                StoreData::default()
            }
        };

        Self { path, data }
    }

    pub fn into_handle(self) -> StoreHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn versions(&self) -> &[InstalledVersion] {
        &self.data.versions
    }

    pub fn accounts(&self) -> &[Account] {
        &self.data.accounts
    }

    pub fn find_version(&self, name: &str) -> Option<&InstalledVersion> {
        self.data.versions.iter().find(|v| v.name == name)
    }

    pub fn contains_version(&self, name: &str) -> bool {
        self.find_version(name).is_some()
    }

    pub fn contains_account(&self, name: &str) -> bool {
        self.data.accounts.iter().any(|a| a.name == name)
    }

    /// Persist the current state.
    pub async fn save(&self) -> LauncherResult<()> {
        write_atomic(&self.path, &self.data).await
    }

    async fn commit(&mut self, next: StoreData) -> LauncherResult<()> {
        write_atomic(&self.path, &next).await?;
        self.data = next;
        Ok(())
    }

    // ── Versions ────────────────────────────────────────

    pub async fn add_version(&mut self, version: InstalledVersion) -> LauncherResult<()> {
        validate_version_name(&version.name)?;
        if self.contains_version(&version.name) {
            return Err(LauncherError::VersionAlreadyInstalled(version.name));
        }
        let mut next = self.data.clone();
        next.versions.push(version);
        self.commit(next).await
    }

    /// Remove `name`. Absent names are a no-op and return `None`.
    pub async fn remove_version(&mut self, name: &str) -> LauncherResult<Option<InstalledVersion>> {
        let Some(index) = self.data.versions.iter().position(|v| v.name == name) else {
            return Ok(None);
        };
        let mut next = self.data.clone();
        let removed = next.versions.remove(index);
        self.commit(next).await?;
        Ok(Some(removed))
    }

    pub async fn rename_version_display(
        &mut self,
        name: &str,
        display_name: &str,
    ) -> LauncherResult<InstalledVersion> {
        let mut next = self.data.clone();
        let version = next
            .versions
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| LauncherError::VersionNotInstalled(name.to_string()))?;
        version.display_name = match display_name.trim() {
            "" => name.to_string(),
            trimmed => trimmed.to_string(),
        };
        let renamed = version.clone();
        self.commit(next).await?;
        Ok(renamed)
    }

    // ── Accounts ────────────────────────────────────────

    pub async fn add_account(&mut self, name: &str) -> LauncherResult<Account> {
        let name = normalize_account_name(name)?;
        if self.contains_account(&name) {
            return Err(LauncherError::AccountAlreadyExists(name));
        }
        let account = Account { name };
        let mut next = self.data.clone();
        next.accounts.push(account.clone());
        self.commit(next).await?;
        Ok(account)
    }

    /// Remove `name`. Absent names are a no-op and return `None`.
    pub async fn remove_account(&mut self, name: &str) -> LauncherResult<Option<Account>> {
        let Some(index) = self.data.accounts.iter().position(|a| a.name == name) else {
            return Ok(None);
        };
        let mut next = self.data.clone();
        let removed = next.accounts.remove(index);
        self.commit(next).await?;
        Ok(Some(removed))
    }

    pub async fn rename_account(&mut self, name: &str, new_name: &str) -> LauncherResult<Account> {
        let new_name = normalize_account_name(new_name)?;
        if new_name != name && self.contains_account(&new_name) {
            return Err(LauncherError::AccountAlreadyExists(new_name));
        }
        let mut next = self.data.clone();
        let account = next
            .accounts
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| LauncherError::AccountNotFound(name.to_string()))?;
        account.name = new_name;
        let renamed = account.clone();
        self.commit(next).await?;
        Ok(renamed)
    }
}

fn normalize_account_name(name: &str) -> LauncherResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LauncherError::InvalidAccountName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Older launchers never checked for duplicates. First entry wins.
fn dedupe(mut data: StoreData) -> StoreData {
    let before = (data.versions.len(), data.accounts.len());

    let mut seen = std::collections::HashSet::new();
    data.versions.retain(|v| seen.insert(v.name.clone()));
    let mut seen = std::collections::HashSet::new();
    data.accounts.retain(|a| seen.insert(a.name.clone()));

    if before != (data.versions.len(), data.accounts.len()) {
        warn!(
            "Dropped duplicate store entries: {} versions, {} accounts",
            before.0 - data.versions.len(),
            before.1 - data.accounts.len()
        );
    }
    data
}

/// Write to a sibling temp file, sync, then rename over `path`.
async fn write_atomic(path: &Path, data: &StoreData) -> LauncherResult<()> {
    let json = serde_json::to_string_pretty(data)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| LauncherError::io(&parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "store.json".into());
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let result: LauncherResult<()> = async {
        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| LauncherError::io(&tmp_path, e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| LauncherError::io(&tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| LauncherError::io(&tmp_path, e))?;
        drop(file);

        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| LauncherError::io(path, e))
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    } else {
        info!("Saved store to {:?}", path);
    }
    result
}
