// Operation surface for front ends. Each command takes the shared state,
// returns a serializable response and leaves user-facing reporting to the
// caller.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::core::error::LauncherResult;
use crate::core::launch::LaunchReport;
use crate::core::state::{AppState, LauncherSettings};
use crate::core::store::{Account, InstallType, InstalledVersion};

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteResponse {
    Deleted,
    NotFound,
}

#[derive(Debug, Serialize)]
pub struct MinecraftVersionInfo {
    pub id: String,
    pub release_time: Option<String>,
    pub version_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InstalledVersionInfo {
    pub name: String,
    pub display_name: String,
    pub install_type: InstallType,
    pub label: String,
    pub path: Option<PathBuf>,
}

impl InstalledVersionInfo {
    fn new(state: &AppState, version: InstalledVersion) -> Self {
        Self {
            path: state.registry.version_dir(&version.name).ok(),
            label: version.label(),
            name: version.name,
            display_name: version.display_name,
            install_type: version.install_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InstallVersionPayload {
    pub version_id: String,
    #[serde(default)]
    pub install_type: InstallType,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LaunchVersionPayload {
    pub name: String,
    /// Falls back to the first account, then `offline_user`.
    #[serde(default)]
    pub account: Option<String>,
}

pub async fn get_minecraft_versions(
    state: &AppState,
    releases_only: bool,
) -> LauncherResult<Vec<MinecraftVersionInfo>> {
    let manifest = state.installer.fetcher().fetch_manifest().await?;
    let entries: Vec<_> = if releases_only {
        manifest.releases().into_iter().cloned().collect()
    } else {
        manifest.versions
    };

    Ok(entries
        .into_iter()
        .map(|v| MinecraftVersionInfo {
            id: v.id,
            release_time: v.release_time,
            version_type: v.version_type,
        })
        .collect())
}

pub async fn install_version(
    state: &AppState,
    payload: InstallVersionPayload,
) -> LauncherResult<InstalledVersionInfo> {
    let display_name = payload.display_name.unwrap_or_default();
    match state
        .installer
        .install(&payload.version_id, payload.install_type, &display_name)
        .await
    {
        Ok(version) => Ok(InstalledVersionInfo::new(state, version)),
        Err(e) => {
            error!("Install of {} failed: {}", payload.version_id, e);
            Err(e)
        }
    }
}

pub async fn list_installed_versions(state: &AppState) -> Vec<InstalledVersionInfo> {
    state
        .registry
        .versions()
        .await
        .into_iter()
        .map(|v| InstalledVersionInfo::new(state, v))
        .collect()
}

pub async fn rename_version(
    state: &AppState,
    name: &str,
    display_name: &str,
) -> LauncherResult<InstalledVersionInfo> {
    let version = state.registry.rename_version(name, display_name).await?;
    Ok(InstalledVersionInfo::new(state, version))
}

pub async fn delete_version(state: &AppState, name: &str) -> LauncherResult<DeleteResponse> {
    Ok(match state.registry.delete_version(name).await? {
        Some(_) => DeleteResponse::Deleted,
        None => DeleteResponse::NotFound,
    })
}

pub async fn list_accounts(state: &AppState) -> Vec<Account> {
    state.registry.accounts().await
}

pub async fn create_account(state: &AppState, name: &str) -> LauncherResult<Account> {
    state.registry.create_account(name).await
}

pub async fn rename_account(state: &AppState, name: &str, new_name: &str) -> LauncherResult<Account> {
    state.registry.rename_account(name, new_name).await
}

pub async fn delete_account(state: &AppState, name: &str) -> LauncherResult<DeleteResponse> {
    Ok(match state.registry.delete_account(name).await? {
        Some(_) => DeleteResponse::Deleted,
        None => DeleteResponse::NotFound,
    })
}

/// Launch an installed version. The install type comes from the store
/// record, so only recorded versions can be started.
pub async fn launch_version(
    state: &AppState,
    payload: LaunchVersionPayload,
) -> LauncherResult<LaunchReport> {
    let version = state.registry.find_version(&payload.name).await?;
    let account = match payload.account {
        Some(account) if !account.trim().is_empty() => account,
        _ => state.registry.default_account().await,
    };

    let report = state
        .launcher
        .launch(&version.name, version.install_type, &account)
        .await?;
    info!("Launched {} for '{}'", version.label(), account);
    Ok(report)
}

pub fn get_launcher_settings(state: &AppState) -> LauncherSettings {
    state.settings.clone()
}
