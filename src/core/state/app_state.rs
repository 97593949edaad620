use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{build_http_client, HttpRemote, RemoteSource};
use crate::core::install::VersionInstaller;
use crate::core::launch::{CommandExecutor, JvmOptions, LaunchCoordinator, ProcessExecutor};
use crate::core::layout::GameLayout;
use crate::core::registry::Registry;
use crate::core::store::{InstallationStore, StoreHandle};
use crate::core::version::{ManifestFetcher, VERSION_MANIFEST_URL};

const APP_DIR_NAME: &str = "craftlaunch";
const SETTINGS_FILE: &str = "launcher_settings.json";
const STORE_FILE: &str = "versions.json";

/// User-editable launcher settings. Missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherSettings {
    pub java_path: PathBuf,
    pub min_heap: String,
    pub max_heap: String,
    pub manifest_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Longest gap between download chunks before giving up.
    pub stall_timeout_secs: u64,
    /// Block `launch` until the game exits.
    pub wait_for_exit: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        let jvm = JvmOptions::default();
        Self {
            java_path: jvm.java_path,
            min_heap: jvm.min_heap,
            max_heap: jvm.max_heap,
            manifest_url: VERSION_MANIFEST_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            stall_timeout_secs: 60,
            wait_for_exit: false,
        }
    }
}

impl LauncherSettings {
    pub fn jvm_options(&self) -> JvmOptions {
        JvmOptions {
            java_path: self.java_path.clone(),
            min_heap: self.min_heap.clone(),
            max_heap: self.max_heap.clone(),
        }
    }
}

/// Everything a front end needs, wired against one data directory.
pub struct AppState {
    pub data_dir: PathBuf,
    pub settings: LauncherSettings,
    pub store: StoreHandle,
    pub registry: Registry,
    pub installer: VersionInstaller,
    pub launcher: LaunchCoordinator,
}

impl AppState {
    /// Load settings and the store from `data_dir` (or the platform default)
    /// and build the real network and process backends.
    pub async fn initialize(data_dir: Option<PathBuf>) -> LauncherResult<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| LauncherError::io(&data_dir, e))?;

        let settings = load_or_create_settings(&data_dir).await?;

        let client = build_http_client(Duration::from_secs(settings.connect_timeout_secs))?;
        let remote: Arc<dyn RemoteSource> = Arc::new(HttpRemote::new(
            client,
            Duration::from_secs(settings.request_timeout_secs),
        ));
        let executor: Arc<dyn CommandExecutor> =
            Arc::new(ProcessExecutor::new(settings.wait_for_exit));

        Ok(Self::with_backends(data_dir, settings, remote, executor).await)
    }

    pub async fn with_backends(
        data_dir: PathBuf,
        settings: LauncherSettings,
        remote: Arc<dyn RemoteSource>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        let layout = GameLayout::new(&data_dir);
        let store = InstallationStore::load(data_dir.join(STORE_FILE))
            .await
            .into_handle();

        let fetcher = ManifestFetcher::new(remote.clone(), settings.manifest_url.clone());
        let downloader = Downloader::new(remote, Duration::from_secs(settings.stall_timeout_secs));
        let installer = VersionInstaller::new(fetcher, downloader, layout.clone(), store.clone());
        let registry = Registry::new(store.clone(), layout.clone());
        let launcher = LaunchCoordinator::new(layout, settings.jvm_options(), executor);

        info!("Launcher data directory: {:?}", data_dir);
        Self {
            data_dir,
            settings,
            store,
            registry,
            installer,
            launcher,
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

async fn load_or_create_settings(data_dir: &Path) -> LauncherResult<LauncherSettings> {
    let path = data_dir.join(SETTINGS_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings at {:?}: {}", path, e);
            LauncherSettings::default()
        })),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let settings = LauncherSettings::default();
            let json = serde_json::to_string_pretty(&settings)?;
            tokio::fs::write(&path, json)
                .await
                .map_err(|e| LauncherError::io(&path, e))?;
            Ok(settings)
        }
        Err(e) => Err(LauncherError::io(path, e)),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
