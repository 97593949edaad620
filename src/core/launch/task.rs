// ─── Launch Task ───
// Checks that a version is on disk, then hands the command to the executor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::command::{JvmOptions, LaunchCommand};
use super::executor::CommandExecutor;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::GameLayout;
use crate::core::store::InstallType;

#[derive(Debug, Clone, Serialize)]
pub struct LaunchReport {
    pub version: String,
    pub account: String,
    pub pid: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub exit_code: Option<i32>,
}

pub struct LaunchCoordinator {
    layout: GameLayout,
    jvm: JvmOptions,
    executor: Arc<dyn CommandExecutor>,
}

impl LaunchCoordinator {
    pub fn new(layout: GameLayout, jvm: JvmOptions, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            layout,
            jvm,
            executor,
        }
    }

    /// Start `version_name` as `account_name`.
    ///
    /// Fails with `VersionNotInstalled` without touching the executor when
    /// the version directory or its jar is missing.
    pub async fn launch(
        &self,
        version_name: &str,
        install_type: InstallType,
        account_name: &str,
    ) -> LauncherResult<LaunchReport> {
        let not_installed = || LauncherError::VersionNotInstalled(version_name.to_string());

        let version_dir = self.layout.version_dir(version_name).map_err(|_| not_installed())?;
        let jar = self.layout.client_jar(version_name).map_err(|_| not_installed())?;
        if !version_dir.is_dir() || !jar.is_file() {
            return Err(not_installed());
        }

        let command = LaunchCommand::for_client_jar(&self.jvm, &jar, account_name);
        info!(
            "Launching {} [{}] as '{}'",
            version_name, install_type, account_name
        );
        debug!("Command (copy/paste): {}", command.display());

        let started_at = Utc::now();
        let spawned = self
            .executor
            .execute(&command)
            .await
            .map_err(|source| LauncherError::Launch {
                program: command.program.clone(),
                source,
            })?;

        info!("Game process started (pid {:?})", spawned.pid);
        Ok(LaunchReport {
            version: version_name.to_string(),
            account: account_name.to_string(),
            pid: spawned.pid,
            started_at,
            exit_code: spawned.exit_code,
        })
    }
}
