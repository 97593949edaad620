use std::process::Stdio;

use async_trait::async_trait;
use tracing::{info, warn};

use super::command::LaunchCommand;

/// Result of starting a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedProcess {
    pub pid: Option<u32>,
    /// Set only when the executor waited for the process to exit.
    pub exit_code: Option<i32>,
}

/// Runs a [`LaunchCommand`]. Spawn failures come back as the raw
/// `io::Error`; the coordinator wraps them.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &LaunchCommand) -> std::io::Result<SpawnedProcess>;
}

/// Spawns a real child process.
///
/// With `wait_for_exit` off, returns as soon as the process has started and
/// reaps it on a background task.
pub struct ProcessExecutor {
    wait_for_exit: bool,
}

impl ProcessExecutor {
    pub fn new(wait_for_exit: bool) -> Self {
        Self { wait_for_exit }
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, command: &LaunchCommand) -> std::io::Result<SpawnedProcess> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn()?;
        let pid = child.id();

        if self.wait_for_exit {
            let status = child.wait().await?;
            info!("Game process {:?} exited with {}", pid, status);
            return Ok(SpawnedProcess {
                pid,
                exit_code: status.code(),
            });
        }

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => info!("Game process {:?} exited with {}", pid, status),
                Err(e) => warn!("Lost track of game process {:?}: {}", pid, e),
            }
        });

        Ok(SpawnedProcess {
            pid,
            exit_code: None,
        })
    }
}
