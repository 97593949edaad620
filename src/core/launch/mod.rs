pub mod command;
pub mod executor;
pub mod task;

pub use command::{JvmOptions, LaunchCommand};
pub use executor::{CommandExecutor, ProcessExecutor, SpawnedProcess};
pub use task::{LaunchCoordinator, LaunchReport};
