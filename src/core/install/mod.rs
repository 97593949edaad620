pub mod installer;
pub mod staging;

pub use installer::VersionInstaller;
pub use staging::StagingDir;
