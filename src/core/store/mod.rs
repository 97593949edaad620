pub mod manager;
pub mod model;

pub use manager::{InstallationStore, StoreHandle};
pub use model::{Account, InstallType, InstalledVersion, StoreData, VersionSidecar};
