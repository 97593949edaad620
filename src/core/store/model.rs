use serde::{Deserialize, Serialize};

/// Label recorded with an installation. No loader is actually installed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// Older stores wrote an empty string when no type was picked.
    #[default]
    #[serde(alias = "")]
    Original,
    Forge,
    Fabric,
    Quilt,
}

impl std::fmt::Display for InstallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallType::Original => write!(f, "original"),
            InstallType::Forge => write!(f, "forge"),
            InstallType::Fabric => write!(f, "fabric"),
            InstallType::Quilt => write!(f, "quilt"),
        }
    }
}

impl std::str::FromStr for InstallType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" | "vanilla" => Ok(InstallType::Original),
            "forge" => Ok(InstallType::Forge),
            "fabric" => Ok(InstallType::Fabric),
            "quilt" => Ok(InstallType::Quilt),
            other => Err(format!("unknown install type: {other}")),
        }
    }
}

/// A version recorded in the store. `name` is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstalledVersion {
    pub name: String,
    #[serde(rename = "displayName", alias = "display_name", default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub install_type: InstallType,
}

impl InstalledVersion {
    /// An empty display name falls back to the version id.
    pub fn new(name: &str, install_type: InstallType, display_name: &str) -> Self {
        let display_name = match display_name.trim() {
            "" => name.to_string(),
            trimmed => trimmed.to_string(),
        };
        Self {
            name: name.to_string(),
            display_name,
            install_type,
        }
    }

    /// Label shown in version lists, e.g. `My Survival [fabric]`.
    pub fn label(&self) -> String {
        format!("{} [{}]", self.display_name, self.install_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub name: String,
}

/// The persisted document: `{"versions": [...], "accounts": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreData {
    #[serde(default)]
    pub versions: Vec<InstalledVersion>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Metadata written next to a downloaded binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionSidecar {
    pub name: String,
    #[serde(rename = "type")]
    pub install_type: InstallType,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl From<&InstalledVersion> for VersionSidecar {
    fn from(version: &InstalledVersion) -> Self {
        Self {
            name: version.name.clone(),
            install_type: version.install_type,
            display_name: version.display_name.clone(),
        }
    }
}
