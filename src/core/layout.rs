use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

const GAME_DIR: &str = ".minecraft";
const SIDECAR_FILE: &str = "version.json";

/// Where installed versions live on disk.
///
/// ```text
/// <root>/.minecraft/versions/<id>/<id>.jar
/// <root>/.minecraft/versions/<id>/version.json
/// ```
#[derive(Debug, Clone)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join(GAME_DIR),
        }
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, name: &str) -> LauncherResult<PathBuf> {
        validate_version_name(name)?;
        Ok(self.versions_dir().join(name))
    }

    pub fn client_jar(&self, name: &str) -> LauncherResult<PathBuf> {
        Ok(self.version_dir(name)?.join(client_jar_file_name(name)))
    }
}

pub fn client_jar_file_name(name: &str) -> String {
    format!("{name}.jar")
}

pub fn sidecar_file_name() -> &'static str {
    SIDECAR_FILE
}

/// Version names become directory names, so they must stay a single
/// path component.
pub fn validate_version_name(name: &str) -> LauncherResult<()> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(LauncherError::InvalidVersionName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_version_name() {
        let layout = GameLayout::new(Path::new("/data"));
        assert_eq!(
            layout.client_jar("1.20.1").unwrap(),
            PathBuf::from("/data/.minecraft/versions/1.20.1/1.20.1.jar")
        );
    }

    #[test]
    fn rejects_path_like_names() {
        for name in ["", "..", "../escape", "a/b", "a\\b", ".hidden"] {
            assert!(
                matches!(
                    validate_version_name(name),
                    Err(LauncherError::InvalidVersionName(_))
                ),
                "{name:?} should be rejected"
            );
        }
        assert!(validate_version_name("1.20.1-pre1").is_ok());
        assert!(validate_version_name("b1.7.3").is_ok());
    }
}
