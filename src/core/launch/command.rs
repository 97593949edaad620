// ─── Launch Command ───
// Fixed-shape command line for starting an installed client jar.

use std::path::{Path, PathBuf};

/// JVM settings applied to every launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JvmOptions {
    pub java_path: PathBuf,
    pub min_heap: String,
    pub max_heap: String,
}

impl Default for JvmOptions {
    fn default() -> Self {
        Self {
            java_path: PathBuf::from("java"),
            min_heap: "2G".into(),
            max_heap: "2G".into(),
        }
    }
}

/// What the executor runs. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl LaunchCommand {
    /// `java -Xmx<max> -Xms<min> -jar <jar> nogui --username <account>`
    pub fn for_client_jar(jvm: &JvmOptions, jar: &Path, account_name: &str) -> Self {
        let working_dir = jar
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let args = vec![
            format!("-Xmx{}", jvm.max_heap),
            format!("-Xms{}", jvm.min_heap),
            "-jar".to_string(),
            jar.to_string_lossy().to_string(),
            "nogui".to_string(),
            "--username".to_string(),
            account_name.to_string(),
        ];

        Self {
            program: jvm.java_path.clone(),
            args,
            working_dir,
        }
    }

    /// Copy/paste-able rendering for logs.
    pub fn display(&self) -> String {
        let program = shell_escape(&self.program.to_string_lossy());
        let args = self
            .args
            .iter()
            .map(|arg| shell_escape(arg))
            .collect::<Vec<_>>()
            .join(" ");

        if args.is_empty() {
            program
        } else {
            format!("{} {}", program, args)
        }
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
