use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use craftlaunch_lib::commands::{self, InstallVersionPayload, LaunchVersionPayload};
use craftlaunch_lib::core::store::InstallType;
use craftlaunch_lib::{AppState, LauncherResult};

#[derive(Parser)]
#[command(name = "craftlaunch", version, about = "Install and launch Minecraft versions")]
struct Cli {
    /// Launcher data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List versions available for download
    Available {
        /// Only stable releases
        #[arg(long)]
        releases: bool,
    },
    /// Download and install a version
    Install {
        version: String,
        /// original, forge, fabric or quilt
        #[arg(long = "type", default_value = "original")]
        install_type: InstallType,
        #[arg(long)]
        name: Option<String>,
    },
    /// List installed versions
    List,
    /// Change the display name of an installed version
    Rename { version: String, display_name: String },
    /// Delete an installed version and its files
    Delete { version: String },
    /// Manage offline accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// Start an installed version
    Launch {
        version: String,
        #[arg(long)]
        account: Option<String>,
    },
    /// Print the active settings
    Settings,
}

#[derive(Subcommand)]
enum AccountCommand {
    List,
    Add { name: String },
    Rename { name: String, new_name: String },
    Delete { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    craftlaunch_lib::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> LauncherResult<()> {
    let state = AppState::initialize(cli.data_dir).await?;

    match cli.command {
        Command::Available { releases } => {
            for v in commands::get_minecraft_versions(&state, releases).await? {
                println!("{}\t{}", v.id, v.version_type.unwrap_or_default());
            }
        }
        Command::Install {
            version,
            install_type,
            name,
        } => {
            let installed = commands::install_version(
                &state,
                InstallVersionPayload {
                    version_id: version,
                    install_type,
                    display_name: name,
                },
            )
            .await?;
            println!("Installed {}", installed.label);
        }
        Command::List => {
            for v in commands::list_installed_versions(&state).await {
                println!("{}\t{}", v.name, v.label);
            }
        }
        Command::Rename {
            version,
            display_name,
        } => {
            let renamed = commands::rename_version(&state, &version, &display_name).await?;
            println!("Renamed to {}", renamed.label);
        }
        Command::Delete { version } => {
            let response = commands::delete_version(&state, &version).await?;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Account(AccountCommand::List) => {
            for account in commands::list_accounts(&state).await {
                println!("{}", account.name);
            }
        }
        Command::Account(AccountCommand::Add { name }) => {
            let account = commands::create_account(&state, &name).await?;
            println!("Created account '{}'", account.name);
        }
        Command::Account(AccountCommand::Rename { name, new_name }) => {
            let account = commands::rename_account(&state, &name, &new_name).await?;
            println!("Renamed account to '{}'", account.name);
        }
        Command::Account(AccountCommand::Delete { name }) => {
            let response = commands::delete_account(&state, &name).await?;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Launch { version, account } => {
            let report =
                commands::launch_version(&state, LaunchVersionPayload { name: version, account })
                    .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Settings => {
            let settings = commands::get_launcher_settings(&state);
            println!("# {}", state.settings_path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
