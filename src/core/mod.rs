// ─── CraftLaunch Core ───
// Version/installation lifecycle for a Minecraft launcher.
//
// Architecture:
//   core/
//     version/    - Mojang manifest + per-version detail document
//     downloader/ - Streaming, SHA-1 checked downloads
//     store/      - Installed versions + accounts, persisted as JSON
//     install/    - Staged install of one version
//     registry    - Rename/delete over the store
//     launch/     - Command builder + process executor
//     state/      - Settings + wiring

pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod launch;
pub mod layout;
pub mod registry;
pub mod state;
pub mod store;
pub mod version;
