pub mod manifest;
pub mod version_file;

pub use manifest::{ManifestFetcher, VersionEntry, VersionManifest, VERSION_MANIFEST_URL};
pub use version_file::ClientDownload;
