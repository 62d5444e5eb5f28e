pub mod app;
pub mod config;
pub mod package;
pub mod present;
pub mod provider;
pub mod runtime;
pub mod traversal;

/// Version reported by `--version`, taken from git tags at build time.
pub const VERSION: &str = env!("DEBINSIGHT_VERSION");
