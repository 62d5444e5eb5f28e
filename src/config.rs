//! Run configuration, built once from the command line and passed down.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_JOBS: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Controls how far the traversal grows from its seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    pub follow_depend: bool,
    pub follow_rdepend: bool,
    /// Maximum number of examinations in flight within one pass
    pub jobs: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            follow_depend: false,
            follow_rdepend: false,
            jobs: DEFAULT_JOBS,
        }
    }
}

/// Which sections the terminal presenter prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub no_depend: bool,
    pub no_rdepend: bool,
    pub no_files: bool,
    pub drop_not_installed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Package names or file paths
    pub targets: Vec<String>,
    pub no_color: bool,
    pub traversal: TraversalOptions,
    pub display: DisplayOptions,
    /// Where to dump the JSON snapshot, if anywhere
    pub json: Option<PathBuf>,
    /// Wall-clock limit for each provider call
    pub timeout: Duration,
}

impl Config {
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            no_color: false,
            traversal: TraversalOptions::default(),
            display: DisplayOptions::default(),
            json: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new(vec!["curl".into()]);
        assert_eq!(config.targets, vec!["curl"]);
        assert!(!config.no_color);
        assert!(!config.traversal.follow_depend);
        assert!(!config.traversal.follow_rdepend);
        assert_eq!(config.traversal.jobs, DEFAULT_JOBS);
        assert_eq!(config.display, DisplayOptions::default());
        assert_eq!(config.json, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
