//! Metadata provider abstraction.
//!
//! The traversal only talks to the system package database through the
//! [`MetadataProvider`] trait. [`DpkgProvider`] implements it on top of
//! `dpkg-query` and `apt-cache`.

mod dpkg;
mod parse;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use dpkg::{APT_CACHE, DPKG_QUERY, DpkgProvider};

/// Raw status of an installed package before relation decomposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub package: String,
    pub version: String,
    /// Every reported field in order, names lower-cased
    pub fields: Vec<(String, String)>,
}

impl StatusReport {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A regular file installed by a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFile {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The package is not installed; expected during traversal.
    #[error("package {package} is not installed")]
    NotFound { package: String },

    /// A required system tool is not available.
    #[error("{tool} not found on the system. Is this a Debian (or Debian derivative) system?")]
    ToolMissing { tool: String },

    /// The tool answered with output that cannot be understood.
    #[error("unexpected output from {tool}: {reason}")]
    Malformed { tool: String, reason: String },
}

impl ProviderError {
    pub fn not_found(package: impl Into<String>) -> Self {
        ProviderError::NotFound {
            package: package.into(),
        }
    }

    pub fn malformed(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::Malformed {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}

/// Queries against the local package database.
///
/// Listing queries report "nothing" as an empty list. Only `status` uses
/// [`ProviderError::NotFound`]; any other error is unexpected.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Packages owning `path` (usually zero or one).
    async fn owning_packages(&self, path: &Path) -> Result<Vec<String>, ProviderError>;

    /// Status of an installed package.
    async fn status(&self, package: &str) -> Result<StatusReport, ProviderError>;

    /// Names of packages declaring a relation on `package`, deduplicated in order.
    async fn reverse_dependencies(&self, package: &str) -> Result<Vec<String>, ProviderError>;

    /// Regular, non-symlink files of `package` that exist right now.
    async fn installed_files(&self, package: &str) -> Result<Vec<InstalledFile>, ProviderError>;
}
