use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::parse::{
    is_installed, parse_file_list, parse_owner_search, parse_rdepends, parse_status,
};
use super::{InstalledFile, MetadataProvider, ProviderError, StatusReport};
use crate::runtime::{Runtime, find_program};

pub const DPKG_QUERY: &str = "dpkg-query";
pub const APT_CACHE: &str = "apt-cache";

/// Metadata provider backed by `dpkg-query` and `apt-cache`.
pub struct DpkgProvider<'a, R: Runtime> {
    runtime: &'a R,
    dpkg_query: PathBuf,
    apt_cache: PathBuf,
    timeout: Duration,
}

impl<'a, R: Runtime> DpkgProvider<'a, R> {
    pub fn new(runtime: &'a R, dpkg_query: PathBuf, apt_cache: PathBuf, timeout: Duration) -> Self {
        Self {
            runtime,
            dpkg_query,
            apt_cache,
            timeout,
        }
    }

    /// Locate both tools, honouring `DEBINSIGHT_DPKG_QUERY` / `DEBINSIGHT_APT_CACHE`.
    pub fn locate(runtime: &'a R, timeout: Duration) -> Result<Self, ProviderError> {
        let apt_cache = locate_tool(runtime, APT_CACHE, "DEBINSIGHT_APT_CACHE")?;
        let dpkg_query = locate_tool(runtime, DPKG_QUERY, "DEBINSIGHT_DPKG_QUERY")?;
        Ok(Self::new(runtime, dpkg_query, apt_cache, timeout))
    }

    pub fn dpkg_query(&self) -> &Path {
        &self.dpkg_query
    }

    pub fn apt_cache(&self) -> &Path {
        &self.apt_cache
    }

    /// Run a tool and return its stdout if it exited successfully.
    ///
    /// Spawn failures, timeouts and non-zero exits all yield `None`.
    async fn query(&self, tool: &Path, args: &[&str]) -> Result<Option<String>, ProviderError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = match self.runtime.exec(tool, &args, self.timeout).await {
            Ok(output) => output,
            Err(e) => {
                warn!("{} {:?} failed: {:#}", tool.display(), args, e);
                return Ok(None);
            }
        };

        if !output.success() {
            debug!(
                "{} {:?} exited with {:?}: {}",
                tool.display(),
                args,
                output.code,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        String::from_utf8(output.stdout).map(Some).map_err(|_| {
            ProviderError::malformed(tool.display().to_string(), "output is not valid UTF-8")
        })
    }
}

fn locate_tool<R: Runtime>(
    runtime: &R,
    name: &str,
    env_key: &str,
) -> Result<PathBuf, ProviderError> {
    let missing = || ProviderError::ToolMissing {
        tool: name.to_string(),
    };

    match runtime.env_var(env_key) {
        Ok(path) if !path.is_empty() => {
            let path = PathBuf::from(path);
            debug!("Using {} from {}: {:?}", name, env_key, path);
            if runtime.is_executable(&path) {
                Ok(path)
            } else {
                Err(missing())
            }
        }
        _ => find_program(runtime, name).ok_or_else(missing),
    }
}

#[async_trait]
impl<'a, R: Runtime> MetadataProvider for DpkgProvider<'a, R> {
    #[tracing::instrument(skip(self))]
    async fn owning_packages(&self, path: &Path) -> Result<Vec<String>, ProviderError> {
        let path = path.to_string_lossy().into_owned();
        let stdout = self
            .query(&self.dpkg_query, &["--search", path.as_str()])
            .await?;
        Ok(stdout.map(|s| parse_owner_search(&s)).unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn status(&self, package: &str) -> Result<StatusReport, ProviderError> {
        let Some(stdout) = self.query(&self.dpkg_query, &["--status", package]).await? else {
            return Err(ProviderError::not_found(package));
        };

        let report = parse_status(&stdout)
            .map_err(|reason| ProviderError::malformed(DPKG_QUERY, reason))?;

        if !is_installed(&report) {
            debug!("{} is known but not installed: {:?}", package, report.field("status"));
            return Err(ProviderError::not_found(package));
        }
        Ok(report)
    }

    #[tracing::instrument(skip(self))]
    async fn reverse_dependencies(&self, package: &str) -> Result<Vec<String>, ProviderError> {
        match self.query(&self.apt_cache, &["rdepends", package]).await? {
            Some(stdout) => parse_rdepends(package, &stdout)
                .map_err(|reason| ProviderError::malformed(APT_CACHE, reason)),
            None => Ok(Vec::new()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn installed_files(&self, package: &str) -> Result<Vec<InstalledFile>, ProviderError> {
        let Some(stdout) = self.query(&self.dpkg_query, &["--listfiles", package]).await? else {
            return Ok(Vec::new());
        };

        Ok(parse_file_list(&stdout)
            .into_iter()
            .filter_map(|path| {
                let size = self.runtime.regular_file_size(&path)?;
                Some(InstalledFile { path, size })
            })
            .collect())
    }
}
