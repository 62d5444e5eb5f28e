use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::present::Palette;
use crate::provider::MetadataProvider;
use crate::runtime::{Runtime, absolutize};

/// Maps a user supplied target to the package names it seeds.
pub struct TargetResolver<'a, R: Runtime, P: MetadataProvider> {
    runtime: &'a R,
    provider: &'a P,
    palette: Palette,
}

impl<'a, R: Runtime, P: MetadataProvider> TargetResolver<'a, R, P> {
    pub fn new(runtime: &'a R, provider: &'a P, palette: Palette) -> Self {
        Self {
            runtime,
            provider,
            palette,
        }
    }

    /// Resolve one target.
    ///
    /// An existing path is looked up by owning package; anything else is
    /// taken as a package name and confirmed through a status query. A target
    /// that matches nothing yields an empty list, not an error.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, target: &str) -> Result<Vec<String>> {
        let path = Path::new(target);
        if self.runtime.exists(path) {
            self.resolve_file(path).await
        } else {
            self.resolve_package(target).await
        }
    }

    async fn resolve_file(&self, path: &Path) -> Result<Vec<String>> {
        let cwd = self.runtime.current_dir()?;
        let path = absolutize(&cwd, path);
        let shown = path.display().to_string();
        println!("Searching for {}...", self.palette.file(&shown));

        let owners = self
            .provider
            .owning_packages(&path)
            .await
            .with_context(|| format!("Failed to look up the owner of {}", shown))?;

        if owners.is_empty() {
            println!(
                "{}{}",
                self.palette.file(&shown),
                self.palette.error(" is not owned by any installed package.")
            );
        }
        for owner in &owners {
            println!(
                "Found {} in package {}",
                self.palette.file(&shown),
                self.palette.package(owner)
            );
        }
        Ok(owners)
    }

    async fn resolve_package(&self, name: &str) -> Result<Vec<String>> {
        println!("Searching for {}...", self.palette.package(name));
        match self.provider.status(name).await {
            Ok(report) => {
                println!("Package {} found.", self.palette.package(&report.package));
                if report.package != name {
                    debug!("{} resolved to package {}", name, report.package);
                }
                Ok(vec![report.package])
            }
            Err(e) if e.is_not_found() => {
                println!(
                    "{}{}{}",
                    self.palette.error("Failed to locate package "),
                    self.palette.package(name),
                    self.palette.error(" on the system.")
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to look up package {}", name)),
        }
    }
}
