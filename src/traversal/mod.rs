//! Package graph traversal.
//!
//! Targets seed the registry with open names. Each pass snapshots the open
//! names, examines them concurrently through the provider and applies the
//! results one at a time: resolved records go into the registry, packages
//! that are not installed are dropped, and (if enabled) every dependency or
//! reverse dependency of a resolved record is inserted as open. Names added
//! during a pass are picked up by the next one. The loop ends when a pass
//! finds nothing open, after which the registry is finalized.

mod target;

use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt};
use log::{debug, info};

use crate::config::TraversalOptions;
use crate::package::{Inventory, PackageRecord, Registry};
use crate::present::Palette;
use crate::provider::MetadataProvider;
use crate::runtime::Runtime;

pub use target::TargetResolver;

/// Outcome of examining one open package.
#[derive(Debug)]
enum Examination {
    Resolved(PackageRecord),
    Dropped(String),
}

pub struct Engine<'a, R: Runtime, P: MetadataProvider> {
    resolver: TargetResolver<'a, R, P>,
    provider: &'a P,
    options: TraversalOptions,
    palette: Palette,
}

impl<'a, R: Runtime, P: MetadataProvider> Engine<'a, R, P> {
    pub fn new(
        runtime: &'a R,
        provider: &'a P,
        options: TraversalOptions,
        palette: Palette,
    ) -> Self {
        Self {
            resolver: TargetResolver::new(runtime, provider, palette),
            provider,
            options,
            palette,
        }
    }

    /// Resolve `targets`, walk the graph until nothing is open and return
    /// the finalized inventory. Any unexpected provider error aborts the run.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, targets: &[String]) -> Result<Inventory> {
        let mut registry = Registry::new();
        self.seed(&mut registry, targets).await?;
        self.traverse(&mut registry).await?;
        registry.finalize()
    }

    /// Resolve every target and insert the packages found as open.
    pub async fn seed(&self, registry: &mut Registry, targets: &[String]) -> Result<()> {
        let mut resolutions = stream::iter(targets)
            .map(|target| self.resolver.resolve(target))
            .buffer_unordered(self.jobs());

        while let Some(names) = resolutions.next().await {
            for name in names? {
                if !registry.insert_open(&name) {
                    debug!("{} already seeded", name);
                }
            }
        }
        Ok(())
    }

    /// Run open passes until a pass finds no open names.
    pub async fn traverse(&self, registry: &mut Registry) -> Result<()> {
        let mut pass = 0usize;
        loop {
            let open = registry.open_names();
            if open.is_empty() {
                break;
            }
            pass += 1;
            info!("Pass {}: examining {} package(s)", pass, open.len());

            let mut examinations = stream::iter(open)
                .map(|name| self.examine(name))
                .buffer_unordered(self.jobs());

            while let Some(examination) = examinations.next().await {
                self.apply(registry, examination?)?;
            }
        }
        debug!(
            "Traversal finished after {} pass(es) with {} package(s)",
            pass,
            registry.len()
        );
        Ok(())
    }

    fn jobs(&self) -> usize {
        self.options.jobs.max(1)
    }

    /// Query everything known about `name`. Touches only the provider.
    async fn examine(&self, name: String) -> Result<Examination> {
        let report = match self.provider.status(&name).await {
            Ok(report) => report,
            Err(e) if e.is_not_found() => return Ok(Examination::Dropped(name)),
            Err(e) => return Err(e).with_context(|| format!("Failed to examine package {}", name)),
        };

        let mut record = PackageRecord::new(name.as_str(), report.version.as_str());
        for (field, value) in &report.fields {
            record.set_field(field, value);
        }

        let rdepends = self
            .provider
            .reverse_dependencies(&name)
            .await
            .with_context(|| format!("Failed to query reverse dependencies of {}", name))?;
        record.set_reverse_dependencies(rdepends);

        let files = self
            .provider
            .installed_files(&name)
            .await
            .with_context(|| format!("Failed to list files of {}", name))?;
        record.set_files(
            files
                .into_iter()
                .map(|f| (f.path.to_string_lossy().into_owned(), f.size)),
        );

        Ok(Examination::Resolved(record))
    }

    /// Apply one examination to the registry and expand the open set.
    fn apply(&self, registry: &mut Registry, examination: Examination) -> Result<()> {
        match examination {
            Examination::Resolved(record) => {
                let mut discovered: Vec<String> = Vec::new();
                if self.options.follow_depend {
                    discovered.extend(record.dependencies().map(|d| d.package.clone()));
                }
                if self.options.follow_rdepend {
                    discovered.extend(
                        record
                            .reverse_dependencies
                            .iter()
                            .map(|r| r.package.clone()),
                    );
                }

                println!(
                    "Collected {} {}",
                    self.palette.package(&record.name),
                    self.palette.version(&record.version)
                );
                registry.resolve(record)?;

                for name in discovered {
                    if registry.insert_open(&name) {
                        debug!("Discovered {}", name);
                    }
                }
            }
            Examination::Dropped(name) => {
                println!(
                    "{}{}{}",
                    self.palette.dropping("Dropping "),
                    self.palette.package(&name),
                    self.palette.dropping(": not installed.")
                );
                registry.drop_open(&name)?;
            }
        }
        Ok(())
    }
}
