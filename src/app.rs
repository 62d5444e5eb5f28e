//! Top-level run: environment check, traversal, presentation.

use anyhow::Result;
use log::debug;
use std::io::{self, Write};

use crate::config::Config;
use crate::present::{Palette, render, write_snapshot};
use crate::provider::{DpkgProvider, MetadataProvider};
use crate::runtime::Runtime;
use crate::traversal::Engine;

/// Run against the system package database.
///
/// Fails before any traversal when `dpkg-query` or `apt-cache` is missing.
#[tracing::instrument(skip(runtime, config))]
pub async fn run<R: Runtime>(runtime: &R, config: &Config) -> Result<()> {
    let palette = Palette::new(!config.no_color);
    let provider = DpkgProvider::locate(runtime, config.timeout)?;
    println!(
        "Found apt-cache: {}",
        palette.tool(&provider.apt_cache().display().to_string())
    );
    println!(
        "Found dpkg-query: {}",
        palette.tool(&provider.dpkg_query().display().to_string())
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    inspect(runtime, &provider, config, &mut out).await
}

/// Traverse, then render and optionally dump the result.
///
/// Nothing is rendered or written unless the whole traversal succeeded.
pub async fn inspect<R: Runtime, P: MetadataProvider, W: Write>(
    runtime: &R,
    provider: &P,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let palette = Palette::new(!config.no_color);
    let engine = Engine::new(runtime, provider, config.traversal, palette);
    let inventory = engine.run(&config.targets).await?;
    debug!("Collected {} package(s)", inventory.len());

    render(out, &inventory, &config.display, &palette)?;

    if let Some(path) = &config.json {
        write_snapshot(runtime, path, &inventory)?;
        writeln!(
            out,
            "Wrote package information to {}",
            palette.file(&path.display().to_string())
        )?;
    }
    Ok(())
}
