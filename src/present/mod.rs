//! Rendering of a finalized inventory: terminal report and JSON snapshot.

mod palette;
mod snapshot;

use std::io::{self, Write};

use crate::config::DisplayOptions;
use crate::package::{Inventory, PackageRecord, RelationKind};

pub use palette::Palette;
pub use snapshot::{snapshot_json, write_snapshot};

/// Write the per-package report followed by the grand total.
pub fn render<W: Write>(
    w: &mut W,
    inventory: &Inventory,
    display: &DisplayOptions,
    palette: &Palette,
) -> io::Result<()> {
    if inventory.is_empty() {
        writeln!(w, "No installed packages found.")?;
        return Ok(());
    }

    for record in inventory.packages() {
        writeln!(w)?;
        render_package(w, record, display, palette)?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "{} {} ({} package{})",
        palette.header("Total installed size:"),
        palette.file_size(&format_size(inventory.total_installed_bytes())),
        inventory.len(),
        if inventory.len() == 1 { "" } else { "s" }
    )?;
    Ok(())
}

fn render_package<W: Write>(
    w: &mut W,
    record: &PackageRecord,
    display: &DisplayOptions,
    palette: &Palette,
) -> io::Result<()> {
    write!(
        w,
        "{} {}  {} {}",
        palette.header("Package:"),
        palette.package(&record.name),
        palette.header("Version:"),
        palette.version(&record.version)
    )?;
    if let Some(arch) = record.fields.get("architecture") {
        write!(w, "  {} {}", palette.header("Architecture:"), arch)?;
    }
    writeln!(w)?;
    if let Some(summary) = record.summary() {
        writeln!(w, "  {}", summary)?;
    }

    if !display.no_depend {
        for kind in RelationKind::ALL {
            let deps = record.relation(kind);
            if deps.is_empty() {
                continue;
            }
            writeln!(w, "  {}", palette.header(&format!("{}:", kind.title())))?;
            for dep in deps {
                match &dep.version {
                    Some(version) => writeln!(
                        w,
                        "    {} ({})",
                        palette.dependency(&dep.package),
                        palette.version(version)
                    )?,
                    None => writeln!(w, "    {}", palette.dependency(&dep.package))?,
                }
            }
        }
    }

    if !display.no_rdepend {
        let shown: Vec<_> = record
            .reverse_dependencies
            .iter()
            .filter(|r| r.installed || !display.drop_not_installed)
            .collect();
        if !shown.is_empty() {
            writeln!(w, "  {}", palette.header("Reverse Depends:"))?;
            for rdep in shown {
                let marker = if rdep.installed {
                    palette.installed("[installed]")
                } else {
                    palette.not_installed("[not installed]")
                };
                writeln!(w, "    {} {}", palette.rev_dependency(&rdep.package), marker)?;
            }
        }
    }

    if !display.no_files && !record.files.is_empty() {
        writeln!(w, "  {}", palette.header("Files:"))?;
        for (path, size) in &record.files {
            writeln!(
                w,
                "    {}  {}",
                palette.file(path),
                palette.file_size(&format_size(*size))
            )?;
        }
    }

    writeln!(
        w,
        "  {} {} ({} file{})",
        palette.header("Installed size:"),
        palette.file_size(&format_size(record.total_installed_bytes)),
        record.files.len(),
        if record.files.len() == 1 { "" } else { "s" }
    )?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Registry;

    fn inventory() -> Inventory {
        let mut registry = Registry::new();
        for name in ["curl", "libcurl4"] {
            registry.insert_open(name);
        }

        let mut curl = PackageRecord::new("curl", "7.88.1");
        curl.set_field("Architecture", "amd64");
        curl.set_field("Description", "command line tool\n more text");
        curl.set_field("Depends", "libc6 (>= 2.34), libcurl4");
        curl.set_reverse_dependencies(["devscripts"]);
        curl.set_files(vec![("/usr/bin/curl".to_string(), 2048)]);
        registry.resolve(curl).unwrap();

        let mut libcurl = PackageRecord::new("libcurl4", "7.88.1");
        libcurl.set_reverse_dependencies(["curl", "python3-pycurl"]);
        libcurl.set_files(vec![
            ("/usr/lib/libcurl.so.4".to_string(), 1000),
            ("/usr/share/doc/libcurl4/copyright".to_string(), 24),
        ]);
        registry.resolve(libcurl).unwrap();

        registry.finalize().unwrap()
    }

    fn rendered(display: DisplayOptions) -> String {
        let mut out = Vec::new();
        render(&mut out, &inventory(), &display, &Palette::plain()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_full_report() {
        let text = rendered(DisplayOptions::default());

        assert!(text.contains("Package: curl  Version: 7.88.1  Architecture: amd64\n"));
        assert!(text.contains("  command line tool\n"));
        assert!(text.contains("  Depends:\n    libc6 (>= 2.34)\n    libcurl4\n"));
        assert!(text.contains("    devscripts [not installed]\n"));
        assert!(text.contains("    curl [installed]\n"));
        assert!(text.contains("    /usr/bin/curl  2.0 KB\n"));
        assert!(text.contains("  Installed size: 2.0 KB (1 file)\n"));
        assert!(text.contains("  Installed size: 1.0 KB (2 files)\n"));
        assert!(text.ends_with("Total installed size: 3.0 KB (2 packages)\n"));

        let curl_at = text.find("Package: curl").unwrap();
        let libcurl_at = text.find("Package: libcurl4").unwrap();
        assert!(curl_at < libcurl_at);
    }

    #[test]
    fn test_render_suppressed_sections() {
        let text = rendered(DisplayOptions {
            no_depend: true,
            no_rdepend: true,
            no_files: true,
            drop_not_installed: false,
        });

        assert!(!text.contains("Depends:"));
        assert!(!text.contains("Reverse Depends:"));
        assert!(!text.contains("Files:"));
        assert!(text.contains("Installed size:"));
    }

    #[test]
    fn test_render_drop_not_installed() {
        let text = rendered(DisplayOptions {
            drop_not_installed: true,
            ..Default::default()
        });

        assert!(text.contains("    curl [installed]\n"));
        assert!(!text.contains("python3-pycurl"));
        assert!(!text.contains("devscripts"));
    }

    #[test]
    fn test_render_empty_inventory() {
        let mut out = Vec::new();
        render(
            &mut out,
            &Inventory::default(),
            &DisplayOptions::default(),
            &Palette::plain(),
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No installed packages found.\n");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
