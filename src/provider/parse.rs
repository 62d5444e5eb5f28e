//! Parsers for `dpkg-query` and `apt-cache` output.

use std::path::PathBuf;

use super::StatusReport;
use crate::package::strip_arch_qualifier;

/// Parse the first stanza printed by `dpkg-query --status`.
///
/// Fields are `Name: value` with a single separating space; lines starting
/// with whitespace continue the previous field.
pub fn parse_status(text: &str) -> Result<StatusReport, String> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if fields.is_empty() {
                continue;
            }
            break;
        }

        if line.starts_with([' ', '\t']) {
            let Some((_, value)) = fields.last_mut() else {
                return Err(format!("continuation line before any field: {:?}", line));
            };
            value.push('\n');
            value.push_str(&line[1..]);
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(format!("line is not a field: {:?}", line));
        };
        let value = value.strip_prefix(' ').unwrap_or(value).trim_end();
        fields.push((name.trim().to_lowercase(), value.to_string()));
    }

    let lookup = |name: &str| {
        fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
    };

    let package = lookup("package").ok_or_else(|| "missing Package field".to_string())?;
    let version = lookup("version").ok_or_else(|| "missing Version field".to_string())?;

    Ok(StatusReport {
        package,
        version,
        fields,
    })
}

/// Whether the stanza's `Status` field leaves the package on disk.
///
/// Only `not-installed` and `config-files` count as absent; transient states
/// such as `unpacked` or `triggers-pending` are installed. Stanzas without a
/// `Status` field are taken at face value.
pub fn is_installed(report: &StatusReport) -> bool {
    report.field("status").is_none_or(|status| {
        !matches!(
            status.split_whitespace().last(),
            Some("not-installed" | "config-files")
        )
    })
}

/// Parse `dpkg-query --search` output into owning package names.
pub fn parse_owner_search(text: &str) -> Vec<String> {
    let mut owners: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("diversion by") || line.starts_with("local diversion") {
            continue;
        }
        let Some((packages, _path)) = line.split_once(": ") else {
            continue;
        };
        for name in packages.split(',') {
            let name = strip_arch_qualifier(name.trim());
            if !name.is_empty() && !owners.iter().any(|o| o == name) {
                owners.push(name.to_string());
            }
        }
    }
    owners
}

/// Parse `apt-cache rdepends` output into reverse dependency names.
///
/// Returns an error when the `Reverse Depends:` header is missing.
pub fn parse_rdepends(package: &str, text: &str) -> Result<Vec<String>, String> {
    let mut lines = text.lines();
    if !lines.any(|line| line.trim() == "Reverse Depends:") {
        return Err("missing 'Reverse Depends:' header".to_string());
    }

    let mut names: Vec<String> = Vec::new();
    for line in lines {
        let name = strip_arch_qualifier(line.trim().trim_start_matches('|'));
        if name.is_empty() || name == package || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Parse `dpkg-query --listfiles` output, keeping absolute paths only.
pub fn parse_file_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| line.starts_with('/'))
        .map(PathBuf::from)
        .collect()
}
