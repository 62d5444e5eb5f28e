//! Package relationship fields and their list decomposition.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Status fields whose value is a comma separated list of package references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    Depends,
    PreDepends,
    Recommends,
    Suggests,
    Conflicts,
    Breaks,
    Replaces,
}

impl RelationKind {
    pub const ALL: [RelationKind; 7] = [
        RelationKind::Depends,
        RelationKind::PreDepends,
        RelationKind::Recommends,
        RelationKind::Suggests,
        RelationKind::Conflicts,
        RelationKind::Breaks,
        RelationKind::Replaces,
    ];

    /// Field name as used in the status database, lower-cased.
    pub fn field_name(self) -> &'static str {
        match self {
            RelationKind::Depends => "depends",
            RelationKind::PreDepends => "pre-depends",
            RelationKind::Recommends => "recommends",
            RelationKind::Suggests => "suggests",
            RelationKind::Conflicts => "conflicts",
            RelationKind::Breaks => "breaks",
            RelationKind::Replaces => "replaces",
        }
    }

    /// Section title for terminal output.
    pub fn title(self) -> &'static str {
        match self {
            RelationKind::Depends => "Depends",
            RelationKind::PreDepends => "Pre-Depends",
            RelationKind::Recommends => "Recommends",
            RelationKind::Suggests => "Suggests",
            RelationKind::Conflicts => "Conflicts",
            RelationKind::Breaks => "Breaks",
            RelationKind::Replaces => "Replaces",
        }
    }

    /// Whether following dependencies walks along this relation.
    pub fn is_forward_dependency(self) -> bool {
        matches!(self, RelationKind::Depends | RelationKind::PreDepends)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for RelationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.field_name() == lower)
            .ok_or_else(|| anyhow::anyhow!("Unknown relation field: {}", s))
    }
}

/// One package reference of a relation field, e.g. `libc6 (>= 2.7)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Dependency {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: None,
        }
    }

    pub fn with_version(package: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: Some(version.into()),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({})", self.package, version),
            None => f.write_str(&self.package),
        }
    }
}

/// Strip a multi-arch qualifier (`python3:any`, `libc6:amd64`).
pub fn strip_arch_qualifier(name: &str) -> &str {
    name.split_once(':').map_or(name, |(base, _)| base)
}

/// Decompose a raw relation value into package references.
///
/// Alternatives (`a | b`) become separate entries in their listed order.
/// Empty entries are skipped, so an empty value yields an empty list.
pub fn parse_relation_list(value: &str) -> Vec<Dependency> {
    value
        .split(',')
        .flat_map(|group| group.split('|'))
        .filter_map(parse_reference)
        .collect()
}

fn parse_reference(reference: &str) -> Option<Dependency> {
    let reference = reference.trim();
    let (name, rest) = match reference.find(|c: char| c.is_whitespace() || c == '(') {
        Some(idx) => reference.split_at(idx),
        None => (reference, ""),
    };

    let name = strip_arch_qualifier(name);
    if name.is_empty() {
        return None;
    }

    let version = rest
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.split_once(')'))
        .map(|(inner, _)| inner.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|v| !v.is_empty());

    Some(Dependency {
        package: name.to_string(),
        version,
    })
}
