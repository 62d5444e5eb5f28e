use serde::Serialize;
use std::collections::BTreeMap;

use super::relation::{Dependency, RelationKind, parse_relation_list};

/// A package that declares a relation back on the package holding this entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseDependency {
    pub package: String,
    /// Whether `package` was resolved during the same traversal.
    /// Only meaningful after the registry has been finalized.
    pub installed: bool,
}

impl ReverseDependency {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            installed: false,
        }
    }
}

/// Observed facts about one installed package.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PackageRecord {
    #[serde(skip)]
    pub name: String,
    pub version: String,
    /// Remaining scalar status fields (architecture, maintainer, ...)
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(flatten)]
    pub relations: BTreeMap<RelationKind, Vec<Dependency>>,
    #[serde(rename = "rdepend")]
    pub reverse_dependencies: Vec<ReverseDependency>,
    pub files: BTreeMap<String, u64>,
    #[serde(rename = "installed")]
    pub total_installed_bytes: u64,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Store one status field. Relation fields are decomposed into package
    /// references, everything else is kept verbatim under its lower-cased name.
    pub fn set_field(&mut self, field: &str, value: &str) {
        let field = field.to_lowercase();
        match field.as_str() {
            "package" | "version" => {}
            _ => match field.parse::<RelationKind>() {
                Ok(kind) => {
                    self.relations.insert(kind, parse_relation_list(value));
                }
                Err(_) => {
                    self.fields.insert(field, value.to_string());
                }
            },
        }
    }

    pub fn relation(&self, kind: RelationKind) -> &[Dependency] {
        self.relations.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Forward dependencies walked when following the dependency graph.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.relations
            .iter()
            .filter(|(kind, _)| kind.is_forward_dependency())
            .flat_map(|(_, deps)| deps.iter())
    }

    pub fn set_reverse_dependencies<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reverse_dependencies = names.into_iter().map(ReverseDependency::new).collect();
    }

    /// Replace the file listing and recompute the installed byte total.
    pub fn set_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        self.files = files.into_iter().collect();
        self.total_installed_bytes = self.files.values().sum();
    }

    /// First line of the package description, if any.
    pub fn summary(&self) -> Option<&str> {
        self.fields
            .get("description")
            .and_then(|d| d.lines().next())
            .filter(|line| !line.trim().is_empty())
    }
}
