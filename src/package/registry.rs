//! In-memory store of every package known to a traversal.
//!
//! A name is either open (known, not yet examined) or resolved (complete
//! record present). Dropped names are removed outright, so the registry never
//! holds a half-populated entry.

use anyhow::{Result, bail, ensure};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::record::PackageRecord;

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Open,
    Resolved(PackageRecord),
}

#[derive(Debug, Default)]
pub struct Registry {
    slots: BTreeMap<String, Slot>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` as open unless it is already known.
    /// Returns `true` if the name was new.
    pub fn insert_open(&mut self, name: &str) -> bool {
        match self.slots.entry(name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(Slot::Open);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Snapshot of all names still waiting for examination.
    pub fn open_names(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Open))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn has_open(&self) -> bool {
        self.slots.values().any(|slot| matches!(slot, Slot::Open))
    }

    /// Move an open name to resolved. Each name resolves exactly once.
    pub fn resolve(&mut self, record: PackageRecord) -> Result<()> {
        match self.slots.get_mut(&record.name) {
            Some(slot) if matches!(slot, Slot::Open) => {
                *slot = Slot::Resolved(record);
                Ok(())
            }
            Some(_) => bail!("Package {} was already resolved", record.name),
            None => bail!("Package {} is not known to the registry", record.name),
        }
    }

    /// Remove an open name that turned out not to be installed.
    pub fn drop_open(&mut self, name: &str) -> Result<()> {
        match self.slots.get(name) {
            Some(Slot::Open) => {
                self.slots.remove(name);
                Ok(())
            }
            Some(Slot::Resolved(_)) => bail!("Package {} was already resolved", name),
            None => bail!("Package {} is not known to the registry", name),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        match self.slots.get(name) {
            Some(Slot::Resolved(record)) => Some(record),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Close the registry once no open names remain.
    ///
    /// Runs the reverse dependency fix-up against the final set of resolved
    /// packages and hands back a read-only inventory.
    pub fn finalize(self) -> Result<Inventory> {
        ensure!(
            !self.has_open(),
            "Cannot finalize while {} package(s) are still open",
            self.open_names().len()
        );

        let mut packages: BTreeMap<String, PackageRecord> = self
            .slots
            .into_iter()
            .filter_map(|(name, slot)| match slot {
                Slot::Resolved(record) => Some((name, record)),
                Slot::Open => None,
            })
            .collect();

        let resolved: Vec<String> = packages.keys().cloned().collect();
        for record in packages.values_mut() {
            for rdep in &mut record.reverse_dependencies {
                rdep.installed = resolved.binary_search(&rdep.package).is_ok();
            }
        }

        Ok(Inventory { packages })
    }
}

/// Finalized traversal result, keyed by package name.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    packages: BTreeMap<String, PackageRecord>,
}

impl Inventory {
    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    /// Packages in name order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Sum of installed bytes across all packages.
    pub fn total_installed_bytes(&self) -> u64 {
        self.packages.values().map(|p| p.total_installed_bytes).sum()
    }
}
