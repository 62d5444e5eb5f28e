//! Package model
//!
//! This module holds the per-package record collected during a traversal,
//! the relation field decomposition, and the registry tracking which
//! packages are open or resolved.

mod record;
mod registry;
mod relation;

pub use record::{PackageRecord, ReverseDependency};
pub use registry::{Inventory, Registry};
pub use relation::{Dependency, RelationKind, parse_relation_list, strip_arch_qualifier};
