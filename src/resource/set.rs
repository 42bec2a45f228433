//! The resource catalog behind the aggregate client set.

use serde::Serialize;

use crate::classify::ResourceBuckets;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindEntry {
    pub kind: String,
    pub scoped: bool,
}

/// All kinds of one (group, version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSetEntry {
    pub group: String,
    pub version: String,
    pub kinds: Vec<KindEntry>,
}

/// Serialized as `{ "set": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResourceSet {
    pub set: Vec<ResourceSetEntry>,
}

impl ResourceSet {
    /// Total number of kinds across all groups and versions.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.set.iter().map(|entry| entry.kinds.len()).sum()
    }
}

/// Flatten the main-resource buckets, reading `scoped` directly off each raw entry.
#[must_use]
pub fn build_resource_set(main: &ResourceBuckets) -> ResourceSet {
    let set = main
        .iter()
        .map(|(group, version, document)| ResourceSetEntry {
            group: group.to_string(),
            version: version.to_string(),
            kinds: document
                .schemas()
                .iter()
                .map(|(kind, entry)| KindEntry {
                    kind: kind.clone(),
                    scoped: entry.scoped(),
                })
                .collect(),
        })
        .collect();

    ResourceSet {
        set,
    }
}
