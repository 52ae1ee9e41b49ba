pub mod table;
pub mod types;

use std::collections::HashMap;

use compact_str::CompactString;

use self::types::{OwnershipEdge, DEFAULT_ENTITY};
use crate::error::{LayoutError, Result};

/// Ownership records of one parent.
#[derive(Debug, Default)]
struct Group {
    /// Regular owners, largest share first (ties keep record order)
    children: Vec<OwnershipEdge>,
    /// Same as `children` with the Self marker merged in
    with_self: Vec<OwnershipEdge>,
    self_marker: Option<OwnershipEdge>,
}

/// Outcome of a child lookup.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Entity whose records were used (the requested one, or Default)
    pub entity: &'a str,
    pub edges: &'a [OwnershipEdge],
    /// The requested entity had no records and Default stood in for it
    pub fallback: bool,
}

/// Read-only index of ownership records keyed by parent.
#[derive(Debug, Default)]
pub struct OwnershipStore {
    groups: HashMap<CompactString, Group>,
    /// Parents in first-seen order
    parents: Vec<CompactString>,
    edge_count: usize,
}

impl OwnershipStore {
    /// Group the given rows by parent.
    pub fn from_edges(edges: impl IntoIterator<Item = OwnershipEdge>) -> Self {
        let mut store = OwnershipStore::default();

        for edge in edges {
            store.edge_count += 1;
            if !store.groups.contains_key(&edge.parent) {
                store.parents.push(edge.parent.clone());
            }
            let group = store.groups.entry(edge.parent.clone()).or_default();

            if edge.is_self_marker() {
                if group.self_marker.is_some() {
                    tracing::warn!("Duplicate Self record for '{}', keeping the first", edge.parent);
                    continue;
                }
                group.self_marker = Some(edge.clone());
                // A zero placeholder share would pack into a degenerate tile
                if edge.ownership <= 0.0 {
                    continue;
                }
            } else {
                group.children.push(edge.clone());
            }
            group.with_self.push(edge);
        }

        // Stable sort: equal shares stay in record order
        for group in store.groups.values_mut() {
            group.children.sort_by(|a, b| b.ownership.total_cmp(&a.ownership));
            group.with_self.sort_by(|a, b| b.ownership.total_cmp(&a.ownership));
        }

        tracing::debug!(
            "Ownership store: {} rows across {} parents",
            store.edge_count,
            store.parents.len()
        );

        store
    }

    /// Owners of `parent`, largest share first, without the Self marker.
    /// Falls back to the Default entity when `parent` has no owners.
    pub fn children<'a>(&'a self, parent: &str) -> Result<Resolved<'a>> {
        self.resolve(parent, false)
    }

    /// Like [`children`](Self::children) but with the resolved entity's
    /// Self marker merged into the ordering.
    pub fn children_with_self<'a>(&'a self, parent: &str) -> Result<Resolved<'a>> {
        self.resolve(parent, true)
    }

    fn resolve<'a>(&'a self, parent: &str, include_self: bool) -> Result<Resolved<'a>> {
        let pick = |(name, group): (&'a CompactString, &'a Group)| {
            let edges = if include_self {
                &group.with_self
            } else {
                &group.children
            };
            (name.as_str(), edges.as_slice())
        };

        if let Some((entity, edges)) = self
            .groups
            .get_key_value(parent)
            .map(pick)
            .filter(|(_, edges)| !edges.is_empty())
        {
            return Ok(Resolved {
                entity,
                edges,
                fallback: false,
            });
        }

        tracing::debug!("No owners recorded for '{}', using {}", parent, DEFAULT_ENTITY);

        self.groups
            .get_key_value(DEFAULT_ENTITY)
            .map(pick)
            .filter(|(_, edges)| !edges.is_empty())
            .map(|(entity, edges)| Resolved {
                entity,
                edges,
                fallback: true,
            })
            .ok_or_else(|| LayoutError::NoDataForEntity {
                entity: CompactString::new(parent),
            })
    }

    /// The Self record of `entity`, if one exists.
    pub fn self_marker(&self, entity: &str) -> Option<&OwnershipEdge> {
        self.groups.get(entity)?.self_marker.as_ref()
    }

    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.parents.iter().map(|p| p.as_str())
    }

    /// Number of rows indexed, Self markers included.
    pub fn len(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::types::HexColor;
    use super::*;

    const GRAY: HexColor = HexColor::new(0x79, 0x79, 0x79);

    fn edge(parent: &str, child: &str, ownership: f64) -> OwnershipEdge {
        OwnershipEdge::new(parent, child, ownership, GRAY)
    }

    fn labels<'a>(resolved: &'a Resolved<'a>) -> Vec<&'a str> {
        resolved.edges.iter().map(|e| e.child.as_str()).collect()
    }

    #[test]
    fn children_sorted_descending_with_stable_ties() {
        let store = OwnershipStore::from_edges([
            edge("A", "x", 0.2),
            edge("A", "y", 0.5),
            edge("A", "z", 0.2),
            edge("A", "Self", 1e-10),
        ]);
        let resolved = store.children("A").unwrap();
        assert!(!resolved.fallback);
        assert_eq!(resolved.entity, "A");
        assert_eq!(labels(&resolved), ["y", "x", "z"]);

        let with_self = store.children_with_self("A").unwrap();
        assert_eq!(labels(&with_self), ["y", "x", "z", "Self"]);
    }

    #[test]
    fn unknown_entity_falls_back_to_default() {
        let store = OwnershipStore::from_edges([edge("Default", "Retail", 0.7), edge("Default", "Insider", 0.3)]);
        let resolved = store.children("Nobody").unwrap();
        assert!(resolved.fallback);
        assert_eq!(resolved.entity, "Default");
        assert_eq!(labels(&resolved), ["Retail", "Insider"]);
    }

    #[test]
    fn self_only_parent_counts_as_unknown() {
        let store = OwnershipStore::from_edges([edge("A", "Self", 1e-10), edge("Default", "Retail", 1.0)]);
        assert!(store.parents().any(|p| p == "A"));
        assert!(store.children("A").unwrap().fallback);
        assert!(store.self_marker("A").is_some());

        let with_self = store.children_with_self("A").unwrap();
        assert!(!with_self.fallback);
        assert_eq!(labels(&with_self), ["Self"]);
    }

    #[test]
    fn missing_default_is_no_data() {
        let store = OwnershipStore::from_edges([edge("A", "B", 1.0)]);
        let err = store.children("C").unwrap_err();
        assert_eq!(err, LayoutError::NoDataForEntity { entity: "C".into() });
    }

    #[test]
    fn duplicate_self_marker_keeps_first() {
        let first = OwnershipEdge::new("A", "Self", 0.0, HexColor::new(1, 2, 3));
        let store = OwnershipStore::from_edges([first.clone(), edge("A", "Self", 0.0)]);
        assert_eq!(store.self_marker("A"), Some(&first));
        assert_eq!(store.len(), 2);
        assert_eq!(store.parents().collect::<Vec<_>>(), ["A"]);
    }

    #[test]
    fn zero_share_self_marker_is_not_packed() {
        let store = OwnershipStore::from_edges([edge("A", "B", 1.0), edge("A", "Self", 0.0)]);
        assert_eq!(labels(&store.children_with_self("A").unwrap()), ["B"]);
    }
}
