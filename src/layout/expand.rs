//! Depth-bounded expansion of an ownership treemap.
//!
//! Level 0 packs the root's owners into the frame. Each further level takes
//! the previous [`FlatLayout`] and replaces every tile with its own owners,
//! packed inside that tile. Levels are pure: the input snapshot is never
//! mutated and the caller gets a fresh layout back.

use compact_str::CompactString;

use super::flatten::{flatten, FlatLayout, Slot, Tile, TileRef};
use super::normalize::normalize_sizes;
use super::squarify::squarify;
use super::{LayoutConfig, Rect};
use crate::error::{LayoutError, Result};
use crate::render::colors::{ColorPolicy, NEUTRAL_GRAY};
use crate::store::types::{HexColor, OwnershipEdge, SELF_MARKER};
use crate::store::{OwnershipStore, Resolved};

/// Slack when checking that a group's shares add up to a whole.
const COVERAGE_TOLERANCE: f64 = 1e-6;

/// Outcome of one expansion level.
#[derive(Debug, Clone)]
pub struct Level {
    pub layout: FlatLayout,
    /// Tiles replaced by a group of owners
    pub expanded: usize,
    /// Tiles kept as-is (Self markers and entities without data)
    pub leaves: usize,
}

/// Build the root layout and expand it `config.max_depth` times.
pub fn expand(store: &OwnershipStore, config: &LayoutConfig) -> Result<FlatLayout> {
    let policy = ColorPolicy::new(config.terminal_blackout);
    let mut layout = root_layout(store, &config.root, config.frame)?;

    for depth in 1..=config.max_depth {
        let level = expand_level(store, &layout, policy, config.include_self)?;
        tracing::info!(
            "Depth {}: {} tiles ({} expanded, {} kept)",
            depth,
            level.layout.len(),
            level.expanded,
            level.leaves
        );
        layout = level.layout;

        if level.expanded == 0 {
            tracing::info!("Nothing left to expand after depth {}, stopping early", depth);
            break;
        }
    }

    Ok(layout)
}

/// Pack the root entity's owners into `frame` (colors as recorded).
///
/// Unknown roots use the Default entity's owners. If even Default is empty
/// the root is returned as a single full-frame tile.
pub fn root_layout(store: &OwnershipStore, root: &str, frame: Rect) -> Result<FlatLayout> {
    let resolved = match store.children(root) {
        Ok(resolved) => resolved,
        Err(LayoutError::NoDataForEntity { .. }) => {
            tracing::warn!("No ownership data for '{}' or the Default entity", root);
            let color = store.self_marker(root).map_or(NEUTRAL_GRAY, |m| m.color);
            let mut layout = FlatLayout::with_capacity(1);
            layout.push(Tile {
                rect: frame,
                color,
                label: CompactString::new(root),
            });
            return Ok(layout);
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        "Root '{}' resolved to '{}' with {} owners",
        root,
        resolved.entity,
        resolved.edges.len()
    );

    let tiles = pack_group(&resolved, frame, ColorPolicy::default())?;
    Ok(tiles.into_iter().collect())
}

/// Replace every tile of `layout` with its owners, in order.
pub fn expand_level(
    store: &OwnershipStore,
    layout: &FlatLayout,
    policy: ColorPolicy,
    include_self: bool,
) -> Result<Level> {
    let mut expanded = 0;
    let mut leaves = 0;
    let mut slots = Vec::with_capacity(layout.len());

    for tile in layout.tiles() {
        let slot = expand_tile(store, tile, policy, include_self)?;
        match slot {
            Slot::Leaf(_) => leaves += 1,
            Slot::Group(_) => expanded += 1,
        }
        slots.push(slot);
    }

    Ok(Level {
        layout: flatten(slots),
        expanded,
        leaves,
    })
}

/// Expand one tile into the group of its owners, or keep it as a leaf.
pub fn expand_tile(
    store: &OwnershipStore,
    tile: TileRef<'_>,
    policy: ColorPolicy,
    include_self: bool,
) -> Result<Slot> {
    if tile.label == SELF_MARKER {
        return Ok(Slot::Leaf(tile.to_tile()));
    }

    let lookup = if include_self {
        store.children_with_self(tile.label)
    } else {
        store.children(tile.label)
    };

    match lookup {
        Ok(resolved) => Ok(Slot::Group(pack_group(&resolved, tile.rect, policy)?)),
        Err(LayoutError::NoDataForEntity { entity }) => {
            tracing::debug!("'{}' has no owners to expand, keeping it as a leaf", entity);
            Ok(Slot::Leaf(tile.to_tile()))
        }
        Err(e) => Err(e),
    }
}

/// Normalize a resolved group's shares into `container` and pack them.
fn pack_group(resolved: &Resolved<'_>, container: Rect, policy: ColorPolicy) -> Result<Vec<Tile>> {
    let edges: &[OwnershipEdge] = resolved.edges;
    let weights: Vec<f64> = edges.iter().map(|e| e.ownership).collect();

    // Shares need not sum to 1; the group fills its container either way
    let coverage: f64 = weights.iter().sum();
    if (coverage - 1.0).abs() > COVERAGE_TOLERANCE {
        tracing::debug!(
            "Owners of '{}' cover {:.4} of it, scaling to fill",
            resolved.entity,
            coverage
        );
    }

    let areas = normalize_sizes(&weights, container.area())?;
    let rects = squarify(&areas, container)?;

    let mut colors: Vec<HexColor> = edges.iter().map(|e| e.color).collect();
    policy.apply(&mut colors);

    Ok(edges
        .iter()
        .zip(rects)
        .zip(colors)
        .map(|((edge, rect), color)| Tile {
            rect,
            color,
            label: edge.child.clone(),
        })
        .collect())
}
