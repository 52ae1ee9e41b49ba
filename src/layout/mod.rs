pub mod expand;
pub mod flatten;
pub mod normalize;
pub mod squarify;

use compact_str::CompactString;
use serde::Serialize;

pub use self::flatten::{flatten, FlatLayout, Slot, Tile};

use crate::error::{LayoutError, Result};
use crate::store::types::DEFAULT_ENTITY;
use crate::store::OwnershipStore;

/// Axis-aligned rectangle in frame coordinates (the unit square by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "width")]
    pub w: f64,
    #[serde(rename = "height")]
    pub h: f64,
}

impl Rect {
    pub const UNIT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether `other` lies inside `self`, allowing `eps` of slack on each edge.
    pub fn contains_rect(&self, other: &Rect, eps: f64) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Area shared with `other` (0 when they only touch).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Configuration for an ownership treemap build.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Entity whose owners form the top level
    pub root: CompactString,
    /// Number of expansion rounds after the top level.
    /// Tile count grows roughly as branching^depth, keep this small.
    pub max_depth: u32,
    /// Recolor every expanded (non-root) tile black, except the white and gray sentinels
    pub terminal_blackout: bool,
    /// Skip expansion and draw just the root as one full-frame tile
    pub self_only: bool,
    /// Include each entity's Self record as a terminal tile when expanding
    pub include_self: bool,
    /// Frame the top level is packed into
    pub frame: Rect,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root: CompactString::new(DEFAULT_ENTITY),
            max_depth: 0,
            terminal_blackout: false,
            self_only: false,
            include_self: false,
            frame: Rect::UNIT,
        }
    }
}

/// Compute the flat layout for `config.root`.
pub fn compute_layout(store: &OwnershipStore, config: &LayoutConfig) -> Result<FlatLayout> {
    if config.self_only {
        return self_layout(store, &config.root, config.frame);
    }
    expand::expand(store, config)
}

/// A single full-frame tile for `root`, colored from its Self record
/// (or the Default entity's Self record when it has none).
pub fn self_layout(store: &OwnershipStore, root: &str, frame: Rect) -> Result<FlatLayout> {
    let marker = store
        .self_marker(root)
        .or_else(|| {
            tracing::debug!("No Self record for '{}', using {}'s", root, DEFAULT_ENTITY);
            store.self_marker(DEFAULT_ENTITY)
        })
        .ok_or_else(|| LayoutError::MissingSelfMarker {
            entity: CompactString::new(root),
        })?;

    tracing::info!("Self view of '{}'", root);

    let mut layout = FlatLayout::with_capacity(1);
    layout.push(Tile {
        rect: frame,
        color: marker.color,
        label: CompactString::new(root),
    });
    Ok(layout)
}
