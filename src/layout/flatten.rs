use compact_str::CompactString;
use serde::Serialize;

use super::Rect;
use crate::store::types::HexColor;

/// One positioned, colored, labeled rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub rect: Rect,
    pub color: HexColor,
    pub label: CompactString,
}

/// Borrowed view of one tile inside a [`FlatLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRef<'a> {
    pub rect: Rect,
    pub color: HexColor,
    pub label: &'a str,
}

impl TileRef<'_> {
    pub fn to_tile(self) -> Tile {
        Tile {
            rect: self.rect,
            color: self.color,
            label: CompactString::new(self.label),
        }
    }
}

/// Result of processing one tile during expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Kept as-is
    Leaf(Tile),
    /// Replaced by its owners
    Group(Vec<Tile>),
}

/// Parallel rects / colors / labels, always the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatLayout {
    rects: Vec<Rect>,
    colors: Vec<HexColor>,
    labels: Vec<CompactString>,
}

impl FlatLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rects: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, tile: Tile) {
        self.rects.push(tile.rect);
        self.colors.push(tile.color);
        self.labels.push(tile.label);
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    pub fn labels(&self) -> &[CompactString] {
        &self.labels
    }

    pub fn tiles(&self) -> impl ExactSizeIterator<Item = TileRef<'_>> + '_ {
        self.rects
            .iter()
            .zip(&self.colors)
            .zip(&self.labels)
            .map(|((rect, color), label)| TileRef {
                rect: *rect,
                color: *color,
                label: label.as_str(),
            })
    }

    /// Sum of all tile areas.
    pub fn total_area(&self) -> f64 {
        self.rects.iter().map(Rect::area).sum()
    }
}

impl Extend<Tile> for FlatLayout {
    fn extend<I: IntoIterator<Item = Tile>>(&mut self, iter: I) {
        for tile in iter {
            self.push(tile);
        }
    }
}

impl FromIterator<Tile> for FlatLayout {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut layout = FlatLayout::new();
        layout.extend(iter);
        layout
    }
}

/// Remove one level of grouping: leaves and groups are concatenated in order.
pub fn flatten(slots: Vec<Slot>) -> FlatLayout {
    let total = slots
        .iter()
        .map(|slot| match slot {
            Slot::Leaf(_) => 1,
            Slot::Group(tiles) => tiles.len(),
        })
        .sum();
    let mut layout = FlatLayout::with_capacity(total);
    for slot in slots {
        match slot {
            Slot::Leaf(tile) => layout.push(tile),
            Slot::Group(tiles) => layout.extend(tiles),
        }
    }
    layout
}
