use std::fmt;

use compact_str::CompactString;
use serde::{Serialize, Serializer};

/// Child name reserved for an entity's own identity record.
pub const SELF_MARKER: &str = "Self";

/// Parent whose children stand in for any entity without records.
pub const DEFAULT_ENTITY: &str = "Default";

/// 24-bit sRGB color as stored in the ownership table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (hex digits in either case).
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the ownership table: `parent` is owned by `child` at `ownership`.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnershipEdge {
    pub parent: CompactString,
    /// Owner name, also used as the tile label
    pub child: CompactString,
    /// Share in (0, 1]; Self markers may carry a tiny placeholder value
    pub ownership: f64,
    pub color: HexColor,
}

impl OwnershipEdge {
    pub fn new(parent: &str, child: &str, ownership: f64, color: HexColor) -> Self {
        Self {
            parent: CompactString::new(parent),
            child: CompactString::new(child),
            ownership,
            color,
        }
    }

    pub fn is_self_marker(&self) -> bool {
        self.child == SELF_MARKER
    }
}
