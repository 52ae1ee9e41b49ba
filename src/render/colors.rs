use crate::store::types::HexColor;

/// Sentinel left untouched by terminal blackout (e.g. retail holders).
pub const WHITE: HexColor = HexColor::new(0xff, 0xff, 0xff);
/// Sentinel left untouched by terminal blackout (e.g. insiders).
pub const NEUTRAL_GRAY: HexColor = HexColor::new(0x79, 0x79, 0x79);
pub const BLACK: HexColor = HexColor::new(0x00, 0x00, 0x00);

/// Color rules applied to tiles produced by expansion (never the top level).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorPolicy {
    /// Paint every non-sentinel expanded tile black, marking branches
    /// that would keep splitting with more depth.
    pub terminal_blackout: bool,
}

impl ColorPolicy {
    pub const fn new(terminal_blackout: bool) -> Self {
        Self { terminal_blackout }
    }

    fn recolor(&self, color: HexColor) -> HexColor {
        if self.terminal_blackout && !is_sentinel(color) {
            BLACK
        } else {
            color
        }
    }

    pub fn apply(&self, colors: &mut [HexColor]) {
        for color in colors {
            *color = self.recolor(*color);
        }
    }
}

pub fn is_sentinel(color: HexColor) -> bool {
    color == WHITE || color == NEUTRAL_GRAY
}

/// Label ink for a tile face: white on very dark faces, black elsewhere.
pub fn label_color(face: HexColor) -> HexColor {
    let luma = 0.134 * face.r as f32 + 0.125 * face.g as f32 + 0.147 * face.b as f32;
    if luma < 10.0 {
        WHITE
    } else {
        BLACK
    }
}
