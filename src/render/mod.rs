pub mod colors;

use std::io::{self, Write};

use crate::layout::FlatLayout;
use colors::label_color;

/// Write the layout as `{"rects": [...], "colors": [...], "labels": [...]}`.
pub fn write_json<W: Write>(layout: &FlatLayout, writer: W, pretty: bool) -> serde_json::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, layout)
    } else {
        serde_json::to_writer(writer, layout)
    }
}

/// Write one aligned row per tile: geometry, face color, label ink and label.
pub fn write_table<W: Write>(layout: &FlatLayout, mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "{:>5}  {:>8} {:>8} {:>8} {:>8}  {:<7}  {:<7}  label",
        "#", "x", "y", "width", "height", "color", "ink"
    )?;
    for (i, tile) in layout.tiles().enumerate() {
        let r = tile.rect;
        writeln!(
            writer,
            "{:>5}  {:>8.5} {:>8.5} {:>8.5} {:>8.5}  {}  {}  {}",
            i,
            r.x,
            r.y,
            r.w,
            r.h,
            tile.color,
            label_color(tile.color),
            tile.label
        )?;
    }
    Ok(())
}
