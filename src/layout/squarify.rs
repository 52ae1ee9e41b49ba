use super::Rect;
use crate::error::{LayoutError, Result};

/// Relative slack allowed between the summed areas and the container area.
pub const AREA_TOLERANCE: f64 = 1e-6;

/// Squarified layout (Bruls, Huizing & van Wijk 2000).
///
/// `areas` must already be normalized to the container's area. Rows are laid
/// along the shorter side of the remaining space and grown while the worst
/// aspect ratio keeps improving. Output order matches input order; callers
/// sort descending for the best shapes.
pub fn squarify(areas: &[f64], container: Rect) -> Result<Vec<Rect>> {
    if areas.is_empty() {
        return Ok(Vec::new());
    }

    let expected = container.area();
    let actual: f64 = areas.iter().sum();
    let slack = AREA_TOLERANCE * expected.abs().max(f64::MIN_POSITIVE);
    if !actual.is_finite() || (actual - expected).abs() > slack {
        return Err(LayoutError::AreaMismatch { expected, actual });
    }

    // Absorb the tolerated residue so rows never overrun the container
    let scale = if actual > 0.0 { expected / actual } else { 1.0 };
    let areas: Vec<f64> = areas.iter().map(|a| a * scale).collect();

    let mut result = Vec::with_capacity(areas.len());
    let mut free = container;
    let mut start = 0;

    while start < areas.len() {
        let short = free.w.min(free.h);

        let mut end = start + 1;
        let mut row_sum = areas[start];
        let mut worst = worst_aspect_ratio(&areas[start..end], row_sum, short);
        while end < areas.len() {
            let sum = row_sum + areas[end];
            let score = worst_aspect_ratio(&areas[start..=end], sum, short);
            if score > worst {
                break;
            }
            row_sum = sum;
            worst = score;
            end += 1;
        }

        let last = end == areas.len();
        free = layout_row(&areas[start..end], row_sum, free, last, &mut result);
        start = end;
    }

    Ok(result)
}

/// Place one row against the shorter side of `free` and return what is left.
/// The last row takes all remaining space so the container is covered exactly.
fn layout_row(row: &[f64], row_sum: f64, free: Rect, last: bool, out: &mut Vec<Rect>) -> Rect {
    // Wide space: a column on the left edge. Tall space: a row along the top.
    let vertical = free.w >= free.h;
    let (long, extent) = if vertical { (free.h, free.w) } else { (free.w, free.h) };
    let thickness = if last {
        extent
    } else {
        (row_sum / long.max(f64::MIN_POSITIVE)).min(extent)
    };

    let mut offset = 0.0;
    for (i, &area) in row.iter().enumerate() {
        let length = if i + 1 == row.len() {
            (long - offset).max(0.0)
        } else {
            area / thickness.max(f64::MIN_POSITIVE)
        };

        let rect = if vertical {
            Rect::new(free.x, free.y + offset, thickness, length)
        } else {
            Rect::new(free.x + offset, free.y, length, thickness)
        };
        out.push(rect);
        offset += length;
    }

    if vertical {
        Rect::new(free.x + thickness, free.y, (free.w - thickness).max(0.0), free.h)
    } else {
        Rect::new(free.x, free.y + thickness, free.w, (free.h - thickness).max(0.0))
    }
}

fn worst_aspect_ratio(row: &[f64], sum: f64, side: f64) -> f64 {
    if row.is_empty() || sum <= 0.0 || side <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let max_r = row.iter().copied().fold(0.0, f64::max);
    let min_r = row.iter().copied().fold(f64::INFINITY, f64::min);
    let a = (side_sq * max_r) / sum_sq;
    let b = sum_sq / (side_sq * min_r);
    a.max(b)
}
