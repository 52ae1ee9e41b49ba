/// Diagnostic tool to verify the table → store → layout pipeline
use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use stakemap::layout::expand::{expand_level, root_layout};
use stakemap::layout::{FlatLayout, Rect};
use stakemap::render::colors::ColorPolicy;
use stakemap::store::table::load_table;
use stakemap::store::OwnershipStore;

/// Pairwise overlap checks are quadratic; skip them past this size.
const OVERLAP_CHECK_LIMIT: usize = 2_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stakemap=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let table_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("megacorp_db.csv"));
    let root = args.next().unwrap_or_else(|| "Default".to_string());
    let depth: u32 = match args.next() {
        Some(d) => d.parse().with_context(|| format!("invalid depth '{d}'"))?,
        None => 2,
    };

    println!("=== DIAGNOSTIC: Table → Store → Layout Pipeline ===");
    println!("Table: {}", table_path.display());

    // Load
    let edges = load_table(&table_path)?;
    let self_rows = edges.iter().filter(|e| e.is_self_marker()).count();
    println!("\n[1] Table loaded: {} rows ({} Self records)", edges.len(), self_rows);

    // Index
    let store = OwnershipStore::from_edges(edges);
    println!("\n[2] Store built: {} parents", store.parents().count());
    match store.children(&root) {
        Ok(resolved) => {
            println!(
                "    Root '{}' → '{}'{} with {} owners",
                root,
                resolved.entity,
                if resolved.fallback { " (fallback)" } else { "" },
                resolved.edges.len()
            );
            for (i, edge) in resolved.edges.iter().take(10).enumerate() {
                println!("    [{}] '{}' {:.4} {}", i, edge.child, edge.ownership, edge.color);
            }
        }
        Err(e) => println!("    Root '{}': {}", root, e),
    }

    // Expand level by level
    println!("\n[3] Expansion (max depth {}):", depth);
    let mut layout = root_layout(&store, &root, Rect::UNIT)?;
    report_level(0, &layout);
    for level in 1..=depth {
        let next = expand_level(&store, &layout, ColorPolicy::default(), false)?;
        println!("    expanded {} tiles, kept {} leaves", next.expanded, next.leaves);
        layout = next.layout;
        report_level(level, &layout);
        if next.expanded == 0 {
            break;
        }
    }

    // Largest tiles
    println!("\n[4] Top 10 largest tiles by area:");
    let mut by_area: Vec<_> = layout.tiles().collect();
    by_area.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));
    for (i, tile) in by_area.iter().take(10).enumerate() {
        let r = tile.rect;
        println!(
            "    [{}] '{}' - {:.4}x{:.4} ({:.5}) at ({:.4}, {:.4}) {}",
            i,
            tile.label,
            r.w,
            r.h,
            r.area(),
            r.x,
            r.y,
            tile.color
        );
    }

    // Most frequent labels
    println!("\n[5] Most frequent labels:");
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in layout.labels() {
        *counts.entry(label.as_str()).or_default() += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    for (label, count) in counts.iter().take(10) {
        println!("    {:>6}  {}", count, label);
    }

    Ok(())
}

fn report_level(depth: u32, layout: &FlatLayout) {
    let total_area = layout.total_area();
    let equal = layout.rects().len() == layout.colors().len()
        && layout.colors().len() == layout.labels().len();
    let escaped = layout
        .rects()
        .iter()
        .filter(|r| !Rect::UNIT.contains_rect(r, 1e-9) || r.w <= 0.0 || r.h <= 0.0)
        .count();

    println!(
        "    depth {}: {} tiles, area {:.9}, lengths {}, {} out of frame",
        depth,
        layout.len(),
        total_area,
        if equal { "equal" } else { "MISMATCHED" },
        escaped
    );

    if layout.len() <= OVERLAP_CHECK_LIMIT {
        let rects = layout.rects();
        let overlaps = rects
            .iter()
            .enumerate()
            .flat_map(|(i, a)| rects[i + 1..].iter().map(move |b| a.intersection_area(b)))
            .filter(|&shared| shared > 1e-12)
            .count();
        if overlaps > 0 {
            println!("    ✗ {} overlapping pairs", overlaps);
        }
    }
}
