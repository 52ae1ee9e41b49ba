use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use compact_str::CompactString;

use stakemap::layout::{compute_layout, LayoutConfig};
use stakemap::render;
use stakemap::store::table::load_table;
use stakemap::store::OwnershipStore;

/// Beyond this many tiles the output gets unwieldy for most renderers.
const LARGE_LAYOUT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

/// Lay out who owns whom as a nested squarified treemap.
#[derive(Debug, Parser)]
#[command(name = "stakemap", version)]
struct Cli {
    /// Ownership table (CSV with parent, child, ownership, color columns)
    table: PathBuf,

    /// Entity whose owners form the top level
    #[arg(short, long, default_value = "Default")]
    root: String,

    /// Expansion rounds after the top level (tile count grows exponentially)
    #[arg(short, long, default_value_t = 0)]
    depth: u32,

    /// Paint expanded tiles black, except the #ffffff and #797979 sentinels
    #[arg(long)]
    blackout: bool,

    /// Draw only the root entity as a single tile
    #[arg(long)]
    self_only: bool,

    /// Keep each entity's Self record as a terminal tile while expanding
    #[arg(long)]
    include_self: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stakemap=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let edges = load_table(&cli.table)?;
    let store = OwnershipStore::from_edges(edges);

    let config = LayoutConfig {
        root: CompactString::new(&cli.root),
        max_depth: cli.depth,
        terminal_blackout: cli.blackout,
        self_only: cli.self_only,
        include_self: cli.include_self,
        ..LayoutConfig::default()
    };

    let layout = compute_layout(&store, &config)
        .with_context(|| format!("failed to lay out '{}' at depth {}", cli.root, cli.depth))?;

    if layout.len() > LARGE_LAYOUT {
        tracing::warn!("Layout has {} tiles; consider a smaller --depth", layout.len());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.format {
        OutputFormat::Json => {
            render::write_json(&layout, &mut out, cli.pretty).context("failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Table => render::write_table(&layout, &mut out)?,
    }
    out.flush()?;

    Ok(())
}
