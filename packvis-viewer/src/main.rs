use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use packvis_scene::ReconcilerConfig;
use packvis_viewer::{spawn_snapshot_stream, Viewer, ViewerOptions};

/// Real-time 3D viewer for streamed bin-packing state.
#[derive(Parser, Debug)]
#[command(name = "packvis", version, about)]
struct Args {
    /// Address of the snapshot stream (newline-delimited JSON over TCP).
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,

    /// Seed for the random-color stream; omitted means nondeterministic.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for snapshot PNGs and recording frames.
    #[arg(long, default_value = "captures")]
    capture_dir: PathBuf,

    /// Save a snapshot PNG automatically when an episode ends.
    #[arg(long)]
    save_at_end: bool,

    /// Start with the staging areas hidden.
    #[arg(long)]
    no_outer: bool,

    /// Start with the center markers hidden.
    #[arg(long)]
    no_centers: bool,

    /// Start with the placement graph hidden.
    #[arg(long)]
    no_graph: bool,

    /// Color each box with an independent random color.
    #[arg(long)]
    random_color: bool,

    /// Render box fills with partial transparency.
    #[arg(long)]
    transparent: bool,

    /// Hide the bin surface grids.
    #[arg(long)]
    no_grid: bool,

    /// Line width for box edge outlines.
    #[arg(long, default_value_t = 2.0)]
    edge_width: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ReconcilerConfig {
        show_centers: !args.no_centers,
        show_graph: !args.no_graph,
        show_outer: !args.no_outer,
        random_color: args.random_color,
        box_transparent: args.transparent,
        box_edge_line_width: args.edge_width,
    };

    let inbox = spawn_snapshot_stream(args.addr.clone());
    let viewer = Viewer::new(ViewerOptions {
        config,
        seed: args.seed,
        capture_dir: args.capture_dir,
        save_at_end: args.save_at_end,
        show_grid: !args.no_grid,
    });

    viewer.run(inbox)?;
    Ok(())
}
