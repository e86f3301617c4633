//! Copy a rectangular region from one terrain map to another.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use loam_map::{region, Map, Point, Rect};
use loam_tools::coords::{parse_point, parse_rect};

/// Copy a rectangular region from one terrain map to another.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The map file to copy from.
    input: PathBuf,

    /// The map file to write to.
    output: PathBuf,

    /// The rectangular region to copy from, in tile coordinates. The end
    /// points are inclusive. If omitted, the entire map is copied.
    #[arg(short, long, value_parser = parse_rect, value_name = "XMIN,YMIN,XMAX,YMAX")]
    source: Option<Rect>,

    /// The tile coordinates to copy to. If omitted, (0,0) is used. May be
    /// supplied multiple times to make several copies.
    #[arg(
        short,
        long = "destination",
        value_parser = parse_point,
        value_name = "XMIN,YMIN"
    )]
    destination: Vec<Point>,

    /// Remove existing tiles, meshes, lights, etc., in the destination
    /// rectangles in the output map.
    #[arg(short, long)]
    remove: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let src = Map::load(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let mut dst = Map::load(&cli.output)
        .with_context(|| format!("loading {}", cli.output.display()))?;

    let source = cli.source.unwrap_or_else(|| src.bounds());
    let destinations = if cli.destination.is_empty() {
        vec![Point::new(0, 0)]
    } else {
        cli.destination
    };

    region::copy_region(&src, source, &mut dst, &destinations, cli.remove);
    dst.save(None)
        .with_context(|| format!("saving {}", cli.output.display()))?;

    println!(
        "{}: copied {}x{} tiles to {} destination(s)",
        dst.name(),
        source.width(),
        source.height(),
        destinations.len()
    );
    Ok(())
}
