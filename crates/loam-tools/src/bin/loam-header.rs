//! Print decoded map file headers.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use loam_map::{load_header, ElementKind, TILES_PER_GROUND};

/// Print the decoded header of terrain map files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The map files to inspect.
    #[arg(required = true)]
    maps: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    for path in &cli.maps {
        let header = load_header(path)
            .with_context(|| format!("reading {}", path.display()))?;

        let a = header.ambient_light;
        println!("{}:", path.display());
        println!("  version:       {}", header.version);
        println!("  interior:      {}", header.interior);
        println!(
            "  ground size:   {} x {}",
            header.ground_xsize, header.ground_ysize
        );
        println!(
            "  tile size:     {} x {}",
            header.ground_xsize * TILES_PER_GROUND as u32,
            header.ground_ysize * TILES_PER_GROUND as u32
        );
        println!("  ambient light: [{:.2}, {:.2}, {:.2}]", a[0], a[1], a[2]);
        println!("  ground offset: {}", header.ground_offset);
        println!("  tile offset:   {}", header.tile_offset);
        for kind in ElementKind::ALL {
            let s = header.section(kind);
            println!(
                "  {:<5} section: size {:>4}  count {:>6}  offset {:>8}",
                kind.name(),
                s.size,
                s.count,
                s.offset
            );
        }
        match header.segment_offset {
            0 => println!("  segments:      none"),
            offset => println!("  segment offset: {offset}"),
        }
    }
    Ok(())
}
