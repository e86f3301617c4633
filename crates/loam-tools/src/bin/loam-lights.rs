//! List or remove invalid light sources from terrain map files.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use loam_map::Map;
use loam_tools::{backup, lights};

/// Remove invalid lights from terrain map files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The map files to fix.
    #[arg(required = true)]
    maps: Vec<PathBuf>,

    /// Just list all bad lights found.
    #[arg(short, long)]
    list: bool,

    /// Do not create backup copies.
    #[arg(short = 'N', long = "nobackup")]
    no_backup: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    for path in &cli.maps {
        process(path, &cli).with_context(|| format!("processing {}", path.display()))?;
    }
    Ok(())
}

fn process(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let mut map = Map::load(path)?;
    let bounds = lights::world_bounds(&map);

    if cli.list {
        for (id, light) in lights::bad_lights(&map, &bounds) {
            println!("{}", lights::describe(map.name(), id, light));
        }
        return Ok(());
    }

    let removed = map.retain_lights(|light| lights::valid_light(light, &bounds));
    if removed == 0 {
        println!("{}: no bad lights found", map.name());
        return Ok(());
    }
    println!("{}: removed {} bad lights", map.name(), removed);

    if !cli.no_backup {
        let moved_to = backup::create_backup(path)
            .with_context(|| format!("backing up {}", path.display()))?;
        println!("{}: backup saved to {}", map.name(), moved_to.display());
    }
    map.save(None)?;
    Ok(())
}
