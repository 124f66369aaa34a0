mod cli;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carwash_core::{CarWash, EventJournal, WashConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<()> {
    let config_path = resolve_config_path()?;

    let file = File::open(&config_path)
        .with_context(|| format!("cannot open the wash config: {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let config: WashConfig = serde_json::from_reader(reader)
        .with_context(|| format!("cannot parse the wash config: {}", config_path.display()))?;

    let rng = StdRng::from_entropy();
    let mut game = CarWash::from_config_with_rng(config, rng)
        .with_context(|| format!("invalid wash config: {}", config_path.display()))?;

    let journal = EventJournal::shared();
    game.add_observer(Box::new(journal.clone()));

    cli::run(&mut game, &journal)
}

fn resolve_config_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let candidates = [
        cwd.join("config").join("carwash.json"),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join("carwash.json"),
    ];

    for path in candidates {
        if path.exists() {
            return Ok(path);
        }
    }

    anyhow::bail!("no wash config found; place one at config/carwash.json")
}
