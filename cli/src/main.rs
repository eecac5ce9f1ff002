mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nationsim_core::{GameState, SimulationConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "nationsim_core=info,nationsim_cli=info";

fn main() -> Result<()> {
    init_tracing();

    let mut config = match resolve_config_path()? {
        Some(path) => {
            tracing::info!(path = %path.display(), "設定ファイルを読み込みます");
            SimulationConfig::from_path(&path)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = seed_override()? {
        config = config.with_seed(seed);
    }

    let mut game = GameState::from_config(config).context("世界の生成に失敗しました")?;
    cli::run(&mut game)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn seed_override() -> Result<Option<u64>> {
    match std::env::var("NATIONSIM_SEED") {
        Ok(value) => {
            let seed = value
                .trim()
                .parse()
                .with_context(|| format!("NATIONSIM_SEED が数値ではありません: {value}"))?;
            Ok(Some(seed))
        }
        Err(_) => Ok(None),
    }
}

fn resolve_config_path() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("カレントディレクトリの取得に失敗しました")?;
    let candidates = [
        cwd.join("config").join("world.yaml"),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join("world.yaml"),
    ];

    Ok(candidates.into_iter().find(|path| path.exists()))
}
