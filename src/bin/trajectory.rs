use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use drop_four::config::AppConfig;
use drop_four::game::ROWS;
use drop_four::physics::simulate_mass_fall;

/// Print drop trajectories without starting the game.
#[derive(Parser)]
#[command(name = "trajectory", about = "Inspect piece drop trajectories")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "drop_four.toml")]
    config: PathBuf,

    /// Pieces already in the target column
    #[arg(long, default_value_t = 0)]
    pieces: usize,

    /// Print every Nth sample (defaults to the configured frame stride)
    #[arg(long)]
    stride: Option<usize>,

    /// Show the board-clearing fall of a full column instead of a single drop
    #[arg(long)]
    clear: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.pieces >= ROWS {
        bail!("--pieces must be below {} (a full column takes no drops)", ROWS);
    }

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let stride = cli.stride.unwrap_or(config.render.frame_stride);
    if stride == 0 {
        bail!("--stride must be >= 1");
    }
    let model = config.physics.build()?;

    if cli.clear {
        let frames: Vec<Vec<Option<f64>>> = simulate_mass_fall(0..ROWS, &model).collect();
        tracing::info!(frames = frames.len(), "clearing a full column");
        println!("frame\t{}", (0..ROWS).map(|r| format!("row{r}")).collect::<Vec<_>>().join("\t"));
        for (i, frame) in frames.iter().enumerate().step_by(stride) {
            let cols: Vec<String> = frame
                .iter()
                .map(|h| h.map_or_else(|| "-".to_string(), |h| format!("{h:.3}")))
                .collect();
            println!("{i}\t{}", cols.join("\t"));
        }
        return Ok(());
    }

    let restitution = model
        .restitution()
        .coefficient(model.release_height(), cli.pieces);
    tracing::info!(
        pieces = cli.pieces,
        release = model.release_height(),
        restitution,
        "simulating drop"
    );

    let heights: Vec<f64> = model.drop_trajectory(cli.pieces).collect();
    for (i, h) in heights.iter().enumerate().step_by(stride) {
        println!("{i}\t{h:.3}");
    }
    tracing::info!(samples = heights.len(), "done");
    Ok(())
}
