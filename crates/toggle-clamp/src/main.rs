use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toggle_clamp::config::Config;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)?;
            tracing::info!("loaded config from {}", path.display());
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Points(args) => args.run(&config),
        Command::Sweep(args) => args.run(&config),
        Command::Animate(args) => args.run(&config),
    }
}

#[derive(Parser)]
#[command(name = "toggle-clamp", about = "Kinematics of linear toggle clamps")]
struct Cli {
    /// Path to a configuration file (TOML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the joint positions at a single handle angle.
    Points(cli::points::PointsArgs),
    /// Tabulate mechanical advantage over a range of angles.
    Sweep(cli::sweep::SweepArgs),
    /// Stream a closing and opening stroke as JSON lines.
    Animate(cli::animate::AnimateArgs),
}
