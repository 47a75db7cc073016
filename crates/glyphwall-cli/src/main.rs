//! Glyphwall CLI - inspect and simulate particle walls from the terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{lattice, modes, simulate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glyphwall")]
#[command(about = "Generative glyph particle wall, headless", long_about = None)]
#[command(version)]
struct Cli {
    /// Log simulation events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the interaction modes and their spring profiles
    Modes {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Build a lattice and report its size and bounds
    Lattice {
        /// Surface width in logical pixels
        #[arg(long, default_value = "600")]
        width: f32,

        /// Surface height in logical pixels
        #[arg(long, default_value = "800")]
        height: f32,

        /// Grid density in [0, 1]
        #[arg(long, default_value = "0.6")]
        density: f32,

        /// Glyph scale factor
        #[arg(long, default_value = "1.0")]
        font_scale: f32,

        /// Vertical center as a fraction of height
        #[arg(long, default_value = "0.45")]
        center_y: f32,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run a scripted session on a fake 60Hz clock
    Simulate {
        /// Mode to select (overrides the config file)
        #[arg(long)]
        mode: Option<String>,

        /// Number of frames to run
        #[arg(long, default_value = "180")]
        frames: u64,

        /// Surface width in logical pixels
        #[arg(long, default_value = "600")]
        width: f32,

        /// Surface height in logical pixels
        #[arg(long, default_value = "800")]
        height: f32,

        /// Pointer-down as x,y@ms
        #[arg(long, value_parser = parse_press)]
        press: Option<simulate::PressSpec>,

        /// Pointer-up time in ms (defaults to holding until the end)
        #[arg(long)]
        release: Option<f64>,

        /// TOML preset with wall configuration
        #[arg(long)]
        config: Option<String>,

        /// Print the last frame as ASCII art
        #[arg(long)]
        ascii: bool,

        /// Jitter seed
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn parse_press(s: &str) -> Result<simulate::PressSpec, String> {
    let (point, at) = s
        .split_once('@')
        .ok_or_else(|| format!("expected x,y@ms, got '{}'", s))?;
    let parts: Vec<&str> = point.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let at_ms: f64 = at.trim().parse().map_err(|e| format!("invalid time: {}", e))?;
    Ok(simulate::PressSpec { x, y, at_ms })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Modes { format } => modes::run(&format),
        Commands::Lattice {
            width,
            height,
            density,
            font_scale,
            center_y,
            format,
        } => lattice::run(lattice::LatticeArgs {
            width,
            height,
            density,
            font_scale,
            center_y,
            format,
        }),
        Commands::Simulate {
            mode,
            frames,
            width,
            height,
            press,
            release,
            config,
            ascii,
            seed,
            format,
        } => simulate::run(simulate::SimulateArgs {
            mode,
            frames,
            width,
            height,
            press,
            release,
            config,
            ascii,
            seed,
            format,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_press_spec() {
        let press = parse_press("120, 340.5@250").unwrap();
        assert_eq!(press.x, 120.0);
        assert_eq!(press.y, 340.5);
        assert_eq!(press.at_ms, 250.0);

        assert!(parse_press("120,340").is_err());
        assert!(parse_press("1,2,3@0").is_err());
        assert!(parse_press("a,2@0").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
