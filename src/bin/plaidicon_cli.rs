//! Plaidicon CLI
//!
//! Commands: generate, manifest
//! Outputs JSON to stdout, logs to stderr (`RUST_LOG` filters)
//! Returns 1 on usage/config failure, 2 on generation failure

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use plaidicon_core::{
    generate_icon, GenerateOptions, MiddleColor, RotationStep, StyleConfig, DEFAULT_IMAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "plaidicon-cli", version)]
#[command(about = "Plaidicon CLI - deterministic plaid icon generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an icon PNG and print its manifest
    Generate {
        #[command(flatten)]
        icon: IconArgs,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Print the manifest with the PNG inlined as base64
    Manifest {
        #[command(flatten)]
        icon: IconArgs,
    },
}

#[derive(Args)]
struct IconArgs {
    /// Output width and height in pixels
    #[arg(short, long, default_value_t = DEFAULT_IMAGE_SIZE, allow_negative_numbers = true)]
    size: i64,

    /// Seed string (random when omitted)
    #[arg(long)]
    seed: Option<String>,

    /// Style JSON file (StyleConfig)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Disable block-edge blending
    #[arg(long)]
    no_antialias: bool,

    /// Middle block color
    #[arg(long, value_enum)]
    middle: Option<MiddleArg>,

    /// Rotate by any angle instead of 5 degree steps
    #[arg(long)]
    continuous_rotation: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MiddleArg {
    Average,
    SeededDark,
}

impl IconArgs {
    fn options(&self) -> Result<GenerateOptions, String> {
        let mut style = match &self.style {
            Some(path) => StyleConfig::load(path).map_err(|e| e.to_string())?,
            None => StyleConfig::default(),
        };

        if self.no_antialias {
            style.antialias = false;
        }
        if let Some(middle) = self.middle {
            style.middle_color = match middle {
                MiddleArg::Average => MiddleColor::Average,
                MiddleArg::SeededDark => MiddleColor::SeededDark,
            };
        }
        if self.continuous_rotation {
            style.rotation = RotationStep::Continuous;
        }

        Ok(GenerateOptions {
            size: self.size,
            seed: self.seed.clone(),
            style,
        })
    }
}

fn fail(code: u8, error: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::from(code)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let icon_args = match &cli.command {
        Commands::Generate { icon, .. } | Commands::Manifest { icon } => icon,
    };
    let options = match icon_args.options() {
        Ok(o) => o,
        Err(e) => return fail(1, e),
    };

    let icon = match generate_icon(&options) {
        Ok(icon) => icon,
        Err(e) => return fail(2, e),
    };
    let manifest = match icon.manifest() {
        Ok(m) => m,
        Err(e) => return fail(2, e),
    };

    let output = match &cli.command {
        Commands::Generate { out, .. } => {
            if let Err(e) = fs::write(out, &icon.png) {
                return fail(1, format!("Failed to write {}: {}", out.display(), e));
            }
            serde_json::json!({
                "success": true,
                "path": out,
                "manifest": manifest,
            })
        }
        Commands::Manifest { .. } => serde_json::json!({
            "success": true,
            "manifest": manifest,
            "data_base64": icon.png_base64(),
        }),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => fail(2, e),
    }
}
