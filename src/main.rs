use clap::{Parser, Subcommand};
use fits_triage::{clean, config, generate, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fits-triage")]
#[command(about = "Stretched JPEG previews for FITS captures, and cleanup of rejected frames")]
#[command(long_about = "\
Stretched JPEG previews for FITS captures, and cleanup of rejected frames

Workflow:

  1. fits-triage generate night/      # writes night/previews/*.jpg
  2. delete the previews of frames you don't want
  3. fits-triage clean night/         # lists raw files without a preview
  4. fits-triage clean night/ --force # deletes them

Directory structure:

  night/
  ├── fits-triage.toml     # Optional preview settings
  ├── M31_0001.fits        # Raw captures (*.fit, *.fits, *.fts...)
  ├── M31_0002.fits
  └── previews/            # Created by 'generate'
      └── M31_0001.jpg     # M31_0002.fits has no preview → removed by 'clean'

Run 'fits-triage gen-config' to generate a documented fits-triage.toml.")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a stretched JPEG preview for every FITS file in a directory
    Generate {
        /// Directory containing the FITS files
        directory: PathBuf,
    },
    /// List (or with --force delete) FITS files whose preview was removed
    Clean {
        /// Directory containing the FITS files and their previews/ folder
        directory: PathBuf,
        /// Actually delete the files instead of listing them
        #[arg(long)]
        force: bool,
    },
    /// Print a stock fits-triage.toml with all options documented
    GenConfig,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate { directory } => {
            let config = config::load_config(&directory)?;
            let report = generate::generate(
                &directory,
                &config.preview,
                output::print_preview_event,
            )?;
            output::print_generate_summary(&report);
        }
        Command::Clean { directory, force } => {
            let outcome = clean::clean(&directory, force)?;
            output::print_clean_outcome(&outcome);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
