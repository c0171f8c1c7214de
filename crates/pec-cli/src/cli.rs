use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "pec - proximity-effect correction for electron-beam lithography: fit two-Gaussian PSFs from simulator output and solve per-feature dose corrections.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the two-Gaussian PSF from a simulator radial dose table.
    Fit(FitArgs),
    /// Run the proximity-correction pipeline over an exposure layout.
    Correct(CorrectArgs),
}

/// Arguments for the `fit` subcommand.
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Path to the radial dose table (CSV with '#' comments and a header row).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Write the fitted parameters as a TOML [psf] block to this path
    /// instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also export the fit as a BEAMER-compatible two-line PSF file.
    #[arg(long, value_name = "PATH")]
    pub beamer: Option<PathBuf>,
}

/// Arguments for the `correct` subcommand.
#[derive(Args, Debug)]
pub struct CorrectArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the correction-run report.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Fit the PSF from this radial dose table instead of taking the [psf]
    /// block from the run configuration.
    #[arg(long, value_name = "PATH")]
    pub psf_table: Option<PathBuf>,
}
