//! Defines command-line interface options using `clap` for the vic-batch driver.

use crate::pool::DEFAULT_CONVERTER;
use clap::Parser;
use std::path::PathBuf;

const ABOUT: &str = "Parallel batch conversion from VIC to netCDF file formats.";

const LONG_ABOUT: &str = "Parallel batch conversion from VIC to netCDF file formats.

Splits the requested years across a pool of converter processes, writing one \
control file per process from a base control file.

Each converter runs in big memory mode. Be careful how many years and processes \
you allocate: 20 processes need roughly 150 GB of RAM, and the run will slow to a \
crawl once swap is required.";

/// Command-line arguments for a batch conversion run
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    name = "vic-batch",
    about = ABOUT,
    long_about = LONG_ABOUT
)]
pub struct Args {
    /// Beginning year of conversions
    #[arg(
        short = 'b',
        long,
        alias = "year_begin",
        default_value_t = 1950,
        allow_negative_numbers = true
    )]
    pub year_begin: i32,

    /// Ending year of conversions
    #[arg(
        short = 'e',
        long,
        alias = "year_end",
        default_value_t = 2098,
        allow_negative_numbers = true
    )]
    pub year_end: i32,

    /// Name of GCM (i.e., CCSM4)
    #[arg(short, long, default_value = "")]
    pub gcm: String,

    /// Number of processes to run in the pool
    #[arg(short = 'n', long, default_value_t = 20)]
    pub nprocs: usize,

    /// Path to infiles. Wildcard (*) required!
    #[arg(
        short,
        long,
        default_value = "/scratch/hydroclimate/vic/colorado/results/PROCESSGCM/bal_*"
    )]
    pub infiles: String,

    /// Base directory to write netCDF files to. The GCM name is appended automatically.
    #[arg(
        short,
        long,
        default_value = "/scratch/hydroclimate/vic/colorado/results/testing"
    )]
    pub outdir: PathBuf,

    /// Desired prefix for the written netCDF files
    #[arg(short, long, default_value = "vic_COL_CanESM2_rcp85")]
    pub prefix: String,

    /// Base control file containing the YEARBEGIN/YEAREND/PROCESSGCM placeholders
    #[arg(short = 'c', long, default_value = "control.cfg")]
    pub control_template: PathBuf,

    /// Directory for generated control files. Defaults to control_files/ next to the template.
    #[arg(long)]
    pub control_dir: Option<PathBuf>,

    /// Converter command; the control file path is appended as the last argument
    #[arg(long, env = "VIC_BATCH_CONVERTER", default_value = DEFAULT_CONVERTER)]
    pub converter: String,

    /// Remove generated control files once the run finishes
    #[arg(long)]
    pub cleanup: bool,

    /// Generate control files and print the plan without running the converter
    #[arg(long)]
    pub dry_run: bool,

    /// Discard converter stdout
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
