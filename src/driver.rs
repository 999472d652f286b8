//! Batch driver: partition, template, dispatch, time and clean up
//!
//! [`Driver::run`] is the whole batch. It loads the base control file, splits
//! the year range across workers, writes one control file per worker, runs the
//! converter on each through a fixed-size pool and reports timing.

use crate::cli::Args;
use crate::errors::{DriverError, Result};
use crate::parallel::{get_parallel_info, ParallelConfig};
use crate::partition::{partition_years, YearRange};
use crate::pool::{run_pool, ControlRunner};
use crate::report::BatchReport;
use crate::template::{
    create_control_files, default_control_dir, ControlFile, ControlTemplate, Placeholder,
    TemplateParams,
};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Validated settings for one batch run
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub years: YearRange,
    pub workers: usize,
    pub template: PathBuf,
    pub control_dir: PathBuf,
    pub params: TemplateParams,
    pub cleanup: bool,
    pub dry_run: bool,
}

impl DriverConfig {
    /// Validate command-line arguments into a run configuration.
    ///
    /// A relative template path is resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted year range, a zero worker count, or
    /// when the current directory cannot be determined.
    pub fn from_args(args: &Args) -> Result<Self> {
        let template = if args.control_template.is_absolute() {
            args.control_template.clone()
        } else {
            std::env::current_dir()?.join(&args.control_template)
        };
        let mut config = Self::new(
            YearRange::new(args.year_begin, args.year_end)?,
            args.nprocs,
            template,
        )?;
        if let Some(dir) = &args.control_dir {
            config.control_dir = dir.clone();
        }
        config.params = TemplateParams {
            gcm: args.gcm.clone(),
            infiles: args.infiles.clone(),
            outdir: args.outdir.clone(),
            prefix: args.prefix.clone(),
        };
        config.cleanup = args.cleanup;
        config.dry_run = args.dry_run;
        Ok(config)
    }

    /// Configuration with default template parameters and control directory
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidWorkerCount`] when `workers` is zero.
    pub fn new(years: YearRange, workers: usize, template: PathBuf) -> Result<Self> {
        if workers == 0 {
            return Err(DriverError::InvalidWorkerCount(workers));
        }
        Ok(Self {
            years,
            workers,
            control_dir: default_control_dir(&template),
            template,
            params: TemplateParams::default(),
            cleanup: false,
            dry_run: false,
        })
    }

    /// Print the run configuration
    pub fn print(&self) {
        println!("\n===== Run Configuration =====");
        println!(
            "- Years: {}-{} ({} years)",
            self.years.begin,
            self.years.end,
            self.years.len()
        );
        println!("- Workers: {}", self.workers);
        println!("- GCM: {}", self.params.gcm);
        println!("- Input files: {}", self.params.infiles);
        println!("- Output directory: {}", self.params.gcm_outdir().display());
        println!("- Prefix: {}", self.params.prefix);
        println!("- Template: {}", self.template.display());
        println!("- Control files: {}", self.control_dir.display());
    }
}

/// Runs one batch conversion
pub struct Driver<'a> {
    config: &'a DriverConfig,
    runner: &'a dyn ControlRunner,
}

impl<'a> Driver<'a> {
    /// Create a new driver
    pub fn new(config: &'a DriverConfig, runner: &'a dyn ControlRunner) -> Self {
        Self { config, runner }
    }

    /// Run the whole batch and return its report.
    ///
    /// Worker failures are recorded in the report rather than returned as an
    /// error, so the caller always gets timing for the jobs that did run.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be loaded, control files cannot
    /// be written, or the worker pool cannot be built.
    pub fn run(&self) -> Result<BatchReport> {
        info!("initializing");
        let started_at = Utc::now();
        let timer = Instant::now();

        let template = ControlTemplate::load(&self.config.template)?;
        for placeholder in template.missing_placeholders() {
            match placeholder {
                Placeholder::YearBegin | Placeholder::YearEnd => warn!(
                    token = placeholder.token(),
                    "template has no year placeholder; every worker will convert the same years"
                ),
                _ => debug!(token = placeholder.token(), "placeholder not used by template"),
            }
        }

        let slices = partition_years(self.config.years, self.config.workers)?;
        let control_files = create_control_files(
            &template,
            &slices,
            &self.config.params,
            &self.config.control_dir,
        )?;
        info!(
            count = control_files.len(),
            dir = %self.config.control_dir.display(),
            "generated control files"
        );

        if self.config.dry_run {
            print_plan(&control_files);
            self.finish(&control_files)?;
            return Ok(BatchReport::new(started_at, Vec::new(), timer.elapsed()));
        }

        let workers = control_files.len();
        get_parallel_info().warn_if_oversubscribed(workers);

        info!("generating processor pool");
        let dispatched = run_pool(
            self.runner,
            &control_files,
            &ParallelConfig::with_threads(workers),
        );
        self.finish(&control_files)?;
        let outcomes = dispatched?;
        info!("done");

        Ok(BatchReport::new(started_at, outcomes, timer.elapsed()))
    }

    fn finish(&self, control_files: &[ControlFile]) -> Result<()> {
        if self.config.cleanup {
            let removed = cleanup_control_files(control_files, &self.config.control_dir)?;
            info!(removed, "cleaned up control files");
        }
        Ok(())
    }
}

/// Print which years each generated control file covers
pub fn print_plan(control_files: &[ControlFile]) {
    println!("\n===== Dry Run Plan =====");
    for control in control_files {
        println!(
            "- worker {:>3}: {}-{} -> {}",
            control.worker,
            control.year_begin,
            control.year_end,
            control.path.display()
        );
    }
}

/// Delete generated control files, then `dir` itself if nothing else is left.
///
/// Files that are already gone are skipped. Returns the number of files removed.
///
/// # Errors
///
/// Returns an I/O error if a file or the directory cannot be removed.
pub fn cleanup_control_files(control_files: &[ControlFile], dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for control in control_files {
        match fs::remove_file(&control.path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    if dir.is_dir() && fs::read_dir(dir)?.next().is_none() {
        fs::remove_dir(dir)?;
        debug!(dir = %dir.display(), "removed empty control directory");
    }

    Ok(removed)
}
