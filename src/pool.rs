//! Dispatch of control files onto a fixed-size worker pool
//!
//! Each control file is handed to a [`ControlRunner`]. The production runner,
//! [`CommandRunner`], launches the external converter as a child process and
//! waits for it. Every job runs to completion even when others fail, so a
//! single bad year range does not discard the rest of the batch.

use crate::errors::{DriverError, Result};
use crate::parallel::ParallelConfig;
use crate::report::WorkerOutcome;
use crate::template::ControlFile;
use rayon::prelude::*;
use std::ffi::OsString;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{error, info};

/// Default converter invocation, the tonic `vic2netcdf` utility
pub const DEFAULT_CONVERTER: &str = "vic_utils vic2netcdf";

/// Something that can convert the data described by one control file
pub trait ControlRunner: Sync {
    /// Run the conversion for `control`, blocking until it finishes
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion could not be started or did not
    /// complete successfully.
    fn run(&self, control: &ControlFile) -> Result<()>;
}

/// Runs the converter as `program [args...] <control file>`
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: OsString,
    args: Vec<OsString>,
    quiet: bool,
}

impl CommandRunner {
    pub fn new(program: impl Into<OsString>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            quiet: false,
        }
    }

    /// Build a runner from a whitespace-separated command line
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidCommand`] if the command line is empty.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| DriverError::InvalidCommand("empty command line".to_string()))?;
        Ok(Self::new(program, parts.map(OsString::from).collect()))
    }

    /// Discard the converter's stdout
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl ControlRunner for CommandRunner {
    fn run(&self, control: &ControlFile) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(&control.path).stdin(Stdio::null());
        if self.quiet {
            command.stdout(Stdio::null());
        }

        let status = command.status().map_err(|source| DriverError::WorkerSpawn {
            program: self.program_name(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(DriverError::WorkerFailed {
                config: control.path.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Time a single conversion and turn its result into an outcome
pub fn run_config(runner: &dyn ControlRunner, control: &ControlFile) -> WorkerOutcome {
    let start = Instant::now();
    let result = runner.run(control);
    let elapsed = start.elapsed();

    match &result {
        Ok(()) => info!(
            worker = control.worker,
            "worker completed in {:.3} seconds",
            elapsed.as_secs_f64()
        ),
        Err(e) => error!(
            worker = control.worker,
            "worker failed after {:.3} seconds: {}",
            elapsed.as_secs_f64(),
            e
        ),
    }

    WorkerOutcome {
        worker: control.worker,
        config: control.path.clone(),
        year_begin: control.year_begin,
        year_end: control.year_end,
        elapsed,
        error: result.err().map(|e| e.to_string()),
    }
}

/// Run every control file on a dedicated pool built from `config`
///
/// Outcomes are returned in the same order as `files`.
///
/// # Errors
///
/// Returns an error only if the pool cannot be built; individual conversion
/// failures are recorded in the returned outcomes.
pub fn run_pool(
    runner: &dyn ControlRunner,
    files: &[ControlFile],
    config: &ParallelConfig,
) -> Result<Vec<WorkerOutcome>> {
    let pool = config.build_pool()?;
    info!(
        jobs = files.len(),
        workers = pool.current_num_threads(),
        "dispatching control files"
    );

    let outcomes: Vec<WorkerOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|control| run_config(runner, control))
            .collect()
    });

    Ok(outcomes)
}
