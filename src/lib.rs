//! vic_batch: parallel VIC to netCDF batch conversion driver
//!
//! Converting decades of VIC hydrology model output to netCDF is slow and
//! memory hungry, but the work splits cleanly by year. This crate runs an
//! external converter over a year range in parallel: it divides the years into
//! contiguous chunks, writes one control file per chunk from a base control
//! file, and runs the converter on each chunk through a fixed-size pool.
//!
//! ## Module Organization
//!
//! - [`partition`]: splitting a year range into near-equal contiguous slices
//! - [`template`]: placeholder substitution into per-worker control files
//! - [`pool`]: dispatching control files to converter processes
//! - [`parallel`]: worker pool sizing and machine information
//! - [`report`]: per-worker timing and batch summary
//! - [`driver`]: the end-to-end run, including cleanup
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vic_batch::prelude::*;
//! use std::path::PathBuf;
//!
//! let years = YearRange::new(1950, 2005).unwrap();
//! let config = DriverConfig::new(years, 8, PathBuf::from("control.cfg")).unwrap();
//! let runner = CommandRunner::parse("vic_utils vic2netcdf").unwrap();
//!
//! let report = Driver::new(&config, &runner).run().unwrap();
//! report.print_summary();
//! ```

pub mod cli;
pub mod driver;
pub mod errors;
pub mod logging;
pub mod parallel;
pub mod partition;
pub mod pool;
pub mod report;
pub mod template;

pub use driver::*;
pub use errors::*;
pub use parallel::*;
pub use partition::*;
pub use pool::*;
pub use report::*;
pub use template::*;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::driver::{Driver, DriverConfig};
    pub use crate::errors::{DriverError, Result};
    pub use crate::partition::{partition_years, YearRange, YearSlice};
    pub use crate::pool::{CommandRunner, ControlRunner};
    pub use crate::report::BatchReport;
    pub use crate::template::{ControlFile, ControlTemplate, TemplateParams};
}
