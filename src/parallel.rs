//! Parallel processing configuration and management
//!
//! This module sizes the worker pool used to run converter processes. Each
//! pool thread supervises exactly one child process at a time, so the pool
//! size is the number of conversions running concurrently.

use crate::errors::{DriverError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

/// Configuration for parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Number of threads the pool will be built with
    pub fn resolved_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }

    /// Build a dedicated pool of exactly [`resolved_threads`](Self::resolved_threads) threads
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidWorkerCount`] for a zero-sized pool and
    /// [`DriverError::ThreadPoolError`] if rayon fails to start the threads.
    pub fn build_pool(&self) -> Result<ThreadPool> {
        let num_threads = self.resolved_threads();
        if num_threads == 0 {
            return Err(DriverError::InvalidWorkerCount(num_threads));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("vic-worker-{i}"))
            .build()
            .map_err(|e| {
                DriverError::ThreadPoolError(format!(
                    "Failed to initialize worker pool with {} threads: {}",
                    num_threads, e
                ))
            })?;

        debug!(threads = num_threads, "worker pool ready");
        Ok(pool)
    }
}

/// Get information about the current parallel configuration
pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        available_cores: num_cpus::get(),
        physical_cores: num_cpus::get_physical(),
        available_parallelism: std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
    }
}

/// Information about the parallel processing environment
#[derive(Debug, Clone)]
pub struct ParallelInfo {
    pub available_cores: usize,
    pub physical_cores: usize,
    pub available_parallelism: usize,
}

impl ParallelInfo {
    /// Whether `workers` concurrent conversions would oversubscribe the machine
    pub fn is_oversubscribed(&self, workers: usize) -> bool {
        workers > self.available_cores
    }

    /// Log a warning when the requested pool is larger than the machine
    pub fn warn_if_oversubscribed(&self, workers: usize) {
        if self.is_oversubscribed(workers) {
            warn!(
                workers,
                cores = self.available_cores,
                "more workers than logical cores; conversions will compete for CPU"
            );
        }
    }

    /// Print parallel processing information
    pub fn print_info(&self) {
        println!("📊 Parallel Processing Information:");
        println!("   Available CPU cores: {}", self.available_cores);
        println!("   Physical CPU cores: {}", self.physical_cores);
        println!("   Available parallelism: {}", self.available_parallelism);
    }
}
