//! Entry point for the vic-batch driver.
//! Parses arguments, builds the run configuration and hands it to the driver.

use clap::Parser;
use vic_batch::cli::Args;
use vic_batch::errors::{DriverError, Result};
use vic_batch::logging::init_logger;
use vic_batch::parallel::get_parallel_info;
use vic_batch::pool::CommandRunner;
use vic_batch::{Driver, DriverConfig};

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    println!(
        r#"
------------------------------------------------------------------
              VIC -> netCDF parallel batch conversion
------------------------------------------------------------------
"#
    );

    let config = DriverConfig::from_args(args)?;
    let runner = CommandRunner::parse(&args.converter)?.quiet(args.quiet);

    if args.verbose {
        config.print();
        get_parallel_info().print_info();
    }

    let report = Driver::new(&config, &runner).run()?;

    if config.dry_run {
        println!("✅ Dry run complete, no conversions started");
        return Ok(());
    }

    report.print_summary();
    if !report.is_success() {
        return Err(DriverError::BatchFailed {
            failed: report.failed(),
            total: report.outcomes.len(),
        });
    }

    println!("✅ Done.");
    Ok(())
}
