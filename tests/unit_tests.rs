//! Unit tests for vic_batch modules
//!
//! These cover partitioning, templating, error types and pool configuration
//! without starting any converter processes.

use std::path::PathBuf;
use tempfile::tempdir;
use vic_batch::{
    errors::{DriverError, Result},
    parallel::{get_parallel_info, ParallelConfig},
    partition::{partition_years, split_seq, YearRange, YearSlice},
    template::{
        control_file_path, create_control_files, default_control_dir, ControlTemplate,
        Placeholder, Substitutions, TemplateParams,
    },
};

#[test]
fn test_error_types() {
    let range_err = DriverError::InvalidYearRange {
        begin: 2000,
        end: 1990,
    };
    assert!(format!("{}", range_err).contains("2000 is after 1990"));

    let generic_err = DriverError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    let worker_err = DriverError::WorkerFailed {
        config: PathBuf::from("control_files/proc_3.cfg"),
        status: "exit status: 1".to_string(),
    };
    assert!(format!("{}", worker_err).contains("proc_3.cfg"));

    let batch_err = DriverError::BatchFailed {
        failed: 2,
        total: 20,
    };
    assert_eq!(format!("{}", batch_err), "2 of 20 workers failed");
}

#[test]
fn test_year_range_validation() {
    assert!(YearRange::new(1950, 2098).is_ok());
    assert!(YearRange::new(2000, 2000).is_ok());

    match YearRange::new(2010, 2000) {
        Err(DriverError::InvalidYearRange { begin, end }) => {
            assert_eq!(begin, 2010);
            assert_eq!(end, 2000);
        }
        _ => panic!("Expected InvalidYearRange error"),
    }
}

#[test]
fn test_split_seq_matches_rounded_boundaries() -> Result<()> {
    let years: Vec<i32> = (1950..=1959).collect();
    let slices = split_seq(&years, 4)?;

    // Boundaries at round(0), round(2.5), round(5), round(7.5), round(10)
    assert_eq!(slices[0], vec![1950, 1951]);
    assert_eq!(slices[1], vec![1952, 1953, 1954]);
    assert_eq!(slices[2], vec![1955, 1956, 1957]);
    assert_eq!(slices[3], vec![1958, 1959]);

    Ok(())
}

#[test]
fn test_split_seq_matches_python_driver_boundaries() -> Result<()> {
    // splitsize = 1/6 * 7 in f64; 3 * splitsize falls just under 3.5
    let years: Vec<i32> = (2000..2007).collect();
    let slices = split_seq(&years, 6)?;

    let sizes: Vec<usize> = slices.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1, 1, 1, 2, 1, 1]);
    assert_eq!(slices[3], vec![2003, 2004]);

    Ok(())
}

#[test]
fn test_split_seq_invariants() -> Result<()> {
    for len in 0..60usize {
        let seq: Vec<usize> = (0..len).collect();
        for ranks in 1..25 {
            let slices = split_seq(&seq, ranks)?;
            assert_eq!(slices.len(), ranks);

            let joined: Vec<usize> = slices.iter().flatten().copied().collect();
            assert_eq!(joined, seq, "len={len} ranks={ranks}");

            let sizes: Vec<usize> = slices.iter().map(Vec::len).collect();
            let min = sizes.iter().min().copied().unwrap_or(0);
            let max = sizes.iter().max().copied().unwrap_or(0);
            assert!(max - min <= 1, "len={len} ranks={ranks} sizes={sizes:?}");
        }
    }
    Ok(())
}

#[test]
fn test_split_seq_rejects_zero_ranks() {
    let result = split_seq(&[1, 2, 3], 0);
    assert!(matches!(result, Err(DriverError::InvalidWorkerCount(0))));
}

#[test]
fn test_partition_default_colorado_run() -> Result<()> {
    let range = YearRange::new(1950, 2098)?;
    let slices = partition_years(range, 20)?;

    assert_eq!(slices.len(), 20);
    assert_eq!(slices[0].first(), Some(1950));
    assert_eq!(slices[19].last(), Some(2098));
    for slice in &slices {
        assert!(slice.years.len() == 7 || slice.years.len() == 8);
    }
    for pair in slices.windows(2) {
        assert_eq!(pair[0].last().map(|y| y + 1), pair[1].first());
    }

    Ok(())
}

#[test]
fn test_partition_drops_idle_workers() -> Result<()> {
    let range = YearRange::new(2001, 2003)?;
    let slices = partition_years(range, 5)?;

    assert_eq!(
        slices,
        vec![
            YearSlice {
                worker: 0,
                years: vec![2001]
            },
            YearSlice {
                worker: 1,
                years: vec![2002]
            },
            YearSlice {
                worker: 2,
                years: vec![2003]
            },
        ]
    );
    Ok(())
}

#[test]
fn test_partition_clamps_huge_worker_count() -> Result<()> {
    let range = YearRange::new(1950, 1951)?;
    let slices = partition_years(range, usize::MAX)?;

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].years, vec![1950]);
    assert_eq!(slices[1].years, vec![1951]);

    Ok(())
}

#[test]
fn test_template_load_missing_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("control.cfg");

    match ControlTemplate::load(&missing) {
        Err(DriverError::TemplateNotFound { path }) => assert_eq!(path, missing),
        _ => panic!("Expected TemplateNotFound error"),
    }
}

#[test]
fn test_render_all_placeholders() {
    let template = ControlTemplate::from_text(
        "[OPTIONS]\n\
         input_files: INFILES\n\
         out_directory: OUTDIR\n\
         out_file_prefix: OUTPREFIX\n\
         start_date: YEARBEGIN-01-01-00\n\
         end_date: YEAREND-12-31-23\n\
         gcm: PROCESSGCM\n",
    );
    assert!(template.missing_placeholders().is_empty());

    let params = TemplateParams {
        gcm: "CCSM4".to_string(),
        infiles: "/results/PROCESSGCM/bal_*".to_string(),
        outdir: PathBuf::from("/netcdf"),
        prefix: "vic_COL".to_string(),
    };
    let slice = YearSlice {
        worker: 0,
        years: vec![1960, 1961, 1962],
    };
    let subs = Substitutions::for_slice(&slice, &params).expect("slice has years");
    let rendered = template.render(&subs);

    assert!(rendered.contains("input_files: /results/CCSM4/bal_*"));
    assert!(rendered.contains("out_directory: /netcdf/CCSM4"));
    assert!(rendered.contains("out_file_prefix: vic_COL"));
    assert!(rendered.contains("start_date: 1960-01-01-00"));
    assert!(rendered.contains("end_date: 1962-12-31-23"));
    assert!(rendered.contains("gcm: CCSM4"));
    assert!(!rendered.contains(Placeholder::Gcm.token()));
}

#[test]
fn test_substitutions_reject_empty_slice() {
    let slice = YearSlice {
        worker: 4,
        years: Vec::new(),
    };
    assert!(Substitutions::for_slice(&slice, &TemplateParams::default()).is_err());
}

#[test]
fn test_create_control_files() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let template_path = temp_dir.path().join("control.cfg");
    std::fs::write(&template_path, "years YEARBEGIN YEAREND for PROCESSGCM\n")?;

    let template = ControlTemplate::load(&template_path)?;
    assert_eq!(template.source(), Some(template_path.as_path()));
    let slices = partition_years(YearRange::new(1950, 1955)?, 3)?;
    let params = TemplateParams {
        gcm: "CanESM2".to_string(),
        ..Default::default()
    };
    let dir = default_control_dir(&template_path);
    assert_eq!(dir, temp_dir.path().join("control_files"));

    let files = create_control_files(&template, &slices, &params, &dir)?;
    assert_eq!(files.len(), 3);

    for (i, control) in files.iter().enumerate() {
        assert_eq!(control.worker, i);
        assert_eq!(control.path, control_file_path(&dir, i));
    }

    let first = std::fs::read_to_string(&files[0].path)?;
    assert_eq!(first, "years 1950 1951 for CanESM2\n");
    let last = std::fs::read_to_string(&files[2].path)?;
    assert_eq!(last, "years 1954 1955 for CanESM2\n");

    Ok(())
}

#[test]
fn test_parallel_config() -> Result<()> {
    let default_config = ParallelConfig::default();
    assert!(default_config.num_threads.is_none());
    assert!(default_config.resolved_threads() > 0);

    let config_4 = ParallelConfig::with_threads(4);
    assert_eq!(config_4.num_threads, Some(4));
    let pool = config_4.build_pool()?;
    assert_eq!(pool.current_num_threads(), 4);

    let all_cores_config = ParallelConfig::all_cores();
    assert!(all_cores_config.num_threads.unwrap() > 0);

    let zero = ParallelConfig::with_threads(0).build_pool();
    assert!(matches!(zero, Err(DriverError::InvalidWorkerCount(0))));

    Ok(())
}

#[test]
fn test_parallel_info() {
    let info = get_parallel_info();
    assert!(info.available_cores > 0);
    assert!(info.physical_cores > 0);
    assert!(info.available_parallelism > 0);

    assert!(!info.is_oversubscribed(info.available_cores));
    assert!(info.is_oversubscribed(info.available_cores + 1));

    info.print_info();
}

#[test]
fn test_create_control_files_removes_partial_output() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let dir = temp_dir.path().join("control_files");
    let template = ControlTemplate::from_text("years YEARBEGIN YEAREND\n");

    // The second slice has no years, so rendering fails after proc_0.cfg is written
    let slices = vec![
        YearSlice {
            worker: 0,
            years: vec![1950, 1951],
        },
        YearSlice {
            worker: 1,
            years: Vec::new(),
        },
    ];

    let result = create_control_files(&template, &slices, &TemplateParams::default(), &dir);
    assert!(result.is_err());
    assert!(!control_file_path(&dir, 0).exists());
    assert!(!control_file_path(&dir, 1).exists());

    Ok(())
}
