//! Control file templating
//!
//! The external converter is configured through a plain-text control file. A
//! base control file carries placeholder tokens which are replaced, globally and
//! literally, to produce one control file per worker.

use crate::errors::{DriverError, Result};
use crate::partition::YearSlice;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the directory generated control files are written to
pub const CONTROL_DIR_NAME: &str = "control_files";

/// Placeholder tokens recognised in a base control file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Input file glob
    InFiles,
    /// Output directory, GCM name appended
    OutDir,
    /// Prefix for the written netCDF files
    OutPrefix,
    /// First year handled by the worker
    YearBegin,
    /// Last year handled by the worker
    YearEnd,
    /// GCM name
    Gcm,
}

impl Placeholder {
    /// All placeholders in substitution order.
    ///
    /// Path tokens come first so a GCM token inside a path value is resolved too.
    pub const ALL: [Placeholder; 6] = [
        Self::InFiles,
        Self::OutDir,
        Self::OutPrefix,
        Self::YearBegin,
        Self::YearEnd,
        Self::Gcm,
    ];

    /// The literal token as it appears in a control file
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::InFiles => "INFILES",
            Self::OutDir => "OUTDIR",
            Self::OutPrefix => "OUTPREFIX",
            Self::YearBegin => "YEARBEGIN",
            Self::YearEnd => "YEAREND",
            Self::Gcm => "PROCESSGCM",
        }
    }
}

/// Run-wide values shared by every generated control file
#[derive(Debug, Clone, Default)]
pub struct TemplateParams {
    pub gcm: String,
    pub infiles: String,
    pub outdir: PathBuf,
    pub prefix: String,
}

impl TemplateParams {
    /// Output directory with the GCM name appended as a final component.
    ///
    /// An empty GCM name leaves the directory unchanged.
    #[must_use]
    pub fn gcm_outdir(&self) -> PathBuf {
        if self.gcm.is_empty() {
            self.outdir.clone()
        } else {
            self.outdir.join(&self.gcm)
        }
    }
}

/// Values substituted into a single worker's control file
#[derive(Debug, Clone)]
pub struct Substitutions {
    pub year_begin: i32,
    pub year_end: i32,
    pub gcm: String,
    pub infiles: String,
    pub outdir: String,
    pub prefix: String,
}

impl Substitutions {
    /// Build the substitutions for one worker's slice of years
    pub fn for_slice(slice: &YearSlice, params: &TemplateParams) -> Result<Self> {
        let (year_begin, year_end) = match (slice.first(), slice.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(DriverError::Generic(format!(
                    "worker {} was assigned no years",
                    slice.worker
                )))
            }
        };

        Ok(Self {
            year_begin,
            year_end,
            gcm: params.gcm.clone(),
            infiles: params.infiles.clone(),
            outdir: params.gcm_outdir().display().to_string(),
            prefix: params.prefix.clone(),
        })
    }

    fn value(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::InFiles => self.infiles.clone(),
            Placeholder::OutDir => self.outdir.clone(),
            Placeholder::OutPrefix => self.prefix.clone(),
            Placeholder::YearBegin => self.year_begin.to_string(),
            Placeholder::YearEnd => self.year_end.to_string(),
            Placeholder::Gcm => self.gcm.clone(),
        }
    }
}

/// A base control file with placeholder tokens
#[derive(Debug, Clone)]
pub struct ControlTemplate {
    source: Option<PathBuf>,
    text: String,
}

impl ControlTemplate {
    /// Read a base control file from disk
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::TemplateNotFound`] if the file does not exist and
    /// an I/O error if it cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DriverError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            text,
        })
    }

    /// Build a template from in-memory text
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: None,
            text: text.into(),
        }
    }

    /// Path the template was loaded from, if any
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Placeholders that occur at least once in the template
    #[must_use]
    pub fn placeholders_present(&self) -> Vec<Placeholder> {
        Placeholder::ALL
            .into_iter()
            .filter(|p| self.text.contains(p.token()))
            .collect()
    }

    /// Placeholders that never occur in the template
    #[must_use]
    pub fn missing_placeholders(&self) -> Vec<Placeholder> {
        Placeholder::ALL
            .into_iter()
            .filter(|p| !self.text.contains(p.token()))
            .collect()
    }

    /// Replace every placeholder occurrence with its value
    #[must_use]
    pub fn render(&self, subs: &Substitutions) -> String {
        Placeholder::ALL
            .into_iter()
            .fold(self.text.clone(), |text, placeholder| {
                text.replace(placeholder.token(), &subs.value(placeholder))
            })
    }
}

/// A generated control file and the worker that consumes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFile {
    pub worker: usize,
    pub path: PathBuf,
    pub year_begin: i32,
    pub year_end: i32,
}

/// Default directory for generated control files: `control_files/` beside the template
#[must_use]
pub fn default_control_dir(template_path: &Path) -> PathBuf {
    template_path
        .parent()
        .map(|dir| dir.join(CONTROL_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(CONTROL_DIR_NAME))
}

/// Path of the control file for a given worker
#[must_use]
pub fn control_file_path(dir: &Path, worker: usize) -> PathBuf {
    dir.join(format!("proc_{worker}.cfg"))
}

/// Writes one rendered control file per slice into `dir`.
///
/// `dir` is created if it does not exist. Existing files for the same worker
/// index are overwritten. On failure, files already written by this call are
/// removed before the error is returned.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, a file cannot be
/// written, or a slice has no years.
pub fn create_control_files(
    template: &ControlTemplate,
    slices: &[YearSlice],
    params: &TemplateParams,
    dir: &Path,
) -> Result<Vec<ControlFile>> {
    fs::create_dir_all(dir)?;

    let mut control_files = Vec::with_capacity(slices.len());
    for slice in slices {
        match write_control_file(template, slice, params, dir) {
            Ok(control) => control_files.push(control),
            Err(e) => {
                for written in &control_files {
                    if let Err(remove_err) = fs::remove_file(&written.path) {
                        warn!(
                            path = %written.path.display(),
                            "failed to remove partial control file: {}",
                            remove_err
                        );
                    }
                }
                return Err(e);
            }
        }
    }

    Ok(control_files)
}

fn write_control_file(
    template: &ControlTemplate,
    slice: &YearSlice,
    params: &TemplateParams,
    dir: &Path,
) -> Result<ControlFile> {
    let subs = Substitutions::for_slice(slice, params)?;
    let path = control_file_path(dir, slice.worker);
    fs::write(&path, template.render(&subs))?;

    debug!(
        worker = slice.worker,
        begin = subs.year_begin,
        end = subs.year_end,
        path = %path.display(),
        "wrote control file"
    );

    Ok(ControlFile {
        worker: slice.worker,
        path,
        year_begin: subs.year_begin,
        year_end: subs.year_end,
    })
}
