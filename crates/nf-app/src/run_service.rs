//! Run folder access: flux files, final abundances and factor sweeps.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nf_abundance::{
    AbundanceSnapshot, DUMP_PREFIX, FINAL_ABUNDANCE_FILE, SUMMARY_FILE, read_agej,
    read_final_abundances,
};
use nf_core::Real;
use nf_flux::{StepTable, load_step_tables, step_index};
use nf_sensitivity::{SweepRun, factor_from_name, sweep_factor};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// One simulation output folder.
#[derive(Debug, Clone)]
pub struct RunDir {
    root: PathBuf,
}

impl RunDir {
    pub fn open(path: &Path) -> AppResult<Self> {
        if !path.is_dir() {
            return Err(AppError::RunNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Folder name, used as the run's display label.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn final_abundance_path(&self) -> PathBuf {
        self.root.join(FINAL_ABUNDANCE_FILE)
    }

    pub fn has_final_abundances(&self) -> bool {
        self.final_abundance_path().exists()
    }

    pub fn final_abundances(&self) -> AppResult<AbundanceSnapshot> {
        Ok(read_final_abundances(&self.final_abundance_path())?)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }

    /// `agej` of every `iso_massf*.DAT` dump, keyed by file name.
    pub fn dump_times(&self) -> AppResult<BTreeMap<String, Real>> {
        let mut times = BTreeMap::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(DUMP_PREFIX) || !name.ends_with(".DAT") || !path.is_file() {
                continue;
            }
            match read_agej(&path)? {
                Some(time) => {
                    times.insert(name.to_string(), time);
                }
                None => warn!(file = %name, "no agej in dump header, skipping"),
            }
        }
        debug!(run = %self.name(), dumps = times.len(), "read dump times");
        Ok(times)
    }

    /// `flux_<digits>.DAT` files sorted by step index.
    pub fn flux_files(&self) -> AppResult<Vec<PathBuf>> {
        let mut files: Vec<(u64, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(step) = step_index(&path) {
                files.push((step, path));
            }
        }

        if files.is_empty() {
            return Err(AppError::NoFluxFiles {
                path: self.root.clone(),
            });
        }

        files.sort();
        debug!(run = %self.name(), files = files.len(), "found flux files");
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// Decode every flux file of the run, in step order.
    pub fn load_steps(&self, min_abs_flux: Real) -> AppResult<Vec<StepTable>> {
        let files = self.flux_files()?;
        let steps = load_step_tables(&files, min_abs_flux)?;
        info!(run = %self.name(), steps = steps.len(), "loaded flux steps");
        Ok(steps)
    }
}

/// Subdirectories of `runs_dir` whose name yields a factor via `factor_of`
/// and that hold a final-abundance table. Sorted by factor, then name.
fn scan_runs<F>(runs_dir: &Path, factor_of: F) -> AppResult<Vec<SweepRun>>
where
    F: Fn(&str) -> Option<Real>,
{
    if !runs_dir.is_dir() {
        return Err(AppError::RunNotFound {
            path: runs_dir.to_path_buf(),
        });
    }

    let mut runs = Vec::new();
    for entry in fs::read_dir(runs_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let Some(factor) = factor_of(&name) else {
            continue;
        };

        let run = RunDir::open(&path)?;
        if !run.has_final_abundances() {
            warn!(run = %name, "no {} in run folder, skipping", FINAL_ABUNDANCE_FILE);
            continue;
        }
        runs.push(SweepRun {
            name,
            factor,
            abundances: run.final_abundances()?,
        });
    }

    runs.sort_by(|a, b| a.factor.total_cmp(&b.factor).then_with(|| a.name.cmp(&b.name)));
    info!(runs_dir = %runs_dir.display(), runs = runs.len(), "scanned sweep runs");
    Ok(runs)
}

/// Every `fact_<number>` run plus the `baseline` run.
pub fn scan_factor_runs(runs_dir: &Path) -> AppResult<Vec<SweepRun>> {
    scan_runs(runs_dir, sweep_factor)
}

/// `fact_<number>` runs whose folder name contains `pattern`.
pub fn scan_pattern_runs(runs_dir: &Path, pattern: &str) -> AppResult<Vec<SweepRun>> {
    let runs = scan_runs(runs_dir, |name| {
        if name.contains(pattern) {
            factor_from_name(name)
        } else {
            None
        }
    })?;

    if runs.is_empty() {
        return Err(AppError::NoMatchingRuns {
            pattern: pattern.to_string(),
            path: runs_dir.to_path_buf(),
        });
    }
    Ok(runs)
}
