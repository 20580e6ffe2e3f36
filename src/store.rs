//! # Report Store
//!
//! Keeps the latest [`BreakReport`] per break in a single JSON file. Writing a
//! break's report replaces whatever was stored for it, today and forecast days
//! alike, so a break never mixes rows from two refreshes.
//!
//! [`ReportStore::ranked`] is the main read path: every configured break,
//! best score first, with breaks that have no report yet listed at zero.

use crate::config::BreakConfig;
use crate::report::BreakReport;
use crate::scoring::{quality_label, QualityLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading or writing the report file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File operations failed (permissions, disk space)
    #[error("store IO: {0}")]
    Io(#[from] io::Error),

    /// File exists but is not a valid report file
    #[error("store format: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    reports: BTreeMap<String, BreakReport>,
}

/// A configured break with its latest report, if any.
#[derive(Debug, Clone, Copy)]
pub struct RankedBreak<'a> {
    pub config: &'a BreakConfig,
    pub report: Option<&'a BreakReport>,
}

impl RankedBreak<'_> {
    /// Today's score, 0 for a break that has never been refreshed.
    pub fn score(&self) -> u8 {
        self.report.map_or(0, |r| r.today.score)
    }

    pub fn label(&self) -> QualityLabel {
        quality_label(self.score())
    }
}

/// Latest reports keyed by break id, backed by a JSON file.
#[derive(Debug)]
pub struct ReportStore {
    path: PathBuf,
    file: StoreFile,
}

impl ReportStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), reports = file.reports.len(), "opened report store");
        Ok(ReportStore { path, file })
    }

    /// Replace the stored report for the report's break.
    pub fn replace(&mut self, report: BreakReport) -> Option<BreakReport> {
        self.file.reports.insert(report.break_id.clone(), report)
    }

    pub fn get(&self, break_id: &str) -> Option<&BreakReport> {
        self.file.reports.get(break_id)
    }

    /// Configured breaks ordered by today's score, highest first.
    ///
    /// Ties keep configuration order. Stored reports for breaks no longer
    /// configured are left out.
    pub fn ranked<'a>(&'a self, breaks: &'a [BreakConfig]) -> Vec<RankedBreak<'a>> {
        let mut ranked: Vec<_> = breaks
            .iter()
            .map(|config| RankedBreak {
                config,
                report: self.get(&config.id),
            })
            .collect();
        ranked.sort_by(|a, b| b.score().cmp(&a.score()));
        ranked
    }

    pub fn len(&self) -> usize {
        self.file.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.reports.is_empty()
    }

    /// Write the store back to its file.
    pub fn save(&self) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(&self.file)?;
        fs::write(&self.path, data)?;
        debug!(path = %self.path.display(), reports = self.len(), "saved report store");
        Ok(())
    }
}
