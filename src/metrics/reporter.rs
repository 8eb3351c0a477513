//! Result reporter - appends trial rows to the shared results file
//!
//! Row format: `<language-tag>|<label>|<ops-per-second>|<last-value>`, no
//! header and no escaping. Other runtimes append to the same file, so it is
//! opened in append mode for every row and never truncated.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::benchmark::timer::ops_per_sec;
use crate::utils::{BenchmarkError, Result};

/// Default results file, relative to the working directory
pub const DEFAULT_RESULTS_FILE: &str = "benchmark.csv";

/// Language tag written in the first column
pub const LANGUAGE_TAG: &str = "rust";

/// Column delimiter
pub const DELIMITER: char = '|';

/// One trial's row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
    pub label: String,
    pub iterations: u64,
    pub ops_per_sec: u64,
    pub last_value: String,
}

impl TrialResult {
    /// Build a row from a finished trial
    pub fn new(label: impl Into<String>, iterations: u64, duration: Duration, last_value: i64) -> Self {
        Self {
            label: label.into(),
            iterations,
            ops_per_sec: ops_per_sec(iterations, duration),
            last_value: last_value.to_string(),
        }
    }

    /// Format as a results-file line (without newline)
    pub fn to_row(&self, language_tag: &str) -> String {
        format!(
            "{tag}{d}{label}{d}{ops}{d}{last}",
            tag = language_tag,
            label = self.label,
            ops = self.ops_per_sec,
            last = self.last_value,
            d = DELIMITER
        )
    }
}

/// Appends rows to the results file
#[derive(Debug, Clone)]
pub struct ResultReporter {
    path: PathBuf,
    language_tag: String,
}

impl ResultReporter {
    /// Create reporter writing to `path`
    pub fn new(path: impl Into<PathBuf>, language_tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language_tag: language_tag.into(),
        }
    }

    /// Results file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, creating the file if needed
    pub fn append(&self, result: &TrialResult) -> Result<()> {
        if result.label.contains(DELIMITER) {
            return Err(BenchmarkError::Config(format!(
                "label {:?} contains the column delimiter",
                result.label
            )));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", result.to_row(&self.language_tag))?;
        Ok(())
    }
}
