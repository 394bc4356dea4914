use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// One commit from the version-control log, immutable once constructed.
///
/// `date` is canonical `YYYY-MM-DD`, `time` is the `HH:MM:SS` portion (only
/// the hour digits are consumed downstream), `user` is already lower-cased by
/// ingestion. `files` holds added paths first, then modified, then deleted,
/// so `added + modified + deleted == files.len()` for ingested records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub date: String,
    pub time: String,
    pub user: String,
    pub added: u32,
    pub modified: u32,
    pub deleted: u32,
    pub files: Vec<String>,
}

/// The closed set of per-commit change counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn count_in(self, record: &CommitRecord) -> u32 {
        match self {
            ChangeKind::Added => record.added,
            ChangeKind::Modified => record.modified,
            ChangeKind::Deleted => record.deleted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// One named numeric series of a tabular report result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }
}

/// Tabular report result: shared category labels plus one or more series
/// aligned to them. This is the only shape handed to the render sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub labels: Vec<String>,
    pub rows: Vec<Series>,
}

impl Table {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Series) {
        self.rows.push(row);
    }

    /// Min and max over all cell values; `None` for a table with no cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.rows.iter().flat_map(|r| r.values.iter().copied());
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some((min, max))
    }

    /// Largest per-column sum across rows, for stacked-bar axis scaling.
    pub fn max_column_sum(&self) -> f64 {
        (0..self.labels.len())
            .map(|i| {
                self.rows
                    .iter()
                    .map(|r| r.values.get(i).copied().unwrap_or(0.0))
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub log_path: String,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub tables: Vec<NamedTable>,
}
