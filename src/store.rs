use crate::model::CommitRecord;
use std::collections::{HashMap, HashSet};

/// Owns the full ingested record set and its lookup indexes.
///
/// Built once by replaying the log stream, then treated as read-only for the
/// rest of the run; every memoized result downstream relies on that.
/// `users` and `dates` keep first-encountered order — the log source emits
/// newest-first, and the pipeline reverses the date list once after loading
/// so it reads chronologically. The store itself never sorts.
#[derive(Default)]
pub struct CommitStore {
    records: Vec<CommitRecord>,
    by_date: HashMap<String, Vec<usize>>,
    users: Vec<String>,
    dates: Vec<String>,
    seen_users: HashSet<String>,
    seen_dates: HashSet<String>,
}

impl CommitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: CommitRecord) {
        if self.seen_users.insert(record.user.clone()) {
            self.users.push(record.user.clone());
        }
        if self.seen_dates.insert(record.date.clone()) {
            self.dates.push(record.date.clone());
        }
        self.by_date
            .entry(record.date.clone())
            .or_default()
            .push(self.records.len());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records committed on `date`, in insertion order. An unknown date is
    /// not an error; it simply has no commits.
    pub fn records_for_date<'a>(&'a self, date: &str) -> impl Iterator<Item = &'a CommitRecord> {
        self.by_date
            .get(date)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.records[i])
    }

    pub fn distinct_users(&self) -> &[String] {
        &self.users
    }

    pub fn distinct_dates(&self) -> &[String] {
        &self.dates
    }

    /// Flips the date list into chronological order. Called exactly once by
    /// the pipeline after ingestion of a newest-first log.
    pub fn reverse_dates(&mut self) {
        self.dates.reverse();
    }
}
