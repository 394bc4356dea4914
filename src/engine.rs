use crate::error::{Result, RevstatError};
use crate::model::ChangeKind;
use crate::modules::ModuleClassifier;
use crate::store::CommitStore;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};

/// Memoized query layer over an immutable [`CommitStore`].
///
/// Every cache below is a pure function of its key tuple over the record set,
/// and the store never mutates after load, so no cache here ever needs
/// invalidation. That single invariant carries the whole engine; it also
/// means the caches are only safe under single-threaded access.
pub struct AggregationEngine {
    store: CommitStore,
    classifier: ModuleClassifier,
    date_range_cache: HashMap<(Option<String>, Option<String>), Vec<String>>,
    commit_count_cache: HashMap<(String, String), u64>,
    module_count_by_user: HashMap<(String, String), u64>,
    module_count_by_user_date: HashMap<(String, String, String), u64>,
    module_list: Vec<String>,
    attributed_users: HashSet<String>,
}

impl AggregationEngine {
    pub fn new(store: CommitStore, classifier: ModuleClassifier) -> Self {
        Self {
            store,
            classifier,
            date_range_cache: HashMap::new(),
            commit_count_cache: HashMap::new(),
            module_count_by_user: HashMap::new(),
            module_count_by_user_date: HashMap::new(),
            module_list: Vec::new(),
            attributed_users: HashSet::new(),
        }
    }

    pub fn store(&self) -> &CommitStore {
        &self.store
    }

    pub fn has_module_rules(&self) -> bool {
        !self.classifier.is_empty()
    }

    /// Distinct dates within the inclusive `[from, to]` bounds, in store
    /// order. An absent bound is unbounded on that side; `None` and a
    /// literal empty string are distinct keys, so no sentinel value can
    /// collide with a real bound. Lexical comparison is valid because dates
    /// are zero-padded `YYYY-MM-DD`.
    pub fn filter_dates(&mut self, from: Option<&str>, to: Option<&str>) -> Vec<String> {
        let key = (from.map(str::to_string), to.map(str::to_string));
        if let Some(cached) = self.date_range_cache.get(&key) {
            return cached.clone();
        }
        let result: Vec<String> = self
            .store
            .distinct_dates()
            .iter()
            .filter(|date| {
                from.map_or(true, |f| date.as_str() >= f) && to.map_or(true, |t| date.as_str() <= t)
            })
            .cloned()
            .collect();
        self.date_range_cache.insert(key, result.clone());
        result
    }

    /// Number of commits by `user` on `date`; 0 for a combination with no
    /// records. First call per key scans that date's bucket, after which the
    /// result is memoized for the life of the engine.
    pub fn count_commits(&mut self, date: &str, user: &str) -> u64 {
        let key = (date.to_string(), user.to_string());
        if let Some(&cached) = self.commit_count_cache.get(&key) {
            return cached;
        }
        let count = self
            .store
            .records_for_date(date)
            .filter(|r| r.user == user)
            .count() as u64;
        self.commit_count_cache.insert(key, count);
        count
    }

    /// Sum of one change counter over `user`'s commits on `date`. The change
    /// kind is a closed enum, so an unrecognized type is unrepresentable.
    /// Cheap enough that it is not memoized.
    pub fn sum_changes(&self, date: &str, user: &str, kind: ChangeKind) -> u64 {
        self.store
            .records_for_date(date)
            .filter(|r| r.user == user)
            .map(|r| u64::from(kind.count_in(r)))
            .sum()
    }

    /// Net `added - deleted` across all users on `date`.
    pub fn file_delta(&self, date: &str) -> i64 {
        self.store
            .records_for_date(date)
            .map(|r| i64::from(r.added) - i64::from(r.deleted))
            .sum()
    }

    /// Commits by `user` in the range whose time starts with the two-digit
    /// `hour` prefix. Pure string equality; mapping display hours through
    /// the configured server offset is the report layer's job.
    pub fn commits_per_hour(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
        hour: &str,
    ) -> u64 {
        let mut result = 0;
        for date in self.filter_dates(from, to) {
            result += self
                .store
                .records_for_date(&date)
                .filter(|r| r.user == user && r.time.get(0..2) == Some(hour))
                .count() as u64;
        }
        result
    }

    /// Commits by `user` in the range falling on `weekday`. A stored date
    /// that does not parse as `YYYY-MM-DD` means the ingestion collaborator
    /// broke its contract; that aborts the run rather than silently skewing
    /// every aggregate.
    pub fn commits_per_weekday(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
        weekday: Weekday,
    ) -> Result<u64> {
        let mut result = 0;
        for date in self.filter_dates(from, to) {
            let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| RevstatError::InvalidDate(date.clone()))?;
            if parsed.weekday() == weekday {
                result += self.count_commits(&date, user);
            }
        }
        Ok(result)
    }

    /// Classifies every file `user` touched on the given dates and fills the
    /// two module counters: the per-file counter bumps once per matching
    /// file per module per date, while the per-active-day counter bumps
    /// exactly once per date on which the module was touched at all. The two
    /// deliberately diverge and feed different report views.
    ///
    /// Attribution runs at most once per user; repeated calls are no-ops so
    /// re-running a report query cannot double-count.
    pub fn attribute_modules(&mut self, user: &str, dates: &[String]) {
        if self.classifier.is_empty() || !self.attributed_users.insert(user.to_string()) {
            return;
        }
        for date in dates {
            let mut active_today: Vec<String> = Vec::new();
            for record in self.store.records_for_date(date) {
                if record.user != user {
                    continue;
                }
                for file in &record.files {
                    for module in self.classifier.classify(file) {
                        let key = (user.to_string(), module.to_string(), date.clone());
                        *self.module_count_by_user_date.entry(key).or_insert(0) += 1;
                        if !active_today.iter().any(|m| m == module) {
                            active_today.push(module.to_string());
                        }
                        if !self.module_list.iter().any(|m| m == module) {
                            self.module_list.push(module.to_string());
                        }
                    }
                }
            }
            for module in active_today {
                *self
                    .module_count_by_user
                    .entry((user.to_string(), module))
                    .or_insert(0) += 1;
            }
        }
    }

    /// Active-day count for `(user, module)`, if that pair was ever active.
    pub fn module_count_by_user(&self, user: &str, module: &str) -> Option<u64> {
        self.module_count_by_user
            .get(&(user.to_string(), module.to_string()))
            .copied()
    }

    /// Matched-file count for `(user, module, date)`, if any file matched.
    pub fn module_count_by_user_date(&self, user: &str, module: &str, date: &str) -> Option<u64> {
        self.module_count_by_user_date
            .get(&(user.to_string(), module.to_string(), date.to_string()))
            .copied()
    }

    /// All module names ever matched, in first-match order.
    pub fn module_list(&self) -> &[String] {
        &self.module_list
    }
}
