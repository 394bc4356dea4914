use crate::config::ReportConfig;
use crate::engine::AggregationEngine;
use crate::error::Result;
use crate::model::{ChangeKind, Series, Table};
use chrono::Weekday;

use super::{ModuleActivity, ModuleActivityByDate};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The named report computations, each a pure composition of engine
/// primitives producing a [`Table`]. `None` is the first-class "no data to
/// plot" outcome for degenerate inputs (empty range, zero total, flat
/// series), distinct from a table of zeros; callers skip that one artifact
/// and continue.
pub struct ReportQueries<'a> {
    engine: &'a mut AggregationEngine,
    config: &'a ReportConfig,
}

impl<'a> ReportQueries<'a> {
    pub fn new(engine: &'a mut AggregationEngine, config: &'a ReportConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&mut self) -> &mut AggregationEngine {
        self.engine
    }

    /// One commit-count series for `user` over the filtered dates.
    pub fn commits_per_user(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Option<Table> {
        let dates = self.engine.filter_dates(from, to);
        if dates.is_empty() {
            return None;
        }
        let values = dates
            .iter()
            .map(|d| self.engine.count_commits(d, user) as f64)
            .collect();
        let mut table = Table::new(dates);
        table.push_row(Series::new(user, values));
        Some(table)
    }

    /// One commit-count series per user (store order) over the filtered
    /// dates; the per-date total column is derived by the CSV sink.
    pub fn commits_all_users(&mut self, from: Option<&str>, to: Option<&str>) -> Option<Table> {
        let dates = self.engine.filter_dates(from, to);
        if dates.is_empty() {
            return None;
        }
        let users: Vec<String> = self.engine.store().distinct_users().to_vec();
        let mut table = Table::new(dates.clone());
        for user in &users {
            let values = dates
                .iter()
                .map(|d| self.engine.count_commits(d, user) as f64)
                .collect();
            table.push_row(Series::new(user.clone(), values));
        }
        Some(table)
    }

    /// Per-date commit totals across all users, as a single series.
    pub fn commits_total(&mut self, from: Option<&str>, to: Option<&str>) -> Option<Table> {
        let dates = self.engine.filter_dates(from, to);
        if dates.is_empty() {
            return None;
        }
        let users: Vec<String> = self.engine.store().distinct_users().to_vec();
        let values = dates
            .iter()
            .map(|d| {
                users
                    .iter()
                    .map(|u| self.engine.count_commits(d, u))
                    .sum::<u64>() as f64
            })
            .collect();
        let mut table = Table::new(dates);
        table.push_row(Series::new("total", values));
        Some(table)
    }

    /// Added/modified/deleted sums for `user`, one series per change kind.
    pub fn changes_per_user(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Option<Table> {
        let dates = self.engine.filter_dates(from, to);
        if dates.is_empty() {
            return None;
        }
        let mut table = Table::new(dates.clone());
        for kind in [ChangeKind::Added, ChangeKind::Modified, ChangeKind::Deleted] {
            let values = dates
                .iter()
                .map(|d| self.engine.sum_changes(d, user, kind) as f64)
                .collect();
            table.push_row(Series::new(kind.label(), values));
        }
        Some(table)
    }

    /// Each user's share of all commits in the range, as 0-100 percentages
    /// over the user labels. `None` when the grand total is zero; a pie of
    /// nothing is not a chart.
    pub fn commits_percentage(&mut self, from: Option<&str>, to: Option<&str>) -> Option<Table> {
        let dates = self.engine.filter_dates(from, to);
        let users: Vec<String> = self.engine.store().distinct_users().to_vec();

        let mut per_user = vec![0u64; users.len()];
        let mut grand_total = 0u64;
        for date in &dates {
            for (i, user) in users.iter().enumerate() {
                let commits = self.engine.count_commits(date, user);
                per_user[i] += commits;
                grand_total += commits;
            }
        }
        if grand_total == 0 {
            return None;
        }

        let values = per_user
            .iter()
            .map(|&c| (c as f64 / grand_total as f64) * 100.0)
            .collect();
        let mut table = Table::new(users);
        table.push_row(Series::new("percent", values));
        Some(table)
    }

    /// Commit counts per local hour of day, 24 buckets labeled `0:00` to
    /// `23:00`. Display bucket `j` counts the raw server hour
    /// `(j + 24 + time_offset) mod 24`; the engine itself only does prefix
    /// equality.
    pub fn commit_times_per_user(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Option<Table> {
        if self.engine.filter_dates(from, to).is_empty() {
            return None;
        }
        let offset = self.config.time_offset;
        let mut labels = Vec::with_capacity(24);
        let mut values = Vec::with_capacity(24);
        for display_hour in 0..24i32 {
            let raw_hour = (display_hour + 24 + offset).rem_euclid(24);
            labels.push(format!("{display_hour}:00"));
            values.push(self.engine.commits_per_hour(user, from, to, &format!("{raw_hour:02}")) as f64);
        }
        let mut table = Table::new(labels);
        table.push_row(Series::new(user, values));
        Some(table)
    }

    /// Commit counts per weekday, Monday..Sunday, labels from config.
    pub fn commit_days_per_user(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Option<Table>> {
        if self.engine.filter_dates(from, to).is_empty() {
            return Ok(None);
        }
        let mut values = Vec::with_capacity(7);
        for weekday in WEEKDAYS {
            values.push(self.engine.commits_per_weekday(user, from, to, weekday)? as f64);
        }
        let mut table = Table::new(self.config.weekday_names.to_vec());
        table.push_row(Series::new(user, values));
        Ok(Some(table))
    }

    /// Absolute file count over the filtered dates: a running sum of per-date
    /// `added - deleted` across all users, seeded with the same sum over
    /// every date strictly before the range start so the plot shows the real
    /// count rather than a range-relative delta. `None` for an empty range
    /// or a flat series (a zero value-range cannot scale an axis).
    pub fn file_count(&mut self, from: Option<&str>, to: Option<&str>) -> Option<Table> {
        let dates = self.engine.filter_dates(from, to);
        if dates.is_empty() {
            return None;
        }

        let mut base = 0i64;
        if let Some(from) = from {
            let all_dates = self.engine.filter_dates(None, None);
            for date in all_dates.iter().filter(|d| d.as_str() < from) {
                base += self.engine.file_delta(date);
            }
        }

        let mut sum = base;
        let mut values = Vec::with_capacity(dates.len());
        for date in &dates {
            sum += self.engine.file_delta(date);
            values.push(sum as f64);
        }

        let mut table = Table::new(dates);
        table.push_row(Series::new("files", values));

        let (min, max) = table.value_range()?;
        if max - min == 0.0 {
            return None;
        }
        Some(table)
    }

    /// Runs module attribution for `user` over the filtered dates and
    /// returns, per date, the modules the user was active in that day.
    /// `None` when no module rules are configured.
    pub fn modules_per_user(
        &mut self,
        user: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Option<Vec<(String, Vec<String>)>> {
        if !self.engine.has_module_rules() {
            return None;
        }
        let dates = self.engine.filter_dates(from, to);
        self.engine.attribute_modules(user, &dates);

        let mut per_day = Vec::new();
        for date in &dates {
            let active: Vec<String> = self
                .engine
                .module_list()
                .iter()
                .filter(|m| self.engine.module_count_by_user_date(user, m, date).is_some())
                .cloned()
                .collect();
            if !active.is_empty() {
                per_day.push((date.clone(), active));
            }
        }
        Some(per_day)
    }

    /// Per-user active-day counts per module, users in store order, modules
    /// in first-match order. Only pairs that were ever active appear.
    pub fn module_activity_per_user(&mut self) -> ModuleActivity {
        let users: Vec<String> = self.engine.store().distinct_users().to_vec();
        users
            .into_iter()
            .map(|user| {
                let counts = self
                    .engine
                    .module_list()
                    .iter()
                    .filter_map(|m| {
                        self.engine
                            .module_count_by_user(&user, m)
                            .map(|c| (m.clone(), c))
                    })
                    .collect();
                (user, counts)
            })
            .collect()
    }

    /// Per-user, per-date matched-file counts per module, over every known
    /// date. The per-file counter and the per-active-day counter above are
    /// different measures and stay separate views.
    pub fn module_activity_per_user_per_date(&mut self) -> ModuleActivityByDate {
        let users: Vec<String> = self.engine.store().distinct_users().to_vec();
        let dates: Vec<String> = self.engine.store().distinct_dates().to_vec();
        users
            .into_iter()
            .map(|user| {
                let per_date = dates
                    .iter()
                    .map(|date| {
                        let counts = self
                            .engine
                            .module_list()
                            .iter()
                            .filter_map(|m| {
                                self.engine
                                    .module_count_by_user_date(&user, m, date)
                                    .map(|c| (m.clone(), c))
                            })
                            .collect();
                        (date.clone(), counts)
                    })
                    .collect();
                (user, per_date)
            })
            .collect()
    }
}
