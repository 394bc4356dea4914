use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Report configuration, loaded from a YAML file. Every field has a default
/// so an absent config file yields a fully usable report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Prefix of the report headline; the log path is appended.
    pub headline: String,
    /// Server-to-local hour shift applied when labeling the time-of-day chart.
    pub time_offset: i32,
    /// Ordered module attribution rules; order fixes module emission order.
    pub modules: Vec<ModuleRule>,
    /// Display names for Monday..Sunday, in ISO order.
    pub weekday_names: [String; 7],
    pub chart: ChartStyle,
    pub titles: ChartTitles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRule {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// Series colors, cycled when there are more series than colors.
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartTitles {
    pub commits_all_users: String,
    pub commits_per_user: String,
    pub changes_per_user: String,
    pub commit_times: String,
    pub commit_days: String,
    pub commits_total: String,
    pub file_count: String,
    pub percentage: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            headline: "Commit statistics for ".to_string(),
            time_offset: 0,
            modules: Vec::new(),
            weekday_names: [
                "Mon".to_string(),
                "Tue".to_string(),
                "Wed".to_string(),
                "Thu".to_string(),
                "Fri".to_string(),
                "Sat".to_string(),
                "Sun".to_string(),
            ],
            chart: ChartStyle::default(),
            titles: ChartTitles::default(),
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 850,
            height: 360,
            colors: vec![
                "#4c72b0".to_string(),
                "#dd8452".to_string(),
                "#55a868".to_string(),
                "#c44e52".to_string(),
                "#8172b3".to_string(),
                "#937860".to_string(),
                "#da8bc3".to_string(),
                "#8c8c8c".to_string(),
                "#ccb974".to_string(),
                "#64b5cd".to_string(),
            ],
        }
    }
}

impl Default for ChartTitles {
    fn default() -> Self {
        Self {
            commits_all_users: "Commits by user".to_string(),
            commits_per_user: "Commits by ".to_string(),
            changes_per_user: "Changes by ".to_string(),
            commit_times: "Commit times of ".to_string(),
            commit_days: "Commit days of ".to_string(),
            commits_total: "Commits per day".to_string(),
            file_count: "File count".to_string(),
            percentage: "Commit share".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p.as_ref())?;
                let config: ReportConfig = serde_yaml::from_str(&raw)?;
                Ok(config)
            }
            None => Ok(ReportConfig::default()),
        }
    }

    pub fn color(&self, index: usize) -> &str {
        &self.chart.colors[index % self.chart.colors.len()]
    }
}
