use crate::cli::CommonArgs;
use crate::config::ReportConfig;
use crate::engine::AggregationEngine;
use crate::ingest;
use crate::modules::ModuleClassifier;
use crate::render::{csv, html, svg};
use crate::report::ReportQueries;
use crate::store::CommitStore;
use anyhow::Context;
use console::style;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generates the full report: charts, CSV tables, per-user module files and
/// the HTML index, in the output directory. Degenerate queries skip their
/// one artifact; only load and ingestion problems abort the run.
pub fn exec(common: CommonArgs, out: PathBuf) -> anyhow::Result<()> {
    let config =
        ReportConfig::load(common.config.as_ref()).context("Failed to load report config")?;
    let classifier =
        ModuleClassifier::compile(&config.modules).context("Failed to compile module rules")?;

    let mut engine = load_engine(&common, classifier)?;
    let begin = common.begin.as_deref();
    let end = common.end.as_deref();

    if engine.filter_dates(begin, end).is_empty() {
        println!("No commits to analyze.");
        return Ok(());
    }

    fs::create_dir_all(&out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let users: Vec<String> = engine.store().distinct_users().to_vec();
    let record_count = engine.store().len();
    let mut queries = ReportQueries::new(&mut engine, &config);

    let mut global_charts: Vec<String> = Vec::new();

    if let Some(table) = queries.commits_total(begin, end) {
        let markup = svg::line_chart(
            &config,
            &config.titles.commits_total,
            "Date",
            "Commits",
            &table,
            None,
        );
        write_chart(&out, "Total_commits.svg", &markup, &mut global_charts)?;
    }

    match queries.file_count(begin, end) {
        Some(table) => {
            let y_min = table.value_range().map(|(min, _)| min);
            let markup = svg::line_chart(
                &config,
                &config.titles.file_count,
                "Date",
                "Files",
                &table,
                y_min,
            );
            write_chart(&out, "File_Count.svg", &markup, &mut global_charts)?;
        }
        None => info!("file count not plottable, skipping chart"),
    }

    if let Some(table) = queries.commits_all_users(begin, end) {
        let markup = svg::stacked_bar_chart(
            &config,
            &config.titles.commits_all_users,
            "Date",
            "Commits",
            &table,
        );
        write_chart(&out, "AllUsers_commits.svg", &markup, &mut global_charts)?;
        csv::write_table(out.join("AllUsers_commits.csv"), "date", &table, true)
            .context("Failed to write commit table")?;
    }

    match queries.commits_percentage(begin, end) {
        Some(table) => {
            let markup = svg::pie_chart(&config, &config.titles.percentage, &table);
            write_chart(&out, "Commit_Percentage.svg", &markup, &mut global_charts)?;
        }
        None => info!("no commits in range, skipping percentage chart"),
    }

    let progress = ProgressBar::new(users.len() as u64);
    progress.set_message("Rendering user charts");
    let mut user_sections: Vec<(String, Vec<String>)> = Vec::new();
    for user in &users {
        let mut charts: Vec<String> = Vec::new();

        if let Some(table) = queries.commits_per_user(user, begin, end) {
            let title = format!("{}{user}", config.titles.commits_per_user);
            let markup = svg::stacked_bar_chart(&config, &title, "Date", "Commits", &table);
            write_chart(&out, &format!("{user}_commits.svg"), &markup, &mut charts)?;
        }
        if let Some(table) = queries.changes_per_user(user, begin, end) {
            let title = format!("{}{user}", config.titles.changes_per_user);
            let markup = svg::stacked_bar_chart(&config, &title, "Date", "Changes", &table);
            write_chart(&out, &format!("{user}_changes.svg"), &markup, &mut charts)?;
        }
        if let Some(table) = queries.commit_times_per_user(user, begin, end) {
            let title = format!("{}{user}", config.titles.commit_times);
            let markup = svg::stacked_bar_chart(&config, &title, "Hour", "Commits", &table);
            write_chart(&out, &format!("{user}_commitTimes.svg"), &markup, &mut charts)?;
        }
        if let Some(table) = queries
            .commit_days_per_user(user, begin, end)
            .context("Failed to compute weekday distribution")?
        {
            let title = format!("{}{user}", config.titles.commit_days);
            let markup = svg::stacked_bar_chart(&config, &title, "Day", "Commits", &table);
            write_chart(&out, &format!("{user}_commitDays.svg"), &markup, &mut charts)?;
        }
        if let Some(per_day) = queries.modules_per_user(user, begin, end) {
            csv::write_modules_txt(out.join(format!("{user}_modules.txt")), &per_day)
                .context("Failed to write modules file")?;
        }

        user_sections.push((user.clone(), charts));
        progress.inc(1);
    }
    progress.finish_and_clear();

    if !queries.engine().module_list().is_empty() {
        csv::write_module_activity(out.join("moduleActivity.csv"), &queries.module_activity_per_user())
            .context("Failed to write module activity table")?;
        for (user, per_date) in queries.module_activity_per_user_per_date() {
            csv::write_module_activity_per_date(
                out.join(format!("{user}_moduleActivityPerDate.csv")),
                &per_date,
            )
            .context("Failed to write per-date module activity table")?;
        }
    }

    let headline = format!("{}{}", config.headline, common.log.display());
    html::write_index(out.join("index.html"), &headline, &global_charts, &user_sections)
        .context("Failed to write report index")?;

    println!("{}", style("Report generated").bold());
    println!("Commits analyzed: {}", style(record_count).cyan());
    println!("Users: {}", style(users.len()).cyan());
    println!("Output: {}", style(out.join("index.html").display()).green());

    Ok(())
}

/// Ingests the log and builds the engine over an immutable store. The log
/// source emits newest-first, so the date list is reversed once here.
pub fn load_engine(common: &CommonArgs, classifier: ModuleClassifier) -> anyhow::Result<AggregationEngine> {
    let records = ingest::read_log_file(&common.log)
        .with_context(|| format!("Failed to read commit log {}", common.log.display()))?;

    let mut store = CommitStore::new();
    for record in records {
        store.add_record(record);
    }
    store.reverse_dates();

    Ok(AggregationEngine::new(store, classifier))
}

fn write_chart(out: &Path, name: &str, markup: &str, written: &mut Vec<String>) -> anyhow::Result<()> {
    fs::write(out.join(name), markup).with_context(|| format!("Failed to write {name}"))?;
    written.push(name.to_string());
    Ok(())
}
