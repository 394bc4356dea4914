use crate::cli::CommonArgs;
use crate::config::ReportConfig;
use crate::model::{ExportOutput, NamedTable, Series, Table, SCHEMA_VERSION};
use crate::modules::ModuleClassifier;
use crate::report::exec::load_engine;
use crate::report::ReportQueries;
use anyhow::Context;
use chrono::Utc;

/// Dumps the computed report tables to stdout instead of rendering
/// artifacts. JSON wraps the tables in a versioned envelope, NDJSON emits
/// one named table per line, and the default prints a short summary.
pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let config =
        ReportConfig::load(common.config.as_ref()).context("Failed to load report config")?;
    let classifier =
        ModuleClassifier::compile(&config.modules).context("Failed to compile module rules")?;

    let mut engine = load_engine(&common, classifier)?;
    let begin = common.begin.as_deref();
    let end = common.end.as_deref();

    let commit_count = engine.store().len();
    let user_count = engine.store().distinct_users().len();
    let date_span = {
        let dates = engine.filter_dates(begin, end);
        dates.first().cloned().zip(dates.last().cloned())
    };

    let tables = prepare_tables(&mut ReportQueries::new(&mut engine, &config), begin, end)
        .context("Failed to compute report tables")?;

    if json {
        let output = ExportOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            log_path: common.log.display().to_string(),
            begin: common.begin.clone(),
            end: common.end.clone(),
            tables,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if ndjson {
        for table in &tables {
            println!("{}", serde_json::to_string(table)?);
        }
    } else {
        output_summary(commit_count, user_count, date_span, &tables);
    }

    Ok(())
}

fn output_summary(
    commit_count: usize,
    user_count: usize,
    date_span: Option<(String, String)>,
    tables: &[NamedTable],
) {
    use console::style;

    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));
    println!("Total commits: {}", style(commit_count).cyan());
    println!("Users: {}", style(user_count).cyan());
    println!("Tables computed: {}", style(tables.len()).cyan());
    if let Some((first, last)) = date_span {
        println!("Date range: {} to {}", style(first).dim(), style(last).dim());
    }
    println!("\nUse --json or --ndjson flags to export the raw data.");
}

fn prepare_tables(
    queries: &mut ReportQueries<'_>,
    begin: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<Vec<NamedTable>> {
    let mut tables = Vec::new();
    let mut push = |name: String, table: Option<Table>| {
        if let Some(table) = table {
            tables.push(NamedTable { name, table });
        }
    };

    push("commits_total".to_string(), queries.commits_total(begin, end));
    push("file_count".to_string(), queries.file_count(begin, end));
    push("commits_all_users".to_string(), queries.commits_all_users(begin, end));
    push("commits_percentage".to_string(), queries.commits_percentage(begin, end));

    let users: Vec<String> = queries.engine().store().distinct_users().to_vec();
    for user in &users {
        push(format!("commits:{user}"), queries.commits_per_user(user, begin, end));
        push(format!("changes:{user}"), queries.changes_per_user(user, begin, end));
        push(format!("commit_times:{user}"), queries.commit_times_per_user(user, begin, end));
        push(
            format!("commit_days:{user}"),
            queries.commit_days_per_user(user, begin, end)?,
        );
        // Populates the module counters behind the activity table below.
        let _ = queries.modules_per_user(user, begin, end);
    }

    // Module activity as a table: module labels, one series per user,
    // zero-filled where a user never touched a module.
    let modules: Vec<String> = queries.engine().module_list().to_vec();
    if !modules.is_empty() {
        let mut table = Table::new(modules.clone());
        for user in &users {
            let values = modules
                .iter()
                .map(|m| queries.engine().module_count_by_user(user, m).unwrap_or(0) as f64)
                .collect();
            table.push_row(Series::new(user.clone(), values));
        }
        push("module_activity".to_string(), Some(table));
    }

    Ok(tables)
}
