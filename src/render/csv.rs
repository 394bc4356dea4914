//! CSV table sink. Presentation only; derived columns like per-date totals
//! are computed here from the handed-over table, never from the store.

use crate::error::Result;
use crate::model::Table;
use crate::report::ModuleActivity;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a table with one row per label. With `with_total` set, a trailing
/// column carries the per-row sum across all series.
pub fn write_table<P: AsRef<Path>>(
    path: P,
    label_header: &str,
    table: &Table,
    with_total: bool,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    write!(out, "{label_header}")?;
    for series in &table.rows {
        write!(out, ", {}", series.name)?;
    }
    if with_total {
        write!(out, ", total")?;
    }
    writeln!(out)?;

    for (i, label) in table.labels.iter().enumerate() {
        write!(out, "{label}")?;
        let mut total = 0.0;
        for series in &table.rows {
            let value = series.values.get(i).copied().unwrap_or(0.0);
            total += value;
            write!(out, ", {value}")?;
        }
        if with_total {
            write!(out, ", {total}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One block per user: the user line, then one indented line per module the
/// user was ever active in, with its active-day count.
pub fn write_module_activity<P: AsRef<Path>>(path: P, activity: &ModuleActivity) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (user, counts) in activity {
        writeln!(out, "{user}, ,")?;
        for (module, count) in counts {
            writeln!(out, ", {module}, {count}")?;
        }
    }
    Ok(())
}

/// One file per user is the caller's layout; this writes a single user's
/// per-date module counts, one `date: module(count), ...` line per date.
pub fn write_module_activity_per_date<P: AsRef<Path>>(
    path: P,
    per_date: &[(String, Vec<(String, u64)>)],
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (date, counts) in per_date {
        write!(out, "{date}: ")?;
        let formatted: Vec<String> =
            counts.iter().map(|(module, count)| format!("{module}({count})")).collect();
        writeln!(out, "{}", formatted.join(", "))?;
    }
    Ok(())
}

/// The per-user modules text file: each date with activity and the modules
/// the user touched that day.
pub fn write_modules_txt<P: AsRef<Path>>(
    path: P,
    per_day: &[(String, Vec<String>)],
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (date, modules) in per_day {
        writeln!(out, "{date}: [{}]", modules.join(", "))?;
    }
    Ok(())
}
