use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const SAMPLE_LOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
<logentry revision="3">
<author>alice</author>
<date>2020-01-02T10:00:00.000000Z</date>
<paths>
<path action="D">/trunk/a.txt</path>
</paths>
<msg>remove a</msg>
</logentry>
<logentry revision="2">
<author>bob</author>
<date>2020-01-01T22:30:00.000000Z</date>
<paths>
<path action="M">/trunk/b.txt</path>
</paths>
<msg>tweak b</msg>
</logentry>
<logentry revision="1">
<author>alice</author>
<date>2020-01-01T09:15:00.000000Z</date>
<paths>
<path action="A">/trunk/a.txt</path>
<path action="A">/trunk/b.txt</path>
</paths>
<msg>initial import</msg>
</logentry>
</log>
"#;

const SAMPLE_CONFIG: &str = r#"
time_offset: 0
modules:
  - name: text
    pattern: '\.txt$'
"#;

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let log = dir.join("svn.xml");
    let config = dir.join("revstat.yaml");
    fs::write(&log, SAMPLE_LOG).unwrap();
    fs::write(&config, SAMPLE_CONFIG).unwrap();
    (log, config)
}

#[test]
fn report_writes_index_charts_and_module_tables() {
    let dir = tempdir().unwrap();
    let (log, config) = write_inputs(dir.path());
    let out = dir.path().join("report");

    let mut cmd = Command::cargo_bin("revstat").unwrap();
    cmd.arg("--log")
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    for artifact in [
        "index.html",
        "Total_commits.svg",
        "File_Count.svg",
        "AllUsers_commits.svg",
        "AllUsers_commits.csv",
        "Commit_Percentage.svg",
        "alice_commits.svg",
        "alice_changes.svg",
        "alice_commitTimes.svg",
        "alice_commitDays.svg",
        "alice_modules.txt",
        "moduleActivity.csv",
        "alice_moduleActivityPerDate.csv",
    ] {
        assert!(out.join(artifact).exists(), "missing {artifact}");
    }

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("alice_commits.svg"));
    assert!(index.contains("<h2>bob</h2>"));

    let activity = fs::read_to_string(out.join("moduleActivity.csv")).unwrap();
    assert!(activity.contains("text"));
}

#[test]
fn export_json_outputs_versioned_tables() {
    let dir = tempdir().unwrap();
    let (log, config) = write_inputs(dir.path());

    let mut cmd = Command::cargo_bin("revstat").unwrap();
    cmd.arg("--log").arg(&log).arg("--config").arg(&config).args(["export", "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["version"], 1);
    let tables = v["tables"].as_array().unwrap();
    assert!(!tables.is_empty());

    let totals = tables
        .iter()
        .find(|t| t["name"] == "commits_total")
        .expect("commits_total table");
    let values = totals["table"]["rows"][0]["values"].as_array().unwrap();
    let sum: f64 = values.iter().map(|v| v.as_f64().unwrap()).sum();
    assert_eq!(sum, 3.0);
}

#[test]
fn date_bounds_limit_the_report_range() {
    let dir = tempdir().unwrap();
    let (log, config) = write_inputs(dir.path());

    let mut cmd = Command::cargo_bin("revstat").unwrap();
    cmd.arg("--log")
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .args(["--begin", "2020-01-02", "export", "--ndjson"]);
    let out = cmd.assert().success().get_output().stdout.clone();

    let mut saw_totals = false;
    for line in out.split(|&b| b == b'\n').filter(|l| !l.is_empty()) {
        let v: serde_json::Value = serde_json::from_slice(line).unwrap();
        if v["name"] == "commits_total" {
            saw_totals = true;
            assert_eq!(v["table"]["labels"], serde_json::json!(["2020-01-02"]));
        }
    }
    assert!(saw_totals);
}

#[test]
fn empty_range_reports_nothing_to_analyze() {
    let dir = tempdir().unwrap();
    let (log, config) = write_inputs(dir.path());
    let out = dir.path().join("report");

    let mut cmd = Command::cargo_bin("revstat").unwrap();
    cmd.arg("--log")
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .args(["--begin", "2021-01-01"])
        .arg("report")
        .arg("--out")
        .arg(&out);
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("No commits to analyze"));
    assert!(!out.join("index.html").exists());
}

#[test]
fn bad_module_pattern_fails_fast() {
    let dir = tempdir().unwrap();
    let (log, _) = write_inputs(dir.path());
    let config = dir.path().join("broken.yaml");
    fs::write(&config, "modules:\n  - name: broken\n    pattern: '('\n").unwrap();

    let mut cmd = Command::cargo_bin("revstat").unwrap();
    cmd.arg("--log")
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg("--out")
        .arg(dir.path().join("report"));
    cmd.assert().failure();
}
