use pretty_assertions::assert_eq;
use revstat::ingest::read_log;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
<logentry revision="3">
<author>Alice</author>
<date>2020-01-02T10:00:00.000000Z</date>
<paths>
<path action="D">/trunk/a.txt</path>
</paths>
<msg>remove a</msg>
</logentry>
<logentry revision="2">
<author>CN=Bob Smith, OU=Engineering</author>
<date>2020-01-01T22:30:45.123456Z</date>
<paths>
<path action="M">/trunk/b.txt</path>
<path action="A">/trunk/c.txt</path>
</paths>
<msg>tweak &amp; extend</msg>
</logentry>
<logentry revision="1">
<date>2020-01-01T09:15:00.000000Z</date>
<paths>
<path action="A">/trunk/a.txt</path>
<path action="A">/trunk/b.txt</path>
</paths>
<msg>initial import</msg>
</logentry>
</log>
"#;

#[test]
fn parses_entries_newest_first() {
    let records = read_log(SAMPLE.as_bytes()).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, "2020-01-02");
    assert_eq!(records[0].time, "10:00:00");
    assert_eq!(records[2].date, "2020-01-01");
}

#[test]
fn authors_are_lowercased_and_dn_forms_reduced() {
    let records = read_log(SAMPLE.as_bytes()).unwrap();
    assert_eq!(records[0].user, "alice");
    assert_eq!(records[1].user, "bob smith");
    // Missing author falls back to a fixed placeholder.
    assert_eq!(records[2].user, "unknown");
}

#[test]
fn files_keep_added_then_modified_then_deleted_order() {
    let records = read_log(SAMPLE.as_bytes()).unwrap();
    let bob = &records[1];
    assert_eq!(bob.added, 1);
    assert_eq!(bob.modified, 1);
    assert_eq!(bob.deleted, 0);
    // Added paths precede modified ones regardless of document order.
    assert_eq!(bob.files, vec!["/trunk/c.txt", "/trunk/b.txt"]);
    assert_eq!(bob.added + bob.modified + bob.deleted, bob.files.len() as u32);

    let first = &records[2];
    assert_eq!(first.added, 2);
    assert_eq!(first.files, vec!["/trunk/a.txt", "/trunk/b.txt"]);
}

#[test]
fn malformed_date_aborts_ingestion() {
    let bad = r#"<log><logentry><author>a</author><date>2020-13-99T10:00:00Z</date></logentry></log>"#;
    assert!(read_log(bad.as_bytes()).is_err());

    let no_separator = r#"<log><logentry><author>a</author><date>2020-01-01 10:00:00</date></logentry></log>"#;
    assert!(read_log(no_separator.as_bytes()).is_err());
}

#[test]
fn entry_without_paths_has_zero_counts() {
    let log = r#"<log><logentry><author>a</author><date>2020-01-01T10:00:00.000Z</date><msg>m</msg></logentry></log>"#;
    let records = read_log(log.as_bytes()).unwrap();
    assert_eq!(records[0].added, 0);
    assert_eq!(records[0].files.len(), 0);
}
