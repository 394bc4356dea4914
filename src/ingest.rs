use crate::error::{Result, RevstatError};
use crate::model::CommitRecord;
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Which element's text content is currently being read.
#[derive(PartialEq)]
enum Field {
    None,
    Author,
    Date,
    Path,
}

#[derive(Default)]
struct EntryAccum {
    author: Option<String>,
    date: Option<String>,
    action: Option<String>,
    added: Vec<String>,
    modified: Vec<String>,
    deleted: Vec<String>,
}

/// Reads an SVN `log --verbose --xml` stream into commit records, newest
/// first (the order SVN emits). Structural problems and malformed dates are
/// fatal: a silently dropped entry would silently corrupt every aggregate
/// built on top.
pub fn read_log<R: BufRead>(input: R) -> Result<Vec<CommitRecord>> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut records = Vec::new();
    let mut entry: Option<EntryAccum> = None;
    let mut field = Field::None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"logentry" => entry = Some(EntryAccum::default()),
                b"author" => field = Field::Author,
                b"date" => field = Field::Date,
                b"path" => {
                    if let Some(entry) = entry.as_mut() {
                        entry.action = None;
                        for attr in e.attributes() {
                            let attr = attr.map_err(quick_xml::Error::from)?;
                            if attr.key.as_ref() == b"action" {
                                entry.action = Some(attr.unescape_value()?.into_owned());
                            }
                        }
                        field = Field::Path;
                    }
                }
                _ => field = Field::None,
            },
            Event::Text(t) => {
                if let Some(entry) = entry.as_mut() {
                    let text = t.unescape()?.into_owned();
                    match field {
                        Field::Author => entry.author = Some(text),
                        Field::Date => entry.date = Some(text),
                        Field::Path => match entry.action.as_deref() {
                            Some("A") => entry.added.push(text),
                            Some("M") => entry.modified.push(text),
                            Some("D") => entry.deleted.push(text),
                            _ => {}
                        },
                        Field::None => {}
                    }
                }
            }
            Event::End(e) => {
                field = Field::None;
                if e.name().as_ref() == b"logentry" {
                    let accum = entry.take().ok_or_else(|| {
                        RevstatError::LogParse("unexpected </logentry>".to_string())
                    })?;
                    records.push(finish_entry(accum)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(records = records.len(), "log ingested");
    Ok(records)
}

pub fn read_log_file<P: AsRef<Path>>(path: P) -> Result<Vec<CommitRecord>> {
    let file = File::open(path.as_ref())?;
    read_log(BufReader::new(file))
}

fn finish_entry(accum: EntryAccum) -> Result<CommitRecord> {
    let raw_date = accum
        .date
        .ok_or_else(|| RevstatError::LogParse("logentry without a date".to_string()))?;
    let (date, time) = split_timestamp(raw_date.trim())?;

    let user = normalize_author(accum.author.as_deref().unwrap_or("unknown"));

    let added = accum.added.len() as u32;
    let modified = accum.modified.len() as u32;
    let deleted = accum.deleted.len() as u32;

    let mut files = accum.added;
    files.extend(accum.modified);
    files.extend(accum.deleted);

    Ok(CommitRecord { date, time, user, added, modified, deleted, files })
}

/// Splits `2020-01-01T12:34:56.000000Z` into the date and the `HH:MM:SS`
/// portion, validating the date so the store only ever holds well-formed
/// `YYYY-MM-DD` strings.
fn split_timestamp(raw: &str) -> Result<(String, String)> {
    let sep = raw
        .find('T')
        .ok_or_else(|| RevstatError::InvalidDate(raw.to_string()))?;
    let date = &raw[..sep];
    let time = raw
        .get(sep + 1..sep + 9)
        .ok_or_else(|| RevstatError::InvalidDate(raw.to_string()))?;

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RevstatError::InvalidDate(raw.to_string()))?;

    Ok((date.to_string(), time.to_string()))
}

/// Lower-cases the author. A distinguished-name author of the form
/// `cn=Jane Doe,ou=...` is reduced to the first attribute value.
fn normalize_author(raw: &str) -> String {
    let trimmed = raw.trim();
    let user = match trimmed.find('=') {
        Some(i) => {
            let rest = &trimmed[i + 1..];
            let end = rest.find(',').unwrap_or(rest.len());
            rest[..end].trim()
        }
        None => trimmed,
    };
    user.to_lowercase()
}
