//! HTML index sink: a single page embedding the chart files that were
//! actually written, with one section per user.

use crate::error::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn write_index<P: AsRef<Path>>(
    path: P,
    headline: &str,
    global_charts: &[String],
    user_sections: &[(String, Vec<String>)],
) -> Result<()> {
    let mut content = String::new();
    content.push_str("<!doctype html>\n<html>\n<head>\n");
    let _ = writeln!(content, "<title>{}</title>", escape(headline));
    content.push_str("<meta charset=\"utf-8\">\n</head>\n<body>\n");
    let _ = writeln!(content, "<h2>{}</h2>", escape(headline));

    for (i, chart) in global_charts.iter().enumerate() {
        // Two charts per row.
        if i > 0 && i % 2 == 0 {
            content.push_str("<br>\n");
        }
        let _ = writeln!(content, "<img src=\"{chart}\">");
    }

    for (user, charts) in user_sections {
        let _ = writeln!(content, "<h2>{}</h2>", escape(user));
        for chart in charts {
            let _ = writeln!(content, "<img src=\"{chart}\">");
        }
    }

    content.push_str("</body>\n</html>\n");
    fs::write(path, content)?;
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
