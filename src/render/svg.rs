//! SVG chart sink. Pure consumers of [`Table`]: labels and numeric series in,
//! markup out. No statistics are computed here beyond axis scaling.

use crate::config::ReportConfig;
use crate::model::Table;
use std::f64::consts::PI;
use std::fmt::Write;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const FONT: &str = "font-family=\"sans-serif\"";

pub fn stacked_bar_chart(
    config: &ReportConfig,
    title: &str,
    x_label: &str,
    y_label: &str,
    table: &Table,
) -> String {
    let (w, h) = (f64::from(config.chart.width), f64::from(config.chart.height));
    let (plot_w, plot_h) = (w - MARGIN_LEFT - MARGIN_RIGHT, h - MARGIN_TOP - MARGIN_BOTTOM);
    let max = table.max_column_sum().max(1.0);

    let mut svg = open_svg(w, h);
    frame(&mut svg, title, x_label, y_label, max, 0.0, w, h);
    legend(&mut svg, config, table, w);

    let columns = table.labels.len().max(1);
    let slot = plot_w / columns as f64;
    let bar_w = slot * 0.8;
    for i in 0..table.labels.len() {
        let x = MARGIN_LEFT + slot * i as f64 + slot * 0.1;
        let mut y = MARGIN_TOP + plot_h;
        for (s, series) in table.rows.iter().enumerate() {
            let value = series.values.get(i).copied().unwrap_or(0.0);
            let bar_h = plot_h * value / max;
            if bar_h > 0.0 {
                y -= bar_h;
                let _ = write!(
                    svg,
                    "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_w:.1}\" height=\"{bar_h:.1}\" fill=\"{}\"/>",
                    config.color(s)
                );
            }
        }
    }
    x_axis_labels(&mut svg, &table.labels, plot_w, h);

    svg.push_str("</svg>\n");
    svg
}

pub fn line_chart(
    config: &ReportConfig,
    title: &str,
    x_label: &str,
    y_label: &str,
    table: &Table,
    y_min: Option<f64>,
) -> String {
    let (w, h) = (f64::from(config.chart.width), f64::from(config.chart.height));
    let (plot_w, plot_h) = (w - MARGIN_LEFT - MARGIN_RIGHT, h - MARGIN_TOP - MARGIN_BOTTOM);

    let (range_min, range_max) = table.value_range().unwrap_or((0.0, 1.0));
    let lo = y_min.unwrap_or(0.0).min(range_min);
    let hi = if range_max > lo { range_max } else { lo + 1.0 };

    let mut svg = open_svg(w, h);
    frame(&mut svg, title, x_label, y_label, hi, lo, w, h);
    legend(&mut svg, config, table, w);

    let columns = table.labels.len();
    let step = if columns > 1 { plot_w / (columns - 1) as f64 } else { 0.0 };
    for (s, series) in table.rows.iter().enumerate() {
        let points: Vec<String> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = MARGIN_LEFT + step * i as f64;
                let y = MARGIN_TOP + plot_h - plot_h * (v - lo) / (hi - lo);
                format!("{x:.1},{y:.1}")
            })
            .collect();
        let _ = write!(
            svg,
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            points.join(" "),
            config.color(s)
        );
    }
    x_axis_labels(&mut svg, &table.labels, plot_w, h);

    svg.push_str("</svg>\n");
    svg
}

/// Pie over the table's labels and its single percentage series.
pub fn pie_chart(config: &ReportConfig, title: &str, table: &Table) -> String {
    let (w, h) = (f64::from(config.chart.width), f64::from(config.chart.height));
    let mut svg = open_svg(w, h);
    let _ = write!(
        svg,
        "<text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\" {FONT}>{}</text>",
        w / 2.0,
        escape(title)
    );

    let values = table.rows.first().map(|r| r.values.as_slice()).unwrap_or(&[]);
    let total: f64 = values.iter().sum();
    let (cx, cy) = (w * 0.35, MARGIN_TOP + (h - MARGIN_TOP - 20.0) / 2.0);
    let r = ((h - MARGIN_TOP - 40.0) / 2.0).max(10.0);

    if total > 0.0 {
        let mut angle = -PI / 2.0;
        for (i, &value) in values.iter().enumerate() {
            let fraction = value / total;
            if fraction <= 0.0 {
                continue;
            }
            if fraction >= 0.9999 {
                let _ = write!(
                    svg,
                    "<circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{r:.1}\" fill=\"{}\"/>",
                    config.color(i)
                );
                break;
            }
            let end = angle + fraction * 2.0 * PI;
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large = i32::from(fraction > 0.5);
            let _ = write!(
                svg,
                "<path d=\"M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large} 1 {x2:.1} {y2:.1} Z\" fill=\"{}\"/>",
                config.color(i)
            );
            angle = end;
        }
    }

    // Slice legend with percentages on the right half.
    let legend_x = w * 0.62;
    for (i, label) in table.labels.iter().enumerate() {
        let y = MARGIN_TOP + 20.0 * i as f64 + 10.0;
        let pct = values.get(i).copied().unwrap_or(0.0);
        let _ = write!(
            svg,
            "<rect x=\"{legend_x:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" {FONT}>{} ({pct:.1}%)</text>",
            y - 10.0,
            config.color(i),
            legend_x + 18.0,
            y,
            escape(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn open_svg(w: f64, h: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\
         <rect width=\"{w:.0}\" height=\"{h:.0}\" fill=\"white\"/>"
    )
}

/// Title, axis lines, y ticks and axis captions shared by bar and line charts.
fn frame(svg: &mut String, title: &str, x_label: &str, y_label: &str, hi: f64, lo: f64, w: f64, h: f64) {
    let plot_h = h - MARGIN_TOP - MARGIN_BOTTOM;
    let _ = write!(
        svg,
        "<text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\" {FONT}>{}</text>",
        w / 2.0,
        escape(title)
    );
    let _ = write!(
        svg,
        "<line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{:.1}\" stroke=\"#333\"/>\
         <line x1=\"{MARGIN_LEFT}\" y1=\"{0:.1}\" x2=\"{1:.1}\" y2=\"{0:.1}\" stroke=\"#333\"/>",
        MARGIN_TOP + plot_h,
        w - MARGIN_RIGHT,
    );
    for tick in 0..=4 {
        let value = lo + (hi - lo) * f64::from(tick) / 4.0;
        let y = MARGIN_TOP + plot_h - plot_h * f64::from(tick) / 4.0;
        let _ = write!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{MARGIN_LEFT}\" y2=\"{y:.1}\" stroke=\"#333\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" {FONT}>{value:.0}</text>",
            MARGIN_LEFT - 4.0,
            MARGIN_LEFT - 8.0,
            y + 3.0,
        );
        if tick > 0 {
            let _ = write!(
                svg,
                "<line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#eee\"/>",
                w - MARGIN_RIGHT
            );
        }
    }
    let _ = write!(
        svg,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" {FONT}>{}</text>\
         <text x=\"14\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" {FONT} transform=\"rotate(-90 14 {3:.1})\">{}</text>",
        MARGIN_LEFT + (w - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
        h - 8.0,
        escape(x_label),
        MARGIN_TOP + plot_h / 2.0,
        escape(y_label),
    );
}

fn legend(svg: &mut String, config: &ReportConfig, table: &Table, w: f64) {
    let mut x = w - MARGIN_RIGHT - 110.0;
    let mut y = MARGIN_TOP - 28.0;
    for (s, series) in table.rows.iter().enumerate() {
        let _ = write!(
            svg,
            "<rect x=\"{x:.1}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{}\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" {FONT}>{}</text>",
            y - 9.0,
            config.color(s),
            x + 14.0,
            y,
            escape(&series.name)
        );
        y += 14.0;
        if y > MARGIN_TOP + 14.0 * 6.0 {
            y = MARGIN_TOP - 28.0;
            x -= 120.0;
        }
    }
}

/// Thins category labels so at most ~20 are printed.
fn x_axis_labels(svg: &mut String, labels: &[String], plot_w: f64, h: f64) {
    let columns = labels.len().max(1);
    let step = (columns + 19) / 20;
    let slot = plot_w / columns as f64;
    for (i, label) in labels.iter().enumerate() {
        if i % step != 0 {
            continue;
        }
        let x = MARGIN_LEFT + slot * i as f64 + slot / 2.0;
        let _ = write!(
            svg,
            "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"10\" {FONT}>{}</text>",
            h - MARGIN_BOTTOM + 16.0,
            escape(label)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
