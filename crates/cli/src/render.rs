//! Dashboard renderers: standalone HTML page, aligned text, JSON.

use std::fmt::Write as _;

use valruns_core::{Dashboard, RowKind};

/// Output format for `valruns render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum RenderFormat {
    Html,
    Text,
    Json,
}

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Current UTC time in RFC 3339, for page footers.
pub(crate) fn rendered_at() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

const STYLES: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        table { width: 100%; border-collapse: collapse; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: center; vertical-align: middle; }
        th { background-color: #f2f2f2; color: #333; white-space: nowrap; height: 40px; }
        tr:nth-child(even) { background-color: #f9f9f9; }
        tr:hover { background-color: #f1f1f1; }
        tr.personal-best td { font-weight: bold; }
        .notice { background: #fff3cd; border: 1px solid #ffe08a; padding: 8px 12px; margin-bottom: 12px; }
        .error { background: #f8d7da; border: 1px solid #f1aeb5; padding: 8px 12px; }
        footer { color: #888; font-size: 0.8em; margin-top: 12px; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    <title>{title}</title>\n    <style>{styles}    </style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        styles = STYLES,
        body = body,
    )
}

/// Render the split table as an HTML `<table>`.
pub(crate) fn render_table_html(dashboard: &Dashboard) -> String {
    let table = &dashboard.table;
    let mut html = String::from("<table>\n    <thead>\n        <tr>");
    for column in table.header() {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr>\n    </thead>\n    <tbody>\n");

    for row in &table.rows {
        match row.kind {
            RowKind::PersonalBest => html.push_str("        <tr class=\"personal-best\">"),
            RowKind::Run { attempt_id } => {
                let _ = write!(html, "        <tr data-attempt=\"{}\">", attempt_id);
            }
        }
        let _ = write!(html, "<td>{}</td>", escape_html(&row.label));
        for cell in &row.cells {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("    </tbody>\n</table>\n");
    html
}

/// Render the full dashboard page.
pub(crate) fn render_html(dashboard: &Dashboard, notice: Option<&str>, rendered_at: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&dashboard.title));
    let _ = writeln!(body, "<p>Attempts count: {}</p>", dashboard.attempt_count);
    if let Some(notice) = notice {
        let _ = writeln!(body, "<div class=\"notice\">{}</div>", escape_html(notice));
    }
    body.push_str(&render_table_html(dashboard));
    let _ = writeln!(body, "<footer>Rendered at {}</footer>", escape_html(rendered_at));
    page(&dashboard.title, &body)
}

/// Render the single aggregate error page shown instead of a table.
pub(crate) fn render_error_html(message: &str) -> String {
    let body = format!(
        "<h1>No data</h1>\n<div class=\"error\">{}</div>\n",
        escape_html(message)
    );
    page("valruns: no data", &body)
}

/// Render the dashboard as plain text with aligned columns.
pub(crate) fn render_text(dashboard: &Dashboard, notice: Option<&str>) -> String {
    let table = &dashboard.table;
    let header = table.header();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        widths[0] = widths[0].max(row.label.chars().count());
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", dashboard.title);
    let _ = writeln!(out, "Attempts count: {}", dashboard.attempt_count);
    if let Some(notice) = notice {
        let _ = writeln!(out, "Note: {}", notice);
    }
    out.push('\n');
    let _ = writeln!(out, "{}", format_line(header.clone()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &table.rows {
        let cells: Vec<&str> = std::iter::once(row.label.as_str())
            .chain(row.cells.iter().map(String::as_str))
            .collect();
        let _ = writeln!(out, "{}", format_line(cells));
    }
    out
}

/// Render the dashboard as pretty JSON, including the notice.
pub(crate) fn render_json(dashboard: &Dashboard, notice: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "title": dashboard.title,
        "game_name": dashboard.game_name,
        "category_name": dashboard.category_name,
        "attempt_count": dashboard.attempt_count,
        "notice": notice,
        "header": dashboard.table.header(),
        "table": dashboard.table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use valruns_core::{SplitTable, TableRow};

    fn dashboard() -> Dashboard {
        Dashboard {
            title: "Celeste Any%".to_string(),
            game_name: "Celeste".to_string(),
            category_name: "Any%".to_string(),
            attempt_count: 2,
            table: SplitTable {
                columns: vec!["Forsaken City".to_string(), "Old Site".to_string()],
                rows: vec![
                    TableRow {
                        label: "Personal Best".to_string(),
                        kind: RowKind::PersonalBest,
                        cells: vec!["01:58.3".to_string(), "05:00.0".to_string()],
                    },
                    TableRow {
                        label: "2024-03-04".to_string(),
                        kind: RowKind::Run { attempt_id: 4 },
                        cells: vec!["01:55.7".to_string(), String::new()],
                    },
                ],
            },
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn html_table_has_header_and_blank_cells() {
        let html = render_table_html(&dashboard());
        assert!(html.contains("<th>Date</th><th>Forsaken City</th><th>Old Site</th>"));
        assert!(html.contains("<tr class=\"personal-best\"><td>Personal Best</td><td>01:58.3</td><td>05:00.0</td></tr>"));
        assert!(html.contains("<tr data-attempt=\"4\"><td>2024-03-04</td><td>01:55.7</td><td></td></tr>"));
    }

    #[test]
    fn html_page_includes_title_count_and_notice() {
        let html = render_html(&dashboard(), Some("Attempts 1-32 are off"), "2024-03-05T00:00:00Z");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Celeste Any%</title>"));
        assert!(html.contains("<h1>Celeste Any%</h1>"));
        assert!(html.contains("Attempts count: 2"));
        assert!(html.contains("<div class=\"notice\">Attempts 1-32 are off</div>"));
        assert!(html.contains("Rendered at 2024-03-05T00:00:00Z"));
    }

    #[test]
    fn html_page_without_notice() {
        let html = render_html(&dashboard(), None, "now");
        assert!(!html.contains("class=\"notice\""));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error_html("missing field '<Segments>'");
        assert!(html.contains("missing field &#39;&lt;Segments&gt;&#39;"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn text_columns_are_aligned() {
        let text = render_text(&dashboard(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Celeste Any%");
        assert_eq!(lines[1], "Attempts count: 2");
        assert_eq!(lines[3], "Date           Forsaken City  Old Site");
        assert_eq!(lines[4], "-------------  -------------  --------");
        assert_eq!(lines[5], "Personal Best  01:58.3        05:00.0");
        assert_eq!(lines[6], "2024-03-04     01:55.7");
    }

    #[test]
    fn json_includes_header_and_notice() {
        let value = render_json(&dashboard(), Some("heads up"));
        assert_eq!(value["notice"], "heads up");
        assert_eq!(value["header"][0], "Date");
        assert_eq!(value["table"]["rows"][1]["attempt_id"], 4);
        assert_eq!(value["attempt_count"], 2);
    }
}
