use std::fmt::Write;

use paperdex_core::{Database, Record};
use serde_json::Value;

use crate::style::{SCRIPT, STYLE};

/// Column order of the rendered table. `journal/booktitle` is a combined
/// column that falls back between the two source fields.
pub const COLUMNS: [&str; 6] = ["title", "author", "year", "journal/booktitle", "doi", "isbn"];

const PLACEHOLDER: &str = "N/A";

/// Render a database into a self-contained HTML document.
///
/// Pure: the output is a function of the database alone, so rendering the
/// same input twice yields byte-identical HTML.
pub fn render(db: &Database) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>paperdex</title>\n");
    let _ = write!(html, "<script>\n{SCRIPT}\n</script>\n");
    let _ = write!(html, "<style>\n{STYLE}\n</style>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(
        "<input type=\"text\" id=\"searchInput\" onkeyup=\"filterRows()\" \
         placeholder=\"Search by title ...\">\n",
    );

    html.push_str("<table id=\"papersTable\">\n");
    html.push_str("<tr class=\"header\">");
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr>\n");

    for record in &db.records {
        push_row(&mut html, record);
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn push_row(html: &mut String, record: &Record) {
    html.push_str("<tr>");
    for column in COLUMNS {
        let cell = cell_html(record, column);
        let _ = write!(html, "<td>{cell}</td>");
    }
    html.push_str("</tr>\n");
}

fn cell_html(record: &Record, column: &str) -> String {
    match column {
        "title" => format!(
            "<a href=\"{}\">{}</a>",
            encode_path(&record.path),
            escape_html(&record.title)
        ),
        "journal/booktitle" => record
            .extra
            .get("journal")
            .or_else(|| record.extra.get("booktitle"))
            .map(value_text)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        "doi" => text_or_placeholder(record.doi.as_deref()),
        "isbn" => text_or_placeholder(record.isbn.as_deref()),
        other => record
            .extra
            .get(other)
            .map(value_text)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(text) => escape_html(text),
        None => PLACEHOLDER.to_string(),
    }
}

/// String values render bare; anything else renders through its JSON form,
/// so a numeric year shows as `2020`, not `"2020"`.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => escape_html(s),
        other => escape_html(&other.to_string()),
    }
}

/// Percent-encode a relative path for use as an href, keeping the `/`
/// separators intact.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
