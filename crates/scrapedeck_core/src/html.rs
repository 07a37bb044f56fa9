//! HTML presentation of the results view.
//!
//! Produces the same fragment the browser front end builds: a download button
//! above a five-column table.

use std::fmt::Write;

use crate::escape::{escape, escape_attr};
use crate::render::{Href, HrefKind, ResultsTable, ResultsView, COLUMN_HEADERS, LINK_LABEL, NO_RESULTS_TEXT};

pub fn results_html(view: &ResultsView) -> String {
    match view {
        ResultsView::Empty => String::new(),
        ResultsView::NoResults => small_note(NO_RESULTS_TEXT),
        ResultsView::Failed(message) => small_note(&escape(Some(message))),
        ResultsView::Table(table) => table_html(table),
    }
}

/// Standalone page wrapping [`results_html`], used for report files.
pub fn results_page(title: &str, view: &ResultsView) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(Some(title)),
        body = results_html(view)
    )
}

fn small_note(escaped_text: &str) -> String {
    format!("<div class=\"small\">{escaped_text}</div>")
}

fn table_html(table: &ResultsTable) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<div style=\"margin:8px 0\"><a href=\"{}\"><button>{}</button></a></div>",
        escape_attr(&table.download.path),
        table.download.label
    );
    html.push_str("<table><thead><tr>");
    for header in COLUMN_HEADERS {
        let _ = write!(html, "<th>{header}</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        // Text cells arrive escaped from the table model.
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.index,
            row.title,
            row.description,
            row.price,
            row.link.as_ref().map(link_html).unwrap_or_default()
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn link_html(href: &Href) -> String {
    match href.kind() {
        HrefKind::Web | HrefKind::SiteRelative => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{LINK_LABEL}</a>",
            escape_attr(href.as_str().trim())
        ),
        HrefKind::Unsupported => escape(Some(href.as_str())),
    }
}
