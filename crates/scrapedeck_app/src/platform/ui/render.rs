//! Plain-text rendering of the view model for the terminal.

use scrapedeck_core::{
    AppViewModel, Controls, HrefKind, ResultRow, ResultsTable, ResultsView, SessionPhase,
    COLUMN_HEADERS,
};

const TITLE_WIDTH: usize = 32;
const DESCRIPTION_WIDTH: usize = 40;
const PRICE_WIDTH: usize = 14;
const LINK_WIDTH: usize = 48;

/// Full screen update: status, job info, controls and the results area.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = Vec::new();
    if !view.status_line.is_empty() {
        lines.push(sanitize(&view.status_line));
    }
    if let Some(info) = &view.job_info {
        let summary = info.summary();
        if summary != view.status_line {
            lines.push(sanitize(&summary));
        }
    }
    lines.push(controls_line(view.phase, view.controls));
    let results = render_results(&view.results);
    if !results.is_empty() {
        lines.push(results);
    }
    lines.join("\n")
}

fn controls_line(phase: SessionPhase, controls: Controls) -> String {
    let phase = match phase {
        SessionPhase::Idle => "idle",
        SessionPhase::Submitting => "submitting",
        SessionPhase::Polling => "polling",
    };
    format!(
        "[{phase}] submit: {} | cancel: {}",
        on_off(controls.submit_enabled),
        on_off(controls.cancel_enabled)
    )
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn render_results(results: &ResultsView) -> String {
    match results {
        ResultsView::Empty => String::new(),
        ResultsView::NoResults => scrapedeck_core::NO_RESULTS_TEXT.to_string(),
        ResultsView::Failed(message) => sanitize(message),
        ResultsView::Table(table) => render_table(table),
    }
}

fn render_table(table: &ResultsTable) -> String {
    let index_width = table.rows.len().to_string().len().max(1);
    let mut out = format!(
        "{}: {} (type `download` to save it)\n",
        table.download.label,
        terminal_text(&table.download.path)
    );
    let [index, title, description, price, link] = COLUMN_HEADERS;
    out.push_str(&row_line(
        index_width,
        [index, title, description, price, link].map(str::to_string),
    ));
    for row in &table.rows {
        out.push('\n');
        out.push_str(&row_line(index_width, row_cells(row)));
    }
    out
}

fn row_cells(row: &ResultRow) -> [String; 5] {
    let link = match &row.link {
        Some(href) if href.kind() != HrefKind::Unsupported => sanitize(href.as_str().trim()),
        Some(_) => "(unsupported link)".to_string(),
        None => String::new(),
    };
    [
        row.index.to_string(),
        terminal_text(&row.title),
        terminal_text(&row.description),
        terminal_text(&row.price),
        link,
    ]
}

fn row_line(index_width: usize, cells: [String; 5]) -> String {
    let [index, title, description, price, link] = cells;
    format!(
        "{:>index_width$}  {}  {}  {}  {}",
        index,
        fit(&title, TITLE_WIDTH),
        fit(&description, DESCRIPTION_WIDTH),
        fit(&price, PRICE_WIDTH),
        clip(&link, LINK_WIDTH),
    )
    .trim_end()
    .to_string()
}

/// Table cells arrive markup-escaped; the terminal wants the literal text back,
/// minus anything that could move the cursor or recolour the screen. Status and
/// error text is never escaped and goes through `sanitize` only.
pub fn terminal_text(escaped: &str) -> String {
    let literal = escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    sanitize(&literal)
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn fit(text: &str, width: usize) -> String {
    let clipped = clip(text, width);
    let pad = width.saturating_sub(clipped.chars().count());
    format!("{clipped}{}", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scrapedeck_core::{
        render_results as table_for, update, AppState, JobId, Msg, ResultItem,
    };

    use super::*;

    #[test]
    fn escaped_cells_are_shown_literally_without_control_chars() {
        assert_eq!(terminal_text("Tom &amp; Jerry &lt;b&gt;"), "Tom & Jerry <b>");
        assert_eq!(terminal_text("red\u{1b}[31m alert\r\n"), "red [31m alert  ");
        // Double-escaped input stays single-escaped.
        assert_eq!(terminal_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn unescaped_messages_keep_entity_like_text() {
        let failed = ResultsView::Failed("expected a &lt; b\u{7}".into());
        assert_eq!(render_results(&failed), "expected a &lt; b ");

        let (state, _) = update(AppState::new(), Msg::InputChanged("https://a.example".into()));
        let (state, _) = update(state, Msg::SubmitClicked);
        let (state, _) = update(
            state,
            Msg::StartFailed {
                message: "bad &amp; worse".into(),
            },
        );
        let screen = render(&state.view());
        assert!(screen.contains("bad &amp; worse"), "{screen}");
    }

    #[test]
    fn table_lists_every_row_with_links() {
        let job_id = JobId::new("j1");
        let items = vec![
            ResultItem::titled("Car cover").with_link("/item/car-cover-iid-1"),
            ResultItem::titled("Bad link").with_link("javascript:alert(1)"),
            ResultItem::default(),
        ];
        let text = render_results(&table_for(&job_id, &items));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Download CSV: /download/j1"));
        assert!(lines[1].starts_with("#  Title"));
        assert!(lines[2].starts_with("1  Car cover"));
        assert!(lines[2].ends_with("/item/car-cover-iid-1"));
        assert!(lines[3].ends_with("(unsupported link)"));
        assert_eq!(lines[4], "3");
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "x".repeat(100);
        let fitted = fit(&long, TITLE_WIDTH);
        assert_eq!(fitted.chars().count(), TITLE_WIDTH);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn idle_screen_shows_prompt_and_controls() {
        let (state, _) = update(AppState::new(), Msg::SubmitClicked);
        let screen = render(&state.view());
        assert_eq!(
            screen,
            "Enter a search URL to scrape.\n[idle] submit: on | cancel: off"
        );
    }
}
