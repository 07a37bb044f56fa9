//! Results table model.
//!
//! Free text is escaped here, once, so every presentation layer receives markup-safe
//! cells. Link targets are kept raw in [`Href`] because their encoding depends on
//! where they end up (attribute value, terminal, clipboard).

use url::Url;

use crate::escape::escape;
use crate::job::{JobId, ResultItem};

pub const DOWNLOAD_ROUTE: &str = "/download";
pub const DOWNLOAD_LABEL: &str = "Download CSV";
pub const LINK_LABEL: &str = "Open";
pub const NO_RESULTS_TEXT: &str = "No results found.";
pub const COLUMN_HEADERS: [&str; 5] = ["#", "Title", "Description", "Price", "Link"];

/// Untrusted link target taken from a result item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Href(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefKind {
    /// Absolute `http`/`https` URL.
    Web,
    /// Path on the scraped site, e.g. `/item/123`.
    SiteRelative,
    /// Anything else (`javascript:`, `data:`, protocol-relative, garbage).
    Unsupported,
}

impl Href {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> HrefKind {
        let raw = self.0.trim();
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => HrefKind::Web,
            Ok(_) => HrefKind::Unsupported,
            Err(url::ParseError::RelativeUrlWithoutBase)
                if raw.starts_with('/') && !raw.starts_with("//") =>
            {
                HrefKind::SiteRelative
            }
            Err(_) => HrefKind::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub job_id: JobId,
    pub path: String,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// 1-based position in the result sequence.
    pub index: usize,
    pub title: String,
    pub description: String,
    pub price: String,
    pub link: Option<Href>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTable {
    pub download: DownloadLink,
    pub rows: Vec<ResultRow>,
}

impl ResultsTable {
    pub fn job_id(&self) -> &JobId {
        &self.download.job_id
    }
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
    #[default]
    Empty,
    NoResults,
    /// Display text of a results failure (unescaped).
    Failed(String),
    Table(ResultsTable),
}

/// Builds the results view for a finished job. An empty sequence is not an error.
pub fn render_results(job_id: &JobId, items: &[ResultItem]) -> ResultsView {
    if items.is_empty() {
        return ResultsView::NoResults;
    }
    let rows = items
        .iter()
        .enumerate()
        .map(|(idx, item)| ResultRow {
            index: idx + 1,
            title: escape(item.title.as_deref()),
            description: escape(item.description.as_deref()),
            price: escape(item.price.as_deref()),
            link: item.link().map(Href::new),
        })
        .collect();
    ResultsView::Table(ResultsTable {
        download: download_link(job_id),
        rows,
    })
}

pub fn download_link(job_id: &JobId) -> DownloadLink {
    DownloadLink {
        job_id: job_id.clone(),
        path: artifact_path(job_id),
        label: DOWNLOAD_LABEL,
    }
}

/// `/download/{jobid}` with the id encoded as a single path segment.
pub fn artifact_path(job_id: &JobId) -> String {
    format!("{DOWNLOAD_ROUTE}/{}", encode_path_segment(job_id.as_str()))
}

fn encode_path_segment(segment: &str) -> String {
    // form encoding turns a literal '+' into %2B, so any '+' left is a space.
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_sequence_renders_no_results() {
        assert_eq!(render_results(&JobId::new("j1"), &[]), ResultsView::NoResults);
    }

    #[test]
    fn single_item_with_link() {
        let view = render_results(
            &JobId::new("j1"),
            &[ResultItem::titled("T").with_link("http://x")],
        );
        let ResultsView::Table(table) = view else {
            panic!("expected table, got {view:?}");
        };
        assert_eq!(table.download.path, "/download/j1");
        assert_eq!(table.download.label, "Download CSV");
        assert_eq!(
            table.rows,
            vec![ResultRow {
                index: 1,
                title: "T".into(),
                description: String::new(),
                price: String::new(),
                link: Some(Href::new("http://x")),
            }]
        );
    }

    #[test]
    fn text_cells_are_escaped_and_missing_link_is_empty() {
        let item = ResultItem {
            title: Some("<b>Car</b>".into()),
            description: Some("A & B".into()),
            price: Some("".into()),
            link: None,
        };
        let ResultsView::Table(table) = render_results(&JobId::new("j"), &[item]) else {
            panic!("expected table");
        };
        let row = &table.rows[0];
        assert_eq!(row.title, "&lt;b&gt;Car&lt;/b&gt;");
        assert_eq!(row.description, "A &amp; B");
        assert_eq!(row.price, "");
        assert_eq!(row.link, None);
    }

    #[test]
    fn rows_are_numbered_in_order() {
        let items: Vec<_> = (0..4).map(|i| ResultItem::titled(format!("item {i}"))).collect();
        let ResultsView::Table(table) = render_results(&JobId::new("j"), &items) else {
            panic!("expected table");
        };
        let indices: Vec<_> = table.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(table.rows[3].title, "item 3");
    }

    #[test]
    fn artifact_path_encodes_the_job_id() {
        assert_eq!(
            artifact_path(&JobId::new("3f2a-9c")),
            "/download/3f2a-9c"
        );
        assert_eq!(artifact_path(&JobId::new("a b/c+d")), "/download/a%20b%2Fc%2Bd");
    }

    #[test]
    fn href_kinds() {
        assert_eq!(Href::new("https://www.olx.in/item/1").kind(), HrefKind::Web);
        assert_eq!(Href::new("/item/honda-city-iid-1").kind(), HrefKind::SiteRelative);
        assert_eq!(Href::new("javascript:alert(1)").kind(), HrefKind::Unsupported);
        assert_eq!(Href::new("//evil.example").kind(), HrefKind::Unsupported);
        assert_eq!(Href::new("item/1").kind(), HrefKind::Unsupported);
    }
}
