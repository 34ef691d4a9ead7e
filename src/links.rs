use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://stundenplan.ostfalia.de/";

// One faculty letter, any path, a timetable page or csv export.
static TIMETABLE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\w/.+\.(html|csv)$").unwrap());
static LINK_OR_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, a[href]").unwrap());

/// Faculties whose anchors only say "Stundenplan"; the plan name is in the
/// paragraph above the link.
const PARAGRAPH_LABEL_FACULTIES: &[&str] = &["Tourismus"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkPair {
    pub description: String,
    pub path: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid page url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Collect all timetable links of an overview page as `(description, sked path)`.
///
/// Hrefs are resolved against `page_url` and must live below `base_url`.
/// Duplicate pairs collapse. An empty set is a valid result.
pub fn extract(
    markup: &str,
    page_url: &str,
    faculty: &str,
    base_url: &str,
) -> Result<BTreeSet<LinkPair>, ExtractError> {
    let page = Url::parse(page_url).map_err(|source| ExtractError::InvalidUrl {
        url: page_url.to_string(),
        source,
    })?;
    let use_paragraph = PARAGRAPH_LABEL_FACULTIES.iter().any(|f| faculty.contains(f));

    let document = Html::parse_document(markup);
    let mut tables = BTreeSet::new();
    let mut last_paragraph: Option<String> = None;

    for element in document.select(&LINK_OR_PARAGRAPH) {
        let text = element.text().collect::<String>().trim().to_string();
        if element.value().name() == "p" {
            last_paragraph = Some(text);
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(path) = sked_path(&page, href, base_url) else {
            continue;
        };

        let description = match (&last_paragraph, use_paragraph) {
            (Some(paragraph), true) => format!("{} {}", paragraph, text),
            _ => text,
        };
        tables.insert(LinkPair { description, path });
    }

    Ok(tables)
}

/// Resolve `href` and return the path below `base_url` if it looks like a
/// timetable. The path stays percent-encoded as the joined URL serializes it.
fn sked_path(page: &Url, href: &str, base_url: &str) -> Option<String> {
    let absolute = page.join(href).ok()?;
    let relative = absolute.as_str().strip_prefix(base_url)?;
    TIMETABLE_PATH_RE
        .is_match(relative)
        .then(|| relative.to_string())
}

/// Percent-decoded form of a sked path, for matching on its words.
pub fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

// ── Tests ──
