use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::error::ExtractError;

const USER_AGENT: &str = concat!("newscheck/", env!("CARGO_PKG_VERSION"));

/// Extracted bodies shorter than this are treated as a failed extraction.
const MIN_CONTENT_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    pub text: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
}

/// Fetches a URL and pulls article text plus metadata out of the HTML.
pub struct ArticleExtractor {
    client: reqwest::Client,
}

impl ArticleExtractor {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    #[tracing::instrument(skip(self), fields(url = %url))]
    pub async fn extract(&self, url: &Url) -> Result<ExtractedArticle, ExtractError> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        parse_article(&html)
    }
}

/// Pure HTML-to-article step, separated from the fetch so it can be
/// tested on static documents.
pub fn parse_article(html: &str) -> Result<ExtractedArticle, ExtractError> {
    let document = Html::parse_document(html);

    let text = extract_body_text(&document);
    if text.trim().chars().count() < MIN_CONTENT_LEN {
        return Err(ExtractError::EmptyContent);
    }

    Ok(ExtractedArticle {
        text,
        title: extract_title(&document).unwrap_or_default(),
        authors: extract_authors(&document),
        publish_date: extract_publish_date(&document),
    })
}

fn extract_body_text(document: &Html) -> String {
    // Prefer paragraphs inside an <article> element, fall back to every
    // paragraph on the page.
    for selector_str in ["article p", "p"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n\n");
        }
    }
    String::new()
}

fn extract_title(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("title") {
        if let Some(el) = document.select(&selector).next() {
            let title = el.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }
    extract_meta(document, "property", "og:title")
}

fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();
    let candidates = [
        ("name", "author"),
        ("property", "article:author"),
        ("name", "dc.creator"),
    ];
    for (attr, value) in candidates {
        if let Some(author) = extract_meta(document, attr, value) {
            if !authors.contains(&author) {
                authors.push(author);
            }
        }
    }
    authors
}

fn extract_publish_date(document: &Html) -> Option<DateTime<Utc>> {
    extract_meta(document, "property", "article:published_time")
        .or_else(|| extract_meta(document, "name", "date"))
        .and_then(|raw| parse_date(&raw))
}

fn extract_meta(document: &Html, attr: &str, value: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[{attr}=\"{value}\"]")).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}
