//! P2P Empire newsfeed scraper.
//!
//! The page at <https://p2pempire.com/en/newsfeed> lists news items as
//! repeated `div.news-box-wrapper` containers:
//!
//! ```html
//! <div class="news-box-wrapper">
//!   <div class="news-date"><span>03. January 2024</span></div>
//!   <h2>Headline</h2>
//!   <p>Summary paragraph</p>
//!   <a href="/en/news/headline">Read more</a>
//! </div>
//! ```
//!
//! Any container that doesn't fit this shape fails the whole run.

use crate::error::FeedError;
use crate::models::NewsEntry;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Date label format, e.g. `03. January 2024`.
pub const NEWS_DATE_FORMAT: &str = "%d. %B %Y";

static NEWS_BOX: Lazy<Selector> = Lazy::new(|| selector("div.news-box-wrapper"));
static NEWS_DATE: Lazy<Selector> = Lazy::new(|| selector("div.news-date span"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h2"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Fetch the news page with a default client.
pub async fn fetch_page(url: &str) -> Result<Vec<u8>, FeedError> {
    fetch_page_with(&Client::new(), url).await
}

/// Fetch the news page body.
///
/// One GET, no retries. Only `200 OK` counts as success; redirects are
/// followed per the client's defaults.
///
/// # Errors
///
/// [`FeedError::Fetch`] with the status code for any non-200 response, or
/// [`FeedError::Http`] if the request itself fails.
#[instrument(level = "info", skip(client))]
pub async fn fetch_page_with(client: &Client, url: &str) -> Result<Vec<u8>, FeedError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FeedError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    info!(bytes = body.len(), %status, "Fetched news page");
    Ok(body.to_vec())
}

/// Extract every news item from the page, in document order.
///
/// No matches is not an error, though it usually means the markup changed,
/// so it is logged as a warning.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn parse_news(html: &[u8]) -> Result<Vec<NewsEntry>, FeedError> {
    let html = String::from_utf8_lossy(html);
    let document = Html::parse_document(&html);

    let entries = document
        .select(&NEWS_BOX)
        .map(parse_news_box)
        .collect::<Result<Vec<_>, _>>()?;

    if entries.is_empty() {
        warn!(
            preview = %truncate_for_log(&html, 300),
            "No news items found; page markup may have changed"
        );
    } else {
        info!(count = entries.len(), "Extracted news items");
    }
    Ok(entries)
}

fn parse_news_box(news_box: ElementRef<'_>) -> Result<NewsEntry, FeedError> {
    let date_label = first_text(news_box, &NEWS_DATE, "date")?;
    let title = first_text(news_box, &TITLE, "title")?;
    let paragraph = first_text(news_box, &PARAGRAPH, "paragraph")?;
    let link = news_box
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(FeedError::MissingElement("link"))?
        .to_string();

    let date = parse_news_date(&date_label)?;
    debug!(%title, %date, %link, "Parsed news item");

    Ok(NewsEntry {
        date,
        title,
        paragraph,
        link,
    })
}

/// All descendant text of the first match, trimmed.
fn first_text(
    parent: ElementRef<'_>,
    selector: &Selector,
    part: &'static str,
) -> Result<String, FeedError> {
    let element = parent
        .select(selector)
        .next()
        .ok_or(FeedError::MissingElement(part))?;
    Ok(element.text().collect::<String>().trim().to_string())
}

/// Parse a date label like `03. January 2024` into UTC midnight.
///
/// The month must be spelled out in full (any case); chrono's `%B` alone
/// would also take `Jan`.
pub fn parse_news_date(label: &str) -> Result<chrono::DateTime<chrono::Utc>, FeedError> {
    let date = NaiveDate::parse_from_str(label, NEWS_DATE_FORMAT).map_err(|source| {
        FeedError::DateParse {
            input: label.to_string(),
            source: Some(source),
        }
    })?;

    let full_month = date.format("%B").to_string();
    let month_token = label
        .split(|c: char| !c.is_alphabetic())
        .find(|token| !token.is_empty());
    if !month_token.is_some_and(|token| token.eq_ignore_ascii_case(&full_month)) {
        return Err(FeedError::DateParse {
            input: label.to_string(),
            source: None,
        });
    }

    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
