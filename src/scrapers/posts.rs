//! Post extraction from a parsed listing page.
//!
//! Extraction is pure: it reads the parsed document and never touches the
//! network or the filesystem.

use crate::error::ScrapeError;
use crate::filter::parse_post_date;
use crate::models::PostRecord;
use crate::scrapers::ListingPage;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::{debug, info};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static SECTION: Lazy<Selector> = Lazy::new(|| selector("div.blog-posts-section"));
static POST: Lazy<Selector> = Lazy::new(|| selector("div.each-post"));
static EXCERPT: Lazy<Selector> = Lazy::new(|| selector("div.excerpt-data"));
static HEADING: Lazy<Selector> = Lazy::new(|| selector("h2.post-heading"));
static HEADING_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static DAY: Lazy<Selector> = Lazy::new(|| selector("div.post-day"));
static MONTH: Lazy<Selector> = Lazy::new(|| selector("div.post-month"));
static YEAR: Lazy<Selector> = Lazy::new(|| selector("div.post-year"));
static REPORT_LINK: Lazy<Selector> = Lazy::new(|| selector("div.disclosure-report-all a[href]"));

impl ListingPage {
    fn posts_section(&self) -> Result<ElementRef<'_>, ScrapeError> {
        self.document
            .select(&SECTION)
            .next()
            .ok_or_else(|| ScrapeError::markup(format!("no div.blog-posts-section on {}", self.url)))
    }

    /// Lazily extract one [`PostRecord`] per post block, in listing order.
    ///
    /// Fails up front if the number of post blocks differs from the number of
    /// excerpt blocks, since the two are paired by position only.
    pub fn posts(
        &self,
    ) -> Result<impl Iterator<Item = Result<PostRecord, ScrapeError>> + '_, ScrapeError> {
        let section = self.posts_section()?;
        let post_count = section.select(&POST).count();
        let excerpt_count = section.select(&EXCERPT).count();
        if post_count != excerpt_count {
            return Err(ScrapeError::markup(format!(
                "{post_count} post blocks but {excerpt_count} excerpt blocks on {}",
                self.url
            )));
        }
        debug!(url = %self.url, post_count, "Paired post and excerpt blocks");

        Ok(section
            .select(&POST)
            .enumerate()
            .map(|(position, block)| extract_post(position, block)))
    }

    /// The report link `href` from the excerpt block at `position`, as written
    /// in the markup.
    pub fn document_href(&self, position: usize) -> Result<String, ScrapeError> {
        let excerpt = self
            .posts_section()?
            .select(&EXCERPT)
            .nth(position)
            .ok_or_else(|| ScrapeError::markup(format!("no excerpt block at position {position}")))?;
        let href = excerpt
            .select(&REPORT_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| {
                ScrapeError::markup(format!("excerpt block {position} has no report link"))
            })?;
        info!(position, href, "Found document link");
        Ok(href.to_string())
    }
}

fn element_text(block: ElementRef<'_>, sel: &Selector, what: &str) -> Result<String, ScrapeError> {
    block
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ScrapeError::markup(format!("post block without {what}")))
}

fn extract_post(position: usize, block: ElementRef<'_>) -> Result<PostRecord, ScrapeError> {
    let heading = block
        .select(&HEADING)
        .next()
        .ok_or_else(|| ScrapeError::markup("post block without h2.post-heading"))?;
    let heading_text = heading
        .select(&HEADING_LINK)
        .next()
        .unwrap_or(heading)
        .text()
        .collect::<String>();
    info!(position, heading = %heading_text.trim(), "Heading found");

    let (title, ticker) = split_ticker(&heading_text);
    debug!(%title, %ticker, "Split heading");

    let day = element_text(block, &DAY, "div.post-day")?;
    let month = element_text(block, &MONTH, "div.post-month")?;
    let year = element_text(block, &YEAR, "div.post-year")?;
    let date_text = format!("{day} {month} {year}");
    let publication_date = parse_post_date(&date_text)?;
    debug!(%date_text, %publication_date, "Assembled post date");

    Ok(PostRecord {
        position,
        title,
        ticker,
        date_text,
        publication_date,
    })
}

/// Split a heading into `(title, ticker)` at the first `(`.
///
/// The ticker keeps its parenthesis; the title is trimmed. Without a `(` the
/// ticker is empty.
pub fn split_ticker(heading: &str) -> (String, String) {
    let heading = heading.trim();
    match heading.find('(') {
        Some(idx) => (heading[..idx].trim().to_string(), heading[idx..].to_string()),
        None => (heading.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fixtures::{FixturePost, listing_html, mismatched_listing_html};
    use chrono::NaiveDate;
    use url::Url;

    fn page(html: &str) -> ListingPage {
        ListingPage::parse(Url::parse("https://blog.example/page/1/").unwrap(), html)
    }

    #[test]
    fn test_split_ticker_with_parenthesis() {
        let (title, ticker) = split_ticker("  Tesla, Inc. (TSLA) ");
        assert_eq!(title, "Tesla, Inc.");
        assert_eq!(ticker, "(TSLA)");

        let (title, ticker) = split_ticker("Short (NYSE: XYZ) (update)");
        assert_eq!(title, "Short");
        assert_eq!(ticker, "(NYSE: XYZ) (update)");
    }

    #[test]
    fn test_split_ticker_without_parenthesis() {
        let (title, ticker) = split_ticker("\n  Market Commentary  \n");
        assert_eq!(title, "Market Commentary");
        assert_eq!(ticker, "");
    }

    #[test]
    fn test_posts_extracts_in_listing_order() {
        let html = listing_html(
            "Page 1 of 1",
            &[
                FixturePost::new("Acme Corp (ACME)", "05", "Mar", "2019", "https://docs.example/acme.pdf"),
                FixturePost::new("Quarterly Letter", "17", "Nov", "2021", "javascript:void(0)"),
            ],
        );
        let page = page(&html);
        let posts = page.posts().unwrap().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].position, 0);
        assert_eq!(posts[0].title, "Acme Corp");
        assert_eq!(posts[0].ticker, "(ACME)");
        assert_eq!(posts[0].date_text, "05 Mar 2019");
        assert_eq!(posts[0].publication_date, NaiveDate::from_ymd_opt(2019, 3, 5).unwrap());

        assert_eq!(posts[1].position, 1);
        assert_eq!(posts[1].title, "Quarterly Letter");
        assert_eq!(posts[1].ticker, "");
        assert_eq!(posts[1].date_text, "17 Nov 2021");
    }

    #[test]
    fn test_document_href_pairs_by_position() {
        let html = listing_html(
            "Page 1 of 1",
            &[
                FixturePost::new("First", "01", "Jan", "2020", "/reports/first.pdf"),
                FixturePost::new("Second", "02", "Feb", "2020", "/reports/second.pdf"),
            ],
        );
        let page = page(&html);
        assert_eq!(page.document_href(0).unwrap(), "/reports/first.pdf");
        assert_eq!(page.document_href(1).unwrap(), "/reports/second.pdf");
        assert!(matches!(page.document_href(2), Err(ScrapeError::MarkupShape(_))));
    }

    #[test]
    fn test_mismatched_blocks_fail_fast() {
        let html = mismatched_listing_html(&[FixturePost::new(
            "Only",
            "01",
            "Jan",
            "2020",
            "/r.pdf",
        )]);
        let page = page(&html);
        assert!(matches!(page.posts(), Err(ScrapeError::MarkupShape(_))));
    }

    #[test]
    fn test_missing_section_is_markup_error() {
        let page = page("<html><body><span class=\"pages\">Page 1 of 1</span></body></html>");
        assert!(matches!(page.posts(), Err(ScrapeError::MarkupShape(_))));
    }

    #[test]
    fn test_bad_month_is_markup_error() {
        let html = listing_html(
            "Page 1 of 1",
            &[FixturePost::new("Odd", "01", "Foo", "2020", "/r.pdf")],
        );
        let page = page(&html);
        let first = page.posts().unwrap().next().unwrap();
        assert!(matches!(first, Err(ScrapeError::MarkupShape(_))));
    }

    #[test]
    fn test_heading_without_anchor_uses_heading_text() {
        let html = r#"<html><body><div class="blog-posts-section">
            <div class="each-post">
              <div class="post-month">Jun</div><div class="post-day">9</div><div class="post-year">2018</div>
              <h2 class="post-heading">Plain Heading (PLN)</h2>
            </div>
            <div class="excerpt-data"><div class="disclosure-report-all"><a href="/p.pdf">x</a></div></div>
        </div></body></html>"#;
        let page = page(html);
        let post = page.posts().unwrap().next().unwrap().unwrap();
        assert_eq!(post.title, "Plain Heading");
        assert_eq!(post.ticker, "(PLN)");
        assert_eq!(post.publication_date, NaiveDate::from_ymd_opt(2018, 6, 9).unwrap());
    }
}
