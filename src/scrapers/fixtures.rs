//! HTML builders for listing-page tests.

pub(crate) struct FixturePost<'a> {
    pub heading: &'a str,
    pub day: &'a str,
    pub month: &'a str,
    pub year: &'a str,
    pub href: &'a str,
}

impl<'a> FixturePost<'a> {
    pub fn new(heading: &'a str, day: &'a str, month: &'a str, year: &'a str, href: &'a str) -> Self {
        Self {
            heading,
            day,
            month,
            year,
            href,
        }
    }
}

fn post_block(post: &FixturePost<'_>) -> String {
    format!(
        r#"<div class="each-post">
  <div class="post-date">
    <div class="post-month">{month}</div>
    <div class="post-day">{day}</div>
    <div class="post-year">{year}</div>
  </div>
  <h2 class="post-heading">
    <a href="/blog/post">{heading}</a>
  </h2>
</div>"#,
        month = post.month,
        day = post.day,
        year = post.year,
        heading = post.heading,
    )
}

fn excerpt_block(post: &FixturePost<'_>) -> String {
    format!(
        r#"<div class="excerpt-data">
  <p>Summary text.</p>
  <div class="disclosure-report-all"><a href="{href}">Full report</a></div>
</div>"#,
        href = post.href,
    )
}

/// A listing page whose post and excerpt blocks interleave, as on the live site.
pub(crate) fn listing_html(indicator: &str, posts: &[FixturePost<'_>]) -> String {
    let blocks = posts
        .iter()
        .map(|p| format!("{}\n{}", post_block(p), excerpt_block(p)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<html><body>
<div class="blog-posts-section">
{blocks}
</div>
<div class="pagination"><span class="pages">{indicator}</span></div>
</body></html>"#
    )
}

/// A listing page with an extra post block that has no matching excerpt.
pub(crate) fn mismatched_listing_html(posts: &[FixturePost<'_>]) -> String {
    let mut blocks = posts
        .iter()
        .map(|p| format!("{}\n{}", post_block(p), excerpt_block(p)))
        .collect::<Vec<_>>();
    if let Some(first) = posts.first() {
        blocks.push(post_block(first));
    }
    format!(
        r#"<html><body><div class="blog-posts-section">{}</div><span class="pages">Page 1 of 1</span></body></html>"#,
        blocks.join("\n")
    )
}
