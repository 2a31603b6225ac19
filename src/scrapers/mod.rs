//! Listing page retrieval and post extraction.
//!
//! The blog index is paginated at `.../page/{N}/`. Each page has a single
//! `div.blog-posts-section` holding two parallel sequences:
//!
//! | Block | Selector | Carries |
//! |-------|----------|---------|
//! | Post | `div.each-post` | heading, day, month, year |
//! | Excerpt | `div.excerpt-data` | report link anchor |
//!
//! No identifier links the two. The Nth post belongs to the Nth excerpt,
//! and [`ListingPage::posts`] refuses a page whose counts differ.
//!
//! - [`listing`]: fetching pages and reading the page count
//! - [`posts`]: turning post blocks into [`crate::models::PostRecord`]s

pub mod listing;
pub mod posts;

#[cfg(test)]
pub(crate) mod fixtures;

pub use listing::{ListingPage, fetch_listing_page, listing_page_url};
