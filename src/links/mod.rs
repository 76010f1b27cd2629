//! Link handling for version discovery
//!
//! This module resolves hyperlinks found on listing pages, matches them
//! against a source's discovery patterns, and infers document dates from URL
//! paths.

mod date;
mod matcher;
mod resolve;

pub use date::infer_year_month;
pub use matcher::PatternSet;
pub use resolve::{canonical_url, extract_links, resolve_link};
