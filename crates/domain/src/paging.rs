//! Paged result envelope and cursor
//!
//! Collection endpoints return one page at a time along with a map of
//! named links. The offset of the neighbouring pages is carried in the
//! `skip` query parameter of the `Page.Next` and `Page.Previous` links.
//! A missing link, an unparsable link or a missing/non-numeric `skip`
//! all mean "no such page".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Link key of the next page.
pub const NEXT_PAGE_LINK: &str = "Page.Next";

/// Link key of the previous page.
pub const PREVIOUS_PAGE_LINK: &str = "Page.Previous";

/// Placeholder origin used to resolve relative links before parsing.
const LINK_BASE: &str = "http://octovars.invalid/";

/// Derives neighbouring page offsets from a link map.
#[derive(Debug, Clone, Copy)]
pub struct PageCursor<'a> {
    links: &'a HashMap<String, String>,
}

impl<'a> PageCursor<'a> {
    /// Creates a cursor over a link map.
    #[must_use]
    pub const fn new(links: &'a HashMap<String, String>) -> Self {
        Self { links }
    }

    /// Offset of the next page, if there is one.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        self.offset(NEXT_PAGE_LINK)
    }

    /// Offset of the previous page, if there is one.
    #[must_use]
    pub fn previous_offset(&self) -> Option<usize> {
        self.offset(PREVIOUS_PAGE_LINK)
    }

    fn offset(&self, key: &str) -> Option<usize> {
        skip_parameter(self.links.get(key)?)
    }
}

fn skip_parameter(link: &str) -> Option<usize> {
    let url = Url::parse(LINK_BASE).ok()?.join(link).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "skip")
        .and_then(|(_, value)| value.parse::<usize>().ok())
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    /// Page size used by the server.
    #[serde(default)]
    pub items_per_page: usize,

    /// Total number of items across all pages.
    #[serde(default)]
    pub total_results: usize,

    /// Named links, including the page links.
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl<T> Page<T> {
    /// Returns a cursor over this page's links.
    #[must_use]
    pub const fn cursor(&self) -> PageCursor<'_> {
        PageCursor::new(&self.links)
    }

    /// Offset of the next page, if there is one.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        self.cursor().next_offset()
    }

    /// Offset of the previous page, if there is one.
    #[must_use]
    pub fn previous_offset(&self) -> Option<usize> {
        self.cursor().previous_offset()
    }
}
