//! Page slicing with an orphan threshold.
//!
//! A [`Paginator`] only needs the size of the ordered result set. It turns a
//! requested page number into a [`Window`] that the record store applies as
//! `OFFSET`/`LIMIT`, and wraps the loaded rows into a [`Page`] for templates.
//!
//! When the trailing page would hold `orphans` items or fewer, those items are
//! folded into the previous page instead.

use serde::{Deserialize, Serialize};

/// Offset and length of one page within an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

/// Page size and orphan threshold configured for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub per_page: usize,
    pub orphans: usize,
}

impl PaginationPolicy {
    pub const fn new(per_page: usize, orphans: usize) -> Self {
        Self { per_page, orphans }
    }

    /// Paginator over a result set of `count` items.
    pub fn paginator(&self, count: usize) -> Paginator {
        Paginator::new(count, self.per_page, self.orphans)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: usize,
    per_page: usize,
    orphans: usize,
}

impl Paginator {
    /// `per_page` is at least 1 and `orphans` at most `per_page - 1`.
    pub fn new(count: usize, per_page: usize, orphans: usize) -> Self {
        let per_page = per_page.max(1);
        Self {
            count,
            per_page,
            orphans: orphans.min(per_page - 1),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of pages; an empty result set still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        if self.count == 0 {
            return 1;
        }
        let hits = self.count.saturating_sub(self.orphans).max(1);
        hits.div_ceil(self.per_page)
    }

    /// Clamp a requested page number into `1..=num_pages`. Missing means 1.
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(1).clamp(1, self.num_pages())
    }

    /// Window covering page `number` (clamped to a valid page).
    pub fn window(&self, number: usize) -> Window {
        let number = self.clamp(Some(number));
        let offset = (number - 1) * self.per_page;
        let mut end = offset + self.per_page;
        if end + self.orphans >= self.count {
            end = self.count;
        }
        Window {
            offset: offset.min(self.count),
            limit: end.saturating_sub(offset),
        }
    }

    /// Wrap the rows loaded for page `number`.
    pub fn page<T>(&self, number: usize, items: Vec<T>) -> Page<T> {
        let number = self.clamp(Some(number));
        let num_pages = self.num_pages();
        Page {
            items,
            number,
            num_pages,
            count: self.count,
            has_other_pages: num_pages > 1,
            next_page_number: (number < num_pages).then_some(number + 1),
            previous_page_number: (number > 1).then_some(number - 1),
        }
    }
}

/// One page of results as exposed to templates.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: usize,
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
    pub has_other_pages: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
}

/// `?page=` query parameter. Anything that is not a positive integer means page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> Option<usize> {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
    }
}
