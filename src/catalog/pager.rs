//! Page pointer and the sliding window of page numbers shown in the pager.

use std::collections::BTreeSet;
use std::fmt;

/// Pages shown on each side of the current page
pub const PAGE_WINDOW_RADIUS: u32 = 2;

/// One slot of the pager bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(u32),
    Ellipsis,
}

impl PageMarker {
    /// Numeric form: the page number, or -1 for an ellipsis
    pub fn to_code(self) -> i64 {
        match self {
            PageMarker::Page(page) => i64::from(page),
            PageMarker::Ellipsis => -1,
        }
    }
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(page) => write!(f, "{}", page),
            PageMarker::Ellipsis => write!(f, "…"),
        }
    }
}

/// Compute the pager window for `current` out of `total` pages.
///
/// Always contains the first and last page plus every page within `radius`
/// of `current`; each gap between them collapses to one ellipsis.
pub fn visible_page_window(current: u32, total: u32, radius: u32) -> Vec<PageMarker> {
    if total == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let start = current.saturating_sub(radius).max(1);
    let end = current.saturating_add(radius).min(total);

    let mut pages: BTreeSet<u32> = (start..=end).collect();
    pages.insert(1);
    pages.insert(total);

    let mut window = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;
    for page in pages {
        if let Some(prev) = previous {
            if page - prev > 1 {
                window.push(PageMarker::Ellipsis);
            }
        }
        window.push(PageMarker::Page(page));
        previous = Some(page);
    }
    window
}

/// Current page pointer plus the page count learned from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    current_page: u32,
    total_pages: u32,
}

impl Default for PagerState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PagerState {
    /// Start at `page` with an unknown (zero) page count
    pub fn new(page: u32) -> Self {
        Self {
            current_page: page.max(1),
            total_pages: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Move to `page` if it is within `1..=total_pages`. Returns whether the pointer moved.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Record the page count reported by the server. Returns whether it changed.
    pub fn learn_total(&mut self, total_pages: u32) -> bool {
        if self.total_pages == total_pages {
            return false;
        }
        self.total_pages = total_pages;
        true
    }

    /// Pull the pointer back to the last page when it is past the known end.
    /// Returns whether it moved.
    pub fn clamp_to_total(&mut self) -> bool {
        if self.total_pages == 0 || self.current_page <= self.total_pages {
            return false;
        }
        self.current_page = self.total_pages;
        true
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn window(&self) -> Vec<PageMarker> {
        visible_page_window(self.current_page, self.total_pages, PAGE_WINDOW_RADIUS)
    }
}
