//! Skip/limit pagination shared by every query path.

use serde::Serialize;

/// A requested page: `size` items starting at `size * (number - 1)`.
///
/// `number` is 1-indexed. Values `<= 0` clamp to the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: usize,
    pub number: i64,
}

impl Page {
    pub const fn new(size: usize, number: i64) -> Self {
        Self { size, number }
    }

    /// Build a page from optional request parameters.
    ///
    /// Pagination applies only when both parameters are present and `page_size`
    /// is non-zero; any other combination means "return everything".
    pub fn from_params(page_size: Option<u32>, page_num: Option<i64>) -> Option<Self> {
        match (page_size, page_num) {
            (Some(size), Some(number)) if size > 0 => Some(Self::new(size as usize, number)),
            (None, None) => None,
            (size, number) => {
                tracing::debug!(
                    page_size = ?size,
                    page_num = ?number,
                    "Incomplete pagination parameters, returning all results"
                );
                None
            }
        }
    }

    /// Number of items skipped before this page, never negative.
    pub fn skip(&self) -> usize {
        let skip = (self.size as i64).saturating_mul(self.number.saturating_sub(1));
        usize::try_from(skip).unwrap_or(0)
    }

    /// Take this page's slice out of `items`.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.skip()).take(self.size).collect()
    }
}

/// Apply an optional page to an already ordered result list.
pub fn paginate<T>(items: Vec<T>, page: Option<Page>) -> Vec<T> {
    match page {
        Some(page) => page.apply(items),
        None => items,
    }
}

/// One page of ranked results.
///
/// `total_count` counts every match before pagination; `items` keep the
/// ranking order established by the pipeline that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResultPage<T> {
    pub query: String,
    pub total_count: usize,
    pub items: Vec<T>,
}

impl<T> RankedResultPage<T> {
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> RankedResultPage<U> {
        RankedResultPage {
            query: self.query,
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
