use serde::Deserialize;
use serde_json::{Value, json};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Highest page served; keeps `skip` within the i64 range MongoDB accepts.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Raw `?page=&limit=` query. Kept as strings so junk values fall back to defaults
/// instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageQuery {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
        }
    }

    pub fn params(&self) -> PageParams {
        PageParams {
            page: leading_int(self.page.as_deref())
                .unwrap_or(DEFAULT_PAGE)
                .min(MAX_PAGE),
            limit: leading_int(self.limit.as_deref())
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
        }
    }
}

// "12abc" -> 12, "abc" / "0" / "-3" -> None
fn leading_int(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}

impl PageParams {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Wraps one already-fetched page of a collection holding `total_items`.
    pub fn new(items: Vec<T>, params: PageParams, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(params.limit.max(1));
        Self {
            items,
            current_page: params.page,
            total_pages,
            total_items,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }

    /// Slices a fully loaded collection in memory.
    pub fn from_all(all: Vec<T>, params: PageParams) -> Self {
        let total_items = all.len() as u64;
        let skip = usize::try_from(params.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(params.limit).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(limit).collect();
        Self::new(items, params, total_items)
    }

    /// `total_key` is `totalPosts` or `totalComments` depending on the listing.
    pub fn pagination_json(&self, total_key: &str) -> Value {
        let mut value = json!({
            "currentPage": self.current_page,
            "totalPages": self.total_pages,
            "hasNext": self.has_next,
            "hasPrev": self.has_prev,
        });
        value[total_key] = json!(self.total_items);
        value
    }
}
