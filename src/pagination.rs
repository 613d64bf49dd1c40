//! Page/limit handling for the list endpoint.
//!
//! Query values are read leniently: `"3"`, `" 3 "` and `"3abc"` all mean 3,
//! while an absent or non-numeric value falls back to the default. Page
//! numbers below 1 are clamped to 1. A limit of zero or less produces an
//! empty window; the total is still reported.

use serde::Deserialize;

pub const DEFAULT_PAGE: usize = 1;

/// Raw query values of `GET /api/blogs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Picks `page` and `limit` out of decoded query pairs. A repeated key
    /// keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Resolves raw query values against the configured default and maximum
    /// page size.
    pub fn from_params(params: &ListParams, default_limit: usize, max_limit: usize) -> Self {
        let page = match params.page.as_deref().and_then(parse_leading_int) {
            Some(page) if page >= 1 => usize::try_from(page).unwrap_or(usize::MAX),
            _ => DEFAULT_PAGE,
        };

        let limit = match params.limit.as_deref().and_then(parse_leading_int) {
            None => default_limit,
            Some(limit) if limit <= 0 => 0,
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX).min(max_limit),
        };

        Self { page, limit }
    }

    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The window of `items` this request covers; empty when out of range.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start().min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

/// Number of pages needed to show `total` items, `limit` at a time.
pub fn page_count(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Reads the optionally signed integer at the start of `raw`, ignoring
/// surrounding whitespace and anything after the digits.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
