//! Common types used across the platform

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for history listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Build from optional query values, clamping to sane bounds
    pub fn normalized(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Slice one page out of an already filtered list
    pub fn paginate(items: Vec<T>, pagination: Pagination) -> Self {
        let meta = PaginationMeta::new(pagination, items.len() as u64);
        let data = items
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page as usize)
            .collect();
        Self {
            data,
            pagination: meta,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(pagination.per_page as u64) as u32;
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total_items,
            total_pages,
        }
    }
}

/// Date range for queries; either end may be open
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whole-day inclusive check against the UTC calendar date
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.start.map_or(true, |s| day >= s) && self.end.map_or(true, |e| day <= e)
    }
}

/// Serde helpers for `datetime-local` form values (`2024-10-10T14:30`)
pub mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s.trim(), f).ok())
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {}", s))),
        }
    }
}
