//! Page requests and page results.
//!
//! Page indexes are zero-based. Only whitelisted fields can be sorted on, so
//! a [`SortOrder`] can be rendered into SQL without escaping.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Page size used when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Larger requested page sizes are clamped to this value.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Fields a product page can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
}

impl SortField {
    /// All sortable field names, for error messages.
    pub const ALL: &'static [&'static str] = &["name"];

    fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "name" => Ok(Self::Name),
            other => Err(CoreError::Validation(format!(
                "Unsupported sort key '{other}'. Must be one of: {}",
                Self::ALL.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::Validation(format!(
                "Invalid sort direction '{other}'. Must be 'asc' or 'desc'"
            ))),
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `(field, direction)` entry of a page's sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    /// Parse `field` or `field,direction` (e.g. `name,desc`).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.split(',').map(str::trim);
        let field = SortField::parse(parts.next().unwrap_or_default())?;
        let direction = match parts.next() {
            Some(dir) => Direction::parse(dir)?,
            None => Direction::Asc,
        };
        if let Some(extra) = parts.next() {
            return Err(CoreError::Validation(format!(
                "Invalid sort '{raw}': unexpected '{extra}'"
            )));
        }
        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.as_str(), self.direction.as_sql())
    }
}

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A validated request for one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Build a request from already-typed values. `size` must be non-zero;
    /// sizes above [`MAX_PAGE_SIZE`] are clamped. An empty sort falls back
    /// to `name ASC`.
    pub fn new(page: u32, size: u32, sort: Vec<SortOrder>) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::Validation(
                "Page size must be greater than zero".to_string(),
            ));
        }
        let sort = if sort.is_empty() {
            vec![SortOrder::asc(SortField::Name)]
        } else {
            dedup_sort(sort)
        };
        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
            sort,
        })
    }

    /// Build a request from raw query parameters.
    pub fn from_params(
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<&str>,
    ) -> Result<Self, CoreError> {
        let page = match page {
            None => 0,
            Some(p) => u32::try_from(p).map_err(|_| {
                CoreError::Validation(format!("Page index must be between 0 and {}", u32::MAX))
            })?,
        };
        let size = match size {
            None => DEFAULT_PAGE_SIZE,
            Some(s) if s <= 0 => {
                return Err(CoreError::Validation(
                    "Page size must be greater than zero".to_string(),
                ))
            }
            Some(s) => u32::try_from(s).unwrap_or(MAX_PAGE_SIZE),
        };
        let sort = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => vec![SortOrder::parse(raw)?],
            None => Vec::new(),
        };
        Self::new(page, size, sort)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Number of rows to return.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: vec![SortOrder::asc(SortField::Name)],
        }
    }
}

/// Keep the first occurrence of each field; later ones cannot change order.
fn dedup_sort(sort: Vec<SortOrder>) -> Vec<SortOrder> {
    let mut out: Vec<SortOrder> = Vec::with_capacity(sort.len());
    for order in sort {
        if !out.iter().any(|o| o.field == order.field) {
            out.push(order);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Page result
// ---------------------------------------------------------------------------

/// One page of results plus the metadata of the request that produced it.
///
/// `total_elements` always describes the whole filtered set, never just the
/// returned slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    page_number: u32,
    page_size: u32,
    sort: Vec<SortOrder>,
    total_elements: i64,
    total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        debug_assert!(content.len() <= request.size() as usize);
        let total_elements = total_elements.max(0);
        let size = i64::from(request.size());
        Self {
            content,
            page_number: request.page(),
            page_size: request.size(),
            sort: request.sort().to_vec(),
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    pub fn total_elements(&self) -> i64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Swap in new content while keeping every piece of page metadata.
    ///
    /// The replacement may be shorter than the original (dropped entries)
    /// but never longer than the page size.
    pub fn with_content<U>(self, content: Vec<U>) -> Page<U> {
        debug_assert!(content.len() <= self.page_size as usize);
        Page {
            content,
            page_number: self.page_number,
            page_size: self.page_size,
            sort: self.sort,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
