//! Query options: sorting and pagination.

use serde::Serialize;

use super::Document;

/// Default page size when a caller does not specify one.
pub const DEFAULT_LIMIT: usize = 50;

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Multi-key sort specification. Keys are compared in order; the first
/// non-equal key wins. The underlying sort is stable, so documents that
/// compare equal keep their scan order.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    keys: Vec<(String, Direction)>,
}

impl Sort {
    /// Single-key sort.
    pub fn by(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            keys: vec![(field.into(), direction)],
        }
    }

    /// Append a lower-priority sort key.
    pub fn then(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.keys.push((field.into(), direction));
        self
    }

    /// Sort `docs` in place. A key absent on either side compares as equal,
    /// so documents missing an optional field keep their relative order.
    pub fn apply<T: Document>(&self, docs: &mut [T]) {
        if self.keys.is_empty() {
            return;
        }
        docs.sort_by(|a, b| {
            for (field, direction) in &self.keys {
                let ordering = match (a.field(field), b.field(field)) {
                    (Some(av), Some(bv)) => av.cmp(&bv),
                    _ => std::cmp::Ordering::Equal,
                };
                if ordering != std::cmp::Ordering::Equal {
                    return match direction {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    };
                }
            }
            std::cmp::Ordering::Equal
        });
    }
}

/// Options for [`Repository::find_many`](super::Repository::find_many).
///
/// Pagination is driven by `skip`/`limit`; the 1-based `page` number in the
/// result is derived from them, never an input at this layer.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub limit: Option<usize>,
    pub skip: Option<usize>,
    pub sort: Option<Sort>,
}

impl QueryOptions {
    /// Shorthand for a bare limit, e.g. existence probes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Pagination metadata reported alongside a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number, derived as `skip / limit + 1`.
    pub page: usize,
    /// Page size the query ran with.
    pub limit: usize,
    /// Post-filter, pre-pagination match count.
    pub total: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

/// One page of documents plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Slice one page out of a fully filtered and sorted result set.
///
/// `limit` defaults to [`DEFAULT_LIMIT`] and is clamped to at least 1 so the
/// derived `page` and `total_pages` never divide by zero.
pub(super) fn paginate<T>(docs: Vec<T>, options: &QueryOptions) -> PaginatedResult<T> {
    let limit = options.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let skip = options.skip.unwrap_or(0);
    let total = docs.len();

    let data: Vec<T> = docs.into_iter().skip(skip).take(limit).collect();

    PaginatedResult {
        data,
        pagination: Pagination {
            page: skip / limit + 1,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}
