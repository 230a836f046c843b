use serde::{Deserialize, Serialize};

/// The slice of the logical row sequence a paginated statement exposes.
///
/// Built once from the statement's LIMIT/OFFSET (or ROW_NUMBER bounds) before
/// the pagination decorator is constructed, and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationWindow {
    /// Rows to discard before the first exposed row.
    #[serde(default)]
    offset: u64,
    /// Maximum rows exposed after the offset; `None` is unbounded.
    #[serde(default)]
    row_count: Option<u64>,
}

impl PaginationWindow {
    pub fn new(offset: u64, row_count: Option<u64>) -> Self {
        Self { offset, row_count }
    }

    /// `LIMIT n`
    pub fn limit(row_count: u64) -> Self {
        Self::new(0, Some(row_count))
    }

    /// `OFFSET n` with no row count.
    pub fn offset_only(offset: u64) -> Self {
        Self::new(offset, None)
    }

    /// Window for `ROW_NUMBER() > start AND ROW_NUMBER() <= end` style
    /// predicates (Oracle ROWNUM, SQLServer TOP + ROW_NUMBER). `start` is the
    /// number of leading rows excluded; `end` is exclusive unless `inclusive_end`.
    pub fn from_row_number_bounds(start: u64, end: Option<u64>, inclusive_end: bool) -> Self {
        let row_count = end.map(|end| {
            let end = if inclusive_end {
                end
            } else {
                end.saturating_sub(1)
            };
            end.saturating_sub(start)
        });
        Self::new(start, row_count)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn row_count(&self) -> Option<u64> {
        self.row_count
    }

    pub fn is_unbounded(&self) -> bool {
        self.row_count.is_none()
    }
}
