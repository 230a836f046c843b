use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// Where NULLs land in the output, independent of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullsOrder {
    First,
    Last,
}

/// One ORDER BY or GROUP BY item, addressed by its 0-based position in the
/// projection list of the shard result sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderByItem {
    pub index: usize,
    #[serde(default)]
    pub direction: OrderDirection,
    /// Explicit NULLS FIRST/LAST; the database default applies when absent.
    #[serde(default)]
    pub nulls: Option<NullsOrder>,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

impl OrderByItem {
    pub fn new(index: usize, direction: OrderDirection) -> Self {
        Self {
            index,
            direction,
            nulls: None,
            case_sensitive: true,
        }
    }

    pub fn asc(index: usize) -> Self {
        Self::new(index, OrderDirection::Asc)
    }

    pub fn desc(index: usize) -> Self {
        Self::new(index, OrderDirection::Desc)
    }

    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Same column, direction and collation; NULL placement is ignored since
    /// NULLs land together either way.
    pub fn same_sort_key(&self, other: &OrderByItem) -> bool {
        self.index == other.index
            && self.direction == other.direction
            && self.case_sensitive == other.case_sensitive
    }
}
