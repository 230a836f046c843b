pub mod compare;
pub mod cursor;
pub mod error;
pub mod group_by;
pub mod merged;
pub mod merger;
pub mod pagination;
pub mod stream;
