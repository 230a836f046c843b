//! Merges that stream rows straight from the shard cursors without buffering.

pub mod iterator;
pub mod order_by;
mod order_by_value;
