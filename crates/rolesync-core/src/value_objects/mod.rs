//! Value objects - immutable types that represent domain concepts

mod page_id;
mod snowflake;

pub use page_id::PageId;
pub use snowflake::{Snowflake, SnowflakeParseError};
