//! Utility functions for string, number and date formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    format_bytes, format_compact, format_coord, format_date, format_thousands, format_time_ago,
    last_path_segment, parse_timestamp, truncate_string,
};
