//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod range;
pub mod time;

pub use path::PathUtils;
pub use range::parse_index_range;
pub use time::TimeFormatter;
