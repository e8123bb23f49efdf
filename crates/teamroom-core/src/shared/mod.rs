//! Helpers and constants shared by every widget.

pub mod constants;
pub mod types;
pub mod utils;

pub use types::ApiResponse;
pub use utils::{format_date, is_valid_url, shuffle};
