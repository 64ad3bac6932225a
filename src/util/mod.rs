//! Text measurement and link checks shared by the UI.

mod text;
mod url_validator;

pub use text::{display_width, sanitize_line, truncate_to_width};
pub use url_validator::{validate_link_url, LinkValidationError};

/// Maximum search bar input length, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
