//! Input parsing for the floating search box.

mod parser;

pub use parser::{build_search_url, parse_input, resolve_input, UrlBarInput};
