//! Result normalization: loosely-shaped remote payloads into the stable outward schema

pub mod citation;
pub mod markdown;
pub mod records;

pub use citation::{extract_citations, normalize_search};
pub use markdown::strip_emphasis;
