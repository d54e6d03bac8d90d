//! file-search: Dashboard and REST facade over Gemini File Search
//!
//! This crate wraps the hosted File Search service behind a small JSON API:
//! store and document management, asynchronous uploads with operation polling,
//! and grounded question answering with citations. A pair of server-rendered
//! pages drive the API from the browser.

pub mod config;
pub mod error;
pub mod normalize;
pub mod providers;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, ErrorKind, Result};
pub use providers::{FileSearchProvider, GeminiFileSearchClient};
pub use server::{build_router, state::AppState, FileSearchServer};
pub use types::response::{Citation, SearchResponse};
