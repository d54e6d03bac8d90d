//! Provider abstraction for the remote document-search service
//!
//! Request handlers only ever talk to a `FileSearchProvider`; the Gemini
//! implementation is constructed once at startup and shared.

pub mod file_search;
pub mod gemini;

pub use file_search::{
    document_name, operation_name, store_document_name, store_name, DocumentQuery,
    FileSearchProvider, SearchQuery, UploadDocument,
};
pub use gemini::GeminiFileSearchClient;
