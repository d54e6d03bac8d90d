//! Core types for the file search server
//!
//! `remote` mirrors the Gemini wire schema, `request` and `response` are the
//! shapes this server accepts and returns.

pub mod remote;
pub mod request;
pub mod response;

pub use remote::{CustomMetadata, Document, FileSearchStore, GenerateContentResponse, Operation};
pub use request::{CreateStoreRequest, QueryDocumentRequest, SearchRequest};
pub use response::{
    Citation, DocumentSummary, OperationStatus, SearchResponse, StoreSummary, UploadResponse,
};
