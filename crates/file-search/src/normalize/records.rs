//! Store, document and operation summaries with defaults substituted

use crate::types::remote::{CustomMetadata, Document, FileSearchStore, Operation};
use crate::types::response::{
    DocumentSummary, MetadataEntry, OperationStatus, StoreCreated, StoreSummary, UploadResponse,
};

impl From<&FileSearchStore> for StoreSummary {
    fn from(store: &FileSearchStore) -> Self {
        Self {
            name: store.name.clone(),
            display_name: store.display_name.clone().unwrap_or_default(),
            create_time: store.create_time.clone(),
            update_time: store.update_time.clone(),
            active_documents_count: store.active_documents_count.unwrap_or(0),
            pending_documents_count: store.pending_documents_count.unwrap_or(0),
            failed_documents_count: store.failed_documents_count.unwrap_or(0),
            size_bytes: store.size_bytes.unwrap_or(0),
        }
    }
}

impl From<&FileSearchStore> for StoreCreated {
    fn from(store: &FileSearchStore) -> Self {
        Self {
            name: store.name.clone(),
            display_name: store.display_name.clone().unwrap_or_default(),
            create_time: store.create_time.clone(),
        }
    }
}

impl From<&CustomMetadata> for MetadataEntry {
    fn from(meta: &CustomMetadata) -> Self {
        let value = if let Some(s) = &meta.string_value {
            s.clone()
        } else if let Some(list) = &meta.string_list_value {
            list.values.join(", ")
        } else if let Some(n) = meta.numeric_value {
            n.to_string()
        } else {
            String::new()
        };

        Self {
            key: meta.key.clone(),
            value,
        }
    }
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            name: doc.name.clone(),
            display_name: doc.display_name.clone().unwrap_or_default(),
            create_time: doc.create_time.clone(),
            update_time: doc.update_time.clone(),
            state: doc.state.clone().unwrap_or_default(),
            size_bytes: doc.size_bytes.unwrap_or(0),
            mime_type: doc.mime_type.clone().unwrap_or_default(),
            custom_metadata: doc
                .custom_metadata
                .iter()
                .flatten()
                .map(MetadataEntry::from)
                .collect(),
        }
    }
}

impl From<&Operation> for OperationStatus {
    fn from(op: &Operation) -> Self {
        Self {
            name: op.name.clone(),
            done: op.done.unwrap_or(false),
            metadata: op.metadata.clone(),
            error: op.error.as_ref().map(|e| {
                e.message
                    .clone()
                    .unwrap_or_else(|| format!("Operation failed with code {}", e.code.unwrap_or(0)))
            }),
        }
    }
}

impl From<&Operation> for UploadResponse {
    fn from(op: &Operation) -> Self {
        Self {
            operation_name: op.name.clone(),
            done: op.done.unwrap_or(false),
            message: "Upload initiated".to_string(),
        }
    }
}
