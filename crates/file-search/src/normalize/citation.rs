//! Citation extraction from grounded generation responses

use crate::types::remote::GenerateContentResponse;
use crate::types::response::{Citation, SearchResponse};

use super::markdown::strip_emphasis;

/// Extract `{title, uri}` citations from the first candidate's grounding chunks
///
/// Chunks without a retrieved context are skipped; order follows the response.
pub fn extract_citations(response: &GenerateContentResponse) -> Vec<Citation> {
    let Some(grounding) = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
    else {
        return Vec::new();
    };

    grounding
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.retrieved_context.as_ref())
        .map(|ctx| Citation {
            title: ctx.title.clone().unwrap_or_default(),
            uri: ctx.uri.clone().unwrap_or_default(),
        })
        .collect()
}

/// Normalize a search response into answer text plus citations
pub fn normalize_search(response: &GenerateContentResponse, strip_markdown: bool) -> SearchResponse {
    let text = response.text().unwrap_or_default();
    let text = if strip_markdown {
        strip_emphasis(&text)
    } else {
        text
    };

    SearchResponse {
        text,
        citations: extract_citations(response),
    }
}
