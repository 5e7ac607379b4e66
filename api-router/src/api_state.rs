use std::sync::Arc;

use retrieval_pipeline::SimilarityIndex;

/// Read-only context shared by every request handler.
#[derive(Clone, Debug)]
pub struct ApiState {
    pub index: Arc<SimilarityIndex>,
    pub embedding_backend: String,
}

impl ApiState {
    pub fn new(index: Arc<SimilarityIndex>, embedding_backend: impl Into<String>) -> Self {
        Self {
            index,
            embedding_backend: embedding_backend.into(),
        }
    }
}
