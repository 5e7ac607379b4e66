use std::{sync::Arc, time::Instant};

use common::{corpus::Corpus, error::AppError, utils::embedding::Embedder};
use tracing::{debug, info, instrument};

use crate::{
    preprocess::TextPreprocessor,
    recommendation::{
        MainRecommendation, OtherRecommendation, Recommendation, RecommendationConfig,
    },
    scoring::{round_score, top_k},
};

/// Number of corpus problems sent to the embedding backend per call.
pub const EMBEDDING_BATCH_SIZE: usize = 256;

/// In-memory corpus with one precomputed embedding per entry.
///
/// Built once before serving and never mutated; `embeddings[i]` always belongs
/// to `corpus.get(i)`, and every vector has length `dimension`.
pub struct SimilarityIndex {
    corpus: Corpus,
    embeddings: Vec<Vec<f32>>,
    dimension: usize,
    embedder: Arc<dyn Embedder>,
    preprocessor: TextPreprocessor,
    config: RecommendationConfig,
}

impl std::fmt::Debug for SimilarityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityIndex")
            .field("entries", &self.corpus.len())
            .field("dimension", &self.dimension)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SimilarityIndex {
    /// Embeds every problem of `corpus`. Any backend failure aborts the build,
    /// so a partially embedded index is never returned.
    #[instrument(skip_all, fields(entries = corpus.len()))]
    pub async fn build(
        corpus: Corpus,
        embedder: Arc<dyn Embedder>,
        preprocessor: TextPreprocessor,
        config: RecommendationConfig,
    ) -> Result<Self, AppError> {
        if corpus.is_empty() {
            return Err(AppError::EmptyCorpus);
        }

        let started = Instant::now();
        let processed: Vec<String> = corpus
            .problems()
            .map(|problem| preprocessor.preprocess(problem))
            .collect();

        let mut embeddings = Vec::with_capacity(processed.len());
        for batch in processed.chunks(EMBEDDING_BATCH_SIZE) {
            let vectors = embedder.embed_batch(batch.to_vec()).await?;
            if vectors.len() != batch.len() {
                return Err(AppError::Embedding(format!(
                    "backend returned {} vectors for {} inputs",
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
            debug!(
                embedded = embeddings.len(),
                total = processed.len(),
                "Embedded corpus batch"
            );
        }

        let dimension = embeddings.first().map_or(0, Vec::len);
        if dimension == 0 {
            return Err(AppError::Embedding(
                "backend returned empty vectors".to_string(),
            ));
        }
        if let Some(position) = embeddings.iter().position(|v| v.len() != dimension) {
            return Err(AppError::Embedding(format!(
                "vector for entry {position} does not have dimension {dimension}"
            )));
        }

        info!(
            entries = corpus.len(),
            dimension,
            elapsed_ms = started.elapsed().as_millis(),
            "Similarity index built"
        );

        Ok(Self {
            corpus,
            embeddings,
            dimension,
            embedder,
            preprocessor,
            config,
        })
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Finds the verses whose problems are closest to `text`.
    ///
    /// Blank input is rejected before the embedding backend is called.
    #[instrument(skip_all)]
    pub async fn recommend(&self, text: &str) -> Result<Recommendation, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::EmptyInput);
        }

        let processed = self.preprocessor.preprocess(text);
        let query = self.embedder.embed(&processed).await?;
        if query.len() != self.dimension {
            return Err(AppError::Embedding(format!(
                "query vector has dimension {} but the index uses {}",
                query.len(),
                self.dimension
            )));
        }

        let ranked = top_k(
            &query,
            self.embeddings.iter().map(Vec::as_slice),
            self.config.top_k.max(1),
        );
        let mut matches = ranked.into_iter().filter_map(|scored| {
            self.corpus
                .get(scored.index)
                .map(|entry| (entry, round_score(scored.score)))
        });

        let (best, similarity) = matches.next().ok_or(AppError::EmptyCorpus)?;
        let main = MainRecommendation {
            problem: text.to_string(),
            verse: best.verse().to_string(),
            solution_note: self.config.solution_note.clone(),
            similarity,
        };
        let others: Vec<OtherRecommendation> = matches
            .map(|(entry, similarity)| OtherRecommendation {
                verse: entry.verse().to_string(),
                solution_note: self.config.solution_note.clone(),
                similarity,
            })
            .collect();

        debug!(
            similarity = main.similarity,
            alternatives = others.len(),
            "Recommendation ranked"
        );

        Ok(Recommendation { main, others })
    }
}
