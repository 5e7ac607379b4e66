use std::{path::Path, sync::Arc};

use api_router::{api_state::ApiState, app};
use common::{
    corpus::load_corpus,
    error::AppError,
    utils::{
        config::{get_config, AppConfig},
        embedding::{Embedder, EmbeddingProvider},
    },
};
use retrieval_pipeline::{RecommendationConfig, SimilarityIndex, TextPreprocessor};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    let embedding_provider = Arc::new(EmbeddingProvider::from_config(&config).await?);
    info!(
        embedding_backend = embedding_provider.backend_label(),
        embedding_dimension = embedding_provider.dimension(),
        embedding_model = ?embedding_provider.model_code(),
        "Embedding provider initialized"
    );

    // The corpus and its vectors must be complete before the port is bound.
    let backend_label = embedding_provider.backend_label();
    let api_state = build_state(&config, embedding_provider, backend_label).await?;

    let serve_address = format!("0.0.0.0:{}", config.http_port);
    info!("Starting server listening on {serve_address}");
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app(api_state)).await?;

    Ok(())
}

/// Loads the corpus and embeds it into a fresh, read-only request context.
async fn build_state(
    config: &AppConfig,
    embedder: Arc<dyn Embedder>,
    backend_label: &str,
) -> Result<ApiState, AppError> {
    let corpus = load_corpus(Path::new(&config.corpus_path), &config.corpus_columns())?;

    let index = SimilarityIndex::build(
        corpus,
        embedder,
        TextPreprocessor::default(),
        RecommendationConfig::from(config),
    )
    .await?;

    Ok(ApiState::new(Arc::new(index), backend_label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use common::utils::embedding::EmbeddingBackend;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn smoke_test_config(corpus_path: PathBuf) -> AppConfig {
        AppConfig {
            http_port: 0,
            corpus_path: corpus_path.to_string_lossy().into_owned(),
            embedding_backend: EmbeddingBackend::Hashed,
            embedding_dimensions: 128,
            ..Default::default()
        }
    }

    async fn hashed_state(config: &AppConfig) -> Result<ApiState, AppError> {
        let provider = Arc::new(
            EmbeddingProvider::from_config(config)
                .await
                .expect("failed to create hashed embedding provider"),
        );
        let label = provider.backend_label();
        build_state(config, provider, label).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn smoke_startup_with_csv_corpus() {
        let dir = TempDir::new().expect("temp dir");
        let corpus_path = dir.path().join("corpus.csv");
        std::fs::write(
            &corpus_path,
            "Problem , Shloka_Combined\nI feel anxious,V1\n,dropped\nI feel calm,V2\n",
        )
        .expect("write corpus");

        let config = smoke_test_config(corpus_path);
        let state = hashed_state(&config).await.expect("state");
        assert_eq!(state.index.len(), 2);

        let app = app(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/live")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/recommend")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"problem": "I feel anxious"}"#))
                    .expect("request"),
            )
            .await
            .expect("recommend response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["Main_Recommendation"]["Shloka"], "V1");
        assert_eq!(body["Other_Recommendations"][0]["Shloka"], "V2");

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/recommend")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"problem": "   "}"#))
                    .expect("request"),
            )
            .await
            .expect("blank response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn startup_fails_without_corpus_file() {
        let dir = TempDir::new().expect("temp dir");
        let config = smoke_test_config(dir.path().join("missing.csv"));

        let err = hashed_state(&config).await.unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn startup_fails_without_problem_column() {
        let dir = TempDir::new().expect("temp dir");
        let corpus_path = dir.path().join("corpus.csv");
        std::fs::write(&corpus_path, "question,shloka_combined\nq,V1\n").expect("write corpus");

        let err = hashed_state(&smoke_test_config(corpus_path))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(column) if column == "problem"));
    }

    #[tokio::test]
    async fn startup_fails_when_every_row_is_incomplete() {
        let dir = TempDir::new().expect("temp dir");
        let corpus_path = dir.path().join("corpus.jsonl");
        std::fs::write(
            &corpus_path,
            "{\"problem\": \"a\", \"shloka_combined\": null}\n",
        )
        .expect("write corpus");

        let err = hashed_state(&smoke_test_config(corpus_path))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyCorpus));
    }
}
