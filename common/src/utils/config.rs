use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{corpus::CorpusColumns, utils::embedding::EmbeddingBackend};

pub const DEFAULT_SOLUTION_NOTE: &str =
    "💡 ही श्लोक मनाच्या शांतीसाठी आणि आत्मनियंत्रणासाठी मार्गदर्शन करते.";

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    #[serde(default = "default_problem_column")]
    pub problem_column: String,
    #[serde(default = "default_verse_column")]
    pub verse_column: String,
    #[serde(default)]
    pub embedding_backend: EmbeddingBackend,
    #[serde(default)]
    pub embedding_model: Option<String>,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: u32,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_solution_note")]
    pub solution_note: String,
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

impl AppConfig {
    pub fn corpus_columns(&self) -> CorpusColumns {
        CorpusColumns::new(&self.problem_column, &self.verse_column)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            corpus_path: default_corpus_path(),
            problem_column: default_problem_column(),
            verse_column: default_verse_column(),
            embedding_backend: EmbeddingBackend::default(),
            embedding_model: None,
            embedding_dimensions: default_embedding_dimensions(),
            openai_api_key: None,
            openai_base_url: default_base_url(),
            solution_note: default_solution_note(),
            recommendation_count: default_recommendation_count(),
        }
    }
}

const fn default_http_port() -> u16 {
    10000
}

fn default_corpus_path() -> String {
    "Bhagavad_Gita_Updated_Merged.csv".to_string()
}

fn default_problem_column() -> String {
    "problem".to_string()
}

fn default_verse_column() -> String {
    "shloka_combined".to_string()
}

const fn default_embedding_dimensions() -> u32 {
    384
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_solution_note() -> String {
    DEFAULT_SOLUTION_NOTE.to_string()
}

const fn default_recommendation_count() -> usize {
    5
}

/// Reads `config.*` from the working directory, then the environment.
/// The conventional `PORT` variable wins over `HTTP_PORT`.
pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .set_override_option("http_port", std::env::var("PORT").ok())?
        .build()?;

    config.try_deserialize()
}
