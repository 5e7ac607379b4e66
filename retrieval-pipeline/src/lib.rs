pub mod index;
pub mod preprocess;
pub mod recommendation;
pub mod scoring;

pub use index::SimilarityIndex;
pub use preprocess::TextPreprocessor;
pub use recommendation::{
    MainRecommendation, OtherRecommendation, Recommendation, RecommendationConfig,
};
