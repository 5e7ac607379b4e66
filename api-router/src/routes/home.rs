/// Plain-text confirmation that the service is up.
pub async fn home() -> &'static str {
    "🕉️ Bhagavad Gita Shloka Recommender is running."
}
