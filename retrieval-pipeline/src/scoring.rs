use std::cmp::Ordering;

/// A corpus position paired with its similarity to the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f32,
}

/// Cosine of the angle between `a` and `b`.
///
/// Returns `0.0` when either vector has zero norm, when the lengths differ, or
/// when the result is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot = x.mul_add(*y, dot);
        norm_a = x.mul_add(*x, norm_a);
        norm_b = y.mul_add(*y, norm_b);
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let similarity = dot / denominator;
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

/// Orders by score descending, then by corpus position ascending.
pub fn sort_by_score_desc(items: &mut [ScoredIndex]) {
    items.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });
}

/// Scores every candidate against `query` and returns the best `limit`.
pub fn top_k<'a, I>(query: &[f32], candidates: I, limit: usize) -> Vec<ScoredIndex>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut scored: Vec<ScoredIndex> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| ScoredIndex {
            index,
            score: cosine_similarity(query, candidate),
        })
        .collect();

    sort_by_score_desc(&mut scored);
    scored.truncate(limit);
    scored
}

/// Rounds to four decimal places for presentation.
pub fn round_score(score: f32) -> f64 {
    (f64::from(score) * 10_000.0).round() / 10_000.0
}
