/// Cosine similarity between two vectors, accumulated in f64.
///
/// Returns 0.0 when the vectors differ in length or either norm is zero,
/// so one malformed candidate scores as irrelevant instead of failing the
/// whole query. The result is clamped to [-1, 1].
pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> f64 {
    if query.len() != candidate.len() || query.is_empty() {
        return 0.0;
    }

    let dot: f64 = query
        .iter()
        .zip(candidate.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let query_norm: f64 = query.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let candidate_norm: f64 = candidate
        .iter()
        .map(|x| (*x as f64).powi(2))
        .sum::<f64>()
        .sqrt();

    if query_norm == 0.0 || candidate_norm == 0.0 {
        return 0.0;
    }

    (dot / (query_norm * candidate_norm)).clamp(-1.0, 1.0)
}
