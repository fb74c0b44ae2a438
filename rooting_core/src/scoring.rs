//! Pool scoring.
//!
//! Counts correct predictions per participant against officially-resolved
//! categories. Pure over its inputs; storage of results and membership is
//! the database collaborator's concern.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::Prediction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantScore {
    pub user_name: String,
    pub correct: u32,
    pub total_predicted: u32,
    /// Results entered so far; shared across participants.
    pub total_results: u32,
}

/// Score every participant: one point per prediction equal to the recorded
/// result for its category. Sorted by correct (desc), then name.
pub fn calculate_scores(
    participants: &[(String, Vec<Prediction>)],
    results: &FxHashMap<String, String>,
) -> Vec<ParticipantScore> {
    let mut scores: Vec<ParticipantScore> = participants
        .iter()
        .map(|(user_name, predictions)| {
            let correct = predictions
                .iter()
                .filter(|p| results.get(&p.category_id) == Some(&p.value))
                .count() as u32;
            ParticipantScore {
                user_name: user_name.clone(),
                correct,
                total_predicted: predictions.len() as u32,
                total_results: results.len() as u32,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.correct
            .cmp(&a.correct)
            .then_with(|| a.user_name.cmp(&b.user_name))
    });
    scores
}
