//! Eligibility evaluation.
//!
//! Decides whether a pick can still win its category. The catch-up bound is
//! the conservative best case for the pick: the pick wins every remaining
//! event while the leader wins none, and tying the leader counts as a win.

use crate::error::RootingError;
use crate::models::{Category, CategoryKind, CategoryStanding, Prediction, RootingStatus};

/// Parsed form of a raw prediction value.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionValue {
    Country(String),
    YesNo(bool),
    Numeric(i64),
}

impl PredictionValue {
    /// Parse a raw prediction (or resolved proposition outcome) against the
    /// category kind. Malformed values are invalid-input errors local to
    /// the one prediction, never fatal to the request.
    pub fn parse(category: &Category, raw: &str) -> Result<Self, RootingError> {
        let trimmed = raw.trim();
        match category.kind {
            CategoryKind::Standard | CategoryKind::AggregateOverall => {
                Ok(PredictionValue::Country(trimmed.to_string()))
            }
            CategoryKind::PropositionYesNo => match trimmed.to_lowercase().as_str() {
                "yes" | "y" | "true" => Ok(PredictionValue::YesNo(true)),
                "no" | "n" | "false" => Ok(PredictionValue::YesNo(false)),
                _ => Err(RootingError::InvalidPrediction {
                    category_id: category.id.clone(),
                    value: raw.to_string(),
                    reason: "expected yes/no".to_string(),
                }),
            },
            CategoryKind::PropositionNumeric => {
                trimmed
                    .parse::<i64>()
                    .map(PredictionValue::Numeric)
                    .map_err(|_| RootingError::InvalidPrediction {
                        category_id: category.id.clone(),
                        value: raw.to_string(),
                        reason: "expected an integer".to_string(),
                    })
            }
        }
    }
}

/// Status of a pick against the current standing.
pub fn evaluate(
    standing: &CategoryStanding,
    prediction: &Prediction,
    category: &Category,
) -> Result<RootingStatus, RootingError> {
    match category.kind {
        CategoryKind::Standard | CategoryKind::AggregateOverall => {
            evaluate_medal_race(standing, &prediction.value)
        }
        CategoryKind::PropositionYesNo | CategoryKind::PropositionNumeric => {
            evaluate_proposition(standing, prediction, category)
        }
    }
}

fn evaluate_medal_race(
    standing: &CategoryStanding,
    picked: &str,
) -> Result<RootingStatus, RootingError> {
    // Once a single event has resolved the leader set can never be empty;
    // an empty set here means the standings calculator is broken.
    if standing.completed_events > 0 && standing.leaders.is_empty() {
        return Err(RootingError::InvariantViolation(format!(
            "empty leader set with {} resolved events in {}",
            standing.completed_events, standing.category_id
        )));
    }

    if standing.leaders.iter().any(|leader| leader == picked) {
        return Ok(if standing.leaders.len() == 1 {
            RootingStatus::Leading
        } else {
            RootingStatus::Tied
        });
    }

    // Not a leader at the end of the schedule: a definite loss.
    if standing.remaining_events == 0 {
        return Ok(RootingStatus::Eliminated);
    }

    let picked_count = standing.count_for(picked);
    if picked_count + standing.remaining_events >= standing.leader_count() {
        Ok(RootingStatus::BehindPossible)
    } else {
        Ok(RootingStatus::Eliminated)
    }
}

fn evaluate_proposition(
    standing: &CategoryStanding,
    prediction: &Prediction,
    category: &Category,
) -> Result<RootingStatus, RootingError> {
    let picked = PredictionValue::parse(category, &prediction.value)?;

    let Some(outcome_raw) = standing.proposition_outcome.as_deref() else {
        return Ok(RootingStatus::PropositionPending);
    };
    let outcome = PredictionValue::parse(category, outcome_raw)?;

    Ok(if picked == outcome {
        RootingStatus::Leading
    } else {
        RootingStatus::Eliminated
    })
}
