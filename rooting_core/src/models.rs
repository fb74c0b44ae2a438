// Shared models for the Podium rooting engine and its consumers.
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Category catalog
// ============================================================================

/// How a category is decided and tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Country with the most golds across the category's events wins.
    Standard,
    /// Yes/no question resolved by a single outcome.
    PropositionYesNo,
    /// Numeric question resolved by a single value.
    PropositionNumeric,
    /// Cross-category lens: most golds summed over every standard category.
    AggregateOverall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Mixed,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Mixed => "Mixed",
        }
    }
}

/// A prediction target: one sport+gender grouping, a proposition question,
/// or the overall lens. Immutable reference data, loaded once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub display_name: String,
    pub sport: String,
    pub gender: Option<Gender>,
    pub kind: CategoryKind,
    /// Number of gold medals awarded in this category (always >= 1).
    pub event_count: u32,
    pub first_event_at: Option<DateTime<Utc>>,
    pub last_event_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Schedule & scraped results
// ============================================================================

/// One gold-medal event on the canonical schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub category_id: String,
    pub sport: String,
    pub name: String,
    pub gender: Gender,
    pub first_round_at: DateTime<Utc>,
    pub gold_medal_at: DateTime<Utc>,
    /// Collaborator-supplied hint that the event is already decided. Never
    /// feeds the tally; only removes the event from next-event selection.
    #[serde(default)]
    pub resolved: bool,
}

/// Raw scraped record. The event name is free text and may be misspelled
/// or formatted differently from the canonical schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedResult {
    pub event_name: String,
    /// Winning country, or the proposition outcome value as text.
    pub winner: String,
    pub completed_at: DateTime<Utc>,
}

// ============================================================================
// Predictions
// ============================================================================

/// A user's pick for one category. The value stays raw text (a country
/// name, "Yes"/"No", or a number) and is parsed per category kind at
/// evaluation time, so one malformed record never aborts a whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category_id: String,
    pub value: String,
}

// ============================================================================
// Derived standings
// ============================================================================

/// Current medal standing for one category. Recomputed fresh per request
/// from raw inputs; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStanding {
    pub category_id: String,
    /// Country -> gold count for this category.
    pub gold_counts: FxHashMap<String, u32>,
    /// Countries tied for the max tally, in the order each first reached it.
    /// Empty only while zero events have resolved.
    pub leaders: Vec<String>,
    pub completed_events: u32,
    pub remaining_events: u32,
    pub next_event: Option<ScheduledEvent>,
    /// Resolved outcome text for proposition categories.
    pub proposition_outcome: Option<String>,
}

impl CategoryStanding {
    /// Gold count shared by every current leader (0 while nothing resolved).
    pub fn leader_count(&self) -> u32 {
        self.gold_counts.values().copied().max().unwrap_or(0)
    }

    pub fn count_for(&self, country: &str) -> u32 {
        self.gold_counts.get(country).copied().unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_events == 0
    }
}

// ============================================================================
// Engine output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootingStatus {
    Leading,
    Tied,
    BehindPossible,
    Eliminated,
    PropositionPending,
}

impl RootingStatus {
    /// Sort rank for report ordering. Eliminated picks sink to the bottom.
    pub fn rank(&self) -> u8 {
        match self {
            RootingStatus::Leading => 0,
            RootingStatus::Tied => 1,
            RootingStatus::BehindPossible => 2,
            RootingStatus::PropositionPending => 3,
            RootingStatus::Eliminated => 4,
        }
    }

    /// Terminal statuses need no further events to be decided.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RootingStatus::Leading | RootingStatus::Tied | RootingStatus::Eliminated
        )
    }
}

/// How soon the category's next unresolved event occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Today,
    ThisWeek,
    Later,
    None,
}

impl Urgency {
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::Today => 0,
            Urgency::ThisWeek => 1,
            Urgency::Later => 2,
            Urgency::None => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Today => "today",
            Urgency::ThisWeek => "this_week",
            Urgency::Later => "later",
            Urgency::None => "none",
        }
    }
}

/// What the user should root for in one category: the standing, the pick's
/// viability, narrated scenarios, and timing. One record per live prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootingInfo {
    pub category: Category,
    pub prediction: Prediction,
    pub standing: CategoryStanding,
    pub status: RootingStatus,
    pub scenarios: Vec<String>,
    pub urgency: Urgency,
    pub next_event: Option<ScheduledEvent>,
    /// Remaining events in schedule order. Capped at 10 entries for the
    /// overall lens to bound display volume.
    pub upcoming: Vec<ScheduledEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_orders_eliminated_last() {
        let mut statuses = vec![
            RootingStatus::Eliminated,
            RootingStatus::Leading,
            RootingStatus::PropositionPending,
            RootingStatus::Tied,
            RootingStatus::BehindPossible,
        ];
        statuses.sort_by_key(|s| s.rank());
        assert_eq!(statuses.first(), Some(&RootingStatus::Leading));
        assert_eq!(statuses.last(), Some(&RootingStatus::Eliminated));
    }

    #[test]
    fn test_urgency_rank_orders_today_first() {
        assert!(Urgency::Today.rank() < Urgency::ThisWeek.rank());
        assert!(Urgency::ThisWeek.rank() < Urgency::Later.rank());
        assert!(Urgency::Later.rank() < Urgency::None.rank());
    }

    #[test]
    fn test_leader_count_empty_standing() {
        let standing = CategoryStanding::default();
        assert_eq!(standing.leader_count(), 0);
        assert_eq!(standing.count_for("Norway"), 0);
    }

    #[test]
    fn test_leader_count_max_tally() {
        let mut standing = CategoryStanding::default();
        standing.gold_counts.insert("Norway".to_string(), 3);
        standing.gold_counts.insert("Austria".to_string(), 1);
        assert_eq!(standing.leader_count(), 3);
        assert_eq!(standing.count_for("Austria"), 1);
    }
}
