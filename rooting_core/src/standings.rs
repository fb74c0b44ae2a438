//! Standings calculation.
//!
//! Folds matched results into per-category medal tallies. Pure functions of
//! their inputs: the same snapshot always yields the same standing, and any
//! caching belongs to an outer layer, never in here.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::matching::{self, MatchedResult};
use crate::models::{Category, CategoryKind, CategoryStanding, CompletedResult, ScheduledEvent};

/// Current standing for a standard or proposition category.
///
/// Standard categories tally one gold per matched result, processed in
/// scrape-timestamp order so the leader list reflects the order countries
/// first reached the max tally. Proposition categories carry only the
/// resolved flag and outcome text. Aggregate categories are computed by
/// [`calculate_overall_standing`] once every standard standing exists.
pub fn calculate_category_standing(
    category: &Category,
    matched: &[MatchedResult],
    raw_results: &[CompletedResult],
    events: &[ScheduledEvent],
) -> CategoryStanding {
    debug_assert!(
        category.kind != CategoryKind::AggregateOverall,
        "aggregate standings derive from standard standings"
    );

    match category.kind {
        CategoryKind::PropositionYesNo | CategoryKind::PropositionNumeric => {
            proposition_standing(category, raw_results)
        }
        _ => standard_standing(category, matched, events),
    }
}

fn standard_standing(
    category: &Category,
    matched: &[MatchedResult],
    events: &[ScheduledEvent],
) -> CategoryStanding {
    let mut in_category: Vec<&MatchedResult> = matched
        .iter()
        .filter(|m| m.category_id == category.id)
        .collect();
    in_category.sort_by_key(|m| m.completed_at);

    let mut gold_counts: FxHashMap<String, u32> = FxHashMap::default();
    // Sequence of each country's latest gold; orders the leader list.
    let mut attained: FxHashMap<String, usize> = FxHashMap::default();
    for (seq, result) in in_category.iter().enumerate() {
        *gold_counts.entry(result.winner.clone()).or_insert(0) += 1;
        attained.insert(result.winner.clone(), seq);
    }

    let completed_events = in_category.len() as u32;
    let max_golds = gold_counts.values().copied().max().unwrap_or(0);
    let mut leaders: Vec<String> = gold_counts
        .iter()
        .filter(|(_, &count)| max_golds > 0 && count == max_golds)
        .map(|(country, _)| country.clone())
        .collect();
    leaders.sort_by_key(|country| attained[country]);

    let upcoming = remaining_events_for_category(&category.id, matched, events);

    CategoryStanding {
        category_id: category.id.clone(),
        gold_counts,
        leaders,
        completed_events,
        remaining_events: category.event_count.saturating_sub(completed_events),
        next_event: upcoming.into_iter().next(),
        proposition_outcome: None,
    }
}

fn proposition_standing(category: &Category, raw_results: &[CompletedResult]) -> CategoryStanding {
    let outcome = matching::resolve_proposition(category, raw_results);
    let resolved = outcome.is_some();
    CategoryStanding {
        category_id: category.id.clone(),
        gold_counts: FxHashMap::default(),
        leaders: Vec::new(),
        completed_events: if resolved { category.event_count } else { 0 },
        remaining_events: if resolved { 0 } else { category.event_count },
        next_event: None,
        proposition_outcome: outcome.map(|r| r.winner.clone()),
    }
}

/// Standing for the aggregate-overall lens: each country's tally summed
/// across every standard category, with remaining counts summed and the
/// next event taken globally. Standings must be passed in catalog order so
/// leader ordering stays deterministic.
pub fn calculate_overall_standing(
    category: &Category,
    standard_standings: &[CategoryStanding],
    matched: &[MatchedResult],
    events: &[ScheduledEvent],
) -> CategoryStanding {
    let mut gold_counts: FxHashMap<String, u32> = FxHashMap::default();
    // Last catalog slot that lifted each country to its final total.
    let mut attained: FxHashMap<String, usize> = FxHashMap::default();
    let mut completed_events = 0;
    let mut remaining_events = 0;

    for (slot, standing) in standard_standings.iter().enumerate() {
        for (country, count) in &standing.gold_counts {
            *gold_counts.entry(country.clone()).or_insert(0) += count;
            attained.insert(country.clone(), slot);
        }
        completed_events += standing.completed_events;
        remaining_events += standing.remaining_events;
    }

    let max_golds = gold_counts.values().copied().max().unwrap_or(0);
    let mut leaders: Vec<String> = gold_counts
        .iter()
        .filter(|(_, &count)| max_golds > 0 && count == max_golds)
        .map(|(country, _)| country.clone())
        .collect();
    leaders.sort_by_key(|country| (attained[country], country.clone()));

    CategoryStanding {
        category_id: category.id.clone(),
        gold_counts,
        leaders,
        completed_events,
        remaining_events,
        next_event: remaining_events_global(matched, events).into_iter().next(),
        proposition_outcome: None,
    }
}

/// Remaining events for one category, earliest gold-medal time first.
/// An event is remaining when no result claimed it and the collaborator
/// did not pre-flag it resolved.
pub fn remaining_events_for_category(
    category_id: &str,
    matched: &[MatchedResult],
    events: &[ScheduledEvent],
) -> Vec<ScheduledEvent> {
    let claimed: FxHashSet<usize> = matched.iter().map(|m| m.event_index).collect();
    let mut remaining: Vec<ScheduledEvent> = events
        .iter()
        .enumerate()
        .filter(|(idx, event)| {
            event.category_id == category_id && !claimed.contains(idx) && !event.resolved
        })
        .map(|(_, event)| event.clone())
        .collect();
    remaining.sort_by_key(|event| event.gold_medal_at);
    remaining
}

/// Remaining events across the whole schedule, earliest first.
pub fn remaining_events_global(
    matched: &[MatchedResult],
    events: &[ScheduledEvent],
) -> Vec<ScheduledEvent> {
    let claimed: FxHashSet<usize> = matched.iter().map(|m| m.event_index).collect();
    let mut remaining: Vec<ScheduledEvent> = events
        .iter()
        .enumerate()
        .filter(|(idx, event)| !claimed.contains(idx) && !event.resolved)
        .map(|(_, event)| event.clone())
        .collect();
    remaining.sort_by_key(|event| event.gold_medal_at);
    remaining
}
