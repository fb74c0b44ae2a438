//! Rooting orchestration.
//!
//! Walks a user's prediction set through matching, standings, eligibility,
//! narration and urgency, and returns one sorted `RootingInfo` per live
//! prediction. One bad record never aborts the whole set; only a broken
//! standings invariant does.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::eligibility;
use crate::error::RootingError;
use crate::matching;
use crate::models::{
    Category, CategoryKind, CategoryStanding, CompletedResult, Prediction, RootingInfo,
    ScheduledEvent,
};
use crate::scenarios::{self, OVERALL_UPCOMING_CAP};
use crate::standings;
use crate::urgency;

/// Compute rooting recommendations for one user's prediction set.
///
/// `now` and `zone` are explicit so the engine never reads the wall clock:
/// the same snapshot and reference time always produce the same output,
/// sorted by urgency, then status (eliminated last), then display name.
pub fn rooting_info_for_predictions(
    categories: &[Category],
    events: &[ScheduledEvent],
    results: &[CompletedResult],
    predictions: &[Prediction],
    now: DateTime<Utc>,
    zone: Tz,
) -> Result<Vec<RootingInfo>, RootingError> {
    let (matched, stats) = matching::match_results(results, events);
    info!(
        "matched {} of {} scraped results ({} misses, {} duplicates)",
        stats.matched, stats.results_seen, stats.misses, stats.duplicates
    );

    // Standard standings first, in catalog order; the overall lens sums
    // over all of them.
    let standard: Vec<&Category> = categories
        .iter()
        .filter(|c| c.kind == CategoryKind::Standard)
        .collect();
    let standard_standings: Vec<CategoryStanding> = standard
        .iter()
        .map(|c| standings::calculate_category_standing(c, &matched, results, events))
        .collect();
    let standard_by_id: FxHashMap<&str, &CategoryStanding> = standard
        .iter()
        .zip(standard_standings.iter())
        .map(|(c, s)| (c.id.as_str(), s))
        .collect();

    let catalog_by_id: FxHashMap<&str, &Category> =
        categories.iter().map(|c| (c.id.as_str(), c)).collect();

    let now_local = now.with_timezone(&zone).naive_local();
    let mut infos = Vec::with_capacity(predictions.len());

    for prediction in predictions {
        let Some(&category) = catalog_by_id.get(prediction.category_id.as_str()) else {
            warn!(
                "skipping prediction: {}",
                RootingError::UnknownCategory {
                    category_id: prediction.category_id.clone(),
                }
            );
            continue;
        };

        let standing = match category.kind {
            CategoryKind::Standard => standard_by_id
                .get(category.id.as_str())
                .map(|s| (*s).clone())
                .unwrap_or_else(|| {
                    standings::calculate_category_standing(category, &matched, results, events)
                }),
            CategoryKind::PropositionYesNo | CategoryKind::PropositionNumeric => {
                standings::calculate_category_standing(category, &matched, results, events)
            }
            CategoryKind::AggregateOverall => standings::calculate_overall_standing(
                category,
                &standard_standings,
                &matched,
                events,
            ),
        };

        let status = match eligibility::evaluate(&standing, prediction, category) {
            Ok(status) => status,
            Err(err @ RootingError::InvariantViolation(_)) => return Err(err),
            Err(err) => {
                warn!("skipping prediction: {err}");
                continue;
            }
        };

        let upcoming = match category.kind {
            CategoryKind::Standard => {
                standings::remaining_events_for_category(&category.id, &matched, events)
            }
            CategoryKind::AggregateOverall => {
                let mut global = standings::remaining_events_global(&matched, events);
                global.truncate(OVERALL_UPCOMING_CAP);
                global
            }
            _ => Vec::new(),
        };

        // Upstream data inconsistency, not a real state: standings that
        // claim to be open while the schedule has nothing left (or the
        // other way round) are logged and withheld from the caller.
        if !status.is_terminal() {
            let medal_race = matches!(
                category.kind,
                CategoryKind::Standard | CategoryKind::AggregateOverall
            );
            if standing.remaining_events == 0 || (medal_race && upcoming.is_empty()) {
                warn!(
                    "inconsistent snapshot for {}: {} remaining events, {} schedulable; skipping",
                    category.id,
                    standing.remaining_events,
                    upcoming.len()
                );
                continue;
            }
        }

        let next_local = standing
            .next_event
            .as_ref()
            .map(|e| e.gold_medal_at.with_timezone(&zone).naive_local());
        let urgency = urgency::calculate_urgency(next_local, now_local);

        let scenarios =
            scenarios::generate_scenarios(&standing, prediction, category, status, &upcoming);

        infos.push(RootingInfo {
            category: category.clone(),
            prediction: prediction.clone(),
            next_event: standing.next_event.clone(),
            standing,
            status,
            scenarios,
            urgency,
            upcoming,
        });
    }

    infos.sort_by(|a, b| {
        a.urgency
            .rank()
            .cmp(&b.urgency.rank())
            .then(a.status.rank().cmp(&b.status.rank()))
            .then_with(|| a.category.display_name.cmp(&b.category.display_name))
    });

    Ok(infos)
}
