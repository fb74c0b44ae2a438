//! Category catalog construction.
//!
//! Derives the prediction categories from the event schedule: one category
//! per sport+gender grouping, proposition questions appended, and the
//! overall lens last. Collaborators may also supply a catalog directly;
//! this builder just keeps schedule and catalog from drifting apart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, CategoryKind, Gender, ScheduledEvent};

/// A proposition question appended to the derived catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropositionDef {
    pub id: String,
    pub display_name: String,
    /// `PropositionYesNo` or `PropositionNumeric`.
    pub kind: CategoryKind,
}

/// Slug id for a sport+gender grouping
/// ("Alpine Skiing" + Men -> "alpine_skiing_men").
pub fn category_id_for(sport: &str, gender: Gender) -> String {
    let sport_slug = sport.to_lowercase().replace([' ', '-'], "_");
    format!("{}_{}", sport_slug, gender.as_str().to_lowercase())
}

fn display_name_for(sport: &str, gender: Gender) -> String {
    match gender {
        Gender::Mixed => format!("Mixed {sport}"),
        _ => format!("{}'s {sport}", gender.as_str()),
    }
}

/// Build the full category list from the schedule.
pub fn build_catalog(events: &[ScheduledEvent], propositions: &[PropositionDef]) -> Vec<Category> {
    let mut grouped: BTreeMap<(String, &'static str), (Gender, Vec<&ScheduledEvent>)> =
        BTreeMap::new();
    for event in events {
        grouped
            .entry((event.sport.clone(), event.gender.as_str()))
            .or_insert_with(|| (event.gender, Vec::new()))
            .1
            .push(event);
    }

    let mut categories = Vec::with_capacity(grouped.len() + propositions.len() + 1);
    for ((sport, _), (gender, group)) in &grouped {
        let first = group.iter().map(|e| e.first_round_at).min();
        let last = group.iter().map(|e| e.gold_medal_at).max();
        categories.push(Category {
            id: category_id_for(sport, *gender),
            display_name: display_name_for(sport, *gender),
            sport: sport.clone(),
            gender: Some(*gender),
            kind: CategoryKind::Standard,
            event_count: group.len() as u32,
            first_event_at: first,
            last_event_at: last,
        });
    }

    for prop in propositions {
        debug_assert!(matches!(
            prop.kind,
            CategoryKind::PropositionYesNo | CategoryKind::PropositionNumeric
        ));
        categories.push(Category {
            id: prop.id.clone(),
            display_name: prop.display_name.clone(),
            sport: "Special".to_string(),
            gender: None,
            kind: prop.kind,
            event_count: 1,
            first_event_at: None,
            last_event_at: None,
        });
    }

    if !events.is_empty() {
        categories.push(Category {
            id: "overall".to_string(),
            display_name: "Most Gold Medals Overall".to_string(),
            sport: "Overall".to_string(),
            gender: None,
            kind: CategoryKind::AggregateOverall,
            event_count: events.len() as u32,
            first_event_at: events.iter().map(|e| e.first_round_at).min(),
            last_event_at: events.iter().map(|e| e.gold_medal_at).max(),
        });
    }

    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
    }

    fn event(sport: &str, name: &str, gender: Gender, day: u32) -> ScheduledEvent {
        ScheduledEvent {
            category_id: category_id_for(sport, gender),
            sport: sport.to_string(),
            name: name.to_string(),
            gender,
            first_round_at: ts(day, 9),
            gold_medal_at: ts(day, 11),
            resolved: false,
        }
    }

    #[test]
    fn test_groups_by_sport_and_gender() {
        let events = vec![
            event("Alpine Skiing", "Men's Downhill", Gender::Men, 8),
            event("Alpine Skiing", "Men's Slalom", Gender::Men, 16),
            event("Alpine Skiing", "Women's Downhill", Gender::Women, 10),
            event("Luge", "Team Relay", Gender::Mixed, 13),
        ];
        let catalog = build_catalog(&events, &[]);

        // Three groupings plus the overall lens.
        assert_eq!(catalog.len(), 4);

        let men_alpine = catalog
            .iter()
            .find(|c| c.id == "alpine_skiing_men")
            .expect("men's alpine category");
        assert_eq!(men_alpine.display_name, "Men's Alpine Skiing");
        assert_eq!(men_alpine.event_count, 2);
        assert_eq!(men_alpine.first_event_at, Some(ts(8, 9)));
        assert_eq!(men_alpine.last_event_at, Some(ts(16, 11)));

        let mixed_luge = catalog
            .iter()
            .find(|c| c.id == "luge_mixed")
            .expect("mixed luge category");
        assert_eq!(mixed_luge.display_name, "Mixed Luge");
    }

    #[test]
    fn test_overall_last_with_total_event_count() {
        let events = vec![
            event("Alpine Skiing", "Men's Downhill", Gender::Men, 8),
            event("Luge", "Men's Singles", Gender::Men, 9),
        ];
        let catalog = build_catalog(&events, &[]);
        let overall = catalog.last().expect("overall present");
        assert_eq!(overall.kind, CategoryKind::AggregateOverall);
        assert_eq!(overall.event_count, 2);
    }

    #[test]
    fn test_propositions_appended() {
        let events = vec![event("Luge", "Men's Singles", Gender::Men, 9)];
        let props = vec![PropositionDef {
            id: "prop_host_gold".to_string(),
            display_name: "Italy wins ten golds".to_string(),
            kind: CategoryKind::PropositionYesNo,
        }];
        let catalog = build_catalog(&events, &props);
        let prop = catalog
            .iter()
            .find(|c| c.id == "prop_host_gold")
            .expect("proposition present");
        assert_eq!(prop.kind, CategoryKind::PropositionYesNo);
        assert_eq!(prop.event_count, 1);
    }

    #[test]
    fn test_slug_rules() {
        assert_eq!(category_id_for("Ski Jumping", Gender::Men), "ski_jumping_men");
        assert_eq!(
            category_id_for("Short-Track Speed Skating", Gender::Women),
            "short_track_speed_skating_women"
        );
    }
}
