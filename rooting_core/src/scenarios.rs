//! Scenario narration.
//!
//! Maps a pick's status and standing onto short human-readable lines. The
//! copy is plain structured text; layout and localization belong to the
//! presentation layer.

use crate::models::{
    Category, CategoryKind, CategoryStanding, Prediction, RootingStatus, ScheduledEvent,
};

/// Upper bound on upcoming events named for the overall lens. Display
/// volume guard, not a correctness rule.
pub(crate) const OVERALL_UPCOMING_CAP: usize = 10;

fn plural_golds(n: u32) -> &'static str {
    if n == 1 {
        "gold"
    } else {
        "golds"
    }
}

/// Leader names joined for narration, flagging a shared lead.
fn leader_str(leaders: &[String]) -> String {
    match leaders {
        [only] => only.clone(),
        _ => format!("{} (tied)", leaders.join(", ")),
    }
}

/// Runner-up gold count and names (alphabetical) behind a sole leader.
fn runner_up(standing: &CategoryStanding, picked: &str) -> (u32, Vec<String>) {
    let second_count = standing
        .gold_counts
        .iter()
        .filter(|(country, _)| country.as_str() != picked)
        .map(|(_, &count)| count)
        .max()
        .unwrap_or(0);
    if second_count == 0 {
        return (0, Vec::new());
    }
    let mut runners: Vec<String> = standing
        .gold_counts
        .iter()
        .filter(|(country, &count)| country.as_str() != picked && count == second_count)
        .map(|(country, _)| country.clone())
        .collect();
    runners.sort();
    (second_count, runners)
}

fn runner_up_str(runners: &[String]) -> String {
    match runners {
        [only] => only.clone(),
        [a, b] => format!("{a} and {b} (tied)"),
        _ => {
            let (last, rest) = runners.split_last().expect("non-empty runner list");
            format!("{}, and {} (tied)", rest.join(", "), last)
        }
    }
}

/// Narrate what must happen for the pick, one line per scenario.
pub fn generate_scenarios(
    standing: &CategoryStanding,
    prediction: &Prediction,
    category: &Category,
    status: RootingStatus,
    upcoming: &[ScheduledEvent],
) -> Vec<String> {
    match category.kind {
        CategoryKind::PropositionYesNo => yes_no_scenarios(standing, prediction, status),
        CategoryKind::PropositionNumeric => numeric_scenarios(standing, prediction, status),
        CategoryKind::Standard | CategoryKind::AggregateOverall => {
            let mut scenarios = medal_race_scenarios(standing, prediction, status);
            if category.kind == CategoryKind::AggregateOverall && !upcoming.is_empty() {
                let names: Vec<&str> = upcoming
                    .iter()
                    .take(OVERALL_UPCOMING_CAP)
                    .map(|event| event.name.as_str())
                    .collect();
                scenarios.push(format!("📅 Next up: {}", names.join(", ")));
            }
            scenarios
        }
    }
}

fn yes_no_scenarios(
    standing: &CategoryStanding,
    prediction: &Prediction,
    status: RootingStatus,
) -> Vec<String> {
    match (status, standing.proposition_outcome.as_deref()) {
        (RootingStatus::Leading, Some(outcome)) => {
            vec![format!("✅ Called it — resolved {outcome}.")]
        }
        (RootingStatus::Eliminated, Some(outcome)) => {
            vec![format!("❌ Resolved {outcome} — this one got away.")]
        }
        _ => {
            if prediction.value.trim().eq_ignore_ascii_case("yes") {
                vec!["🎯 Rooting for this to happen!".to_string()]
            } else {
                vec!["🎯 Rooting for this NOT to happen!".to_string()]
            }
        }
    }
}

fn numeric_scenarios(
    standing: &CategoryStanding,
    prediction: &Prediction,
    status: RootingStatus,
) -> Vec<String> {
    let picked = prediction.value.trim();
    match (status, standing.proposition_outcome.as_deref()) {
        (RootingStatus::Leading, Some(outcome)) => {
            vec![format!("✅ Nailed it — exactly {outcome}!")]
        }
        (RootingStatus::Eliminated, Some(outcome)) => {
            vec![format!("❌ Final count was {outcome}, not {picked}.")]
        }
        _ => vec![format!("🎯 Rooting for exactly {picked} medals!")],
    }
}

fn medal_race_scenarios(
    standing: &CategoryStanding,
    prediction: &Prediction,
    status: RootingStatus,
) -> Vec<String> {
    let picked = prediction.value.as_str();

    if standing.gold_counts.is_empty() {
        return vec![format!("🎯 Rooting for {picked} to win gold medals!")];
    }

    let mut scenarios = Vec::new();
    match status {
        RootingStatus::Leading => {
            let picked_count = standing.count_for(picked);
            let (second_count, runners) = runner_up(standing, picked);
            let lead = picked_count - second_count;

            // Clinched once even a perfect run leaves the runner-up at best
            // tied; a tie is a win for the current leader.
            if picked_count >= second_count + standing.remaining_events {
                scenarios.push(
                    "🏆 Clinched! You've secured this category — no one can catch up.".to_string(),
                );
            } else {
                let magic = (second_count + standing.remaining_events) - picked_count;
                if runners.is_empty() {
                    if picked_count >= standing.remaining_events {
                        scenarios.push(
                            "✅ Dominant! Only country with golds so far — keep it up!".to_string(),
                        );
                    } else {
                        scenarios.push(format!(
                            "✅ Leading! Only country with golds so far — win {magic} more to clinch."
                        ));
                    }
                } else {
                    let runners = runner_up_str(&runners);
                    if magic > standing.remaining_events {
                        scenarios.push(format!(
                            "✅ Leading by {lead} over {runners}. Stay ahead (or tie!) to win."
                        ));
                    } else {
                        scenarios.push(format!(
                            "✅ Leading by {lead} over {runners}. Win {magic} more {} to clinch.",
                            plural_golds(magic)
                        ));
                    }
                }
            }
        }
        RootingStatus::Tied => {
            let others: Vec<&str> = standing
                .leaders
                .iter()
                .filter(|leader| leader.as_str() != picked)
                .map(|leader| leader.as_str())
                .collect();
            let others = others.join(", ");
            if standing.remaining_events == 0 {
                scenarios.push(format!(
                    "🤝 Tied for the lead with {others} — and a tie counts as a win!"
                ));
            } else {
                scenarios.push(format!(
                    "🤝 Tied for the lead with {others}! Pull ahead or hold the tie to win."
                ));
            }
        }
        RootingStatus::BehindPossible => {
            let gap = standing.leader_count() - standing.count_for(picked);
            let leaders = leader_str(&standing.leaders);
            scenarios.push(format!(
                "📈 Need {picked} to win {gap} more {} than {leaders}.",
                plural_golds(gap)
            ));
            if standing.remaining_events <= gap {
                scenarios.push(format!(
                    "⚠️ Only {} events left — {picked} needs near-perfect results!",
                    standing.remaining_events
                ));
            }
        }
        RootingStatus::Eliminated => {
            let gap = standing.leader_count() - standing.count_for(picked);
            let leaders = leader_str(&standing.leaders);
            scenarios.push(format!(
                "❌ Mathematically eliminated — {leaders} leads by {gap} with only {} events left.",
                standing.remaining_events
            ));
        }
        RootingStatus::PropositionPending => {}
    }
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rustc_hash::FxHashMap;

    fn category(kind: CategoryKind) -> Category {
        Category {
            id: "cat".to_string(),
            display_name: "Category".to_string(),
            sport: "Sport".to_string(),
            gender: None,
            kind,
            event_count: 6,
            first_event_at: None,
            last_event_at: None,
        }
    }

    fn standing(counts: &[(&str, u32)], leaders: &[&str], remaining: u32) -> CategoryStanding {
        let gold_counts: FxHashMap<String, u32> =
            counts.iter().map(|(c, n)| (c.to_string(), *n)).collect();
        let completed = gold_counts.values().sum::<u32>();
        CategoryStanding {
            category_id: "cat".to_string(),
            gold_counts,
            leaders: leaders.iter().map(|l| l.to_string()).collect(),
            completed_events: completed,
            remaining_events: remaining,
            next_event: None,
            proposition_outcome: None,
        }
    }

    fn pick(value: &str) -> Prediction {
        Prediction {
            category_id: "cat".to_string(),
            value: value.to_string(),
        }
    }

    fn upcoming_events(n: usize) -> Vec<ScheduledEvent> {
        (0..n)
            .map(|i| ScheduledEvent {
                category_id: "cat".to_string(),
                sport: "Sport".to_string(),
                name: format!("Event {i}"),
                gender: crate::models::Gender::Men,
                first_round_at: Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
                gold_medal_at: Utc.with_ymd_and_hms(2026, 2, 10, 11, 0, 0).unwrap(),
                resolved: false,
            })
            .collect()
    }

    #[test]
    fn test_behind_names_the_gap() {
        let cat = category(CategoryKind::Standard);
        let s = standing(&[("Switzerland", 3), ("Norway", 1)], &["Switzerland"], 2);
        let lines =
            generate_scenarios(&s, &pick("Norway"), &cat, RootingStatus::BehindPossible, &[]);
        assert!(lines[0].contains("2 more golds"));
        assert!(lines[0].contains("Switzerland"));
        // remaining == gap: near-perfect warning fires.
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_leading_names_runner_up_and_magic_number() {
        let cat = category(CategoryKind::Standard);
        let s = standing(&[("Norway", 3), ("Austria", 1)], &["Norway"], 3);
        let lines = generate_scenarios(&s, &pick("Norway"), &cat, RootingStatus::Leading, &[]);
        // magic = 1 + 3 - 3 = 1 more gold to clinch.
        assert!(lines[0].contains("Leading by 2"));
        assert!(lines[0].contains("Austria"));
        assert!(lines[0].contains("Win 1 more gold"));
    }

    #[test]
    fn test_clinched() {
        let cat = category(CategoryKind::Standard);
        let s = standing(&[("Norway", 4), ("Austria", 1)], &["Norway"], 1);
        let lines = generate_scenarios(&s, &pick("Norway"), &cat, RootingStatus::Leading, &[]);
        assert!(lines[0].contains("Clinched"));
    }

    #[test]
    fn test_tied_names_co_leaders_in_standing_order() {
        let cat = category(CategoryKind::Standard);
        let s = standing(
            &[("Germany", 2), ("Austria", 2), ("Norway", 2)],
            &["Germany", "Austria", "Norway"],
            1,
        );
        let lines = generate_scenarios(&s, &pick("Austria"), &cat, RootingStatus::Tied, &[]);
        assert!(lines[0].contains("Germany, Norway"));
    }

    #[test]
    fn test_eliminated_names_leader_and_deficit() {
        let cat = category(CategoryKind::Standard);
        let s = standing(&[("Switzerland", 4), ("Norway", 1)], &["Switzerland"], 1);
        let lines = generate_scenarios(&s, &pick("Norway"), &cat, RootingStatus::Eliminated, &[]);
        assert!(lines[0].contains("eliminated"));
        assert!(lines[0].contains("Switzerland"));
        assert!(lines[0].contains("3"));
    }

    #[test]
    fn test_nothing_resolved_copy() {
        let cat = category(CategoryKind::Standard);
        let s = standing(&[], &[], 6);
        let lines =
            generate_scenarios(&s, &pick("Norway"), &cat, RootingStatus::BehindPossible, &[]);
        assert_eq!(lines, vec!["🎯 Rooting for Norway to win gold medals!".to_string()]);
    }

    #[test]
    fn test_yes_no_copy() {
        let cat = category(CategoryKind::PropositionYesNo);
        let s = standing(&[], &[], 1);
        let rooting =
            generate_scenarios(&s, &pick("Yes"), &cat, RootingStatus::PropositionPending, &[]);
        assert!(rooting[0].contains("to happen"));
        let against =
            generate_scenarios(&s, &pick("No"), &cat, RootingStatus::PropositionPending, &[]);
        assert!(against[0].contains("NOT"));
    }

    #[test]
    fn test_numeric_copy() {
        let cat = category(CategoryKind::PropositionNumeric);
        let s = standing(&[], &[], 1);
        let lines =
            generate_scenarios(&s, &pick("4"), &cat, RootingStatus::PropositionPending, &[]);
        assert!(lines[0].contains("exactly 4"));
    }

    #[test]
    fn test_overall_upcoming_capped_at_ten() {
        let cat = category(CategoryKind::AggregateOverall);
        let s = standing(&[("Norway", 5)], &["Norway"], 12);
        let upcoming = upcoming_events(14);
        let lines =
            generate_scenarios(&s, &pick("Norway"), &cat, RootingStatus::Leading, &upcoming);
        let next_up = lines.last().expect("upcoming line present");
        assert!(next_up.starts_with("📅 Next up:"));
        assert_eq!(next_up.matches("Event ").count(), 10);
    }
}
