//! Text rendering of the rooting guide.
//!
//! Sections by urgency, one block per prediction, pool leaderboard at the
//! bottom. Event times are localized here, at the display edge; the engine
//! only ever hands over UTC.

use chrono_tz::Tz;

use podium_rooting_core::models::{RootingInfo, RootingStatus, Urgency};
use podium_rooting_core::scoring::ParticipantScore;

const SECTIONS: [(Urgency, &str); 4] = [
    (Urgency::Today, "🔥 TODAY"),
    (Urgency::ThisWeek, "📅 THIS WEEK"),
    (Urgency::Later, "⏳ LATER"),
    (Urgency::None, "🏁 NOTHING LEFT TO RUN"),
];

fn status_tag(status: RootingStatus) -> &'static str {
    match status {
        RootingStatus::Leading => "leading",
        RootingStatus::Tied => "tied for lead",
        RootingStatus::BehindPossible => "still alive",
        RootingStatus::Eliminated => "eliminated",
        RootingStatus::PropositionPending => "pending",
    }
}

pub fn format_report(user_name: &str, infos: &[RootingInfo], scores: &[ParticipantScore], zone: Tz) -> String {
    let mut out = String::new();
    out.push_str(&format!("🏔 ROOTING GUIDE — {user_name}\n"));

    for (urgency, header) in SECTIONS {
        let section: Vec<&RootingInfo> = infos.iter().filter(|i| i.urgency == urgency).collect();
        if section.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{header}\n"));
        for info in section {
            out.push_str(&format!(
                "• {} — picked {} ({})\n",
                info.category.display_name,
                info.prediction.value,
                status_tag(info.status)
            ));
            for line in &info.scenarios {
                out.push_str(&format!("    {line}\n"));
            }
            if let Some(event) = &info.next_event {
                let local = event.gold_medal_at.with_timezone(&zone);
                out.push_str(&format!(
                    "    next: {} @ {}\n",
                    event.name,
                    local.format("%a %b %d %H:%M")
                ));
            }
        }
    }

    if !scores.is_empty() {
        out.push_str("\n🏅 POOL LEADERBOARD\n");
        for (rank, score) in scores.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} — {}/{} correct\n",
                rank + 1,
                score.user_name,
                score.correct,
                score.total_results
            ));
        }
    }

    out
}
