//! Input snapshot for one report run.
//!
//! A snapshot is everything the engine consumes, fully materialized: the
//! event schedule, scraped results, the user's picks and (optionally) the
//! pool for the leaderboard. Loaded from JSON, or built from the simulated
//! mid-Games fixture for UX testing when no file is configured.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

use podium_rooting_core::catalog::{category_id_for, PropositionDef};
use podium_rooting_core::models::{
    CategoryKind, CompletedResult, Gender, Prediction, ScheduledEvent,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEntry {
    pub user_name: String,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Whose picks the rooting guide is for.
    pub user_name: String,
    pub events: Vec<ScheduledEvent>,
    #[serde(default)]
    pub propositions: Vec<PropositionDef>,
    pub results: Vec<CompletedResult>,
    pub predictions: Vec<Prediction>,
    /// Pool members for the leaderboard section.
    #[serde(default)]
    pub pool: Vec<PoolEntry>,
    /// Admin-entered category results (category id -> winning value).
    #[serde(default)]
    pub official_results: FxHashMap<String, String>,
}

pub fn load(path: &str) -> Result<Snapshot> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading snapshot {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {path}"))
}

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, hour, minute, 0)
        .single()
        .expect("fixture timestamp")
}

fn event(
    sport: &str,
    name: &str,
    gender: Gender,
    first_round_at: DateTime<Utc>,
    gold_medal_at: DateTime<Utc>,
) -> ScheduledEvent {
    ScheduledEvent {
        category_id: category_id_for(sport, gender),
        sport: sport.to_string(),
        name: name.to_string(),
        gender,
        first_round_at,
        gold_medal_at,
        resolved: false,
    }
}

fn result(event_name: &str, winner: &str, completed_at: DateTime<Utc>) -> CompletedResult {
    CompletedResult {
        event_name: event_name.to_string(),
        winner: winner.to_string(),
        completed_at,
    }
}

fn pick(category_id: &str, value: &str) -> Prediction {
    Prediction {
        category_id: category_id.to_string(),
        value: value.to_string(),
    }
}

/// Reference instant for the simulated snapshot: mid-Games, with one event
/// still to run on the same calendar day.
pub fn simulated_now() -> DateTime<Utc> {
    at(16, 10, 0)
}

/// Deterministic mid-Games snapshot: a schedule subset across six sports,
/// scraped results in the messy shapes the real feed produces (unit words
/// spelled out, hill abbreviations, a bare "Men's", junk and a duplicate),
/// Alice's picks, and a four-member pool.
pub fn simulated() -> Snapshot {
    let events = vec![
        // Alpine Skiing - men's speed events first week, technical second
        event("Alpine Skiing", "Men's Downhill", Gender::Men, at(8, 9, 30), at(8, 10, 0)),
        event("Alpine Skiing", "Men's Super-G", Gender::Men, at(12, 10, 0), at(12, 10, 0)),
        event("Alpine Skiing", "Men's Giant Slalom", Gender::Men, at(17, 9, 0), at(17, 12, 30)),
        event("Alpine Skiing", "Men's Slalom", Gender::Men, at(19, 9, 0), at(19, 12, 30)),
        // Biathlon
        event("Biathlon", "Men's 10km Sprint", Gender::Men, at(10, 13, 30), at(10, 13, 30)),
        event("Biathlon", "Men's 12.5km Pursuit", Gender::Men, at(13, 13, 30), at(13, 13, 30)),
        event("Biathlon", "Men's 15km Mass Start", Gender::Men, at(18, 13, 30), at(18, 13, 30)),
        event("Biathlon", "Men's 4x7.5km Relay", Gender::Men, at(21, 13, 30), at(21, 13, 30)),
        // Luge
        event("Luge", "Men's Singles", Gender::Men, at(7, 17, 0), at(8, 19, 30)),
        event("Luge", "Men's Doubles", Gender::Men, at(12, 17, 30), at(12, 19, 30)),
        // Skeleton - single men's tournament, named by qualifier alone
        event("Skeleton", "Men's", Gender::Men, at(12, 8, 30), at(13, 10, 30)),
        // Ski Jumping
        event(
            "Ski Jumping",
            "Men's Normal Hill Individual",
            Gender::Men,
            at(9, 17, 0),
            at(9, 18, 0),
        ),
        event(
            "Ski Jumping",
            "Men's Large Hill Individual",
            Gender::Men,
            at(14, 17, 0),
            at(14, 18, 0),
        ),
        // Speed Skating
        event("Speed Skating", "Women's 1000m", Gender::Women, at(13, 15, 0), at(13, 15, 0)),
        event("Speed Skating", "Women's 1500m", Gender::Women, at(16, 15, 0), at(16, 15, 0)),
        event("Speed Skating", "Women's 3000m", Gender::Women, at(20, 15, 0), at(20, 15, 0)),
        // Curling - round robin spans the Games, named by qualifier alone
        event("Curling", "Men's", Gender::Men, at(10, 8, 0), at(21, 13, 30)),
    ];

    let results = vec![
        result("Men's Downhill", "Switzerland", at(8, 11, 30)),
        result("Men's Downhill", "Switzerland", at(8, 12, 0)), // feed re-sent the page
        result("Mens Super G", "Switzerland", at(12, 11, 30)),
        result("Men's 10 kilometres Sprint", "Norway", at(10, 15, 0)),
        result("Men's 12.5 kilometres Pursuit", "Norway", at(13, 15, 0)),
        result("Men's Singles", "Germany", at(8, 21, 0)),
        result("Men's Doubles", "Germany", at(12, 21, 0)),
        result("Men's", "Germany", at(13, 12, 30)), // skeleton, by date proximity
        result("Men's NH Individual", "Norway", at(9, 19, 30)),
        result("Men's LH Individual", "Norway", at(14, 19, 30)),
        result("Ladies' 1000m", "Netherlands", at(13, 16, 30)),
        result("Closing Ceremony Preview", "", at(15, 9, 0)), // out-of-scope scrape noise
    ];

    let propositions = vec![
        PropositionDef {
            id: "prop_italy_ten_golds".to_string(),
            display_name: "Italy wins ten golds".to_string(),
            kind: CategoryKind::PropositionYesNo,
        },
        PropositionDef {
            id: "prop_norway_total".to_string(),
            display_name: "Total golds for Norway".to_string(),
            kind: CategoryKind::PropositionNumeric,
        },
    ];

    let predictions = vec![
        pick("alpine_skiing_men", "Norway"),
        pick("biathlon_men", "Norway"),
        pick("luge_men", "Germany"),
        pick("skeleton_men", "Germany"),
        pick("ski_jumping_men", "Austria"),
        pick("speed_skating_women", "Netherlands"),
        pick("curling_men", "Sweden"),
        pick("prop_italy_ten_golds", "Yes"),
        pick("prop_norway_total", "12"),
        pick("overall", "Norway"),
    ];

    // Admin-entered results for the three finished categories; the pool
    // accuracy gradient keeps the leaderboard order stable.
    let official_results: FxHashMap<String, String> = [
        ("luge_men", "Germany"),
        ("skeleton_men", "Germany"),
        ("ski_jumping_men", "Norway"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let pool = vec![
        PoolEntry {
            user_name: "Alice".to_string(),
            predictions: vec![
                pick("luge_men", "Germany"),
                pick("skeleton_men", "Germany"),
                pick("ski_jumping_men", "Norway"),
            ],
        },
        PoolEntry {
            user_name: "Bob".to_string(),
            predictions: vec![
                pick("luge_men", "Germany"),
                pick("skeleton_men", "Austria"),
                pick("ski_jumping_men", "Norway"),
            ],
        },
        PoolEntry {
            user_name: "Carol".to_string(),
            predictions: vec![
                pick("luge_men", "Austria"),
                pick("skeleton_men", "Germany"),
                pick("ski_jumping_men", "Germany"),
            ],
        },
        PoolEntry {
            user_name: "Dave".to_string(),
            predictions: vec![
                pick("luge_men", "Italy"),
                pick("skeleton_men", "Canada"),
                pick("ski_jumping_men", "Japan"),
            ],
        },
    ];

    Snapshot {
        user_name: "Alice".to_string(),
        events,
        propositions,
        results,
        predictions,
        pool,
        official_results,
    }
}
