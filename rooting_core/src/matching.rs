//! Event name matching.
//!
//! Resolves loosely-formatted scraped result names ("Mens 1000 metres",
//! "Ladies' Slallom") to canonical schedule records. Stateless and callable
//! independently by scrape ingestion and by the rooting engine.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use strsim::jaro_winkler;
use tracing::warn;

use crate::models::{Category, CategoryKind, CompletedResult, Gender, ScheduledEvent};

/// Match confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchConfidence {
    None = 0,
    Low = 1,      // Fuzzy match only - risky
    Medium = 2,   // Token overlap or fuzzy keyword
    High = 3,     // Phrase containment
    Exact = 4,    // Normalized exact match
}

/// Result of scoring one candidate event against a raw name.
#[derive(Debug, Clone, Copy)]
pub struct MatchScore {
    pub confidence: MatchConfidence,
    pub score: f64,
}

impl MatchScore {
    fn none() -> Self {
        Self {
            confidence: MatchConfidence::None,
            score: 0.0,
        }
    }

    fn exact() -> Self {
        Self {
            confidence: MatchConfidence::Exact,
            score: 1.0,
        }
    }

    fn high(score: f64) -> Self {
        Self {
            confidence: MatchConfidence::High,
            score,
        }
    }

    fn medium(score: f64) -> Self {
        Self {
            confidence: MatchConfidence::Medium,
            score,
        }
    }

    pub fn is_match(&self) -> bool {
        self.confidence >= MatchConfidence::Medium
    }
}

/// Floor for the Jaro-Winkler fallback on collapsed keywords. High enough
/// that distinct disciplines ("sprint" vs "slalom") stay apart, low enough
/// that scrape-side misspellings ("slallom") still land.
const JW_THRESHOLD: f64 = 0.88;

/// Keywords shorter than this carry too little signal to fuzzy-match.
const MIN_KEYWORD_LEN: usize = 4;

fn gender_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(men'?s?|women'?s?|ladies'?|mixed)\s*").expect("valid regex"))
}

fn normal_hill_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bnh\b").expect("valid regex"))
}

fn large_hill_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\blh\b").expect("valid regex"))
}

/// Fold common Latin diacritics so "Biathlon féminin" and "feminin" compare
/// equal. Anything outside the table passes through untouched.
fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ñ' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

/// Gender qualifier at the head of an event name, if any.
pub fn extract_gender(name: &str) -> Option<Gender> {
    let low = name.trim().to_lowercase();
    if low.starts_with("women") || low.starts_with("ladies") {
        Some(Gender::Women)
    } else if low.starts_with("men") {
        Some(Gender::Men)
    } else if low.starts_with("mixed") {
        Some(Gender::Mixed)
    } else {
        None
    }
}

/// Normalize an event name for comparison: case-fold, fold diacritics,
/// drop the gender qualifier, expand scrape-side abbreviations, strip
/// punctuation, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let lower = fold_diacritics(&name.to_lowercase());
    let stripped = gender_prefix_re().replace(&lower, "");
    let units = stripped
        .replace("kilometres", "km")
        .replace("kilometre", "km")
        .replace("metres", "m")
        .replace("metre", "m");
    let hills = normal_hill_re().replace_all(&units, "normal hill");
    let hills = large_hill_re().replace_all(&hills, "large hill");
    hills
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized name with whitespace removed ("1000 m" -> "1000m").
fn collapse(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Letters-only discipline keyword ("10km sprint" -> "kmsprint").
fn keyword(normalized: &str) -> String {
    collapse(normalized)
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect()
}

fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Score one candidate event against a pre-normalized raw name.
fn score_candidate(
    raw_norm: &str,
    raw_gender: Option<Gender>,
    event: &ScheduledEvent,
) -> MatchScore {
    // Gender gate: a qualifier on the raw name must agree with the event.
    if let Some(g) = raw_gender {
        if g != event.gender {
            return MatchScore::none();
        }
    }

    let event_norm = normalize_name(&event.name);

    // Events like curling's "Men's" normalize to the empty string once the
    // qualifier is dropped; they match only on an explicit gender qualifier.
    if raw_norm.is_empty() || event_norm.is_empty() {
        if raw_norm.is_empty() && event_norm.is_empty() && raw_gender == Some(event.gender) {
            return MatchScore::exact();
        }
        return MatchScore::none();
    }

    if raw_norm == event_norm {
        return MatchScore::exact();
    }

    // Phrase containment either way ("sprint" vs "10km sprint").
    let raw_collapsed = collapse(raw_norm);
    let event_collapsed = collapse(&event_norm);
    let shorter = raw_collapsed.len().min(event_collapsed.len());
    if shorter >= MIN_KEYWORD_LEN
        && (raw_collapsed.contains(&event_collapsed) || event_collapsed.contains(&raw_collapsed))
    {
        return MatchScore::high(0.9);
    }

    // Token overlap: majority of raw tokens present, at least two of them.
    let raw_tokens = tokenize(raw_norm);
    let event_tokens = tokenize(&event_norm);
    let common = raw_tokens
        .iter()
        .filter(|t| event_tokens.contains(t))
        .count();
    if common >= 2 {
        let ratio = common as f64 / raw_tokens.len() as f64;
        if ratio >= 0.5 {
            return MatchScore::medium(ratio);
        }
    }

    // Fuzzy fallback on discipline keywords, very high bar.
    let raw_kw = keyword(raw_norm);
    let event_kw = keyword(&event_norm);
    if raw_kw.len() >= MIN_KEYWORD_LEN && event_kw.len() >= MIN_KEYWORD_LEN {
        let score = jaro_winkler(&raw_kw, &event_kw);
        if score >= JW_THRESHOLD {
            return MatchScore::medium(score);
        }
    }

    MatchScore::none()
}

fn cmp_scores(a: MatchScore, b: MatchScore) -> Ordering {
    a.confidence
        .cmp(&b.confidence)
        .then(a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
}

/// Best-matching schedule entry for one scraped result.
#[derive(Debug, Clone)]
pub struct EventMatch {
    pub event_index: usize,
    pub confidence: MatchConfidence,
    pub score: f64,
}

/// Resolve a raw result to the best candidate event at or above Medium
/// confidence, or None. Score ties go to the event whose gold-medal time
/// sits closest to the scrape timestamp.
pub fn match_result_to_event(
    result: &CompletedResult,
    events: &[ScheduledEvent],
) -> Option<EventMatch> {
    let raw_gender = extract_gender(&result.event_name);
    let raw_norm = normalize_name(&result.event_name);

    let mut best: Option<(usize, MatchScore)> = None;
    for (idx, event) in events.iter().enumerate() {
        let score = score_candidate(&raw_norm, raw_gender, event);
        if !score.is_match() {
            continue;
        }
        best = Some(match best {
            None => (idx, score),
            Some((best_idx, best_score)) => match cmp_scores(score, best_score) {
                Ordering::Greater => (idx, score),
                Ordering::Less => (best_idx, best_score),
                Ordering::Equal => {
                    let d_new = (event.gold_medal_at - result.completed_at)
                        .num_seconds()
                        .abs();
                    let d_best = (events[best_idx].gold_medal_at - result.completed_at)
                        .num_seconds()
                        .abs();
                    if d_new < d_best {
                        (idx, score)
                    } else {
                        (best_idx, best_score)
                    }
                }
            },
        });
    }

    best.map(|(event_index, s)| EventMatch {
        event_index,
        confidence: s.confidence,
        score: s.score,
    })
}

/// Counters for one matching pass, reported to observability rather than
/// raised to the caller: misses and duplicates are scrape-quality issues,
/// not logic faults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchStats {
    pub results_seen: u64,
    pub matched: u64,
    pub misses: u64,
    pub duplicates: u64,
}

/// A scraped result pinned to its canonical event.
#[derive(Debug, Clone)]
pub struct MatchedResult {
    pub category_id: String,
    pub event_index: usize,
    pub event_name: String,
    pub winner: String,
    pub completed_at: DateTime<Utc>,
}

/// Fold a whole scrape against the schedule. Results are processed in
/// scrape-timestamp order so duplicate handling and downstream leader
/// ordering stay deterministic; the first result to claim an event wins.
pub fn match_results(
    results: &[CompletedResult],
    events: &[ScheduledEvent],
) -> (Vec<MatchedResult>, MatchStats) {
    let mut stats = MatchStats::default();
    let mut claimed: FxHashSet<usize> = FxHashSet::default();
    let mut matched = Vec::with_capacity(results.len());

    let mut ordered: Vec<&CompletedResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.completed_at);

    for result in ordered {
        stats.results_seen += 1;
        let Some(hit) = match_result_to_event(result, events) else {
            stats.misses += 1;
            warn!(
                "no canonical event matched scraped result {:?}; dropping",
                result.event_name
            );
            continue;
        };
        if !claimed.insert(hit.event_index) {
            stats.duplicates += 1;
            warn!(
                "duplicate result {:?} for already-matched event {:?}; dropping",
                result.event_name, events[hit.event_index].name
            );
            continue;
        }
        let event = &events[hit.event_index];
        matched.push(MatchedResult {
            category_id: event.category_id.clone(),
            event_index: hit.event_index,
            event_name: event.name.clone(),
            winner: result.winner.clone(),
            completed_at: result.completed_at,
        });
        stats.matched += 1;
    }

    (matched, stats)
}

/// Match a scraped record to a proposition category by question text.
/// Propositions behave as a single answer slot, so the first confident
/// name match (by scrape timestamp) resolves the category.
pub fn resolve_proposition<'a>(
    category: &Category,
    results: &'a [CompletedResult],
) -> Option<&'a CompletedResult> {
    debug_assert!(matches!(
        category.kind,
        CategoryKind::PropositionYesNo | CategoryKind::PropositionNumeric
    ));

    let cat_norm = normalize_name(&category.display_name);
    let cat_collapsed = collapse(&cat_norm);

    let mut hits: Vec<&CompletedResult> = results
        .iter()
        .filter(|r| {
            if r.event_name == category.id {
                return true;
            }
            let raw_norm = normalize_name(&r.event_name);
            if raw_norm.is_empty() || cat_norm.is_empty() {
                return false;
            }
            let raw_collapsed = collapse(&raw_norm);
            let shorter = raw_collapsed.len().min(cat_collapsed.len());
            raw_norm == cat_norm
                || (shorter >= MIN_KEYWORD_LEN
                    && (raw_collapsed.contains(&cat_collapsed)
                        || cat_collapsed.contains(&raw_collapsed)))
        })
        .collect();
    hits.sort_by_key(|r| r.completed_at);
    hits.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
    }

    fn event(category_id: &str, name: &str, gender: Gender, day: u32) -> ScheduledEvent {
        ScheduledEvent {
            category_id: category_id.to_string(),
            sport: "Test".to_string(),
            name: name.to_string(),
            gender,
            first_round_at: ts(day, 9),
            gold_medal_at: ts(day, 11),
            resolved: false,
        }
    }

    fn result(name: &str, day: u32) -> CompletedResult {
        CompletedResult {
            event_name: name.to_string(),
            winner: "Norway".to_string(),
            completed_at: ts(day, 12),
        }
    }

    fn matches(raw: &str, canonical: &str, gender: Gender) -> bool {
        let events = vec![event("c", canonical, gender, 10)];
        match_result_to_event(&result(raw, 10), &events).is_some()
    }

    // ========== TRUE POSITIVES (should match) ==========

    #[test]
    fn test_exact_match() {
        assert!(matches("Men's Downhill", "Men's Downhill", Gender::Men));
    }

    #[test]
    fn test_case_and_punctuation() {
        assert!(matches("MENS DOWNHILL", "Men's Downhill", Gender::Men));
        assert!(matches("Men's Super-G", "Men's Super G", Gender::Men));
    }

    #[test]
    fn test_unit_abbreviations() {
        assert!(matches("Men's 1000 metres", "Men's 1000m", Gender::Men));
        assert!(matches(
            "Women's 15 kilometres Individual",
            "Women's 15km Individual",
            Gender::Women
        ));
    }

    #[test]
    fn test_hill_abbreviations() {
        assert!(matches(
            "Men's NH Individual",
            "Men's Normal Hill Individual",
            Gender::Men
        ));
        assert!(matches(
            "Men's LH Individual",
            "Men's Large Hill Individual",
            Gender::Men
        ));
    }

    #[test]
    fn test_substring_match() {
        assert!(matches("Men's 10km Sprint", "Men's Sprint", Gender::Men));
        assert!(matches("Men's Sprint", "Men's 10km Sprint", Gender::Men));
    }

    #[test]
    fn test_ladies_qualifier() {
        assert!(matches("Ladies' Slalom", "Women's Slalom", Gender::Women));
    }

    #[test]
    fn test_fuzzy_misspelling() {
        assert!(matches("Men's Slallom", "Men's Slalom", Gender::Men));
    }

    #[test]
    fn test_diacritics_folded() {
        assert!(matches("Men's Géant Slalom", "Men's Geant Slalom", Gender::Men));
    }

    #[test]
    fn test_bare_gender_event_names() {
        // Curling-style schedule entries are named by the qualifier alone.
        assert!(matches("Men's", "Men's", Gender::Men));
    }

    // ========== TRUE NEGATIVES (should NOT match) ==========

    #[test]
    fn test_gender_mismatch() {
        assert!(!matches("Women's Downhill", "Men's Downhill", Gender::Men));
        assert!(!matches("Men's", "Women's", Gender::Women));
    }

    #[test]
    fn test_different_disciplines() {
        assert!(!matches("Men's Sprint", "Men's Slalom", Gender::Men));
        assert!(!matches("Men's Downhill", "Men's Big Air", Gender::Men));
    }

    #[test]
    fn test_empty_raw_name() {
        let events = vec![event("c", "Men's Downhill", Gender::Men, 10)];
        assert!(match_result_to_event(&result("", 10), &events).is_none());
    }

    // ========== SELECTION & TIE-BREAK ==========

    #[test]
    fn test_prefers_higher_confidence() {
        let events = vec![
            event("a", "Men's Team Sprint", Gender::Men, 12),
            event("b", "Men's Sprint", Gender::Men, 14),
        ];
        let hit = match_result_to_event(&result("Men's Sprint", 14), &events).unwrap();
        assert_eq!(hit.event_index, 1);
        assert_eq!(hit.confidence, MatchConfidence::Exact);
    }

    #[test]
    fn test_tie_broken_by_date_proximity() {
        let events = vec![
            event("a", "Men's", Gender::Men, 8),
            event("b", "Men's", Gender::Men, 20),
        ];
        let hit = match_result_to_event(&result("Men's", 19), &events).unwrap();
        assert_eq!(hit.event_index, 1);
    }

    // ========== BATCH PASS ==========

    #[test]
    fn test_batch_counts_misses_and_duplicates() {
        let events = vec![event("c", "Men's Downhill", Gender::Men, 10)];
        let results = vec![
            result("Men's Downhill", 10),
            result("Mens Downhill", 11),      // duplicate of a claimed event
            result("Underwater Basket", 12),  // out-of-scope scrape noise
        ];
        let (matched, stats) = match_results(&results, &events);
        assert_eq!(matched.len(), 1);
        assert_eq!(stats.results_seen, 3);
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_batch_first_timestamp_claims_event() {
        let events = vec![event("c", "Men's Downhill", Gender::Men, 10)];
        let mut results = vec![result("Mens Downhill", 11), result("Men's Downhill", 10)];
        results[0].winner = "Austria".to_string();
        let (matched, _) = match_results(&results, &events);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].winner, "Norway");
    }

    // ========== PROPOSITIONS ==========

    #[test]
    fn test_resolve_proposition_by_name() {
        let category = Category {
            id: "prop_triple_gold".to_string(),
            display_name: "Any skier wins three golds".to_string(),
            sport: "Special".to_string(),
            gender: None,
            kind: CategoryKind::PropositionYesNo,
            event_count: 1,
            first_event_at: None,
            last_event_at: None,
        };
        let results = vec![
            result("Men's Downhill", 10),
            CompletedResult {
                event_name: "Any skier wins three golds".to_string(),
                winner: "Yes".to_string(),
                completed_at: ts(20, 12),
            },
        ];
        let hit = resolve_proposition(&category, &results).unwrap();
        assert_eq!(hit.winner, "Yes");
    }

    #[test]
    fn test_resolve_proposition_unresolved() {
        let category = Category {
            id: "prop_triple_gold".to_string(),
            display_name: "Any skier wins three golds".to_string(),
            sport: "Special".to_string(),
            gender: None,
            kind: CategoryKind::PropositionYesNo,
            event_count: 1,
            first_event_at: None,
            last_event_at: None,
        };
        assert!(resolve_proposition(&category, &[result("Men's Downhill", 10)]).is_none());
    }
}
