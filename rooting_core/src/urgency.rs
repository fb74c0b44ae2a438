//! Urgency classification for the next unresolved event.
//!
//! Pure function of two already-localized timestamps. Zone conversion is
//! the caller's job; nothing in here reads the wall clock, which keeps the
//! classifier deterministic under test.

use chrono::{Duration, NaiveDateTime};

use crate::models::Urgency;

/// Bucket the next event relative to `now`. Both timestamps must already
/// be expressed in the evaluation's reference time zone.
pub fn calculate_urgency(next_event: Option<NaiveDateTime>, now: NaiveDateTime) -> Urgency {
    let Some(event_at) = next_event else {
        return Urgency::None;
    };

    if event_at.date() == now.date() {
        return Urgency::Today;
    }

    if event_at <= now + Duration::days(7) {
        return Urgency::ThisWeek;
    }

    Urgency::Later
}
