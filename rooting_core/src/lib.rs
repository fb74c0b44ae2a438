//! Podium Core - rooting eligibility engine for the prediction game.
//!
//! This crate provides:
//! - Fuzzy matching of scraped result names to the canonical event schedule
//! - Per-category gold-medal standings derived fresh from raw snapshots
//! - Mathematical elimination analysis for a user's picks
//! - Human-readable rooting scenarios and urgency classification
//! - Catalog construction and pool scoring helpers
//!
//! Everything is a pure function over fully-materialized inputs: no I/O,
//! no caching, no wall-clock reads. Scraping, storage and presentation are
//! external collaborators.

pub mod catalog;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod matching;
pub mod models;
pub mod scenarios;
pub mod scoring;
pub mod standings;
pub mod urgency;

pub use engine::rooting_info_for_predictions;
pub use error::RootingError;
pub use models::{
    Category, CategoryKind, CategoryStanding, CompletedResult, Gender, Prediction, RootingInfo,
    RootingStatus, ScheduledEvent, Urgency,
};
