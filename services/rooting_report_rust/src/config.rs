use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Optional JSON snapshot path; the simulated fixture is used when unset.
    pub snapshot_path: Option<String>,
    /// IANA reference zone for urgency bucketing and event time display.
    pub report_timezone: Tz,
    /// Reference-time override for UX testing (RFC 3339); defaults to now.
    pub reference_time: Option<DateTime<Utc>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let snapshot_path = env::var("SNAPSHOT_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let timezone_str =
            env::var("REPORT_TIMEZONE").unwrap_or_else(|_| "Europe/Rome".to_string());
        let report_timezone = Tz::from_str(&timezone_str).map_err(|_| {
            anyhow!(
                "Invalid REPORT_TIMEZONE: {} (expected IANA tz like Europe/Rome)",
                timezone_str
            )
        })?;

        let reference_time = parse_rfc3339_env("SIMULATE_DATE")?;

        Ok(Self {
            snapshot_path,
            report_timezone,
            reference_time,
        })
    }
}

fn parse_rfc3339_env(key: &str) -> Result<Option<DateTime<Utc>>> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw.trim())
                .with_context(|| format!("Invalid {key}: {raw} (expected RFC 3339)"))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
    }
}
