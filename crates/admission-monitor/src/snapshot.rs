//! Snapshot data model shared by the scraper, the session store and the analysis passes.
//!
//! The JSON shape matches the session files the monitor has always written: identity and
//! metadata fields sit flat on each direction object, a successful direction carries
//! `applicants` and a failed one carries `error`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Affirmative consent token as published on the results page.
pub const CONSENT_GIVEN: &str = "Есть";
/// Negative consent token as published on the results page.
pub const CONSENT_WITHHELD: &str = "Нет";

/// One ranked submission within a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub position: u32,
    pub unique_code: String,
    pub consent: String,
    pub sd_score: String,
    pub lang_score: String,
    pub achievements: String,
    pub additional: String,
    pub priority: u32,
    pub total_score: String,
}

/// Fields identifying a direction, copied from the registry entry it was scraped for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionIdentity {
    pub direction_id: String,
    pub direction_code: String,
    pub direction_name: String,
    pub url: String,
}

/// Metadata read from the direction page header. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_applications: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_places: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedDirection {
    #[serde(flatten)]
    pub identity: DirectionIdentity,
    #[serde(flatten)]
    pub metadata: DirectionMetadata,
    pub applicants: Vec<Applicant>,
    pub scraped_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDirection {
    #[serde(flatten)]
    pub identity: DirectionIdentity,
    pub error: String,
    pub scraped_at: NaiveDateTime,
}

/// Outcome of one extraction pass over a single direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectionResult {
    Scraped(ScrapedDirection),
    Failed(FailedDirection),
}

impl DirectionResult {
    pub fn identity(&self) -> &DirectionIdentity {
        match self {
            DirectionResult::Scraped(direction) => &direction.identity,
            DirectionResult::Failed(direction) => &direction.identity,
        }
    }

    pub fn scraped_at(&self) -> NaiveDateTime {
        match self {
            DirectionResult::Scraped(direction) => direction.scraped_at,
            DirectionResult::Failed(direction) => direction.scraped_at,
        }
    }

    pub fn as_scraped(&self) -> Option<&ScrapedDirection> {
        match self {
            DirectionResult::Scraped(direction) => Some(direction),
            DirectionResult::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DirectionResult::Scraped(_))
    }
}

/// One full extraction run across every registered direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub total_directions: usize,
    pub directions: BTreeMap<String, DirectionResult>,
}

impl Snapshot {
    /// Successful directions in id order.
    pub fn scraped(&self) -> impl Iterator<Item = (&String, &ScrapedDirection)> {
        self.directions
            .iter()
            .filter_map(|(id, result)| result.as_scraped().map(|direction| (id, direction)))
    }
}
