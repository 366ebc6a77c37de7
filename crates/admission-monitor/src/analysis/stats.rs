use crate::snapshot::{ScrapedDirection, Snapshot, CONSENT_GIVEN, CONSENT_WITHHELD};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionStats {
    pub name: String,
    pub code: String,
    pub total_applications: usize,
    pub available_places: u32,
    pub with_consent: usize,
    pub without_consent: usize,
}

impl DirectionStats {
    fn of(direction: &ScrapedDirection) -> Self {
        let count_consent = |token: &str| {
            direction
                .applicants
                .iter()
                .filter(|applicant| applicant.consent == token)
                .count()
        };

        Self {
            name: direction.identity.direction_name.clone(),
            code: direction.identity.direction_code.clone(),
            total_applications: direction.applicants.len(),
            available_places: direction.metadata.available_places.unwrap_or(0),
            with_consent: count_consent(CONSENT_GIVEN),
            without_consent: count_consent(CONSENT_WITHHELD),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsReport {
    pub timestamp: NaiveDateTime,
    pub total_directions: usize,
    pub total_applicants: usize,
    pub unique_applicants_count: usize,
    pub unique_applicants: Vec<String>,
    pub directions_stats: BTreeMap<String, DirectionStats>,
}

/// Aggregates applicant counts over the successful directions of a snapshot. A person
/// listed in several directions counts once towards the unique total.
pub fn snapshot_statistics(snapshot: &Snapshot) -> StatisticsReport {
    let mut total_applicants = 0;
    let mut unique = BTreeSet::new();
    let mut directions_stats = BTreeMap::new();

    for (id, direction) in snapshot.scraped() {
        total_applicants += direction.applicants.len();
        unique.extend(
            direction
                .applicants
                .iter()
                .map(|applicant| applicant.unique_code.as_str()),
        );
        directions_stats.insert(id.clone(), DirectionStats::of(direction));
    }

    StatisticsReport {
        timestamp: snapshot.timestamp,
        total_directions: snapshot.total_directions,
        total_applicants,
        unique_applicants_count: unique.len(),
        unique_applicants: unique.into_iter().map(str::to_string).collect(),
        directions_stats,
    }
}
