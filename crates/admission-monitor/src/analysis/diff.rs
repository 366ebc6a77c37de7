use crate::snapshot::{ScrapedDirection, Snapshot};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionDiff {
    pub direction_name: String,
    pub total_before: usize,
    pub total_after: usize,
    pub new_applicants: BTreeSet<String>,
    pub removed_applicants: BTreeSet<String>,
    /// Difference in applicant rows, not in distinct codes.
    pub change: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub timestamp1: String,
    pub timestamp2: String,
    pub directions: BTreeMap<String, DirectionDiff>,
}

/// Compares every direction scraped successfully in both snapshots. Directions missing
/// from either side, or failed on either side, are left out of the report.
pub fn diff_snapshots(
    older: &Snapshot,
    newer: &Snapshot,
    older_label: impl Into<String>,
    newer_label: impl Into<String>,
) -> DiffReport {
    let directions = older
        .scraped()
        .filter_map(|(id, before)| {
            let after = newer.directions.get(id)?.as_scraped()?;
            Some((id.clone(), diff_direction(before, after)))
        })
        .collect();

    DiffReport {
        timestamp1: older_label.into(),
        timestamp2: newer_label.into(),
        directions,
    }
}

fn diff_direction(before: &ScrapedDirection, after: &ScrapedDirection) -> DirectionDiff {
    let codes_before = unique_codes(before);
    let codes_after = unique_codes(after);

    DirectionDiff {
        direction_name: before.identity.direction_name.clone(),
        total_before: before.applicants.len(),
        total_after: after.applicants.len(),
        new_applicants: owned(codes_after.difference(&codes_before).copied()),
        removed_applicants: owned(codes_before.difference(&codes_after).copied()),
        change: after.applicants.len() as i64 - before.applicants.len() as i64,
    }
}

fn unique_codes(direction: &ScrapedDirection) -> BTreeSet<&str> {
    direction
        .applicants
        .iter()
        .map(|applicant| applicant.unique_code.as_str())
        .collect()
}

fn owned<'a>(codes: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    codes.map(|code| code.to_string()).collect()
}
