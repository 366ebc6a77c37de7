use crate::snapshot::{Applicant, Snapshot};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantMatch {
    pub direction_id: String,
    pub direction_name: String,
    pub direction_code: String,
    pub applicant: Applicant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantSearch {
    pub applicant_code: String,
    pub found_in: Vec<ApplicantMatch>,
}

impl ApplicantSearch {
    pub fn is_empty(&self) -> bool {
        self.found_in.is_empty()
    }
}

/// Lists every successful direction whose table contains `code`.
pub fn find_applicant(snapshot: &Snapshot, code: &str) -> ApplicantSearch {
    let found_in = snapshot
        .scraped()
        .flat_map(|(id, direction)| {
            direction
                .applicants
                .iter()
                .filter(|applicant| applicant.unique_code == code)
                .map(move |applicant| ApplicantMatch {
                    direction_id: id.clone(),
                    direction_name: direction.identity.direction_name.clone(),
                    direction_code: direction.identity.direction_code.clone(),
                    applicant: applicant.clone(),
                })
        })
        .collect();

    ApplicantSearch {
        applicant_code: code.to_string(),
        found_in,
    }
}
