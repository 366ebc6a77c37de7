use crate::snapshot::Snapshot;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ApplicantRow<'a> {
    direction_id: &'a str,
    direction_code: &'a str,
    direction_name: &'a str,
    position: u32,
    unique_code: &'a str,
    consent: &'a str,
    sd_score: &'a str,
    lang_score: &'a str,
    achievements: &'a str,
    additional: &'a str,
    priority: u32,
    total_score: &'a str,
}

/// Writes one CSV row per applicant of every successful direction. Returns the number of
/// applicant rows written.
pub fn export_csv<W: Write>(snapshot: &Snapshot, writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for (id, direction) in snapshot.scraped() {
        for applicant in &direction.applicants {
            csv_writer.serialize(ApplicantRow {
                direction_id: id,
                direction_code: &direction.identity.direction_code,
                direction_name: &direction.identity.direction_name,
                position: applicant.position,
                unique_code: &applicant.unique_code,
                consent: &applicant.consent,
                sd_score: &applicant.sd_score,
                lang_score: &applicant.lang_score,
                achievements: &applicant.achievements,
                additional: &applicant.additional,
                priority: applicant.priority,
                total_score: &applicant.total_score,
            })?;
            rows += 1;
        }
    }

    if rows == 0 {
        csv_writer.write_record(HEADER)?;
    }
    csv_writer.flush()?;
    Ok(rows)
}

pub fn export_csv_to_path<P: AsRef<Path>>(
    snapshot: &Snapshot,
    path: P,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    export_csv(snapshot, std::io::BufWriter::new(file))
}

// `serialize` only emits headers alongside the first record.
const HEADER: [&str; 12] = [
    "direction_id",
    "direction_code",
    "direction_name",
    "position",
    "unique_code",
    "consent",
    "sd_score",
    "lang_score",
    "achievements",
    "additional",
    "priority",
    "total_score",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{
        Applicant, DirectionIdentity, DirectionMetadata, DirectionResult, FailedDirection,
        ScrapedDirection,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::BTreeMap;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 20)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time")
    }

    fn identity(id: &str) -> DirectionIdentity {
        DirectionIdentity {
            direction_id: id.to_string(),
            direction_code: "09.04.01".to_string(),
            direction_name: "Информатика, магистратура".to_string(),
            url: format!("https://example.test/{id}"),
        }
    }

    #[test]
    fn writes_header_and_one_row_per_applicant() {
        let mut directions = BTreeMap::new();
        directions.insert(
            "d1".to_string(),
            DirectionResult::Scraped(ScrapedDirection {
                identity: identity("d1"),
                metadata: DirectionMetadata::default(),
                applicants: vec![Applicant {
                    position: 1,
                    unique_code: "111-111".to_string(),
                    consent: "Есть".to_string(),
                    sd_score: "---".to_string(),
                    lang_score: "80".to_string(),
                    achievements: "5".to_string(),
                    additional: String::new(),
                    priority: 1,
                    total_score: "85".to_string(),
                }],
                scraped_at: at(),
            }),
        );
        directions.insert(
            "d2".to_string(),
            DirectionResult::Failed(FailedDirection {
                identity: identity("d2"),
                error: "timed out".to_string(),
                scraped_at: at(),
            }),
        );
        let snapshot = Snapshot {
            timestamp: at(),
            total_directions: 2,
            directions,
        };

        let mut buffer = Vec::new();
        let rows = export_csv(&snapshot, &mut buffer).expect("export succeeds");
        let output = String::from_utf8(buffer).expect("utf-8 output");

        assert_eq!(rows, 1);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(
            lines[1],
            "d1,09.04.01,\"Информатика, магистратура\",1,111-111,Есть,---,80,5,,1,85"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn empty_snapshot_still_writes_header() {
        let snapshot = Snapshot {
            timestamp: at(),
            total_directions: 0,
            directions: BTreeMap::new(),
        };

        let mut buffer = Vec::new();
        assert_eq!(export_csv(&snapshot, &mut buffer).expect("export"), 0);
        assert_eq!(
            String::from_utf8(buffer).expect("utf-8").trim_end(),
            HEADER.join(",")
        );
    }
}
