use admission_monitor::analysis::diff_snapshots;
use admission_monitor::export::export_csv_to_path;
use admission_monitor::snapshot::{
    Applicant, DirectionIdentity, DirectionMetadata, DirectionResult, FailedDirection,
    ScrapedDirection, Snapshot,
};
use admission_monitor::store::{session_id, SessionStore};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 25)
        .expect("valid date")
        .and_hms_micro_opt(hour, minute, 5, 42)
        .expect("valid time")
}

fn identity(id: &str) -> DirectionIdentity {
    DirectionIdentity {
        direction_id: id.to_string(),
        direction_code: "09.04.04".to_string(),
        direction_name: "Программная инженерия".to_string(),
        url: format!("https://example.test/{id}"),
    }
}

fn snapshot(hour: u32, codes: &[&str]) -> Snapshot {
    let applicants = codes
        .iter()
        .enumerate()
        .map(|(index, code)| Applicant {
            position: index as u32 + 1,
            unique_code: code.to_string(),
            consent: "Есть".to_string(),
            sd_score: "---".to_string(),
            lang_score: "64".to_string(),
            achievements: "2".to_string(),
            additional: String::new(),
            priority: 1,
            total_score: "66".to_string(),
        })
        .collect();

    let mut directions = BTreeMap::new();
    directions.insert(
        "d1".to_string(),
        DirectionResult::Scraped(ScrapedDirection {
            identity: identity("d1"),
            metadata: DirectionMetadata {
                name: Some("09.04.04 Программная инженерия".to_string()),
                total_applications: Some(codes.len() as u32),
                available_places: Some(12),
                form: Some("Очная".to_string()),
                funding_type: Some("Бюджет".to_string()),
            },
            applicants,
            scraped_at: at(hour, 1),
        }),
    );
    directions.insert(
        "d2".to_string(),
        DirectionResult::Failed(FailedDirection {
            identity: identity("d2"),
            error: "HTTP status client error (404 Not Found)".to_string(),
            scraped_at: at(hour, 2),
        }),
    );

    Snapshot {
        timestamp: at(hour, 0),
        total_directions: 2,
        directions,
    }
}

#[test]
fn saved_sessions_round_trip_and_list_newest_first() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SessionStore::new(dir.path());

    let older = snapshot(9, &["a", "b"]);
    let newer = snapshot(18, &["b", "c", "d"]);
    let older_path = store.save(&older).expect("save older");
    store.save(&newer).expect("save newer");

    assert!(older_path.ends_with("sessions/session_2025-07-25_09-00-05.json"));

    let sessions = store.list().expect("list sessions");
    let ids: Vec<_> = sessions.iter().map(|session| session.session_id()).collect();
    assert_eq!(ids, ["2025-07-25_18-00-05", "2025-07-25_09-00-05"]);
    assert_eq!(sessions[1].filename, "session_2025-07-25_09-00-05.json");

    let loaded = store
        .load(&session_id(older.timestamp))
        .expect("load succeeds")
        .expect("session exists");
    assert_eq!(loaded, older);

    let latest = store.latest().expect("latest loads").expect("latest exists");
    assert_eq!(latest, newer);

    let report = diff_snapshots(&loaded, &latest, &ids[1], &ids[0]);
    assert_eq!(report.directions["d1"].change, 1);
}

#[test]
fn unrelated_files_are_not_listed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SessionStore::new(dir.path());
    store.save(&snapshot(9, &["a"])).expect("save");

    let sessions_dir = dir.path().join("sessions");
    std::fs::write(sessions_dir.join("notes.txt"), "scratch").expect("write");
    std::fs::write(sessions_dir.join("session_yesterday.json"), "{}").expect("write");

    assert_eq!(store.list().expect("list").len(), 1);
    assert!(store.load("2030-01-01_00-00-00").expect("load").is_none());
}

#[test]
fn exports_saved_session_as_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("applicants.csv");

    let rows = export_csv_to_path(&snapshot(9, &["a", "b"]), &path).expect("export");
    assert_eq!(rows, 2);

    let written = std::fs::read_to_string(&path).expect("read export");
    assert_eq!(written.lines().count(), 3);
    assert!(written.lines().nth(1).expect("first row").starts_with("d1,09.04.04,"));
}
