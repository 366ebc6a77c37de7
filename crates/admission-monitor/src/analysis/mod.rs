//! Read-only passes over persisted snapshots.

pub mod diff;
pub mod search;
pub mod stats;

pub use diff::{diff_snapshots, DiffReport, DirectionDiff};
pub use search::{find_applicant, ApplicantMatch, ApplicantSearch};
pub use stats::{snapshot_statistics, DirectionStats, StatisticsReport};
