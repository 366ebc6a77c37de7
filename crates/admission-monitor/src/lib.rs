//! Admission ranking monitor: scrapes direction result pages into timestamped snapshots,
//! persists them, and compares or aggregates them.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod registry;
pub mod scrape;
pub mod snapshot;
pub mod store;
pub mod telemetry;

pub use analysis::{diff_snapshots, find_applicant, snapshot_statistics};
pub use registry::{DirectionDescriptor, DirectionRegistry};
pub use scrape::{HttpPageFetcher, PageFetcher, ScrapeRun, SnapshotBuilder};
pub use snapshot::{Applicant, DirectionResult, Snapshot};
pub use store::SessionStore;
