//! Direction page extraction: row parsing, page parsing, transport and the snapshot
//! builder that drives them across the registry.

mod builder;
mod fetch;
mod normalizer;
mod page;
mod row;

pub use builder::{RunSummary, ScrapeRun, SnapshotBuilder};
pub use fetch::{FetchError, HttpPageFetcher, PageFetcher};
pub use page::{parse_document, parse_html, scrape_direction, ParsedPage, APPLICANT_TABLE_SELECTOR};
pub use row::{parse_row, MIN_ROW_CELLS, SCORE_PLACEHOLDER};
