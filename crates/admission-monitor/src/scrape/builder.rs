use super::fetch::PageFetcher;
use super::page::{now, scrape_direction};
use crate::registry::DirectionRegistry;
use crate::snapshot::{DirectionResult, Snapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Totals reported once a run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_directions: usize,
    pub successful_directions: usize,
    pub failed_directions: usize,
    pub total_applicants: usize,
}

impl RunSummary {
    pub fn of(snapshot: &Snapshot) -> Self {
        let mut summary = RunSummary {
            total_directions: snapshot.total_directions,
            successful_directions: 0,
            failed_directions: 0,
            total_applicants: 0,
        };

        for result in snapshot.directions.values() {
            match result {
                DirectionResult::Scraped(direction) => {
                    summary.successful_directions += 1;
                    summary.total_applicants += direction.applicants.len();
                }
                DirectionResult::Failed(_) => summary.failed_directions += 1,
            }
        }

        summary
    }

    pub fn all_failed(&self) -> bool {
        self.total_directions > 0 && self.successful_directions == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeRun {
    /// The registry was empty; nothing was fetched.
    NoDirections,
    Completed {
        snapshot: Snapshot,
        summary: RunSummary,
    },
}

/// Walks the registry in order and collects one result per direction.
pub struct SnapshotBuilder<'a, F: ?Sized> {
    registry: &'a DirectionRegistry,
    fetcher: &'a F,
}

impl<'a, F> SnapshotBuilder<'a, F>
where
    F: PageFetcher + ?Sized,
{
    pub fn new(registry: &'a DirectionRegistry, fetcher: &'a F) -> Self {
        Self { registry, fetcher }
    }

    /// Builds a snapshot stamped with the run's start time. An empty registry yields an
    /// empty snapshot.
    pub fn build(&self) -> Snapshot {
        let timestamp = now();
        let mut directions = BTreeMap::new();

        for descriptor in self.registry.directions() {
            let result = scrape_direction(self.fetcher, descriptor);
            directions.insert(descriptor.id.clone(), result);
        }

        Snapshot {
            timestamp,
            total_directions: self.registry.len(),
            directions,
        }
    }

    pub fn run(&self) -> ScrapeRun {
        if self.registry.is_empty() {
            warn!("no directions configured, skipping scrape run");
            return ScrapeRun::NoDirections;
        }

        info!(directions = self.registry.len(), "starting scrape run");
        let snapshot = self.build();
        let summary = RunSummary::of(&snapshot);

        if summary.all_failed() {
            warn!(
                directions = summary.total_directions,
                "every direction failed during scrape run"
            );
        }
        info!(
            successful = summary.successful_directions,
            total = summary.total_directions,
            applicants = summary.total_applicants,
            "scrape run finished"
        );

        ScrapeRun::Completed { snapshot, summary }
    }
}
