use admission_monitor::config::{AppConfig, ScraperConfig};
use admission_monitor::error::AppError;
use admission_monitor::registry::DirectionRegistry;
use admission_monitor::scrape::{HttpPageFetcher, RunSummary, ScrapeRun, SnapshotBuilder};
use admission_monitor::snapshot::Snapshot;
use admission_monitor::store::{SessionInfo, SessionStore};
use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScrapeResponse {
    pub(crate) message: &'static str,
    pub(crate) filepath: PathBuf,
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) summary: RunSummary,
}

/// Registry location, transport settings and the session store shared by the HTTP
/// handlers and the CLI commands.
#[derive(Debug, Clone)]
pub(crate) struct Monitor {
    scraper: ScraperConfig,
    store: SessionStore,
}

impl Monitor {
    pub(crate) fn new(scraper: ScraperConfig, store: SessionStore) -> Self {
        Self { scraper, store }
    }

    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.scraper.clone(),
            SessionStore::new(config.storage.data_dir.clone()),
        )
    }

    pub(crate) fn registry(&self) -> Result<DirectionRegistry, AppError> {
        Ok(DirectionRegistry::from_path(&self.scraper.registry_path)?)
    }

    /// Scrapes every registered direction and persists the result. Blocks on the network,
    /// so async callers must run it off the runtime threads.
    pub(crate) fn scrape(&self) -> Result<ScrapeResponse, AppError> {
        let registry = self.registry()?;
        let fetcher = HttpPageFetcher::from_config(&self.scraper)?;

        let (snapshot, summary) = match SnapshotBuilder::new(&registry, &fetcher).run() {
            ScrapeRun::Completed { snapshot, summary } => (snapshot, summary),
            ScrapeRun::NoDirections => return Err(AppError::NoDirections),
        };

        let filepath = self.store.save(&snapshot)?;
        info!(
            session = %filepath.display(),
            successful = summary.successful_directions,
            failed = summary.failed_directions,
            "scrape persisted"
        );

        Ok(ScrapeResponse {
            message: "Scraping completed successfully",
            filepath,
            timestamp: snapshot.timestamp,
            summary,
        })
    }

    pub(crate) fn sessions(&self) -> Result<Vec<SessionInfo>, AppError> {
        Ok(self.store.list()?)
    }

    pub(crate) fn session(&self, id: &str) -> Result<Snapshot, AppError> {
        self.store
            .load(id)?
            .ok_or_else(|| AppError::not_found(format!("session {id}")))
    }

    pub(crate) fn latest(&self) -> Result<Snapshot, AppError> {
        self.store
            .latest()?
            .ok_or_else(|| AppError::not_found("latest session"))
    }

    /// A named session, or the latest one when no id is given.
    pub(crate) fn session_or_latest(&self, id: Option<&str>) -> Result<Snapshot, AppError> {
        match id {
            Some(id) => self.session(id),
            None => self.latest(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Monitor;
    use admission_monitor::config::ScraperConfig;
    use admission_monitor::snapshot::{
        Applicant, DirectionIdentity, DirectionMetadata, DirectionResult, ScrapedDirection,
        Snapshot,
    };
    use admission_monitor::store::SessionStore;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::time::Duration;

    pub(crate) fn monitor(root: &Path) -> Monitor {
        Monitor::new(
            ScraperConfig {
                registry_path: root.join("config").join("directions.json"),
                fetch_timeout: Duration::from_secs(1),
                user_agent: "admission-monitor-tests".to_string(),
            },
            SessionStore::new(root),
        )
    }

    pub(crate) fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 28)
            .expect("valid date")
            .and_hms_opt(hour, 30, 0)
            .expect("valid time")
    }

    pub(crate) fn snapshot(hour: u32, codes: &[&str]) -> Snapshot {
        let applicants = codes
            .iter()
            .enumerate()
            .map(|(index, code)| Applicant {
                position: index as u32 + 1,
                unique_code: code.to_string(),
                consent: "Есть".to_string(),
                sd_score: "---".to_string(),
                lang_score: "75".to_string(),
                achievements: "0".to_string(),
                additional: String::new(),
                priority: 1,
                total_score: "75".to_string(),
            })
            .collect();

        let mut directions = BTreeMap::new();
        directions.insert(
            "d1".to_string(),
            DirectionResult::Scraped(ScrapedDirection {
                identity: DirectionIdentity {
                    direction_id: "d1".to_string(),
                    direction_code: "38.04.01".to_string(),
                    direction_name: "Экономика".to_string(),
                    url: "https://example.test/d1".to_string(),
                },
                metadata: DirectionMetadata {
                    available_places: Some(15),
                    ..DirectionMetadata::default()
                },
                applicants,
                scraped_at: at(hour),
            }),
        );

        Snapshot {
            timestamp: at(hour),
            total_directions: 1,
            directions,
        }
    }
}
