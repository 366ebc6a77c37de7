use crate::snapshot::Snapshot;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SESSIONS_DIR: &str = "sessions";
const LATEST_FILE: &str = "latest.json";
const SESSION_PREFIX: &str = "session_";
const SESSION_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Listing entry for one persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub filename: String,
    pub timestamp: NaiveDateTime,
    pub path: PathBuf,
}

impl SessionInfo {
    /// Identifier accepted by [`SessionStore::load`].
    pub fn session_id(&self) -> String {
        session_id(self.timestamp)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session data in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session files under a data directory: `sessions/session_<stamp>.json` per run plus a
/// `latest.json` copy of the newest one.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

pub fn session_id(timestamp: NaiveDateTime) -> String {
    timestamp.format(SESSION_STAMP_FORMAT).to_string()
}

fn parse_session_id(id: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(id, SESSION_STAMP_FORMAT).ok()
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    fn latest_path(&self) -> PathBuf {
        self.root.join(LATEST_FILE)
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.sessions_dir()
            .join(format!("{SESSION_PREFIX}{id}.json"))
    }

    /// Writes the snapshot as a new session and as `latest.json`, returning the session
    /// file path.
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf, StoreError> {
        let dir = self.sessions_dir();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let body = serde_json::to_vec_pretty(snapshot).map_err(|source| StoreError::Json {
            path: dir.clone(),
            source,
        })?;

        let session_path = self.session_path(&session_id(snapshot.timestamp));
        let latest_path = self.latest_path();
        for path in [&session_path, &latest_path] {
            fs::write(path, &body).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        }

        info!(
            session = %session_path.display(),
            latest = %latest_path.display(),
            "session saved"
        );
        Ok(session_path)
    }

    /// Sessions newest first. Files whose name does not carry a valid stamp are ignored.
    pub fn list(&self) -> Result<Vec<SessionInfo>, StoreError> {
        let dir = self.sessions_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };

        let mut sessions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            let Some(timestamp) = filename
                .strip_prefix(SESSION_PREFIX)
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(parse_session_id)
            else {
                debug!(%filename, "skipping unrecognized file in sessions directory");
                continue;
            };

            sessions.push(SessionInfo {
                filename,
                timestamp,
                path: entry.path(),
            });
        }

        sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(sessions)
    }

    /// Loads a session by its stamp. Unknown or malformed ids yield `None`.
    pub fn load(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        if parse_session_id(id).is_none() {
            return Ok(None);
        }
        read_snapshot(&self.session_path(id))
    }

    pub fn latest(&self) -> Result<Option<Snapshot>, StoreError> {
        read_snapshot(&self.latest_path())
    }
}

fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, StoreError> {
    let body = match fs::read(path) {
        Ok(body) => body,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}
