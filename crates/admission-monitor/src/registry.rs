use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A monitored admission program as listed in the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionDescriptor {
    pub id: String,
    pub name: String,
    pub code: String,
    pub url: String,
}

/// Ordered list of directions to scrape, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectionRegistry {
    directions: Vec<DirectionDescriptor>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry file {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("direction id '{0}' is listed more than once")]
    DuplicateId(String),
}

impl DirectionRegistry {
    pub fn new(directions: Vec<DirectionDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(directions.len());
        for direction in &directions {
            if !seen.insert(direction.id.as_str()) {
                return Err(RegistryError::DuplicateId(direction.id.clone()));
            }
        }
        Ok(Self { directions })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => RegistryError::NotFound {
                path: path.to_path_buf(),
            },
            _ => RegistryError::Io(err),
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_reader(reader)?;
        Self::new(file.directions)
    }

    pub fn directions(&self) -> &[DirectionDescriptor] {
        &self.directions
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    directions: Vec<DirectionDescriptor>,
}
