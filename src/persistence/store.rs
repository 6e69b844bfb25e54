use super::files::{atomic_write, user_file};
use super::schema::{decode, encode, Shape};
use crate::domain::User;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize data for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source:#}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How a load went. None of these is a failure for the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No data file yet
    Fresh,
    /// Current layout; `migrated_status` tasks still used the `completed` flag
    Loaded { migrated_status: usize },
    /// The oldest bare-array layout, points start at 0
    ConvertedList { migrated_status: usize },
    /// A JSON document that matches no known layout
    UnknownShape,
    /// Unreadable or malformed file
    Unreadable(String),
}

impl LoadStatus {
    /// Whether the next save will upgrade the file's layout
    pub fn is_migration(&self) -> bool {
        match self {
            LoadStatus::Loaded { migrated_status } => *migrated_status > 0,
            LoadStatus::ConvertedList { .. } => true,
            _ => false,
        }
    }

    /// Whether the session starts from an empty user
    pub fn started_fresh(&self) -> bool {
        matches!(
            self,
            LoadStatus::Fresh | LoadStatus::UnknownShape | LoadStatus::Unreadable(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub user: User,
    pub status: LoadStatus,
}

/// Loads and saves one JSON file per user inside a data directory
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, userid: &str) -> PathBuf {
        user_file(&self.data_dir, userid)
    }

    /// Load a user. Never fails: anything unreadable yields a fresh user.
    /// The returned user always carries `userid`, whatever the file says
    pub fn load(&self, userid: &str) -> Loaded {
        let path = self.path_for(userid);
        let (mut user, status) = match fs::read_to_string(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no data file, starting fresh");
                (User::new(userid), LoadStatus::Fresh)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read data file");
                (User::new(userid), LoadStatus::Unreadable(e.to_string()))
            }
            Ok(content) => Self::parse(userid, &content, &path),
        };

        user.userid = userid.to_string();
        Loaded { user, status }
    }

    fn parse(userid: &str, content: &str, path: &Path) -> (User, LoadStatus) {
        let decoded = serde_json::from_str(content).and_then(decode);
        match decoded {
            Ok(Some(decoded)) => {
                let migrated_status = decoded.migrated_status;
                let status = match decoded.shape {
                    Shape::BareList => LoadStatus::ConvertedList { migrated_status },
                    _ => LoadStatus::Loaded { migrated_status },
                };
                info!(
                    path = %path.display(),
                    tasks = decoded.tasks.len(),
                    points = decoded.points,
                    ?status,
                    "loaded user data"
                );
                (User::with_tasks(userid, decoded.points, decoded.tasks), status)
            }
            Ok(None) => {
                warn!(path = %path.display(), "unrecognized data layout, starting fresh");
                (User::new(userid), LoadStatus::UnknownShape)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed data file, starting fresh");
                (User::new(userid), LoadStatus::Unreadable(e.to_string()))
            }
        }
    }

    /// Write the user in the current layout, replacing the whole file.
    /// Returns the path written
    pub fn save(&self, user: &User) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&user.userid);
        let json = serde_json::to_string_pretty(&encode(user)).map_err(|source| {
            StoreError::Encode {
                path: path.clone(),
                source,
            }
        })?;

        atomic_write(&path, &json).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), tasks = user.tasks.len(), points = user.points, "saved user data");
        Ok(path)
    }

    /// Delete a user's data file. `Ok(false)` when there was none
    pub fn delete(&self, userid: &str) -> Result<bool, StoreError> {
        let path = self.path_for(userid);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted user data");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Delete { path, source }),
        }
    }
}
