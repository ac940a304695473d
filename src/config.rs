use crate::constants::{DEFAULT_DB_PATH, PROGRESS_INTERVAL};
use std::path::PathBuf;

/// Settings for one load run.
///
/// The binary always uses [`LoaderConfig::default`]; the library API accepts
/// a config so callers (and tests) can direct the load elsewhere.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub db_path: PathBuf,
    pub progress_every: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            progress_every: PROGRESS_INTERVAL,
        }
    }
}

impl LoaderConfig {
    pub fn with_db_path<P: Into<PathBuf>>(db_path: P) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }
}
