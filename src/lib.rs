pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;

pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use pipeline::Pipeline;
pub use types::{InputRecord, LoadSummary, OutputRow};

/// Load a Form 477 CSV export into the SQLite destination named by `config`.
pub fn load_file<P: AsRef<std::path::Path>>(input: P, config: &LoaderConfig) -> Result<LoadSummary> {
    Pipeline::load_file(input.as_ref(), config)
}
