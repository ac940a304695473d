// Load pipeline: source reader, row transformer, storage sink

pub mod pipeline;
pub mod reader;
pub mod storage;
pub mod transform;

// Re-export key types from each stage
pub use pipeline::{Pipeline, ProgressTracker};
pub use reader::RecordReader;
pub use storage::{MemorySink, RowSink, SqliteSink};
pub use transform::{derive_fips, transform, FipsPrefixes};
