//! Load metrics
//!
//! Counters and histograms describing a load run, recorded through the
//! `metrics` facade. Nothing is exported unless the embedding process
//! installs a recorder.

/// Build a metric name under the `fcc477_` prefix
#[macro_export]
macro_rules! load_metric {
    (counter, $name:expr) => {
        concat!("fcc477_", $name, "_total")
    };
    (histogram, $name:expr) => {
        concat!("fcc477_", $name)
    };
}

/// Metrics collection for the load pipeline
pub struct LoadMetrics;

impl LoadMetrics {
    /// Record a data line read from the source
    pub fn record_read() {
        ::metrics::counter!(load_metric!(counter, "records_read")).increment(1);
    }

    /// Record a line dropped by the consumer filter
    pub fn record_filtered() {
        ::metrics::counter!(load_metric!(counter, "records_filtered")).increment(1);
    }

    /// Record a row inserted into the destination
    pub fn record_written() {
        ::metrics::counter!(load_metric!(counter, "rows_written")).increment(1);
    }

    /// Record a failed insert
    pub fn record_write_error() {
        ::metrics::counter!(load_metric!(counter, "write_errors")).increment(1);
    }

    pub fn record_index_build(duration_secs: f64) {
        ::metrics::histogram!(load_metric!(histogram, "index_build_seconds")).record(duration_secs);
    }

    pub fn record_load_complete(duration_secs: f64) {
        ::metrics::histogram!(load_metric!(histogram, "load_seconds")).record(duration_secs);
    }

    /// Pre-register every load metric so an installed recorder reports zeros
    pub fn register_metrics() {
        use ::metrics::{counter, histogram};

        let _ = counter!(load_metric!(counter, "records_read"));
        let _ = counter!(load_metric!(counter, "records_filtered"));
        let _ = counter!(load_metric!(counter, "rows_written"));
        let _ = counter!(load_metric!(counter, "write_errors"));

        let _ = histogram!(load_metric!(histogram, "index_build_seconds"));
        let _ = histogram!(load_metric!(histogram, "load_seconds"));
    }
}
