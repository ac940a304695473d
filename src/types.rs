use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One data line of the Form 477 export, keyed by header name.
/// Columns not named here are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRecord {
    #[serde(skip)]
    pub line: u64,
    #[serde(rename = "Consumer")]
    pub consumer: String,
    #[serde(rename = "Provider_Id")]
    pub provider_id: String,
    #[serde(rename = "BlockCode")]
    pub block_code: String,
    #[serde(rename = "MaxAdDown")]
    pub max_ad_down: String,
    #[serde(rename = "MaxAdUp")]
    pub max_ad_up: String,
}

/// A row of the `rows` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub block_fips: String,
    pub tract_fips: String,
    pub county_fips: String,
    pub max_ad_down: String,
    pub max_ad_up: String,
    pub provider_id: String,
}

/// Result of a complete load run
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub records_read: u64,
    pub records_filtered: u64,
    pub rows_written: u64,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
