//! Fixed names shared by the loader stages.
//! The destination path and table layout are not configurable from the CLI.

// Destination
pub const DEFAULT_DB_PATH: &str = "./fcc-477.sqlite";
pub const TABLE_NAME: &str = "rows";

// Progress is logged every time the written-row count crosses a multiple of this
pub const PROGRESS_INTERVAL: u64 = 100_000;

// Only rows flagged as consumer-grade service survive the filter
pub const CONSUMER_FLAG: &str = "1";

// Prefix lengths of the nested FIPS codes inside a 15-digit block code
pub const COUNTY_FIPS_LEN: usize = 5;
pub const TRACT_FIPS_LEN: usize = 11;

// Input columns consumed by name (Form 477 export header)
pub const COL_CONSUMER: &str = "Consumer";
pub const COL_PROVIDER_ID: &str = "Provider_Id";
pub const COL_BLOCK_CODE: &str = "BlockCode";
pub const COL_MAX_AD_DOWN: &str = "MaxAdDown";
pub const COL_MAX_AD_UP: &str = "MaxAdUp";

pub const CREATE_TABLE_SQL: &str = "CREATE TABLE rows(block_fips TEXT,tract_fips TEXT,county_fips TEXT,max_ad_down,max_ad_up,provider_id);";

pub const INSERT_ROW_SQL: &str = "INSERT INTO rows (block_fips,tract_fips,county_fips,max_ad_down,max_ad_up,provider_id) VALUES (?1,?2,?3,?4,?5,?6)";

/// (index name, indexed column), built in this order after the load
pub const INDEXES: [(&str, &str); 3] = [
    ("block_fips_index", "block_fips"),
    ("county_fips_index", "county_fips"),
    ("tract_fips_index", "tract_fips"),
];

/// All input columns the transformer reads
pub fn required_columns() -> Vec<&'static str> {
    vec![
        COL_CONSUMER,
        COL_PROVIDER_ID,
        COL_BLOCK_CODE,
        COL_MAX_AD_DOWN,
        COL_MAX_AD_UP,
    ]
}
