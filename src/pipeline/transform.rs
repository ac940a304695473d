use crate::constants::{CONSUMER_FLAG, COUNTY_FIPS_LEN, TRACT_FIPS_LEN};
use crate::error::{LoaderError, Result};
use crate::types::{InputRecord, OutputRow};

/// Nested FIPS prefixes of a block code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FipsPrefixes<'a> {
    pub tract: &'a str,
    pub county: &'a str,
}

/// Split a block code into its tract (first 11 chars) and county (first 5
/// chars) codes. Codes shorter than a tract code are rejected rather than
/// truncated.
pub fn derive_fips(block_code: &str) -> Option<FipsPrefixes<'_>> {
    let tract = char_prefix(block_code, TRACT_FIPS_LEN)?;
    let county = char_prefix(tract, COUNTY_FIPS_LEN)?;
    Some(FipsPrefixes { tract, county })
}

/// First `n` characters of `s`, or `None` if it has fewer
fn char_prefix(s: &str, n: usize) -> Option<&str> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .nth(n)
        .map(|end| &s[..end])
}

pub fn is_consumer(record: &InputRecord) -> bool {
    record.consumer == CONSUMER_FLAG
}

/// Filter and derive. `Ok(None)` means the record is not consumer-grade
/// service and produces no row.
pub fn transform(record: InputRecord) -> Result<Option<OutputRow>> {
    if !is_consumer(&record) {
        return Ok(None);
    }

    let (tract_fips, county_fips) = match derive_fips(&record.block_code) {
        Some(p) => (p.tract.to_string(), p.county.to_string()),
        None => {
            return Err(LoaderError::MalformedBlockCode {
                line: record.line,
                block_code: record.block_code,
                expected: TRACT_FIPS_LEN,
            })
        }
    };

    Ok(Some(OutputRow {
        block_fips: record.block_code,
        tract_fips,
        county_fips,
        max_ad_down: record.max_ad_down,
        max_ad_up: record.max_ad_up,
        provider_id: record.provider_id,
    }))
}
