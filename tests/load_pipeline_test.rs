use anyhow::Result;
use fcc477_loader::{load_file, LoaderConfig, LoaderError};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const HEADER: &str = "Consumer,Provider_Id,BlockCode,MaxAdDown,MaxAdUp";

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    config: LoaderConfig,
}

fn fixture(lines: &[&str]) -> Result<Fixture> {
    let dir = tempdir()?;
    let input = dir.path().join("fcc-477.csv");
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&input, text)?;
    let config = LoaderConfig::with_db_path(dir.path().join("fcc-477.sqlite"));
    Ok(Fixture {
        _dir: dir,
        input,
        config,
    })
}

fn count_rows(db: &Path) -> Result<i64> {
    let conn = Connection::open(db)?;
    Ok(conn.query_row("SELECT COUNT(*) FROM rows", [], |r| r.get(0))?)
}

#[test]
fn test_end_to_end_keeps_only_consumer_rows() -> Result<()> {
    let fx = fixture(&[
        HEADER,
        "1,42,060372700100012,25,3",
        "0,43,060372700100099,10,1",
    ])?;

    let summary = load_file(&fx.input, &fx.config)?;
    assert_eq!(summary.records_read, 2);
    assert_eq!(summary.records_filtered, 1);
    assert_eq!(summary.rows_written, 1);

    let conn = Connection::open(&fx.config.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT block_fips, tract_fips, county_fips, max_ad_down, max_ad_up, provider_id FROM rows",
    )?;
    let rows: Vec<(String, String, String, String, String, String)> = stmt
        .query_map([], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
        })?
        .collect::<std::result::Result<_, _>>()?;

    assert_eq!(
        rows,
        vec![(
            "060372700100012".to_string(),
            "06037270010".to_string(),
            "06037".to_string(),
            "25".to_string(),
            "3".to_string(),
            "42".to_string(),
        )]
    );
    Ok(())
}

#[test]
fn test_speeds_and_provider_are_stored_verbatim_as_text() -> Result<()> {
    let fx = fixture(&[HEADER, "1,0042,060372700100012,0.768,0.2"])?;
    load_file(&fx.input, &fx.config)?;

    let conn = Connection::open(&fx.config.db_path)?;
    let (down, down_type, provider): (String, String, String) = conn.query_row(
        "SELECT max_ad_down, typeof(max_ad_down), provider_id FROM rows",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    assert_eq!(down, "0.768");
    assert_eq!(down_type, "text");
    assert_eq!(provider, "0042");
    Ok(())
}

#[test]
fn test_second_run_against_same_destination_fails() -> Result<()> {
    let fx = fixture(&[HEADER, "1,42,060372700100012,25,3"])?;
    load_file(&fx.input, &fx.config)?;

    let err = load_file(&fx.input, &fx.config).unwrap_err();
    assert!(
        matches!(err, LoaderError::DestinationExists { .. }),
        "unexpected error: {err:?}"
    );
    // first load is untouched
    assert_eq!(count_rows(&fx.config.db_path)?, 1);
    Ok(())
}

#[test]
fn test_row_count_matches_consumer_records() -> Result<()> {
    let mut lines = vec![HEADER.to_string()];
    let mut expected = 0;
    for i in 0..250u32 {
        let consumer = if i % 3 == 0 { "0" } else { "1" };
        if consumer == "1" {
            expected += 1;
        }
        lines.push(format!("{consumer},{},{:015},{},{}", 1000 + i, 60372700100000u64 + i as u64, i % 100, i % 10));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut fx = fixture(&refs)?;
    fx.config.progress_every = 50;

    let summary = load_file(&fx.input, &fx.config)?;

    assert_eq!(summary.rows_written, expected);
    assert_eq!(summary.records_read, 250);
    assert_eq!(summary.records_read - summary.records_filtered, expected);
    assert_eq!(count_rows(&fx.config.db_path)? as u64, expected);
    Ok(())
}

#[test]
fn test_fips_lookups_use_indexes() -> Result<()> {
    let fx = fixture(&[HEADER, "1,42,060372700100012,25,3"])?;
    load_file(&fx.input, &fx.config)?;

    let conn = Connection::open(&fx.config.db_path)?;
    for (column, index) in [
        ("block_fips", "block_fips_index"),
        ("tract_fips", "tract_fips_index"),
        ("county_fips", "county_fips_index"),
    ] {
        let sql = format!("EXPLAIN QUERY PLAN SELECT * FROM rows WHERE {column} = ?1");
        let mut stmt = conn.prepare(&sql)?;
        let plan: Vec<String> = stmt
            .query_map(params!["06037"], |r| r.get::<_, String>(3))?
            .collect::<std::result::Result<_, _>>()?;
        assert!(
            plan.iter().any(|d| d.contains("USING INDEX") && d.contains(index)),
            "{column} lookup is a full scan: {plan:?}"
        );
    }
    Ok(())
}

#[test]
fn test_short_block_code_aborts_with_nothing_committed() -> Result<()> {
    let fx = fixture(&[
        HEADER,
        "1,42,060372700100012,25,3",
        "1,43,0603727001,25,3",
    ])?;

    let err = load_file(&fx.input, &fx.config).unwrap_err();
    match err {
        LoaderError::MalformedBlockCode {
            line, block_code, ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(block_code, "0603727001");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // table was created before the transaction; the load itself rolled back
    assert_eq!(count_rows(&fx.config.db_path)?, 0);
    Ok(())
}

#[test]
fn test_malformed_line_aborts_the_load() -> Result<()> {
    let fx = fixture(&[
        HEADER,
        "1,42,060372700100012,25,3",
        "1,42,060372700100013,25",
    ])?;

    let err = load_file(&fx.input, &fx.config).unwrap_err();
    assert!(matches!(err, LoaderError::Parse { line: 3, .. }), "{err:?}");
    assert_eq!(count_rows(&fx.config.db_path)?, 0);
    Ok(())
}

#[test]
fn test_missing_input_creates_no_database() -> Result<()> {
    let dir = tempdir()?;
    let config = LoaderConfig::with_db_path(dir.path().join("fcc-477.sqlite"));

    let err = load_file(dir.path().join("absent.csv"), &config).unwrap_err();
    assert!(matches!(err, LoaderError::Io(_)), "{err:?}");
    assert!(!config.db_path.exists());
    Ok(())
}

#[test]
fn test_missing_column_creates_no_database() -> Result<()> {
    let fx = fixture(&["Consumer,Provider_Id,MaxAdDown,MaxAdUp", "1,42,25,3"])?;

    let err = load_file(&fx.input, &fx.config).unwrap_err();
    assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "BlockCode"), "{err:?}");
    assert!(!fx.config.db_path.exists());
    Ok(())
}
