use fcc477_loader::pipeline::{transform, MemorySink, Pipeline, RecordReader};
use fcc477_loader::InputRecord;
use proptest::prelude::*;

fn record(consumer: &str, block_code: &str) -> InputRecord {
    InputRecord {
        line: 2,
        consumer: consumer.to_string(),
        provider_id: "42".to_string(),
        block_code: block_code.to_string(),
        max_ad_down: "25".to_string(),
        max_ad_up: "3".to_string(),
    }
}

proptest! {
    #[test]
    fn consumer_rows_nest_fips_prefixes(block in "[0-9]{11,15}") {
        let row = transform(record("1", &block)).unwrap().unwrap();

        prop_assert_eq!(&row.block_fips, &block);
        prop_assert_eq!(&row.tract_fips, &block[..11]);
        prop_assert_eq!(&row.county_fips, &block[..5]);
        prop_assert!(row.tract_fips.starts_with(&row.county_fips));
        prop_assert!(row.block_fips.starts_with(&row.tract_fips));
    }

    #[test]
    fn non_consumer_rows_never_produce_output(
        flag in "[0-9a-z ]{0,3}".prop_filter("not the consumer flag", |f| f != "1"),
        block in "[0-9]{0,15}",
    ) {
        prop_assert!(transform(record(&flag, &block)).unwrap().is_none());
    }

    #[test]
    fn written_rows_equal_consumer_records(flags in proptest::collection::vec(any::<bool>(), 0..200)) {
        let mut csv = String::from("Consumer,Provider_Id,BlockCode,MaxAdDown,MaxAdUp\n");
        for (i, consumer) in flags.iter().enumerate() {
            let flag = if *consumer { "1" } else { "0" };
            csv.push_str(&format!("{flag},{i},{:015},10,1\n", 60372700100000u64 + i as u64));
        }

        let mut reader = RecordReader::from_reader(csv.as_bytes()).unwrap();
        let mut sink = MemorySink::new();
        let summary = Pipeline::run(&mut reader, &mut sink, 0).unwrap();

        let expected = flags.iter().filter(|c| **c).count();
        prop_assert_eq!(summary.rows_written as usize, expected);
        prop_assert_eq!(sink.rows.len(), expected);
        prop_assert!(sink.committed);
    }
}
