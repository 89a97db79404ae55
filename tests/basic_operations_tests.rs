#[cfg(test)]
mod tests {

    use static_hash_table::{TableBuilder, traits::TableRead};

    fn fixture() -> Vec<(&'static [u8], u64)> {
        vec![
            (b"aaa".as_slice(), 7),
            (b"aab".as_slice(), 6),
            (b"aac".as_slice(), 5),
            (b"aad".as_slice(), 4),
            (b"aae".as_slice(), 3),
            (b"aaf".as_slice(), 2),
            (b"aag".as_slice(), 1),
        ]
    }

    fn build_fixture_table() -> TableBuilder {
        let entries = fixture();
        let total_key_length: usize = entries.iter().map(|(key, _)| key.len()).sum();

        let mut builder = TableBuilder::new(entries.len(), 8, total_key_length);
        for (key, value) in &entries {
            builder.set(key, &value.to_le_bytes());
        }
        builder
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let builder = build_fixture_table();
        assert_eq!(builder.capacity(), 8);

        for (key, value) in fixture() {
            let retrieved = builder.get(key);
            assert!(
                retrieved.is_some(),
                "key {:?} should be found straight after insertion",
                String::from_utf8_lossy(key)
            );
            assert_eq!(retrieved.unwrap(), value.to_le_bytes());
        }
    }

    #[test]
    fn test_missing_key_returns_none() {
        let builder = build_fixture_table();
        assert_eq!(builder.get(b"zzz"), None);
        assert_eq!(builder.get(b"aa"), None, "prefix of a stored key is not a match");
        assert_eq!(builder.get(b"aaaa"), None);
    }

    #[test]
    fn test_overwrite_existing_key() {
        let mut builder = TableBuilder::new(10, 8, 30);
        builder.set(b"heelo", &1u64.to_le_bytes());
        builder.set(b"heelo", &42u64.to_le_bytes());

        let retrieved = builder.get(b"heelo").expect("key should be present");
        assert_eq!(
            retrieved,
            42u64.to_le_bytes(),
            "second set must overwrite the value in place"
        );

        // Overwrites reuse the slot and the stored key bytes.
        assert_eq!(builder.iter().count(), 1);
    }

    #[test]
    fn test_empty_key_is_a_normal_key() {
        let mut builder = TableBuilder::new(4, 8, 8);
        builder.set(b"", &99u64.to_le_bytes());
        builder.set(b"x", &1u64.to_le_bytes());

        assert_eq!(builder.get(b""), Some(&99u64.to_le_bytes()[..]));
        assert_eq!(builder.get(b"x"), Some(&1u64.to_le_bytes()[..]));
    }

    #[test]
    fn test_zero_width_values() {
        let mut builder = TableBuilder::new(4, 0, 16);
        builder.set(b"present", b"");

        let retrieved = builder.get(b"present");
        assert_eq!(
            retrieved,
            Some(&b""[..]),
            "a zero-width value still reports the key as found"
        );
        assert_eq!(builder.get(b"absent"), None);
    }

    #[test]
    fn test_single_slot_table() {
        let mut builder = TableBuilder::new(1, 8, 8);
        assert_eq!(builder.capacity(), 1);

        builder.set(b"only", &7u64.to_le_bytes());
        assert_eq!(builder.get(b"only"), Some(&7u64.to_le_bytes()[..]));

        builder.set(b"only", &8u64.to_le_bytes());
        assert_eq!(builder.get(b"only"), Some(&8u64.to_le_bytes()[..]));
    }

    #[test]
    fn test_iter_visits_every_entry_once() {
        let builder = build_fixture_table();

        let mut seen: Vec<(Vec<u8>, u64)> = builder
            .iter()
            .map(|(key, value)| {
                (
                    key.to_vec(),
                    u64::from_le_bytes(value.try_into().expect("8-byte value")),
                )
            })
            .collect();
        seen.sort();

        let mut expected: Vec<(Vec<u8>, u64)> = fixture()
            .into_iter()
            .map(|(key, value)| (key.to_vec(), value))
            .collect();
        expected.sort();

        assert_eq!(seen, expected);
    }

    #[test]
    fn test_insertion_order_does_not_affect_lookups() {
        let mut entries = fixture();
        entries.reverse();
        let total_key_length: usize = entries.iter().map(|(key, _)| key.len()).sum();

        let mut builder = TableBuilder::new(entries.len(), 8, total_key_length);
        for (key, value) in &entries {
            builder.set(key, &value.to_le_bytes());
        }

        for (key, value) in fixture() {
            assert_eq!(builder.get(key), Some(&value.to_le_bytes()[..]));
        }
    }

    #[test]
    #[should_panic(expected = "value width does not match")]
    fn test_mismatched_value_width_panics() {
        let mut builder = TableBuilder::new(4, 8, 16);
        builder.set(b"key", b"short");
    }

    #[test]
    #[should_panic(expected = "out of space")]
    fn test_probing_a_full_table_for_an_absent_key_panics() {
        let mut builder = TableBuilder::new(2, 8, 16);
        builder.set(b"a", &1u64.to_le_bytes());
        builder.set(b"b", &2u64.to_le_bytes());

        // Both slots occupied: the probe ring has nowhere to stop.
        let _ = builder.get(b"c");
    }

    #[test]
    #[should_panic(expected = "key data region exhausted")]
    fn test_undersized_key_budget_panics() {
        let mut builder = TableBuilder::new(8, 8, 2);
        builder.set(b"this key is far longer than two bytes", &1u64.to_le_bytes());
    }
}
