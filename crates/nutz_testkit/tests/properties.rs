//! Property tests for the record operations.

use nutz_core::ErrorKind;
use nutz_testkit::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn create_then_get_round_trips(
        root in bucket_name_strategy(),
        key in key_strategy(),
        value in value_strategy(),
        path in nested_path_strategy(4),
    ) {
        let store = TestStore::new();
        let path = as_path(&path);

        let created = store.create(&root, &key, &value, &path);
        prop_assert!(created.is_ok(), "{:?}", created.last_error());
        prop_assert_eq!(created.payload(), Some(value.as_slice()));

        let fetched = created.get(&root, &key, &path);
        prop_assert!(fetched.is_ok(), "{:?}", fetched.last_error());
        prop_assert_eq!(fetched.payload(), Some(value.as_slice()));
    }

    #[test]
    fn update_requires_existing_key(
        key in key_strategy(),
        other in key_strategy(),
        value in value_strategy(),
        path in nested_path_strategy(3),
    ) {
        prop_assume!(key != other);
        let store = TestStore::new();
        let path = as_path(&path);

        let created = store.create("base", &key, b"seed", &path);
        prop_assert!(created.is_ok());

        let updated = created.update("base", &other, &value, &path);
        prop_assert_eq!(updated.last_error().map(|e| e.kind()), Some(ErrorKind::KeyNotFound));
        prop_assert!(updated.payload().is_none());

        let fetched = updated.get("base", &other, &path);
        prop_assert_eq!(fetched.last_error().map(|e| e.kind()), Some(ErrorKind::KeyNotFound));
    }

    #[test]
    fn reads_never_fall_back_to_a_partial_chain(
        key in key_strategy(),
        path in nested_path_strategy(3),
        extra in bucket_name_strategy(),
    ) {
        let store = TestStore::new();
        let created = store.create("base", &key, b"v", &as_path(&path));
        prop_assert!(created.is_ok());

        let mut longer = path.clone();
        longer.push(extra);
        let longer = as_path(&longer);

        let attempts = [
            created.get("base", &key, &longer),
            created.update("base", &key, b"x", &longer),
            created.enumerate("base", &longer),
            created.delete("base", &key, &longer),
        ];
        for attempt in &attempts {
            prop_assert_eq!(
                attempt.last_error().map(|e| e.kind()),
                Some(ErrorKind::NamespaceNotFound)
            );
            prop_assert!(attempt.payload().is_none());
        }
    }

    #[test]
    fn delete_is_idempotent(
        key in key_strategy(),
        path in nested_path_strategy(3),
        repeats in 1usize..4,
    ) {
        let store = TestStore::new();
        let path = as_path(&path);
        prop_assert!(store.create("base", "anchor", b"v", &path).is_ok());

        for _ in 0..repeats {
            let deleted = store.delete("base", &key, &path);
            prop_assert!(deleted.is_ok(), "{:?}", deleted.last_error());
        }
    }

    #[test]
    fn model_agrees_with_store(ops in operation_sequence_strategy(1, 24)) {
        let mut harness = ModelHarness::new();
        harness.apply_all(&ops);
    }
}
