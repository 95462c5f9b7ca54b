mod common;

use common::{chart_set, FakeDatabase};
use popn_randomizer::config::MAX_DRAWN_CHARTS;
use popn_randomizer::history::{deserialize_chart_sets, serialize_chart_sets, LoadStatus};
use popn_randomizer::storage::{keys, KeyValueStore, MemoryStore};
use popn_randomizer::{DrawnChartSet, EditAction, OptionsStore};
use proptest::prelude::*;

fn seeded_history(sets: usize, size: usize) -> Vec<DrawnChartSet> {
    (0..sets)
        .map(|i| chart_set(&format!("old{}", i), size, 1_000.0 * i as f64))
        .collect()
}

#[test]
fn overflowing_draws_cull_oldest_sets_from_storage() {
    let storage = MemoryStore::new();
    let seeded = seeded_history(199, 5);
    storage
        .set(keys::DRAWN_CHART_SETS, &serialize_chart_sets(&seeded, MAX_DRAWN_CHARTS))
        .unwrap();

    let db = FakeDatabase::default();
    let mut store = OptionsStore::load(&storage, &db);
    assert_eq!(store.drawn_chart_count(), 995);
    assert_eq!(store.load_status(), &LoadStatus::Loaded);

    store.apply(EditAction::SetCount(10));
    for i in 0..3 {
        store.draw_at(2_000_000.0 + i as f64);
    }

    // The session keeps everything and asks before unloading.
    assert_eq!(store.drawn_chart_count(), 1025);
    assert!(store.should_prompt_before_unload());

    let reloaded = OptionsStore::load(&storage, &db);
    assert_eq!(reloaded.drawn_chart_count(), 1000);
    assert_eq!(reloaded.history().len(), 197);
    assert_eq!(reloaded.history()[0].charts[0].id, "old5-0");
    let newest = &reloaded.history()[196];
    assert_eq!(newest.charts.len(), 10);
    assert_eq!(newest.drawn_at, 2_000_002.0);
    assert!(!reloaded.should_prompt_before_unload());
}

#[test]
fn a_single_oversized_blob_is_culled_on_load() {
    let sets = seeded_history(101, 10);
    let mut blob = String::from("[");
    for (i, set) in sets.iter().enumerate() {
        if i > 0 {
            blob.push(',');
        }
        let ids: Vec<String> = set.charts.iter().map(|c| format!("\"{}\"", c.id)).collect();
        blob.push_str(&format!("[{}]", ids.join(",")));
    }
    blob.push(']');

    let loaded = deserialize_chart_sets(&blob, &FakeDatabase::default(), MAX_DRAWN_CHARTS);
    assert_eq!(loaded.sets.len(), 100);
    assert_eq!(loaded.status, LoadStatus::Culled { dropped_sets: 1 });
    assert_eq!(loaded.sets[0].charts[0].id, "old1-0");
}

#[test]
fn clearing_persists_an_empty_history() {
    let storage = MemoryStore::new();
    let db = FakeDatabase::default();
    let mut store = OptionsStore::load(&storage, &db);
    store.draw_at(1.0);
    assert_ne!(storage.get(keys::DRAWN_CHART_SETS).as_deref(), Some("[]"));

    store.clear();
    assert_eq!(storage.get(keys::DRAWN_CHART_SETS).as_deref(), Some("[]"));
    assert!(OptionsStore::load(&storage, &db).history().is_empty());
}

#[test]
fn corrupt_history_is_reset_on_load() {
    let storage = MemoryStore::with_entries([(keys::DRAWN_CHART_SETS, "{not json")]);
    let store = OptionsStore::load(&storage, FakeDatabase::default());
    assert!(store.history().is_empty());
    assert!(matches!(store.load_status(), LoadStatus::Corrupt(_)));
    assert_eq!(storage.get(keys::DRAWN_CHART_SETS).as_deref(), Some("[]"));
}

proptest! {
    #[test]
    fn resolvable_history_round_trips(
        sizes in prop::collection::vec(0usize..20, 0..30),
        stamps in prop::collection::vec(0u32..u32::MAX, 30),
    ) {
        let sets: Vec<DrawnChartSet> = sizes
            .iter()
            .zip(&stamps)
            .enumerate()
            .map(|(i, (&size, &stamp))| chart_set(&format!("s{}", i), size, f64::from(stamp)))
            .collect();

        let json = serialize_chart_sets(&sets, MAX_DRAWN_CHARTS);
        let loaded = deserialize_chart_sets(&json, &FakeDatabase::default(), MAX_DRAWN_CHARTS);
        prop_assert_eq!(loaded.status, LoadStatus::Loaded);
        prop_assert_eq!(loaded.sets, sets);
    }
}
