#![allow(dead_code)]

use popn_randomizer::options::GameVersion;
use popn_randomizer::query::QuerySampleOptions;
use popn_randomizer::{Chart, ChartDatabase, DrawnChartSet};
use std::cell::{Cell, RefCell};

/// Resolves every id except those starting with `gone-`, and samples
/// fresh numbered charts.
#[derive(Default)]
pub struct FakeDatabase {
    next_id: Cell<usize>,
    pub queries: RefCell<Vec<QuerySampleOptions>>,
}

impl ChartDatabase for FakeDatabase {
    fn find_charts(&self, _version: GameVersion, ids: &[String]) -> Vec<Option<Chart>> {
        ids.iter()
            .map(|id| (!id.starts_with("gone-")).then(|| Chart::with_id(id.as_str())))
            .collect()
    }

    fn sample_queried_charts(&self, options: &QuerySampleOptions) -> Vec<Chart> {
        self.queries.borrow_mut().push(options.clone());
        (0..options.count)
            .map(|_| {
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                Chart::with_id(format!("drawn-{}", id))
            })
            .collect()
    }
}

/// A set of `size` charts with ids `<prefix>-0..`.
pub fn chart_set(prefix: &str, size: usize, drawn_at: f64) -> DrawnChartSet {
    DrawnChartSet {
        charts: (0..size).map(|i| Chart::with_id(format!("{}-{}", prefix, i))).collect(),
        game_version: GameVersion::Unilab1218,
        drawn_at,
    }
}
