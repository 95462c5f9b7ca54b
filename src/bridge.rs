//! JavaScript interop for the popn-db-js chart database.
//! Provides Rust bindings to the helpers defined in popn_db.js.

use js_sys::Array;
use log::error;
use popn_randomizer::database::align_lookup;
use popn_randomizer::options::GameVersion;
use popn_randomizer::query::QuerySampleOptions;
use popn_randomizer::{Chart, ChartDatabase};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(module = "/popn_db.js")]
extern "C" {
    #[wasm_bindgen(js_name = findCharts, catch)]
    fn find_charts_js(database: &str, ids: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = sampleQueriedCharts, catch)]
    fn sample_queried_charts_js(database: &str, options: JsValue) -> Result<JsValue, JsValue>;
}

/// The bundled chart database snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JsDatabase;

impl ChartDatabase for JsDatabase {
    fn find_charts(&self, version: GameVersion, ids: &[String]) -> Vec<Option<Chart>> {
        let result = serde_wasm_bindgen::to_value(ids)
            .map_err(|e| e.to_string())
            .and_then(|ids| find_charts_js(version.database().as_str(), ids).map_err(js_error))
            .and_then(|value| {
                value
                    .dyn_into::<Array>()
                    .map_err(|v| format!("expected an array, found {:?}", v))
            });

        match result {
            // Each record decodes on its own so one bad record only loses its own chart.
            Ok(records) => align_lookup(
                ids,
                records
                    .iter()
                    .map(serde_wasm_bindgen::from_value::<Option<Chart>>),
            ),
            Err(e) => {
                error!("Chart lookup against {} failed: {}", version, e);
                vec![None; ids.len()]
            }
        }
    }

    fn sample_queried_charts(&self, options: &QuerySampleOptions) -> Vec<Chart> {
        let database = options.game_version.database();
        let result = serde_wasm_bindgen::to_value(options)
            .map_err(|e| e.to_string())
            .and_then(|opts| sample_queried_charts_js(database.as_str(), opts).map_err(js_error))
            .and_then(|value| {
                serde_wasm_bindgen::from_value::<Vec<Chart>>(value).map_err(|e| e.to_string())
            });

        result.unwrap_or_else(|e| {
            error!("Sampling '{}' failed: {}", options.query, e);
            Vec::new()
        })
    }
}

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
