//! Seam to the external chart database.
//!
//! The database owns chart data and evaluates queries; this crate only hands
//! it identifiers and compiled query strings.

use crate::options::GameVersion;
use crate::query::QuerySampleOptions;
use log::warn;
use serde::{Deserialize, Serialize};

/// A chart record as returned by the database. Only `id` is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub sran_level: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
}

impl Chart {
    /// A record carrying only its identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            genre: String::new(),
            artist: String::new(),
            difficulty: String::new(),
            level: 0,
            sran_level: None,
            folder: None,
        }
    }
}

/// Lookup and sampling capability of the chart database.
pub trait ChartDatabase {
    /// Resolve identifiers against the snapshot for `version`.
    ///
    /// Output has the same length and order as `ids`; unknown ids map to `None`.
    fn find_charts(&self, version: GameVersion, ids: &[String]) -> Vec<Option<Chart>>;

    /// Evaluate `options.query` and return up to `options.count` random matches.
    fn sample_queried_charts(&self, options: &QuerySampleOptions) -> Vec<Chart>;
}

impl<D: ChartDatabase + ?Sized> ChartDatabase for &D {
    fn find_charts(&self, version: GameVersion, ids: &[String]) -> Vec<Option<Chart>> {
        (**self).find_charts(version, ids)
    }

    fn sample_queried_charts(&self, options: &QuerySampleOptions) -> Vec<Chart> {
        (**self).sample_queried_charts(options)
    }
}

/// Line decoded lookup records up with `ids`.
///
/// A record that failed to decode becomes `None` for its id only. Missing
/// trailing records are `None`; surplus ones are dropped.
pub fn align_lookup<E: std::fmt::Display>(
    ids: &[String],
    records: impl IntoIterator<Item = Result<Option<Chart>, E>>,
) -> Vec<Option<Chart>> {
    let mut charts: Vec<Option<Chart>> = records
        .into_iter()
        .zip(ids.iter().chain(std::iter::repeat(&String::new())))
        .map(|(record, id)| {
            record.unwrap_or_else(|e| {
                warn!("Skipping undecodable chart record '{}': {}", id, e);
                None
            })
        })
        .collect();
    if charts.len() != ids.len() {
        warn!("Lookup returned {} records for {} ids", charts.len(), ids.len());
        charts.resize(ids.len(), None);
    }
    charts
}
