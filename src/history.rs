//! Persisted draw history.
//!
//! History is stored as a JSON array, earliest set first. Only chart
//! identifiers are written; charts are re-resolved from the database on load.
//!
//! # Formats
//! - Legacy entries: `["id", "id", ...]`, resolved against
//!   [`LEGACY_HISTORY_GAME_VERSION`].
//! - Record entries: `{"charts": [...], "gameVersion": "...", "drawnAt": 0}`.
//!
//! Both shapes may appear in the same array. New writes always use records.
//!
//! # Capacity
//! At most `capacity` charts are kept. Sets are walked newest first and the
//! walk stops at the first set that would overflow, so the oldest sets are
//! the ones dropped. Serialization and deserialization share the same rule.

use crate::config::LEGACY_HISTORY_GAME_VERSION;
use crate::database::{Chart, ChartDatabase};
use crate::options::GameVersion;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One batch of charts returned by a single draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnChartSet {
    pub charts: Vec<Chart>,
    pub game_version: GameVersion,
    /// Epoch milliseconds.
    pub drawn_at: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum PersistedEntry {
    Ids(Vec<String>),
    Record(PersistedRecord),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRecord {
    charts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    game_version: Option<String>,
    #[serde(default)]
    drawn_at: f64,
}

impl PersistedEntry {
    fn len(&self) -> usize {
        match self {
            PersistedEntry::Ids(ids) => ids.len(),
            PersistedEntry::Record(record) => record.charts.len(),
        }
    }
}

/// Outcome of reading the persisted blob.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Loaded,
    /// Older sets were dropped, by capacity or by a malformed entry.
    Culled { dropped_sets: usize },
    /// The blob was unusable; the caller should reset it.
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedHistory {
    pub sets: Vec<DrawnChartSet>,
    pub status: LoadStatus,
}

/// Total number of charts across all sets.
pub fn total_chart_count(sets: &[DrawnChartSet]) -> usize {
    sets.iter().map(|set| set.charts.len()).sum()
}

/// Index of the oldest set kept under `capacity`, given set sizes earliest first.
pub fn retained_start(set_sizes: &[usize], capacity: usize) -> usize {
    let mut total = 0;
    for (idx, &size) in set_sizes.iter().enumerate().rev() {
        if total + size > capacity {
            return idx + 1;
        }
        total += size;
    }
    0
}

/// Serialize the newest sets that fit in `capacity`.
pub fn serialize_chart_sets(sets: &[DrawnChartSet], capacity: usize) -> String {
    let sizes: Vec<usize> = sets.iter().map(|set| set.charts.len()).collect();
    let start = retained_start(&sizes, capacity);
    if start > 0 {
        info!("Culling {} oldest chart sets from persisted history", start);
    }

    let records: Vec<PersistedEntry> = sets[start..]
        .iter()
        .map(|set| {
            PersistedEntry::Record(PersistedRecord {
                charts: set.charts.iter().map(|chart| chart.id.clone()).collect(),
                game_version: Some(set.game_version.as_str().to_string()),
                drawn_at: set.drawn_at,
            })
        })
        .collect();

    serde_json::to_string(&records).unwrap_or_else(|e| {
        error!("Error serializing chart sets: {}", e);
        "[]".to_string()
    })
}

/// Deserialize persisted history, resolving charts through `database`.
///
/// Never fails: unreadable input yields an empty history with
/// [`LoadStatus::Corrupt`]. Identifiers the database no longer knows are
/// dropped from their set.
pub fn deserialize_chart_sets(
    json: &str,
    database: &impl ChartDatabase,
    capacity: usize,
) -> LoadedHistory {
    let entries = match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            return corrupt(format!("expected an array, found {}", json_kind(&other)));
        }
        Err(e) => return corrupt(e.to_string()),
    };

    // Walk newest first; stop at the first malformed entry or overflow.
    let mut kept: Vec<PersistedEntry> = Vec::new();
    let mut chart_count = 0;
    for value in entries.iter().rev() {
        let entry = match PersistedEntry::deserialize(value) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Stopping history load at malformed entry: {}", e);
                break;
            }
        };
        if chart_count + entry.len() > capacity {
            break;
        }
        chart_count += entry.len();
        kept.push(entry);
    }
    kept.reverse();

    let dropped_sets = entries.len() - kept.len();
    let sets = kept
        .into_iter()
        .map(|entry| resolve_entry(entry, database))
        .collect();
    let status = if dropped_sets > 0 {
        info!("Dropped {} oldest chart sets while loading history", dropped_sets);
        LoadStatus::Culled { dropped_sets }
    } else {
        LoadStatus::Loaded
    };

    LoadedHistory { sets, status }
}

fn resolve_entry(entry: PersistedEntry, database: &impl ChartDatabase) -> DrawnChartSet {
    let (ids, game_version, drawn_at) = match entry {
        PersistedEntry::Ids(ids) => (ids, LEGACY_HISTORY_GAME_VERSION, 0.0),
        PersistedEntry::Record(record) => {
            let version = match record.game_version.as_deref().map(str::parse::<GameVersion>) {
                Some(Ok(version)) => version,
                Some(Err(e)) => {
                    warn!("{}; resolving chart set against {}", e, LEGACY_HISTORY_GAME_VERSION);
                    LEGACY_HISTORY_GAME_VERSION
                }
                None => LEGACY_HISTORY_GAME_VERSION,
            };
            (record.charts, version, record.drawn_at)
        }
    };

    let charts = database
        .find_charts(game_version, &ids)
        .into_iter()
        .flatten()
        .collect();

    DrawnChartSet {
        charts,
        game_version,
        drawn_at,
    }
}

fn corrupt(reason: String) -> LoadedHistory {
    error!("Error deserializing chart sets: {}", reason);
    LoadedHistory {
        sets: Vec::new(),
        status: LoadStatus::Corrupt(reason),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
