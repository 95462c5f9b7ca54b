//! Compiles a [`DrawConfiguration`] into the chart database's query grammar.
//!
//! Segment order is fixed: level, difficulty, tags, folder, `hardest`. The
//! evaluator applies predicates in the order given, so the cheap and selective
//! ones go first and `hardest`, the most expensive, always goes last.

use crate::levels::RangeDomain;
use crate::options::{
    DrawConfiguration, FolderFilter, GameVersion, IncludeOption, TagKind, VersionFolder,
    VersionFolderSet,
};
use crate::range::LevelSpec;
use crate::OptionParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arguments of one sampling call against the external chart database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySampleOptions {
    pub count: u8,
    pub query: String,
    pub game_version: GameVersion,
}

/// Ordered query segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledQuery {
    segments: Vec<String>,
}

impl CompiledQuery {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(", "))
    }
}

/// Compile the configuration into its query segments.
pub fn compile_query(config: &DrawConfiguration) -> CompiledQuery {
    let mut query = CompiledQuery::default();

    if config.sran_mode_enabled {
        push_level_segments(&mut query, &config.sran_level);
    } else {
        push_level_segments(&mut query, &config.level);
    }

    if let Some(set) = config.difficulties.query_filter() {
        query.push(format!("diff = {}", set.letters()));
    }

    for kind in TagKind::ALL {
        if kind.requires_extras() && !config.game_version.supports_extras() {
            continue;
        }
        match config.tags.get(kind) {
            IncludeOption::Include => {}
            IncludeOption::Only => query.push(kind.query_token()),
            IncludeOption::Exclude => query.push(format!("-{}", kind.query_token())),
        }
    }

    match &config.folder {
        FolderFilter::All => {}
        FolderFilter::Folder(folder) => query.push(format!("folder = {}", folder.id())),
        FolderFilter::Versions(set) => {
            query.push(format!("ver = {}", encode_version_folders(set)));
        }
    }

    if config.hardest_only {
        query.push("hardest");
    }

    query
}

/// Compile and package the sampling call for the configured game version.
pub fn sample_options(config: &DrawConfiguration) -> QuerySampleOptions {
    QuerySampleOptions {
        count: config.count,
        query: compile_query(config).to_string(),
        game_version: config.game_version,
    }
}

// With no level selection the compiler still emits an always-true lower bound,
// so every query starts with a level predicate.
fn push_level_segments<T: RangeDomain>(query: &mut CompiledQuery, spec: &LevelSpec<T>) {
    let key = T::QUERY_KEY;
    match spec {
        LevelSpec::Any => query.push(format!("{} >= {}", key, T::FIRST)),
        LevelSpec::Exact(value) => query.push(format!("{} = {}", key, value)),
        LevelSpec::Range(bounds) => {
            query.push(format!("{} >= {}", key, bounds.min()));
            query.push(format!("{} <= {}", key, bounds.max()));
        }
    }
}

/// Legacy `ver = ...` value: `cs` for the console folder, two-digit indices for the rest,
/// nothing for excluded folders, no separators.
pub fn encode_version_folders(set: &VersionFolderSet) -> String {
    set.included()
        .map(|folder| folder.id())
        .collect::<Vec<_>>()
        .concat()
}

/// Inverse of [`encode_version_folders`]: a fixed-width scan of two-character ids.
pub fn decode_version_folders(encoded: &str) -> Result<VersionFolderSet, OptionParseError> {
    let invalid = || OptionParseError::Folder(encoded.to_string());
    if !encoded.is_ascii() || encoded.len() % 2 != 0 {
        return Err(invalid());
    }
    let mut set = VersionFolderSet::none();
    for start in (0..encoded.len()).step_by(2) {
        let id = &encoded[start..start + 2];
        let folder = if id == "cs" {
            VersionFolder::new(0)
        } else if id.bytes().all(|b| b.is_ascii_digit()) {
            id.parse::<usize>()
                .ok()
                .filter(|&i| i > 0)
                .and_then(VersionFolder::new)
        } else {
            None
        };
        set = set.with(folder.ok_or_else(invalid)?, true);
    }
    Ok(set)
}
