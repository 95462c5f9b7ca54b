//! The stateful options store.
//!
//! Owns the live [`DrawConfiguration`] and the session's draw history, and is
//! the only writer of the persisted keys. Control events arrive as
//! [`EditAction`]s; draws go through the query compiler to the chart database.

use crate::config::MAX_DRAWN_CHARTS;
use crate::database::ChartDatabase;
use crate::history::{
    deserialize_chart_sets, serialize_chart_sets, total_chart_count, DrawnChartSet, LoadStatus,
};
use crate::levels::{Level, SranLevel};
use crate::migration::{load_configuration, write_all, write_fields, ConfigField};
use crate::options::{
    Difficulty, DifficultySet, DrawConfiguration, Folder, FolderFilter, GameVersion,
    IncludeOption, TagKind, VersionFolder, VersionFolderSet,
};
use crate::query::{compile_query, sample_options, CompiledQuery, QuerySampleOptions};
use crate::range::{Bound, LevelSpec, Step};
use crate::storage::{keys, KeyValueStore};
use crate::utils;
use crate::OptionParseError;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_FOLDER_INPUT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^folder(\d+)Input$").unwrap());

/// One user edit, already parsed into its domain.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    SetCount(u8),
    SetSranMode(bool),
    /// Discrete level select; `None` is "any".
    SetLevel(Option<Level>),
    SetLevelBound(Bound, Level),
    StepLevel(Bound, Step),
    SetLevelText(String),
    SetSranLevel(Option<SranLevel>),
    SetSranLevelBound(Bound, SranLevel),
    StepSranLevel(Bound, Step),
    SetSranLevelText(String),
    IncludeAllDifficulties,
    ChooseDifficulties,
    ToggleDifficulty(Difficulty, bool),
    SetHardestOnly(bool),
    /// Single folder select; `None` is "all folders".
    SelectFolder(Option<Folder>),
    IncludeAllVersionFolders,
    IncludeNoVersionFolders,
    ToggleVersionFolder(VersionFolder, bool),
    SetTag(TagKind, IncludeOption),
    SetGameVersion(GameVersion),
    ResetToDefaults,
}

impl EditAction {
    /// Map a control's element id and current `value`/`checked` state to an action.
    ///
    /// Unknown ids and unparsable values are logged and yield `None`. Radio
    /// inputs only act when they become checked.
    pub fn from_control(id: &str, value: &str, checked: bool) -> Option<EditAction> {
        let action = match id {
            "drawCountSelect" => count(value).map(EditAction::SetCount),
            "isSranModeEnabledInput" => Ok(EditAction::SetSranMode(checked)),

            "levelSelect" => optional(value, str::parse::<Level>).map(EditAction::SetLevel),
            "levelLowerSelect" => level(value).map(|v| EditAction::SetLevelBound(Bound::Min, v)),
            "levelUpperSelect" => level(value).map(|v| EditAction::SetLevelBound(Bound::Max, v)),
            "levelMinDownButton" => Ok(EditAction::StepLevel(Bound::Min, Step::Down)),
            "levelMinUpButton" => Ok(EditAction::StepLevel(Bound::Min, Step::Up)),
            "levelMaxDownButton" => Ok(EditAction::StepLevel(Bound::Max, Step::Down)),
            "levelMaxUpButton" => Ok(EditAction::StepLevel(Bound::Max, Step::Up)),
            "levelAdvInput" => Ok(EditAction::SetLevelText(value.to_string())),

            "sranLevelSelect" => {
                optional(value, str::parse::<SranLevel>).map(EditAction::SetSranLevel)
            }
            "sranLevelLowerSelect" => {
                sran_level(value).map(|v| EditAction::SetSranLevelBound(Bound::Min, v))
            }
            "sranLevelUpperSelect" => {
                sran_level(value).map(|v| EditAction::SetSranLevelBound(Bound::Max, v))
            }
            "sranLevelMinDownButton" => Ok(EditAction::StepSranLevel(Bound::Min, Step::Down)),
            "sranLevelMinUpButton" => Ok(EditAction::StepSranLevel(Bound::Min, Step::Up)),
            "sranLevelMaxDownButton" => Ok(EditAction::StepSranLevel(Bound::Max, Step::Down)),
            "sranLevelMaxUpButton" => Ok(EditAction::StepSranLevel(Bound::Max, Step::Up)),
            "sranLevelAdvInput" => Ok(EditAction::SetSranLevelText(value.to_string())),

            "includeAllDiffsInput" => return checked.then_some(EditAction::IncludeAllDifficulties),
            "includeChooseDiffsInput" => return checked.then_some(EditAction::ChooseDifficulties),
            "includeEasyInput" => Ok(EditAction::ToggleDifficulty(Difficulty::Easy, checked)),
            "includeNormalInput" => Ok(EditAction::ToggleDifficulty(Difficulty::Normal, checked)),
            "includeHyperInput" => Ok(EditAction::ToggleDifficulty(Difficulty::Hyper, checked)),
            "includeExInput" => Ok(EditAction::ToggleDifficulty(Difficulty::Ex, checked)),
            "onlyIncludeHardestInput" => Ok(EditAction::SetHardestOnly(checked)),

            "folderSelect" => optional(value, |v| v.parse::<Folder>().map_err(|e| e.to_string()))
                .map(EditAction::SelectFolder),
            "includeAllFoldersInput" => {
                return checked.then_some(EditAction::IncludeAllVersionFolders)
            }
            "noneVersionFoldersButton" => Ok(EditAction::IncludeNoVersionFolders),

            "buggedBpmsSelect" => Ok(tag(TagKind::BuggedBpm, value)),
            "holdNotesSelect" => Ok(tag(TagKind::HoldNotes, value)),
            "eemallSelect" => Ok(tag(TagKind::Eemall, value)),
            "floorInfectionSelect" => Ok(tag(TagKind::FloorInfection, value)),
            "omnimixSelect" => Ok(tag(TagKind::Omnimix, value)),
            "livelySelect" => Ok(tag(TagKind::Lively, value)),
            "excludeBuggedBpmsInput" => Ok(exclude_toggle(TagKind::BuggedBpm, checked)),
            "excludeFloorInfectionInput" => Ok(exclude_toggle(TagKind::FloorInfection, checked)),

            "gameVersionSelect" => value
                .parse::<GameVersion>()
                .map(EditAction::SetGameVersion)
                .map_err(|e| e.to_string()),
            "resetButton" => Ok(EditAction::ResetToDefaults),

            _ => match version_folder_input(id) {
                Some(folder) => Ok(EditAction::ToggleVersionFolder(folder, checked)),
                None => {
                    warn!("Unknown control id {}", id);
                    return None;
                }
            },
        };

        action
            .map_err(|e| warn!("Ignoring {} = '{}': {}", id, value, e))
            .ok()
    }
}

fn count(value: &str) -> Result<u8, String> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|_| OptionParseError::Count(value.to_string()).to_string())
}

fn level(value: &str) -> Result<Level, String> {
    value.parse::<Level>().map_err(|e| e.to_string())
}

fn sran_level(value: &str) -> Result<SranLevel, String> {
    value.parse::<SranLevel>().map_err(|e| e.to_string())
}

fn optional<T, E: ToString>(
    value: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Option<T>, String> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse(value).map(Some).map_err(|e| e.to_string())
    }
}

fn tag(kind: TagKind, value: &str) -> EditAction {
    EditAction::SetTag(kind, IncludeOption::parse(value))
}

fn exclude_toggle(kind: TagKind, checked: bool) -> EditAction {
    let option = if checked {
        IncludeOption::Exclude
    } else {
        IncludeOption::Include
    };
    EditAction::SetTag(kind, option)
}

fn version_folder_input(id: &str) -> Option<VersionFolder> {
    let captures = VERSION_FOLDER_INPUT_REGEX.captures(id)?;
    captures[1].parse::<usize>().ok().and_then(VersionFolder::new)
}

/// Live options plus draw history over injected storage and database.
pub struct OptionsStore<S, D> {
    storage: S,
    database: D,
    config: DrawConfiguration,
    // Ticked version folders; kept apart from `config.folder` so "none" survives
    // normalization to "all" while the user picks folders.
    version_folders: VersionFolderSet,
    history: Vec<DrawnChartSet>,
    load_status: LoadStatus,
}

impl<S: KeyValueStore, D: ChartDatabase> OptionsStore<S, D> {
    /// Migrate and read persisted options, then restore history.
    pub fn load(storage: S, database: D) -> Self {
        let config = load_configuration(&storage);

        let loaded = match storage.get(keys::DRAWN_CHART_SETS) {
            Some(blob) => deserialize_chart_sets(&blob, &database, MAX_DRAWN_CHARTS),
            None => Default::default(),
        };
        if let LoadStatus::Corrupt(_) = loaded.status {
            match storage.set(keys::DRAWN_CHART_SETS, "[]") {
                Ok(()) => info!("Reset chart sets."),
                Err(e) => warn!("Could not reset chart sets: {}", e),
            }
        }
        debug!(
            "Loaded {} chart sets ({} charts)",
            loaded.sets.len(),
            total_chart_count(&loaded.sets)
        );

        Self {
            version_folders: config.folder.version_set(),
            storage,
            database,
            config,
            history: loaded.sets,
            load_status: loaded.status,
        }
    }

    pub fn config(&self) -> &DrawConfiguration {
        &self.config
    }

    /// Drawn sets, earliest first.
    pub fn history(&self) -> &[DrawnChartSet] {
        &self.history
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn version_folders(&self) -> VersionFolderSet {
        self.version_folders
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply an edit and persist the fields it touched. Returns those fields.
    pub fn apply(&mut self, action: EditAction) -> Vec<ConfigField> {
        if action == EditAction::ResetToDefaults {
            self.reset_to_defaults();
            return ConfigField::all().collect();
        }
        let fields = self.apply_in_memory(action);
        if let Err(e) = write_fields(&self.storage, &self.config, &fields) {
            warn!("Failed to persist options: {}", e);
        }
        fields
    }

    fn apply_in_memory(&mut self, action: EditAction) -> Vec<ConfigField> {
        let config = &mut self.config;
        match action {
            EditAction::SetCount(count) => match DrawConfiguration::validate_count(count) {
                Ok(count) => {
                    config.count = count;
                    vec![ConfigField::Count]
                }
                Err(e) => {
                    warn!("{}", e);
                    Vec::new()
                }
            },
            EditAction::SetSranMode(enabled) => {
                config.sran_mode_enabled = enabled;
                vec![ConfigField::SranMode]
            }
            EditAction::SetLevel(level) => {
                commit_level(config, level.map_or(LevelSpec::Any, LevelSpec::Exact))
            }
            EditAction::SetLevelBound(bound, level) => {
                let spec = config.level.with(bound, level);
                commit_level(config, spec)
            }
            EditAction::StepLevel(bound, step) => {
                let spec = config.level.step(bound, step);
                commit_level(config, spec)
            }
            EditAction::SetLevelText(text) => {
                match LevelSpec::parse(&text) {
                    Ok(spec) => config.level = spec,
                    Err(e) => debug!("Level text not committed: {}", e),
                }
                config.level_text = text;
                vec![ConfigField::Level]
            }
            EditAction::SetSranLevel(level) => {
                commit_sran_level(config, level.map_or(LevelSpec::Any, LevelSpec::Exact))
            }
            EditAction::SetSranLevelBound(bound, level) => {
                let spec = config.sran_level.with(bound, level);
                commit_sran_level(config, spec)
            }
            EditAction::StepSranLevel(bound, step) => {
                let spec = config.sran_level.step(bound, step);
                commit_sran_level(config, spec)
            }
            EditAction::SetSranLevelText(text) => {
                match LevelSpec::parse(&text) {
                    Ok(spec) => config.sran_level = spec,
                    Err(e) => debug!("Sran level text not committed: {}", e),
                }
                config.sran_level_text = text;
                vec![ConfigField::SranLevel]
            }
            EditAction::IncludeAllDifficulties => {
                config.difficulties.choose = false;
                config.difficulties.chosen = DifficultySet::full();
                vec![ConfigField::Difficulties]
            }
            EditAction::ChooseDifficulties => {
                config.difficulties.choose = true;
                vec![ConfigField::Difficulties]
            }
            EditAction::ToggleDifficulty(difficulty, included) => {
                config.difficulties.chosen = config.difficulties.chosen.with(difficulty, included);
                vec![ConfigField::Difficulties]
            }
            EditAction::SetHardestOnly(hardest) => {
                config.hardest_only = hardest;
                vec![ConfigField::Hardest]
            }
            EditAction::SelectFolder(folder) => {
                config.folder = folder.map_or(FolderFilter::All, FolderFilter::Folder);
                self.version_folders = VersionFolderSet::all();
                vec![ConfigField::Folder]
            }
            EditAction::IncludeAllVersionFolders => self.set_version_folders(VersionFolderSet::all()),
            EditAction::IncludeNoVersionFolders => self.set_version_folders(VersionFolderSet::none()),
            EditAction::ToggleVersionFolder(folder, included) => {
                self.set_version_folders(self.version_folders.with(folder, included))
            }
            EditAction::SetTag(kind, option) => {
                config.tags.set(kind, option);
                vec![ConfigField::Tag(kind)]
            }
            EditAction::SetGameVersion(version) => {
                config.game_version = version;
                vec![ConfigField::GameVersion]
            }
            // Routed through reset_to_defaults by apply.
            EditAction::ResetToDefaults => Vec::new(),
        }
    }

    fn set_version_folders(&mut self, set: VersionFolderSet) -> Vec<ConfigField> {
        self.version_folders = set;
        self.config.folder = FolderFilter::versions(set);
        vec![ConfigField::Folder]
    }

    /// Restore every option to its default and persist all keys. History is kept.
    pub fn reset_to_defaults(&mut self) {
        self.config = DrawConfiguration::default();
        self.version_folders = VersionFolderSet::all();
        if let Err(e) = write_all(&self.storage, &self.config) {
            warn!("Failed to persist options: {}", e);
        }
    }

    pub fn compiled_query(&self) -> CompiledQuery {
        compile_query(&self.config)
    }

    pub fn sample_options(&self) -> QuerySampleOptions {
        sample_options(&self.config)
    }

    /// Draw a chart set now.
    pub fn draw(&mut self) -> &DrawnChartSet {
        self.draw_at(utils::now_ms())
    }

    /// Draw a chart set stamped with `drawn_at` (epoch milliseconds), append it, persist history.
    ///
    /// A non-finite stamp is stored as `0`, which history shows as unknown.
    pub fn draw_at(&mut self, drawn_at: f64) -> &DrawnChartSet {
        let drawn_at = if drawn_at.is_finite() {
            drawn_at
        } else {
            warn!("Non-finite draw time {}; storing 0", drawn_at);
            0.0
        };
        let options = self.sample_options();
        info!(
            "Drawing {} charts from {}: {}",
            options.count, options.game_version, options.query
        );
        let charts = self.database.sample_queried_charts(&options);
        if charts.len() < usize::from(options.count) {
            debug!("Query matched only {} charts", charts.len());
        }

        let index = self.history.len();
        self.history.push(DrawnChartSet {
            charts,
            game_version: options.game_version,
            drawn_at,
        });
        self.persist_history();
        &self.history[index]
    }

    /// Forget every drawn set and persist the empty history.
    pub fn clear(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    fn persist_history(&self) {
        let blob = serialize_chart_sets(&self.history, MAX_DRAWN_CHARTS);
        if let Err(e) = self.storage.set(keys::DRAWN_CHART_SETS, &blob) {
            warn!("Failed to persist chart sets: {}", e);
        }
    }

    pub fn drawn_chart_count(&self) -> usize {
        total_chart_count(&self.history)
    }

    /// True when the session holds more charts than persisted history keeps.
    pub fn should_prompt_before_unload(&self) -> bool {
        self.drawn_chart_count() > MAX_DRAWN_CHARTS
    }

    /// One-line description of the active draw, e.g. `"4 songs, lv 30~40"`.
    pub fn summary(&self) -> String {
        let config = &self.config;
        let levels = if config.sran_mode_enabled {
            match config.sran_level {
                LevelSpec::Any => "sran lv any".to_string(),
                LevelSpec::Exact(level) => format!("sran lv {}", level.display_name()),
                LevelSpec::Range(bounds) => format!(
                    "sran lv {}~{}",
                    bounds.min().display_name(),
                    bounds.max().display_name()
                ),
            }
        } else {
            match config.level {
                LevelSpec::Any => "lv any".to_string(),
                LevelSpec::Exact(level) => format!("lv {}", level),
                LevelSpec::Range(bounds) => format!("lv {}~{}", bounds.min(), bounds.max()),
            }
        };
        format!("{} songs, {}", config.count, levels)
    }
}

fn commit_level(config: &mut DrawConfiguration, spec: LevelSpec<Level>) -> Vec<ConfigField> {
    config.level = spec;
    config.level_text = spec.canonical_text();
    vec![ConfigField::Level]
}

fn commit_sran_level(
    config: &mut DrawConfiguration,
    spec: LevelSpec<SranLevel>,
) -> Vec<ConfigField> {
    config.sran_level = spec;
    config.sran_level_text = spec.canonical_text();
    vec![ConfigField::SranLevel]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Chart;
    use crate::range::Bounds;
    use crate::storage::MemoryStore;

    struct Sampler;

    impl ChartDatabase for Sampler {
        fn find_charts(&self, _version: GameVersion, ids: &[String]) -> Vec<Option<Chart>> {
            ids.iter().map(|id| Some(Chart::with_id(id.as_str()))).collect()
        }

        fn sample_queried_charts(&self, options: &QuerySampleOptions) -> Vec<Chart> {
            (0..options.count)
                .map(|i| Chart::with_id(format!("{}-{}", options.game_version, i)))
                .collect()
        }
    }

    fn store() -> OptionsStore<MemoryStore, Sampler> {
        OptionsStore::load(MemoryStore::new(), Sampler)
    }

    fn lv(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    #[test]
    fn control_ids_map_to_actions() {
        assert_eq!(
            EditAction::from_control("drawCountSelect", "6", false),
            Some(EditAction::SetCount(6))
        );
        assert_eq!(
            EditAction::from_control("levelLowerSelect", "12", false),
            Some(EditAction::SetLevelBound(Bound::Min, lv(12)))
        );
        assert_eq!(
            EditAction::from_control("sranLevelMaxUpButton", "", false),
            Some(EditAction::StepSranLevel(Bound::Max, Step::Up))
        );
        assert_eq!(
            EditAction::from_control("levelSelect", "", false),
            Some(EditAction::SetLevel(None))
        );
        assert_eq!(
            EditAction::from_control("folder7Input", "", true),
            Some(EditAction::ToggleVersionFolder(VersionFolder::new(7).unwrap(), true))
        );
        assert_eq!(
            EditAction::from_control("holdNotesSelect", "ONLY", false),
            Some(EditAction::SetTag(TagKind::HoldNotes, IncludeOption::Only))
        );
        assert_eq!(
            EditAction::from_control("excludeBuggedBpmsInput", "", false),
            Some(EditAction::SetTag(TagKind::BuggedBpm, IncludeOption::Include))
        );
        assert_eq!(
            EditAction::from_control("gameVersionSelect", "jamfizz_0925", false),
            Some(EditAction::SetGameVersion(GameVersion::JamFizz0603))
        );
    }

    #[test]
    fn unknown_or_invalid_controls_are_ignored() {
        assert_eq!(EditAction::from_control("displayGenreInput", "", true), None);
        assert_eq!(EditAction::from_control("drawCountSelect", "eleven", false), None);
        assert_eq!(EditAction::from_control("levelUpperSelect", "0", false), None);
        assert_eq!(EditAction::from_control("gameVersionSelect", "popn_1", false), None);
        assert_eq!(EditAction::from_control("folder29Input", "", true), None);
        assert_eq!(EditAction::from_control("includeAllDiffsInput", "", false), None);
    }

    #[test]
    fn bound_edits_cross_adjust_and_persist() {
        let mut store = store();
        let fields = store.apply(EditAction::SetLevelBound(Bound::Min, lv(45)));
        assert_eq!(fields, [ConfigField::Level]);
        assert_eq!(store.config().level_text, "45");
        assert_eq!(store.config().level, LevelSpec::Exact(lv(45)));
        assert_eq!(store.storage().get(keys::LEVEL_MAX).as_deref(), Some("45"));

        store.apply(EditAction::StepLevel(Bound::Max, Step::Up));
        assert_eq!(store.config().level_text, "45-46");
    }

    #[test]
    fn invalid_free_text_is_stored_but_not_committed() {
        let mut store = store();
        store.apply(EditAction::SetLevelText("34-12".to_string()));
        assert_eq!(store.config().level_text, "34-12");
        assert_eq!(store.compiled_query().to_string(), "lv >= 30, lv <= 40");

        store.apply(EditAction::SetLevelText("12-34".to_string()));
        assert_eq!(store.compiled_query().segments(), ["lv >= 12", "lv <= 34"]);
        assert_eq!(store.storage().get(keys::LEVEL_TEXT).as_deref(), Some("12-34"));
    }

    #[test]
    fn only_touched_keys_are_written() {
        let mut store = store();
        let before = store.storage().len();
        store.apply(EditAction::SetTag(TagKind::Eemall, IncludeOption::Only));
        assert_eq!(store.storage().len(), before + 1);
        assert_eq!(store.storage().get(keys::EEMALL).as_deref(), Some("only"));
        assert_eq!(store.storage().get(keys::COUNT), None);
    }

    #[test]
    fn version_folder_picking_starts_from_none() {
        let mut store = store();
        store.apply(EditAction::IncludeNoVersionFolders);
        assert_eq!(store.config().folder, FolderFilter::All);
        let five = VersionFolder::new(5).unwrap();
        store.apply(EditAction::ToggleVersionFolder(five, true));
        assert_eq!(
            store.config().folder,
            FolderFilter::Versions(VersionFolderSet::none().with(five, true))
        );
        assert_eq!(store.storage().get(keys::FOLDER).as_deref(), Some("ver:05"));

        store.apply(EditAction::SelectFolder(Some("bemani".parse().unwrap())));
        assert!(store.version_folders().is_all());
    }

    #[test]
    fn draw_appends_and_persists() {
        let mut store = store();
        store.apply(EditAction::SetCount(2));
        let set = store.draw_at(42.0).clone();
        assert_eq!(set.charts.len(), 2);
        assert_eq!(set.game_version, GameVersion::Unilab0731);
        assert_eq!(store.drawn_chart_count(), 2);
        let blob = store.storage().get(keys::DRAWN_CHART_SETS).unwrap();
        assert!(blob.contains(r#""drawnAt":42.0"#));

        store.clear();
        assert!(store.history().is_empty());
        assert_eq!(store.storage().get(keys::DRAWN_CHART_SETS).as_deref(), Some("[]"));
    }

    #[test]
    fn out_of_range_count_is_ignored() {
        let mut store = store();
        let action = EditAction::from_control("drawCountSelect", "11", false).unwrap();
        assert_eq!(action, EditAction::SetCount(11));
        assert!(store.apply(action).is_empty());
        assert!(store.apply(EditAction::SetCount(0)).is_empty());
        assert_eq!(store.config().count, 4);
        assert_eq!(store.storage().get(keys::COUNT), None);
    }

    #[test]
    fn invalid_text_after_stepper_keeps_the_range() {
        let mut store = store();
        store.apply(EditAction::StepLevel(Bound::Min, Step::Down));
        let stepped = LevelSpec::Range(Bounds::new(lv(29), lv(40)).unwrap());
        assert_eq!(store.config().level, stepped);

        store.apply(EditAction::SetLevelText("40-29".to_string()));
        assert_eq!(store.config().level, stepped);
        assert_eq!(store.compiled_query().segments(), ["lv >= 29", "lv <= 40"]);

        store.apply(EditAction::SetLevelText("".to_string()));
        assert_eq!(store.config().level, stepped);
    }

    #[test]
    fn non_finite_draw_time_keeps_history_loadable() {
        let mut store = store();
        store.draw_at(10.0);
        assert_eq!(store.draw_at(f64::NAN).drawn_at, 0.0);
        store.draw_at(f64::INFINITY);

        let reloaded = OptionsStore::load(store.storage(), Sampler);
        assert_eq!(reloaded.load_status(), &LoadStatus::Loaded);
        assert_eq!(reloaded.history().len(), 3);
        assert_eq!(reloaded.history()[0].drawn_at, 10.0);
    }

    #[test]
    fn summaries() {
        let mut store = store();
        assert_eq!(store.summary(), "4 songs, lv 30~40");
        store.apply(EditAction::SetLevel(Some(lv(12))));
        assert_eq!(store.summary(), "4 songs, lv 12");
        store.apply(EditAction::SetLevel(None));
        assert_eq!(store.summary(), "4 songs, lv any");
        store.apply(EditAction::SetSranMode(true));
        assert_eq!(store.summary(), "4 songs, sran lv 1-~5");
        store.apply(EditAction::SetSranLevel(None));
        assert_eq!(store.summary(), "4 songs, sran lv any");
    }

    #[test]
    fn reset_keeps_history() {
        let mut store = store();
        store.apply(EditAction::SetCount(9));
        store.draw_at(1.0);
        store.reset_to_defaults();
        assert_eq!(store.config(), &DrawConfiguration::default());
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.storage().get(keys::COUNT).as_deref(), Some("4"));
    }

    #[test]
    fn corrupt_history_is_reset_on_load() {
        let storage = MemoryStore::with_entries([(keys::DRAWN_CHART_SETS, "{oops")]);
        let store = OptionsStore::load(storage, Sampler);
        assert!(matches!(store.load_status(), LoadStatus::Corrupt(_)));
        assert_eq!(store.storage().get(keys::DRAWN_CHART_SETS).as_deref(), Some("[]"));
    }
}
