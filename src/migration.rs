//! Reading and writing the draw configuration as flat storage keys.
//!
//! Older releases stored the same options under other key names and shapes.
//! [`migrate`] rewrites those once per load into the current schema, so
//! [`load_configuration`] only ever reads canonical keys.

use crate::config::OPTIONS_SCHEMA_VERSION;
use crate::levels::RangeDomain;
use crate::options::{
    DifficultySelection, DifficultySet, DrawConfiguration, Folder, FolderFilter, GameVersion,
    IncludeOption, TagFilters, TagKind, VersionFolderSet,
};
use crate::query::{decode_version_folders, encode_version_folders};
use crate::range::{Bounds, LevelSpec};
use crate::storage::keys::{self, legacy};
use crate::storage::{KeyValueStore, StorageError};
use crate::OptionParseError;
use log::{debug, info, warn};
use std::str::FromStr;

/// Prefix of a persisted `folder` value holding a version-folder subset.
const VERSION_SET_PREFIX: &str = "ver:";

/// A group of storage keys that change together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Count,
    SranMode,
    Level,
    SranLevel,
    Difficulties,
    Hardest,
    Folder,
    Tag(TagKind),
    GameVersion,
}

impl ConfigField {
    /// Every field, in write order.
    pub fn all() -> impl Iterator<Item = ConfigField> {
        [
            ConfigField::Count,
            ConfigField::SranMode,
            ConfigField::Level,
            ConfigField::SranLevel,
            ConfigField::Difficulties,
            ConfigField::Hardest,
            ConfigField::Folder,
        ]
        .into_iter()
        .chain(TagKind::ALL.into_iter().map(ConfigField::Tag))
        .chain(std::iter::once(ConfigField::GameVersion))
    }
}

fn tag_key(kind: TagKind) -> &'static str {
    match kind {
        TagKind::BuggedBpm => keys::BUGGED_BPMS,
        TagKind::HoldNotes => keys::HOLD_NOTES,
        TagKind::Eemall => keys::EEMALL,
        TagKind::FloorInfection => keys::FLOOR_INFECTION,
        TagKind::Omnimix => keys::OMNIMIX,
        TagKind::Lively => keys::LIVELY,
    }
}

/// Bring persisted keys up to [`OPTIONS_SCHEMA_VERSION`]. Returns the version found.
pub fn migrate(store: &impl KeyValueStore) -> Result<u32, StorageError> {
    let found = store
        .get(keys::SCHEMA_VERSION)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(0);

    if found > OPTIONS_SCHEMA_VERSION {
        warn!(
            "Stored options schema v{} is newer than v{}; leaving keys untouched",
            found, OPTIONS_SCHEMA_VERSION
        );
    } else {
        if found < 1 {
            migrate_v0_to_v1(store)?;
        }
        if found < 2 {
            migrate_v1_to_v2(store)?;
        }
        if found != OPTIONS_SCHEMA_VERSION {
            info!("Migrated stored options from schema v{} to v{}", found, OPTIONS_SCHEMA_VERSION);
            store.set(keys::SCHEMA_VERSION, &OPTIONS_SCHEMA_VERSION.to_string())?;
        }
    }

    replace_retired_game_version(store)?;
    Ok(found)
}

// `level`/`sranLevel` became the free-text `levelAdv`/`sranLevelAdv`;
// the tri-state `hardestDiff` became the boolean `onlyIncludeHardest`.
fn migrate_v0_to_v1(store: &impl KeyValueStore) -> Result<(), StorageError> {
    for (old, new) in [
        (legacy::LEVEL, keys::LEVEL_TEXT),
        (legacy::SRAN_LEVEL, keys::SRAN_LEVEL_TEXT),
    ] {
        if let Some(value) = store.get(old) {
            let newer = store.get(new).filter(|v| !v.trim().is_empty());
            if newer.is_none() && !value.trim().is_empty() {
                debug!("Moving '{}' to '{}'", old, new);
                store.set(new, &value)?;
            }
            store.remove(old)?;
        }
    }

    if let Some(value) = store.get(legacy::HARDEST_DIFF) {
        if store.get(keys::ONLY_INCLUDE_HARDEST).is_none() {
            let only = IncludeOption::parse(&value) == IncludeOption::Only;
            store.set_bool(keys::ONLY_INCLUDE_HARDEST, only)?;
        }
        store.remove(legacy::HARDEST_DIFF)?;
    }
    Ok(())
}

// The multi-select version-folder vector became the single `folder` key.
fn migrate_v1_to_v2(store: &impl KeyValueStore) -> Result<(), StorageError> {
    let radio = store.get(legacy::VERSION_FOLDERS_RADIO);
    let flags = store.get(legacy::VERSION_FOLDERS);
    if radio.is_none() && flags.is_none() {
        return Ok(());
    }

    if store.get(keys::FOLDER).is_none() {
        let filter = match (radio.as_deref(), flags.as_deref()) {
            (Some("choose"), Some(flags)) => {
                let flags: Vec<bool> = flags.split(',').map(|f| f.trim() == "true").collect();
                FolderFilter::versions(VersionFolderSet::from_flags(&flags))
            }
            _ => FolderFilter::All,
        };
        store.set(keys::FOLDER, &folder_value(&filter))?;
    }
    store.remove(legacy::VERSION_FOLDERS_RADIO)?;
    store.remove(legacy::VERSION_FOLDERS)?;
    Ok(())
}

fn replace_retired_game_version(store: &impl KeyValueStore) -> Result<(), StorageError> {
    if let Some(stored) = store.get(keys::GAME_VERSION) {
        let replacement = GameVersion::replace_retired(stored.trim());
        if replacement != stored.trim() {
            info!("Replacing retired game version {} with {}", stored, replacement);
            store.set(keys::GAME_VERSION, replacement)?;
        }
    }
    Ok(())
}

/// Migrate, then read every option, falling back to defaults for absent or unreadable keys.
pub fn load_configuration(store: &impl KeyValueStore) -> DrawConfiguration {
    if let Err(e) = migrate(store) {
        warn!("Option migration incomplete: {}", e);
    }

    let defaults = DrawConfiguration::default();

    let count = store
        .get(keys::COUNT)
        .map(|v| {
            v.trim()
                .parse::<u8>()
                .map_err(|_| OptionParseError::Count(v.clone()))
                .and_then(DrawConfiguration::validate_count)
        })
        .and_then(|parsed| recover(parsed, keys::COUNT))
        .unwrap_or(defaults.count);

    let (level, level_text) = read_level(
        store,
        keys::LEVEL_TEXT,
        keys::LEVEL_MIN,
        keys::LEVEL_MAX,
        defaults.level,
    );
    let (sran_level, sran_level_text) = read_level(
        store,
        keys::SRAN_LEVEL_TEXT,
        keys::SRAN_LEVEL_MIN,
        keys::SRAN_LEVEL_MAX,
        defaults.sran_level,
    );

    let chosen = store
        .get(keys::INCLUDE_DIFFS)
        .and_then(|v| recover(DifficultySet::from_letters(&v), keys::INCLUDE_DIFFS))
        .unwrap_or(defaults.difficulties.chosen);
    let difficulties = DifficultySelection {
        choose: store.get(keys::INCLUDE_DIFFS_RADIO).as_deref() == Some("choose"),
        chosen,
    };

    let folder = store
        .get(keys::FOLDER)
        .and_then(|v| recover(parse_folder_value(&v), keys::FOLDER))
        .unwrap_or(defaults.folder);

    let mut tags = TagFilters::default();
    for kind in TagKind::ALL {
        if let Some(value) = store.get(tag_key(kind)) {
            tags.set(kind, IncludeOption::parse(&value));
        }
    }

    let game_version = store
        .get(keys::GAME_VERSION)
        .and_then(|v| recover(v.parse::<GameVersion>(), keys::GAME_VERSION))
        .unwrap_or(defaults.game_version);

    DrawConfiguration {
        count,
        sran_mode_enabled: store.get_bool(keys::SRAN_MODE_ENABLED).unwrap_or(false),
        level,
        level_text,
        sran_level,
        sran_level_text,
        difficulties,
        hardest_only: store.get_bool(keys::ONLY_INCLUDE_HARDEST).unwrap_or(false),
        folder,
        tags,
        game_version,
    }
}

fn recover<T>(parsed: Result<T, OptionParseError>, key: &str) -> Option<T> {
    parsed
        .map_err(|e| warn!("Ignoring stored '{}': {}", key, e))
        .ok()
}

// A stored free-text value that parses is the latest commit; otherwise the
// committed bounds live in the min/max keys.
fn read_level<T>(
    store: &impl KeyValueStore,
    text_key: &str,
    min_key: &str,
    max_key: &str,
    default: LevelSpec<T>,
) -> (LevelSpec<T>, String)
where
    T: RangeDomain + FromStr<Err = OptionParseError>,
{
    let text = store.get(text_key);
    if let Some(parsed) = text.as_deref().and_then(|t| LevelSpec::<T>::parse(t).ok()) {
        return (parsed, text.unwrap_or_default());
    }

    let spec = match (store.get(min_key), store.get(max_key)) {
        (None, None) => default,
        (min, max) => recover(parse_bounds(min.as_deref(), max.as_deref()), min_key).unwrap_or(default),
    };
    let text = text.unwrap_or_else(|| spec.canonical_text());
    (spec, text)
}

fn parse_bounds<T>(min: Option<&str>, max: Option<&str>) -> Result<LevelSpec<T>, OptionParseError>
where
    T: RangeDomain + FromStr<Err = OptionParseError>,
{
    let min = min.map(str::trim).filter(|v| !v.is_empty());
    let max = max.map(str::trim).filter(|v| !v.is_empty());
    if min.is_none() && max.is_none() {
        return Ok(LevelSpec::Any);
    }
    let lower = min.map_or(Ok(T::FIRST), str::parse)?;
    let upper = max.map_or(Ok(T::LAST), str::parse)?;
    // An inverted pair is repaired the way a max edit would repair it.
    Ok(LevelSpec::from_bounds(
        Bounds::full().with_min(lower).with_max(upper),
    ))
}

/// Persisted form of a folder filter.
pub fn folder_value(filter: &FolderFilter) -> String {
    match filter {
        FolderFilter::All => String::new(),
        FolderFilter::Folder(folder) => folder.id(),
        FolderFilter::Versions(set) => format!("{}{}", VERSION_SET_PREFIX, encode_version_folders(set)),
    }
}

/// Inverse of [`folder_value`].
pub fn parse_folder_value(value: &str) -> Result<FolderFilter, OptionParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(FolderFilter::All);
    }
    match value.strip_prefix(VERSION_SET_PREFIX) {
        Some(encoded) => decode_version_folders(encoded).map(FolderFilter::versions),
        None => value.parse::<Folder>().map(FolderFilter::Folder),
    }
}

/// Write the keys behind `fields`.
pub fn write_fields(
    store: &impl KeyValueStore,
    config: &DrawConfiguration,
    fields: &[ConfigField],
) -> Result<(), StorageError> {
    for &field in fields {
        write_field(store, config, field)?;
    }
    Ok(())
}

fn write_field(
    store: &impl KeyValueStore,
    config: &DrawConfiguration,
    field: ConfigField,
) -> Result<(), StorageError> {
    match field {
        ConfigField::Count => store.set(keys::COUNT, &config.count.to_string()),
        ConfigField::SranMode => store.set_bool(keys::SRAN_MODE_ENABLED, config.sran_mode_enabled),
        ConfigField::Level => write_level(
            store,
            [keys::LEVEL_TEXT, keys::LEVEL_MIN, keys::LEVEL_MAX],
            &config.level,
            &config.level_text,
        ),
        ConfigField::SranLevel => write_level(
            store,
            [keys::SRAN_LEVEL_TEXT, keys::SRAN_LEVEL_MIN, keys::SRAN_LEVEL_MAX],
            &config.sran_level,
            &config.sran_level_text,
        ),
        ConfigField::Difficulties => {
            let radio = if config.difficulties.choose { "choose" } else { "all" };
            store.set(keys::INCLUDE_DIFFS_RADIO, radio)?;
            store.set(keys::INCLUDE_DIFFS, &config.difficulties.chosen.letters())
        }
        ConfigField::Hardest => store.set_bool(keys::ONLY_INCLUDE_HARDEST, config.hardest_only),
        ConfigField::Folder => store.set(keys::FOLDER, &folder_value(&config.folder)),
        ConfigField::Tag(kind) => store.set(tag_key(kind), config.tags.get(kind).as_str()),
        ConfigField::GameVersion => store.set(keys::GAME_VERSION, config.game_version.as_str()),
    }
}

fn write_level<T: RangeDomain>(
    store: &impl KeyValueStore,
    [text_key, min_key, max_key]: [&str; 3],
    spec: &LevelSpec<T>,
    text: &str,
) -> Result<(), StorageError> {
    let (min, max) = match spec {
        LevelSpec::Any => (String::new(), String::new()),
        LevelSpec::Exact(value) => (value.to_string(), value.to_string()),
        LevelSpec::Range(bounds) => (bounds.min().to_string(), bounds.max().to_string()),
    };
    store.set(text_key, text)?;
    store.set(min_key, &min)?;
    store.set(max_key, &max)
}

/// Write every option and stamp the schema version.
pub fn write_all(store: &impl KeyValueStore, config: &DrawConfiguration) -> Result<(), StorageError> {
    let fields: Vec<ConfigField> = ConfigField::all().collect();
    write_fields(store, config, &fields)?;
    store.set(keys::SCHEMA_VERSION, &OPTIONS_SCHEMA_VERSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Level;
    use crate::options::{OtherFolder, VersionFolder};
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_loads_defaults_and_stamps_schema() {
        let store = MemoryStore::new();
        assert_eq!(load_configuration(&store), DrawConfiguration::default());
        assert_eq!(store.get(keys::SCHEMA_VERSION).as_deref(), Some("2"));
    }

    #[test]
    fn v0_level_keys_move_to_free_text() {
        let store = MemoryStore::with_entries([
            (legacy::LEVEL, "12-34"),
            (legacy::SRAN_LEVEL, "3b-"),
            (legacy::HARDEST_DIFF, "only"),
        ]);
        let config = load_configuration(&store);
        assert_eq!(config.level_text, "12-34");
        assert_eq!(config.level.canonical_text(), "12-34");
        assert_eq!(config.sran_level.canonical_text(), "03b-19");
        assert!(config.hardest_only);
        assert_eq!(store.get(legacy::LEVEL), None);
        assert_eq!(store.get(legacy::HARDEST_DIFF), None);
    }

    #[test]
    fn newer_key_wins_over_legacy() {
        let store = MemoryStore::with_entries([(legacy::LEVEL, "5"), (keys::LEVEL_TEXT, "20-25")]);
        let config = load_configuration(&store);
        assert_eq!(config.level_text, "20-25");
        assert_eq!(store.get(keys::LEVEL_TEXT).as_deref(), Some("20-25"));
    }

    #[test]
    fn v1_version_folder_vector_becomes_folder_value() {
        let mut flags = vec!["false"; 29];
        flags[0] = "true";
        flags[24] = "true";
        let joined = flags.join(",");
        let store = MemoryStore::with_entries([
            (keys::SCHEMA_VERSION, "1"),
            (legacy::VERSION_FOLDERS_RADIO, "choose"),
            (legacy::VERSION_FOLDERS, joined.as_str()),
        ]);
        let config = load_configuration(&store);
        let expected = VersionFolderSet::none()
            .with(VersionFolder::new(0).unwrap(), true)
            .with(VersionFolder::new(24).unwrap(), true);
        assert_eq!(config.folder, FolderFilter::Versions(expected));
        assert_eq!(store.get(keys::FOLDER).as_deref(), Some("ver:cs24"));
        assert_eq!(store.get(legacy::VERSION_FOLDERS), None);
    }

    #[test]
    fn all_folders_radio_migrates_to_all() {
        let store = MemoryStore::with_entries([
            (legacy::VERSION_FOLDERS_RADIO, "all"),
            (legacy::VERSION_FOLDERS, "true,true"),
        ]);
        assert_eq!(load_configuration(&store).folder, FolderFilter::All);
        assert_eq!(store.get(keys::FOLDER).as_deref(), Some(""));
    }

    #[test]
    fn retired_game_version_is_rewritten() {
        let store = MemoryStore::with_entries([
            (keys::SCHEMA_VERSION, "2"),
            (keys::GAME_VERSION, "jamfizz_0925"),
        ]);
        assert_eq!(load_configuration(&store).game_version, GameVersion::JamFizz0603);
        assert_eq!(store.get(keys::GAME_VERSION).as_deref(), Some("jamfizz_0603"));
    }

    #[test]
    fn unreadable_values_fall_back_to_defaults() {
        let store = MemoryStore::with_entries([
            (keys::COUNT, "99"),
            (keys::GAME_VERSION, "popn_1"),
            (keys::FOLDER, "nowhere"),
            (keys::INCLUDE_DIFFS, "q"),
            (keys::LEVEL_MIN, "zero"),
            (keys::LEVEL_MAX, "40"),
            (keys::OMNIMIX, "sometimes"),
        ]);
        let config = load_configuration(&store);
        let defaults = DrawConfiguration::default();
        assert_eq!(config.count, defaults.count);
        assert_eq!(config.game_version, defaults.game_version);
        assert_eq!(config.folder, FolderFilter::All);
        assert!(config.difficulties.chosen.is_full());
        assert_eq!(config.level, defaults.level);
        assert_eq!(config.tags.omnimix, IncludeOption::Include);
    }

    #[test]
    fn invalid_free_text_keeps_committed_bounds() {
        let store = MemoryStore::with_entries([
            (keys::LEVEL_TEXT, "34-12"),
            (keys::LEVEL_MIN, "12"),
            (keys::LEVEL_MAX, "12"),
        ]);
        let config = load_configuration(&store);
        assert_eq!(config.level_text, "34-12");
        assert_eq!(config.level, LevelSpec::Exact(Level::new(12).unwrap()));
    }

    #[test]
    fn written_fields_load_back() {
        let store = MemoryStore::new();
        let mut config = DrawConfiguration::default();
        config.count = 7;
        config.sran_mode_enabled = true;
        config.sran_level = LevelSpec::parse("02a-04b").unwrap();
        config.sran_level_text = config.sran_level.canonical_text();
        config.level = LevelSpec::Any;
        config.level_text = String::new();
        config.difficulties = DifficultySelection {
            choose: true,
            chosen: DifficultySet::from_letters("hx").unwrap(),
        };
        config.hardest_only = true;
        config.folder = FolderFilter::Folder(Folder::Other(OtherFolder::Sdvx));
        config.tags.hold_notes = IncludeOption::Only;
        config.game_version = GameVersion::Unilab1218;

        write_all(&store, &config).unwrap();
        assert_eq!(store.get(keys::ONLY_INCLUDE_HARDEST).as_deref(), Some("true"));
        assert_eq!(store.get(keys::LEVEL_MIN).as_deref(), Some(""));
        assert_eq!(load_configuration(&store), config);
    }

    #[test]
    fn only_requested_fields_are_written() {
        let store = MemoryStore::new();
        write_fields(&store, &DrawConfiguration::default(), &[ConfigField::Count]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(keys::COUNT).as_deref(), Some("4"));
    }

    #[test]
    fn folder_values() {
        assert_eq!(parse_folder_value(""), Ok(FolderFilter::All));
        assert_eq!(
            parse_folder_value("iidx"),
            Ok(FolderFilter::Folder(Folder::Other(OtherFolder::Iidx)))
        );
        assert_eq!(parse_folder_value("ver:"), Ok(FolderFilter::All));
        assert!(parse_folder_value("ver:c").is_err());
    }
}
