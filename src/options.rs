//! The draw configuration and the small enum-like value types it is built from.

use crate::config::{
    DEFAULT_COUNT, DEFAULT_GAME_VERSION, DEFAULT_LEVEL_MAX, DEFAULT_LEVEL_MIN,
    DEFAULT_SRAN_LEVEL_MAX, DEFAULT_SRAN_LEVEL_MIN, DRAW_COUNT_MAX, DRAW_COUNT_MIN,
};
use crate::levels::{Level, SranLevel};
use crate::range::{Bounds, LevelSpec};
use crate::OptionParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tri-state tag filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IncludeOption {
    #[default]
    Include,
    Exclude,
    Only,
}

impl IncludeOption {
    /// Lenient parse: anything that is not `only`/`exclude` means `include`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "only" => IncludeOption::Only,
            "exclude" => IncludeOption::Exclude,
            _ => IncludeOption::Include,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IncludeOption::Include => "include",
            IncludeOption::Exclude => "exclude",
            IncludeOption::Only => "only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hyper,
    Ex,
}

impl Difficulty {
    /// Canonical order used for query letters.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hyper,
        Difficulty::Ex,
    ];

    pub fn letter(self) -> char {
        match self {
            Difficulty::Easy => 'e',
            Difficulty::Normal => 'n',
            Difficulty::Hyper => 'h',
            Difficulty::Ex => 'x',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.letter() == letter.to_ascii_lowercase())
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Subset of the four difficulties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DifficultySet(u8);

impl DifficultySet {
    pub fn full() -> Self {
        Difficulty::ALL.into_iter().collect()
    }

    pub fn contains(self, difficulty: Difficulty) -> bool {
        self.0 & difficulty.bit() != 0
    }

    pub fn with(self, difficulty: Difficulty, included: bool) -> Self {
        if included {
            Self(self.0 | difficulty.bit())
        } else {
            Self(self.0 & !difficulty.bit())
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self == Self::full()
    }

    /// Letters in `e, n, h, x` order regardless of insertion order.
    pub fn letters(self) -> String {
        Difficulty::ALL
            .into_iter()
            .filter(|&d| self.contains(d))
            .map(Difficulty::letter)
            .collect()
    }

    pub fn from_letters(letters: &str) -> Result<Self, OptionParseError> {
        letters.trim().chars().try_fold(Self::default(), |set, c| {
            Difficulty::from_letter(c)
                .map(|d| set.with(d, true))
                .ok_or(OptionParseError::Difficulty(c))
        })
    }
}

impl FromIterator<Difficulty> for DifficultySet {
    fn from_iter<I: IntoIterator<Item = Difficulty>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |set, d| set.with(d, true))
    }
}

/// The "all difficulties" / "choose" radio plus the chosen checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySelection {
    pub choose: bool,
    pub chosen: DifficultySet,
}

impl DifficultySelection {
    /// The set the query should restrict to, or `None` when every chart qualifies.
    ///
    /// Empty and full sets both mean "no constraint": the query grammar has no
    /// token for "none".
    pub fn query_filter(&self) -> Option<DifficultySet> {
        if !self.choose || self.chosen.is_empty() || self.chosen.is_full() {
            None
        } else {
            Some(self.chosen)
        }
    }
}

impl Default for DifficultySelection {
    fn default() -> Self {
        Self {
            choose: false,
            chosen: DifficultySet::full(),
        }
    }
}

/// Database snapshot a game version resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKey {
    Unilab0731,
    JamFizz0603,
}

impl DatabaseKey {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseKey::Unilab0731 => "unilab_0731",
            DatabaseKey::JamFizz0603 => "jamfizz_0603",
        }
    }

    /// Whether this snapshot carries omnimix and lively charts.
    pub fn has_extras(self) -> bool {
        matches!(self, DatabaseKey::JamFizz0603)
    }
}

/// Game data version selectable in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVersion {
    #[serde(rename = "kaimei_0613")]
    Kaimei0613,
    #[serde(rename = "unilab_0411")]
    Unilab0411,
    #[serde(rename = "unilab_0731")]
    Unilab0731,
    #[serde(rename = "unilab_0905")]
    Unilab0905,
    #[serde(rename = "unilab_0913")]
    Unilab0913,
    #[serde(rename = "unilab_1218")]
    Unilab1218,
    #[serde(rename = "unilab_1220")]
    Unilab1220,
    #[serde(rename = "jamfizz_0603")]
    JamFizz0603,
}

/// Retired version keys and the key that replaces each.
pub const RETIRED_GAME_VERSIONS: [(&str, &str); 1] = [("jamfizz_0925", "jamfizz_0603")];

impl GameVersion {
    pub const ALL: [GameVersion; 8] = [
        GameVersion::JamFizz0603,
        GameVersion::Unilab1220,
        GameVersion::Unilab1218,
        GameVersion::Unilab0913,
        GameVersion::Unilab0905,
        GameVersion::Unilab0731,
        GameVersion::Unilab0411,
        GameVersion::Kaimei0613,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameVersion::Kaimei0613 => "kaimei_0613",
            GameVersion::Unilab0411 => "unilab_0411",
            GameVersion::Unilab0731 => "unilab_0731",
            GameVersion::Unilab0905 => "unilab_0905",
            GameVersion::Unilab0913 => "unilab_0913",
            GameVersion::Unilab1218 => "unilab_1218",
            GameVersion::Unilab1220 => "unilab_1220",
            GameVersion::JamFizz0603 => "jamfizz_0603",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameVersion::Kaimei0613 => "Kaimei final",
            GameVersion::Unilab0411 => "UniLab 0411",
            GameVersion::Unilab0731 => "UniLab 0731",
            GameVersion::Unilab0905 => "UniLab 0905",
            GameVersion::Unilab0913 => "UniLab 0913",
            GameVersion::Unilab1218 => "UniLab 1218",
            GameVersion::Unilab1220 => "UniLab 1220",
            GameVersion::JamFizz0603 => "Jam&Fizz 0603",
        }
    }

    pub fn database(self) -> DatabaseKey {
        match self {
            GameVersion::Unilab0905
            | GameVersion::Unilab0913
            | GameVersion::Unilab1218
            | GameVersion::Unilab1220
            | GameVersion::JamFizz0603 => DatabaseKey::JamFizz0603,
            GameVersion::Kaimei0613 | GameVersion::Unilab0411 | GameVersion::Unilab0731 => {
                DatabaseKey::Unilab0731
            }
        }
    }

    pub fn supports_extras(self) -> bool {
        self.database().has_extras()
    }

    /// Map a retired key to its replacement; other keys pass through.
    pub fn replace_retired(key: &str) -> &str {
        RETIRED_GAME_VERSIONS
            .iter()
            .find(|(retired, _)| *retired == key)
            .map_or(key, |&(_, replacement)| replacement)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameVersion {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = Self::replace_retired(s.trim());
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| OptionParseError::GameVersion(s.to_string()))
    }
}

/// Number of version folders: `cs` plus `01..=28`.
pub const VERSION_FOLDER_COUNT: usize = 29;

/// A game-release folder. Index 0 is the console (`cs`) folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionFolder(u8);

impl VersionFolder {
    pub fn new(index: usize) -> Option<Self> {
        (index < VERSION_FOLDER_COUNT).then(|| Self(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn id(self) -> String {
        if self.0 == 0 {
            "cs".to_string()
        } else {
            format!("{:02}", self.0)
        }
    }

    pub fn all() -> impl Iterator<Item = VersionFolder> {
        (0..VERSION_FOLDER_COUNT).map(|i| VersionFolder(i as u8))
    }
}

/// Cross-game category folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtherFolder {
    Bemani,
    Iidx,
    Ddr,
    Gitadora,
    Jubeat,
    ReflecBeat,
    Sdvx,
    Museca,
    Nostalgia,
    Tv,
}

impl OtherFolder {
    pub const ALL: [OtherFolder; 10] = [
        OtherFolder::Bemani,
        OtherFolder::Iidx,
        OtherFolder::Ddr,
        OtherFolder::Gitadora,
        OtherFolder::Jubeat,
        OtherFolder::ReflecBeat,
        OtherFolder::Sdvx,
        OtherFolder::Museca,
        OtherFolder::Nostalgia,
        OtherFolder::Tv,
    ];

    pub fn id(self) -> &'static str {
        match self {
            OtherFolder::Bemani => "bemani",
            OtherFolder::Iidx => "iidx",
            OtherFolder::Ddr => "ddr",
            OtherFolder::Gitadora => "gitadora",
            OtherFolder::Jubeat => "jubeat",
            OtherFolder::ReflecBeat => "reflecbeat",
            OtherFolder::Sdvx => "sdvx",
            OtherFolder::Museca => "museca",
            OtherFolder::Nostalgia => "nostalgia",
            OtherFolder::Tv => "tv",
        }
    }
}

/// A single selectable folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Folder {
    Version(VersionFolder),
    Other(OtherFolder),
}

impl Folder {
    pub fn id(self) -> String {
        match self {
            Folder::Version(folder) => folder.id(),
            Folder::Other(folder) => folder.id().to_string(),
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for Folder {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        if id == "cs" {
            return Ok(Folder::Version(VersionFolder(0)));
        }
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            return id
                .parse::<usize>()
                .ok()
                .filter(|&i| i > 0)
                .and_then(VersionFolder::new)
                .map(Folder::Version)
                .ok_or_else(|| OptionParseError::Folder(s.to_string()));
        }
        OtherFolder::ALL
            .into_iter()
            .find(|f| f.id() == id)
            .map(Folder::Other)
            .ok_or_else(|| OptionParseError::Folder(s.to_string()))
    }
}

/// Multi-select over every version folder (the older folder model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionFolderSet([bool; VERSION_FOLDER_COUNT]);

impl VersionFolderSet {
    pub fn all() -> Self {
        Self([true; VERSION_FOLDER_COUNT])
    }

    pub fn none() -> Self {
        Self([false; VERSION_FOLDER_COUNT])
    }

    pub fn contains(&self, folder: VersionFolder) -> bool {
        self.0[folder.index()]
    }

    pub fn with(mut self, folder: VersionFolder, included: bool) -> Self {
        self.0[folder.index()] = included;
        self
    }

    pub fn is_all(&self) -> bool {
        self.0.iter().all(|&b| b)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| !b)
    }

    pub fn included(&self) -> impl Iterator<Item = VersionFolder> + '_ {
        VersionFolder::all().filter(|&f| self.contains(f))
    }

    /// Build from a positional boolean vector; missing trailing entries count as excluded.
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut set = Self::none();
        for (slot, &flag) in set.0.iter_mut().zip(flags) {
            *slot = flag;
        }
        set
    }
}

/// Folder constraint of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderFilter {
    #[default]
    All,
    Folder(Folder),
    Versions(VersionFolderSet),
}

impl FolderFilter {
    /// Normalizes full and empty version sets to [`FolderFilter::All`].
    pub fn versions(set: VersionFolderSet) -> Self {
        if set.is_all() || set.is_empty() {
            FolderFilter::All
        } else {
            FolderFilter::Versions(set)
        }
    }

    /// Version folders currently ticked, as a multi-select UI sees them.
    pub fn version_set(&self) -> VersionFolderSet {
        match self {
            FolderFilter::Versions(set) => *set,
            _ => VersionFolderSet::all(),
        }
    }
}

/// Tag filters a draw can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    BuggedBpm,
    HoldNotes,
    Eemall,
    FloorInfection,
    Omnimix,
    Lively,
}

impl TagKind {
    /// Query emission order.
    pub const ALL: [TagKind; 6] = [
        TagKind::BuggedBpm,
        TagKind::HoldNotes,
        TagKind::Eemall,
        TagKind::FloorInfection,
        TagKind::Omnimix,
        TagKind::Lively,
    ];

    pub fn query_token(self) -> &'static str {
        match self {
            TagKind::BuggedBpm => "buggedbpm",
            TagKind::HoldNotes => "holds",
            TagKind::Eemall => "eemall",
            TagKind::FloorInfection => "floorinfection",
            TagKind::Omnimix => "omnimix",
            TagKind::Lively => "lively",
        }
    }

    /// Only meaningful against snapshots with extra charts.
    pub fn requires_extras(self) -> bool {
        matches!(self, TagKind::Omnimix | TagKind::Lively)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagFilters {
    pub bugged_bpms: IncludeOption,
    pub hold_notes: IncludeOption,
    pub eemall: IncludeOption,
    pub floor_infection: IncludeOption,
    pub omnimix: IncludeOption,
    pub lively: IncludeOption,
}

impl TagFilters {
    pub fn get(&self, kind: TagKind) -> IncludeOption {
        match kind {
            TagKind::BuggedBpm => self.bugged_bpms,
            TagKind::HoldNotes => self.hold_notes,
            TagKind::Eemall => self.eemall,
            TagKind::FloorInfection => self.floor_infection,
            TagKind::Omnimix => self.omnimix,
            TagKind::Lively => self.lively,
        }
    }

    pub fn set(&mut self, kind: TagKind, option: IncludeOption) {
        let slot = match kind {
            TagKind::BuggedBpm => &mut self.bugged_bpms,
            TagKind::HoldNotes => &mut self.hold_notes,
            TagKind::Eemall => &mut self.eemall,
            TagKind::FloorInfection => &mut self.floor_infection,
            TagKind::Omnimix => &mut self.omnimix,
            TagKind::Lively => &mut self.lively,
        };
        *slot = option;
    }
}

impl Default for TagFilters {
    fn default() -> Self {
        Self {
            bugged_bpms: IncludeOption::Include,
            hold_notes: IncludeOption::Include,
            eemall: IncludeOption::Include,
            floor_infection: IncludeOption::Include,
            omnimix: IncludeOption::Exclude,
            lively: IncludeOption::Exclude,
        }
    }
}

/// Every setting that shapes a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawConfiguration {
    pub count: u8,
    pub sran_mode_enabled: bool,
    pub level: LevelSpec<Level>,
    /// Raw free-text level input; may be invalid.
    pub level_text: String,
    pub sran_level: LevelSpec<SranLevel>,
    pub sran_level_text: String,
    pub difficulties: DifficultySelection,
    pub hardest_only: bool,
    pub folder: FolderFilter,
    pub tags: TagFilters,
    pub game_version: GameVersion,
}

impl DrawConfiguration {
    pub fn validate_count(count: u8) -> Result<u8, OptionParseError> {
        if (DRAW_COUNT_MIN..=DRAW_COUNT_MAX).contains(&count) {
            Ok(count)
        } else {
            Err(OptionParseError::Count(count.to_string()))
        }
    }
}

impl Default for DrawConfiguration {
    fn default() -> Self {
        let level = match (Level::new(DEFAULT_LEVEL_MIN), Level::new(DEFAULT_LEVEL_MAX)) {
            (Some(min), Some(max)) => {
                Bounds::new(min, max).map_or(LevelSpec::Any, LevelSpec::from_bounds)
            }
            _ => LevelSpec::Any,
        };
        let sran_level = match (
            DEFAULT_SRAN_LEVEL_MIN.parse::<SranLevel>(),
            DEFAULT_SRAN_LEVEL_MAX.parse::<SranLevel>(),
        ) {
            (Ok(min), Ok(max)) => {
                Bounds::new(min, max).map_or(LevelSpec::Any, LevelSpec::from_bounds)
            }
            _ => LevelSpec::Any,
        };
        Self {
            count: DEFAULT_COUNT,
            sran_mode_enabled: false,
            level,
            level_text: level.canonical_text(),
            sran_level,
            sran_level_text: sran_level.canonical_text(),
            difficulties: DifficultySelection::default(),
            hardest_only: false,
            folder: FolderFilter::All,
            tags: TagFilters::default(),
            game_version: DEFAULT_GAME_VERSION,
        }
    }
}
