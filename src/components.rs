//! Yew view components for the randomizer UI.
//!
//! Components render from props only. Control events are turned into
//! [`EditAction`]s here and handed up; the store lives in `main.rs`.

use crate::hooks::use_debounced_text;
use popn_randomizer::config::{DRAW_COUNT_MAX, DRAW_COUNT_MIN};
use popn_randomizer::levels::{Level, RangeDomain, SranLevel};
use popn_randomizer::options::{
    Difficulty, DrawConfiguration, FolderFilter, GameVersion, IncludeOption, OtherFolder,
    TagKind, VersionFolder, VersionFolderSet,
};
use popn_randomizer::range::LevelSpec;
use popn_randomizer::utils::format_drawn_at;
use popn_randomizer::{DrawnChartSet, EditAction};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Read `(id, value, checked)` from the element behind a control event.
fn control_state(e: &Event) -> Option<(String, String, bool)> {
    let target = e.target()?;
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some((input.id(), input.value(), input.checked()));
    }
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return Some((select.id(), select.value(), false));
    }
    let element = e.current_target()?.dyn_into::<Element>().ok()?;
    Some((element.id(), String::new(), false))
}

fn dispatch(e: &Event, on_action: &Callback<EditAction>) {
    if let Some((id, value, checked)) = control_state(e) {
        if let Some(action) = EditAction::from_control(&id, &value, checked) {
            on_action.emit(action);
        }
    }
}

fn change_callback(on_action: &Callback<EditAction>) -> Callback<Event> {
    let on_action = on_action.clone();
    Callback::from(move |e: Event| dispatch(&e, &on_action))
}

fn click_callback(on_action: &Callback<EditAction>) -> Callback<MouseEvent> {
    let on_action = on_action.clone();
    Callback::from(move |e: MouseEvent| dispatch(&e, &on_action))
}

fn difficulty_control(difficulty: Difficulty) -> (&'static str, &'static str) {
    match difficulty {
        Difficulty::Easy => ("includeEasyInput", "Easy"),
        Difficulty::Normal => ("includeNormalInput", "Normal"),
        Difficulty::Hyper => ("includeHyperInput", "Hyper"),
        Difficulty::Ex => ("includeExInput", "EX"),
    }
}

fn tag_control(kind: TagKind) -> (&'static str, &'static str) {
    match kind {
        TagKind::BuggedBpm => ("buggedBpmsSelect", "Bugged BPMs"),
        TagKind::HoldNotes => ("holdNotesSelect", "Hold notes"),
        TagKind::Eemall => ("eemallSelect", "ee'MALL"),
        TagKind::FloorInfection => ("floorInfectionSelect", "Floor infection"),
        TagKind::Omnimix => ("omnimixSelect", "Omnimix"),
        TagKind::Lively => ("livelySelect", "Lively"),
    }
}

fn select_options(options: impl Iterator<Item = (String, String)>, current: &str) -> Html {
    options
        .map(|(value, label)| {
            let selected = value == current;
            html! { <option {value} {selected}>{ label }</option> }
        })
        .collect()
}

/// Free-text range input, committed after typing pauses.
#[derive(Properties, PartialEq)]
pub struct RangeTextInputProps {
    pub id: AttrValue,
    pub text: String,
    pub validate: fn(&str) -> Result<(), String>,
    pub on_action: Callback<EditAction>,
}

#[function_component(RangeTextInput)]
pub fn range_text_input(props: &RangeTextInputProps) -> Html {
    let on_commit = {
        let id = props.id.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |text: String| {
            if let Some(action) = EditAction::from_control(&id, &text, false) {
                on_action.emit(action);
            }
        })
    };
    let field = use_debounced_text(props.text.clone(), props.validate, on_commit);

    html! {
        <div class="form-group range-text">
            <input type="text"
                id={props.id.clone()}
                placeholder="12-34"
                value={field.text.clone()}
                oninput={field.on_input.clone()}
            />
            if let Some(err) = &field.error {
                <div class="current-error compact">{ err }</div>
            }
        </div>
    }
}

fn validate_level_text(text: &str) -> Result<(), String> {
    LevelSpec::<Level>::parse(text).map(|_| ()).map_err(|e| e.to_string())
}

fn validate_sran_level_text(text: &str) -> Result<(), String> {
    LevelSpec::<SranLevel>::parse(text).map(|_| ()).map_err(|e| e.to_string())
}

const RANGE_PLACEHOLDER: &str = "range";

/// Value of the discrete select for a spec: `""` for any, the level when exact.
fn discrete_value<T: RangeDomain>(spec: &LevelSpec<T>, render: impl Fn(T) -> String) -> String {
    match spec {
        LevelSpec::Any => String::new(),
        LevelSpec::Exact(level) => render(*level),
        LevelSpec::Range(_) => RANGE_PLACEHOLDER.to_string(),
    }
}

/// Discrete select plus paired min/max selects with steppers; `prefix` is `level` or `sranLevel`.
fn range_controls(
    prefix: &str,
    label: &str,
    options: Vec<(String, String)>,
    discrete: &str,
    (min, max): (String, String),
    on_action: &Callback<EditAction>,
) -> Html {
    let onchange = change_callback(on_action);
    let onclick = click_callback(on_action);
    let bound = |name: &str, current: &str| {
        html! {
            <div class="stepper">
                <button id={format!("{}{}DownButton", prefix, name)} onclick={onclick.clone()}>{ "-" }</button>
                <select id={format!("{}{}Select", prefix, if name == "Min" { "Lower" } else { "Upper" })}
                    onchange={onchange.clone()}>
                    { select_options(options.iter().cloned(), current) }
                </select>
                <button id={format!("{}{}UpButton", prefix, name)} onclick={onclick.clone()}>{ "+" }</button>
            </div>
        }
    };

    html! {
        <section class="level-controls">
            <label for={format!("{}Select", prefix)}>{ label }</label>
            <select id={format!("{}Select", prefix)} onchange={onchange.clone()}>
                <option value="" selected={discrete.is_empty()}>{ "Any" }</option>
                if discrete == RANGE_PLACEHOLDER {
                    <option value={RANGE_PLACEHOLDER} selected=true disabled=true>{ "Range" }</option>
                }
                { select_options(options.iter().cloned(), discrete) }
            </select>
            { bound("Min", &min) }
            <span>{ "~" }</span>
            { bound("Max", &max) }
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct ControlPanelProps {
    pub config: DrawConfiguration,
    pub version_folders: VersionFolderSet,
    pub summary: String,
    pub drawn_chart_count: usize,
    pub on_action: Callback<EditAction>,
    pub on_draw: Callback<()>,
    pub on_clear: Callback<()>,
}

/// Every draw option plus the draw, clear and reset buttons.
#[function_component(ControlPanel)]
pub fn control_panel(props: &ControlPanelProps) -> Html {
    let config = &props.config;
    let choosing_folders =
        use_state(|| matches!(props.config.folder, FolderFilter::Versions(_)));
    let onchange = change_callback(&props.on_action);
    let onclick = click_callback(&props.on_action);

    let level_section = if config.sran_mode_enabled {
        let bounds = config.sran_level.bounds();
        html! {
            <>
                { range_controls(
                    "sranLevel",
                    "Sran level",
                    SranLevel::all().map(|l| (l.label().to_string(), l.display_name())).collect(),
                    &discrete_value(&config.sran_level, |l| l.label().to_string()),
                    (bounds.min().label().to_string(), bounds.max().label().to_string()),
                    &props.on_action,
                ) }
                <RangeTextInput id="sranLevelAdvInput"
                    text={config.sran_level_text.clone()}
                    validate={validate_sran_level_text as fn(&str) -> Result<(), String>}
                    on_action={props.on_action.clone()} />
            </>
        }
    } else {
        let bounds = config.level.bounds();
        html! {
            <>
                { range_controls(
                    "level",
                    "Level",
                    Level::all().map(|l| (l.to_string(), l.to_string())).collect(),
                    &discrete_value(&config.level, |l| l.to_string()),
                    (bounds.min().to_string(), bounds.max().to_string()),
                    &props.on_action,
                ) }
                <RangeTextInput id="levelAdvInput"
                    text={config.level_text.clone()}
                    validate={validate_level_text as fn(&str) -> Result<(), String>}
                    on_action={props.on_action.clone()} />
            </>
        }
    };

    let difficulty_section = html! {
        <section class="control">
            <label>{ "Difficulties" }</label>
            <input type="radio" id="includeAllDiffsInput" name="includeDiffsRadio"
                checked={!config.difficulties.choose} onchange={onchange.clone()} />
            <label for="includeAllDiffsInput">{ "All" }</label>
            <input type="radio" id="includeChooseDiffsInput" name="includeDiffsRadio"
                checked={config.difficulties.choose} onchange={onchange.clone()} />
            <label for="includeChooseDiffsInput">{ "Choose" }</label>
            if config.difficulties.choose {
                <div class="difficulty-options">
                    { Difficulty::ALL.into_iter().map(|d| {
                        let (id, label) = difficulty_control(d);
                        html! {
                            <span>
                                <input type="checkbox" {id}
                                    checked={config.difficulties.chosen.contains(d)}
                                    onchange={onchange.clone()} />
                                <label for={id}>{ label }</label>
                            </span>
                        }
                    }).collect::<Html>() }
                </div>
            }
            <input type="checkbox" id="onlyIncludeHardestInput"
                checked={config.hardest_only} onchange={onchange.clone()} />
            <label for="onlyIncludeHardestInput">{ "Only hardest difficulty" }</label>
        </section>
    };

    let folder_value = match config.folder {
        FolderFilter::Folder(folder) => folder.id(),
        _ => String::new(),
    };
    let folder_options = std::iter::once((String::new(), "All folders".to_string()))
        .chain(VersionFolder::all().map(|f| (f.id(), f.id())))
        .chain(OtherFolder::ALL.into_iter().map(|f| (f.id().to_string(), f.id().to_string())));
    let choose_folders = {
        let choosing_folders = choosing_folders.clone();
        Callback::from(move |_: Event| choosing_folders.set(true))
    };
    let all_folders = {
        let choosing_folders = choosing_folders.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |e: Event| {
            choosing_folders.set(false);
            dispatch(&e, &on_action);
        })
    };
    let folder_section = html! {
        <section class="control">
            <label for="folderSelect">{ "Folder" }</label>
            <select id="folderSelect" onchange={onchange.clone()}>
                { select_options(folder_options, &folder_value) }
            </select>
            <div class="version-folders">
                <input type="radio" id="includeAllFoldersInput" name="versionFoldersRadio"
                    checked={!*choosing_folders} onchange={all_folders} />
                <label for="includeAllFoldersInput">{ "All versions" }</label>
                <input type="radio" id="includeChooseFoldersInput" name="versionFoldersRadio"
                    checked={*choosing_folders} onchange={choose_folders} />
                <label for="includeChooseFoldersInput">{ "Choose versions" }</label>
                if *choosing_folders {
                    <button id="noneVersionFoldersButton" onclick={onclick.clone()}>{ "None" }</button>
                    { VersionFolder::all().map(|f| {
                        let id = format!("folder{}Input", f.index());
                        html! {
                            <span>
                                <input type="checkbox" id={id.clone()}
                                    checked={props.version_folders.contains(f)}
                                    onchange={onchange.clone()} />
                                <label for={id}>{ f.id() }</label>
                            </span>
                        }
                    }).collect::<Html>() }
                }
            </div>
        </section>
    };

    let tag_section = TagKind::ALL
        .into_iter()
        .map(|kind| {
            let (id, label) = tag_control(kind);
            let disabled = kind.requires_extras() && !config.game_version.supports_extras();
            let options = [IncludeOption::Include, IncludeOption::Exclude, IncludeOption::Only]
                .into_iter()
                .map(|o| (o.as_str().to_string(), o.as_str().to_string()));
            html! {
                <div class="control">
                    <label for={id}>{ label }</label>
                    <select {id} {disabled} onchange={onchange.clone()}>
                        { select_options(options, config.tags.get(kind).as_str()) }
                    </select>
                </div>
            }
        })
        .collect::<Html>();

    let on_draw = {
        let on_draw = props.on_draw.clone();
        Callback::from(move |_: MouseEvent| on_draw.emit(()))
    };
    let on_clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| {
            let confirmed = gloo_utils::window()
                .confirm_with_message("Clear all drawn charts?")
                .unwrap_or(false);
            if confirmed {
                on_clear.emit(());
            }
        })
    };

    html! {
        <div class="control-panel">
            <div class="summary">
                { format!("{} ({} charts drawn)", props.summary, props.drawn_chart_count) }
            </div>
            <div class="top-controls">
                <div class="form-group">
                    <label for="drawCountSelect">{ "Count" }</label>
                    <select id="drawCountSelect" onchange={onchange.clone()}>
                        { select_options(
                            (DRAW_COUNT_MIN..=DRAW_COUNT_MAX).map(|n| (n.to_string(), n.to_string())),
                            &config.count.to_string(),
                        ) }
                    </select>
                </div>
                <button class="draw-button" onclick={on_draw}>{ "Draw" }</button>
                <button class="clear-button" onclick={on_clear}>{ "Clear" }</button>
            </div>
            <div class="form-group">
                <input type="checkbox" id="isSranModeEnabledInput"
                    checked={config.sran_mode_enabled} onchange={onchange.clone()} />
                <label for="isSranModeEnabledInput">{ "Sran mode" }</label>
            </div>
            { level_section }
            { difficulty_section }
            { folder_section }
            <section class="tags">{ tag_section }</section>
            <div class="form-group">
                <label for="gameVersionSelect">{ "Game version" }</label>
                <select id="gameVersionSelect" onchange={onchange.clone()}>
                    { select_options(
                        GameVersion::ALL
                            .into_iter()
                            .map(|v| (v.as_str().to_string(), v.display_name().to_string())),
                        config.game_version.as_str(),
                    ) }
                </select>
            </div>
            <button id="resetButton" onclick={onclick}>{ "Reset to defaults" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SetListProps {
    pub sets: Rc<Vec<DrawnChartSet>>,
}

/// Drawn sets, latest first.
#[function_component(SetList)]
pub fn set_list(props: &SetListProps) -> Html {
    if props.sets.is_empty() {
        return html! {
            <div class="results">
                <p class="no-results-message">{ "No charts drawn yet" }</p>
            </div>
        };
    }

    html! {
        <div class="results">
            { props.sets.iter().enumerate().rev().map(|(idx, set)| render_set(idx, set)).collect::<Html>() }
        </div>
    }
}

fn render_set(idx: usize, set: &DrawnChartSet) -> Html {
    html! {
        <div class="chart-set">
            <h3>{ format!(
                "Set {} ({}, {})",
                idx + 1,
                set.game_version.display_name(),
                format_drawn_at(set.drawn_at)
            ) }</h3>
            if set.charts.is_empty() {
                <p class="no-results-message">{ "No charts matched" }</p>
            }
            <ul class="charts">
                { set.charts.iter().map(|chart| {
                    let title = if chart.title.is_empty() { &chart.id } else { &chart.title };
                    let detail = match &chart.sran_level {
                        Some(sran) => format!("{} {} (sran {})", chart.difficulty, chart.level, sran),
                        None => format!("{} {}", chart.difficulty, chart.level),
                    };
                    html! {
                        <li class={classes!("chart", format!("diff-{}", chart.difficulty))}>
                            <span class="genre">{ &chart.genre }</span>
                            <span class="title">{ title }</span>
                            <span class="detail">{ detail }</span>
                        </li>
                    }
                }).collect::<Html>() }
            </ul>
        </div>
    }
}
