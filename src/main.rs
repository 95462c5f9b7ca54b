//! Main module for the pop'n music chart randomizer using Yew.
//! Owns the options store and wires it to the view components.

use popn_randomizer::storage::{KeyValueStore, LocalStore, MemoryStore};
use popn_randomizer::{logging, EditAction, OptionsStore};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::BeforeUnloadEvent;
use yew::prelude::*;

mod bridge;
mod components;
mod hooks;

use bridge::JsDatabase;
use components::{ControlPanel, SetList};

type Store = OptionsStore<Box<dyn KeyValueStore>, JsDatabase>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// localStorage when the browser grants it, otherwise a session-only map.
fn open_storage() -> Box<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; options will not survive a reload", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// Bump the revision counter so the app re-renders from the store.
fn bump_revision(revision: &UseStateHandle<u64>) {
    revision.set(revision.wrapping_add(1));
}

// ──────────────────────────────────────────────────────────────────────────────
// Main App component

#[function_component(App)]
fn app() -> Html {
    let store = use_mut_ref(|| Store::load(open_storage(), JsDatabase));
    let revision = use_state(|| 0u64);

    // Ask before leaving when the session holds more than the persisted history keeps.
    {
        let store = store.clone();
        use_effect_with((), move |_| {
            let listener = Closure::<dyn Fn(BeforeUnloadEvent)>::new(move |event: BeforeUnloadEvent| {
                if store.borrow().should_prompt_before_unload() {
                    event.prevent_default();
                    event.set_return_value("");
                }
            });
            let window = gloo_utils::window();
            if let Err(e) = window
                .add_event_listener_with_callback("beforeunload", listener.as_ref().unchecked_ref())
            {
                log::warn!("Could not install unload guard: {:?}", e);
            }
            move || {
                let _ = window.remove_event_listener_with_callback(
                    "beforeunload",
                    listener.as_ref().unchecked_ref(),
                );
            }
        });
    }

    let on_action = {
        let store = store.clone();
        let revision = revision.clone();
        Callback::from(move |action: EditAction| {
            let changed = store.borrow_mut().apply(action);
            log::debug!("Updated {:?}", changed);
            bump_revision(&revision);
        })
    };

    let on_draw = {
        let store = store.clone();
        let revision = revision.clone();
        Callback::from(move |_: ()| {
            let drawn = store.borrow_mut().draw().charts.len();
            log::info!("Drew {} charts", drawn);
            bump_revision(&revision);
        })
    };

    let on_clear = {
        let store = store.clone();
        let revision = revision.clone();
        Callback::from(move |_: ()| {
            store.borrow_mut().clear();
            bump_revision(&revision);
        })
    };

    let (config, version_folders, summary, drawn_chart_count, sets) = {
        let current = store.borrow();
        (
            current.config().clone(),
            current.version_folders(),
            current.summary(),
            current.drawn_chart_count(),
            Rc::new(current.history().to_vec()),
        )
    };

    html! {
        <div class="container">
            <ControlPanel
                {config}
                {version_folders}
                {summary}
                {drawn_chart_count}
                {on_action}
                {on_draw}
                {on_clear}
            />
            <SetList {sets} />
        </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    yew::Renderer::<App>::new().render();
}
