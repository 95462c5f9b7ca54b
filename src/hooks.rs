use gloo_timers::callback::Timeout;
use popn_randomizer::config::DEBOUNCE_MS;
use popn_randomizer::debounce::DebouncedField;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the state and callbacks for a debounced free-text field.
#[derive(Clone)]
pub struct DebouncedText {
    /// The current text content of the input field.
    pub text: String,
    /// Validation message for the current text, if any.
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event.
    pub on_input: Callback<InputEvent>,
}

/// Custom hook for a text field whose value is committed after typing pauses.
///
/// `committed` is the value the owner currently holds; when it changes from
/// outside (e.g. a stepper rewrote it) the field follows and drops any commit
/// still waiting. Every keystroke restarts the [`DEBOUNCE_MS`] timer and only
/// the last text is emitted.
#[hook]
pub fn use_debounced_text(
    committed: String,
    validate: fn(&str) -> Result<(), String>,
    on_commit: Callback<String>,
) -> DebouncedText {
    let field = use_mut_ref(|| DebouncedField::<Timeout>::new(committed.clone()));
    let rerender = use_force_update();

    let on_input = {
        let field = field.clone();
        let rerender = rerender.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            let error = validate(&value).err();

            let on_commit = on_commit.clone();
            let commit_value = value.clone();
            let timer = Timeout::new(DEBOUNCE_MS, move || on_commit.emit(commit_value));
            field.borrow_mut().input(value, error, timer);
            rerender.force_update();
        })
    };

    {
        let field = field.clone();
        use_effect_with(committed, move |committed| {
            if field.borrow_mut().sync(committed) {
                rerender.force_update();
            }
            || ()
        });
    }

    let (text, error) = {
        let current = field.borrow();
        (current.text().to_string(), current.error().map(str::to_string))
    };
    DebouncedText {
        text,
        error,
        on_input,
    }
}
