//! State behind a debounced free-text field.
//!
//! `H` is the handle of the armed commit timer; dropping it cancels the
//! commit (as `gloo_timers::callback::Timeout` does).

/// Text being typed, its validation message and the commit waiting to fire.
pub struct DebouncedField<H> {
    text: String,
    error: Option<String>,
    pending: Option<H>,
}

impl<H> DebouncedField<H> {
    pub fn new(committed: String) -> Self {
        Self {
            text: committed,
            error: None,
            pending: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a keystroke and arm `handle` to commit it. An earlier commit is cancelled.
    pub fn input(&mut self, text: String, error: Option<String>, handle: H) {
        self.text = text;
        self.error = error;
        self.pending = Some(handle);
    }

    /// Follow a committed value that changed elsewhere, e.g. through a stepper.
    ///
    /// Returns `true` when the field changed. Typed text that has not been
    /// committed yet is discarded along with its timer.
    pub fn sync(&mut self, committed: &str) -> bool {
        if self.text == committed {
            return false;
        }
        self.text = committed.to_string();
        self.error = None;
        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how many timers were cancelled.
    struct Timer(Rc<Cell<usize>>);

    impl Drop for Timer {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn typing_restarts_the_timer() {
        let cancelled = Rc::new(Cell::new(0));
        let mut field = DebouncedField::new("30-40".to_string());
        field.input("1".into(), None, Timer(cancelled.clone()));
        field.input("12".into(), None, Timer(cancelled.clone()));
        assert_eq!(cancelled.get(), 1);
        assert_eq!(field.text(), "12");
        assert!(field.is_pending());
    }

    #[test]
    fn outside_edit_cancels_uncommitted_text() {
        let cancelled = Rc::new(Cell::new(0));
        let mut field = DebouncedField::new("30-40".to_string());
        field.input("12-3".into(), None, Timer(cancelled.clone()));

        // A stepper rewrote the committed text before the timer fired.
        assert!(field.sync("29-40"));
        assert_eq!(cancelled.get(), 1);
        assert!(!field.is_pending());
        assert_eq!(field.text(), "29-40");
    }

    #[test]
    fn own_commit_echo_leaves_field_alone() {
        let cancelled = Rc::new(Cell::new(0));
        let mut field = DebouncedField::new(String::new());
        field.input("34-12".into(), Some("inverted".into()), Timer(cancelled.clone()));
        assert!(!field.sync("34-12"));
        assert_eq!(field.error(), Some("inverted"));
        assert_eq!(cancelled.get(), 0);
    }
}
