//! Shared state machine of the record-sequence parsers.
//!
//! A parser keeps at most one record in progress (a *draft*) next to the list of
//! finished records. Starting a new draft finalizes the previous one, and the end
//! of the section finalizes whatever is left. Drafts never reach the output
//! without passing through `Draft::finalize`.

/// A record still being assembled from lines.
pub trait Draft {
    type Entry;

    /// Turns the draft into a finished record, or `None` when it carries nothing
    /// worth keeping.
    fn finalize(self) -> Option<Self::Entry>;
}

pub struct RecordSequence<D: Draft> {
    current: Option<D>,
    completed: Vec<D::Entry>,
}

impl<D: Draft> Default for RecordSequence<D> {
    fn default() -> Self {
        Self {
            current: None,
            completed: Vec::new(),
        }
    }
}

impl<D: Draft> RecordSequence<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes the record in progress, then opens `draft`.
    pub fn start(&mut self, draft: D) {
        self.flush();
        self.current = Some(draft);
    }

    pub fn current(&self) -> Option<&D> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut D> {
        self.current.as_mut()
    }

    /// The record in progress, opening an empty one when none exists.
    pub fn current_or_start(&mut self) -> &mut D
    where
        D: Default,
    {
        self.current.get_or_insert_with(D::default)
    }

    pub fn flush(&mut self) {
        if let Some(entry) = self.current.take().and_then(Draft::finalize) {
            self.completed.push(entry);
        }
    }

    pub fn finish(mut self) -> Vec<D::Entry> {
        self.flush();
        self.completed
    }
}
