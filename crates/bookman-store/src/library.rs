// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use bookman_app::{Book, BookField, BookId, ResetDecision};

/// The authoritative record store: the live working list the user edits, and
/// the pristine list captured at load time that anchors diffing and reset.
///
/// Both lists always have the same length and the same id sequence; rows are
/// never inserted or deleted, only replaced wholesale by the next load.
#[derive(Debug, Clone, Default)]
pub struct Library {
    working: Vec<Book>,
    pristine: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole session: working list takes `books`, the pristine
    /// list takes an independent deep copy. Filter/sort/page state belongs to
    /// the caller and is the caller's to clear.
    pub fn load(&mut self, books: Vec<Book>) {
        self.working = books;
        self.pristine = self.working.clone();
    }

    pub fn books(&self) -> &[Book] {
        &self.working
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.working.iter().find(|book| book.id == id)
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Applies one field edit. Unknown ids are a silent no-op. The first edit
    /// to a record captures its snapshot from the pristine entry with the
    /// matching id; afterwards the modified flag is recomputed from scratch,
    /// so editing a value back to its original clears the flag again.
    pub fn update_field(&mut self, id: BookId, field: BookField, raw: &str) {
        let Some(book) = self.working.iter_mut().find(|book| book.id == id) else {
            return;
        };

        if book.original.is_none() {
            book.original = self
                .pristine
                .iter()
                .find(|pristine| pristine.id == id)
                .map(Book::snapshot);
        }

        book.set_field(field, raw);
        book.recompute_modified();
    }

    /// Restores the working list from the pristine copy, clearing all edit
    /// tracking. Only a `Confirmed` decision has any effect; the return value
    /// says whether the reset ran.
    pub fn reset_all(&mut self, decision: ResetDecision) -> bool {
        match decision {
            ResetDecision::Confirmed => {
                self.working = self.pristine.clone();
                true
            }
            ResetDecision::Declined => false,
        }
    }

    pub fn count_modified(&self) -> usize {
        self.working.iter().filter(|book| book.modified).count()
    }
}
