// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use bookman_app::{BookField, BookId, ResetDecision, ViewPage, ViewState, visible_page};
use bookman_store::Library;
use std::path::{Path, PathBuf};

/// Bridges the UI onto the in-memory library and the CSV files around it.
pub struct StoreRuntime {
    library: Library,
    source: Option<PathBuf>,
    export_filename: String,
}

impl StoreRuntime {
    pub fn new(export_filename: impl Into<String>) -> Self {
        Self {
            library: Library::new(),
            source: None,
            export_filename: export_filename.into(),
        }
    }

    /// Loads a file into the library, replacing any prior session. Returns
    /// the number of records kept.
    pub fn load_csv(&mut self, path: &Path) -> Result<usize> {
        let books = bookman_store::read_csv_file(path)?;
        let count = books.len();
        self.library.load(books);
        self.source = Some(path.to_path_buf());
        Ok(count)
    }

    /// Seeds an in-memory session without touching the filesystem.
    pub fn load_books(&mut self, books: Vec<bookman_app::Book>, label: &str) {
        self.library.load(books);
        self.source = Some(PathBuf::from(label));
    }

    /// Export lands next to the source file, or in the working directory
    /// for seeded sessions.
    fn export_path(&self) -> PathBuf {
        let filename = Path::new(&self.export_filename);
        match self.source.as_ref().and_then(|source| source.parent()) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(filename),
            _ => filename.to_path_buf(),
        }
    }
}

impl bookman_tui::AppRuntime for StoreRuntime {
    fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    fn source_name(&self) -> Option<String> {
        self.source.as_ref().map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
    }

    fn visible_page(&self, view: &ViewState) -> ViewPage {
        visible_page(self.library.books(), view)
    }

    fn total_count(&self) -> usize {
        self.library.len()
    }

    fn modified_count(&self) -> usize {
        self.library.count_modified()
    }

    fn update_field(&mut self, id: BookId, field: BookField, raw: &str) {
        self.library.update_field(id, field, raw);
    }

    fn reset_all(&mut self, decision: ResetDecision) -> bool {
        self.library.reset_all(decision)
    }

    fn export_csv(&mut self) -> Result<PathBuf> {
        let path = self.export_path();
        bookman_store::export_csv_file(&path, self.library.books())?;
        Ok(path)
    }
}
