// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bookman_app::Book;

use crate::csv::{generate_csv, parse_csv};

/// Rejects paths without a `.csv` extension (matched case-insensitively)
/// before any file IO happens, so the error names the path instead of a
/// parser symptom.
pub fn validate_csv_path(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!(
            "{} is not a CSV file, expected a .csv extension",
            path.display()
        );
    }
    Ok(())
}

pub fn read_csv_file(path: &Path) -> Result<Vec<Book>> {
    validate_csv_path(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_csv(&text))
}

pub fn export_csv_file(path: &Path, books: &[Book]) -> Result<()> {
    fs::write(path, generate_csv(books))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
