// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod csv;
pub mod io;
pub mod library;

pub use csv::{generate_csv, parse_csv};
pub use io::{export_csv_file, read_csv_file, validate_csv_path};
pub use library::Library;

pub const APP_NAME: &str = "bookman";
pub const DEFAULT_EXPORT_FILENAME: &str = "edited-books.csv";
pub const DEFAULT_PAGE_SIZE: usize = 50;
