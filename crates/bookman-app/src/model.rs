// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

/// One book row as loaded from a CSV file, plus edit-tracking metadata.
///
/// `id` is assigned at parse time and never comes from the input data.
/// `original` anchors the values as they were at load time; it is captured
/// lazily on the first edit and never reassigned afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub isbn: String,
    pub modified: bool,
    pub original: Option<BookSnapshot>,
}

/// The editable field values of a record as they were at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub isbn: String,
}

impl Book {
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            published_year: self.published_year,
            isbn: self.isbn.clone(),
        }
    }

    pub fn field_text(&self, field: BookField) -> String {
        match field {
            BookField::Title => self.title.clone(),
            BookField::Author => self.author.clone(),
            BookField::Genre => self.genre.clone(),
            BookField::PublishedYear => self.published_year.to_string(),
            BookField::Isbn => self.isbn.clone(),
        }
    }

    /// Applies raw input text to one editable field. Year input goes through
    /// the same coercion rule as CSV ingestion.
    pub fn set_field(&mut self, field: BookField, raw: &str) {
        match field {
            BookField::Title => self.title = raw.to_owned(),
            BookField::Author => self.author = raw.to_owned(),
            BookField::Genre => self.genre = raw.to_owned(),
            BookField::PublishedYear => self.published_year = coerce_year(raw),
            BookField::Isbn => self.isbn = raw.to_owned(),
        }
    }

    /// True iff at least one editable field differs from `snapshot`.
    pub fn differs_from(&self, snapshot: &BookSnapshot) -> bool {
        self.title != snapshot.title
            || self.author != snapshot.author
            || self.genre != snapshot.genre
            || self.published_year != snapshot.published_year
            || self.isbn != snapshot.isbn
    }

    /// Recomputes the cached modified flag from (current fields, snapshot).
    /// A record with no snapshot has never been edited.
    pub fn recompute_modified(&mut self) {
        self.modified = match &self.original {
            Some(snapshot) => self.differs_from(snapshot),
            None => false,
        };
    }

    /// True when the value in `field` differs from the loaded value. Drives
    /// the per-cell highlight for edited records.
    pub fn field_changed(&self, field: BookField) -> bool {
        let Some(snapshot) = &self.original else {
            return false;
        };
        match field {
            BookField::Title => self.title != snapshot.title,
            BookField::Author => self.author != snapshot.author,
            BookField::Genre => self.genre != snapshot.genre,
            BookField::PublishedYear => self.published_year != snapshot.published_year,
            BookField::Isbn => self.isbn != snapshot.isbn,
        }
    }
}

/// The closed set of editable fields. Identity and edit-tracking metadata are
/// not members, so they cannot be targeted by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookField {
    Title,
    Author,
    Genre,
    PublishedYear,
    Isbn,
}

impl BookField {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Author,
        Self::Genre,
        Self::PublishedYear,
        Self::Isbn,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::PublishedYear => "published_year",
            Self::Isbn => "isbn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "genre" => Some(Self::Genre),
            "published_year" => Some(Self::PublishedYear),
            "isbn" => Some(Self::Isbn),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Genre => "Genre",
            Self::PublishedYear => "Year",
            Self::Isbn => "ISBN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Fields a table view can order by. Every editable field is sortable; text
/// fields compare case-insensitively, the year compares numerically.
pub type SortField = BookField;

/// Coerces raw year input to an integer the way both ingestion and editing
/// do: trim, optional sign, then the longest leading run of ASCII digits.
/// Anything else (including overflow) coerces to 0.
pub fn coerce_year(raw: &str) -> i32 {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let mut index = 0usize;
    let negative = match bytes.first() {
        Some(b'-') => {
            index = 1;
            true
        }
        Some(b'+') => {
            index = 1;
            false
        }
        _ => false,
    };

    let start = index;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    if index == start {
        return 0;
    }

    let digits = &trimmed[start..index];
    let Ok(value) = digits.parse::<i32>() else {
        return 0;
    };
    if negative { -value } else { value }
}
