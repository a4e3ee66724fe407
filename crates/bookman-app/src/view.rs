// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Book, SortDirection, SortField};

/// Substring criteria for the four filterable columns. An empty criterion
/// matches every record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKey {
    Title,
    Author,
    Genre,
    Year,
}

impl FilterKey {
    pub const ALL: [Self; 4] = [Self::Title, Self::Author, Self::Genre, Self::Year];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Year => "year",
        }
    }
}

impl FilterCriteria {
    pub fn get(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Title => &self.title,
            FilterKey::Author => &self.author,
            FilterKey::Genre => &self.genre,
            FilterKey::Year => &self.year,
        }
    }

    pub fn set(&mut self, key: FilterKey, text: String) {
        match key {
            FilterKey::Title => self.title = text,
            FilterKey::Author => self.author = text,
            FilterKey::Genre => self.genre = text,
            FilterKey::Year => self.year = text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.genre.is_empty()
            && self.year.is_empty()
    }

    /// Text columns match case-insensitively as substrings. The year
    /// criterion matches as a substring of the decimal rendering, so "196"
    /// matches 1965 and 1196 alike. That loose match is inherited behavior,
    /// kept on purpose.
    pub fn matches(&self, book: &Book) -> bool {
        contains_ci(&book.title, &self.title)
            && contains_ci(&book.author, &self.author)
            && contains_ci(&book.genre, &self.genre)
            && (self.year.is_empty() || book.published_year.to_string().contains(&self.year))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

pub fn filter<'a>(books: &'a [Book], criteria: &FilterCriteria) -> Vec<&'a Book> {
    books.iter().filter(|book| criteria.matches(book)).collect()
}

/// Stable sort; with no spec the input order is preserved (no sort pass).
pub fn sort<'a>(mut books: Vec<&'a Book>, spec: Option<SortSpec>) -> Vec<&'a Book> {
    let Some(spec) = spec else {
        return books;
    };
    books.sort_by(|left, right| {
        let ordering = compare_field(left, right, spec.field);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    books
}

fn compare_field(left: &Book, right: &Book, field: SortField) -> Ordering {
    match field {
        SortField::PublishedYear => left.published_year.cmp(&right.published_year),
        SortField::Title => compare_text(&left.title, &right.title),
        SortField::Author => compare_text(&left.author, &right.author),
        SortField::Genre => compare_text(&left.genre, &right.genre),
        SortField::Isbn => compare_text(&left.isbn, &right.isbn),
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// 1-indexed pagination, clipped to bounds; pages past the end are empty.
pub fn paginate<'a>(books: &[&'a Book], page_size: usize, page_number: usize) -> Vec<&'a Book> {
    if page_size == 0 || page_number == 0 {
        return Vec::new();
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= books.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(books.len());
    books[start..end].to_vec()
}

pub fn page_count(filtered: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    filtered.div_ceil(page_size).max(1)
}

/// The filter/sort/page criteria a table view holds between queries. Any
/// criteria change snaps the page back to 1 so a stale offset can never point
/// into a shorter or reordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub filters: FilterCriteria,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: FilterCriteria::default(),
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn set_filter(&mut self, key: FilterKey, text: String) {
        self.filters.set(key, text);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterCriteria::default();
        self.page = 1;
    }

    /// Sorting the already-sorted field toggles direction; a new field starts
    /// ascending. Either way the page resets.
    pub fn cycle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(spec) if spec.field == field => SortSpec {
                field,
                direction: spec.direction.flipped(),
            },
            _ => SortSpec {
                field,
                direction: SortDirection::Asc,
            },
        });
        self.page = 1;
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// One materialized page of the derived view, plus the counts the header and
/// pager need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPage {
    pub books: Vec<Book>,
    pub filtered: usize,
    pub page: usize,
    pub page_count: usize,
}

impl ViewPage {
    pub fn empty() -> Self {
        Self {
            books: Vec::new(),
            filtered: 0,
            page: 1,
            page_count: 1,
        }
    }

    /// 1-based index of the first visible row, for "showing a-b of m" text.
    pub fn first_row_index(&self, page_size: usize) -> usize {
        if self.books.is_empty() {
            return 0;
        }
        (self.page - 1) * page_size + 1
    }
}

/// Fixed composition order: filter, then sort, then paginate.
pub fn visible_page(books: &[Book], view: &ViewState) -> ViewPage {
    let filtered = filter(books, &view.filters);
    let filtered_count = filtered.len();
    let ordered = sort(filtered, view.sort);
    let page = paginate(&ordered, view.page_size, view.page);
    ViewPage {
        books: page.into_iter().cloned().collect(),
        filtered: filtered_count,
        page: view.page,
        page_count: page_count(filtered_count, view.page_size),
    }
}
