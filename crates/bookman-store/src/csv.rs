// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Line-oriented CSV codec for book records.
//!
//! The format is deliberately naive: values are split on every comma, quotes
//! are stripped from value edges but never escaped, and embedded commas or
//! newlines inside values are not supported. Generated output always quotes
//! the four text columns and leaves the year bare.

use bookman_app::{coerce_year, Book, BookId};

const HEADER: &str = "Title,Author,Genre,PublishedYear,ISBN";

/// Column positions resolved from a header row by case-insensitive name.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    title: Option<usize>,
    author: Option<usize>,
    genre: Option<usize>,
    published_year: Option<usize>,
    isbn: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Self {
        let mut map = Self::default();
        for (index, cell) in header.split(',').enumerate() {
            match cell.trim().to_lowercase().as_str() {
                "title" => map.title = Some(index),
                "author" => map.author = Some(index),
                "genre" => map.genre = Some(index),
                "publishedyear" | "published year" => map.published_year = Some(index),
                "isbn" => map.isbn = Some(index),
                _ => {}
            }
        }
        map
    }
}

/// Parses CSV text into books. Parsing never fails: rows with fewer than
/// five values are dropped, unmapped columns yield empty fields, and years
/// that do not start with a number coerce to 0.
///
/// Record ids are the 1-based position of each data row in the file, so a
/// dropped row leaves a gap in the id sequence rather than renumbering what
/// follows it.
pub fn parse_csv(text: &str) -> Vec<Book> {
    let mut lines = text.trim().split('\n');
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns = ColumnMap::from_header(header);

    let mut books = Vec::new();
    for (row_index, line) in lines.enumerate() {
        let values: Vec<String> = line.split(',').map(clean_value).collect();
        if values.len() < 5 {
            continue;
        }

        let pick = |column: Option<usize>| -> String {
            column
                .and_then(|index| values.get(index))
                .cloned()
                .unwrap_or_default()
        };

        books.push(Book {
            id: BookId::new(row_index as i64 + 1),
            title: pick(columns.title),
            author: pick(columns.author),
            genre: pick(columns.genre),
            published_year: coerce_year(&pick(columns.published_year)),
            isbn: pick(columns.isbn),
            modified: false,
            original: None,
        });
    }
    books
}

/// Trims a raw cell and strips one leading and one trailing double quote
/// independently, so `"open` and `shut"` both lose their quote.
fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = trimmed.strip_prefix('"').unwrap_or(trimmed);
    without_leading
        .strip_suffix('"')
        .unwrap_or(without_leading)
        .to_owned()
}

/// Renders books back to CSV. Text columns are always quoted, the year is
/// written bare, rows are joined with `\n`, and there is no trailing newline.
pub fn generate_csv(books: &[Book]) -> String {
    let mut lines = Vec::with_capacity(books.len() + 1);
    lines.push(HEADER.to_owned());
    for book in books {
        lines.push(format!(
            "\"{}\",\"{}\",\"{}\",{},\"{}\"",
            book.title, book.author, book.genre, book.published_year, book.isbn,
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{clean_value, generate_csv, parse_csv};
    use bookman_app::BookId;

    #[test]
    fn parses_a_basic_file() {
        let text = "Title,Author,Genre,PublishedYear,ISBN\n\
                    \"Dune\",\"Frank Herbert\",\"Science Fiction\",1965,\"9780441013593\"\n\
                    \"Emma\",\"Jane Austen\",\"Romance\",1815,\"9780141439587\"";
        let books = parse_csv(text);

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, BookId::new(1));
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].published_year, 1965);
        assert_eq!(books[1].isbn, "9780141439587");
        assert!(!books[0].modified);
        assert!(books[0].original.is_none());
    }

    #[test]
    fn header_names_are_matched_case_insensitively_in_any_order() {
        let text = "isbn,TITLE,published year,Author,genre\n\
                    111,Dune,1965,Frank Herbert,SF";
        let books = parse_csv(text);

        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].genre, "SF");
        assert_eq!(books[0].published_year, 1965);
        assert_eq!(books[0].isbn, "111");
    }

    #[test]
    fn short_rows_are_dropped_and_leave_id_gaps() {
        let text = "Title,Author,Genre,PublishedYear,ISBN\n\
                    A,B,C,1,x\n\
                    too,short\n\
                    D,E,F,2,y";
        let books = parse_csv(text);

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, BookId::new(1));
        assert_eq!(books[1].id, BookId::new(3));
    }

    #[test]
    fn unmapped_columns_fall_back_to_empty_values() {
        let text = "Title,Author,Genre,PublishedYear\n\
                    A,B,C,1999,extra";
        let books = parse_csv(text);

        assert_eq!(books[0].isbn, "");
        assert_eq!(books[0].published_year, 1999);
    }

    #[test]
    fn unparseable_years_coerce_to_zero() {
        let text = "Title,Author,Genre,PublishedYear,ISBN\n\
                    A,B,C,unknown,x";
        assert_eq!(parse_csv(text)[0].published_year, 0);
    }

    #[test]
    fn empty_and_header_only_input_yield_no_books() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("   \n  ").is_empty());
        assert!(parse_csv("Title,Author,Genre,PublishedYear,ISBN").is_empty());
    }

    #[test]
    fn quote_stripping_handles_each_edge_independently() {
        assert_eq!(clean_value("\"both\""), "both");
        assert_eq!(clean_value("\"open"), "open");
        assert_eq!(clean_value("shut\""), "shut");
        assert_eq!(clean_value("  spaced  "), "spaced");
        assert_eq!(clean_value("mid\"dle"), "mid\"dle");
    }

    #[test]
    fn generated_output_quotes_text_and_leaves_the_year_bare() {
        let books = parse_csv(
            "Title,Author,Genre,PublishedYear,ISBN\n\
             Dune,Frank Herbert,SF,1965,111",
        );
        let text = generate_csv(&books);

        assert_eq!(
            text,
            "Title,Author,Genre,PublishedYear,ISBN\n\
             \"Dune\",\"Frank Herbert\",\"SF\",1965,\"111\"",
        );
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn generated_output_survives_a_reparse() {
        let original = parse_csv(
            "Title,Author,Genre,PublishedYear,ISBN\n\
             \"Dune\",\"Frank Herbert\",\"Science Fiction\",1965,\"9780441013593\"",
        );
        let reparsed = parse_csv(&generate_csv(&original));

        assert_eq!(original.len(), reparsed.len());
        assert_eq!(original[0].title, reparsed[0].title);
        assert_eq!(original[0].published_year, reparsed[0].published_year);
    }

    #[test]
    fn generating_an_empty_list_emits_only_the_header() {
        assert_eq!(generate_csv(&[]), "Title,Author,Genre,PublishedYear,ISBN");
    }
}
