// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic fixture data for tests and demo sessions. The same seed
//! always produces the same books, so assertions can rely on exact values
//! without checked-in fixture files.

use bookman_app::{Book, BookId};

const TITLE_OPENERS: [&str; 14] = [
    "The Last", "A Winter", "Shadows of", "Beyond the", "The Silent", "Children of", "House of",
    "The Glass", "Songs of", "Return to", "The Burning", "Letters from", "The Hidden", "Daughters of",
];

const TITLE_SUBJECTS: [&str; 16] = [
    "Harbor", "Garden", "Empire", "Orchard", "River", "Mountain", "Library", "Lighthouse",
    "Meridian", "Archive", "Forest", "Cartographer", "Observatory", "Tide", "Lantern", "Crossing",
];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];

const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const GENRES: [&str; 10] = [
    "Science Fiction",
    "Fantasy",
    "Mystery",
    "Romance",
    "Thriller",
    "Historical Fiction",
    "Literary Fiction",
    "Horror",
    "Biography",
    "Poetry",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone)]
pub struct BookFaker {
    rng: DeterministicRng,
}

impl BookFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
        }
    }

    /// One book with the given id. The id is the caller's concern; every
    /// other field comes from the seeded stream.
    pub fn book(&mut self, id: i64) -> Book {
        Book {
            id: BookId::new(id),
            title: format!(
                "{} {}",
                self.pick(&TITLE_OPENERS),
                self.pick(&TITLE_SUBJECTS),
            ),
            author: format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES)),
            genre: self.pick(&GENRES).to_owned(),
            published_year: self.int_range_i32(1890, 2024),
            isbn: format!(
                "978{:04}{:06}",
                self.int_range_i32(0, 9_999),
                self.int_range_i32(0, 999_999),
            ),
            modified: false,
            original: None,
        }
    }

    /// A list of `count` books with ids 1..=count, the shape a freshly
    /// parsed file would have.
    pub fn books(&mut self, count: usize) -> Vec<Book> {
        (1..=count as i64).map(|id| self.book(id)).collect()
    }

    /// The same books rendered as importable CSV text. Text values are left
    /// unquoted so the file also exercises the bare-value parse path.
    pub fn csv(&mut self, count: usize) -> String {
        let mut lines = vec!["Title,Author,Genre,PublishedYear,ISBN".to_owned()];
        for book in self.books(count) {
            lines.push(format!(
                "{},{},{},{},{}",
                book.title, book.author, book.genre, book.published_year, book.isbn,
            ));
        }
        lines.join("\n")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }
}

/// Fixed records used by tests that assert on exact values.
pub fn known_books() -> Vec<Book> {
    let raw: [(&str, &str, &str, i32, &str); 4] = [
        ("Dune", "Frank Herbert", "Science Fiction", 1965, "9780441013593"),
        ("Emma", "Jane Austen", "Romance", 1815, "9780141439587"),
        ("Neuromancer", "William Gibson", "Science Fiction", 1984, "9780441569595"),
        ("Beloved", "Toni Morrison", "Literary Fiction", 1987, "9781400033416"),
    ];
    raw.iter()
        .enumerate()
        .map(|(index, (title, author, genre, year, isbn))| Book {
            id: BookId::new(index as i64 + 1),
            title: (*title).to_owned(),
            author: (*author).to_owned(),
            genre: (*genre).to_owned(),
            published_year: *year,
            isbn: (*isbn).to_owned(),
            modified: false,
            original: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::BookFaker;

    #[test]
    fn same_seed_produces_the_same_books() {
        let a = BookFaker::new(42).books(10);
        let b = BookFaker::new(42).books(10);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = BookFaker::new(1).books(10);
        let b = BookFaker::new(2).books(10);
        assert_ne!(a, b);
    }

    #[test]
    fn ids_run_from_one() {
        let books = BookFaker::new(7).books(3);
        let ids: Vec<i64> = books.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn csv_has_a_header_and_one_line_per_book() {
        let text = BookFaker::new(7).csv(5);
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("Title,Author,Genre,PublishedYear,ISBN\n"));
    }
}
