//! Sort/filter derivation of the visible result list.
//!
//! Filters and comparators are looked up from tables keyed by
//! [`FilterKey`] and [`SortKey`]; adding an option means adding a variant
//! and a table row. [`derive`] never touches the network or its input.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::BookRecord;

/// First year counted by the `recent` filter.
pub const RECENT_FROM: i32 = 2010;
/// Years before this are `classic`.
pub const CLASSIC_BEFORE: i32 = 2000;

/// Stand-ins for an unknown year so that it sorts last in both directions.
const UNKNOWN_YEAR_DESC: i32 = 0;
const UNKNOWN_YEAR_ASC: i32 = 9999;

// ─── Keys ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    YearDesc,
    YearAsc,
    Title,
    Author,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    #[default]
    All,
    Ebook,
    Recent,
    Classic,
}

type Predicate = fn(&BookRecord) -> bool;
type Comparator = fn(&BookRecord, &BookRecord) -> Ordering;

const SORT_TABLE: [(SortKey, &str, &str, Option<Comparator>); 5] = [
    (SortKey::Relevance, "relevance", "Most Relevant", None),
    (SortKey::YearDesc, "year_desc", "Newest First", Some(by_year_desc)),
    (SortKey::YearAsc, "year_asc", "Oldest First", Some(by_year_asc)),
    (SortKey::Title, "title", "Title A-Z", Some(by_title)),
    (SortKey::Author, "author", "Author A-Z", Some(by_author)),
];

const FILTER_TABLE: [(FilterKey, &str, &str, Predicate); 4] = [
    (FilterKey::All, "all", "All Books", keep_all),
    (FilterKey::Ebook, "ebook", "eBooks Only", has_ebook),
    (FilterKey::Recent, "recent", "Recent (2010+)", is_recent),
    (FilterKey::Classic, "classic", "Classics (Before 2000)", is_classic),
];

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Relevance,
        SortKey::YearDesc,
        SortKey::YearAsc,
        SortKey::Title,
        SortKey::Author,
    ];

    pub fn as_str(self) -> &'static str {
        SORT_TABLE[self as usize].1
    }

    pub fn label(self) -> &'static str {
        SORT_TABLE[self as usize].2
    }

    /// `None` keeps the order the list arrived in.
    pub fn comparator(self) -> Option<Comparator> {
        SORT_TABLE[self as usize].3
    }

    pub fn parse(s: &str) -> Option<Self> {
        SORT_TABLE
            .iter()
            .find(|row| row.1 == s)
            .map(|row| row.0)
    }
}

impl FilterKey {
    pub const ALL: [FilterKey; 4] = [
        FilterKey::All,
        FilterKey::Ebook,
        FilterKey::Recent,
        FilterKey::Classic,
    ];

    pub fn as_str(self) -> &'static str {
        FILTER_TABLE[self as usize].1
    }

    pub fn label(self) -> &'static str {
        FILTER_TABLE[self as usize].2
    }

    pub fn predicate(self) -> Predicate {
        FILTER_TABLE[self as usize].3
    }

    pub fn parse(s: &str) -> Option<Self> {
        FILTER_TABLE
            .iter()
            .find(|row| row.1 == s)
            .map(|row| row.0)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

impl std::str::FromStr for FilterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown filter key: {s}"))
    }
}

// ─── Derivation ────────────────────────────────────────────

/// Filter, then stable-sort, a copy of `books`.
pub fn derive(books: &[BookRecord], sort: SortKey, filter: FilterKey) -> Vec<BookRecord> {
    let keep = filter.predicate();
    let mut out: Vec<BookRecord> = books.iter().filter(|b| keep(b)).cloned().collect();
    if let Some(cmp) = sort.comparator() {
        out.sort_by(cmp);
    }
    out
}

fn keep_all(_: &BookRecord) -> bool {
    true
}

fn has_ebook(book: &BookRecord) -> bool {
    book.has_ebook
}

fn is_recent(book: &BookRecord) -> bool {
    book.numeric_year().is_some_and(|y| y >= RECENT_FROM)
}

fn is_classic(book: &BookRecord) -> bool {
    book.numeric_year().is_some_and(|y| y < CLASSIC_BEFORE)
}

fn by_year_desc(a: &BookRecord, b: &BookRecord) -> Ordering {
    let year = |book: &BookRecord| book.numeric_year().unwrap_or(UNKNOWN_YEAR_DESC);
    year(b).cmp(&year(a))
}

fn by_year_asc(a: &BookRecord, b: &BookRecord) -> Ordering {
    let year = |book: &BookRecord| book.numeric_year().unwrap_or(UNKNOWN_YEAR_ASC);
    year(a).cmp(&year(b))
}

fn by_title(a: &BookRecord, b: &BookRecord) -> Ordering {
    collate(&a.title, &b.title)
}

fn by_author(a: &BookRecord, b: &BookRecord) -> Ordering {
    collate(&a.author, &b.author)
}

/// Dictionary order for titles and names.
///
/// Letters compare first with accents and case ignored, so `Émile` sorts
/// between `Apple` and `Zebra`. Ties are broken by accents (unaccented
/// first), then by case (lowercase first), then by the raw text.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowercase(a).cmp(lowercase(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

/// Lowercased characters with combining marks removed.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowercase(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}
