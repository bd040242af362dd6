//! Raw search document → [`BookRecord`].
//!
//! Every function here is total: missing, null or mistyped fields resolve to
//! the sentinels in [`crate::models::book`] and never produce an error.

use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    BookRecord, NO_DESCRIPTION, UNKNOWN_AUTHOR, UNKNOWN_PUBLISHER, UNKNOWN_TITLE, UNKNOWN_YEAR,
};
use crate::relevance::academic_relevance;

pub const OPEN_LIBRARY_BASE: &str = "https://openlibrary.org";
const COVER_BASE: &str = "https://covers.openlibrary.org/b/id";

pub const MAX_SUBJECTS: usize = 5;
const MIN_DESCRIPTION_CHARS: usize = 10;
const EARLIEST_YEAR: i64 = 1000;

/// Subjects containing one of these are sorted first.
pub const ACADEMIC_KEYWORDS: [&str; 20] = [
    "science",
    "mathematics",
    "history",
    "literature",
    "psychology",
    "philosophy",
    "computer",
    "engineering",
    "business",
    "economics",
    "biology",
    "chemistry",
    "physics",
    "sociology",
    "politics",
    "education",
    "research",
    "study",
    "academic",
    "university",
];

/// Catalogue bookkeeping markers that say nothing about the content.
const NOISE_SUBJECTS: [&str; 2] = ["accessible_book", "lending_library"];

// ─── Record ────────────────────────────────────────────────

/// Normalize one search document. Always produces a record; callers drop
/// records without a usable title.
pub fn normalize_record(doc: &Value, current_year: i32) -> BookRecord {
    let key = doc
        .get("key")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty());

    BookRecord {
        id: key
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("book_{}", Uuid::new_v4().simple())),
        title: normalize_title(doc.get("title")),
        author: normalize_author(doc.get("author_name")),
        year: normalize_year(doc.get("first_publish_year"), current_year),
        cover: cover_url(doc.get("cover_i")),
        subjects: normalize_subjects(doc.get("subject")),
        description: normalize_description(doc.get("first_sentence")),
        isbn: first_string(doc.get("isbn")).map(ToOwned::to_owned),
        publisher: first_string(doc.get("publisher"))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
        edition_count: edition_count(doc.get("edition_count")),
        has_ebook: has_public_ebook(doc),
        academic_relevance: academic_relevance(doc, current_year),
        open_library_url: format!("{OPEN_LIBRARY_BASE}{}", key.unwrap_or_default()),
    }
}

// ─── Fields ────────────────────────────────────────────────

/// Trim and collapse whitespace runs to single spaces.
pub fn normalize_title(raw: Option<&Value>) -> String {
    let cleaned = raw
        .and_then(Value::as_str)
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if cleaned.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        cleaned
    }
}

/// First listed author, trimmed.
pub fn normalize_author(raw: Option<&Value>) -> String {
    match first_string(raw).map(str::trim) {
        Some(author) if !author.is_empty() => author.to_string(),
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}

/// Four-digit year no later than `current_year` and no earlier than 1000.
pub fn normalize_year(raw: Option<&Value>, current_year: i32) -> String {
    match raw_year(raw) {
        Some(year) if year <= i64::from(current_year) && year >= EARLIEST_YEAR => {
            year.to_string()
        }
        _ => UNKNOWN_YEAR.to_string(),
    }
}

pub fn cover_url(raw: Option<&Value>) -> Option<String> {
    let id = raw.and_then(Value::as_i64).filter(|id| *id != 0)?;
    Some(format!("{COVER_BASE}/{id}-L.jpg"))
}

/// Clean, reorder and truncate the subject list.
///
/// Length bounds apply to the raw entry before trimming. Academic subjects
/// move to the front; `sort_by_key` is stable so order is otherwise kept.
pub fn normalize_subjects(raw: Option<&Value>) -> Vec<String> {
    let mut subjects: Vec<String> = string_list(raw)
        .into_iter()
        .filter(|s| {
            let len = s.chars().count();
            len > 2 && len < 50
        })
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !NOISE_SUBJECTS.iter().any(|noise| s.contains(noise)))
        .collect();

    subjects.sort_by_key(|s| !is_academic_subject(s));
    subjects.truncate(MAX_SUBJECTS);
    subjects
}

pub fn is_academic_subject(subject: &str) -> bool {
    ACADEMIC_KEYWORDS.iter().any(|k| subject.contains(k))
}

/// First sentence with its first letter capitalized.
pub fn normalize_description(raw: Option<&Value>) -> String {
    let Some(sentence) = first_string(raw).map(str::trim) else {
        return NO_DESCRIPTION.to_string();
    };
    if sentence.chars().count() < MIN_DESCRIPTION_CHARS {
        return NO_DESCRIPTION.to_string();
    }

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => NO_DESCRIPTION.to_string(),
    }
}

fn edition_count(raw: Option<&Value>) -> u32 {
    raw.and_then(Value::as_i64)
        .filter(|n| *n >= 1)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

// ─── Raw accessors (shared with the scorer) ────────────────

/// String entries of a JSON array; anything else is empty.
pub(crate) fn string_list(raw: Option<&Value>) -> Vec<&str> {
    raw.and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

pub(crate) fn first_string(raw: Option<&Value>) -> Option<&str> {
    raw.and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_str)
}

/// Publish year as a number; zero counts as absent.
pub(crate) fn raw_year(raw: Option<&Value>) -> Option<i64> {
    raw.and_then(Value::as_i64).filter(|y| *y != 0)
}

pub(crate) fn has_public_ebook(doc: &Value) -> bool {
    doc.get("ebook_access").and_then(Value::as_str) == Some("public")
        || doc.get("has_fulltext").is_some_and(is_truthy)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const YEAR: i32 = 2025;

    #[test]
    fn test_end_to_end_record() {
        let doc = json!({
            "key": "/works/OL1W",
            "title": "  Intro  to   CS ",
            "author_name": ["Jane Doe"],
            "first_publish_year": 2021,
            "subject": ["computer science", "lending_library"],
            "ebook_access": "public",
            "edition_count": 3
        });

        let book = normalize_record(&doc, YEAR);
        assert_eq!(book.id, "/works/OL1W");
        assert_eq!(book.title, "Intro to CS");
        assert_eq!(book.author, "Jane Doe");
        assert_eq!(book.year, "2021");
        assert_eq!(book.subjects, vec!["computer science"]);
        assert!(book.has_ebook);
        assert_eq!(book.edition_count, 3);
        assert_eq!(book.academic_relevance, 13);
        assert_eq!(book.open_library_url, "https://openlibrary.org/works/OL1W");
        assert_eq!(book.publisher, UNKNOWN_PUBLISHER);
        assert_eq!(book.description, NO_DESCRIPTION);
        assert!(book.cover.is_none());
        assert!(book.isbn.is_none());
    }

    #[test]
    fn test_empty_doc_gets_sentinels() {
        let book = normalize_record(&json!({}), YEAR);
        assert_eq!(book.title, UNKNOWN_TITLE);
        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert_eq!(book.year, UNKNOWN_YEAR);
        assert_eq!(book.publisher, UNKNOWN_PUBLISHER);
        assert_eq!(book.edition_count, 1);
        assert!(!book.has_ebook);
        assert!(book.id.starts_with("book_"));
        assert_eq!(book.open_library_url, OPEN_LIBRARY_BASE);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = normalize_record(&json!({ "title": "A" }), YEAR);
        let b = normalize_record(&json!({ "title": "A" }), YEAR);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_title_cleanup() {
        assert_eq!(normalize_title(Some(&json!("\tDeep \n Learning  "))), "Deep Learning");
        assert_eq!(normalize_title(Some(&json!("   "))), UNKNOWN_TITLE);
        assert_eq!(normalize_title(Some(&json!(42))), UNKNOWN_TITLE);
        assert_eq!(normalize_title(None), UNKNOWN_TITLE);
    }

    #[test]
    fn test_author_takes_first() {
        assert_eq!(
            normalize_author(Some(&json!([" Ian Goodfellow ", "Yoshua Bengio"]))),
            "Ian Goodfellow"
        );
        assert_eq!(normalize_author(Some(&json!([]))), UNKNOWN_AUTHOR);
        assert_eq!(normalize_author(Some(&json!("Jane"))), UNKNOWN_AUTHOR);
        assert_eq!(normalize_author(None), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_year_bounds() {
        let year = |y: i64| normalize_year(Some(&json!(y)), YEAR);
        for y in (YEAR - 4)..=YEAR {
            assert_eq!(year(i64::from(y)), y.to_string());
        }
        assert_eq!(year(i64::from(YEAR) + 1), UNKNOWN_YEAR);
        assert_eq!(year(1000), "1000");
        assert_eq!(year(999), UNKNOWN_YEAR);
        assert_eq!(year(0), UNKNOWN_YEAR);
        assert_eq!(normalize_year(Some(&json!("2001")), YEAR), UNKNOWN_YEAR);
        assert_eq!(normalize_year(None, YEAR), UNKNOWN_YEAR);
    }

    #[test]
    fn test_cover_url() {
        assert_eq!(
            cover_url(Some(&json!(12345))).as_deref(),
            Some("https://covers.openlibrary.org/b/id/12345-L.jpg")
        );
        assert_eq!(cover_url(None), None);
        assert_eq!(cover_url(Some(&json!(0))), None);
    }

    #[test]
    fn test_subjects_filter_sort_truncate() {
        let raw = json!([
            "Fiction",
            "ab",
            "Accessible_book",
            "In library",
            "History of Europe",
            "Cooking",
            "Protected DAISY",
            "Physics",
            "Travel",
            "Philosophy",
            "x".repeat(50),
            7
        ]);
        let subjects = normalize_subjects(Some(&raw));
        assert_eq!(
            subjects,
            vec!["history of europe", "physics", "philosophy", "fiction", "in library"]
        );
    }

    #[test]
    fn test_subjects_length_is_checked_before_trim() {
        // Four raw chars pass the length check, then trim to two.
        let subjects = normalize_subjects(Some(&json!([" ab "])));
        assert_eq!(subjects, vec!["ab"]);
    }

    #[test]
    fn test_subjects_keep_order_within_partition() {
        let raw = json!(["Zoology study", "Art", "Applied science", "Music"]);
        assert_eq!(
            normalize_subjects(Some(&raw)),
            vec!["zoology study", "applied science", "art", "music"]
        );
    }

    #[test]
    fn test_description() {
        assert_eq!(
            normalize_description(Some(&json!(["  it was a dark and stormy night."]))),
            "It was a dark and stormy night."
        );
        assert_eq!(normalize_description(Some(&json!(["Too short"]))), NO_DESCRIPTION);
        assert_eq!(normalize_description(Some(&json!([]))), NO_DESCRIPTION);
        assert_eq!(normalize_description(None), NO_DESCRIPTION);
    }

    #[test]
    fn test_isbn_publisher_edition() {
        let doc = json!({
            "title": "X",
            "isbn": ["9780262035613", "0262035618"],
            "publisher": ["MIT Press", "Other"],
            "edition_count": 0,
        });
        let book = normalize_record(&doc, YEAR);
        assert_eq!(book.isbn.as_deref(), Some("9780262035613"));
        assert_eq!(book.publisher, "MIT Press");
        assert_eq!(book.edition_count, 1);
    }

    #[test]
    fn test_fulltext_truthiness() {
        assert!(has_public_ebook(&json!({ "has_fulltext": 1 })));
        assert!(has_public_ebook(&json!({ "has_fulltext": "yes" })));
        assert!(!has_public_ebook(&json!({ "has_fulltext": null })));
        assert!(!has_public_ebook(&json!({ "has_fulltext": "" })));
        assert!(!has_public_ebook(&json!({ "ebook_access": "no_ebook" })));
    }
}
