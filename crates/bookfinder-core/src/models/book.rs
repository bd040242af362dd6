use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";
pub const UNKNOWN_YEAR: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description available";

/// Upper bound of [`BookRecord::academic_relevance`].
pub const MAX_ACADEMIC_RELEVANCE: u8 = 20;

// ─── BookRecord ─────────────────────────────────────────────

/// Canonical, fully-defaulted book as produced by the normalizer.
///
/// Every field is populated: absent source data is replaced with one of the
/// sentinel constants in this module. Serialized in camelCase so the JSON
/// output mirrors what the UI layer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Four-digit year or [`UNKNOWN_YEAR`].
    pub year: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    #[serde(default)]
    pub subjects: Vec<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    pub publisher: String,
    pub edition_count: u32,
    pub has_ebook: bool,
    pub academic_relevance: u8,
    pub open_library_url: String,
}

impl BookRecord {
    /// Whether the title survived normalization.
    pub fn has_known_title(&self) -> bool {
        !self.title.is_empty() && self.title != UNKNOWN_TITLE
    }

    /// Numeric year, `None` for the sentinel.
    pub fn numeric_year(&self) -> Option<i32> {
        if self.year == UNKNOWN_YEAR {
            return None;
        }
        self.year.parse().ok()
    }

    /// Reference string shown in the detail view.
    pub fn citation(&self) -> String {
        format!(
            "{}. ({}). *{}*. Retrieved from {}",
            self.author, self.year, self.title, self.open_library_url
        )
    }

    /// Year as shown on a result card.
    pub fn year_label(&self, current_year: i32) -> String {
        match self.numeric_year() {
            None => "Year Unknown".to_string(),
            Some(y) if current_year - y < 5 => format!("{} (new)", self.year),
            Some(y) if y < 1950 => format!("{} (classic)", self.year),
            Some(_) => self.year.clone(),
        }
    }
}

/// Capitalizes the first character of a subject for display.
pub fn display_subject(subject: &str) -> String {
    let mut chars = subject.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn sample_book(id: &str, title: &str, year: &str) -> BookRecord {
    BookRecord {
        id: id.to_string(),
        title: title.to_string(),
        author: UNKNOWN_AUTHOR.to_string(),
        year: year.to_string(),
        cover: None,
        subjects: Vec::new(),
        description: NO_DESCRIPTION.to_string(),
        isbn: None,
        publisher: UNKNOWN_PUBLISHER.to_string(),
        edition_count: 1,
        has_ebook: false,
        academic_relevance: 0,
        open_library_url: format!("https://openlibrary.org{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_format() {
        let mut book = sample_book("/works/OL1W", "Intro to CS", "2021");
        book.author = "Jane Doe".to_string();
        assert_eq!(
            book.citation(),
            "Jane Doe. (2021). *Intro to CS*. Retrieved from https://openlibrary.org/works/OL1W"
        );
    }

    #[test]
    fn test_year_label() {
        assert_eq!(sample_book("a", "A", "N/A").year_label(2025), "Year Unknown");
        assert_eq!(sample_book("a", "A", "2023").year_label(2025), "2023 (new)");
        assert_eq!(sample_book("a", "A", "1900").year_label(2025), "1900 (classic)");
        assert_eq!(sample_book("a", "A", "1990").year_label(2025), "1990");
    }

    #[test]
    fn test_numeric_year() {
        assert_eq!(sample_book("a", "A", "1999").numeric_year(), Some(1999));
        assert_eq!(sample_book("a", "A", UNKNOWN_YEAR).numeric_year(), None);
    }

    #[test]
    fn test_has_known_title() {
        assert!(sample_book("a", "Dune", "1965").has_known_title());
        assert!(!sample_book("a", UNKNOWN_TITLE, "1965").has_known_title());
        assert!(!sample_book("a", "", "1965").has_known_title());
    }

    #[test]
    fn test_serializes_camel_case() {
        let book = sample_book("/works/OL1W", "A", "2000");
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("openLibraryUrl").is_some());
        assert!(json.get("academicRelevance").is_some());
        assert!(json.get("cover").is_none());
    }

    #[test]
    fn test_display_subject() {
        assert_eq!(display_subject("computer science"), "Computer science");
        assert_eq!(display_subject(""), "");
    }
}
