//! Academic relevance heuristic.
//!
//! score = 2 × academic subjects + age bonus + 5 (free ebook) + min(editions, 5)
//!
//! The score is computed from the raw search document rather than the
//! normalized record because it needs every source subject (normalization
//! keeps five) and the raw access flags.

use serde_json::Value;

use crate::models::MAX_ACADEMIC_RELEVANCE;
use crate::normalize::{has_public_ebook, raw_year, string_list};

/// Subject keywords that earn the subject bonus.
pub const SCORING_KEYWORDS: [&str; 4] = ["science", "study", "research", "academic"];

const SUBJECT_POINTS: u32 = 2;
const EBOOK_POINTS: u32 = 5;
const MAX_EDITION_POINTS: i64 = 5;

/// Score a raw search document in `[0, 20]`.
pub fn academic_relevance(doc: &Value, current_year: i32) -> u8 {
    let score = subject_points(doc)
        .saturating_add(age_points(doc, current_year))
        .saturating_add(if has_public_ebook(doc) { EBOOK_POINTS } else { 0 })
        .saturating_add(edition_points(doc));

    score.min(u32::from(MAX_ACADEMIC_RELEVANCE)) as u8
}

/// Each qualifying subject entry counts once, however many keywords it hits.
/// Repeated entries in the source list each count.
fn subject_points(doc: &Value) -> u32 {
    let qualifying = string_list(doc.get("subject"))
        .into_iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            SCORING_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .count();
    u32::try_from(qualifying)
        .unwrap_or(u32::MAX)
        .saturating_mul(SUBJECT_POINTS)
}

fn age_points(doc: &Value, current_year: i32) -> u32 {
    let Some(year) = raw_year(doc.get("first_publish_year")) else {
        return 0;
    };
    let age = i64::from(current_year) - year;
    if age < 10 {
        3
    } else if age < 20 {
        2
    } else if age < 50 {
        1
    } else {
        0
    }
}

fn edition_points(doc: &Value) -> u32 {
    match doc.get("edition_count").and_then(Value::as_i64) {
        Some(count) if count > 1 => count.min(MAX_EDITION_POINTS) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const YEAR: i32 = 2025;

    #[test]
    fn test_empty_doc_scores_zero() {
        assert_eq!(academic_relevance(&json!({}), YEAR), 0);
    }

    #[test]
    fn test_subject_points_are_per_entry() {
        // "research study" matches two keywords but counts once.
        let doc = json!({ "subject": ["research study", "Computer Science", "cooking"] });
        assert_eq!(academic_relevance(&doc, YEAR), 4);

        // Duplicate entries are not deduplicated.
        let doc = json!({ "subject": ["science", "science", "science"] });
        assert_eq!(academic_relevance(&doc, YEAR), 6);
    }

    #[test]
    fn test_age_bonus_brackets() {
        let score = |year: i32| academic_relevance(&json!({ "first_publish_year": year }), YEAR);
        assert_eq!(score(2020), 3);
        assert_eq!(score(2016), 3);
        assert_eq!(score(2015), 2);
        assert_eq!(score(2006), 2);
        assert_eq!(score(2005), 1);
        assert_eq!(score(1976), 1);
        assert_eq!(score(1975), 0);
        assert_eq!(score(1800), 0);
    }

    #[test]
    fn test_ebook_bonus() {
        assert_eq!(academic_relevance(&json!({ "ebook_access": "public" }), YEAR), 5);
        assert_eq!(academic_relevance(&json!({ "has_fulltext": true }), YEAR), 5);
        assert_eq!(academic_relevance(&json!({ "ebook_access": "borrowable" }), YEAR), 0);
        assert_eq!(academic_relevance(&json!({ "has_fulltext": false }), YEAR), 0);
    }

    #[test]
    fn test_edition_bonus() {
        let score = |n: i64| academic_relevance(&json!({ "edition_count": n }), YEAR);
        assert_eq!(score(1), 0);
        assert_eq!(score(2), 2);
        assert_eq!(score(5), 5);
        assert_eq!(score(100), 5);
    }

    #[test]
    fn test_score_is_clamped() {
        let doc = json!({
            "subject": vec!["academic research"; 10],
            "first_publish_year": 2024,
            "ebook_access": "public",
            "has_fulltext": true,
            "edition_count": 100,
        });
        assert_eq!(academic_relevance(&doc, YEAR), 20);
    }

    #[test]
    fn test_malformed_fields_are_ignored() {
        let doc = json!({
            "subject": "science",
            "first_publish_year": "soon",
            "edition_count": "many",
        });
        assert_eq!(academic_relevance(&doc, YEAR), 0);
    }
}
