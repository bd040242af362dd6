use serde::{Deserialize, Serialize};

use crate::models::BookRecord;

/// Books published in or after this year count as recent in the summary.
pub const STATS_RECENT_FROM: i32 = 2015;

/// Summary line shown above a result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStats {
    pub total: usize,
    pub ebooks: usize,
    pub recent: usize,
}

impl ResultStats {
    pub fn from_books(books: &[BookRecord]) -> Self {
        Self {
            total: books.len(),
            ebooks: books.iter().filter(|b| b.has_ebook).count(),
            recent: books
                .iter()
                .filter(|b| b.numeric_year().is_some_and(|y| y >= STATS_RECENT_FROM))
                .count(),
        }
    }
}
