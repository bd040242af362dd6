use serde::{Deserialize, Serialize};

/// Which field a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    General,
    Title,
    Author,
    Subject,
    Isbn,
}

/// Mode name, search API query parameter, input hint.
const MODE_TABLE: [(SearchMode, &str, &str, &str); 5] = [
    (SearchMode::General, "general", "q", "Search by title, author, or keyword..."),
    (SearchMode::Title, "title", "title", "Search by book title..."),
    (SearchMode::Author, "author", "author", "Search by author name..."),
    (
        SearchMode::Subject,
        "subject",
        "subject",
        "Search by subject (programming, history, psychology)...",
    ),
    (SearchMode::Isbn, "isbn", "isbn", "Search by ISBN..."),
];

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::General,
        SearchMode::Title,
        SearchMode::Author,
        SearchMode::Subject,
        SearchMode::Isbn,
    ];

    fn row(self) -> &'static (SearchMode, &'static str, &'static str, &'static str) {
        // The table lists every variant in declaration order.
        &MODE_TABLE[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.row().1
    }

    /// Query parameter understood by the search endpoint.
    pub fn query_param(self) -> &'static str {
        self.row().2
    }

    pub fn placeholder(self) -> &'static str {
        self.row().3
    }

    /// Parse a mode name. Unrecognized names fall back to [`SearchMode::General`].
    pub fn parse(s: &str) -> Self {
        MODE_TABLE
            .iter()
            .find(|(_, name, _, _)| *name == s)
            .map(|(mode, _, _, _)| *mode)
            .unwrap_or_default()
    }
}

/// Canned searches offered as shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSearch {
    pub label: &'static str,
    pub query: &'static str,
    pub mode: SearchMode,
}

pub const QUICK_SEARCHES: [QuickSearch; 6] = [
    QuickSearch { label: "Data Science", query: "data science", mode: SearchMode::Subject },
    QuickSearch {
        label: "React Programming",
        query: "react programming",
        mode: SearchMode::Title,
    },
    QuickSearch { label: "Shakespeare", query: "shakespeare", mode: SearchMode::Author },
    QuickSearch { label: "Psychology", query: "psychology", mode: SearchMode::Subject },
    QuickSearch {
        label: "Machine Learning",
        query: "machine learning",
        mode: SearchMode::Subject,
    },
    QuickSearch {
        label: "Web Development",
        query: "web development",
        mode: SearchMode::Subject,
    },
];

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SearchMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
