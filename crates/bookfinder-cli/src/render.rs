use anyhow::Result;
use bookfinder_core::{
    BookRecord, FilterKey, QuickSearch, ResultStats, SearchHistoryItem, SortKey, display_subject,
};

pub fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// One line per book, numbered from 1 for `show`.
pub fn print_book_table(books: &[BookRecord], current_year: i32) {
    for (i, book) in books.iter().enumerate() {
        println!(
            "{n:>3}. {title:<42}  {author:<24}  {year:<16}  {ebook:<5}  ★{score}",
            n = i + 1,
            title = truncate(&book.title, 42),
            author = truncate(&book.author, 24),
            year = book.year_label(current_year),
            ebook = if book.has_ebook { "ebook" } else { "" },
            score = book.academic_relevance,
        );
    }
}

pub fn print_summary(shown: usize, stats: &ResultStats, sort: SortKey, filter: FilterKey) {
    println!(
        "Results ({shown} of {total})  ·  {ebooks} eBooks  ·  {recent} recent (2015+)  ·  sort: {sort}  ·  filter: {filter}",
        total = stats.total,
        ebooks = stats.ebooks,
        recent = stats.recent,
        sort = sort.label(),
        filter = filter.label(),
    );
}

pub fn print_book_detail(book: &BookRecord, current_year: i32) {
    println!("{}", book.title);
    println!("by {} • {}", book.author, book.year_label(current_year));
    println!();
    println!("  Publisher:   {}", book.publisher);
    println!("  Editions:    {}", book.edition_count);
    if let Some(isbn) = &book.isbn {
        println!("  ISBN:        {isbn}");
    }
    println!("  eBook:       {}", if book.has_ebook { "available" } else { "no" });
    println!("  Relevance:   {}/20", book.academic_relevance);
    if let Some(cover) = &book.cover {
        println!("  Cover:       {cover}");
    }
    println!("  Open Library: {}", book.open_library_url);
    if !book.subjects.is_empty() {
        let subjects: Vec<String> = book.subjects.iter().map(|s| display_subject(s)).collect();
        println!("  Subjects:    {}", subjects.join(", "));
    }
    println!();
    println!("  {}", book.description);
    println!();
    println!("Citation:");
    println!("  {}", book.citation());
}

pub fn print_history(items: &[SearchHistoryItem], total_searches: u64) {
    if items.is_empty() {
        println!("No recent searches.");
    } else {
        for (i, item) in items.iter().enumerate() {
            println!(
                "{n:>3}. [{mode}] {query}  ({count} results, {at})",
                n = i + 1,
                mode = item.mode,
                query = item.query,
                count = item.result_count,
                at = item.timestamp.format("%Y-%m-%d %H:%M"),
            );
        }
    }
    println!("{total_searches} searches made");
}

pub fn print_quick_searches(presets: &[QuickSearch]) {
    println!("Quick searches for students:");
    for (i, quick) in presets.iter().enumerate() {
        println!(
            "{n:>3}. {label:<20} [{mode}] {query}",
            n = i + 1,
            label = quick.label,
            mode = quick.mode,
            query = quick.query,
        );
    }
}
