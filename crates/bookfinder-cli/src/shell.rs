//! Interactive session: one search service and cache for the whole run, so
//! repeated searches are served from memory and sort/filter changes only
//! re-derive the list already on screen.

use anyhow::Result;
use bookfinder_core::{
    AppConfig, BookRecord, Clock, FilterKey, QUICK_SEARCHES, ResultStats, SearchHistory,
    SearchMode, SortKey, SystemClock, derive,
};
use bookfinder_search::SearchService;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render;
use crate::{describe_search_error, record_history};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search { mode: Option<SearchMode>, query: String },
    Mode(SearchMode),
    Sort(SortKey),
    Filter(FilterKey),
    List,
    Show(usize),
    History,
    Rerun(usize),
    Quick(Option<usize>),
    Cache,
    ClearCache,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "search" | "s" => {
                let (mode, query) = match rest.split_once(char::is_whitespace) {
                    Some((first, tail)) if is_mode_name(first) => {
                        (Some(SearchMode::parse(first)), tail.trim())
                    }
                    _ => (None, rest),
                };
                if query.is_empty() {
                    return Err("usage: search [general|title|author|subject|isbn] <query>".into());
                }
                Ok(Self::Search { mode, query: query.to_string() })
            }
            "mode" => {
                if !is_mode_name(rest) {
                    return Err(format!("unknown mode: {rest}"));
                }
                Ok(Self::Mode(SearchMode::parse(rest)))
            }
            "sort" => rest.parse().map(Self::Sort),
            "filter" => rest.parse().map(Self::Filter),
            "list" | "ls" => Ok(Self::List),
            "show" => parse_index(rest).map(Self::Show),
            "history" if rest.is_empty() => Ok(Self::History),
            "history" => parse_index(rest).map(Self::Rerun),
            "quick" if rest.is_empty() => Ok(Self::Quick(None)),
            "quick" => parse_index(rest).map(|n| Self::Quick(Some(n))),
            "cache" => Ok(Self::Cache),
            "clear-cache" => Ok(Self::ClearCache),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

fn is_mode_name(s: &str) -> bool {
    SearchMode::ALL.iter().any(|m| m.as_str() == s)
}

/// 1-based index as typed by the user.
fn parse_index(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a number from 1, got `{s}`")),
    }
}

const HELP: &str = "\
Commands:
  search [mode] <query>   search (modes: general, title, author, subject, isbn)
  mode <mode>             default mode for `search`
  sort <key>              relevance | year_desc | year_asc | title | author
  filter <key>            all | ebook | recent | classic
  list                    show the current list again
  show <n>                details and citation for result n
  history [n]             recent searches, or re-run search n
  quick [n]               suggested searches, or run suggestion n
  cache                   cached searches
  clear-cache             drop every cached search
  quit";

struct Session {
    service: SearchService,
    config: AppConfig,
    history: SearchHistory,
    clock: SystemClock,
    mode: SearchMode,
    sort: SortKey,
    filter: FilterKey,
    books: Vec<BookRecord>,
    view: Vec<BookRecord>,
}

impl Session {
    fn rederive(&mut self) {
        self.view = derive(&self.books, self.sort, self.filter);
    }

    fn print_list(&self) {
        if self.books.is_empty() {
            println!("No results.");
            return;
        }
        render::print_summary(
            self.view.len(),
            &ResultStats::from_books(&self.books),
            self.sort,
            self.filter,
        );
        render::print_book_table(&self.view, self.clock.current_year());
    }

    async fn search(&mut self, query: &str, mode: SearchMode) {
        println!("Searching {mode} for \"{query}\"...");
        match self.service.search(query, mode).await {
            Ok(books) => {
                record_history(&self.config, &mut self.history, query, mode, books.len());
                self.books = books;
                self.rederive();
                self.print_list();
            }
            Err(e) => {
                // The previous list stays on screen.
                let (_, message) = describe_search_error(&e);
                eprintln!("{message}");
            }
        }
    }

    async fn run(&mut self, cmd: ShellCommand) {
        match cmd {
            ShellCommand::Search { mode, query } => {
                let mode = mode.unwrap_or(self.mode);
                self.search(&query, mode).await;
            }
            ShellCommand::Mode(mode) => {
                self.mode = mode;
                println!("{}", mode.placeholder());
            }
            ShellCommand::Sort(sort) => {
                self.sort = sort;
                self.rederive();
                self.print_list();
            }
            ShellCommand::Filter(filter) => {
                self.filter = filter;
                self.rederive();
                self.print_list();
            }
            ShellCommand::List => self.print_list(),
            ShellCommand::Show(n) => match self.view.get(n - 1) {
                Some(book) => render::print_book_detail(book, self.clock.current_year()),
                None => eprintln!("No result {n} (showing {}).", self.view.len()),
            },
            ShellCommand::History => {
                render::print_history(self.history.recent(5), self.history.total_searches);
            }
            ShellCommand::Rerun(n) => match self.history.items.get(n - 1).cloned() {
                Some(item) => self.search(&item.query, item.mode).await,
                None => eprintln!("No history entry {n}."),
            },
            ShellCommand::Quick(None) => render::print_quick_searches(&QUICK_SEARCHES),
            ShellCommand::Quick(Some(n)) => match QUICK_SEARCHES.get(n - 1) {
                Some(quick) => self.search(quick.query, quick.mode).await,
                None => eprintln!("No quick search {n} (1-{}).", QUICK_SEARCHES.len()),
            },
            ShellCommand::Cache => {
                println!("{} cached searches", self.service.cache_len());
                for key in self.service.cache_keys() {
                    println!("  {key}");
                }
            }
            ShellCommand::ClearCache => {
                self.service.clear_cache();
                println!("Cache cleared.");
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => {}
        }
    }
}

pub async fn run(config: AppConfig) -> Result<()> {
    let service = SearchService::from_config(&config.search)?;
    let history = SearchHistory::load_from(&config.history_path()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable search history");
        SearchHistory::default()
    });
    let mut session = Session {
        service,
        history,
        clock: SystemClock,
        mode: SearchMode::General,
        sort: config.ui.default_sort,
        filter: config.ui.default_filter,
        books: Vec::new(),
        view: Vec::new(),
        config,
    };

    println!("BookFinder. Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"bookfinder> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(cmd) => session.run(cmd).await,
            Err(msg) if msg.is_empty() => {}
            Err(msg) => eprintln!("{msg}"),
        }
    }
    Ok(())
}
