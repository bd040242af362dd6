use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookfinder_core::{
    AppConfig, BookRecord, Clock, ExitCode, FilterKey, ResultStats, SearchHistory, SearchMode,
    SortKey, SystemClock, derive,
};
use bookfinder_search::{SearchError, SearchService};

mod render;
mod shell;

use render::print_json;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "bookfinder",
    about = "Search Open Library for academic books from the terminal",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting BOOKFINDER_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search books and print the derived result list.
    Search {
        query: String,
        /// general | title | author | subject | isbn
        #[arg(long, short, default_value = "general")]
        mode: SearchMode,
        /// relevance | year_desc | year_asc | title | author
        #[arg(long)]
        sort: Option<SortKey>,
        /// all | ebook | recent | classic
        #[arg(long)]
        filter: Option<FilterKey>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show details and a citation for one result of a search.
    Show {
        query: String,
        /// 1-based position in the derived list.
        index: usize,
        #[arg(long, short, default_value = "general")]
        mode: SearchMode,
        #[arg(long)]
        sort: Option<SortKey>,
        #[arg(long)]
        filter: Option<FilterKey>,
    },

    /// Interactive session (default when no command is given).
    Shell,

    /// Recent searches.
    History {
        #[arg(long)]
        clear: bool,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration.
    List,
    /// Show the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Env var overrides ──────────────────────────────────────────────────
    let json_output = cli.json || std::env::var("BOOKFINDER_JSON").as_deref() == Ok("1");

    let timing = std::env::var("BOOKFINDER_TIMING").as_deref() == Ok("1");

    let config = AppConfig::load()?;

    if timing {
        eprintln!("[timing] config loaded in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    }

    match cli.command {
        None | Some(Commands::Shell) => shell::run(config).await?,

        Some(Commands::Search { query, mode, sort, filter, limit }) => {
            let query = require_query(&query, json_output)?;
            let sort = sort.unwrap_or(config.ui.default_sort);
            let filter = filter.unwrap_or(config.ui.default_filter);

            let books = run_search(&config, &query, mode, json_output, start).await?;
            let mut view = derive(&books, sort, filter);
            if let Some(limit) = limit {
                view.truncate(limit);
            }
            let stats = ResultStats::from_books(&books);
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "query": query, "mode": mode, "sort": sort, "filter": filter,
                        "stats": stats, "items": view,
                    },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if books.is_empty() {
                println!("No books found for \"{query}\". Try a different mode or broader terms.");
            } else {
                render::print_summary(view.len(), &stats, sort, filter);
                render::print_book_table(&view, SystemClock.current_year());
            }
        }

        Some(Commands::Show { query, index, mode, sort, filter }) => {
            let query = require_query(&query, json_output)?;
            let sort = sort.unwrap_or(config.ui.default_sort);
            let filter = filter.unwrap_or(config.ui.default_filter);

            let books = run_search(&config, &query, mode, json_output, start).await?;
            let view = derive(&books, sort, filter);
            let dur = start.elapsed().as_millis();

            match index.checked_sub(1).and_then(|i| view.get(i)) {
                Some(book) => {
                    if json_output {
                        print_json(&serde_json::json!({
                            "status":"ok",
                            "data":{"book":book,"citation":book.citation()},
                            "meta":{"duration_ms":dur}
                        }))?;
                    } else {
                        render::print_book_detail(book, SystemClock.current_year());
                    }
                }
                None => {
                    let message = format!("No result {index} ({} shown)", view.len());
                    if json_output {
                        print_json(&serde_json::json!({"status":"error","error":"not_found","message":message,"meta":{"duration_ms":dur}}))?;
                    } else {
                        eprintln!("{message}");
                    }
                    std::process::exit(ExitCode::NotFound.code());
                }
            }
        }

        // ── History ────────────────────────────────────────────────────────

        Some(Commands::History { clear }) => {
            let path = config.history_path();
            let mut history = SearchHistory::load_from(&path)?;
            if clear {
                history.clear();
                history.save_to(&path)?;
            }
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":history,"meta":{"duration_ms":dur}}))?;
            } else if clear {
                println!("Search history cleared.");
            } else {
                render::print_history(&history.items, history.total_searches);
            }
        }

        // ── Config ─────────────────────────────────────────────────────────

        Some(Commands::Config { action }) => {
            let dur = start.elapsed().as_millis();
            match action {
                ConfigAction::List => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":config,"meta":{"duration_ms":dur}}))?;
                    } else {
                        print!("{}", toml::to_string_pretty(&config)?);
                    }
                }
                ConfigAction::Path => {
                    let path = AppConfig::config_path();
                    if json_output {
                        print_json(&serde_json::json!({
                            "status":"ok",
                            "data":{"path":path,"exists":path.exists()},
                            "meta":{"duration_ms":dur}
                        }))?;
                    } else {
                        println!("{}", path.display());
                    }
                }
            }
        }

        // ── Version ────────────────────────────────────────────────────────

        Some(Commands::Version) => {
            let version = env!("CARGO_PKG_VERSION");
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("bookfinder v{version}");
            }
        }
    }

    if timing {
        eprintln!("[timing] total {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Trimmed query; an empty one exits with `InvalidArgs` before any request.
fn require_query(query: &str, json_output: bool) -> Result<String> {
    let query = query.trim();
    if query.is_empty() {
        let message = "Search query must not be empty";
        if json_output {
            print_json(&serde_json::json!({"status":"error","error":"invalid_args","message":message}))?;
        } else {
            eprintln!("{message}");
        }
        std::process::exit(ExitCode::InvalidArgs.code());
    }
    Ok(query.to_string())
}

/// One-shot search: records history on success, reports and exits on failure.
async fn run_search(
    config: &AppConfig,
    query: &str,
    mode: SearchMode,
    json_output: bool,
    start: Instant,
) -> Result<Vec<BookRecord>> {
    let service = SearchService::from_config(&config.search)?;
    match service.search(query, mode).await {
        Ok(books) => {
            let path = config.history_path();
            let mut history = SearchHistory::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring unreadable search history");
                SearchHistory::default()
            });
            record_history(config, &mut history, query, mode, books.len());
            Ok(books)
        }
        Err(e) => {
            let (kind, message) = describe_search_error(&e);
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"error","error":kind,"message":message,"meta":{"duration_ms":dur}}))?;
            } else {
                eprintln!("{message}");
            }
            let code = if e.is_transport() {
                ExitCode::NetworkError
            } else {
                ExitCode::GeneralError
            };
            std::process::exit(code.code());
        }
    }
}

/// Add a successful search to `history` and persist it. A failed save is
/// logged and otherwise ignored.
pub(crate) fn record_history(
    config: &AppConfig,
    history: &mut SearchHistory,
    query: &str,
    mode: SearchMode,
    result_count: usize,
) {
    history.record(query, mode, result_count, SystemClock.now(), config.history.max_items);
    if let Err(e) = history.save_to(&config.history_path()) {
        tracing::warn!(error = %e, "failed to save search history");
    }
}

/// Error kind tag and user-facing message for a failed search.
pub(crate) fn describe_search_error(e: &SearchError) -> (&'static str, String) {
    let kind = if e.is_transport() {
        "transport"
    } else if e.is_format() {
        "format"
    } else {
        "general"
    };
    (kind, format!("Failed to search books: {e}"))
}
