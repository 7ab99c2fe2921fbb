//! Search, live-search and route command handlers.

use std::sync::Arc;
use std::time::Duration;

use dadar_core::{FailurePolicy, SearchResult, SourceType};
use dadar_search::{
    badge_label, dispatch_tagged, route_for, Navigator, Route, SearchAggregator, SearchOutcome,
    SearchSession, SearchStatus, SearchView, SessionOptions,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Live-mode line prefix that submits the rest of the line.
pub(crate) const SUBMIT_PREFIX: &str = ":submit ";

/// Prints each route it is asked to navigate to.
pub(crate) struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: &Route) {
        println!("{}", route.href());
    }
}

/// One display line: `[HOTEL] title - description (/hotel/id?title=...)`.
pub(crate) fn format_result(result: &SearchResult) -> String {
    let route = route_for(result).href();
    if result.description.is_empty() {
        format!("[{}] {} ({route})", badge_label(result.source_type), result.title)
    } else {
        format!(
            "[{}] {} - {} ({route})",
            badge_label(result.source_type),
            result.title,
            result.description
        )
    }
}

fn unavailable_note(failed: &[SourceType]) -> String {
    let names: Vec<&str> = failed.iter().map(|t| t.as_str()).collect();
    format!("(unavailable: {})", names.join(", "))
}

/// Text rendering of a live-search view.
pub(crate) fn render_view(view: &SearchView) -> String {
    if let Some(message) = view.empty_message() {
        return message;
    }
    match &view.status {
        SearchStatus::Idle => format!("> {}", view.query),
        SearchStatus::Loading => format!("Searching for \"{}\"...", view.query),
        SearchStatus::Ready(results) => render_results(results),
        SearchStatus::Partial {
            results,
            failed_sources,
        } => {
            let mut out = render_results(results);
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&unavailable_note(failed_sources));
            out
        }
        SearchStatus::Failed(message) => message.clone(),
    }
}

fn render_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(format_result)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run one search and print the outcome.
///
/// # Errors
///
/// Returns an error if the search fails under the all-or-nothing policy or
/// JSON serialization fails.
pub(crate) async fn run_search(
    aggregator: &SearchAggregator,
    query: &str,
    policy: FailurePolicy,
    json: bool,
) -> anyhow::Result<()> {
    let (results, failed) = match aggregator.run(query, policy).await? {
        SearchOutcome::Complete(results) => (results, Vec::new()),
        SearchOutcome::Partial(partial) => {
            let failed: Vec<SourceType> = partial.failed.iter().map(|f| f.source_type).collect();
            (partial.results, failed)
        }
    };

    if json {
        let body = serde_json::json!({
            "query": query,
            "results": results,
            "failed_sources": failed,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if results.is_empty() {
        if query.trim().is_empty() {
            println!("Start searching...");
        } else {
            println!("No results found for \"{query}\"");
        }
    } else {
        println!("{}", render_results(&results));
    }
    if !failed.is_empty() {
        println!("{}", unavailable_note(&failed));
    }
    Ok(())
}

/// Resolve and print a detail route. Unknown type tags print nothing.
pub(crate) fn run_route(type_tag: &str, id: &str, title: &str) {
    if !dispatch_tagged(type_tag, id, title, &PrintNavigator) {
        tracing::info!(type_tag, "unknown result type; nothing to open");
    }
}

/// Interactive search over stdin, printing every view change.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub(crate) async fn run_live(
    aggregator: Arc<SearchAggregator>,
    options: SessionOptions,
) -> anyhow::Result<()> {
    let mut session = SearchSession::new(aggregator, options);
    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            println!("{}", render_view(&view));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(text) = line.strip_prefix(SUBMIT_PREFIX) {
            println!("share: {}", session.submit(text));
        } else {
            session.change_text(&line);
        }
    }

    // Input closed: let the last scheduled search land before exiting.
    let poll = (options.debounce / 10).max(Duration::from_millis(10));
    while session.is_search_scheduled() {
        tokio::time::sleep(poll).await;
    }
    let mut settled = session.subscribe();
    while settled.borrow_and_update().is_loading() {
        if settled.changed().await.is_err() {
            break;
        }
    }

    // The printer ends once every view sender is gone, after printing the last view.
    drop(session);
    if tokio::time::timeout(Duration::from_secs(1), printer)
        .await
        .is_err()
    {
        tracing::debug!("stale search still in flight at exit");
    }
    Ok(())
}
