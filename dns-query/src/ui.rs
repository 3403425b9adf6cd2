//! Console display logic for the dns-query CLI.
//!
//! Result lines, the TSV line format used by `--output`, the run summary and
//! a stderr spinner for multi-domain runs. Uses only the `console` crate.

use console::{style, Term};
use dns_query_lib::{BatchSummary, QueryResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner with the given message, or `None` when stderr is not a terminal.
    pub fn start(message: String) -> Option<Self> {
        let term = Term::stderr();
        if !term.is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Result lines ─────────────────────────────────────────────────────────────

/// Print every result, one line each, in input order.
pub fn print_results(results: &[QueryResult], verbose: bool) {
    for result in results {
        println!("{}", styled_result_line(result, verbose));
    }
}

fn styled_result_line(result: &QueryResult, verbose: bool) -> String {
    match &result.error {
        Some(error) => format!("{}: {}", result.domain, style(error).yellow()),
        None if verbose => format!(
            "{} [{}] -> {} {}",
            result.domain,
            style(&result.record_type).cyan(),
            style(result.answers.join(", ")).green(),
            style(format!("({:.2}ms)", result.query_time_ms)).dim(),
        ),
        None => format!(
            "{}: {}",
            result.domain,
            style(result.answers.join(", ")).green()
        ),
    }
}

/// The console line for a result, without colors.
///
/// - error: `domain: error`
/// - success: `domain: a1, a2`
/// - success, verbose: `domain [TYPE] -> a1, a2 (12.34ms)`
#[cfg(test)]
fn format_result_line(result: &QueryResult, verbose: bool) -> String {
    console::strip_ansi_codes(&styled_result_line(result, verbose)).into_owned()
}

/// The `--output` line for a result: `domain<TAB>a1,a2` or `domain<TAB>error`.
pub fn format_tsv_line(result: &QueryResult) -> String {
    match &result.error {
        Some(error) => format!("{}\t{}", result.domain, error),
        None => format!("{}\t{}", result.domain, result.answers.join(",")),
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Summary text: a blank line, the throughput line and the success tally.
pub fn format_summary(summary: &BatchSummary) -> String {
    format!(
        "\n--- {} queries in {:.2}s ({:.1} queries/sec) ---\nSuccess: {}, Failed: {}",
        summary.total,
        summary.elapsed.as_secs_f64(),
        summary.queries_per_sec(),
        summary.successful,
        summary.failed,
    )
}

/// Print the run summary.
pub fn print_summary(summary: &BatchSummary) {
    println!("{}", style(format_summary(summary)).dim());
}

// ── Tests ────────────────────────────────────────────────────────────────────
