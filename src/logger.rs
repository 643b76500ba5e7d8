//! Terminal output for the pipeline.
//!
//! Three layers, all writing to a locked stdout:
//! - the `log!` / `debug!` macros for prefixed one-off lines
//! - [`ProgressLine`], per-unit file counters rendered on a single line
//! - the watch status block, a timestamped result line that overwrites
//!   itself on every pass so the terminal never scrolls with no-ops
//!
//! ```ignore
//! log!("scripts"; "compiling {} files", count);
//!
//! let progress = ProgressLine::new(&[("styles", 1), ("images", 24)]);
//! progress.inc("images");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Verbose flag, flipped once at startup from `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// True when `--verbose` was given. The `debug!` macros branch on this.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Number of progress bars currently occupying the bottom of the screen.
/// `log` prints above them instead of through them.
static ACTIVE_BARS: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Macros
// ============================================================================

/// Print a `[prefix] message` line.
///
/// ```ignore
/// log!("fonts"; "copied {} files", n);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only printed under `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Run a block only under `--verbose`, for debug output that is
/// expensive to assemble.
///
/// ```ignore
/// debug_do! {
///     let routed = summarize(&changes);
///     debug!("watch"; "{routed}");
/// }
/// ```
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Line Output
// ============================================================================

/// Write one prefixed line, stepping around any live progress bars.
#[inline]
#[allow(clippy::cast_possible_truncation)] // bar count is 0 or 1
pub fn log(module: &str, message: &str) {
    let prefix = paint_prefix(module);

    let mut out = stdout().lock();

    let bars = ACTIVE_BARS.load(Ordering::SeqCst);
    if bars > 0 {
        execute!(out, cursor::MoveUp(bars as u16)).ok();
        execute!(out, Clear(ClearType::FromCursorDown)).ok();
    } else {
        execute!(out, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(out, "{prefix} {message}").ok();

    // Restore blank rows so the bars can repaint where they were
    for _ in 0..bars {
        writeln!(out).ok();
    }

    out.flush().ok();
}

/// `[prefix]`, colored by channel: watch green, error red, the rest yellow.
#[inline]
fn paint_prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "watch" => tag.bright_green().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Watch Status Block
// ============================================================================

/// Wall-clock HH:MM:SS (UTC) for status timestamps.
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

/// The self-overwriting block watch mode prints after each pass.
///
/// Each message replaces the previous one, so at most one result sits on
/// screen at a time: a green check for a rebuild, a dimmed line for a
/// no-op pass, or a red cross followed by the error detail.
struct StatusBlock {
    /// Rows the previous message occupied, to rewind before reprinting.
    printed_rows: usize,
}

/// One shared block for the whole process. The rebuild actor and the
/// watcher both report here, so each overwrites the other's stale output.
static STATUS: LazyLock<Mutex<StatusBlock>> =
    LazyLock::new(|| Mutex::new(StatusBlock { printed_rows: 0 }));

impl StatusBlock {
    fn success(&mut self, message: &str) {
        self.show(&format!("{}", "✓".green()), message);
    }

    fn unchanged(&mut self, message: &str) {
        self.show("", &format!("{}", message.dimmed()));
    }

    fn error(&mut self, summary: &str, detail: &str) {
        let body = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.show(&format!("{}", "✗".red()), &body);
    }

    fn warning(&mut self, detail: &str) {
        self.show(&format!("{}", "⚠".yellow()), detail);
    }

    /// Rewind over the previous message, print the new one, remember its
    /// height for the next rewind.
    fn show(&mut self, badge: &str, message: &str) {
        let mut out = stdout().lock();

        if self.printed_rows > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let rows = self.printed_rows as u16;
            execute!(out, cursor::MoveUp(rows)).ok();
            execute!(out, Clear(ClearType::FromCursorDown)).ok();
        }

        let stamp = format!("[{}]", now()).dimmed().to_string();
        if badge.is_empty() {
            writeln!(out, "{stamp} {message}").ok();
        } else {
            writeln!(out, "{stamp} {badge} {message}").ok();
        }
        out.flush().ok();

        self.printed_rows = message.matches('\n').count() + 1;
    }
}

/// Report a successful rebuild pass (green check).
pub fn status_success(message: &str) {
    STATUS.lock().success(message);
}

/// Report a pass that produced nothing new (dimmed, no badge).
pub fn status_unchanged(message: &str) {
    STATUS.lock().unchanged(message);
}

/// Report a failed pass (red cross, detail block underneath).
pub fn status_error(summary: &str, detail: &str) {
    STATUS.lock().error(summary, detail);
}

/// Report a recoverable problem that did not stop the pass.
pub fn status_warning(detail: &str) {
    STATUS.lock().warning(detail);
}

// ============================================================================
// Progress Line
// ============================================================================

/// Per-unit file counters on one line: `[build] styles(1/1) fonts(8/14)`.
///
/// Units bump their counter from worker threads; the line refreshes
/// opportunistically via `try_lock` so a busy display never blocks a
/// build. `finish` keeps the final line; dropping without it clears it.
pub struct ProgressLine {
    tallies: Vec<UnitTally>,
    refresh: Mutex<()>,
}

struct UnitTally {
    unit: &'static str,
    total: usize,
    done: AtomicUsize,
}

impl ProgressLine {
    /// Start a line for the given `(unit, expected files)` pairs.
    /// Units with nothing to do are left out.
    pub fn new(units: &[(&'static str, usize)]) -> Self {
        let tallies = units
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(unit, total)| UnitTally {
                unit,
                total,
                done: AtomicUsize::new(0),
            })
            .collect();

        ACTIVE_BARS.store(1, Ordering::SeqCst);

        let line = Self {
            tallies,
            refresh: Mutex::new(()),
        };
        line.redraw(false);
        line
    }

    /// Count one finished file for `unit`. Skips the repaint when another
    /// thread is already drawing.
    #[inline]
    pub fn inc(&self, unit: &str) {
        if let Some(tally) = self.tallies.iter().find(|t| t.unit == unit) {
            tally.done.fetch_add(1, Ordering::Relaxed);
            if let Some(_guard) = self.refresh.try_lock() {
                self.redraw(false);
            }
        }
    }

    fn render(&self) -> String {
        let parts: Vec<_> = self
            .tallies
            .iter()
            .map(|t| format!("{}({}/{})", t.unit, t.done.load(Ordering::Relaxed), t.total))
            .collect();
        parts.join(" ")
    }

    /// Repaint in place. With `keep` the line ends in a newline and
    /// stays in the scrollback.
    fn redraw(&self, keep: bool) {
        let mut out = stdout().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if keep {
            writeln!(out, "{} {}", paint_prefix("build"), self.render()).ok();
        } else {
            write!(out, "{} {}", paint_prefix("build"), self.render()).ok();
        }
        out.flush().ok();
    }

    /// Print the final counts and leave the line on screen.
    pub fn finish(self) {
        ACTIVE_BARS.store(0, Ordering::SeqCst);

        {
            let _guard = self.refresh.lock(); // let an in-flight repaint drain
            self.redraw(true);
        }

        std::mem::forget(self); // Drop would wipe the line
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        ACTIVE_BARS.store(0, Ordering::SeqCst);

        let mut out = stdout().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================
