//! Logging utilities with colored terminal output and a plain-text log file.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output shown only with `--verbose`
//! - [`LogGuard`] which mirrors every line into a log file for one run
//!
//! # Example
//!
//! ```ignore
//! let _guard = logger::open_log_file(Path::new("flatdim.log"))?;
//! log!("open"; "reading {}", path.display());
//! // file is flushed and closed when `_guard` drops
//! ```

use owo_colors::{OwoColorize, Stream::Stdout};
use parking_lot::Mutex;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write, stdout},
    mem,
    path::{Path, PathBuf},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Where plain log lines go.
enum Sink {
    /// No log file yet; lines are kept and replayed once one opens.
    Pending(Vec<String>),
    /// Log file open while a [`LogGuard`] is alive.
    File(BufWriter<File>),
    /// The guard dropped; lines go to the terminal only.
    Closed,
}

static LOG_SINK: LazyLock<Mutex<Sink>> = LazyLock::new(|| Mutex::new(Sink::Pending(Vec::new())));

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
///
/// The same line, without colors, is appended to the log file if one is open.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();

    write_to_file(module, message);
}

/// Apply color to a module prefix based on module type
///
/// Honors `--color` through `owo_colors::set_override`.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "error" => prefix
            .if_supports_color(Stdout, |p| p.bright_red().bold().to_string())
            .to_string(),
        "warning" => prefix
            .if_supports_color(Stdout, |p| p.yellow().bold().to_string())
            .to_string(),
        "done" => prefix
            .if_supports_color(Stdout, |p| p.bright_green().bold().to_string())
            .to_string(),
        "inspect" => prefix
            .if_supports_color(Stdout, |p| p.bright_blue().bold().to_string())
            .to_string(),
        _ => prefix
            .if_supports_color(Stdout, |p| p.bright_yellow().bold().to_string())
            .to_string(),
    }
}

/// Append one plain line to the log file, flushing immediately.
fn write_to_file(module: &str, message: &str) {
    match &mut *LOG_SINK.lock() {
        Sink::Pending(lines) => lines.push(format!("[{module}] {message}")),
        Sink::File(file) => {
            writeln!(file, "[{module}] {message}").ok();
            file.flush().ok();
        }
        Sink::Closed => {}
    }
}

/// Log an error and every cause below it.
pub fn log_error_chain(err: &anyhow::Error) {
    log("error", &err.to_string());
    for cause in err.chain().skip(1) {
        log("error", &format!("caused by: {cause}"));
    }
}

// ============================================================================
// Log File
// ============================================================================

/// Keeps the log file open for the duration of a run.
///
/// Dropping the guard flushes and closes the file on every exit path.
#[must_use = "the log file is closed as soon as the guard is dropped"]
pub struct LogGuard {
    path: PathBuf,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let mut sink = LOG_SINK.lock();
        if let Sink::File(mut file) = mem::replace(&mut *sink, Sink::Closed) {
            file.flush().ok();
        }
    }
}

/// Open (and truncate) the log file, routing every `log!` line into it.
///
/// Lines logged before the file opened are written first.
pub fn open_log_file(path: &Path) -> io::Result<LogGuard> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(path)?);

    let mut sink = LOG_SINK.lock();
    if let Sink::Pending(lines) = &*sink {
        for line in lines {
            writeln!(file, "{line}")?;
        }
        file.flush()?;
    }
    *sink = Sink::File(file);

    Ok(LogGuard {
        path: path.to_path_buf(),
    })
}

// ============================================================================
// Tests
// ============================================================================
