//! Build progress reporting.
//!
//! Reporters receive one event per pipeline transition: batch started, job
//! started, job completed, batch completed. Console output goes to stderr
//! so machine-readable responses can own stdout; the JSON reporter emits
//! one serialized event per line for orchestrators that tail the stream.

use crate::jobs::outcome::JobResultCode;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Events reported while a batch runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Dispatch of a batch started.
    BatchStarted {
        /// Number of jobs in the batch.
        total_jobs: usize,
    },
    /// One job started executing.
    JobStarted {
        /// Job identity, formatted as `kind:source@platform`.
        job: String,
    },
    /// One job resolved to a terminal outcome.
    JobCompleted {
        job: String,
        code: JobResultCode,
        duration_ms: u64,
        /// Failure diagnostic, absent on success.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// The whole batch resolved.
    BatchCompleted {
        succeeded: usize,
        failed: usize,
        crashed: usize,
        cancelled: usize,
        duration_ms: u64,
    },
    /// Something worth flagging that did not fail a job (e.g. an asset no
    /// job was created for).
    Warning {
        #[serde(skip_serializing_if = "Option::is_none")]
        job: Option<String>,
        message: String,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {
        // Discard all events
    }
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Completed job count
    current: AtomicUsize,
    /// Total job count
    total: AtomicUsize,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console progress reporter writing to stderr.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false, // Disable colors for custom output
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Format a colored string.
    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, "\x1b[1m")
    }

    /// Write a line to output.
    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BatchStarted { total_jobs } => {
                self.total.store(total_jobs, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                if total_jobs > 0 {
                    self.writeln(&format!(
                        "{} Dispatching {} job{}...",
                        self.cyan("[build]"),
                        total_jobs,
                        if total_jobs == 1 { "" } else { "s" }
                    ));
                }
            }
            ProgressEvent::JobStarted { job } => {
                if self.verbose {
                    let current = self.current.load(Ordering::SeqCst) + 1;
                    let total = self.total.load(Ordering::SeqCst);
                    self.writeln(&format!(
                        "{} [{}/{}] Running {}...",
                        self.cyan("[build]"),
                        current,
                        total,
                        job
                    ));
                }
            }
            ProgressEvent::JobCompleted {
                job,
                code,
                duration_ms,
                message,
            } => {
                self.current.fetch_add(1, Ordering::SeqCst);
                let current = self.current.load(Ordering::SeqCst);
                let total = self.total.load(Ordering::SeqCst);

                let status_str = match code {
                    JobResultCode::Success => self.green("ok"),
                    JobResultCode::Failed => self.red("FAILED"),
                    JobResultCode::Crashed => self.red("CRASHED"),
                    JobResultCode::Cancelled => self.yellow("stopped"),
                };

                self.writeln(&format!(
                    "{} [{}/{}] {} {} ({})",
                    self.cyan("[build]"),
                    current,
                    total,
                    status_str,
                    job,
                    format_duration(duration_ms)
                ));

                // Diagnostics only for real errors; cancellations stay quiet.
                if code.is_error() {
                    if let Some(message) = message {
                        self.writeln(&format!("        {}", self.red(&message)));
                    }
                }
            }
            ProgressEvent::BatchCompleted {
                succeeded,
                failed,
                crashed,
                cancelled,
                duration_ms,
            } => {
                let duration_str = format_duration(duration_ms);
                if failed + crashed > 0 {
                    self.writeln(&format!(
                        "\n{} Build failed: {} succeeded, {} failed, {} crashed in {}",
                        self.red("[error]"),
                        succeeded,
                        failed,
                        crashed,
                        duration_str
                    ));
                } else if cancelled > 0 {
                    self.writeln(&format!(
                        "\n{} Build stopped: {} succeeded, {} cancelled in {}",
                        self.yellow("[stopped]"),
                        succeeded,
                        cancelled,
                        duration_str
                    ));
                } else {
                    self.writeln(&format!(
                        "\n{} {} job{} built in {}",
                        self.green("[done]"),
                        self.bold(&format!("{}", succeeded)),
                        if succeeded == 1 { "" } else { "s" },
                        duration_str
                    ));
                }
            }
            ProgressEvent::Warning { job, message } => {
                let prefix = match job {
                    Some(job) => format!("{}: ", job),
                    None => String::new(),
                };
                self.writeln(&format!("{} {}{}", self.yellow("[warn]"), prefix, message));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON progress reporter for machine-readable output.
///
/// One event per line, serialized with the `event` field as the tag.
pub struct JsonProgress {
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            output: Mutex::new(Box::new(output)),
        }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        // Events are flat structs of strings and integers; serialization
        // cannot fail in practice, and a dropped progress line must never
        // fail the build.
        if let Ok(json) = serde_json::to_string(&event) {
            if let Ok(mut output) = self.output.lock() {
                let _ = writeln!(output, "{}", json);
            }
        }
    }
}

/// Format a duration in milliseconds to a human-readable string.
pub(crate) fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
