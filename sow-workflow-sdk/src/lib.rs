//! Progress reporting for SOW research workflows.
//!
//! Workflows report what they are doing through [`ProgressEvent`]s handed to a
//! [`ProgressSink`]. Sinks decide where events go: structured JSON lines on
//! stderr for a supervising process, a broadcast channel for an in-process UI,
//! a vector for tests, or colored console lines for a human at a terminal.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Prefix marking a structured event line on stderr
pub const EVENT_PREFIX: &str = "__SOW_EVENT__:";

/// Structured progress events emitted by workflows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Research phase started
    PhaseStarted {
        phase: usize,
        name: String,
        total_topics: usize,
    },
    /// A research topic is about to be queried
    TopicStarted {
        phase: usize,
        topic: String,
        label: String,
        ordinal: usize,
        total: usize,
    },
    /// A research topic answered in time
    TopicCompleted {
        phase: usize,
        topic: String,
        preview: String,
    },
    /// A research topic failed or timed out
    TopicFailed {
        phase: usize,
        topic: String,
        error: String,
    },
    /// Every topic of the phase has been attempted
    PhaseCompleted {
        phase: usize,
        name: String,
        succeeded: usize,
        failed: usize,
    },
    /// Final document composition call issued
    CompositionStarted { subject: String, service: String },
    /// Final document received
    CompositionCompleted { words: usize },
    /// Final document call failed; the run is abandoned
    CompositionFailed { error: String },
    /// Intermediate output written to disk
    StateFileCreated {
        phase: usize,
        file_path: String,
        description: String,
    },
}

impl ProgressEvent {
    /// Phase number, when the event belongs to one
    pub fn phase(&self) -> Option<usize> {
        match self {
            ProgressEvent::PhaseStarted { phase, .. }
            | ProgressEvent::TopicStarted { phase, .. }
            | ProgressEvent::TopicCompleted { phase, .. }
            | ProgressEvent::TopicFailed { phase, .. }
            | ProgressEvent::PhaseCompleted { phase, .. }
            | ProgressEvent::StateFileCreated { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Topic id, for per-topic events
    pub fn topic(&self) -> Option<&str> {
        match self {
            ProgressEvent::TopicStarted { topic, .. }
            | ProgressEvent::TopicCompleted { topic, .. }
            | ProgressEvent::TopicFailed { topic, .. } => Some(topic),
            _ => None,
        }
    }

    /// Short human-readable line describing the event
    pub fn summary(&self) -> String {
        match self {
            ProgressEvent::PhaseStarted {
                name, total_topics, ..
            } => format!("{}: {} research queries", name, total_topics),
            ProgressEvent::TopicStarted {
                label,
                ordinal,
                total,
                ..
            } => format!("{} ({}/{})", label, ordinal, total),
            ProgressEvent::TopicCompleted { topic, preview, .. } => {
                format!("{} complete: {}...", topic, preview)
            }
            ProgressEvent::TopicFailed { topic, error, .. } => {
                format!("{} failed: {}", topic, error)
            }
            ProgressEvent::PhaseCompleted {
                name,
                succeeded,
                failed,
                ..
            } => format!("{} complete ({} ok, {} failed)", name, succeeded, failed),
            ProgressEvent::CompositionStarted { subject, service } => {
                format!("Composing SOW for {} ({})", subject, service)
            }
            ProgressEvent::CompositionCompleted { words } => {
                format!("SOW generated ({} words)", words)
            }
            ProgressEvent::CompositionFailed { error } => {
                format!("SOW generation failed: {}", error)
            }
            ProgressEvent::StateFileCreated {
                file_path,
                description,
                ..
            } => format!("{}: {}", description, file_path),
        }
    }

    /// Emit this event to stderr for a supervising process to parse
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            use std::io::Write;
            eprintln!("{}{}", EVENT_PREFIX, json);
            let _ = std::io::stderr().flush();
        }
    }

    /// Parse a stderr line produced by [`ProgressEvent::emit`]
    pub fn parse_line(line: &str) -> Option<Self> {
        let json = line.trim_end().strip_prefix(EVENT_PREFIX)?;
        serde_json::from_str(json).ok()
    }
}

/// Destination for progress events
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: &ProgressEvent) {}
}

/// Writes `__SOW_EVENT__:{json}` lines to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl ProgressSink for StderrSink {
    fn emit(&self, event: &ProgressEvent) {
        event.emit();
    }
}

/// Prints colored, human-readable progress lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PhaseStarted { phase, name, .. } => {
                crate::log_phase_start_console!(phase, name, event.summary());
            }
            ProgressEvent::TopicStarted { .. } | ProgressEvent::CompositionStarted { .. } => {
                crate::log_info!(event.summary());
            }
            ProgressEvent::TopicCompleted { .. } | ProgressEvent::CompositionCompleted { .. } => {
                crate::log_success!(event.summary());
            }
            ProgressEvent::TopicFailed { .. } | ProgressEvent::CompositionFailed { .. } => {
                crate::log_warning!(event.summary());
            }
            ProgressEvent::PhaseCompleted { phase, .. } => {
                crate::log_phase_complete_console!(phase);
            }
            ProgressEvent::StateFileCreated { file_path, .. } => {
                crate::log_file_saved!(file_path);
            }
        }
    }
}

/// Fans events out to any number of in-process subscribers
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<ProgressEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }
}

impl ProgressSink for BroadcastSink {
    fn emit(&self, event: &ProgressEvent) {
        // No subscribers is not an error
        let _ = self.tx.send(event.clone());
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: &ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Colored console output for human-readable CLI logs, complementing the
// structured ProgressEvent lines.
// ============================================================================

/// Logs the start of a workflow phase with a header and description.
///
/// # Example
/// ```
/// use sow_workflow_sdk::log_phase_start_console;
/// log_phase_start_console!(0, "Client Research", "Researching Acme Co");
/// ```
///
/// Outputs:
/// ```text
/// ═══ PHASE 0: Client Research ═══
/// Researching Acme Co
/// ```
#[macro_export]
macro_rules! log_phase_start_console {
    ($phase:expr, $title:expr, $description:expr) => {
        println!("\x1b[1;36m═══ PHASE {}: {} ═══\x1b[0m", $phase, $title);
        println!("\x1b[36m{}\x1b[0m", $description);
    };
}

/// Logs the completion of a workflow phase.
///
/// # Example
/// ```
/// use sow_workflow_sdk::log_phase_complete_console;
/// log_phase_complete_console!(1);
/// ```
#[macro_export]
macro_rules! log_phase_complete_console {
    ($phase:expr) => {
        println!("\x1b[32m✓ Phase {} complete\x1b[0m", $phase);
    };
}

/// Logs an informational message.
///
/// # Example
/// ```
/// use sow_workflow_sdk::log_info;
/// log_info!("Loading research from disk");
/// let count = 5;
/// log_info!("Running {} queries", count);
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a success message.
///
/// # Example
/// ```
/// use sow_workflow_sdk::log_success;
/// log_success!("company_profile complete");
/// ```
#[macro_export]
macro_rules! log_success {
    ($message:expr) => {
        println!("\x1b[32m✓ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[32m✓ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use sow_workflow_sdk::log_warning;
/// log_warning!("compliance_requirements search timed out");
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use sow_workflow_sdk::log_file_saved;
/// log_file_saved!("./OUTPUT/sow_acme.md");
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}
