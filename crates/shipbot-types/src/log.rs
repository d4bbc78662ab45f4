//! [`MissionLog`] – the append-only mission status log.
//!
//! Three line formats share one file:
//!
//! ```text
//! [ <COMPONENT> ERROR ] (<timestamp>) <message>
//! [ MISSION LOG ] (<timestamp>) <message>
//!     [ TASK LOG ] (<timestamp>) <message>
//! ```
//!
//! The log is cleared at the start of each mission run. Error lines are
//! additionally emitted on the `tracing` error channel so they reach the
//! operator's console even when nobody is tailing the file.
//!
//! The logger is constructed once at process start and handed to every
//! component that logs, instead of living behind a process-wide global. It
//! is cheap to clone.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::error;

const TIMESTAMP_FORMAT: &str = "%H:%M:%S %Y/%m/%d";

/// Handle to the mission status log file.
#[derive(Debug, Clone)]
pub struct MissionLog {
    path: Arc<PathBuf>,
}

impl MissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Path of the underlying status log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the status log, creating parent directories as needed.
    /// Called once when a mission run starts.
    pub fn clear(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            error!(path = %parent.display(), error = %e, "failed to create log directory");
            return;
        }
        if let Err(e) = std::fs::write(self.path.as_ref(), "") {
            error!(path = %self.path.display(), error = %e, "failed to clear status log");
        }
    }

    /// Log a mission-level status report.
    pub fn mission_status(&self, message: &str) {
        let line = format!("[ MISSION LOG ] ({}) {}\n", timestamp(), message);
        self.append(&line);
    }

    /// Log a task-level status report (indented under the mission lines).
    pub fn task_status(&self, message: &str) {
        let line = format!("    [ TASK LOG ] ({}) {}\n", timestamp(), message);
        self.append(&line);
    }

    /// Log an error from the named component. The line goes to the status
    /// log file and to the `tracing` error channel.
    pub fn error(&self, component: &str, message: &str) {
        let line = format!("[ {} ERROR ] ({}) {}\n", component, timestamp(), message);
        error!(component, "{message}");
        self.append(&line);
    }

    fn append(&self, line: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_ref())
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            // The log itself failing must not take the mission down.
            eprintln!("ERROR LOGGING STATUS :: {e}");
        }
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
