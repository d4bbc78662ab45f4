//! Shared vocabulary for the shipbot controller: stations, valve kinds, task
//! lifecycle states, process owner identities, and the error taxonomy.
//!
//! Everything here is cheap to copy and free of I/O; the one exception is
//! [`log::MissionLog`], the injected status logger shared by every crate that
//! writes to the mission status file.

pub mod log;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process identities stamped into hardware record files.
///
/// The owner tag is the only synchronization signal between the mission
/// controller and the firmware: a reader must discard any record whose owner
/// is not the producer it expects.
pub mod owner {
    /// Initial value written when a record file is bootstrapped, before
    /// either process has produced real data.
    pub const BOOTSTRAP: i64 = 0;
    /// The high-level mission controller (this process).
    pub const CONTROLLER: i64 = 1;
    /// The low-level motor/sensor firmware process.
    pub const FIRMWARE: i64 = 2;
}

/// One of the eight lettered physical locations on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Station {
    /// Resolve a mission-file station letter. Letters outside `A..=H` are not
    /// stations and yield `None`.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Station::A),
            'B' => Some(Station::B),
            'C' => Some(Station::C),
            'D' => Some(Station::D),
            'E' => Some(Station::E),
            'F' => Some(Station::F),
            'G' => Some(Station::G),
            'H' => Some(Station::H),
            _ => None,
        }
    }

    /// The mission-grammar letter for this station.
    pub fn letter(&self) -> char {
        match self {
            Station::A => 'A',
            Station::B => 'B',
            Station::C => 'C',
            Station::D => 'D',
            Station::E => 'E',
            Station::F => 'F',
            Station::G => 'G',
            Station::H => 'H',
        }
    }

    /// Panel coordinates of the station, in millimetres from the testbed
    /// origin. A-F sit along the long wall; G and H on the short wall.
    pub fn coordinates(&self) -> (i64, i64) {
        match self {
            Station::A => (0, 0),
            Station::B => (300, 0),
            Station::C => (600, 0),
            Station::D => (900, 0),
            Station::E => (1200, 0),
            Station::F => (1500, 0),
            Station::G => (1800, 450),
            Station::H => (1800, 900),
        }
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The three rotational device kinds, distinguished by the `V1`/`V2`/`V3`
/// suffix in the mission grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValveKind {
    Small,
    Large,
    Shuttlecock,
}

impl ValveKind {
    /// Resolve the digit of a valve token (`'1'..='3'`).
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(ValveKind::Small),
            '2' => Some(ValveKind::Large),
            '3' => Some(ValveKind::Shuttlecock),
            _ => None,
        }
    }

    /// Human-readable device name used in mission log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ValveKind::Small => "Small Valve",
            ValveKind::Large => "Large Valve",
            ValveKind::Shuttlecock => "Shuttlecock",
        }
    }
}

impl std::fmt::Display for ValveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle state of a scheduled task.
///
/// `Pending` is the initial state; `Succeeded` and `Failed` are terminal.
/// Every task must reach a terminal state before its `execute` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// `true` for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Error taxonomy for the controller.
///
/// None of these aborts a mission: every call site handles its own failures
/// locally by logging and returning a safe default.
#[derive(Error, Debug)]
pub enum ShipbotError {
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stale record for '{device}': owner {owner}, expected {expected}")]
    Stale {
        device: String,
        owner: i64,
        expected: i64,
    },

    #[error("record for '{device}' names unknown field '{field}'")]
    UnknownField { device: String, field: String },

    #[error("unrecognized character '{0}' in mission file")]
    UnrecognizedToken(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_letters_round_trip() {
        for letter in 'A'..='H' {
            let station = Station::from_letter(letter).unwrap();
            assert_eq!(station.letter(), letter);
        }
    }

    #[test]
    fn station_rejects_letters_outside_panel() {
        assert!(Station::from_letter('Z').is_none());
        assert!(Station::from_letter('a').is_none());
        assert!(Station::from_letter('1').is_none());
    }

    #[test]
    fn station_serialization_roundtrip() {
        let json = serde_json::to_string(&Station::C).unwrap();
        let back: Station = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Station::C);
    }

    #[test]
    fn valve_kind_from_suffix_digit() {
        assert_eq!(ValveKind::from_digit('1'), Some(ValveKind::Small));
        assert_eq!(ValveKind::from_digit('2'), Some(ValveKind::Large));
        assert_eq!(ValveKind::from_digit('3'), Some(ValveKind::Shuttlecock));
        assert_eq!(ValveKind::from_digit('4'), None);
    }

    #[test]
    fn task_status_terminal_states() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn error_display_names_the_device() {
        let err = ShipbotError::Stale {
            device: "drive_0".to_string(),
            owner: 1,
            expected: 2,
        };
        assert!(err.to_string().contains("drive_0"));
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn owner_ids_are_distinct() {
        assert_ne!(owner::BOOTSTRAP, owner::CONTROLLER);
        assert_ne!(owner::CONTROLLER, owner::FIRMWARE);
        assert_ne!(owner::BOOTSTRAP, owner::FIRMWARE);
    }
}
