//! Mission-file parser.
//!
//! A mission file is free-form text. Three word shapes are recognized:
//!
//! - `<letter>V<1-3>` – a valve at the lettered station;
//! - `<letter><A|B>`  – a breaker box at the lettered station;
//! - `B<1-3>`         – a breaker switch on the most recently parsed
//!   breaker box.
//!
//! A bare integer immediately following a word token is the mission time
//! limit in seconds; the last one wins. A station-shaped token whose letter
//! falls outside A-H is logged as an error and contributes nothing.
//! Everything else is ignored.

use std::path::Path;

use shipbot_types::log::MissionLog;
use shipbot_types::{ShipbotError, Station, ValveKind};
use tracing::debug;

use crate::device::{BreakerSide, Device};

const COMPONENT: &str = "MISSION_PARSER";

/// The parsed mission: devices in order of appearance plus the time budget.
#[derive(Debug, Clone, Default)]
pub struct MissionPlan {
    pub devices: Vec<Device>,
    /// Overall time limit in seconds; 0 when the file names none.
    pub time_limit: u64,
}

impl MissionPlan {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Parse a mission file.
///
/// Lenient end to end: a missing or unreadable file is logged and yields an
/// empty plan, indistinguishable from a file with no recognized tokens.
/// Callers that want absence to be fatal must check the path themselves
/// before parsing.
pub fn parse_mission_file(path: &Path, log: &MissionLog) -> MissionPlan {
    if !verify_mission_path(path, log) {
        return MissionPlan::default();
    }
    match std::fs::read_to_string(path) {
        Ok(text) => parse_mission_str(&text, log),
        Err(e) => {
            log.error(COMPONENT, &format!("failed to read mission file: {e}"));
            MissionPlan::default()
        }
    }
}

/// Confirm the mission path names a readable regular file.
pub fn verify_mission_path(path: &Path, log: &MissionLog) -> bool {
    if !path.is_file() {
        log.error(
            COMPONENT,
            "Mission file does not exist or is not a file.",
        );
        return false;
    }
    if std::fs::File::open(path).is_err() {
        log.error(COMPONENT, "Mission file is not readable.");
        return false;
    }
    true
}

/// Tokenize mission text into a [`MissionPlan`].
pub fn parse_mission_str(input: &str, log: &MissionLog) -> MissionPlan {
    let mut plan = MissionPlan::default();
    // Station of the most recently parsed breaker box, for switch tokens.
    let mut last_breaker_box: Option<Station> = None;
    let mut last_was_word = false;

    for token in input.split_whitespace() {
        if let Ok(value) = token.parse::<f64>() {
            if last_was_word && value >= 0.0 {
                plan.time_limit = value as u64;
            }
            last_was_word = false;
            continue;
        }

        let chars: Vec<char> = token.chars().collect();
        match chars.as_slice() {
            [letter, 'V', digit @ '1'..='3'] => match Station::from_letter(*letter) {
                Some(station) => {
                    let kind = ValveKind::from_digit(*digit)
                        .unwrap_or(ValveKind::Small);
                    plan.devices.push(Device::Valve {
                        station,
                        kind,
                        goal_angle: None,
                    });
                }
                None => log_unrecognized(log, *letter),
            },
            ['B', digit @ '1'..='3'] => match last_breaker_box {
                Some(station) => {
                    let index = *digit as u8 - b'0';
                    plan.devices.push(Device::BreakerSwitch {
                        station,
                        index,
                        goal: None,
                    });
                }
                None => log.error(
                    COMPONENT,
                    &format!("Breaker switch '{token}' has no preceding breaker box."),
                ),
            },
            [letter, side @ ('A' | 'B')] => match Station::from_letter(*letter) {
                Some(station) => {
                    let side = BreakerSide::from_letter(*side)
                        .unwrap_or(BreakerSide::A);
                    plan.devices.push(Device::BreakerBox { station, side });
                    last_breaker_box = Some(station);
                }
                None => log_unrecognized(log, *letter),
            },
            _ => debug!(token, "ignoring unrelated mission token"),
        }
        last_was_word = true;
    }

    plan
}

fn log_unrecognized(log: &MissionLog, letter: char) {
    let err = ShipbotError::UnrecognizedToken(letter);
    log.error(COMPONENT, &format!("Unrecognized character in mission file! ({err})"));
}
