//! Mission-level devices: the actuatable targets a mission visits.
//!
//! A device is a station plus a target kind. Valves carry an angular goal
//! state; breaker boxes are coarse-arrival targets; breaker switches belong
//! to the breaker box parsed before them.

use shipbot_types::{Station, ValveKind};

/// Which half of a breaker box a token names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerSide {
    A,
    B,
}

impl BreakerSide {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(BreakerSide::A),
            'B' => Some(BreakerSide::B),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            BreakerSide::A => 'A',
            BreakerSide::B => 'B',
        }
    }
}

/// One actuatable target recognized in the mission file.
///
/// Immutable once built except for the goal state, which the mission layer
/// may set after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Valve {
        station: Station,
        kind: ValveKind,
        goal_angle: Option<i64>,
    },
    BreakerBox {
        station: Station,
        side: BreakerSide,
    },
    BreakerSwitch {
        station: Station,
        index: u8,
        goal: Option<i64>,
    },
}

impl Device {
    /// The station this device sits at.
    pub fn station(&self) -> Station {
        match self {
            Device::Valve { station, .. }
            | Device::BreakerBox { station, .. }
            | Device::BreakerSwitch { station, .. } => *station,
        }
    }

    /// Vision id keying this device's sensor record.
    pub fn cv_id(&self) -> String {
        match self {
            Device::Valve { station, kind, .. } => {
                let code = match kind {
                    ValveKind::Small => "v1",
                    ValveKind::Large => "v2",
                    ValveKind::Shuttlecock => "v3",
                };
                format!("cv_{}{}", station.letter().to_ascii_lowercase(), code)
            }
            Device::BreakerBox { station, side } => format!(
                "cv_{}{}",
                station.letter().to_ascii_lowercase(),
                side.letter().to_ascii_lowercase()
            ),
            Device::BreakerSwitch { station, index, .. } => format!(
                "cv_{}b{}",
                station.letter().to_ascii_lowercase(),
                index
            ),
        }
    }

    /// Set the goal state. Valves and switches store it; breaker boxes have
    /// no goal and ignore it.
    pub fn set_goal_state(&mut self, goal_state: i64) {
        match self {
            Device::Valve { goal_angle, .. } => *goal_angle = Some(goal_state),
            Device::BreakerSwitch { goal, .. } => *goal = Some(goal_state),
            Device::BreakerBox { .. } => {}
        }
    }

    /// The angular goal, where one exists.
    pub fn goal_state(&self) -> Option<i64> {
        match self {
            Device::Valve { goal_angle, .. } => *goal_angle,
            Device::BreakerSwitch { goal, .. } => *goal,
            Device::BreakerBox { .. } => None,
        }
    }

    /// `true` for devices needing the fine-manipulation task chain.
    pub fn needs_fine_manipulation(&self) -> bool {
        !matches!(self, Device::BreakerBox { .. })
    }

    /// Mission-log description of this device and its goal.
    pub fn description(&self) -> String {
        match self {
            Device::Valve {
                station,
                kind,
                goal_angle,
            } => match goal_angle {
                Some(angle) => format!(
                    "Device: {} @ Station {} -- Rotate to [{}] degrees.",
                    kind.label(),
                    station,
                    angle
                ),
                None => format!(
                    "Device: {} @ Station {} -- No goal state set.",
                    kind.label(),
                    station
                ),
            },
            Device::BreakerBox { station, side } => {
                format!("Device: Breaker Box {} @ Station {}.", side.letter(), station)
            }
            Device::BreakerSwitch { station, index, .. } => {
                format!("Device: Breaker Switch B{} @ Station {}.", index, station)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valve_description_names_kind_station_and_goal() {
        let mut valve = Device::Valve {
            station: Station::A,
            kind: ValveKind::Small,
            goal_angle: None,
        };
        valve.set_goal_state(90);
        assert_eq!(
            valve.description(),
            "Device: Small Valve @ Station A -- Rotate to [90] degrees."
        );
    }

    #[test]
    fn cv_ids_are_distinct_per_device() {
        let valve = Device::Valve {
            station: Station::C,
            kind: ValveKind::Shuttlecock,
            goal_angle: None,
        };
        let bbox = Device::BreakerBox {
            station: Station::C,
            side: BreakerSide::A,
        };
        let switch = Device::BreakerSwitch {
            station: Station::C,
            index: 2,
            goal: None,
        };
        assert_eq!(valve.cv_id(), "cv_cv3");
        assert_eq!(bbox.cv_id(), "cv_ca");
        assert_eq!(switch.cv_id(), "cv_cb2");
    }

    #[test]
    fn breaker_box_ignores_goal_state() {
        let mut bbox = Device::BreakerBox {
            station: Station::D,
            side: BreakerSide::B,
        };
        bbox.set_goal_state(1);
        assert_eq!(bbox.goal_state(), None);
    }

    #[test]
    fn only_breaker_boxes_skip_fine_manipulation() {
        let valve = Device::Valve {
            station: Station::A,
            kind: ValveKind::Large,
            goal_angle: None,
        };
        let bbox = Device::BreakerBox {
            station: Station::A,
            side: BreakerSide::A,
        };
        assert!(valve.needs_fine_manipulation());
        assert!(!bbox.needs_fine_manipulation());
    }
}
