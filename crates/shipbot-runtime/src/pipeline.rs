//! Per-device task expansion.
//!
//! Every recognized device expands to a fixed, ordered task sequence:
//!
//! - fine-manipulation devices (valves, breaker switches):
//!   Move → Capture → Position → Align → Engage
//! - coarse-arrival devices (breaker boxes):
//!   Move → Approach
//!
//! The sequences are fixed at build time; all retry logic lives inside the
//! individual tasks.

use shipbot_mission::Device;
use shipbot_types::ValveKind;

use crate::config::MissionConfig;
use crate::tasks::{AlignTask, ApproachTask, CaptureTask, EngageTask, MoveTask, PositionTask, Task};

/// Build the ordered task sequence for one device.
pub fn tasks_for_device(device: &Device, config: &MissionConfig) -> Vec<Box<dyn Task>> {
    let station = device.station();
    let mut tasks: Vec<Box<dyn Task>> = vec![Box::new(MoveTask::new(station))];

    if !device.needs_fine_manipulation() {
        tasks.push(Box::new(ApproachTask::new(station, device.cv_id())));
        return tasks;
    }

    let (fixed, rotator) = arm_preset(device);
    let (depth, height) = align_preset(device);
    tasks.push(Box::new(CaptureTask::new(
        device.cv_id(),
        config.capture_attempts,
        config.capture_retry,
    )));
    tasks.push(Box::new(PositionTask::new(fixed, rotator)));
    tasks.push(Box::new(AlignTask::new(depth, height)));
    tasks.push(Box::new(EngageTask::new(
        device.goal_state(),
        config.engage_step_budget,
    )));
    tasks
}

/// Arm joint preset `(fixed, rotator)` for a device kind.
fn arm_preset(device: &Device) -> (i64, i64) {
    match device {
        Device::Valve { kind, .. } => match kind {
            ValveKind::Small | ValveKind::Large => (90, 0),
            // Shuttlecock handles sit side-on.
            ValveKind::Shuttlecock => (0, 90),
        },
        Device::BreakerSwitch { .. } => (45, 0),
        Device::BreakerBox { .. } => (0, 0),
    }
}

/// Stepper preset `(depth, height)` for a device kind.
fn align_preset(device: &Device) -> (i64, i64) {
    match device {
        Device::Valve { kind, .. } => match kind {
            ValveKind::Small => (40, 120),
            ValveKind::Large => (60, 140),
            ValveKind::Shuttlecock => (50, 160),
        },
        Device::BreakerSwitch { .. } => (30, 100),
        Device::BreakerBox { .. } => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipbot_mission::BreakerSide;
    use shipbot_types::Station;

    fn display_names(tasks: &[Box<dyn Task>]) -> Vec<String> {
        tasks
            .iter()
            .map(|t| t.to_string().split_whitespace().next().unwrap().to_string())
            .collect()
    }

    #[test]
    fn valve_expands_to_exactly_five_tasks_in_order() {
        let valve = Device::Valve {
            station: Station::A,
            kind: ValveKind::Small,
            goal_angle: Some(90),
        };
        let tasks = tasks_for_device(&valve, &MissionConfig::default());
        assert_eq!(
            display_names(&tasks),
            vec!["Move", "Capture", "Position", "Align", "Engage"]
        );
    }

    #[test]
    fn breaker_box_expands_to_coarse_arrival_only() {
        let bbox = Device::BreakerBox {
            station: Station::C,
            side: BreakerSide::A,
        };
        let tasks = tasks_for_device(&bbox, &MissionConfig::default());
        assert_eq!(display_names(&tasks), vec!["Move", "Approach"]);
    }

    #[test]
    fn breaker_switch_gets_the_fine_manipulation_chain() {
        let switch = Device::BreakerSwitch {
            station: Station::C,
            index: 1,
            goal: None,
        };
        let tasks = tasks_for_device(&switch, &MissionConfig::default());
        assert_eq!(tasks.len(), 5);
    }

    #[test]
    fn every_built_task_starts_pending() {
        let valve = Device::Valve {
            station: Station::H,
            kind: ValveKind::Shuttlecock,
            goal_angle: None,
        };
        for task in tasks_for_device(&valve, &MissionConfig::default()) {
            assert_eq!(task.status(), shipbot_types::TaskStatus::Pending);
        }
    }
}
