//! In-process simulation collaborators for tests without cameras or arms.
//!
//! [`SimVision`] and [`SimArm`] stand in for the record-backed production
//! implementations so that [`SystemState`][crate::system_state::SystemState]
//! and the task pipeline can run in headless tests and CI.

use crate::arm::Arm;
use crate::vision::Vision;

/// A simulated vision feed with a scriptable number of pending captures.
#[derive(Debug)]
pub struct SimVision {
    angle: i64,
    offset: f64,
    pending_captures: u32,
    pub capture_calls: u32,
}

impl SimVision {
    /// A feed that reports `pending` fresh captures, each with the given
    /// angle and offset.
    pub fn new(angle: i64, offset: f64, pending: u32) -> Self {
        Self {
            angle,
            offset,
            pending_captures: pending,
            capture_calls: 0,
        }
    }

    /// Change the measured angle mid-test (e.g. after an engagement step).
    pub fn set_angle(&mut self, angle: i64) {
        self.angle = angle;
    }
}

impl Vision for SimVision {
    fn capture(&mut self, _cv_id: &str) -> bool {
        self.capture_calls += 1;
        if self.pending_captures == 0 {
            return false;
        }
        self.pending_captures -= 1;
        true
    }

    fn angular_position(&mut self) -> i64 {
        self.angle
    }

    fn horizontal_offset(&mut self) -> f64 {
        self.offset
    }
}

/// A simulated arm that records the most recent joint command.
#[derive(Debug, Default)]
pub struct SimArm {
    fixed: i64,
    rotator: i64,
    pub commands: Vec<(i64, i64)>,
}

impl SimArm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Arm for SimArm {
    fn position(&mut self) -> (i64, i64) {
        (self.fixed, self.rotator)
    }

    fn set_position(&mut self, fixed: i64, rotator: i64) {
        self.fixed = fixed;
        self.rotator = rotator;
        self.commands.push((fixed, rotator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_vision_exhausts_pending_captures() {
        let mut vision = SimVision::new(25, -3.5, 2);
        assert!(vision.capture("cv_av1"));
        assert!(vision.capture("cv_av1"));
        assert!(!vision.capture("cv_av1"));
        assert_eq!(vision.capture_calls, 3);
    }

    #[test]
    fn sim_arm_records_commands() {
        let mut arm = SimArm::new();
        arm.set_position(90, 45);
        assert_eq!(arm.position(), (90, 45));
        assert_eq!(arm.commands, vec![(90, 45)]);
    }
}
