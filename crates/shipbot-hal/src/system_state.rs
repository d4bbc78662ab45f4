//! [`SystemState`] – the live aggregate view of the robot.
//!
//! Owns the vision and arm collaborators, the drive base, and the two arm
//! steppers, and folds their readings into the mission-level queries the
//! task pipeline asks: does the base need adjusting, does the effector still
//! need to engage, where is the arm. Purely in-memory derived state: nothing
//! here is persisted except through the collaborators themselves.

use shipbot_store::DeviceStore;

use crate::arm::{Arm, ArmState};
use crate::motor::{DriveField, DriveMotor, Motor, StepperField, StepperMotor};
use crate::vision::{CvSensing, Vision};

/// Device ids and thresholds for the onboard hardware.
#[derive(Debug, Clone)]
pub struct HardwareConfig {
    /// Actuator id of the drive base.
    pub drive_id: String,
    /// Actuator id of the arm depth stepper (y axis).
    pub depth_stepper_id: String,
    /// Actuator id of the arm height stepper (z axis).
    pub height_stepper_id: String,
    /// Actuator id of the two-joint arm.
    pub arm_id: String,
    /// Reach of the effector rotator in millimetres: a vision-measured
    /// horizontal offset at or beyond this raises the base-adjustment flag.
    pub rotator_length: f64,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            drive_id: "drive_0".to_string(),
            depth_stepper_id: "stepper_y".to_string(),
            height_stepper_id: "stepper_z".to_string(),
            arm_id: "hebi_arm".to_string(),
            rotator_length: 6.0,
        }
    }
}

/// The robot's current status at mission level. Created once per mission.
pub struct SystemState {
    vision: Box<dyn Vision>,
    arm: Box<dyn Arm>,
    drive: DriveMotor,
    depth: StepperMotor,
    height: StepperMotor,
    rotator_length: f64,
    base_adjustment: bool,
}

impl SystemState {
    /// Production wiring: record-backed vision and arm collaborators.
    pub fn new(store: DeviceStore, config: &HardwareConfig) -> Self {
        let vision = Box::new(CvSensing::new(store.clone()));
        let arm = Box::new(ArmState::new(config.arm_id.clone(), store.clone()));
        Self::with_collaborators(vision, arm, store, config)
    }

    /// Wiring with explicit collaborators, for tests and simulation.
    pub fn with_collaborators(
        vision: Box<dyn Vision>,
        arm: Box<dyn Arm>,
        store: DeviceStore,
        config: &HardwareConfig,
    ) -> Self {
        Self {
            vision,
            arm,
            drive: DriveMotor::new(config.drive_id.clone(), store.clone()),
            depth: StepperMotor::new(config.depth_stepper_id.clone(), store.clone()),
            height: StepperMotor::new(config.height_stepper_id.clone(), store),
            rotator_length: config.rotator_length,
            base_adjustment: false,
        }
    }

    // ── Vision queries ───────────────────────────────────────────────────────

    /// Request a fresh vision capture for the given station device.
    ///
    /// A fresh capture recomputes the sticky base-adjustment flag from the
    /// horizontal offset; no new capture leaves all state untouched.
    pub fn capture_station(&mut self, cv_id: &str) -> bool {
        if !self.vision.capture(cv_id) {
            return false;
        }
        self.base_adjustment = self.vision.horizontal_offset().abs() >= self.rotator_length;
        true
    }

    /// `true` while the most recent capture put the target beyond the
    /// rotator's reach.
    pub fn needs_base_adjustment(&self) -> bool {
        self.base_adjustment
    }

    /// Consume the base-adjustment flag.
    ///
    /// One-shot: the flag drops to `false` and the returned correction is 0;
    /// the firmware is expected to drive the pending base move to completion
    /// before the flag can be re-armed by a new capture.
    pub fn take_base_adjustment(&mut self) -> i64 {
        self.base_adjustment = false;
        0
    }

    /// `true` while the vision-measured angle differs from `goal`.
    pub fn needs_engagement(&mut self, goal: i64) -> bool {
        self.vision.angular_position() != goal
    }

    /// Signed correction to send to the effector rotator.
    ///
    /// Computed as `goal + measured`, not a subtraction: the vision stack
    /// reports the angle with the opposite sign convention from the
    /// actuator. Flagged for verification against real hardware.
    pub fn engagement_correction(&mut self, goal: i64) -> i64 {
        goal + self.vision.angular_position()
    }

    /// Live vision-measured angular position.
    pub fn measured_angle(&mut self) -> i64 {
        self.vision.angular_position()
    }

    // ── Fine adjustment (extension point) ────────────────────────────────────

    /// Whether the effector needs a fine position correction. Always `false`
    /// today; kept so the task state machine has a stable decision point
    /// once fine-adjustment sensing exists.
    pub fn needs_fine_adjustment(&self) -> bool {
        false
    }

    /// Consume the fine-adjustment correction. Always 0 today.
    pub fn take_fine_adjustment(&mut self) -> i64 {
        0
    }

    // ── Arm ──────────────────────────────────────────────────────────────────

    /// Current `(fixed, rotator)` joint angles.
    pub fn arm_position(&mut self) -> (i64, i64) {
        self.arm.position()
    }

    /// Command both arm joints.
    pub fn update_arm_position(&mut self, fixed: i64, rotator: i64) {
        self.arm.set_position(fixed, rotator);
    }

    // ── Base and steppers ────────────────────────────────────────────────────

    /// Command the drive base to panel coordinates.
    pub fn drive_to(&mut self, x: i64, y: i64) {
        self.drive.set(DriveField::X, x);
        self.drive.set(DriveField::Y, y);
    }

    /// Current base position from the drive motor record.
    pub fn base_position(&mut self) -> (i64, i64) {
        (self.drive.get(DriveField::X), self.drive.get(DriveField::Y))
    }

    /// Command the arm depth stepper.
    pub fn set_depth(&mut self, position: i64) {
        self.depth.set(StepperField::Position, position);
    }

    /// Command the arm height stepper.
    pub fn set_height(&mut self, position: i64) {
        self.height.set(StepperField::Position, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimArm, SimVision};
    use shipbot_store::DeviceRole;
    use shipbot_types::log::MissionLog;

    fn store_in_tempdir() -> (tempfile::TempDir, DeviceStore) {
        let dir = tempfile::tempdir().expect("tmp dir");
        let log = MissionLog::new(dir.path().join("status.log"));
        let store = DeviceStore::new(dir.path().join("devices"), log);
        std::fs::create_dir_all(store.root().join("actuators")).unwrap();
        std::fs::create_dir_all(store.root().join("sensors")).unwrap();
        (dir, store)
    }

    fn sim_system(vision: SimVision) -> (tempfile::TempDir, SystemState) {
        let (dir, store) = store_in_tempdir();
        let config = HardwareConfig::default();
        let system = SystemState::with_collaborators(
            Box::new(vision),
            Box::new(SimArm::new()),
            store,
            &config,
        );
        (dir, system)
    }

    #[test]
    fn capture_raises_flag_when_offset_exceeds_rotator_reach() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 8.0, 1));
        assert!(system.capture_station("cv_av1"));
        assert!(system.needs_base_adjustment());
    }

    #[test]
    fn capture_clears_flag_when_offset_is_within_reach() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 2.0, 1));
        assert!(system.capture_station("cv_av1"));
        assert!(!system.needs_base_adjustment());
    }

    #[test]
    fn no_fresh_capture_means_no_state_change() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 8.0, 0));
        assert!(!system.capture_station("cv_av1"));
        assert!(!system.needs_base_adjustment());
    }

    #[test]
    fn base_adjustment_is_consumed_exactly_once() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 8.0, 1));
        system.capture_station("cv_av1");
        assert!(system.needs_base_adjustment());
        assert_eq!(system.take_base_adjustment(), 0);
        // Second consumption without an intervening capture: flag stays down.
        assert!(!system.needs_base_adjustment());
        assert_eq!(system.take_base_adjustment(), 0);
    }

    #[test]
    fn engagement_correction_uses_the_additive_sign_convention() {
        let (_dir, mut system) = sim_system(SimVision::new(30, 0.0, 0));
        assert!(!system.needs_engagement(30));

        let (_dir2, mut system) = sim_system(SimVision::new(25, 0.0, 0));
        assert!(system.needs_engagement(30));
        assert_eq!(system.engagement_correction(30), 55);
    }

    #[test]
    fn fine_adjustment_is_an_explicit_no_op() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 0.0, 0));
        assert!(!system.needs_fine_adjustment());
        assert_eq!(system.take_fine_adjustment(), 0);
    }

    #[test]
    fn arm_updates_pass_through_to_the_collaborator() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 0.0, 0));
        system.update_arm_position(90, -45);
        assert_eq!(system.arm_position(), (90, -45));
    }

    #[test]
    fn drive_to_persists_through_the_device_model() {
        let (_dir, store) = store_in_tempdir();
        let config = HardwareConfig::default();
        let mut system = SystemState::with_collaborators(
            Box::new(SimVision::new(0, 0.0, 0)),
            Box::new(SimArm::new()),
            store.clone(),
            &config,
        );
        system.drive_to(600, 0);
        let text =
            std::fs::read_to_string(store.record_path("drive_0", DeviceRole::Actuator)).unwrap();
        assert!(text.contains("x 600"));
        assert_eq!(system.base_position(), (600, 0));
    }
}
