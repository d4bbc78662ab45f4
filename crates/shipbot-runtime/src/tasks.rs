//! The six task types and the [`Task`] trait.
//!
//! A task is an atomic unit of robot action. Every task starts `Pending`,
//! moves to `Running` when executed, and must leave itself in a terminal
//! state (`Succeeded` or `Failed`) before `execute` returns — the executor
//! never inspects partial progress, only the final status.
//!
//! Where closed-loop correction exists (Capture's retry loop, Engage's
//! vision re-check loop) it lives inside the task with a bounded budget;
//! the pipeline itself never retries.

use std::fmt;
use std::time::Duration;

use shipbot_hal::SystemState;
use shipbot_types::{Station, TaskStatus};
use tracing::debug;

/// An atomic unit of robot action, executed exactly once.
pub trait Task: fmt::Display {
    /// Perform the action against live system state. Must leave the task in
    /// a terminal status.
    fn execute(&mut self, system: &mut SystemState);

    /// The task's lifecycle state.
    fn status(&self) -> TaskStatus;
}

// ─────────────────────────────────────────────────────────────────────────────
// Move
// ─────────────────────────────────────────────────────────────────────────────

/// Drive the base to a station's panel coordinates.
pub struct MoveTask {
    station: Station,
    target: (i64, i64),
    status: TaskStatus,
}

impl MoveTask {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            target: station.coordinates(),
            status: TaskStatus::Pending,
        }
    }
}

impl Task for MoveTask {
    fn execute(&mut self, system: &mut SystemState) {
        self.status = TaskStatus::Running;
        let (x, y) = self.target;
        system.drive_to(x, y);
        self.status = TaskStatus::Succeeded;
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for MoveTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move to station {} ({}, {})",
            self.station, self.target.0, self.target.1
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Approach
// ─────────────────────────────────────────────────────────────────────────────

/// Coarse station arrival: one capture, then consume any pending base
/// adjustment and re-command the base with it.
pub struct ApproachTask {
    station: Station,
    cv_id: String,
    status: TaskStatus,
}

impl ApproachTask {
    pub fn new(station: Station, cv_id: impl Into<String>) -> Self {
        Self {
            station,
            cv_id: cv_id.into(),
            status: TaskStatus::Pending,
        }
    }
}

impl Task for ApproachTask {
    fn execute(&mut self, system: &mut SystemState) {
        self.status = TaskStatus::Running;
        if system.capture_station(&self.cv_id) && system.needs_base_adjustment() {
            let correction = system.take_base_adjustment();
            let (x, y) = system.base_position();
            system.drive_to(x + correction, y);
        }
        self.status = TaskStatus::Succeeded;
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for ApproachTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Approach station {}", self.station)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capture
// ─────────────────────────────────────────────────────────────────────────────

/// Obtain a fresh vision capture of the device, within a bounded number of
/// attempts.
pub struct CaptureTask {
    cv_id: String,
    attempts: u32,
    retry: Duration,
    status: TaskStatus,
}

impl CaptureTask {
    pub fn new(cv_id: impl Into<String>, attempts: u32, retry: Duration) -> Self {
        Self {
            cv_id: cv_id.into(),
            attempts,
            retry,
            status: TaskStatus::Pending,
        }
    }
}

impl Task for CaptureTask {
    fn execute(&mut self, system: &mut SystemState) {
        self.status = TaskStatus::Running;
        for attempt in 0..self.attempts {
            if system.capture_station(&self.cv_id) {
                self.status = TaskStatus::Succeeded;
                return;
            }
            debug!(cv_id = %self.cv_id, attempt, "no fresh capture yet");
            if !self.retry.is_zero() {
                std::thread::sleep(self.retry);
            }
        }
        self.status = TaskStatus::Failed;
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for CaptureTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capture device image ({})", self.cv_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Position
// ─────────────────────────────────────────────────────────────────────────────

/// Preset the two arm joints for the device being manipulated.
pub struct PositionTask {
    fixed: i64,
    rotator: i64,
    status: TaskStatus,
}

impl PositionTask {
    pub fn new(fixed: i64, rotator: i64) -> Self {
        Self {
            fixed,
            rotator,
            status: TaskStatus::Pending,
        }
    }
}

impl Task for PositionTask {
    fn execute(&mut self, system: &mut SystemState) {
        self.status = TaskStatus::Running;
        system.update_arm_position(self.fixed, self.rotator);
        self.status = TaskStatus::Succeeded;
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for PositionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position arm at ({}, {})", self.fixed, self.rotator)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Align
// ─────────────────────────────────────────────────────────────────────────────

/// Bring the depth and height steppers to the device's working position,
/// after consulting the (currently no-op) fine-adjustment decision point.
pub struct AlignTask {
    depth: i64,
    height: i64,
    status: TaskStatus,
}

impl AlignTask {
    pub fn new(depth: i64, height: i64) -> Self {
        Self {
            depth,
            height,
            status: TaskStatus::Pending,
        }
    }
}

impl Task for AlignTask {
    fn execute(&mut self, system: &mut SystemState) {
        self.status = TaskStatus::Running;
        if system.needs_fine_adjustment() {
            let _ = system.take_fine_adjustment();
        }
        system.set_depth(self.depth);
        system.set_height(self.height);
        self.status = TaskStatus::Succeeded;
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for AlignTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Align steppers to ({}, {})", self.depth, self.height)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engage
// ─────────────────────────────────────────────────────────────────────────────

/// Rotate the effector until vision confirms the goal angle, within a
/// bounded step budget.
pub struct EngageTask {
    goal: Option<i64>,
    step_budget: u32,
    status: TaskStatus,
}

impl EngageTask {
    pub fn new(goal: Option<i64>, step_budget: u32) -> Self {
        Self {
            goal,
            step_budget,
            status: TaskStatus::Pending,
        }
    }
}

impl Task for EngageTask {
    fn execute(&mut self, system: &mut SystemState) {
        self.status = TaskStatus::Running;
        let Some(goal) = self.goal else {
            debug!("no goal state set; nothing to engage");
            self.status = TaskStatus::Succeeded;
            return;
        };
        for _ in 0..self.step_budget {
            if !system.needs_engagement(goal) {
                break;
            }
            let correction = system.engagement_correction(goal);
            let (fixed, _) = system.arm_position();
            system.update_arm_position(fixed, correction);
        }
        self.status = if system.needs_engagement(goal) {
            TaskStatus::Failed
        } else {
            TaskStatus::Succeeded
        };
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

impl fmt::Display for EngageTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.goal {
            Some(goal) => write!(f, "Engage effector to [{goal}] degrees"),
            None => write!(f, "Engage effector (no goal)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipbot_hal::{HardwareConfig, SimArm, SimVision};
    use shipbot_store::DeviceStore;
    use shipbot_types::log::MissionLog;

    fn sim_system(vision: SimVision) -> (tempfile::TempDir, SystemState) {
        let dir = tempfile::tempdir().expect("tmp dir");
        let log = MissionLog::new(dir.path().join("status.log"));
        let store = DeviceStore::new(dir.path().join("devices"), log);
        std::fs::create_dir_all(store.root().join("actuators")).unwrap();
        let system = SystemState::with_collaborators(
            Box::new(vision),
            Box::new(SimArm::new()),
            store,
            &HardwareConfig::default(),
        );
        (dir, system)
    }

    #[test]
    fn move_task_succeeds_and_drives_the_base() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 0.0, 0));
        let mut task = MoveTask::new(Station::C);
        assert_eq!(task.status(), TaskStatus::Pending);
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Succeeded);
        assert_eq!(system.base_position(), Station::C.coordinates());
    }

    #[test]
    fn capture_task_succeeds_on_a_fresh_frame() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 0.0, 1));
        let mut task = CaptureTask::new("cv_av1", 3, Duration::ZERO);
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Succeeded);
    }

    #[test]
    fn capture_task_fails_after_its_attempt_budget() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 0.0, 0));
        let mut task = CaptureTask::new("cv_av1", 3, Duration::ZERO);
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[test]
    fn engage_task_succeeds_when_already_at_goal() {
        let (_dir, mut system) = sim_system(SimVision::new(30, 0.0, 0));
        let mut task = EngageTask::new(Some(30), 8);
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Succeeded);
    }

    #[test]
    fn engage_task_fails_when_vision_never_confirms() {
        let (_dir, mut system) = sim_system(SimVision::new(25, 0.0, 0));
        let mut task = EngageTask::new(Some(30), 4);
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[test]
    fn engage_task_without_a_goal_is_trivially_done() {
        let (_dir, mut system) = sim_system(SimVision::new(25, 0.0, 0));
        let mut task = EngageTask::new(None, 4);
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Succeeded);
    }

    #[test]
    fn approach_task_consumes_the_base_adjustment_flag() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 9.0, 1));
        let mut task = ApproachTask::new(Station::A, "cv_aa");
        task.execute(&mut system);
        assert_eq!(task.status(), TaskStatus::Succeeded);
        assert!(!system.needs_base_adjustment());
    }

    #[test]
    fn position_and_align_tasks_reach_terminal_states() {
        let (_dir, mut system) = sim_system(SimVision::new(0, 0.0, 0));
        let mut position = PositionTask::new(90, 0);
        let mut align = AlignTask::new(40, 120);
        position.execute(&mut system);
        align.execute(&mut system);
        assert_eq!(position.status(), TaskStatus::Succeeded);
        assert_eq!(align.status(), TaskStatus::Succeeded);
        assert_eq!(system.arm_position(), (90, 0));
    }

    #[test]
    fn task_display_forms_name_the_action() {
        assert_eq!(
            MoveTask::new(Station::A).to_string(),
            "Move to station A (0, 0)"
        );
        assert_eq!(
            EngageTask::new(Some(90), 8).to_string(),
            "Engage effector to [90] degrees"
        );
    }
}
