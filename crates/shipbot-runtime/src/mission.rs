//! [`Mission`] – the sequential executor.
//!
//! A mission is built once from a mission file, expanding every recognized
//! device into its task sequence, then executed front to back. There is no
//! scheduler and no concurrency: tasks run in file order against the live
//! [`SystemState`], and a failed task is logged and does not stop the ones
//! after it.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use shipbot_hal::SystemState;
use shipbot_mission::{Device, parse_mission_file};
use shipbot_store::DeviceStore;
use shipbot_types::TaskStatus;
use shipbot_types::log::MissionLog;
use tracing::{info, warn};

use crate::config::MissionConfig;
use crate::pipeline::tasks_for_device;
use crate::tasks::Task;

/// One mission run: the parsed devices, their expanded task list, and the
/// system state they execute against.
pub struct Mission {
    system: SystemState,
    tasks: Vec<Box<dyn Task>>,
    devices: Vec<Device>,
    time_limit: u64,
    log: MissionLog,
}

impl Mission {
    /// Build a mission from the file at `path`.
    ///
    /// Clears the status log, parses the mission file, logs each recognized
    /// device, and expands the task pipeline. An empty or unparseable file
    /// produces a mission with zero tasks; callers that want absence of the
    /// file to be fatal check the path before calling this.
    pub fn new(path: &Path, config: &MissionConfig) -> Self {
        let log = MissionLog::new(config.status_log.clone());
        log.clear();
        log.mission_status("New mission initialized.");

        let plan = parse_mission_file(path, &log);
        log.mission_status("Loaded goals from mission file.");
        log.mission_status(&format!("Mission time limit is {} sec.", plan.time_limit));

        let mut tasks: Vec<Box<dyn Task>> = Vec::new();
        for device in &plan.devices {
            log.mission_status(&device.description());
            tasks.extend(tasks_for_device(device, config));
        }

        let store = DeviceStore::new(config.devices_root.clone(), log.clone());
        let system = SystemState::new(store, &config.hardware);

        Self {
            system,
            tasks,
            devices: plan.devices,
            time_limit: plan.time_limit,
            log,
        }
    }

    /// Run every task in order, logging each outcome.
    pub fn execute(&mut self) {
        self.log.mission_status("Starting task execution.");
        for task in &mut self.tasks {
            info!(task = %task, "executing task");
            task.execute(&mut self.system);
            let status = task.status();
            if status == TaskStatus::Failed {
                warn!(task = %task, "task failed");
            }
            self.log
                .task_status(&format!("{} [{}]", task, status));
        }
        self.log.mission_status("Task execution complete.");
    }

    /// Mission time budget in seconds, as stated by the mission file.
    pub fn time_limit(&self) -> u64 {
        self.time_limit
    }

    /// Number of devices the mission file named.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Lifecycle states of every task, in execution order.
    pub fn task_statuses(&self) -> Vec<TaskStatus> {
        self.tasks.iter().map(|t| t.status()).collect()
    }

    /// The status log this mission reports to.
    pub fn log(&self) -> &MissionLog {
        &self.log
    }
}

/// Block until the firmware has taken ownership of every listed actuator
/// record, polling at the given interval.
///
/// Returns `false` if `cancel` is raised before all devices sync. Each
/// device is announced once when it first comes up.
pub fn wait_for_sync(
    store: &DeviceStore,
    actuator_ids: &[String],
    poll: Duration,
    cancel: &AtomicBool,
) -> bool {
    let mut pending: Vec<&String> = actuator_ids.iter().collect();
    while !pending.is_empty() {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        pending.retain(|id| {
            if store.is_waiting(id) {
                true
            } else {
                info!(device = %id, "actuator synced");
                false
            }
        });
        if !pending.is_empty() && !poll.is_zero() {
            std::thread::sleep(poll);
        }
    }
    true
}
