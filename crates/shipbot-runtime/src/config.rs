//! [`MissionConfig`] – everything the mission runner needs to know about
//! its environment: where the record tree and status log live, which
//! actuators make up the robot, and the retry budgets for the closed-loop
//! tasks.

use std::path::PathBuf;
use std::time::Duration;

use shipbot_hal::HardwareConfig;

/// Configuration bundle for a mission run.
#[derive(Debug, Clone)]
pub struct MissionConfig {
    /// Root of the shared device-record tree (`sensors/`, `actuators/`).
    pub devices_root: PathBuf,
    /// Path of the append-only mission status log.
    pub status_log: PathBuf,
    /// Onboard hardware ids and thresholds.
    pub hardware: HardwareConfig,
    /// How many capture attempts before a Capture task fails.
    pub capture_attempts: u32,
    /// Delay between capture attempts.
    pub capture_retry: Duration,
    /// Iteration budget for the Engage task's correction loop.
    pub engage_step_budget: u32,
    /// Sleep between startup-handshake polls.
    pub handshake_poll: Duration,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            devices_root: PathBuf::from("devices"),
            status_log: PathBuf::from("logs/status.log"),
            hardware: HardwareConfig::default(),
            capture_attempts: 5,
            capture_retry: Duration::from_millis(200),
            engage_step_budget: 8,
            handshake_poll: Duration::from_millis(250),
        }
    }
}

impl MissionConfig {
    /// Ids of every actuator the startup handshake waits on.
    pub fn actuator_ids(&self) -> Vec<String> {
        vec![
            self.hardware.drive_id.clone(),
            self.hardware.depth_stepper_id.clone(),
            self.hardware.height_stepper_id.clone(),
            self.hardware.arm_id.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_covers_all_four_actuators() {
        let config = MissionConfig::default();
        let ids = config.actuator_ids();
        assert_eq!(ids.len(), 4);
        assert!(ids.contains(&"drive_0".to_string()));
        assert!(ids.contains(&"hebi_arm".to_string()));
    }
}
