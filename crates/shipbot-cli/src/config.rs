//! Operator configuration – reads `~/.shipbot/config.toml`.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shipbot_runtime::MissionConfig;

/// Persisted operator configuration stored in `~/.shipbot/config.toml`.
///
/// Every field has a default so a partial file (or no file at all) still
/// yields a runnable setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the shared device-record tree.
    #[serde(default = "default_devices_root")]
    pub devices_root: PathBuf,

    /// Path of the mission status log.
    #[serde(default = "default_status_log")]
    pub status_log: PathBuf,

    /// Capture attempts before a Capture task fails.
    #[serde(default = "default_capture_attempts")]
    pub capture_attempts: u32,

    /// Milliseconds between capture attempts.
    #[serde(default = "default_capture_retry_ms")]
    pub capture_retry_ms: u64,

    /// Iteration budget for the Engage correction loop.
    #[serde(default = "default_engage_step_budget")]
    pub engage_step_budget: u32,

    /// Milliseconds between startup-handshake polls.
    #[serde(default = "default_handshake_poll_ms")]
    pub handshake_poll_ms: u64,

    /// Effector rotator reach in millimetres; vision offsets at or beyond
    /// this raise the base-adjustment flag.
    #[serde(default = "default_rotator_length")]
    pub rotator_length: f64,
}

fn default_devices_root() -> PathBuf {
    PathBuf::from("devices")
}
fn default_status_log() -> PathBuf {
    PathBuf::from("logs/status.log")
}
fn default_capture_attempts() -> u32 {
    5
}
fn default_capture_retry_ms() -> u64 {
    200
}
fn default_engage_step_budget() -> u32 {
    8
}
fn default_handshake_poll_ms() -> u64 {
    250
}
fn default_rotator_length() -> f64 {
    6.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            devices_root: default_devices_root(),
            status_log: default_status_log(),
            capture_attempts: default_capture_attempts(),
            capture_retry_ms: default_capture_retry_ms(),
            engage_step_budget: default_engage_step_budget(),
            handshake_poll_ms: default_handshake_poll_ms(),
            rotator_length: default_rotator_length(),
        }
    }
}

impl Config {
    /// Convert into the mission runner's configuration bundle.
    pub fn into_mission_config(self) -> MissionConfig {
        let mut config = MissionConfig {
            devices_root: self.devices_root,
            status_log: self.status_log,
            capture_attempts: self.capture_attempts,
            capture_retry: Duration::from_millis(self.capture_retry_ms),
            engage_step_budget: self.engage_step_budget,
            handshake_poll: Duration::from_millis(self.handshake_poll_ms),
            ..MissionConfig::default()
        };
        config.hardware.rotator_length = self.rotator_length;
        config
    }
}

/// Return the path to `~/.shipbot/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".shipbot").join("config.toml")
}

/// Load the config from disk. Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `SHIPBOT_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `SHIPBOT_DEVICES_ROOT` | `devices_root` |
/// | `SHIPBOT_STATUS_LOG` | `status_log` |
/// | `SHIPBOT_CAPTURE_ATTEMPTS` | `capture_attempts` |
/// | `SHIPBOT_HANDSHAKE_POLL_MS` | `handshake_poll_ms` |
/// | `SHIPBOT_ROTATOR_LENGTH` | `rotator_length` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("SHIPBOT_DEVICES_ROOT") {
        cfg.devices_root = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("SHIPBOT_STATUS_LOG") {
        cfg.status_log = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("SHIPBOT_CAPTURE_ATTEMPTS")
        && let Ok(n) = v.parse::<u32>()
    {
        cfg.capture_attempts = n;
    }
    if let Ok(v) = std::env::var("SHIPBOT_HANDSHAKE_POLL_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.handshake_poll_ms = ms;
    }
    if let Ok(v) = std::env::var("SHIPBOT_ROTATOR_LENGTH")
        && let Ok(len) = v.parse::<f64>()
    {
        cfg.rotator_length = len;
    }
}

/// Save the config to disk, creating `~/.shipbot/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.capture_attempts, 5);
        assert_eq!(loaded.engage_step_budget, 8);
        assert_eq!(loaded.devices_root, PathBuf::from("devices"));
    }

    #[test]
    fn config_path_points_to_shipbot_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".shipbot"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "capture_attempts = 9\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.capture_attempts, 9);
        assert_eq!(loaded.handshake_poll_ms, 250);
    }

    #[test]
    fn apply_env_overrides_changes_devices_root() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("SHIPBOT_DEVICES_ROOT", "/mnt/shared/devices") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.devices_root, PathBuf::from("/mnt/shared/devices"));
        unsafe { std::env::remove_var("SHIPBOT_DEVICES_ROOT") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_attempt_count() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("SHIPBOT_CAPTURE_ATTEMPTS", "lots") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.capture_attempts, 5);
        unsafe { std::env::remove_var("SHIPBOT_CAPTURE_ATTEMPTS") };
    }

    #[test]
    fn into_mission_config_converts_durations() {
        let cfg = Config {
            capture_retry_ms: 50,
            handshake_poll_ms: 10,
            rotator_length: 9.5,
            ..Config::default()
        };
        let mission = cfg.into_mission_config();
        assert_eq!(mission.capture_retry, Duration::from_millis(50));
        assert_eq!(mission.handshake_poll, Duration::from_millis(10));
        assert!((mission.hardware.rotator_length - 9.5).abs() < f64::EPSILON);
    }
}
