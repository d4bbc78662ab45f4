//! [`DeviceStore`] – per-device record files under a shared root.
//!
//! Sensor records live at `<root>/sensors/<id>.txt` and actuator records at
//! `<root>/actuators/<id>.txt`. The store owns no locks and performs no
//! atomic renames: the owner tag in each file is the entire concurrency
//! contract with the firmware process. Readers must tolerate a file being
//! rewritten mid-read and must re-validate ownership after parsing.
//!
//! I/O failures are logged and surfaced as an empty or absent record; they
//! never abort the mission.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use shipbot_types::log::MissionLog;
use shipbot_types::{ShipbotError, owner};
use tracing::debug;

use crate::record::{self, RawRecord};

/// Whether a record belongs to a sensor or an actuator. Decides the
/// directory the record file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    Sensor,
    Actuator,
}

impl DeviceRole {
    fn dir(&self) -> &'static str {
        match self {
            DeviceRole::Sensor => "sensors",
            DeviceRole::Actuator => "actuators",
        }
    }
}

/// Handle to the shared device-record tree. Cheap to clone; every motor and
/// collaborator holds its own copy.
#[derive(Debug, Clone)]
pub struct DeviceStore {
    root: PathBuf,
    log: MissionLog,
}

impl DeviceStore {
    pub fn new(root: impl Into<PathBuf>, log: MissionLog) -> Self {
        Self {
            root: root.into(),
            log,
        }
    }

    /// Path of the record file for `id` in the given role.
    pub fn record_path(&self, id: &str, role: DeviceRole) -> PathBuf {
        self.root.join(role.dir()).join(format!("{id}.txt"))
    }

    /// Read and tokenize a record file. Low-level: ownership is NOT checked
    /// here — callers validate the owner tag after parsing.
    pub fn read(&self, id: &str, role: DeviceRole) -> Result<RawRecord, ShipbotError> {
        let path = self.record_path(id, role);
        let text = std::fs::read_to_string(&path).map_err(|source| ShipbotError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(record::parse(&text))
    }

    /// Write an actuator record, stamping this process as owner. Truncates
    /// the previous contents.
    pub fn write(&self, id: &str, fields: &BTreeMap<String, i64>) -> Result<(), ShipbotError> {
        let path = self.record_path(id, DeviceRole::Actuator);
        let text = record::render_actuator(owner::CONTROLLER, fields);
        std::fs::write(&path, text).map_err(|source| ShipbotError::Io { path, source })
    }

    /// Fetch sensor data as a field map. Lenient: an unreadable file is
    /// logged and reported as an empty map.
    pub fn sensor_data(&self, id: &str) -> BTreeMap<String, f64> {
        match self.read(id, DeviceRole::Sensor) {
            Ok(record) => record.fields,
            Err(e) => {
                self.log
                    .error("SENSOR_UPDATE", &format!("failed to read sensor '{id}': {e}"));
                BTreeMap::new()
            }
        }
    }

    /// Fetch actuator data, trusting it only if the firmware wrote it last.
    ///
    /// Returns `None` when the file is unreadable or when the owner tag is
    /// anything other than [`owner::FIRMWARE`] — including data this process
    /// wrote itself, which must never be mistaken for live hardware state.
    pub fn actuator_data(&self, id: &str) -> Option<BTreeMap<String, i64>> {
        let record = match self.read(id, DeviceRole::Actuator) {
            Ok(record) => record,
            Err(e) => {
                self.log
                    .error("MOTOR_UPDATE", &format!("failed to read actuator '{id}': {e}"));
                return None;
            }
        };
        // Ownership is checked after parsing, not before: the firmware may
        // have rewritten the file while we were reading it.
        if record.owner != owner::FIRMWARE {
            let stale = ShipbotError::Stale {
                device: id.to_string(),
                owner: record.owner,
                expected: owner::FIRMWARE,
            };
            self.log
                .error("MOTOR_UPDATE", &format!("Read stale data, dumping. ({stale})"));
            return None;
        }
        Some(record.integer_fields())
    }

    /// Write actuator data, logging failure instead of propagating it.
    pub fn write_actuator(&self, id: &str, fields: &BTreeMap<String, i64>) {
        if let Err(e) = self.write(id, fields) {
            self.log
                .error("MOTOR_UPDATE", &format!("failed to write actuator '{id}': {e}"));
        }
    }

    /// Startup-handshake check: `true` while the actuator record still
    /// carries its bootstrap owner (or cannot be read at all), meaning the
    /// firmware has not yet produced real data for this device.
    pub fn is_waiting(&self, id: &str) -> bool {
        match self.read(id, DeviceRole::Actuator) {
            Ok(record) => record.owner == owner::BOOTSTRAP,
            Err(e) => {
                debug!(device = id, error = %e, "actuator record not readable yet");
                true
            }
        }
    }

    /// Create an actuator record with the bootstrap owner and zeroed fields
    /// if no file exists yet. Existing files are left untouched.
    pub fn bootstrap_actuator(&self, id: &str, fields: &[&str]) -> Result<(), ShipbotError> {
        let path = self.record_path(id, DeviceRole::Actuator);
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ShipbotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let zeroed: BTreeMap<String, i64> =
            fields.iter().map(|name| (name.to_string(), 0i64)).collect();
        let text = record::render_actuator(owner::BOOTSTRAP, &zeroed);
        std::fs::write(&path, text).map_err(|source| ShipbotError::Io { path, source })
    }

    /// Root of the device-record tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The mission log this store reports errors to.
    pub fn log(&self) -> &MissionLog {
        &self.log
    }
}
