//! Generic [`Motor`] trait plus the two concrete motor kinds.
//!
//! Each motor variant has a closed field enumeration fixed at construction:
//! the drive base exposes a planar `x`/`y` position, a stepper exposes a
//! single `position` axis. Asking for a field the variant does not have is a
//! compile error, not a runtime one.
//!
//! Every `get` refreshes the in-memory cache from the motor's record file
//! first; every `set` flushes the full record back, stamping this process as
//! owner. There is no buffering beyond the single cached record.

use std::collections::BTreeMap;

use shipbot_store::DeviceStore;
use tracing::warn;

/// A closed set of field names belonging to one motor variant.
pub trait MotorField: Copy + std::fmt::Debug + 'static {
    /// The field name as it appears in the record file.
    fn name(&self) -> &'static str;

    /// Resolve a record-file field name, `None` for names outside the set.
    fn from_name(name: &str) -> Option<Self>;

    /// Every field of the variant, in serialization order.
    fn all() -> &'static [Self];
}

/// A position-controlled motor persisted through the record store.
pub trait Motor {
    type Field: MotorField;

    /// Stable device id; keys the record file under `actuators/`.
    fn id(&self) -> &str;

    /// Refresh from the record store, then return the cached value.
    /// Stale or unreadable records leave the cache untouched.
    fn get(&mut self, field: Self::Field) -> i64;

    /// Update the cache and flush the full record back to the store.
    fn set(&mut self, field: Self::Field, value: i64);

    /// The fixed field set for this variant.
    fn fields(&self) -> &'static [Self::Field] {
        Self::Field::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drive motor (planar base)
// ─────────────────────────────────────────────────────────────────────────────

/// Fields of the drive base: planar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveField {
    X,
    Y,
}

impl MotorField for DriveField {
    fn name(&self) -> &'static str {
        match self {
            DriveField::X => "x",
            DriveField::Y => "y",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(DriveField::X),
            "y" => Some(DriveField::Y),
            _ => None,
        }
    }

    fn all() -> &'static [Self] {
        &[DriveField::X, DriveField::Y]
    }
}

/// The mobile base. Two integer position fields.
#[derive(Debug)]
pub struct DriveMotor {
    id: String,
    store: DeviceStore,
    x: i64,
    y: i64,
}

impl DriveMotor {
    pub fn new(id: impl Into<String>, store: DeviceStore) -> Self {
        Self {
            id: id.into(),
            store,
            x: 0,
            y: 0,
        }
    }

    fn refresh(&mut self) {
        let Some(data) = self.store.actuator_data(&self.id) else {
            return;
        };
        for (name, value) in data {
            match DriveField::from_name(&name) {
                Some(DriveField::X) => self.x = value,
                Some(DriveField::Y) => self.y = value,
                None => warn!(device = %self.id, field = %name, "record names unknown field"),
            }
        }
    }

    fn flush(&self) {
        let mut fields = BTreeMap::new();
        fields.insert(DriveField::X.name().to_string(), self.x);
        fields.insert(DriveField::Y.name().to_string(), self.y);
        self.store.write_actuator(&self.id, &fields);
    }
}

impl Motor for DriveMotor {
    type Field = DriveField;

    fn id(&self) -> &str {
        &self.id
    }

    fn get(&mut self, field: DriveField) -> i64 {
        self.refresh();
        match field {
            DriveField::X => self.x,
            DriveField::Y => self.y,
        }
    }

    fn set(&mut self, field: DriveField, value: i64) {
        match field {
            DriveField::X => self.x = value,
            DriveField::Y => self.y = value,
        }
        self.flush();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stepper motor (single axis)
// ─────────────────────────────────────────────────────────────────────────────

/// Fields of a stepper: one linear/angular axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperField {
    Position,
}

impl MotorField for StepperField {
    fn name(&self) -> &'static str {
        "position"
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "position" => Some(StepperField::Position),
            _ => None,
        }
    }

    fn all() -> &'static [Self] {
        &[StepperField::Position]
    }
}

/// A single-axis stepper (arm depth, arm height).
#[derive(Debug)]
pub struct StepperMotor {
    id: String,
    store: DeviceStore,
    position: i64,
}

impl StepperMotor {
    pub fn new(id: impl Into<String>, store: DeviceStore) -> Self {
        Self {
            id: id.into(),
            store,
            position: 0,
        }
    }

    fn refresh(&mut self) {
        let Some(data) = self.store.actuator_data(&self.id) else {
            return;
        };
        for (name, value) in data {
            match StepperField::from_name(&name) {
                Some(StepperField::Position) => self.position = value,
                None => warn!(device = %self.id, field = %name, "record names unknown field"),
            }
        }
    }

    fn flush(&self) {
        let mut fields = BTreeMap::new();
        fields.insert(StepperField::Position.name().to_string(), self.position);
        self.store.write_actuator(&self.id, &fields);
    }
}

impl Motor for StepperMotor {
    type Field = StepperField;

    fn id(&self) -> &str {
        &self.id
    }

    fn get(&mut self, field: StepperField) -> i64 {
        self.refresh();
        match field {
            StepperField::Position => self.position,
        }
    }

    fn set(&mut self, field: StepperField, value: i64) {
        match field {
            StepperField::Position => self.position = value,
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipbot_store::DeviceRole;
    use shipbot_types::log::MissionLog;

    fn store_in_tempdir() -> (tempfile::TempDir, DeviceStore) {
        let dir = tempfile::tempdir().expect("tmp dir");
        let log = MissionLog::new(dir.path().join("status.log"));
        let store = DeviceStore::new(dir.path().join("devices"), log);
        std::fs::create_dir_all(store.root().join("actuators")).unwrap();
        (dir, store)
    }

    #[test]
    fn stepper_reads_firmware_owned_position() {
        let (_dir, store) = store_in_tempdir();
        std::fs::write(
            store.record_path("stepper_y", DeviceRole::Actuator),
            "@ 2\nposition 5\n",
        )
        .unwrap();
        let mut stepper = StepperMotor::new("stepper_y", store);
        assert_eq!(stepper.get(StepperField::Position), 5);
    }

    #[test]
    fn stepper_keeps_cache_when_record_is_stale() {
        let (_dir, store) = store_in_tempdir();
        std::fs::write(
            store.record_path("stepper_y", DeviceRole::Actuator),
            "@ 1\nposition 5\n",
        )
        .unwrap();
        let mut stepper = StepperMotor::new("stepper_y", store);
        // Wrong owner: the parsed value must never reach the cache.
        assert_eq!(stepper.get(StepperField::Position), 0);
    }

    #[test]
    fn set_writes_the_full_record_stamped_as_controller() {
        let (_dir, store) = store_in_tempdir();
        let mut drive = DriveMotor::new("drive_0", store.clone());
        drive.set(DriveField::X, 300);

        let text =
            std::fs::read_to_string(store.record_path("drive_0", DeviceRole::Actuator)).unwrap();
        assert!(text.starts_with("@ 1\n"));
        // The untouched field is flushed too, not just the changed one.
        assert!(text.contains("x 300"));
        assert!(text.contains("y 0"));
    }

    #[test]
    fn get_after_own_set_returns_cached_value() {
        let (_dir, store) = store_in_tempdir();
        let mut drive = DriveMotor::new("drive_0", store);
        drive.set(DriveField::Y, 42);
        // The file now carries our own owner tag, so the refresh rejects it
        // and the cached value stands.
        assert_eq!(drive.get(DriveField::Y), 42);
    }

    #[test]
    fn field_sets_are_fixed_per_variant() {
        let (_dir, store) = store_in_tempdir();
        let drive = DriveMotor::new("drive_0", store.clone());
        let stepper = StepperMotor::new("stepper_y", store);
        assert_eq!(drive.fields(), &[DriveField::X, DriveField::Y]);
        assert_eq!(stepper.fields(), &[StepperField::Position]);
    }

    #[test]
    fn unknown_field_names_in_records_are_ignored() {
        let (_dir, store) = store_in_tempdir();
        std::fs::write(
            store.record_path("stepper_z", DeviceRole::Actuator),
            "@ 2\nposition 9\nvoltage 12\n",
        )
        .unwrap();
        let mut stepper = StepperMotor::new("stepper_z", store);
        assert_eq!(stepper.get(StepperField::Position), 9);
    }
}
