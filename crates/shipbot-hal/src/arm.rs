//! [`Arm`] trait and the record-backed arm-position collaborator.
//!
//! The arm has two joints: a fixed-mount rotation joint and the end-effector
//! rotator. Positions are reported and commanded through a single actuator
//! record with `fixed` and `rotator` fields; reads trust only firmware-owned
//! data, the same as every other actuator.

use std::collections::BTreeMap;

use shipbot_store::DeviceStore;

/// The two-joint arm-position subsystem.
pub trait Arm {
    /// Current `(fixed, rotator)` joint angles in degrees.
    fn position(&mut self) -> (i64, i64);

    /// Command both joints.
    fn set_position(&mut self, fixed: i64, rotator: i64);
}

/// Record-backed arm state.
#[derive(Debug)]
pub struct ArmState {
    id: String,
    store: DeviceStore,
    fixed: i64,
    rotator: i64,
}

impl ArmState {
    pub fn new(id: impl Into<String>, store: DeviceStore) -> Self {
        Self {
            id: id.into(),
            store,
            fixed: 0,
            rotator: 0,
        }
    }

    fn flush(&self) {
        let mut fields = BTreeMap::new();
        fields.insert("fixed".to_string(), self.fixed);
        fields.insert("rotator".to_string(), self.rotator);
        self.store.write_actuator(&self.id, &fields);
    }
}

impl Arm for ArmState {
    fn position(&mut self) -> (i64, i64) {
        if let Some(data) = self.store.actuator_data(&self.id) {
            if let Some(fixed) = data.get("fixed") {
                self.fixed = *fixed;
            }
            if let Some(rotator) = data.get("rotator") {
                self.rotator = *rotator;
            }
        }
        (self.fixed, self.rotator)
    }

    fn set_position(&mut self, fixed: i64, rotator: i64) {
        self.fixed = fixed;
        self.rotator = rotator;
        self.flush();
    }
}
