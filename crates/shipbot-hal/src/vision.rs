//! [`Vision`] trait and the record-backed production implementation.
//!
//! The vision subsystem is an external collaborator: it measures a station's
//! angular position and horizontal offset and publishes them through a
//! sensor record. The controller only ever talks to the trait, so tests run
//! against [`SimVision`][crate::sim::SimVision] without any camera attached.

use shipbot_store::DeviceStore;

/// Live vision feedback for the station currently in front of the robot.
pub trait Vision {
    /// Ask for a fresh reading keyed by the device's vision id. Returns
    /// `true` only when a new capture was available since the last call.
    fn capture(&mut self, cv_id: &str) -> bool;

    /// Most recent angular position of the target, in degrees.
    fn angular_position(&mut self) -> i64;

    /// Most recent horizontal offset of the target from the arm axis, in
    /// millimetres. Signed.
    fn horizontal_offset(&mut self) -> f64;
}

/// Record-backed vision feed.
///
/// The CV process publishes `frame`, `angle`, and `offset` fields into the
/// station's sensor record; a capture is fresh when `frame` has advanced
/// past the last value seen for that id.
#[derive(Debug)]
pub struct CvSensing {
    store: DeviceStore,
    /// Vision id and frame counter of the most recent fresh capture.
    current: Option<(String, f64)>,
    angle: i64,
    offset: f64,
}

impl CvSensing {
    pub fn new(store: DeviceStore) -> Self {
        Self {
            store,
            current: None,
            angle: 0,
            offset: 0.0,
        }
    }
}

impl Vision for CvSensing {
    fn capture(&mut self, cv_id: &str) -> bool {
        let data = self.store.sensor_data(cv_id);
        let Some(frame) = data.get("frame").copied() else {
            return false;
        };
        let last_seen = match &self.current {
            Some((id, frame)) if id == cv_id => *frame,
            _ => f64::NEG_INFINITY,
        };
        if frame <= last_seen {
            return false;
        }
        self.current = Some((cv_id.to_string(), frame));
        self.angle = data.get("angle").copied().unwrap_or(0.0) as i64;
        self.offset = data.get("offset").copied().unwrap_or(0.0);
        true
    }

    fn angular_position(&mut self) -> i64 {
        // Pass-through read: re-check the live record for the current
        // station rather than serving a value cached at capture time.
        if let Some(id) = self.current.as_ref().map(|(id, _)| id.clone()) {
            let data = self.store.sensor_data(&id);
            if let Some(angle) = data.get("angle") {
                self.angle = *angle as i64;
            }
        }
        self.angle
    }

    fn horizontal_offset(&mut self) -> f64 {
        self.offset
    }
}
