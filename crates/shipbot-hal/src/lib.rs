//! `shipbot-hal` – the device model and live system state.
//!
//! Everything the mission layer knows about hardware goes through this
//! crate:
//!
//! - [`motor`] – the [`Motor`][motor::Motor] trait and the two concrete
//!   variants ([`DriveMotor`][motor::DriveMotor],
//!   [`StepperMotor`][motor::StepperMotor]), each with a closed field
//!   enumeration and read-through/write-through persistence via the record
//!   store.
//! - [`vision`] / [`arm`] – collaborator traits for the external CV and
//!   arm-position subsystems, with record-backed production impls.
//! - [`sim`] – scriptable stand-ins for vision and arm, used by tests.
//! - [`system_state`] – [`SystemState`][system_state::SystemState], the
//!   per-mission aggregate the task executor runs against.

pub mod arm;
pub mod motor;
pub mod sim;
pub mod system_state;
pub mod vision;

pub use arm::{Arm, ArmState};
pub use motor::{DriveField, DriveMotor, Motor, MotorField, StepperField, StepperMotor};
pub use sim::{SimArm, SimVision};
pub use system_state::{HardwareConfig, SystemState};
pub use vision::{CvSensing, Vision};
