//! `shipbot-mission` – the mission grammar.
//!
//! - [`device`] – [`Device`][device::Device]: the mission-level targets
//!   (valves, breaker boxes, breaker switches) with their stations, vision
//!   ids, and goal states.
//! - [`parser`] – tokenizes a mission file into a
//!   [`MissionPlan`][parser::MissionPlan]: an ordered device list and the
//!   mission time budget.

pub mod device;
pub mod parser;

pub use device::{BreakerSide, Device};
pub use parser::{MissionPlan, parse_mission_file, parse_mission_str, verify_mission_path};
