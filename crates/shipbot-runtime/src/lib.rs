//! `shipbot-runtime` – mission construction and execution.
//!
//! - [`config`] – [`MissionConfig`]: paths, hardware ids, and retry budgets.
//! - [`tasks`] – the [`Task`] trait and the six task types.
//! - [`pipeline`] – expands one device into its ordered task sequence.
//! - [`mission`] – [`Mission`]: parse, expand, execute; plus the startup
//!   handshake that waits for the firmware to own every actuator record.

pub mod config;
pub mod mission;
pub mod pipeline;
pub mod tasks;

pub use config::MissionConfig;
pub use mission::{Mission, wait_for_sync};
pub use pipeline::tasks_for_device;
pub use tasks::Task;
