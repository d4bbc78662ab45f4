//! `shipbot-store` – the ownership-tagged hardware record store.
//!
//! The mission controller and the motor/sensor firmware share no memory and
//! no network link; they exchange state exclusively through small text files
//! under a common root. Each file carries an owner tag naming the process
//! that wrote it last, and that tag is the only synchronization primitive in
//! the whole system.
//!
//! - [`record`] – the text format: lenient tokenizer and renderer.
//! - [`store`] – [`DeviceStore`][store::DeviceStore]: role-based paths,
//!   ownership-validated reads, truncate-then-write updates, the startup
//!   handshake check, and bootstrap of fresh record files.

pub mod record;
pub mod store;

pub use record::RawRecord;
pub use store::{DeviceRole, DeviceStore};
