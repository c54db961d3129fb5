// src/usage/mod.rs — Navigation usage journal

pub mod event;
pub mod log_store;

pub use event::UsageEvent;
pub use log_store::{LogLimits, UsageLogStore};
