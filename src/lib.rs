// src/lib.rs — Library root for wayrank

pub mod api;
pub mod cli;
pub mod clock;
pub mod infra;
pub mod optimizer;
pub mod patterns;
pub mod storage;
pub mod usage;

pub use optimizer::{AdaptiveSettings, NavItem, OptimizationEngine};
pub use usage::UsageEvent;
