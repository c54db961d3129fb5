// src/optimizer/mod.rs — Adaptive navigation ordering

pub mod cache;
pub mod engine;
pub mod plan;
pub mod remote;
pub mod types;

pub use cache::PlanCache;
pub use engine::{EngineOptions, OptimizationEngine, OptimizationOutcome, Outcome, RemoteStatus};
pub use remote::{HttpUsageSink, RemoteUsageSink};
pub use types::{AdaptiveSettings, NavItem, OptimizationResult, OptimizedItem, PatternVersion};
