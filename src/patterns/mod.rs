// src/patterns/mod.rs — Usage pattern analysis and drift detection

pub mod analyzer;
pub mod change_detector;

pub use analyzer::{score_map, AnalyzerConfig, NavigationPattern, PatternAnalyzer};
pub use change_detector::{ChangeDetector, DriftConfig, DriftReport};
