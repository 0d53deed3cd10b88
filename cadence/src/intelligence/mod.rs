pub mod patterns;
pub mod tasks;
pub mod trend;

pub use patterns::PatternAnalyzer;
pub use tasks::extract_completed_tasks;
pub use trend::TrendCalculator;
