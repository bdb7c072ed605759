pub mod detector;

pub use detector::{ChangeDetector, ErrorDecision, StatusDecision};
