//! Core business logic abstractions

pub mod clock;
pub mod config;
pub mod log;
pub mod rate;
pub mod source;

// Re-export main types for cleaner imports
pub use clock::{Clock, ManualClock, SystemClock};
pub use rate::{PurityTier, RateSnapshot, TierRates};
pub use source::{PropagationResult, RateSource, RefreshOutcome};
