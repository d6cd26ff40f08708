//! Per-day metric calculators
//!
//! Each calculator reduces one day's usage sessions (plus, for stability, the
//! previous day's features) into a typed metrics struct. All calculators are
//! pure and total: empty input, zero totals, and single-element lists are
//! valid inputs with defined outputs.

pub mod cognitive;
pub mod interaction;
pub mod stability;
pub mod temporal;
pub mod volume;

pub use cognitive::{CognitiveSignals, CognitiveSignalsCalculator};
pub use interaction::{InteractionMetrics, InteractionMetricsCalculator};
pub use stability::{StabilityMetrics, StabilityMetricsCalculator};
pub use temporal::{TemporalMetrics, TemporalMetricsCalculator, TimeWindow};
pub use volume::{UsageVolumeCalculator, UsageVolumeMetrics};
