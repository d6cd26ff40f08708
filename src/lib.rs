//! HabitLens - On-device behavioral analytics for smartphone usage signals
//!
//! HabitLens transforms per-session app usage logs into daily behavioral
//! feature vectors through a deterministic pipeline: session metrics →
//! derived cognitive signals → daily assembly → temporal windowing. Model
//! outputs flow back in for weekly summarization and gated advice.
//!
//! ## Modules
//!
//! - **Metrics**: Per-day calculators for volume, temporal, interaction,
//!   stability, and cognitive signals
//! - **Assembler**: Daily feature vector assembly with day-over-day threading
//! - **Windowing**: Gap-aware sliding windows and training dataset shapes
//! - **Weekly / Advice**: Week-level summarization and rule-driven advice

pub mod advice;
pub mod assembler;
pub mod error;
pub mod metrics;
pub mod store;
pub mod trainer;
pub mod types;
pub mod weekly;
pub mod windowing;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use assembler::{AssembledDay, DailyFeatureAssembler};
pub use error::AnalyticsError;
pub use types::{
    AppSession, DailyBehaviorFeatures, ModelOutput, StabilityLabel, TrainingDataset, TrendLabel,
    WeeklyBehaviorSummary, FEATURE_DIMENSION,
};
pub use weekly::WeeklyAnalyzer;
pub use windowing::TrainingDatasetAssembler;

// Advice exports
pub use advice::{AdviceEngine, AdviceSession, GeneratedAdvice};

/// HabitLens version embedded in produced payloads
pub const HABITLENS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for provenance fields
pub const PRODUCER_NAME: &str = "habitlens";
