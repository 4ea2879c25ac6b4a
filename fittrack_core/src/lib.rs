#![forbid(unsafe_code)]

//! Core domain model and business logic for FitTrack.
//!
//! This crate provides:
//! - Domain types (exercises, nutrition entries, goals, progress samples)
//! - Draft normalization and numeric coercion
//! - Daily macro aggregation and goal progress
//! - Dashboard snapshot and advice request assembly
//! - Remote service client, orchestration and the draft stash

pub mod types;
pub mod error;
pub mod draft;
pub mod coerce;
pub mod normalize;
pub mod macros;
pub mod progress;
pub mod snapshot;
pub mod insight;
pub mod config;
pub mod logging;
pub mod client;
pub mod tracker;
pub mod stash;
mod wire;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError, ValidationReason};
pub use types::*;
pub use draft::{Draft, ExerciseDraft, GoalDraft, MacrosDraft, NutritionDraft, ProgressDraft};
pub use config::Config;
pub use normalize::{apply_food_candidate, normalize};
pub use macros::{aggregate_macros, ReportingWindow};
pub use progress::progress_ratio;
pub use snapshot::{assemble_snapshot, SnapshotLimits};
pub use insight::{build_insight_request, FALLBACK_ADVICE};
pub use client::{RemoteStore, ReqwestRemoteStore};
pub use tracker::{Advice, Tracker};
pub use stash::{DraftStash, StashedDraft};
