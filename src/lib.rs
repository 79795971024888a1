#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Experiment configuration types and fail-fast validation.
pub mod config;
/// Centralized constants for the reference deployment, timing, and sessions.
pub mod constants;
mod errors;
/// Reusable CLI runners backing the demo binaries.
pub mod example_apps;
/// WM and main sequence generators and the greedy placement core.
pub mod generator;
/// Offline inspection of generated sequences (balance, runs, multisets).
pub mod metrics;
/// Deterministic seeded RNG shared by every randomized decision.
pub mod rng;
/// Jittered ISI/ITI timing utilities.
pub mod schedule;
/// Session manifest, persisted-row contract, and block structure.
pub mod session;
/// Trial record types produced by the generators.
pub mod trial;
/// Shared type aliases.
pub mod types;

pub use config::{ExperimentConfig, MainConfig, TimingConfig, WmConfig};
pub use errors::SequencerError;
pub use generator::{TrialGenerator, generate_main_sequence, generate_wm_sequence, rule_configs};
pub use metrics::{RuleBalance, config_multiset, longest_rule_run, rule_balance};
pub use rng::DeterministicRng;
pub use schedule::{JitterSpec, TrialSchedule, main_trial_schedule};
pub use session::{
    FIELD_NAMES, ResponseOutcome, SessionInfo, TrialRow, main_block_label, run_chunks,
    slot_mapping,
};
pub use trial::{MainSequence, MainTrial, RuleConfig, RuleKind, WmTrial};
pub use types::{BlockLabel, ResponseKey, Seconds, StimulusId, SubjectId};
