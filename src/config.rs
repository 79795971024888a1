use std::collections::HashSet;

use crate::constants::{defaults, timing};
use crate::errors::SequencerError;
use crate::schedule::JitterSpec;
use crate::trial::RuleKind;
use crate::types::{Seconds, StimulusId};

/// Parameters for the working-memory pretest factorial.
#[derive(Clone, Debug)]
pub struct WmConfig {
    /// Delay conditions (seconds) crossed with every stimulus.
    pub isi_conditions: Vec<Seconds>,
    /// Repetitions of every (stimulus, delay) cell.
    pub reps_per_cell: usize,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            isi_conditions: defaults::WM_ISI_CONDITIONS.to_vec(),
            reps_per_cell: defaults::WM_REPS_PER_CELL,
        }
    }
}

/// Parameters for the streak-bounded main sequence.
#[derive(Clone, Debug)]
pub struct MainConfig {
    /// Replications of the full (A, B, rule) configuration space.
    pub rule_reps: usize,
    /// Maximum run of identical rule labels allowed in the output.
    pub max_streak: usize,
    /// Restart budget for the greedy placement before soft degradation.
    pub max_restarts: usize,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            rule_reps: defaults::RULE_REPS,
            max_streak: defaults::MAX_STREAK,
            max_restarts: defaults::MAX_RESTARTS,
        }
    }
}

/// Presentation timing parameters consumed by the schedule helpers.
///
/// The sequencer itself never sleeps or reads a clock; these values are
/// carried so the driver and the row schema share one source of truth.
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Fixation cross duration at trial start.
    pub fixation_duration: Seconds,
    /// Single stimulus presentation duration.
    pub stim_duration: Seconds,
    /// Jitter applied to inter-stimulus intervals.
    pub isi: JitterSpec,
    /// Jitter applied to inter-trial intervals.
    pub iti: JitterSpec,
    /// Response deadline on the choice screen.
    pub response_deadline: Seconds,
    /// Duration of the rest block between tasks.
    pub rest_duration: Seconds,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixation_duration: timing::FIXATION_DURATION,
            stim_duration: timing::STIM_DURATION,
            isi: JitterSpec {
                mean: timing::ISI_MEAN,
                sd: timing::ISI_SD,
                min: timing::ISI_MIN,
            },
            iti: JitterSpec {
                mean: timing::ITI_BASE,
                sd: timing::ITI_SD,
                min: timing::ITI_MIN,
            },
            response_deadline: timing::RESPONSE_DEADLINE,
            rest_duration: timing::REST_DURATION,
        }
    }
}

/// Top-level sequencer configuration.
///
/// All parameters are plain values supplied by the caller; nothing is read
/// from the environment or from files. Defaults mirror the reference
/// deployment (4 stimuli, 2 delay conditions, 120 main trials).
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    /// Ordered stimulus alphabet shared by both tasks.
    pub alphabet: Vec<StimulusId>,
    /// Working-memory pretest parameters.
    pub wm: WmConfig,
    /// Main-task parameters.
    pub main: MainConfig,
    /// Presentation timing parameters.
    pub timing: TimingConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            alphabet: defaults::STIMULUS_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            wm: WmConfig::default(),
            main: MainConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Number of ordered (A, B) pairs with distinct members.
    pub fn ordered_pairs(&self) -> usize {
        self.alphabet.len() * (self.alphabet.len().saturating_sub(1))
    }

    /// Size of the full configuration space (pairs crossed with rule kinds).
    pub fn config_space_len(&self) -> usize {
        self.ordered_pairs() * RuleKind::ALL.len()
    }

    /// Total number of main-task trials.
    pub fn main_trial_count(&self) -> usize {
        self.config_space_len() * self.main.rule_reps
    }

    /// Total number of WM trials.
    pub fn wm_trial_count(&self) -> usize {
        self.alphabet.len() * self.wm.isi_conditions.len() * self.wm.reps_per_cell
    }

    /// Reject parameter combinations that cannot produce a valid sequence.
    ///
    /// Runs before any generation work so unsatisfiable setups fail fast
    /// instead of looping to restart exhaustion.
    pub fn validate(&self) -> Result<(), SequencerError> {
        if self.alphabet.len() < 2 {
            return Err(SequencerError::Configuration(format!(
                "alphabet must contain at least 2 stimuli, got {}",
                self.alphabet.len()
            )));
        }
        let distinct: HashSet<&StimulusId> = self.alphabet.iter().collect();
        if distinct.len() != self.alphabet.len() {
            return Err(SequencerError::Configuration(
                "alphabet contains duplicate stimulus ids".into(),
            ));
        }
        if self.wm.isi_conditions.is_empty() {
            return Err(SequencerError::Configuration(
                "wm.isi_conditions must not be empty".into(),
            ));
        }
        if self.wm.reps_per_cell == 0 {
            return Err(SequencerError::Configuration(
                "wm.reps_per_cell must be at least 1".into(),
            ));
        }
        if self.main.rule_reps == 0 {
            return Err(SequencerError::Configuration(
                "main.rule_reps must be at least 1".into(),
            ));
        }
        if self.main.max_streak == 0 {
            return Err(SequencerError::Configuration(
                "main.max_streak must be at least 1".into(),
            ));
        }
        if self.main.max_restarts == 0 {
            return Err(SequencerError::Configuration(
                "main.max_restarts must be at least 1".into(),
            ));
        }
        if self.timing.isi.sd < 0.0 || self.timing.iti.sd < 0.0 {
            return Err(SequencerError::Configuration(
                "timing jitter standard deviations must be non-negative".into(),
            ));
        }
        self.validate_streak_feasibility()
    }

    /// Run-length feasibility: an arrangement with runs of at most `max_streak`
    /// exists iff the dominant label fits into the gaps left by the others,
    /// `max_count <= max_streak * (total - max_count + 1)`.
    fn validate_streak_feasibility(&self) -> Result<(), SequencerError> {
        let per_label = self.ordered_pairs() * self.main.rule_reps;
        let total = per_label * RuleKind::ALL.len();
        // Rule labels are balanced by construction, so every label carries
        // `per_label` items and the dominant count equals it.
        let max_count = per_label;
        if max_count > self.main.max_streak * (total - max_count + 1) {
            return Err(SequencerError::Configuration(format!(
                "max_streak {} cannot be satisfied: {} of {} items share one rule label",
                self.main.max_streak, max_count, total
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_sized_like_the_reference_deployment() {
        let config = ExperimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.config_space_len(), 24);
        assert_eq!(config.main_trial_count(), 120);
        assert_eq!(config.wm_trial_count(), 24);
    }

    #[test]
    fn rejects_tiny_or_duplicated_alphabets() {
        let mut config = ExperimentConfig {
            alphabet: vec!["circle".to_string()],
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SequencerError::Configuration(_))
        ));

        config.alphabet = vec!["circle".to_string(), "circle".to_string()];
        assert!(matches!(
            config.validate(),
            Err(SequencerError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_zeroed_counts() {
        let breakages: [fn(&mut ExperimentConfig); 5] = [
            |c| c.wm.reps_per_cell = 0,
            |c| c.wm.isi_conditions = Vec::new(),
            |c| c.main.rule_reps = 0,
            |c| c.main.max_streak = 0,
            |c| c.main.max_restarts = 0,
        ];
        for breakage in breakages {
            let mut config = ExperimentConfig::default();
            breakage(&mut config);
            assert!(matches!(
                config.validate(),
                Err(SequencerError::Configuration(_))
            ));
        }
    }

    #[test]
    fn balanced_labels_are_always_feasible() {
        // Smallest supported deployment: 2 stimuli, 1 rep, streak bound 1.
        let config = ExperimentConfig {
            alphabet: vec!["circle".to_string(), "star".to_string()],
            main: MainConfig {
                rule_reps: 1,
                max_streak: 1,
                max_restarts: 10,
            },
            ..ExperimentConfig::default()
        };
        config.validate().unwrap();
    }
}
