use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::ExperimentConfig;
use crate::errors::SequencerError;
use crate::rng::DeterministicRng;
use crate::trial::{MainSequence, MainTrial, RuleConfig, RuleKind, WmTrial};
use crate::types::StimulusId;

/// The full configuration space in canonical order: every ordered stimulus
/// pair with distinct members, crossed with both rule kinds.
pub fn rule_configs(alphabet: &[StimulusId]) -> Vec<RuleConfig> {
    let mut configs = Vec::with_capacity(alphabet.len() * alphabet.len().saturating_sub(1) * 2);
    for a in alphabet {
        for b in alphabet {
            if a == b {
                continue;
            }
            for rule in RuleKind::ALL {
                configs.push(RuleConfig {
                    a: a.clone(),
                    b: b.clone(),
                    rule,
                });
            }
        }
    }
    configs
}

/// Seed-deterministic generator for both task sequences.
///
/// Construction validates the configuration, so unsatisfiable parameter
/// combinations are rejected before any generation work. Generation itself
/// is a pure function of `(seed, config)`: no clock, no I/O, one sequential
/// RNG stream per call.
pub struct TrialGenerator {
    config: ExperimentConfig,
}

impl TrialGenerator {
    pub fn new(config: ExperimentConfig) -> Result<Self, SequencerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Generate the WM pretest sequence: the full (stimulus, delay) factorial
    /// replicated per cell, then shuffled once. Cannot fail.
    pub fn wm_sequence(&self, seed: u64) -> Vec<WmTrial> {
        let mut trials = Vec::with_capacity(self.config.wm_trial_count());
        for stim in &self.config.alphabet {
            for &isi in &self.config.wm.isi_conditions {
                for _ in 0..self.config.wm.reps_per_cell {
                    trials.push(WmTrial {
                        sample_stim: stim.clone(),
                        isi_condition: isi,
                    });
                }
            }
        }
        let mut rng = DeterministicRng::new(seed);
        trials.shuffle(&mut rng);
        trials
    }

    /// Generate the streak-bounded main sequence.
    ///
    /// Each restart attempt draws a fresh permutation from the same seeded
    /// stream and consumes it greedily; enrichment continues that stream in
    /// placement order. On restart exhaustion the last unconstrained
    /// permutation is returned with `streak_satisfied` cleared — never an
    /// error, never silent.
    pub fn main_sequence(&self, seed: u64) -> MainSequence {
        let configs = rule_configs(&self.config.alphabet);
        let base_len = configs.len() * self.config.main.rule_reps;
        let labels: Vec<RuleKind> = (0..base_len)
            .map(|idx| configs[idx % configs.len()].rule)
            .collect();

        let mut rng = DeterministicRng::new(seed);
        let mut indices: Vec<usize> = (0..base_len).collect();
        let mut placement = None;
        let mut attempts = 0;
        while attempts < self.config.main.max_restarts {
            attempts += 1;
            indices.shuffle(&mut rng);
            match place_with_streak_bound(&labels, self.config.main.max_streak, &indices) {
                Some(placed) => {
                    debug!(attempts, "streak-bounded placement succeeded");
                    placement = Some(placed);
                    break;
                }
                None => continue,
            }
        }

        let (placement, streak_satisfied) = match placement {
            Some(placed) => (placed, true),
            None => {
                warn!(
                    attempts,
                    max_streak = self.config.main.max_streak,
                    "placement exhausted its restart budget; returning an unconstrained order"
                );
                (indices, false)
            }
        };

        let trials = placement
            .iter()
            .map(|&idx| {
                let config = &configs[idx % configs.len()];
                let (a_prime, b_prime) = distinct_pair(&self.config.alphabet, &mut rng);
                MainTrial::from_parts(config, a_prime, b_prime)
            })
            .collect();

        MainSequence {
            trials,
            placement,
            streak_satisfied,
            attempts,
        }
    }
}

/// Generate a WM sequence with the reference-deployment configuration.
pub fn generate_wm_sequence(seed: u64) -> Result<Vec<WmTrial>, SequencerError> {
    Ok(TrialGenerator::new(ExperimentConfig::default())?.wm_sequence(seed))
}

/// Generate a main sequence with the reference-deployment configuration.
pub fn generate_main_sequence(seed: u64) -> Result<MainSequence, SequencerError> {
    Ok(TrialGenerator::new(ExperimentConfig::default())?.main_sequence(seed))
}

/// Greedily consume `order` into a placed list, skipping candidates whose
/// label would extend a maximal run. Returns `None` when every remaining
/// candidate carries the forbidden label.
fn place_with_streak_bound(
    labels: &[RuleKind],
    max_streak: usize,
    order: &[usize],
) -> Option<Vec<usize>> {
    let mut pool: Vec<usize> = order.to_vec();
    let mut placed: Vec<usize> = Vec::with_capacity(pool.len());
    while !pool.is_empty() {
        let forbidden = forbidden_label(&placed, labels, max_streak);
        let pos = pool
            .iter()
            .position(|&idx| forbidden != Some(labels[idx]))?;
        placed.push(pool.remove(pos));
    }
    Some(placed)
}

/// The label that must not be placed next: set only when the last
/// `max_streak` placements all share it.
fn forbidden_label(placed: &[usize], labels: &[RuleKind], max_streak: usize) -> Option<RuleKind> {
    if placed.len() < max_streak {
        return None;
    }
    let tail = &placed[placed.len() - max_streak..];
    let first = labels[tail[0]];
    tail.iter()
        .all(|&idx| labels[idx] == first)
        .then_some(first)
}

/// Two distinct stimuli drawn uniformly over ordered pairs.
fn distinct_pair(alphabet: &[StimulusId], rng: &mut DeterministicRng) -> (StimulusId, StimulusId) {
    let first = rng.random_range(0..alphabet.len());
    let mut second = rng.random_range(0..alphabet.len() - 1);
    if second >= first {
        second += 1;
    }
    (alphabet[first].clone(), alphabet[second].clone())
}
