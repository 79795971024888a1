use serde::{Deserialize, Serialize};

use crate::types::{Seconds, StimulusId};

/// Relational rule governing a main-task trial.
///
/// `ABA` repeats the first stimulus after the second; `ABB` repeats the
/// second. Serialized as `"ABA"` / `"ABB"` to match the persisted rows.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleKind {
    Aba,
    Abb,
}

impl RuleKind {
    /// Every rule kind, in canonical order.
    pub const ALL: [RuleKind; 2] = [RuleKind::Aba, RuleKind::Abb];

    /// Persisted-row spelling of this rule kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Aba => "ABA",
            RuleKind::Abb => "ABB",
        }
    }

    /// Expand the rule over a stimulus pair into the three-item rule phase.
    pub fn rule_sequence(&self, a: &StimulusId, b: &StimulusId) -> [StimulusId; 3] {
        match self {
            RuleKind::Aba => [a.clone(), b.clone(), a.clone()],
            RuleKind::Abb => [a.clone(), b.clone(), b.clone()],
        }
    }

    /// Which probe continues the test pair under this rule.
    pub fn correct_next<'a>(&self, a_prime: &'a StimulusId, b_prime: &'a StimulusId) -> &'a StimulusId {
        match self {
            RuleKind::Aba => a_prime,
            RuleKind::Abb => b_prime,
        }
    }
}

/// One cell of the main-task configuration space: an ordered stimulus pair
/// with `a != b`, plus the rule applied to it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RuleConfig {
    pub a: StimulusId,
    pub b: StimulusId,
    pub rule: RuleKind,
}

/// A working-memory pretest trial.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WmTrial {
    /// Stimulus shown as the memory sample.
    pub sample_stim: StimulusId,
    /// Delay between sample offset and the response screen (seconds).
    pub isi_condition: Seconds,
}

/// A fully enriched main-task trial, immutable once produced.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MainTrial {
    /// Rule governing this trial.
    pub rule: RuleKind,
    /// First stimulus of the rule pair.
    pub a_stim: StimulusId,
    /// Second stimulus of the rule pair (distinct from `a_stim`).
    pub b_stim: StimulusId,
    /// First test probe; may overlap the rule pair but never equals `b_prime`.
    pub a_prime: StimulusId,
    /// Second test probe; may overlap the rule pair but never equals `a_prime`.
    pub b_prime: StimulusId,
    /// Three-item rule phase, `[A, B, A]` or `[A, B, B]`.
    pub rule_sequence: [StimulusId; 3],
    /// Two-item test phase, `[a_prime, b_prime]`.
    pub test_sequence: [StimulusId; 2],
    /// Expected response: the probe that continues the test pair under `rule`.
    pub correct_next_stim: StimulusId,
}

impl MainTrial {
    /// Derive a trial record from a placed configuration and freshly sampled
    /// test probes.
    pub fn from_parts(config: &RuleConfig, a_prime: StimulusId, b_prime: StimulusId) -> Self {
        let rule_sequence = config.rule.rule_sequence(&config.a, &config.b);
        let correct_next_stim = config.rule.correct_next(&a_prime, &b_prime).clone();
        Self {
            rule: config.rule,
            a_stim: config.a.clone(),
            b_stim: config.b.clone(),
            rule_sequence,
            test_sequence: [a_prime.clone(), b_prime.clone()],
            a_prime,
            b_prime,
            correct_next_stim,
        }
    }

    /// The configuration cell this trial was derived from.
    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            a: self.a_stim.clone(),
            b: self.b_stim.clone(),
            rule: self.rule,
        }
    }
}

/// Result of main-sequence generation.
///
/// `placement` is the ordered list of base-multiset indices before
/// enrichment; regenerating with the same seed and configuration reproduces
/// it exactly, which is how a logged session is audited offline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MainSequence {
    /// Enriched trials in presentation order.
    pub trials: Vec<MainTrial>,
    /// Base-multiset indices in placement order.
    pub placement: Vec<usize>,
    /// False when every restart attempt got stuck and the sequence fell back
    /// to an unconstrained permutation (the streak bound may be violated).
    pub streak_satisfied: bool,
    /// Number of placement attempts consumed, including the successful one.
    pub attempts: usize,
}

impl MainSequence {
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Rule labels in presentation order, for streak inspection.
    pub fn rule_labels(&self) -> Vec<RuleKind> {
        self.trials.iter().map(|trial| trial.rule).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_expansion_matches_both_kinds() {
        let a = "circle".to_string();
        let b = "star".to_string();
        assert_eq!(
            RuleKind::Aba.rule_sequence(&a, &b),
            ["circle".to_string(), "star".to_string(), "circle".to_string()]
        );
        assert_eq!(
            RuleKind::Abb.rule_sequence(&a, &b),
            ["circle".to_string(), "star".to_string(), "star".to_string()]
        );
    }

    #[test]
    fn from_parts_derives_the_correct_probe() {
        let config = RuleConfig {
            a: "circle".to_string(),
            b: "star".to_string(),
            rule: RuleKind::Abb,
        };
        let trial = MainTrial::from_parts(&config, "triangle".to_string(), "circle".to_string());
        assert_eq!(trial.correct_next_stim, "circle");
        assert_eq!(trial.test_sequence, ["triangle".to_string(), "circle".to_string()]);
        assert_eq!(trial.rule_config(), config);
    }

    #[test]
    fn rule_kind_serializes_to_row_spelling() {
        assert_eq!(serde_json::to_string(&RuleKind::Aba).unwrap(), "\"ABA\"");
        assert_eq!(RuleKind::Abb.as_str(), "ABB");
    }
}
