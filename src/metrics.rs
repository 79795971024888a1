use indexmap::IndexMap;

use crate::trial::{MainTrial, RuleConfig, RuleKind};

/// Aggregate balance metrics for a generated main sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleBalance {
    pub total: usize,
    /// Trial count per rule kind, in [`RuleKind::ALL`] order.
    pub per_rule: Vec<(RuleKind, usize)>,
    /// Longest contiguous run of identical rule labels.
    pub longest_run: usize,
    /// Share of the dominant rule kind.
    pub max_share: f64,
}

/// Compute balance metrics from an ordered trial list.
pub fn rule_balance(trials: &[MainTrial]) -> Option<RuleBalance> {
    if trials.is_empty() {
        return None;
    }
    let per_rule: Vec<(RuleKind, usize)> = RuleKind::ALL
        .iter()
        .map(|&rule| (rule, trials.iter().filter(|t| t.rule == rule).count()))
        .collect();
    let total = trials.len();
    let max = per_rule.iter().map(|&(_, count)| count).max().unwrap_or(0);
    Some(RuleBalance {
        total,
        per_rule,
        longest_run: longest_rule_run(trials),
        max_share: max as f64 / total as f64,
    })
}

/// Longest contiguous run of identical rule labels in presentation order.
pub fn longest_rule_run(trials: &[MainTrial]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut last = None;
    for trial in trials {
        if Some(trial.rule) == last {
            run += 1;
        } else {
            run = 1;
            last = Some(trial.rule);
        }
        longest = longest.max(run);
    }
    longest
}

/// Count occurrences of each configuration cell, keyed in first-seen order
/// so reports and test diffs are stable.
pub fn config_multiset(trials: &[MainTrial]) -> IndexMap<RuleConfig, usize> {
    let mut counts: IndexMap<RuleConfig, usize> = IndexMap::new();
    for trial in trials {
        *counts.entry(trial.rule_config()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use crate::trial::MainTrial;

    use super::*;

    fn trial(rule: RuleKind) -> MainTrial {
        let config = RuleConfig {
            a: "circle".to_string(),
            b: "star".to_string(),
            rule,
        };
        MainTrial::from_parts(&config, "star".to_string(), "triangle".to_string())
    }

    #[test]
    fn balance_reports_counts_and_runs() {
        let trials = vec![
            trial(RuleKind::Aba),
            trial(RuleKind::Aba),
            trial(RuleKind::Abb),
            trial(RuleKind::Aba),
        ];
        let balance = rule_balance(&trials).expect("balance");
        assert_eq!(balance.total, 4);
        assert_eq!(balance.per_rule[0], (RuleKind::Aba, 3));
        assert_eq!(balance.per_rule[1], (RuleKind::Abb, 1));
        assert_eq!(balance.longest_run, 2);
        assert!((balance.max_share - 0.75).abs() < 1e-9);
    }

    #[test]
    fn balance_of_an_empty_sequence_is_none() {
        assert!(rule_balance(&[]).is_none());
    }

    #[test]
    fn multiset_counts_duplicate_cells() {
        let trials = vec![trial(RuleKind::Aba), trial(RuleKind::Aba), trial(RuleKind::Abb)];
        let counts = config_multiset(&trials);
        assert_eq!(counts.len(), 2);
        let aba = trials[0].rule_config();
        assert_eq!(counts[&aba], 2);
    }
}
