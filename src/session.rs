use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::session as session_consts;
use crate::errors::SequencerError;
use crate::schedule::TrialSchedule;
use crate::trial::{MainTrial, RuleKind, WmTrial};
use crate::types::{BlockLabel, ResponseKey, Seconds, StimulusId, SubjectId};

/// Column names of the persisted tabular record, one row per trial.
///
/// The file format and writing belong to the driver; this crate owns the
/// column set and how rows are populated from generated trials.
pub const FIELD_NAMES: [&str; 34] = [
    "block",
    "sid",
    "trial",
    "sample_stim",
    "isi_condition",
    "rule_type",
    "A_stim",
    "B_stim",
    "A_prime",
    "B_prime",
    "rule_sequence",
    "test_sequence",
    "correct_next_stim",
    "slot_mapping",
    "correct_stim",
    "response_key",
    "response_slot",
    "response_stim",
    "correct",
    "rt",
    "isi1",
    "isi2",
    "isi3",
    "isi4",
    "iti",
    "t_fixation",
    "t_sample",
    "t_delay",
    "t_rule1",
    "t_rule2",
    "t_rule3",
    "t_test1",
    "t_test2",
    "t_response",
];

/// Identity and seed material of one session, persisted as a JSON manifest
/// so the trial list can be regenerated offline from the logged seed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub sid: SubjectId,
    pub seed: u64,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    /// Start a session record now.
    pub fn new(sid: SubjectId, seed: u64) -> Self {
        Self {
            sid,
            seed,
            started_at: Utc::now(),
        }
    }

    /// Seed used for the WM pretest sequence.
    pub fn wm_seed(&self) -> u64 {
        self.seed
    }

    /// Seed used for the main sequence.
    pub fn main_seed(&self) -> u64 {
        self.seed.wrapping_add(session_consts::MAIN_SEED_OFFSET)
    }

    /// Write the manifest into `dir` and return the file path.
    pub fn write_manifest(&self, dir: &Path) -> Result<PathBuf, SequencerError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(session_consts::MANIFEST_FILENAME);
        fs::write(&path, serde_json::to_vec_pretty(self)?)?;
        info!(sid = %self.sid, seed = self.seed, path = %path.display(), "wrote session manifest");
        Ok(path)
    }

    /// Load a manifest previously written by [`write_manifest`](Self::write_manifest).
    pub fn load_manifest(path: &Path) -> Result<Self, SequencerError> {
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }
}

/// Observed response on the choice screen; absent on timeout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResponseOutcome {
    pub key: ResponseKey,
    /// 1-based slot index of the chosen stimulus.
    pub slot: usize,
    pub stim: StimulusId,
    pub correct: bool,
    pub rt: Seconds,
}

/// One persisted row. Fields a trial kind does not set stay `None` and
/// serialize to empty cells via [`TrialRow::values`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TrialRow {
    pub block: BlockLabel,
    pub sid: SubjectId,
    pub trial: usize,
    pub sample_stim: Option<StimulusId>,
    pub isi_condition: Option<Seconds>,
    pub rule_type: Option<RuleKind>,
    #[serde(rename = "A_stim")]
    pub a_stim: Option<StimulusId>,
    #[serde(rename = "B_stim")]
    pub b_stim: Option<StimulusId>,
    #[serde(rename = "A_prime")]
    pub a_prime: Option<StimulusId>,
    #[serde(rename = "B_prime")]
    pub b_prime: Option<StimulusId>,
    /// Comma-joined rule phase, e.g. `circle,star,circle`.
    pub rule_sequence: Option<String>,
    /// Comma-joined test phase, e.g. `star,triangle`.
    pub test_sequence: Option<String>,
    pub correct_next_stim: Option<StimulusId>,
    /// Comma-joined response-slot layout for this trial.
    pub slot_mapping: Option<String>,
    /// Stimulus counted as correct for accuracy scoring.
    pub correct_stim: Option<StimulusId>,
    pub response_key: Option<ResponseKey>,
    pub response_slot: Option<usize>,
    pub response_stim: Option<StimulusId>,
    /// 1 for a correct response, 0 for incorrect or timeout.
    pub correct: Option<u8>,
    pub rt: Option<Seconds>,
    pub isi1: Option<Seconds>,
    pub isi2: Option<Seconds>,
    pub isi3: Option<Seconds>,
    pub isi4: Option<Seconds>,
    pub iti: Option<Seconds>,
    pub t_fixation: Option<Seconds>,
    pub t_sample: Option<Seconds>,
    pub t_delay: Option<Seconds>,
    pub t_rule1: Option<Seconds>,
    pub t_rule2: Option<Seconds>,
    pub t_rule3: Option<Seconds>,
    pub t_test1: Option<Seconds>,
    pub t_test2: Option<Seconds>,
    pub t_response: Option<Seconds>,
}

impl TrialRow {
    /// Row for a WM pretest trial. The sample stimulus doubles as the
    /// correct choice.
    pub fn wm(sid: &SubjectId, trial: usize, wm_trial: &WmTrial) -> Self {
        Self {
            block: session_consts::WM_BLOCK_LABEL.to_string(),
            sid: sid.clone(),
            trial,
            sample_stim: Some(wm_trial.sample_stim.clone()),
            isi_condition: Some(wm_trial.isi_condition),
            correct_stim: Some(wm_trial.sample_stim.clone()),
            ..Self::default()
        }
    }

    /// Row for a main-task trial in 1-based run `run`.
    pub fn main(sid: &SubjectId, trial: usize, run: usize, main_trial: &MainTrial) -> Self {
        Self {
            block: main_block_label(run),
            sid: sid.clone(),
            trial,
            rule_type: Some(main_trial.rule),
            a_stim: Some(main_trial.a_stim.clone()),
            b_stim: Some(main_trial.b_stim.clone()),
            a_prime: Some(main_trial.a_prime.clone()),
            b_prime: Some(main_trial.b_prime.clone()),
            rule_sequence: Some(main_trial.rule_sequence.join(",")),
            test_sequence: Some(main_trial.test_sequence.join(",")),
            correct_next_stim: Some(main_trial.correct_next_stim.clone()),
            correct_stim: Some(main_trial.correct_next_stim.clone()),
            ..Self::default()
        }
    }

    /// Attach the jittered durations sampled for this trial.
    pub fn with_schedule(mut self, schedule: &TrialSchedule) -> Self {
        self.isi1 = Some(schedule.isi[0]);
        self.isi2 = Some(schedule.isi[1]);
        self.isi3 = Some(schedule.isi[2]);
        self.isi4 = Some(schedule.isi[3]);
        self.iti = Some(schedule.iti);
        self
    }

    /// Attach the response-slot layout shown on the choice screen.
    pub fn with_slot_mapping(mut self, mapping: &[StimulusId]) -> Self {
        self.slot_mapping = Some(mapping.join(","));
        self
    }

    /// Attach the observed response; `None` records a timeout (scored 0).
    pub fn with_response(mut self, outcome: Option<&ResponseOutcome>) -> Self {
        match outcome {
            Some(outcome) => {
                self.response_key = Some(outcome.key.clone());
                self.response_slot = Some(outcome.slot);
                self.response_stim = Some(outcome.stim.clone());
                self.correct = Some(u8::from(outcome.correct));
                self.rt = Some(outcome.rt);
            }
            None => {
                self.correct = Some(0);
            }
        }
        self
    }

    /// Cell values in [`FIELD_NAMES`] order; unset fields become empty strings.
    pub fn values(&self) -> Vec<String> {
        fn cell<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(|v| v.to_string()).unwrap_or_default()
        }

        vec![
            self.block.clone(),
            self.sid.clone(),
            self.trial.to_string(),
            cell(&self.sample_stim),
            cell(&self.isi_condition),
            self.rule_type.map(|r| r.as_str().to_string()).unwrap_or_default(),
            cell(&self.a_stim),
            cell(&self.b_stim),
            cell(&self.a_prime),
            cell(&self.b_prime),
            cell(&self.rule_sequence),
            cell(&self.test_sequence),
            cell(&self.correct_next_stim),
            cell(&self.slot_mapping),
            cell(&self.correct_stim),
            cell(&self.response_key),
            cell(&self.response_slot),
            cell(&self.response_stim),
            cell(&self.correct),
            cell(&self.rt),
            cell(&self.isi1),
            cell(&self.isi2),
            cell(&self.isi3),
            cell(&self.isi4),
            cell(&self.iti),
            cell(&self.t_fixation),
            cell(&self.t_sample),
            cell(&self.t_delay),
            cell(&self.t_rule1),
            cell(&self.t_rule2),
            cell(&self.t_rule3),
            cell(&self.t_test1),
            cell(&self.t_test2),
            cell(&self.t_response),
        ]
    }
}

/// Block label for 1-based main run `run`, e.g. `main_run1`.
pub fn main_block_label(run: usize) -> BlockLabel {
    format!("{}{run}", session_consts::MAIN_BLOCK_PREFIX)
}

/// Random response-slot layout: a fresh permutation of the alphabet.
pub fn slot_mapping<R: Rng + ?Sized>(alphabet: &[StimulusId], rng: &mut R) -> Vec<StimulusId> {
    let mut mapping = alphabet.to_vec();
    mapping.shuffle(rng);
    mapping
}

/// Split the main sequence into `runs` equal presentation runs, in order.
pub fn run_chunks(trials: &[MainTrial], runs: usize) -> Result<Vec<&[MainTrial]>, SequencerError> {
    if runs == 0 || !trials.len().is_multiple_of(runs) {
        return Err(SequencerError::Configuration(format!(
            "{} trials cannot be split into {} equal runs",
            trials.len(),
            runs
        )));
    }
    Ok(trials.chunks(trials.len() / runs).collect())
}

#[cfg(test)]
mod tests {
    use crate::rng::DeterministicRng;
    use crate::trial::{MainTrial, RuleConfig};

    use super::*;

    fn main_trial() -> MainTrial {
        let config = RuleConfig {
            a: "circle".to_string(),
            b: "star".to_string(),
            rule: RuleKind::Aba,
        };
        MainTrial::from_parts(&config, "star".to_string(), "triangle".to_string())
    }

    #[test]
    fn values_match_the_column_contract() {
        let row = TrialRow::main(&"sid".to_string(), 0, 1, &main_trial());
        let values = row.values();
        assert_eq!(values.len(), FIELD_NAMES.len());
        assert_eq!(values[0], "main_run1");
        assert_eq!(values[5], "ABA");
        assert_eq!(values[10], "circle,star,circle");
        // Response columns stay empty until a response is attached.
        assert_eq!(values[15], "");
    }

    #[test]
    fn timeout_scores_zero_without_response_fields() {
        let row = TrialRow::wm(&"sid".to_string(), 3, &WmTrial {
            sample_stim: "circle".to_string(),
            isi_condition: 2.5,
        })
        .with_response(None);
        assert_eq!(row.correct, Some(0));
        assert_eq!(row.response_key, None);
        assert_eq!(row.correct_stim.as_deref(), Some("circle"));
    }

    #[test]
    fn slot_mapping_is_a_permutation() {
        let alphabet: Vec<StimulusId> = ["circle", "rectangle", "star", "triangle"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rng = DeterministicRng::new(3);
        let mut mapping = slot_mapping(&alphabet, &mut rng);
        mapping.sort();
        let mut sorted = alphabet.clone();
        sorted.sort();
        assert_eq!(mapping, sorted);
    }

    #[test]
    fn run_chunks_rejects_uneven_splits() {
        let trials = vec![main_trial(); 10];
        assert!(run_chunks(&trials, 4).is_err());
        let chunks = run_chunks(&trials, 5).unwrap();
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|chunk| chunk.len() == 2));
    }

    #[test]
    fn seed_convention_offsets_the_main_task() {
        let info = SessionInfo::new("sid".to_string(), 42);
        assert_eq!(info.wm_seed(), 42);
        assert_eq!(info.main_seed(), 43);
    }
}
