/// Constants describing the reference deployment of the experiment.
pub mod defaults {
    /// Stimulus alphabet used by the reference deployment, in canonical order.
    pub const STIMULUS_NAMES: [&str; 4] = ["circle", "rectangle", "star", "triangle"];
    /// Inter-stimulus-interval conditions (seconds) crossed with the alphabet in the WM task.
    pub const WM_ISI_CONDITIONS: [f64; 2] = [1.0, 2.5];
    /// Repetitions of every (stimulus, ISI) cell in the WM factorial.
    pub const WM_REPS_PER_CELL: usize = 3;
    /// Replications of the full (A, B, rule) configuration space in the main task.
    pub const RULE_REPS: usize = 5;
    /// Maximum run of identical rule labels allowed in the main sequence.
    pub const MAX_STREAK: usize = 3;
    /// Restart budget for the greedy placement before soft degradation.
    pub const MAX_RESTARTS: usize = 200;
}

/// Constants for presentation timing consumed by the schedule helpers.
pub mod timing {
    /// Fixation cross duration at trial start (seconds).
    pub const FIXATION_DURATION: f64 = 0.5;
    /// Single stimulus presentation duration (seconds).
    pub const STIM_DURATION: f64 = 0.5;
    /// Mean of the jittered inter-stimulus interval (seconds).
    pub const ISI_MEAN: f64 = 1.0;
    /// Standard deviation of the jittered inter-stimulus interval (seconds).
    pub const ISI_SD: f64 = 0.2;
    /// Floor applied to jittered inter-stimulus intervals (seconds).
    pub const ISI_MIN: f64 = 0.0;
    /// Mean of the jittered inter-trial interval (seconds).
    pub const ITI_BASE: f64 = 3.0;
    /// Standard deviation of the jittered inter-trial interval (seconds).
    pub const ITI_SD: f64 = 1.0;
    /// Floor applied to jittered inter-trial intervals (seconds).
    pub const ITI_MIN: f64 = 0.0;
    /// Response deadline on the choice screen (seconds).
    pub const RESPONSE_DEADLINE: f64 = 2.0;
    /// Duration of the rest block between tasks (seconds).
    pub const REST_DURATION: f64 = 120.0;
}

/// Constants for session structure and the persisted-row contract.
pub mod session {
    /// Number of runs the main sequence is split into.
    pub const MAIN_RUNS: usize = 4;
    /// Block label recorded for WM rows.
    pub const WM_BLOCK_LABEL: &str = "WM";
    /// Prefix for main-task block labels (`main_run1` .. `main_run4`).
    pub const MAIN_BLOCK_PREFIX: &str = "main_run";
    /// Offset added to the session seed to derive the main-task seed.
    pub const MAIN_SEED_OFFSET: u64 = 1;
    /// Filename used by the session manifest writer.
    pub const MANIFEST_FILENAME: &str = "session.json";
}
