use std::error::Error;

use clap::{Parser, ValueEnum};

use crate::config::ExperimentConfig;
use crate::generator::TrialGenerator;
use crate::metrics::{config_multiset, rule_balance};
use crate::session::SessionInfo;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TaskArg {
    Wm,
    Main,
}

#[derive(Debug, Parser)]
#[command(
    name = "trial_plan",
    disable_help_subcommand = true,
    about = "Pre-generate session trial sequences",
    long_about = "Generate the WM or main trial sequence for a session seed and emit one JSON \
                  record per trial, or a balance summary with --summary."
)]
/// CLI for `trial_plan`.
///
/// Common usage:
/// - Emit the main sequence for a seed: `--seed 42 --task main`
/// - Inspect balance and streaks only: `--seed 42 --task main --summary`
pub struct TrialPlanCli {
    #[arg(
        long,
        default_value_t = 42,
        help = "Session seed; the main task derives its own seed from it"
    )]
    seed: u64,
    #[arg(long, value_enum, default_value = "main", help = "Which sequence to generate")]
    task: TaskArg,
    #[arg(long, default_value = "demo", help = "Subject id recorded in the plan")]
    sid: String,
    #[arg(long, help = "Print a balance summary instead of per-trial JSON")]
    summary: bool,
}

/// Entry point shared by the `trial_plan` binary.
pub fn run_trial_plan_app() -> Result<(), Box<dyn Error>> {
    let cli = TrialPlanCli::parse();
    let session = SessionInfo::new(cli.sid, cli.seed);
    let generator = TrialGenerator::new(ExperimentConfig::default())?;

    match cli.task {
        TaskArg::Wm => {
            let trials = generator.wm_sequence(session.wm_seed());
            if cli.summary {
                println!("wm trials: {}", trials.len());
                return Ok(());
            }
            for trial in &trials {
                println!("{}", serde_json::to_string(trial)?);
            }
        }
        TaskArg::Main => {
            let sequence = generator.main_sequence(session.main_seed());
            if cli.summary {
                println!(
                    "main trials: {} (attempts {}, streak bound {})",
                    sequence.len(),
                    sequence.attempts,
                    if sequence.streak_satisfied { "met" } else { "DEGRADED" },
                );
                println!(
                    "distinct configurations: {}",
                    config_multiset(&sequence.trials).len()
                );
                if let Some(balance) = rule_balance(&sequence.trials) {
                    for (rule, count) in &balance.per_rule {
                        println!("  {}: {count}", rule.as_str());
                    }
                    println!("longest rule run: {}", balance.longest_run);
                }
                return Ok(());
            }
            for trial in &sequence.trials {
                println!("{}", serde_json::to_string(trial)?);
            }
        }
    }
    Ok(())
}
