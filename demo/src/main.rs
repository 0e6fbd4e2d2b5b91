//! Ethos decision gate demo CLI
//!
//! Validates an intent against a TOML-configured policy pipeline, records the
//! decision in a JSON-lines audit log, and reports on that log.
//!
//! Usage:
//!   cargo run -p demo -- validate --policy demo/fixtures/policy.toml --intent demo/fixtures/intent.json
//!   cargo run -p demo -- summary --audit ethos-audit.jsonl --json audit-report.json
//!   cargo run -p demo -- optimize --target 0.8 --ethics 0.75

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ethos_audit::{AuditLog, JsonlRecordStore};
use ethos_contracts::{
    audit::Fields,
    error::{EthosError, EthosResult},
    policy::Intent,
};
use ethos_core::{traits::DecisionPolicy, ScoreEngine};
use ethos_policy::PolicyPipeline;

const DEFAULT_AUDIT_PATH: &str = "ethos-audit.jsonl";

// ── CLI definition ────────────────────────────────────────────────────────────

/// Ethos: ethics-weighted decision gate.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Ethos decision gate demo",
    long_about = "Scores intents with the Ethical Profitability Index, applies the\n\
                  compliance and risk gates, and keeps a hash-verifiable audit log."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate one intent and append the decision to the audit log.
    Validate {
        /// Pipeline configuration (TOML).
        #[arg(long)]
        policy: PathBuf,
        /// Intent to validate (JSON).
        #[arg(long)]
        intent: PathBuf,
        /// Audit log file (JSON lines).
        #[arg(long, default_value = DEFAULT_AUDIT_PATH)]
        audit: PathBuf,
        /// Actor recorded against the decision.
        #[arg(long, default_value = "demo-agent")]
        actor: String,
    },
    /// Verify the audit log and print its aggregate summary.
    Summary {
        #[arg(long, default_value = DEFAULT_AUDIT_PATH)]
        audit: PathBuf,
        /// Also save the report to this file as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Search for the profit level that best reaches a target index.
    Optimize {
        #[arg(long)]
        target: f64,
        #[arg(long)]
        ethics: f64,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-evaluation traces.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate {
            policy,
            intent,
            audit,
            actor,
        } => run_validate(&policy, &intent, &audit, &actor),
        Command::Summary { audit, json } => run_summary(&audit, json.as_deref()),
        Command::Optimize { target, ethics } => run_optimize(target, ethics),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_validate(policy: &Path, intent: &Path, audit: &Path, actor: &str) -> EthosResult<()> {
    let pipeline = PolicyPipeline::from_file(policy)?;
    let intent = load_intent(intent)?;
    let log = open_log(audit)?;

    let decision = pipeline.validate(&intent)?;
    let hash = log.record_decision(
        actor,
        &intent.action,
        &format!("{} requested by {}", intent.action, actor),
        &decision,
        intent_fields(&intent)?,
    )?;

    info!(actor_id = %actor, action = %intent.action, reason_code = %decision.reason_code, "decision recorded");

    println!("Decision     : {}", if decision.approved { "APPROVED" } else { "REJECTED" });
    println!("Reason code  : {}", decision.reason_code);
    if let Some(risk) = decision.risk_score {
        println!("Risk score   : {:.3}", risk);
    }
    if let Some(trace) = &decision.score_trace {
        println!("Index        : {:.3} (threshold {})", trace.index, trace.threshold);
        println!("  harmonic   : {:.3}", trace.harmonic_mean);
        println!("  balance    : {:.3}", trace.balance_penalty);
        println!("  trust      : {:.3}", trace.trust);
        match trace.golden_ratio_deviation {
            Some(dev) => println!("  phi dev    : {:.3}", dev),
            None => println!("  phi dev    : undefined (ethics is 0)"),
        }
        println!("  reason     : {}", trace.reason);
    }
    println!("Audit hash   : {}", hash);
    println!("Audit log    : {}", audit.display());
    Ok(())
}

fn run_summary(audit: &Path, json: Option<&Path>) -> EthosResult<()> {
    let log = open_log(audit)?;
    let intact = log.verify_integrity()?;
    let summary = log.summarize()?;

    println!("Audit log    : {}", audit.display());
    println!("Integrity    : {}", if intact { "OK" } else { "TAMPERED" });
    println!("Records      : {}", summary.total_records);
    println!("Approved     : {}", summary.approved_count);
    println!("Rejected     : {}", summary.rejected_count);
    println!("Mean index   : {:.3}", summary.mean_index);
    println!("Per actor:");
    for (actor, count) in &summary.per_actor_counts {
        println!("  {:<20} {}", actor, count);
    }
    println!("Per action:");
    for (action, count) in &summary.per_action_counts {
        println!("  {:<20} {}", action, count);
    }
    if let Some(path) = json {
        summary.save_json(path)?;
        println!("Report saved : {}", path.display());
    }

    if !intact {
        return Err(EthosError::storage(format!(
            "audit log '{}' failed integrity verification",
            audit.display()
        )));
    }
    Ok(())
}

fn run_optimize(target: f64, ethics: f64) -> EthosResult<()> {
    let engine = ScoreEngine::default();
    match engine.optimize_for_target(target, ethics, &[])? {
        Some(optimum) => {
            println!("Optimal profit   : {:.3}", optimum.optimal_profit);
            println!("Achieved index   : {:.3}", optimum.achieved_index);
            println!("Profit / ethics  : {:.3}", optimum.profit_ethics_ratio);
            println!("Ideal ratio      : {:.3}", optimum.ideal_ratio);
            println!("Phi deviation    : {:.3}", optimum.golden_ratio_deviation);
        }
        None => println!("No profit level reaches index {} with ethics {}", target, ethics),
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn open_log(path: &Path) -> EthosResult<AuditLog> {
    AuditLog::open(Box::new(JsonlRecordStore::open(path)?))
}

fn load_intent(path: &Path) -> EthosResult<Intent> {
    let contents = std::fs::read_to_string(path).map_err(|e| EthosError::ConfigError {
        reason: format!("failed to read intent '{}': {}", path.display(), e),
    })?;
    serde_json::from_str(&contents).map_err(|e| EthosError::ConfigError {
        reason: format!("failed to parse intent '{}': {}", path.display(), e),
    })
}

/// The intent's fields, stored as the record's inputs.
fn intent_fields(intent: &Intent) -> EthosResult<Fields> {
    match serde_json::to_value(intent) {
        Ok(serde_json::Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(other) => Err(EthosError::storage(format!(
            "intent serialized to non-object JSON: {}",
            other
        ))),
        Err(e) => Err(EthosError::storage(format!("failed to encode intent: {}", e))),
    }
}
