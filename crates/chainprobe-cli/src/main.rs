//! # chainprobe
//!
//! Terminal driver for the scenario harness.
//!
//! Runs the built-in catalogue against the simulated chain and prints a
//! per-scenario report plus the aggregate verdict.
//!
//! ## Usage
//!
//! ```bash
//! # Run the full catalogue
//! chainprobe
//!
//! # Run only the critical security probes
//! chainprobe --security
//!
//! # Run a single scenario
//! chainprobe --scenario security.pause-control
//!
//! # List available scenarios
//! chainprobe --list
//! ```

use anyhow::Context;
use chainprobe_chain::testing::SimulatedChain;
use chainprobe_harness::{
    scenarios, Harness, HarnessConfig, OutcomeStatus, Scenario, ScenarioRegistry, Verdict,
};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

/// Scenario harness for DeFi protocol deployments.
///
/// Probes a deployment through the wallet capability: security checks
/// gate the overall verdict, yield and token scenarios verify the
/// protocol's accounting round-trips cleanly.
#[derive(Parser, Debug)]
#[command(name = "chainprobe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run a single scenario by id
    #[arg(long)]
    scenario: Option<String>,

    /// Run only scenarios whose id contains this pattern
    #[arg(long)]
    filter: Option<String>,

    /// Run only the critical security probes
    #[arg(long)]
    security: bool,

    /// Per-scenario timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,

    /// List available scenarios without running them
    #[arg(long)]
    list: bool,

    /// Drive the simulation with no wallet session (every scenario errors)
    #[arg(long)]
    disconnected: bool,

    /// Emit outcomes as JSON instead of the terminal report
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    if cli.list {
        list_scenarios(&cli);
        return;
    }

    match rt.block_on(run(&cli)) {
        Ok(all_passed) => {
            if !all_passed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n{} {e:#}", "Error:".red().bold());
            std::process::exit(2);
        }
    }
}

/// Builds the scenario list the flags select.
fn selected_scenarios(cli: &Cli) -> Vec<Box<dyn Scenario>> {
    let mut all = if cli.security {
        scenarios::security_catalogue()
    } else {
        scenarios::catalogue()
    };
    if let Some(filter) = &cli.filter {
        all.retain(|s| s.id().contains(filter.as_str()));
    }
    all
}

fn list_scenarios(cli: &Cli) {
    let selected = selected_scenarios(cli);
    println!("{}\n", "Available scenarios:".bold());
    for scenario in &selected {
        let badge = if scenario.critical() {
            "critical".red().bold()
        } else {
            "standard".dimmed()
        };
        println!(
            "  {}  [{}]  {}",
            scenario.id().cyan(),
            badge,
            scenario.description().dimmed()
        );
    }
    println!(
        "\n  {}",
        format!(
            "Total: {} scenario{}",
            selected.len(),
            if selected.len() == 1 { "" } else { "s" }
        )
        .dimmed()
    );
}

async fn run(cli: &Cli) -> anyhow::Result<bool> {
    if !cli.quiet && !cli.json {
        println!(
            "\n{} {}",
            "chainprobe".bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
        );
        println!("{}", "━".repeat(40).dimmed());
    }

    let chain = if cli.disconnected {
        SimulatedChain::disconnected()
    } else {
        SimulatedChain::new()
    };

    let mut config = HarnessConfig::new();
    if let Some(secs) = cli.timeout {
        config = config.with_run_timeout(Duration::from_secs(secs));
    }

    let registry = ScenarioRegistry::new(selected_scenarios(cli))
        .context("scenario catalogue has duplicate ids")?;
    let harness = Harness::with_config(registry, Arc::new(chain), config);

    let ids: Vec<String> = match &cli.scenario {
        Some(id) => vec![id.clone()],
        None => harness
            .scenarios()
            .iter()
            .map(|s| s.id().to_string())
            .collect(),
    };

    for id in &ids {
        let outcome = harness
            .run_one(id)
            .await
            .with_context(|| format!("running scenario {id}"))?;
        if !cli.quiet && !cli.json {
            let badge = match outcome.status {
                OutcomeStatus::Passed => "PASS".green().bold(),
                OutcomeStatus::Failed => "FAIL".red().bold(),
                OutcomeStatus::Errored => "ERROR".yellow().bold(),
            };
            println!("  {badge:>5}  {}  {}", id.cyan(), outcome.detail.dimmed());
            for (key, value) in &outcome.metrics {
                println!("         {}", format!("{key}: {value}").dimmed());
            }
        }
    }

    let aggregate = harness.aggregate();
    let summary = aggregate.summary();
    let verdict = aggregate.critical_verdict();

    if cli.json {
        let outcomes: serde_json::Map<String, serde_json::Value> = ids
            .iter()
            .filter_map(|id| {
                harness
                    .outcome(id)
                    .and_then(|o| serde_json::to_value(o).ok())
                    .map(|v| (id.clone(), v))
            })
            .collect();
        let report = serde_json::json!({
            "outcomes": outcomes,
            "summary": summary,
            "progress": aggregate.progress(),
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let verdict_fmt = match verdict {
            Verdict::Secure => "secure".green().bold(),
            Verdict::Insecure => "insecure".red().bold(),
        };
        println!("{}", "━".repeat(40).dimmed());
        println!(
            "  {} passed, {} run, verdict: {}",
            summary.passed.to_string().bold(),
            summary.total,
            verdict_fmt
        );
    }

    // A single-scenario run is judged on its own outcome; the verdict
    // only gates full runs, where every critical probe had its chance.
    let all_passed = summary.passed == summary.total;
    Ok(if cli.scenario.is_some() {
        all_passed
    } else {
        all_passed && verdict == Verdict::Secure
    })
}
