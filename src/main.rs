use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use landgrab::{AgentCommand, Engine, Settings};

#[derive(Debug, Parser)]
#[command(author, version, about = "landgrab territory simulation runner")]
struct Cli {
    /// Path to the scenario YAML file (built-in defaults when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override tick count
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final observation as JSON to this path
    #[arg(long)]
    dump_state: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = match &cli.scenario {
        Some(path) => Settings::from_yaml(path)
            .with_context(|| format!("loading scenario from {}", path.display()))?,
        None => Settings::small_world(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    let ticks = cli.ticks.unwrap_or(settings.ticks);
    let name = settings.name.clone();

    let mut engine = Engine::new(settings)?;
    let agent_count = engine.agents().len();

    let mut accumulated = vec![0.0f64; agent_count];
    for _ in 0..ticks {
        let commands: Vec<AgentCommand> = (0..agent_count)
            .map(|_| engine.random_command())
            .collect();
        let summary = engine.step(&commands);
        for (total, reward) in accumulated.iter_mut().zip(&summary.rewards) {
            *total += reward;
        }
    }

    if let Some(path) = &cli.dump_state {
        let observation = engine.observation();
        let json = serde_json::to_string_pretty(&observation)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing state to {}", path.display()))?;
    }

    println!(
        "Scenario '{}' completed after {} ticks. Agent money: {:?}",
        name,
        ticks,
        engine
            .agents()
            .iter()
            .map(|a| a.money.round())
            .collect::<Vec<_>>()
    );
    for (id, total) in accumulated.iter().enumerate() {
        println!("  agent {id}: accumulated reward {total:.1}");
    }
    Ok(())
}
