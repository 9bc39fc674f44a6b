//! Command-line driver.
//!
//! Runs every ordering heuristic on an instance file, writes the winning
//! schedule next to the input, and reports the best makespan.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greedy_schedule::dispatching::Strategy;
use greedy_schedule::generator::InstanceGenerator;
use greedy_schedule::io::{self, InstanceFormat};
use greedy_schedule::scheduler::{HeuristicSelector, ScheduleKpi, SchedulerConfig};

#[derive(Parser)]
#[command(name = "greedy-schedule")]
#[command(about = "Greedy list scheduling with exclusive global resources")]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule an instance and write the best schedule
    Run {
        /// Instance file
        input: PathBuf,
        /// Instance format (guessed from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Output file (default: res-<input name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Strategies to compare, in tie-break order (default: all)
        #[arg(short, long = "strategy")]
        strategies: Vec<String>,
        /// Abort a run once the clock passes this time
        #[arg(long)]
        horizon: Option<u64>,
        /// Evaluate strategies in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Write a random instance in the fact format
    Generate {
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 20)]
        tasks: usize,
        #[arg(long, default_value_t = 3)]
        machines: usize,
        #[arg(long, default_value_t = 2)]
        resources: usize,
        #[arg(long, default_value_t = 10)]
        max_duration: u64,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Fact,
    Json,
}

impl From<FormatArg> for InstanceFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Fact => InstanceFormat::Fact,
            FormatArg::Json => InstanceFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run {
            input,
            format,
            output,
            strategies,
            horizon,
            parallel,
        } => run(input, format, output, strategies, horizon, parallel),
        Commands::Generate {
            seed,
            tasks,
            machines,
            resources,
            max_duration,
            output,
        } => {
            let spec = InstanceGenerator::new()
                .with_tasks(tasks)
                .with_machines(machines)
                .with_resources(resources)
                .with_max_duration(max_duration)
                .generate_spec(seed);
            let text = io::format_facts(&spec);
            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{text}"),
            }
            Ok(())
        }
    }
}

fn run(
    input: PathBuf,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
    strategies: Vec<String>,
    horizon: Option<u64>,
    parallel: bool,
) -> Result<()> {
    let strategies = strategies
        .iter()
        .map(|s| s.parse::<Strategy>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = SchedulerConfig::new()
        .with_parallel(parallel)
        .with_strategies(strategies);
    if let Some(h) = horizon {
        config = config.with_horizon(h);
    }

    let format = format
        .map(InstanceFormat::from)
        .unwrap_or_else(|| InstanceFormat::from_path(&input));
    let instance = io::read_instance(&input, format)
        .with_context(|| format!("reading {}", input.display()))?
        .build()?;
    info!(
        tasks = instance.task_count(),
        machines = instance.machines().len(),
        resources = instance.resources().len(),
        "instance loaded"
    );

    let selection = HeuristicSelector::from_config(&config).select(&instance)?;
    for e in &selection.evaluations {
        info!(strategy = %e.strategy, makespan = e.makespan, "evaluation");
    }
    let kpi = ScheduleKpi::calculate(&instance, &selection.best);
    info!(
        utilization = kpi.avg_machine_utilization,
        idle = kpi.total_idle_time,
        "best schedule"
    );

    let output = output.unwrap_or_else(|| io::default_output_path(&input));
    let file =
        File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    io::write_schedule(BufWriter::new(file), &selection.best)?;

    println!("Best makespan: {}", selection.makespan());
    Ok(())
}
