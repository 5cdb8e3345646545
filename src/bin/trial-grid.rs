use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trial_grid::aggregate::GroupField;
use trial_grid::dispatch::FailurePolicy;
use trial_grid::engine::SurrogateEngine;
use trial_grid::grid::{AxisConstraint, GridAxes, SeedPolicy};
use trial_grid::harness::{self, HarnessBuilder, HarnessError};
use trial_grid::store::ResultStore;
use trial_grid::trial::{AgentLabel, MAX_SCORE};

#[derive(Parser, Debug)]
#[command(
    name = "trial-grid",
    about = "Run grid searches of simulated games and report on the results",
    long_about = "Sweeps the cross product of agent configurations, plays every combination\n\
                  on a pool of workers and appends one row per finished game to a result store.\n\
                  The report subcommand groups the stored rows and prints win rate, mean score\n\
                  and count per group."
)]
struct Args {
    #[command(flatten)]
    tracing: TracingArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a grid of trials and append the results to the store
    Run(RunArgs),
    /// Aggregate the rows in a store
    Report(ReportArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Result store file, created if missing
    store: PathBuf,

    /// Maximum number of games played at once
    #[arg(short = 'w', long = "workers", default_value_t = 6)]
    workers: usize,

    /// Number of times the whole grid is repeated
    #[arg(short = 'r', long = "repeats")]
    repeats: Option<usize>,

    /// Search budgets, 0 adds the random baseline
    #[arg(short = 'b', long = "budgets", value_delimiter = ',')]
    budgets: Vec<u64>,

    /// Player counts
    #[arg(short = 'p', long = "players", value_delimiter = ',')]
    players: Vec<usize>,

    /// Tree policy variants, unspecified if empty
    #[arg(long = "policies", value_delimiter = ',')]
    policies: Vec<u8>,

    /// Deterministic sample counts, unspecified if empty
    #[arg(long = "samples", value_delimiter = ',')]
    samples: Vec<u64>,

    /// Only keep searches where budget times samples equals this
    #[arg(long = "product-target")]
    product_target: Option<u64>,

    /// Seed every repeat group from this base seed
    #[arg(short = 's', long = "seed", conflicts_with = "random_seeds")]
    seed: Option<u64>,

    /// Play every trial of every repeat on this one seed
    #[arg(long = "fixed-seed", conflicts_with_all = ["seed", "random_seeds"])]
    fixed_seed: Option<u64>,

    /// Draw a fresh seed for each repeat group
    #[arg(long = "random-seeds")]
    random_seeds: bool,

    /// Stop starting new games after the first failure
    #[arg(long = "fail-fast")]
    fail_fast: bool,

    /// Let search agents use heuristics
    #[arg(long = "heuristics")]
    heuristics: bool,

    /// Read the grid axes from a JSON file instead of the axis flags
    #[arg(short = 'g', long = "grid")]
    grid: Option<PathBuf>,

    /// Print the trials that would be played and exit
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(clap::Args, Debug)]
struct ReportArgs {
    /// Result store file
    store: PathBuf,

    /// Fields to group by: agent, player_count, tree_policy, deterministic_samples
    #[arg(
        short = 'g',
        long = "group-by",
        value_delimiter = ',',
        default_values_t = [GroupField::Agent, GroupField::PlayerCount],
        value_parser = parse_group_field
    )]
    group_by: Vec<GroupField>,

    /// Score that counts as a win
    #[arg(long = "win-score", default_value_t = MAX_SCORE)]
    win_score: u8,

    /// Print JSON instead of a Markdown table
    #[arg(long = "json")]
    json: bool,
}

fn parse_group_field(s: &str) -> Result<GroupField, String> {
    s.parse()
}

/// CLI arguments for controlling tracing output.
#[derive(clap::Args, Debug, Clone)]
struct TracingArgs {
    /// Increase logging verbosity (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Suppress all output except warnings and errors
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,
}

impl TracingArgs {
    /// `RUST_LOG` wins if it is set, otherwise the level comes from the
    /// flags: `-q` warn, default info, `-v` debug, `-vv` trace.
    fn init_tracing(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            let level = if self.quiet {
                "warn"
            } else {
                match self.verbosity {
                    0 => "info",
                    1 => "debug",
                    _ => "trace",
                }
            };
            EnvFilter::new(format!("{level},trial_grid={level}"))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

impl RunArgs {
    fn axes(&self) -> Result<GridAxes, HarnessError> {
        let mut axes = match &self.grid {
            Some(path) => GridAxes::from_file(path)?,
            None => {
                let mut axes = GridAxes::new()
                    .search_budgets(self.budgets.iter().copied())
                    .player_counts(self.players.iter().copied())
                    .policy_variants(self.policies.iter().copied())
                    .deterministic_samples(self.samples.iter().copied());
                if let Some(target) = self.product_target {
                    axes = axes.constraint(AxisConstraint::ProductEquals { target });
                }
                axes
            }
        };
        if let Some(repeats) = self.repeats {
            axes = axes.repeats(repeats);
        }
        Ok(axes)
    }

    fn seed_policy(&self) -> SeedPolicy {
        match (self.fixed_seed, self.seed, self.random_seeds) {
            (Some(seed), _, _) => SeedPolicy::Fixed { seed },
            (None, Some(base), _) => SeedPolicy::PerRepeat { base },
            (None, None, true) => SeedPolicy::RandomPerRepeat,
            (None, None, false) => SeedPolicy::Unseeded,
        }
    }

    fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        }
    }
}

fn run(args: RunArgs) -> Result<bool, HarnessError> {
    let harness = HarnessBuilder::new()
        .store_path(&args.store)
        .axes(args.axes()?)
        .seed_policy(args.seed_policy())
        .workers(args.workers)
        .failure_policy(args.failure_policy())
        .use_heuristics(args.heuristics)
        .build(SurrogateEngine::new())?;

    if args.dry_run {
        let trials = harness.plan()?;
        for spec in &trials {
            println!(
                "{} players={} policy={} samples={} seed={}",
                AgentLabel::display(&spec.agent_label),
                spec.player_count,
                display_optional(spec.policy_variant),
                display_optional(spec.deterministic_samples),
                display_optional(spec.seed),
            );
        }
        println!("{} trials", trials.len());
        return Ok(true);
    }

    let summary = harness.run()?;
    println!("{}", summary);
    Ok(summary.is_success())
}

fn report(args: ReportArgs) -> Result<(), HarnessError> {
    let store = ResultStore::open(&args.store);
    let table = harness::report(&store, &args.group_by, args.win_score)?;

    if args.json {
        println!("{}", table.to_json()?);
    } else if table.is_empty() {
        println!("No results in {}", args.store.display());
    } else {
        print!("{}", table.to_markdown());
    }
    Ok(())
}

fn display_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.tracing.init_tracing();

    let result = match args.command {
        Command::Run(run_args) => run(run_args),
        Command::Report(report_args) => report(report_args).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        // Some trials failed or were cancelled; their rows are not stored
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "trial-grid failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
