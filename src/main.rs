use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use towerplan::application::io::{read_instance, read_towers, write_instance, write_solution};
use towerplan::{
    thin_cities, CoverageMode, ExactObjective, FormulationOptions, Instance, PlacementService,
    Solution, SolverBackend, SolverConfig, Strategy,
};

#[derive(Parser)]
#[command(author, version, about = "Place interference-aware towers over grid cities", long_about = None)]
struct Args {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve an instance and write the tower list
    Solve {
        /// Instance file, or - for stdin
        input: String,

        /// Output file, or - for stdout
        #[arg(default_value = "-")]
        output: String,

        #[arg(short, long, value_enum, default_value = "greedy")]
        strategy: StrategyArg,

        /// MILP backend for the exact strategy: auto, cbc or highs
        #[arg(short, long, default_value = "auto")]
        backend: SolverBackend,

        /// Exact objective: interference or tower-count
        #[arg(long, default_value = "interference")]
        objective: ExactObjective,

        /// Exact coverage rows: at-least-one or exactly-one
        #[arg(long, default_value = "at-least-one")]
        coverage: CoverageMode,

        /// Solver time limit in seconds
        #[arg(long)]
        time_limit: Option<f64>,

        /// Relative MIP gap at which the solver may stop
        #[arg(long)]
        gap: Option<f64>,
    },

    /// Validate a solution file against its instance and print the penalty
    Check {
        instance: String,
        solution: String,
    },

    /// Write a randomly thinned copy of an instance
    Thin {
        input: String,

        #[arg(default_value = "-")]
        output: String,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Naive,
    Greedy,
    Exact,
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(Path::new(path)).with_context(|| format!("failed to open {}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(Path::new(path)).with_context(|| format!("failed to create {}", path))?;
    Ok(Box::new(io::BufWriter::new(file)))
}

fn load_instance(path: &str) -> Result<Instance> {
    read_instance(open_input(path)?).with_context(|| format!("failed to read instance {}", path))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match args.command {
        Command::Solve {
            input,
            output,
            strategy,
            backend,
            objective,
            coverage,
            time_limit,
            gap,
        } => {
            let instance = load_instance(&input)?;

            let strategy = match strategy {
                StrategyArg::Naive => Strategy::Naive,
                StrategyArg::Greedy => Strategy::Greedy,
                StrategyArg::Exact => {
                    let mut config = SolverConfig::default()
                        .with_backend(backend)
                        .with_verbose(args.verbose);
                    if let Some(seconds) = time_limit {
                        config = config.with_time_limit(seconds);
                    }
                    if let Some(gap) = gap {
                        config = config.with_gap_tolerance(gap);
                    }
                    Strategy::Exact {
                        options: FormulationOptions::default()
                            .with_objective(objective)
                            .with_coverage(coverage),
                        config,
                    }
                }
            };

            let report = PlacementService::new().solve(&instance, &strategy)?;
            if report.status.is_some() && !report.is_proven_optimal() {
                warn!("exact solve stopped early; the placement is feasible but may not be optimal");
            }
            write_solution(&report.solution, Some(report.penalty), open_output(&output)?)
                .with_context(|| format!("failed to write solution to {}", output))?;
            info!(
                "wrote {} towers (penalty {:.3}) in {:.1} ms",
                report.solution.towers().len(),
                report.penalty,
                report.elapsed_ms
            );
        }

        Command::Check { instance, solution } => {
            let instance = load_instance(&instance)?;
            let towers = read_towers(open_input(&solution)?)
                .with_context(|| format!("failed to read solution {}", solution))?;

            match PlacementService::new().evaluate(Solution::new(&instance, towers)) {
                Ok(report) => println!(
                    "valid: {} towers, penalty {:.3}",
                    report.solution.towers().len(),
                    report.penalty
                ),
                Err(e) => bail!("invalid solution: {}", e),
            }
        }

        Command::Thin {
            input,
            output,
            seed,
        } => {
            let instance = load_instance(&input)?;
            let cities = thin_cities(&instance, &mut StdRng::seed_from_u64(seed));
            let thinned = instance.with_cities(cities)?;
            write_instance(&thinned, open_output(&output)?)
                .with_context(|| format!("failed to write instance to {}", output))?;
        }
    }

    Ok(())
}
