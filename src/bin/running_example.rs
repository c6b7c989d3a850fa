use std::env;
use std::process;

use log::{error, info};
use mdp_planner::model::GridCoord;
use mdp_planner::{
    render_policy_grid, GridWorld, MdpSolver, PolicyIteration, Problem, Result, SolverConfig,
    ValueIteration,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: running_example [-ex | -f | -r] [-iv | -ip] [<n>] [-p]\n  \
    -ex  4 x 3 running example (default)\n  \
    -f   n x n grid, goal in the north-east corner, start in the south-west corner\n  \
    -r   n x n grid, goal and start drawn with seed n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dataset {
    RunningExample,
    FixedGoal(i32),
    RandomGoal(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Value,
    Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Options {
    dataset: Dataset,
    algorithm: Algorithm,
    print_grid: bool,
}

fn parse_args(args: &[String]) -> std::result::Result<Options, String> {
    let mut args = args.iter().map(String::as_str).peekable();

    let mode = match args.peek() {
        Some(&m @ ("-ex" | "-f" | "-r")) => {
            args.next();
            m
        }
        _ => "-ex",
    };

    // -iv: value iteration, -ip: policy iteration
    let algorithm = match args.next() {
        None | Some("-iv") => Algorithm::Value,
        Some("-ip") => Algorithm::Policy,
        Some(other) => {
            return Err(format!(
                "parameter '{}' not recognized, choose between '-iv' or '-ip'",
                other
            ))
        }
    };

    let dataset = match mode {
        "-ex" => Dataset::RunningExample,
        _ => {
            let n = match args.next() {
                Some(n) => n
                    .parse::<i32>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| format!("'{}' is not a positive grid size", n))?,
                None => return Err(format!("mode '{}' needs a grid size", mode)),
            };
            if mode == "-f" {
                Dataset::FixedGoal(n)
            } else {
                Dataset::RandomGoal(n)
            }
        }
    };

    let print_grid = match args.next() {
        None => false,
        Some("-p") => true,
        Some(other) => return Err(format!("parameter '{}' not recognized", other)),
    };
    if let Some(extra) = args.next() {
        return Err(format!("parameter '{}' not recognized", extra));
    }

    Ok(Options {
        dataset,
        algorithm,
        print_grid,
    })
}

fn load(dataset: Dataset) -> Result<Problem> {
    match dataset {
        Dataset::RunningExample => GridWorld::default().with_slip(0.1).build(),
        Dataset::FixedGoal(n) => GridWorld::new(n, n, GridCoord::new(n, n))
            .with_initial(GridCoord::new(1, 1))
            .build(),
        Dataset::RandomGoal(n) => {
            let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
            GridWorld::with_random_goal(n, n, &mut rng)?.build()
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            error!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let config = SolverConfig::default();
    let solver: Box<dyn MdpSolver> = match options.algorithm {
        Algorithm::Value => Box::new(ValueIteration::new(config)),
        Algorithm::Policy => Box::new(PolicyIteration::new(config)),
    };

    let mut problem = match load(options.dataset) {
        Ok(problem) => problem,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    info!("{:?}: {} states", options.dataset, problem.len());

    match solver.solve(&mut problem) {
        Ok(report) => {
            info!(
                "{} time: {}ms, iterations: {}",
                report.algorithm,
                report.elapsed.as_millis(),
                report.iterations
            );
            if let Some(initial) = problem.initial() {
                let state = problem.state(initial);
                info!(
                    "expected cost from {}: {:.4}",
                    state.label(),
                    state.latest_value().unwrap_or_default()
                );
            }
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }

    if options.print_grid {
        print!("{}", render_policy_grid(&problem));
    }
}
