use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sgp_tabu::model::Schedule;
use sgp_tabu::tabu::{SolverConfig, TabuSolver};

/// Tabu-search solver for the Social Golfer Problem.
#[derive(Parser, Debug)]
#[command(name = "sgp-tabu", version, about)]
struct Args {
    /// Number of groups per week
    #[arg(short, long, default_value_t = 8)]
    groups: usize,

    /// Players per group
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Number of weeks
    #[arg(short, long, default_value_t = 9)]
    weeks: usize,

    /// Outer iteration budget for the search
    #[arg(short = 'i', long, default_value_t = 10_000)]
    max_tries: usize,

    /// Iterations without improvement before a restart
    #[arg(short = 's', long, default_value_t = 300)]
    max_stable_tries: usize,

    /// Minimum tabu tenure (iterations)
    #[arg(long, default_value_t = 4)]
    min_tabu: u64,

    /// Maximum tabu tenure (iterations)
    #[arg(long, default_value_t = 100)]
    max_tabu: u64,

    /// Run the tabu search (otherwise only the initial state is reported)
    #[arg(long)]
    tabu: bool,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .verbosity(args.verbose as usize + 1)
        .init()?;

    println!(
        "Solving SGP({}, {}, {}) with {} players",
        args.groups,
        args.players,
        args.weeks,
        args.groups * args.players
    );

    let mut config = SolverConfig::default()
        .with_max_tries(args.max_tries)
        .with_max_stable_tries(args.max_stable_tries)
        .with_tabu_tenure(args.min_tabu, args.max_tabu);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;

    let mut schedule = Schedule::new(args.groups, args.players, args.weeks)?;

    if args.tabu {
        println!(
            "Tabu search: max tries {}, max stable tries {}, tenure [{}, {}]",
            config.max_tries, config.max_stable_tries, config.min_tabu, config.max_tabu
        );
        let mut solver = TabuSolver::new(&schedule, config)?;
        let result = solver.run(&mut schedule)?;
        println!(
            "Tabu search finished: objective {}, {} iteration(s), {} restart(s), {:?} ({:.3} s)",
            result.best_eval,
            result.iterations,
            result.restarts,
            result.termination,
            result.elapsed.as_secs_f64()
        );
    } else {
        // Without the search trigger, only report a random initial state.
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        schedule.init_random_solution(&mut rng);
    }

    println!();
    println!("{schedule}");
    Ok(())
}
