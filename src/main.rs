//! kmeans-em command line front end.
//!
//! - `cluster`: cluster a comma separated point table and write the error metric plus one cluster name per row
//! - `generate`: write a table of uniformly distributed random points

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use kmeans_em::{datagen, table, AbortStrategy, EmptyClusterPolicy, KMeans, KMeansConfig, NameMap};
use rand::prelude::*;
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kmeans-em")]
#[command(version)]
#[command(about = "Expectation-Maximization k-means clustering of delimited point tables")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the points of a table and write the labeled result
    Cluster(ClusterArgs),
    /// Generate a table of uniformly distributed random points
    Generate(GenerateArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Convergence {
    /// Error metric bit-identical to the previous iteration
    Exact,
    /// Error metric changed by less than --tolerance
    Tolerance,
    /// No point changed its cluster
    Partition,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmptyClusters {
    Keep,
    Reseed,
    Fail,
}

#[derive(Clone, Copy, ValueEnum)]
enum Init {
    /// Every coordinate uniformly from [--range-min, --range-max)
    Range,
    /// k distinct points of the table
    Sample,
}

#[derive(Args)]
struct ClusterArgs {
    /// Number of clusters
    #[arg(short, long)]
    k: usize,
    /// Cluster names, comma separated, one per cluster in index order
    #[arg(short, long, value_delimiter = ',', required = true)]
    names: Vec<String>,
    /// Comma separated input table, one point per line, no header
    #[arg(short, long)]
    input: PathBuf,
    /// Result file
    #[arg(short, long)]
    output: PathBuf,
    /// Maximum number of EM iterations
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,
    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Lower bound of the centroid seeding range
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    range_min: f64,
    /// Upper bound (exclusive) of the centroid seeding range
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    range_max: f64,
    /// Centroid initialization method
    #[arg(long, value_enum, default_value_t = Init::Range)]
    init: Init,
    /// Convergence criterion
    #[arg(long, value_enum, default_value_t = Convergence::Partition)]
    convergence: Convergence,
    /// Threshold for --convergence tolerance
    #[arg(long, default_value_t = 0.0005)]
    tolerance: f64,
    /// What to do with clusters that lose all of their points
    #[arg(long, value_enum, default_value_t = EmptyClusters::Keep)]
    empty_clusters: EmptyClusters,
}

#[derive(Args)]
struct GenerateArgs {
    /// Dimensions per point (random within 2..=5 if omitted)
    #[arg(short, long)]
    dims: Option<usize>,
    /// Number of points (random within 10000..=100000 if omitted)
    #[arg(short, long)]
    rows: Option<usize>,
    /// Lower coordinate bound
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    min: f64,
    /// Upper coordinate bound (exclusive)
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    max: f64,
    /// Output table
    #[arg(short, long, default_value = "data.csv")]
    output: PathBuf,
    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run_cluster(args: ClusterArgs) -> Result<()> {
    // Configuration problems abort before the input is touched
    let names = NameMap::new(args.k, args.names).context("invalid cluster names")?;
    let abort_strategy = match args.convergence {
        Convergence::Exact => AbortStrategy::ExactError,
        Convergence::Tolerance => AbortStrategy::NoImprovement { threshold: args.tolerance },
        Convergence::Partition => AbortStrategy::StablePartition,
    };
    let empty_cluster_policy = match args.empty_clusters {
        EmptyClusters::Keep => EmptyClusterPolicy::KeepCentroid,
        EmptyClusters::Reseed => EmptyClusterPolicy::Reseed,
        EmptyClusters::Fail => EmptyClusterPolicy::Fail,
    };

    let kmean: KMeans<f64> = table::read_samples(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(samples = kmean.sample_cnt(), dims = kmean.sample_dims(), "loaded {}", args.input.display());

    let conf = KMeansConfig::build()
        .random_generator(rng_from_seed(args.seed))
        .abort_strategy(abort_strategy)
        .init_range(args.range_min, args.range_max)
        .empty_cluster_policy(empty_cluster_policy)
        .build();
    let state = match args.init {
        Init::Range => kmean.kmeans_em(args.k, args.max_iter, KMeans::init_random_range, &conf),
        Init::Sample => kmean.kmeans_em(args.k, args.max_iter, KMeans::init_random_sample, &conf),
    }.context("clustering failed")?;
    info!(iterations = state.iterations, distsum = state.distsum, "clustering finished");

    table::write_results(&args.output, &state, &names)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut rnd = rng_from_seed(args.seed);
    let dims = args.dims.unwrap_or_else(|| rnd.gen_range(2..=5));
    let rows = args.rows.unwrap_or_else(|| rnd.gen_range(10_000..=100_000));

    let samples = datagen::generate_samples(rows, dims, args.min, args.max, &mut rnd)
        .context("invalid generator parameters")?;
    datagen::write_samples_to_path(&args.output, &samples, dims)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(rows, dims, "generated {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Cluster(args) => run_cluster(args),
        Commands::Generate(args) => run_generate(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
