//! slotpool command-line driver
//!
//! Exercises the slot pool through its public API:
//! - `demo` walks through allocation, writes, reuse, error cases and growth
//! - `stress` fills a small pool, then frees every other slot
//! - `stats` prints occupancy after a number of allocations
//! - `config` prints the effective configuration
//!
//! # Examples
//!
//! ```bash
//! slotpool demo
//! slotpool stress --initial 2 --count 10
//! slotpool --json stats --allocate 100
//! SLOTPOOL_MAX_CAPACITY=64 slotpool config
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use slotpool::{PoolConfig, SlotAllocator, SlotIndex};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// slotpool - fixed-slot block pool
#[derive(Parser, Debug)]
#[command(name = "slotpool")]
#[command(version = slotpool::VERSION)]
#[command(about = "Fixed-slot block pool driver", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Pool configuration file (TOML)
    #[arg(long, global = true, env = "SLOTPOOL_CONFIG")]
    config: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true, env = "SLOTPOOL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print statistics as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk through the basic pool operations
    ///
    /// Always runs on a fixed pool of 3 unlimited slots and prints text:
    /// `--config` and `--json` have no effect here.
    Demo,

    /// Fill a pool, then free every other slot
    Stress(StressArgs),

    /// Show pool statistics after a number of allocations
    Stats(StatsArgs),

    /// Print the effective configuration as TOML
    Config,

    /// Show version
    Version,
}

/// Stress run arguments
#[derive(Args, Debug)]
struct StressArgs {
    /// Initial capacity (defaults to the configured one)
    #[arg(short, long)]
    initial: Option<usize>,

    /// Number of values to allocate
    #[arg(short, long, default_value = "10")]
    count: usize,
}

/// Statistics arguments
#[derive(Args, Debug)]
struct StatsArgs {
    /// Initial capacity (defaults to the configured one)
    #[arg(short, long)]
    initial: Option<usize>,

    /// Number of values to allocate
    #[arg(short, long, default_value = "0")]
    allocate: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    let config = PoolConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Demo => demo_command(),
        Commands::Stress(args) => {
            stress_command(&config, args, cli.json, &mut io::stdout().lock())
        }
        Commands::Stats(args) => stats_command(&config, args, cli.json, &mut io::stdout().lock()),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::Version => {
            println!("slotpool {}", slotpool::VERSION);
            Ok(())
        }
    }
}

/// Setup logging to stderr and, optionally, a rolling file
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    let file_layer = match &cli.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "slotpool.log");
            Some(fmt::layer().with_writer(appender).with_ansi(false))
        }
        None => None,
    };

    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::WARN);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color),
        )
        .with(file_layer)
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    Ok(())
}

/// Print the outcome of a fallible pool operation
fn report<T: std::fmt::Debug>(label: &str, result: slotpool::Result<T>) {
    match result {
        Ok(value) => println!("  {}: ok {:?}", label, value),
        Err(e) => println!("  {}: error: {}", label, e),
    }
}

/// Demo command - basic operations, reuse, errors and growth on one pool
fn demo_command() -> anyhow::Result<()> {
    info!("Running demo");

    println!("=== Basic allocation and reading ===");
    let mut pool: SlotAllocator<i32> = SlotAllocator::new(3);
    let first = pool.allocate(42)?;
    let second = pool.allocate(73)?;
    println!("  allocated 42 at {}, 73 at {}", first, second);
    println!("  value at {}: {} (expected 42)", first, pool.read(first)?);
    println!("  value at {}: {} (expected 73)", second, pool.read(second)?);

    println!("\n=== Writing ===");
    pool.write(first, 100)?;
    println!("  value after write: {} (expected 100)", pool.read(first)?);

    println!("\n=== Freeing and reusing ===");
    println!("  free slots before: {}", pool.count_free());
    pool.free(first)?;
    println!("  free slots after freeing {}: {}", first, pool.count_free());
    let reused = pool.allocate(999)?;
    println!(
        "  allocated 999 at {} (expected {}), value {}",
        reused,
        first,
        pool.read(reused)?
    );

    println!("\n=== Error cases ===");
    report("free reused slot", pool.free(reused));
    report("free it again", pool.free(reused));
    report("read freed slot", pool.read(reused));
    report("write slot 99", pool.write(SlotIndex::new(99), 42));
    report("free slot 99", pool.free(SlotIndex::new(99)));
    report("shrink to 2", pool.resize(2));

    println!("\n=== Automatic growth ===");
    println!("  initial size: {}", pool.size());
    for value in 0..5 {
        let index = pool.allocate(value)?;
        println!("  allocated {} at {}", value, index);
    }
    println!("  size after growth: {}", pool.size());

    println!("\n=== Manual resize ===");
    pool.resize(20)?;
    println!("  size after resize: {}", pool.size());
    println!(
        "  value at {}: {} (expected 73)",
        second,
        pool.read(second)?
    );
    println!("  {}", pool.stats());

    Ok(())
}

/// Pool for `stress`/`stats`, with `--initial` overriding the configured capacity
fn build_pool(config: &PoolConfig, initial: Option<usize>) -> anyhow::Result<SlotAllocator<i64>> {
    let config = PoolConfig {
        initial_capacity: initial.unwrap_or(config.initial_capacity),
        ..config.clone()
    };
    let pool = SlotAllocator::with_config(&config)
        .with_context(|| format!("Failed to create pool of {} slots", config.initial_capacity))?;
    Ok(pool)
}

/// Stress command - fill, then free every other allocated slot
fn stress_command(
    config: &PoolConfig,
    args: StressArgs,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut pool = build_pool(config, args.initial)?;
    info!(initial = pool.size(), count = args.count, "Running stress test");

    let mut indices = Vec::with_capacity(args.count);
    for value in 0..args.count {
        let index = pool
            .allocate(value as i64)
            .with_context(|| format!("Allocation {} failed", value))?;
        if !json {
            writeln!(out, "allocated {} at {}", value, index)?;
        }
        indices.push(index);
    }

    for index in indices.iter().step_by(2) {
        pool.free(*index)?;
        if !json {
            writeln!(out, "freed {}", index)?;
        }
    }

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&pool.stats())?)?;
    } else {
        writeln!(out, "free slots after stress test: {}", pool.count_free())?;
        writeln!(out, "{}", pool.stats())?;
    }
    Ok(())
}

/// Stats command - occupancy after `allocate` sequential allocations
fn stats_command(
    config: &PoolConfig,
    args: StatsArgs,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut pool = build_pool(config, args.initial)?;
    for value in 0..args.allocate {
        pool.allocate(value as i64)
            .with_context(|| format!("Allocation {} failed", value))?;
    }

    let stats = pool.stats();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    } else {
        writeln!(out, "Pool statistics")?;
        writeln!(out, "───────────────────────────────")?;
        writeln!(out, "  capacity:     {}", stats.capacity)?;
        writeln!(out, "  used:         {}", stats.used)?;
        writeln!(out, "  free:         {}", stats.free)?;
        writeln!(out, "  free cursor:  {}", stats.free_cursor)?;
        match stats.max_capacity {
            Some(limit) => writeln!(out, "  limit:        {}", limit)?,
            None => writeln!(out, "  limit:        none")?,
        }
        writeln!(out, "  utilization:  {:.1}%", stats.utilization() * 100.0)?;
    }
    Ok(())
}
