//! Parallel matrix multiplication driver.
//!
//! Reads two operands from a text file, multiplies them on a bounded worker
//! pool and prints the product.
//!
//! # Usage
//!
//! ```bash
//! # Multiply with one worker per CPU
//! pmatmul matrices.txt
//!
//! # Four workers, one work unit per output row, with progress logging
//! pmatmul --threads 4 --chunk row -v matrices.txt
//! ```
//!
//! The input file holds `m k n`, then the `m*k` values of A and the `k*n`
//! values of B, all whitespace separated and row-major.

mod output;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use pm_engine::{ChunkPolicy, EngineConfig, ParallelMultiplier, PoolConfig};
use tracing_subscriber::EnvFilter;

/// Multiply two dense matrices read from a file using a worker pool
#[derive(Parser, Debug)]
#[command(name = "pmatmul")]
#[command(version)]
struct Args {
    /// Input file: `m k n` followed by A (m*k values) and B (k*n values)
    path: PathBuf,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short, long, env = "PMATMUL_THREADS", default_value_t = 0)]
    threads: usize,

    /// Cells per work unit: auto, cell, row, or a positive count
    #[arg(long, env = "PMATMUL_CHUNK", default_value_t = ChunkPolicy::Auto)]
    chunk: ChunkPolicy,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            pool: PoolConfig {
                num_threads: self.threads,
                ..PoolConfig::default()
            },
            chunk: self.chunk,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&args, &mut out)?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let c = {
        let (a, b) = pm_loader::load_matrices(&args.path)
            .with_context(|| format!("failed to load matrices from {}", args.path.display()))?;
        tracing::info!(
            "Loaded A {}x{} and B {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        );

        let engine = ParallelMultiplier::new(args.engine_config())
            .context("failed to start worker pool")?;
        tracing::info!(
            "Multiplying on {} workers (chunk policy: {})",
            engine.num_threads(),
            engine.chunk_policy()
        );

        engine.multiply(&a, &b).context("multiplication failed")?
    };

    output::write_matrix(out, &c).context("failed to write result")?;
    tracing::info!("Wrote {}x{} result", c.rows(), c.cols());
    Ok(())
}
