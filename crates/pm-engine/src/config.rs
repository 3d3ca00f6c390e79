use std::fmt;
use std::str::FromStr;

use crate::error::ParseChunkPolicyError;

/// Configuration for [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads. `0` means one per available CPU.
    pub num_threads: usize,
    /// Prefix for worker thread names (e.g. `"pm-worker"`).
    pub name_prefix: String,
}

impl PoolConfig {
    /// Thread count with the `0 = hardware parallelism` default resolved.
    pub fn resolved_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.num_threads
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: 0,
            name_prefix: "pm-worker".to_string(),
        }
    }
}

/// How the output index space is grouped into work units.
///
/// Every policy yields contiguous row-major runs of cells, so the result is
/// identical whichever one is chosen. Only scheduling granularity changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkPolicy {
    /// About four units per worker, sized from the output.
    #[default]
    Auto,
    /// One unit per output cell.
    Cell,
    /// One unit per output row.
    Row,
    /// A fixed number of cells per unit. `0` is treated as `1`.
    Fixed(usize),
}

/// Units handed to each worker under [`ChunkPolicy::Auto`].
const AUTO_UNITS_PER_WORKER: usize = 4;

impl ChunkPolicy {
    /// Number of contiguous cells per unit for an output of `cells` cells
    /// with `cols` columns, dispatched over `workers` threads.
    ///
    /// Always at least 1.
    pub fn chunk_len(&self, cells: usize, cols: usize, workers: usize) -> usize {
        let len = match *self {
            ChunkPolicy::Auto => cells.div_ceil(workers.max(1) * AUTO_UNITS_PER_WORKER),
            ChunkPolicy::Cell => 1,
            ChunkPolicy::Row => cols,
            ChunkPolicy::Fixed(n) => n,
        };
        len.max(1)
    }
}

impl FromStr for ChunkPolicy {
    type Err = ParseChunkPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ChunkPolicy::Auto),
            "cell" => Ok(ChunkPolicy::Cell),
            "row" => Ok(ChunkPolicy::Row),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Ok(ChunkPolicy::Fixed(n)),
                _ => Err(ParseChunkPolicyError(s.to_string())),
            },
        }
    }
}

impl fmt::Display for ChunkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPolicy::Auto => write!(f, "auto"),
            ChunkPolicy::Cell => write!(f, "cell"),
            ChunkPolicy::Row => write!(f, "row"),
            ChunkPolicy::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// Full configuration for a [`ParallelMultiplier`](crate::ParallelMultiplier).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub pool: PoolConfig,
    pub chunk: ChunkPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk_policy() {
        assert_eq!("auto".parse::<ChunkPolicy>().unwrap(), ChunkPolicy::Auto);
        assert_eq!("Cell".parse::<ChunkPolicy>().unwrap(), ChunkPolicy::Cell);
        assert_eq!(" row ".parse::<ChunkPolicy>().unwrap(), ChunkPolicy::Row);
        assert_eq!("64".parse::<ChunkPolicy>().unwrap(), ChunkPolicy::Fixed(64));
        assert!("0".parse::<ChunkPolicy>().is_err());
        assert!("-3".parse::<ChunkPolicy>().is_err());
        assert!("tiles".parse::<ChunkPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [
            ChunkPolicy::Auto,
            ChunkPolicy::Cell,
            ChunkPolicy::Row,
            ChunkPolicy::Fixed(7),
        ] {
            assert_eq!(policy.to_string().parse::<ChunkPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_chunk_len() {
        assert_eq!(ChunkPolicy::Cell.chunk_len(100, 10, 4), 1);
        assert_eq!(ChunkPolicy::Row.chunk_len(100, 10, 4), 10);
        assert_eq!(ChunkPolicy::Fixed(0).chunk_len(100, 10, 4), 1);
        assert_eq!(ChunkPolicy::Fixed(30).chunk_len(100, 10, 4), 30);
        // 100 cells over 4 workers * 4 units -> ceil(100 / 16) = 7
        assert_eq!(ChunkPolicy::Auto.chunk_len(100, 10, 4), 7);
        assert_eq!(ChunkPolicy::Auto.chunk_len(1, 1, 8), 1);
        assert_eq!(ChunkPolicy::Auto.chunk_len(10, 10, 0), 3);
    }

    #[test]
    fn test_pool_config_default_threads() {
        let config = PoolConfig::default();
        assert!(config.resolved_threads() >= 1);
        let fixed = PoolConfig {
            num_threads: 3,
            ..PoolConfig::default()
        };
        assert_eq!(fixed.resolved_threads(), 3);
    }
}
