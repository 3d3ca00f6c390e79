//! `pm-engine` - Parallel matrix multiplication on a bounded worker pool.
//!
//! The output index space is split into contiguous [`WorkUnit`]s, each one
//! owning a disjoint slice of the result buffer. Units are dispatched onto a
//! [`WorkerPool`] and joined at a scope barrier before the result is handed
//! back, so no lock ever guards the output.

pub mod cancel;
pub mod config;
pub mod error;
pub mod multiplier;
pub mod partition;
pub mod pool;
pub mod work_unit;

pub use cancel::CancellationToken;
pub use config::{ChunkPolicy, EngineConfig, PoolConfig};
pub use error::{EngineError, ParseChunkPolicyError, Result};
pub use multiplier::ParallelMultiplier;
pub use pool::WorkerPool;
pub use work_unit::{Cell, WorkUnit};
