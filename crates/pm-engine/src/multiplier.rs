use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use pm_matrix::{Matrix, MatrixError, MultiplyBackend};

use crate::cancel::CancellationToken;
use crate::config::{ChunkPolicy, EngineConfig, PoolConfig};
use crate::error::{EngineError, Result};
use crate::partition::partition;
use crate::pool::WorkerPool;
use crate::work_unit::WorkUnit;

/// Multiplies matrices by spreading output cells over a bounded worker pool.
///
/// Each call allocates the result, partitions it into disjoint work units
/// according to the chunk policy, runs the units on the pool and waits for
/// all of them before returning. The result is bit-identical to
/// [`pm_matrix::ReferenceBackend`] for every pool size and chunk policy.
#[derive(Debug)]
pub struct ParallelMultiplier {
    pool: WorkerPool,
    chunk: ChunkPolicy,
}

impl ParallelMultiplier {
    /// Create a multiplier, starting its worker pool.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let pool = WorkerPool::new(config.pool)?;
        Ok(Self {
            pool,
            chunk: config.chunk,
        })
    }

    /// Create a multiplier with `num_threads` workers and the default chunk
    /// policy. `0` means one worker per available CPU.
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::new(EngineConfig {
            pool: PoolConfig {
                num_threads,
                ..PoolConfig::default()
            },
            chunk: ChunkPolicy::default(),
        })
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }

    /// The chunk policy used to partition the output.
    pub fn chunk_policy(&self) -> ChunkPolicy {
        self.chunk
    }

    /// Compute `a @ b`.
    ///
    /// # Errors
    /// - `Matrix(DimensionMismatch)` if `a.cols() != b.rows()`; nothing is
    ///   computed in that case.
    /// - `Matrix(Allocation)` / `UnitAllocation` if the result or the unit
    ///   list cannot be allocated.
    /// - `WorkerPanicked` if a unit panicked. All other units are joined
    ///   first and the partial result is dropped.
    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        self.run(a, b, None)
    }

    /// Compute `a @ b`, giving up once `token` is cancelled.
    ///
    /// Units that have not started when cancellation is observed are skipped;
    /// units already computing finish. If any unit was skipped the call
    /// returns `Cancelled` and the partial result is dropped.
    pub fn multiply_with_cancel(
        &self,
        a: &Matrix,
        b: &Matrix,
        token: &CancellationToken,
    ) -> Result<Matrix> {
        self.run(a, b, Some(token))
    }

    fn run(&self, a: &Matrix, b: &Matrix, token: Option<&CancellationToken>) -> Result<Matrix> {
        a.check_matmul(b)?;

        let mut c = Matrix::zeros(a.rows(), b.cols())?;
        let chunk_len = self
            .chunk
            .chunk_len(c.len(), c.cols(), self.pool.num_threads());

        let units = partition(a, b, c.as_mut_slice(), chunk_len)?;
        tracing::debug!(
            m = a.rows(),
            k = a.cols(),
            n = b.cols(),
            units = units.len(),
            chunk_len,
            policy = %self.chunk,
            workers = self.pool.num_threads(),
            "dispatching work units"
        );
        self.dispatch(units, token, WorkUnit::execute)?;

        Ok(c)
    }

    /// Run `f` on every unit inside the pool and wait for all of them.
    ///
    /// The rayon scope is the barrier: it returns only after every spawned
    /// unit finished, including when one of them panicked.
    fn dispatch<'a, F>(
        &self,
        units: Vec<WorkUnit<'a>>,
        token: Option<&CancellationToken>,
        f: F,
    ) -> Result<()>
    where
        F: Fn(WorkUnit<'a>) + Sync,
    {
        let total = units.len();
        let skipped = AtomicUsize::new(0);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                rayon::scope(|s| {
                    for unit in units {
                        let f = &f;
                        let skipped = &skipped;
                        s.spawn(move |_| {
                            if token.is_some_and(CancellationToken::is_cancelled) {
                                skipped.fetch_add(1, Ordering::Relaxed);
                                return;
                            }
                            f(unit);
                        });
                    }
                })
            })
        }));

        if let Err(payload) = outcome {
            let message = panic_message(&*payload);
            tracing::error!(%message, "work unit panicked");
            return Err(EngineError::WorkerPanicked(message));
        }

        let skipped = skipped.into_inner();
        if skipped > 0 {
            tracing::debug!(skipped, total, "multiplication cancelled");
            return Err(EngineError::Cancelled { skipped, total });
        }
        Ok(())
    }
}

impl MultiplyBackend for ParallelMultiplier {
    fn name(&self) -> &str {
        "parallel"
    }

    fn matmul(&self, a: &Matrix, b: &Matrix) -> std::result::Result<Matrix, MatrixError> {
        self.multiply(a, b).map_err(MatrixError::from)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
