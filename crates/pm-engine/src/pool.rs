use crate::config::PoolConfig;
use crate::error::Result;

/// A fixed-size pool of OS worker threads.
///
/// Wraps [`rayon::ThreadPool`] with named threads and a resolved thread
/// count. Concurrency never exceeds `num_threads()` no matter how many work
/// units a multiplication produces.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    config: PoolConfig,
}

impl WorkerPool {
    /// Create a new pool from the given configuration.
    ///
    /// # Errors
    /// Returns `PoolBuild` if the OS refuses to spawn a worker thread.
    /// Threads spawned before the failure are shut down by rayon.
    pub fn new(config: PoolConfig) -> Result<Self> {
        let num_threads = config.resolved_threads();
        let prefix = config.name_prefix.clone();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(move |idx| format!("{prefix}-{idx}"))
            .build()?;

        tracing::debug!(num_threads, prefix = %config.name_prefix, "worker pool started");

        let config = PoolConfig {
            num_threads,
            ..config
        };
        Ok(Self { pool, config })
    }

    /// Create a pool with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(PoolConfig::default())
    }

    /// The configuration this pool was created with, thread count resolved.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of worker threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Run `op` inside the pool, blocking the caller until it returns.
    ///
    /// Parallel work spawned from `op` (e.g. via [`rayon::scope`]) runs on
    /// this pool's threads only. A panic in `op` is propagated to the caller.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.config.num_threads)
            .field("name_prefix", &self.config.name_prefix)
            .finish()
    }
}
