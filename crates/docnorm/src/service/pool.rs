//! Bounded blocking worker pool.
//!
//! A request takes one permit and runs its whole validate, extract and render
//! sequence on a blocking thread. When every permit is taken, callers wait for one
//! rather than being rejected.
//!
//! The permit moves into the blocking job. If the caller goes away mid-request the
//! job still runs to completion, keeps its permit until it finishes, and its result is
//! dropped.

use crate::{DocnormError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Pool with `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run a blocking job once a worker is free.
    ///
    /// # Errors
    ///
    /// Whatever the job returns, or `ExtractionFailed` if the worker thread panicked.
    pub async fn run<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| DocnormError::extraction_failed_with_source("worker pool is closed", e))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| DocnormError::extraction_failed_with_source("worker task failed", e))?
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
