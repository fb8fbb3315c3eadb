// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::ProtocolError;
use rayon::ThreadPool;
use std::{sync::Arc, thread, time::Duration};
use tokio::{sync::Semaphore, time::sleep};
use tracing::{error, warn};

/// Rayon pool running element pipelines, with a semaphore bounding how many
/// are in flight at once.
#[derive(Debug, Clone)]
pub struct ElementPool {
    semaphore: Arc<Semaphore>,
    thread_pool: Arc<ThreadPool>,
}

impl ElementPool {
    pub fn new(threads: usize, max_tasks: usize) -> Result<ElementPool, ProtocolError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("psi-element-{i}"))
            .build()
            .map_err(|e| ProtocolError::Pool(e.to_string()))?;

        Ok(Self {
            thread_pool: Arc::new(thread_pool),
            semaphore: Arc::new(Semaphore::new(max_tasks.max(1))),
        })
    }

    /// Subtract the given amount from the total number of available threads and return the result
    pub fn get_max_threads_minus(amount: usize) -> usize {
        let total_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        std::cmp::max(1, total_threads.saturating_sub(amount))
    }

    pub fn threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    pub async fn spawn<OP, T: Send + 'static>(&self, task_name: String, op: OP) -> Result<T, String>
    where
        OP: FnOnce() -> T + Send + 'static,
    {
        // Limit the requests and get them to block
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| format!("semaphore closed for '{task_name}'"))?;

        // Warn of long running jobs
        let name = task_name.clone();
        let warning_handle = tokio::spawn(async move {
            sleep(Duration::from_secs(10)).await;
            warn!("Job '{}' has been running for more than 10 seconds", name);
            sleep(Duration::from_secs(30)).await;
            error!("Job '{}' has been running for more than 30 seconds", name);
        });

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.thread_pool.spawn(move || {
            // the receiver only goes away when the awaiting run was dropped
            if tx.send(op()).is_err() {
                error!("Result of job '{}' was dropped before delivery", task_name);
            }
        });

        let output = rx.await.map_err(|e| e.to_string());
        warning_handle.abort();
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_jobs_on_the_pool() {
        let pool = ElementPool::new(2, 4).unwrap();
        assert_eq!(pool.threads(), 2);

        let jobs = (0..8u64).map(|i| pool.spawn(format!("job-{i}"), move || i * i));
        let results: Vec<u64> = futures::future::join_all(jobs)
            .await
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(results, vec![0, 1, 4, 9, 16, 25, 36, 49]);
    }

    #[test]
    fn max_threads_never_drops_below_one() {
        assert_eq!(ElementPool::get_max_threads_minus(usize::MAX), 1);
    }
}
