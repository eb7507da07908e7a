//! Bounded fan-out of candidate validation
//!
//! Every candidate gets its own tokio task, but a task must hold a
//! semaphore permit while it validates, so at most `concurrency` probes
//! are in flight. The collected records are only handed back once every
//! task has been joined.

use crate::proxy::checker::ProxyChecker;
use crate::proxy::models::{AliveProxy, Candidate, Identity, ValidationOutcome};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, error};

/// What a dispatch run produced
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Candidates that reached a final outcome
    pub processed: usize,
    /// Number of dead candidates
    pub dead: usize,
    /// Alive records in order of completion
    pub alive: Vec<AliveProxy>,
}

/// Validate all candidates with at most `concurrency` in flight at once
pub async fn dispatch(
    checker: &ProxyChecker,
    candidates: Vec<Candidate>,
    baseline: Arc<Identity>,
    concurrency: usize,
) -> DispatchReport {
    let total = candidates.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let alive = Arc::new(Mutex::new(Vec::new()));
    let dead = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let sem = Arc::clone(&semaphore);
            let checker = checker.clone();
            let baseline = Arc::clone(&baseline);
            let alive = Arc::clone(&alive);
            let dead = Arc::clone(&dead);

            tokio::spawn(async move {
                let outcome = {
                    let Ok(_permit) = sem.acquire_owned().await else {
                        error!(proxy = %candidate, "admission gate closed, skipping");
                        dead.fetch_add(1, Ordering::Relaxed);
                        return;
                    };
                    checker.validate(&candidate, &baseline).await
                };

                match outcome {
                    ValidationOutcome::Alive(proxy) => alive.lock().await.push(proxy),
                    ValidationOutcome::Dead(_) => {
                        dead.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    debug!(total, "all validation tasks spawned, waiting for completion");

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            error!(error = %e, "validation task failed");
            dead.fetch_add(1, Ordering::Relaxed);
        }
    }

    // Every task has been joined, so this is the last reference
    let alive = match Arc::try_unwrap(alive) {
        Ok(mutex) => mutex.into_inner(),
        Err(shared) => shared.lock().await.clone(),
    };

    DispatchReport {
        processed: total,
        dead: dead.load(Ordering::Relaxed),
        alive,
    }
}
