//! Fan-out batch scheduler.
//!
//! Runs the single-target tester concurrently across a whole resolver list,
//! consumes completions in arrival order, reports incremental progress over a
//! channel, and finally re-ranks the list by ascending latency.
//!
//! Worst-case wall time is bounded per resolver, not per batch: the TCP probe
//! can spend up to 3x5s, the UDP and random-subdomain probes up to 3x3s each,
//! and the ICMP probe up to 4x3s, plus the fixed pacing delays in between.

use crate::dns::probe::Prober;
use crate::dns::tester::test_server;
use crate::dns::types::{BatchReport, ResolverEntry, ResolverStatus, TestOutcome};
use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

/// Progress and completion messages emitted during a batch run.
///
/// Sent over an unbounded channel; a dropped receiver silently disables
/// reporting, it never fails the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEvent {
    /// One resolver reached a terminal state.
    ServerTested {
        /// Index into the (pre-ranking) resolver collection.
        index: usize,
        /// The terminal state for that resolver.
        outcome: TestOutcome,
    },
    /// Running counter, emitted exactly once per completed resolver.
    Progress { tested: usize, total: usize },
    /// The batch is done and the collection has been re-ranked.
    Finished {
        /// Index of the winner in the re-ranked collection, if any resolver
        /// produced a measurement.
        winner: Option<usize>,
    },
}

/// Run the latency test concurrently across every resolver in `servers`.
///
/// Before dispatch every entry is reset to `Testing` with no latency, so an
/// observer polling mid-run never sees stale results. Completions are applied
/// in arrival order; a failed task is confined to its own entry as an `Error`
/// state and never aborts siblings. When all tests are done the collection is
/// re-ranked by ascending latency (unmeasured entries last, original order
/// preserved among ties) and the winner is the first measured entry.
pub async fn run_batch(
    prober: &Prober,
    servers: &mut Vec<ResolverEntry>,
    domain: &str,
    events: Option<&UnboundedSender<TestEvent>>,
) -> BatchReport {
    let prober = prober.clone();
    run_batch_with(servers, domain, events, move |server, domain| {
        let prober = prober.clone();
        async move { test_server(&prober, server, &domain).await }
    })
    .await
}

/// Fan-out loop, parameterized over the per-server test so the scheduling
/// behavior can be exercised without touching the network.
pub(crate) async fn run_batch_with<F, Fut>(
    servers: &mut Vec<ResolverEntry>,
    domain: &str,
    events: Option<&UnboundedSender<TestEvent>>,
    test_fn: F,
) -> BatchReport
where
    F: Fn(IpAddr, String) -> Fut,
    Fut: Future<Output = TestOutcome> + Send + 'static,
{
    let total = servers.len();
    tracing::info!("starting batch run: {total} resolvers, domain {domain}");

    for entry in servers.iter_mut() {
        entry.status = ResolverStatus::Testing;
        entry.latency_ms = None;
        entry.status_detail.clear();
    }

    let mut tasks = JoinSet::new();
    let mut task_index = HashMap::with_capacity(total);

    for (index, entry) in servers.iter().enumerate() {
        let handle = tasks.spawn(test_fn(entry.primary, domain.to_string()));
        task_index.insert(handle.id(), index);
    }

    let mut tested = 0;
    while let Some(joined) = tasks.join_next_with_id().await {
        let (index, outcome) = match joined {
            Ok((id, outcome)) => (task_index[&id], outcome),
            Err(e) => {
                // The test task itself blew up. Pin the failure to its own
                // resolver; the siblings keep running.
                let index = task_index[&e.id()];
                tracing::warn!("test task for resolver #{index} failed: {e}");
                (index, TestOutcome::error(e.to_string()))
            }
        };

        let entry = &mut servers[index];
        entry.status = outcome.status;
        entry.latency_ms = outcome.latency_ms;
        entry.status_detail = outcome.detail.clone();

        tested += 1;
        if let Some(tx) = events {
            let _ = tx.send(TestEvent::ServerTested { index, outcome });
            let _ = tx.send(TestEvent::Progress { tested, total });
        }
    }

    rank(servers);
    let winner = servers.iter().position(|s| s.latency_ms.is_some());

    if let Some(tx) = events {
        let _ = tx.send(TestEvent::Finished { winner });
    }
    tracing::info!("batch run complete: {tested}/{total} tested");

    BatchReport {
        tested,
        total,
        winner,
    }
}

/// Re-rank the collection by ascending latency.
///
/// Unmeasured entries sort after all measured ones; the sort is stable, so
/// entries tied on latency (or tied on "no latency") keep their relative
/// order.
pub fn rank(servers: &mut [ResolverEntry]) {
    servers.sort_by_key(|s| s.latency_ms.map_or(u64::MAX, u64::from));
}
