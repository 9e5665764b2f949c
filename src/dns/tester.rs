//! Single-target tester.
//!
//! Runs all four probes against one resolver and reduces their samples into
//! a terminal [`TestOutcome`]. Probe failures never surface here; a resolver
//! that yields no sample at all ends in `Timeout`, not an error.

use crate::dns::aggregate::combine;
use crate::dns::probe::Prober;
use crate::dns::types::TestOutcome;
use std::net::IpAddr;

/// Test one resolver against one domain.
///
/// The four probes run in sequence for this resolver (the batch scheduler
/// provides the cross-resolver concurrency). Each probe contributes at most
/// one sample; the aggregate of whatever arrived becomes the outcome.
pub async fn test_server(prober: &Prober, server: IpAddr, domain: &str) -> TestOutcome {
    tracing::debug!("testing {server} against {domain}");

    let mut samples = Vec::with_capacity(4);
    if let Some(ms) = prober.tcp_resolve(server, domain).await {
        samples.push(ms);
    }
    if let Some(ms) = prober.udp_resolve(server, domain).await {
        samples.push(ms);
    }
    if let Some(ms) = prober.random_resolve(server).await {
        samples.push(ms);
    }
    if let Some(ms) = prober.icmp_echo(server).await {
        samples.push(ms);
    }

    outcome_for(&samples)
}

/// Map a set of collected probe samples to a terminal outcome.
pub(crate) fn outcome_for(samples: &[u32]) -> TestOutcome {
    match combine(samples) {
        Some(ms) => TestOutcome::success(ms),
        None => TestOutcome::timeout(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::types::ResolverStatus;

    #[test]
    fn test_no_samples_is_timeout() {
        let outcome = outcome_for(&[]);
        assert_eq!(outcome.status, ResolverStatus::Timeout);
        assert!(outcome.latency_ms.is_none());
        assert_eq!(outcome.detail, "DNS queries failed or timed out");
    }

    #[test]
    fn test_any_sample_is_success_with_aggregate() {
        // TCP=50 and ping=40 survive, UDP and random came back empty.
        let outcome = outcome_for(&[50, 40]);
        assert_eq!(outcome.status, ResolverStatus::Success);
        assert_eq!(outcome.latency_ms, Some(50));
        assert_eq!(outcome.detail, "DNS round trip: 50 ms");
    }

    #[test]
    fn test_single_sample_success() {
        let outcome = outcome_for(&[73]);
        assert_eq!(outcome.status, ResolverStatus::Success);
        assert_eq!(outcome.latency_ms, Some(73));
    }

    #[test]
    fn test_three_samples_take_middle() {
        let outcome = outcome_for(&[30, 10, 70]);
        assert_eq!(outcome.latency_ms, Some(30));
    }

    #[test]
    fn test_four_samples_take_upper_middle() {
        let outcome = outcome_for(&[10, 20, 30, 40]);
        assert_eq!(outcome.latency_ms, Some(30));
    }
}
