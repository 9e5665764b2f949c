//! Latency probe primitives.
//!
//! Four independent ways of estimating round-trip latency to one resolver:
//! TCP-transport DNS queries, UDP-transport DNS queries against uncommon
//! record types, cache-busting random-subdomain queries, and ICMP echo.
//!
//! Every probe is bounded by its own per-operation timeout and returns
//! `Option<u32>` milliseconds. Individual query failures are absorbed as
//! missing samples; a probe never returns an error to its caller.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

use crate::dns::catalog::random_probe_domain;
use crate::error::{Error, Result};
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tokio::time::{sleep, timeout};
use trust_dns_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::proto::rr::RecordType;
use trust_dns_resolver::TokioAsyncResolver;

/// Per-query timeout for the TCP probe.
const TCP_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-query timeout for the UDP and random-subdomain probes.
const UDP_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Per-echo timeout for the ICMP probe.
const PING_TIMEOUT: Duration = Duration::from_secs(3);

/// Well-known domain used for the TCP warm-up query.
const WARMUP_DOMAIN: &str = "www.example.com";

/// Settle time between the TCP warm-up and the timed queries.
const WARMUP_SETTLE: Duration = Duration::from_millis(50);

/// Pacing delay between timed TCP queries.
const TCP_QUERY_GAP: Duration = Duration::from_millis(200);

/// Pacing delay for the UDP, random-subdomain, and ICMP probes.
const QUERY_GAP: Duration = Duration::from_millis(100);

/// Timed queries per TCP / random-subdomain probe.
const QUERIES_PER_PROBE: usize = 3;

/// Uncommon record types queried by the UDP probe to dodge warm caches.
const UDP_QUERY_TYPES: [RecordType; 3] = [RecordType::AAAA, RecordType::MX, RecordType::TXT];

/// Echo requests sent by the ICMP probe.
const PING_COUNT: usize = 4;

/// Echo payload size in bytes.
const PING_PAYLOAD_SIZE: usize = 32;

/// ICMP round trips undercut a full DNS exchange; scale up to approximate it.
const PING_CORRECTION: f64 = 1.2;

/// Outcome of one timed DNS query.
enum QuerySample {
    /// Server answered with records.
    Answered(u32),
    /// Server answered, but with NXDOMAIN or an empty record set.
    Negative(u32),
    /// Transport-level failure or timeout; no usable sample.
    Failed,
}

/// Latency prober bound to nothing; every call opens and drops its own
/// transport client for the resolver address it is given.
#[derive(Debug, Clone, Default)]
pub struct Prober;

impl Prober {
    /// Create a new `Prober`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Measure DNS latency over TCP.
    ///
    /// Forces connection-oriented transport, runs one unmeasured warm-up
    /// query so connection setup does not pollute the samples, then issues
    /// three timed A queries. Only queries that come back with an answer
    /// count. Returns the truncated mean, or `None` if all three failed.
    pub async fn tcp_resolve(&self, server: IpAddr, domain: &str) -> Option<u32> {
        let resolver = match dns_client(server, Protocol::Tcp, TCP_QUERY_TIMEOUT) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("TCP probe setup failed for {server}: {e}");
                return None;
            }
        };

        // Warm-up: establish the connection, ignore the result entirely.
        let _ = resolver.lookup(WARMUP_DOMAIN, RecordType::A).await;
        sleep(WARMUP_SETTLE).await;

        let mut samples = Vec::with_capacity(QUERIES_PER_PROBE);
        for _ in 0..QUERIES_PER_PROBE {
            if let QuerySample::Answered(ms) = timed_query(&resolver, domain, RecordType::A).await {
                samples.push(ms);
            }
            sleep(TCP_QUERY_GAP).await;
        }

        mean(&samples)
    }

    /// Measure DNS latency over UDP.
    ///
    /// No warm-up. Issues one timed query per uncommon record type (AAAA,
    /// MX, TXT); a served negative answer is still a complete round trip and
    /// counts as a sample. Returns the truncated mean, or `None`.
    pub async fn udp_resolve(&self, server: IpAddr, domain: &str) -> Option<u32> {
        let resolver = match dns_client(server, Protocol::Udp, UDP_QUERY_TIMEOUT) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("UDP probe setup failed for {server}: {e}");
                return None;
            }
        };

        let mut samples = Vec::with_capacity(UDP_QUERY_TYPES.len());
        for rtype in UDP_QUERY_TYPES {
            match timed_query(&resolver, domain, rtype).await {
                QuerySample::Answered(ms) | QuerySample::Negative(ms) => samples.push(ms),
                QuerySample::Failed => {}
            }
            sleep(QUERY_GAP).await;
        }

        mean(&samples)
    }

    /// Measure DNS latency with random subdomains.
    ///
    /// Issues three timed A queries, each against a freshly generated random
    /// name, so no cache anywhere can have the answer. NXDOMAIN is the
    /// expected response and counts as a sample.
    pub async fn random_resolve(&self, server: IpAddr) -> Option<u32> {
        let resolver = match dns_client(server, Protocol::Udp, UDP_QUERY_TIMEOUT) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("random-subdomain probe setup failed for {server}: {e}");
                return None;
            }
        };

        let mut samples = Vec::with_capacity(QUERIES_PER_PROBE);
        for _ in 0..QUERIES_PER_PROBE {
            let target = random_probe_domain();
            match timed_query(&resolver, &target, RecordType::A).await {
                QuerySample::Answered(ms) | QuerySample::Negative(ms) => samples.push(ms),
                QuerySample::Failed => {}
            }
            sleep(QUERY_GAP).await;
        }

        mean(&samples)
    }

    /// Measure bare network latency with ICMP echo.
    ///
    /// Sends four 32-byte echo requests and averages the successful round
    /// trips, scaled by [`PING_CORRECTION`] to land in the same ballpark as a
    /// DNS exchange. Requires raw-socket / ICMP permissions; without them the
    /// probe simply reports no signal. IPv6 targets are skipped.
    pub async fn icmp_echo(&self, server: IpAddr) -> Option<u32> {
        if server.is_ipv6() {
            tracing::debug!("ICMP probe skipped for IPv6 target {server}");
            return None;
        }

        let client = match Client::new(&Config::default()) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("ICMP client unavailable: {e}");
                return None;
            }
        };

        let payload = [0u8; PING_PAYLOAD_SIZE];
        let mut samples = Vec::with_capacity(PING_COUNT);

        for seq in 0..PING_COUNT {
            let mut pinger = client.pinger(server, PingIdentifier(fastrand::u16(..))).await;
            pinger.timeout(PING_TIMEOUT);

            let start = Instant::now();
            let result = timeout(
                PING_TIMEOUT,
                pinger.ping(PingSequence(seq as u16), &payload),
            )
            .await;

            match result {
                Ok(Ok(_reply)) => {
                    samples.push(start.elapsed().as_millis() as u32);
                }
                Ok(Err(e)) => {
                    tracing::debug!("ping error for {server}: {e}");
                }
                Err(_) => {
                    // Timeout
                }
            }
            sleep(QUERY_GAP).await;
        }

        if samples.is_empty() {
            return None;
        }
        let avg = samples.iter().map(|&s| u64::from(s)).sum::<u64>() / samples.len() as u64;
        Some((avg as f64 * PING_CORRECTION) as u32)
    }
}

/// Build a one-shot resolver client bound to a single upstream server.
///
/// Caching is disabled and no retries are attempted, so every lookup is one
/// real exchange with the server under test.
fn dns_client(server: IpAddr, protocol: Protocol, query_timeout: Duration) -> Result<TokioAsyncResolver> {
    let mut config = ResolverConfig::new();
    config.add_name_server(NameServerConfig::new(
        SocketAddr::new(server, 53),
        protocol,
    ));

    let mut opts = ResolverOpts::default();
    opts.timeout = query_timeout;
    opts.attempts = 0;
    opts.cache_size = 0;
    opts.use_hosts_file = false;

    TokioAsyncResolver::tokio(config, opts).map_err(Error::Resolver)
}

/// Run one lookup against `resolver` and classify the outcome.
async fn timed_query(
    resolver: &TokioAsyncResolver,
    domain: &str,
    rtype: RecordType,
) -> QuerySample {
    let start = Instant::now();
    match resolver.lookup(domain, rtype).await {
        Ok(_) => QuerySample::Answered(start.elapsed().as_millis() as u32),
        Err(e) => match e.kind() {
            // The server answered; there just are no such records. Still a
            // complete, timed round trip.
            ResolveErrorKind::NoRecordsFound { .. } => {
                QuerySample::Negative(start.elapsed().as_millis() as u32)
            }
            _ => {
                tracing::debug!("query {rtype} {domain} failed: {e}");
                QuerySample::Failed
            }
        },
    }
}

/// Truncated integer mean, `None` for an empty slice.
fn mean(samples: &[u32]) -> Option<u32> {
    if samples.is_empty() {
        return None;
    }
    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    Some((sum / samples.len() as u64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_truncates() {
        assert_eq!(mean(&[10]), Some(10));
        assert_eq!(mean(&[10, 11]), Some(10));
        assert_eq!(mean(&[10, 20, 31]), Some(20));
    }

    #[test]
    fn test_ping_correction_truncates() {
        // 10ms avg * 1.2 = 12ms
        let avg = 10u64;
        assert_eq!((avg as f64 * PING_CORRECTION) as u32, 12);
    }

    #[tokio::test]
    async fn test_dns_client_builds_for_both_transports() {
        let server: IpAddr = "192.0.2.1".parse().unwrap();
        assert!(dns_client(server, Protocol::Udp, UDP_QUERY_TIMEOUT).is_ok());
        assert!(dns_client(server, Protocol::Tcp, TCP_QUERY_TIMEOUT).is_ok());
    }
}
