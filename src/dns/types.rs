//! Core types and data structures.
//!
//! This module provides the types used for resolver representation,
//! test domains, and measurement outcomes.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A DNS resolver subject to latency measurement.
///
/// Carries the resolver's identity (name plus one or two addresses) and its
/// mutable measurement state. The measurement state is transient and is not
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverEntry {
    /// Display name (e.g., "Cloudflare DNS", "Google DNS")
    pub name: String,
    /// Primary address, the one that is measured
    pub primary: IpAddr,
    /// Optional secondary address, carried along for whoever applies the pick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<IpAddr>,
    /// Whether this entry was added by the user (built-in entries cannot be removed)
    #[serde(default)]
    pub is_custom: bool,
    /// Measured round-trip latency in milliseconds; `None` until a successful test
    #[serde(skip)]
    pub latency_ms: Option<u32>,
    /// Current measurement status
    #[serde(skip)]
    pub status: ResolverStatus,
    /// Human-readable diagnostic for the current status
    #[serde(skip)]
    pub status_detail: String,
}

impl ResolverEntry {
    /// Create a new built-in resolver entry.
    pub fn new(name: impl Into<String>, primary: IpAddr, secondary: Option<IpAddr>) -> Self {
        Self {
            name: name.into(),
            primary,
            secondary,
            is_custom: false,
            latency_ms: None,
            status: ResolverStatus::Untested,
            status_detail: String::new(),
        }
    }

    /// Create a new user-added resolver entry.
    pub fn custom(name: impl Into<String>, primary: IpAddr, secondary: Option<IpAddr>) -> Self {
        let mut entry = Self::new(name, primary, secondary);
        entry.is_custom = true;
        entry
    }

    /// Format the latency for display, falling back to the status label.
    #[must_use]
    pub fn latency_display(&self) -> String {
        self.latency_ms
            .map_or_else(|| self.status.to_string(), |ms| format!("{ms} ms"))
    }
}

/// Measurement status of a resolver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverStatus {
    /// Not yet tested
    #[default]
    Untested,
    /// A test is currently in flight
    Testing,
    /// Test completed with a measured latency
    Success,
    /// Every probe came back empty, no signal from this resolver
    Timeout,
    /// The test itself failed unexpectedly
    Error,
}

impl ResolverStatus {
    /// Check if the status is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Timeout | Self::Error)
    }

    /// Check if the status indicates a successful measurement.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for ResolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Untested => "untested",
            Self::Testing => "testing",
            Self::Success => "success",
            Self::Timeout => "timeout",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// A domain used as the query target during measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestDomain {
    /// Display name (e.g., "Google", "Random domain")
    pub name: String,
    /// The domain string queries are issued against
    pub domain: String,
    /// Category label (e.g., "China", "Global", "CDN", "Special")
    pub category: String,
    /// Whether this entry was added by the user
    #[serde(default)]
    pub is_custom: bool,
}

impl TestDomain {
    /// Create a new built-in test domain.
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            category: category.into(),
            is_custom: false,
        }
    }

    /// Create a new user-added test domain.
    pub fn custom(
        name: impl Into<String>,
        domain: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(name, domain, category);
        entry.is_custom = true;
        entry
    }
}

impl std::fmt::Display for TestDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.domain)
    }
}

/// Terminal state produced by testing one resolver.
///
/// Invariant: `latency_ms` is `Some` exactly when `status` is
/// [`ResolverStatus::Success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    /// Terminal status (success, timeout, or error)
    pub status: ResolverStatus,
    /// Aggregate latency in milliseconds, present only on success
    pub latency_ms: Option<u32>,
    /// Human-readable diagnostic
    pub detail: String,
}

impl TestOutcome {
    /// A successful measurement with the given aggregate latency.
    #[must_use]
    pub fn success(latency_ms: u32) -> Self {
        Self {
            status: ResolverStatus::Success,
            latency_ms: Some(latency_ms),
            detail: format!("DNS round trip: {latency_ms} ms"),
        }
    }

    /// No probe produced a signal.
    #[must_use]
    pub fn timeout() -> Self {
        Self {
            status: ResolverStatus::Timeout,
            latency_ms: None,
            detail: "DNS queries failed or timed out".to_string(),
        }
    }

    /// The test itself failed unexpectedly.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResolverStatus::Error,
            latency_ms: None,
            detail: message.into(),
        }
    }
}

/// Summary of a completed batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of resolvers that reached a terminal state
    pub tested: usize,
    /// Total number of resolvers in the batch
    pub total: usize,
    /// Index of the fastest measured resolver in the re-ranked collection,
    /// `None` if every resolver failed
    pub winner: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolver_entry_creation() {
        let entry = ResolverEntry::new("Google DNS", ip("8.8.8.8"), Some(ip("8.8.4.4")));
        assert_eq!(entry.name, "Google DNS");
        assert_eq!(entry.primary, ip("8.8.8.8"));
        assert_eq!(entry.secondary, Some(ip("8.8.4.4")));
        assert!(!entry.is_custom);
        assert!(entry.latency_ms.is_none());
        assert_eq!(entry.status, ResolverStatus::Untested);
    }

    #[test]
    fn test_custom_entry_flag() {
        let entry = ResolverEntry::custom("Mine", ip("10.0.0.1"), None);
        assert!(entry.is_custom);
    }

    #[test]
    fn test_latency_display() {
        let mut entry = ResolverEntry::new("Test", ip("1.1.1.1"), None);
        assert_eq!(entry.latency_display(), "untested");

        entry.latency_ms = Some(23);
        entry.status = ResolverStatus::Success;
        assert_eq!(entry.latency_display(), "23 ms");
    }

    #[test]
    fn test_status_helpers() {
        assert!(ResolverStatus::Success.is_terminal());
        assert!(ResolverStatus::Timeout.is_terminal());
        assert!(ResolverStatus::Error.is_terminal());
        assert!(!ResolverStatus::Testing.is_terminal());
        assert!(!ResolverStatus::Untested.is_terminal());
        assert!(ResolverStatus::Success.is_success());
        assert!(!ResolverStatus::Timeout.is_success());
    }

    #[test]
    fn test_outcome_invariant() {
        let ok = TestOutcome::success(42);
        assert_eq!(ok.latency_ms, Some(42));
        assert!(ok.detail.contains("42"));

        let timeout = TestOutcome::timeout();
        assert_eq!(timeout.status, ResolverStatus::Timeout);
        assert!(timeout.latency_ms.is_none());

        let err = TestOutcome::error("boom");
        assert_eq!(err.status, ResolverStatus::Error);
        assert!(err.latency_ms.is_none());
        assert_eq!(err.detail, "boom");
    }

    #[test]
    fn test_entry_serde_skips_measurement_state() {
        let mut entry = ResolverEntry::custom("Mine", ip("10.0.0.1"), None);
        entry.latency_ms = Some(9);
        entry.status = ResolverStatus::Success;

        let json = serde_json::to_string(&entry).unwrap();
        let back: ResolverEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Mine");
        assert!(back.latency_ms.is_none());
        assert_eq!(back.status, ResolverStatus::Untested);
    }
}
