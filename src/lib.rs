//! dnspick - DNS resolver latency tester.
//!
//! This crate provides both a library API and a CLI tool for:
//! - Measuring round-trip DNS latency with four independent probes
//!   (TCP resolve, UDP resolve, random-subdomain resolve, ICMP echo)
//! - Reducing per-resolver probe samples with an outlier-resistant rule
//! - Testing a whole resolver list concurrently with incremental progress
//! - Ranking results and picking the fastest resolver
//!
//! # Library Usage
//!
//! ```ignore
//! use dnspick::{catalog, run_batch, Prober};
//!
//! let mut servers = catalog::builtin_resolvers();
//! let prober = Prober::new();
//! let report = run_batch(&prober, &mut servers, "www.example.com", None).await;
//! if let Some(idx) = report.winner {
//!     println!("fastest: {}", servers[idx].name);
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Run the latency test over the built-in resolver list
//! dnspick test
//! dnspick test --domain www.google.com
//! dnspick test --dns 8.8.8.8#Google --dns 1.1.1.1#Cloudflare
//!
//! # List resolvers / test domains
//! dnspick list
//! dnspick list --domains
//!
//! # Manage user-added entries
//! dnspick add "My DNS" 10.0.0.1 10.0.0.2
//! dnspick remove "My DNS"
//! ```
//!
//! Probe failures never abort a run: a resolver with no usable sample simply
//! ends in `timeout`, and an unexpected per-resolver failure is confined to
//! that resolver's `error` state.

pub mod cli;
pub mod config;
pub mod dns;
pub mod error;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::UserStore;
pub use dns::types::{BatchReport, ResolverEntry, ResolverStatus, TestDomain, TestOutcome};
pub use dns::{catalog, rank, run_batch, Prober, TestEvent};
pub use error::{Error, Result};
