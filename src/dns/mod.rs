//! DNS measurement module.
//!
//! This module provides the latency measurement engine:
//! - The four probe primitives (TCP, UDP, random-subdomain, ICMP echo)
//! - Outlier-resistant sample aggregation
//! - The single-target tester and the fan-out batch scheduler
//! - Built-in resolver and test-domain catalogs

pub mod aggregate;
pub mod catalog;
pub mod probe;
pub mod scheduler;
pub mod tester;
pub mod types;

pub use probe::Prober;
pub use scheduler::{rank, run_batch, TestEvent};
pub use tester::test_server;
pub use types::*;
