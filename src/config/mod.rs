//! Configuration module.
//!
//! This module provides loading and saving of user-added resolver and
//! test-domain lists, plus assembly of the full lists from built-ins,
//! the user store, command-line arguments, and JSON files.

pub mod store;

pub use store::UserStore;
