//! Fetch, cache and launch the platform-native `agentmap` executable.
//!
//! [`reconcile::Reconciler`] is the entry point: it asks the release index for
//! the latest tag, compares it with the version recorded next to the cached
//! binary, and downloads a fresh copy only when they disagree.

pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod ledger;
pub mod locate;
pub mod platform;
pub mod reconcile;
pub mod release;
pub mod runner;

pub use error::{Error, Phase, ReconcileError, Result, REMEDIATION};
