//! Octovars Application - Ports, reconciler and use cases
//!
//! This crate orchestrates the domain model against a remote variable
//! store. The store itself is a port implemented by the infrastructure
//! layer.

pub mod error;
pub mod ports;
pub mod reconciler;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use reconciler::{
    PendingWrite, Proposal, ReconcileOutcome, ReconcileRequest, Reconciled, Reconciler,
};
