//! Create-or-reuse reconciliation of scoped variables
//!
//! Reconciling `(project, name, scope)` guarantees that exactly one variable
//! with that name and an equivalent scope exists, creating it only when
//! absent. The protocol has three explicit phases:
//!
//! 1. [`propose`] inspects the fetched variable set and decides between
//!    reusing a single exact match, writing a new draft, or failing on an
//!    ambiguous set.
//! 2. [`Reconciler`] commits a pending write by persisting the whole set.
//! 3. [`verify`] re-queries the state the store returned and requires exactly
//!    one match.
//!
//! The whole-set read-modify-write is not safe against concurrent
//! reconciliation of the same project. Callers must serialize per project.
//!
//! # Usage
//!
//! ```ignore
//! use octovars_application::{ReconcileRequest, Reconciler};
//! use octovars_domain::{ScopeDimension, ScopeSet};
//!
//! let reconciler = Reconciler::new(store);
//! let request = ReconcileRequest::new(
//!     "Projects-105",
//!     "SqlServerInstanceName",
//!     ScopeSet::new().with(ScopeDimension::Environments, ["Environments-130"]),
//! )?;
//! let reconciled = reconciler.reconcile(&request).await?;
//! println!("{:?}", reconciled.variable.id);
//! ```

pub mod engine;
pub mod proposal;

pub use engine::{ReconcileOutcome, Reconciled, Reconciler};
pub use proposal::{PendingWrite, Proposal, ReconcileRequest, propose, verify};
