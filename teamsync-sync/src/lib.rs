//! # teamsync-sync
//!
//! Reconciliation of a desired [`AccessModel`](teamsync_core::AccessModel)
//! against a live platform.
//!
//! Call [`commit_access`] to reconcile every organization in an access
//! model, or use [`reconcile`] / [`execute`] directly for a single one.

pub mod diff;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod platform;
pub mod reconcile;

pub use diff::{diff_access, AccessDiff};
pub use error::{PlatformError, SyncError};
pub use executor::{execute, ExecutionReport, FailedOp, OpKind};
pub use pipeline::{commit_access, commit_org, CommitOptions, OrgCommitResult};
pub use platform::{read_remote_state, MembershipRole, RemoteGroup, RemotePlatform, RemoteState};
pub use reconcile::{reconcile, MembershipOp, ReconciliationPlan};
