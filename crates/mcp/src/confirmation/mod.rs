//! Two-phase confirmation: single-use tokens bound to a parameter snapshot.
//!
//! [`ConfirmationStore::create`] issues a token for a proposal.
//! [`ConfirmationStore::validate_with`] checks that a token is pending, fresh
//! and bound to equal parameters. [`ConfirmationStore::mark_used`] consumes it.
//! Execute paths use [`ConfirmationStore::claim`], which performs both steps
//! under the store lock so two racing executions cannot both succeed.

mod protocol;
mod store;

pub use store::{ConfirmationEntry, ConfirmationStore, DEFAULT_CONFIRMATION_TTL};
