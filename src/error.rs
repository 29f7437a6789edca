//! # Error Types for the Sentinel BST
//!
//! This module defines the error type returned by fallible tree operations.
//!
//! ## Error Handling Strategy
//!
//! The tree reserves errors for genuinely exceptional conditions. Expected
//! "absence" outcomes are not errors:
//!
//! - Inserting a key that already exists returns the existing entry's cursor
//!   with an `inserted = false` flag and performs no mutation.
//! - Removing or looking up an absent key returns `None` (or an end cursor).
//!
//! Contract violations are not errors either: dereferencing a stale node
//! handle (one whose node has been removed) panics immediately through the
//! arena's generation check rather than propagating silent corruption.
//!
//! What remains is resource exhaustion. Node storage grows through
//! [`Vec::try_reserve`], so a failed allocation surfaces as
//! [`Error::Allocation`] and leaves the tree exactly as it was before the
//! insert began: no node has been linked, no count or cache has moved.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur during tree operations.
#[derive(Error, Debug)]
pub enum Error {
	/// Growing the node arena failed.
	///
	/// Returned by insertion when the underlying slot vector cannot reserve
	/// room for one more node. The tree remains in its last-consistent
	/// state: the key is absent and no partial linkage is left behind.
	#[error("node arena allocation failed")]
	Allocation(#[from] TryReserveError),
}

/// A Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
