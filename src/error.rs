//! Errors returned by the container and its cursors.
use thiserror::Error;

/// Errors returned by [`Vector`](crate::generic::Vector) operations.
///
/// Every fallible operation checks its preconditions before touching the vector,
/// so a returned error always means nothing was modified.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
	/// Indexed access with `index >= len`.
	#[error("index {index} out of range for vector of length {len}")]
	OutOfRange {
		index: usize,
		len: usize
	},

	/// `pop_back` on an empty vector.
	#[error("vector is empty")]
	Empty,

	/// `insert` or `erase` given a cursor outside of the legal range.
	///
	/// `offset` is `None` when the cursor does not address the vector's current buffer
	/// at all (unbound, stale or foreign).
	#[error("cursor position {offset:?} is not valid for vector of length {len}")]
	InvalidPosition {
		offset: Option<usize>,
		len: usize
	},

	/// Dereference of a cursor that is unbound, stale, foreign or at the end.
	#[error("dangling cursor")]
	DanglingCursor,

	/// The requested capacity exceeds what the metadata format or the allocator can address.
	#[error("capacity overflow")]
	CapacityOverflow
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
