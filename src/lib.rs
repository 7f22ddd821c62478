//! This crate provides the [`Vector`] data structure,
//! a growable array whose positions are given by checked cursors.
//!
//! A [`Cursor`] does not borrow the vector it points into,
//! so the vector can be modified while cursors on it are alive.
//! Each time the vector reallocates its buffer, the cursors created before become stale.
//! This is detected the next time they are used:
//! dereferencing a stale cursor returns [`Error::DanglingCursor`]
//! instead of reading freed memory.
//!
//! ## Basic usage
//!
//! ```rust
//! use epoch_vec::{vector, Error, Vector};
//!
//! let mut v: Vector<i32> = Vector::new(); // capacity 5.
//! v.push_back(1);
//! v.push_back(3);
//!
//! let mut it = v.begin();
//! it.advance(&v);
//! let it = v.insert(it, 2)?;
//! assert_eq!(v, [1, 2, 3]);
//! assert_eq!(it.get(&v), Ok(&2));
//!
//! v.extend(4..=6); // the capacity doubles here, the buffer moves.
//! assert_eq!(v.capacity(), 10);
//! assert_eq!(it.get(&v), Err(Error::DanglingCursor));
//! # Ok::<(), Error>(())
//! ```
//!
//! Vectors built from a list of elements get a capacity of `2 * n + 1`:
//! ```rust
//! # use epoch_vec::vector;
//! let v = vector![1, 2, 3, 4, 5, 6, 7];
//! assert_eq!(v.capacity(), 15);
//! ```
//!
//! The length and capacity are stored through a [`generic::Meta`] format.
//! [`Vector`] uses [`wide::Meta`], with `usize` fields.
//! On 64-bit targets [`lean::Vector`] packs both in a single `usize`.
pub mod error;
pub mod raw;
pub mod generic;
pub mod cursor;
pub mod wide;
#[cfg(target_pointer_width = "64")]
pub mod lean;
#[cfg(not(target_pointer_width = "64"))]
pub mod lean {
	/// Re-exports `wide` for non-64-bit targets
	pub use super::wide::*;
}

pub use error::{
	Error,
	Result
};
pub use cursor::{
	ConstCursor,
	Cursor
};
pub use generic::{
	GROWTH_FACTOR,
	MIN_CAPACITY
};
pub use wide::Vector;

/// Creates a [`Vector`] containing the arguments.
///
/// The capacity is `2 * n + 1` where `n` is the number of arguments.
///
/// ```
/// # use epoch_vec::vector;
/// let v = vector![1, 2, 3];
/// assert_eq!(v.capacity(), 7);
/// ```
#[macro_export]
macro_rules! vector {
	() => {
		$crate::Vector::from_list(::std::vec::Vec::new())
	};
	($($x:expr),+ $(,)?) => {
		$crate::Vector::from_list(::std::vec![$($x),+])
	};
}
