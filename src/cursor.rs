//! Detached cursors into a [`Vector`].
//!
//! A cursor does not borrow the vector it points into.
//! Instead it remembers which buffer it was created for,
//! and every access takes the vector as a parameter and checks that this buffer is still the
//! vector's current one.
//! A cursor created before a reallocation (growth, `shrink_to_fit`, `assign`) is *stale*:
//! dereferencing it fails with [`Error::DanglingCursor`] and advancing it does nothing.
//!
//! ```
//! # use epoch_vec::{vector, Error};
//! let mut v = vector![1, 2, 3];
//! let first = v.begin();
//! assert_eq!(first.get(&v), Ok(&1));
//!
//! v.reserve(100); // the buffer moves.
//! assert_eq!(first.get(&v), Err(Error::DanglingCursor));
//! ```
use core::{
	fmt,
	hash::{
		Hash,
		Hasher
	},
	marker::PhantomData,
	ops::Sub,
	sync::atomic::{
		AtomicUsize,
		Ordering
	}
};
use crate::{
	generic::{
		Meta,
		Vector
	},
	Error,
	Result
};

static NEXT_OWNER: AtomicUsize = AtomicUsize::new(0);

/// Names one buffer allocation of one vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Tag {
	/// Unique per constructed vector.
	owner: usize,

	/// Bumped each time the owner reallocates.
	epoch: usize
}

impl Tag {
	pub(crate) fn fresh() -> Tag {
		Tag {
			owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
			epoch: 0
		}
	}

	/// Tag of the buffer replacing this one.
	pub(crate) fn next(self) -> Tag {
		Tag {
			owner: self.owner,
			epoch: self.epoch.wrapping_add(1)
		}
	}

	pub(crate) fn owner(&self) -> usize {
		self.owner
	}

	pub(crate) fn epoch(&self) -> usize {
		self.epoch
	}
}

/// The address of a slot: a buffer and an offset inside of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Slot {
	tag: Tag,
	offset: usize
}

/// Read-only cursor.
///
/// Obtained from [`Vector::cbegin`], [`Vector::cend`], or by converting a [`Cursor`].
pub struct ConstCursor<T> {
	slot: Option<Slot>,
	marker: PhantomData<fn() -> T>
}

/// Read-write cursor.
///
/// Obtained from [`Vector::begin`], [`Vector::end`], [`Vector::insert`] and [`Vector::erase`].
/// Converts losslessly into a [`ConstCursor`]; the opposite conversion does not exist.
pub struct Cursor<T> {
	slot: Option<Slot>,
	marker: PhantomData<fn() -> T>
}

impl<T> ConstCursor<T> {
	/// Creates an unbound cursor.
	///
	/// It is never dereferenceable, and only equal to other unbound cursors.
	#[inline]
	pub const fn new() -> Self {
		ConstCursor {
			slot: None,
			marker: PhantomData
		}
	}

	#[inline]
	pub(crate) fn bound(tag: Tag, offset: usize) -> Self {
		ConstCursor {
			slot: Some(Slot { tag, offset }),
			marker: PhantomData
		}
	}

	/// Returns `true` if the cursor was produced by a vector.
	#[inline]
	pub fn is_bound(&self) -> bool {
		self.slot.is_some()
	}

	/// Offset of the cursor in the buffer it was created for.
	///
	/// This says nothing about whether the cursor is still valid.
	#[inline]
	pub fn offset(&self) -> Option<usize> {
		self.slot.map(|slot| slot.offset)
	}

	/// Offset of the cursor if it addresses the given buffer, whatever the vector's length.
	#[inline]
	pub(crate) fn offset_in(&self, tag: Tag) -> Option<usize> {
		match self.slot {
			Some(slot) if slot.tag == tag => Some(slot.offset),
			_ => None
		}
	}

	/// Offset of the referenced element, if the cursor can be dereferenced in `vector`.
	#[inline]
	fn checked_offset<M: Meta>(&self, vector: &Vector<M, T>) -> Option<usize> {
		self.offset_in(vector.tag()).filter(|offset| *offset < vector.len())
	}

	/// Checks that the cursor points to an element of the current buffer of `vector`.
	#[inline]
	pub fn is_dereferenceable<M: Meta>(&self, vector: &Vector<M, T>) -> bool {
		self.checked_offset(vector).is_some()
	}

	/// Returns a reference to the pointed element.
	///
	/// Fails with [`Error::DanglingCursor`] if the cursor is unbound, was created for
	/// another vector, is stale, or points at or past the end.
	pub fn get<'v, M: Meta>(&self, vector: &'v Vector<M, T>) -> Result<&'v T> {
		match self.checked_offset(vector) {
			Some(offset) => Ok(&vector.as_slice()[offset]),
			None => {
				tracing::debug!(cursor = ?self.slot, "dereferenced a dangling cursor");
				Err(Error::DanglingCursor)
			}
		}
	}

	/// Moves the cursor to the next slot.
	///
	/// If the cursor is not dereferenceable in `vector` this does nothing.
	pub fn advance<M: Meta>(&mut self, vector: &Vector<M, T>) -> &mut Self {
		if self.is_dereferenceable(vector) {
			if let Some(slot) = &mut self.slot {
				slot.offset += 1
			}
		}

		self
	}

	/// Same as [`advance`](Self::advance), but returns the cursor as it was before moving.
	pub fn post_advance<M: Meta>(&mut self, vector: &Vector<M, T>) -> Self {
		let previous = *self;
		self.advance(vector);
		previous
	}
}

impl<T> Cursor<T> {
	/// Creates an unbound cursor.
	#[inline]
	pub const fn new() -> Self {
		Cursor {
			slot: None,
			marker: PhantomData
		}
	}

	#[inline]
	pub(crate) fn bound(tag: Tag, offset: usize) -> Self {
		Cursor {
			slot: Some(Slot { tag, offset }),
			marker: PhantomData
		}
	}

	/// Read-only view of this cursor.
	#[inline]
	pub fn as_const(&self) -> ConstCursor<T> {
		ConstCursor {
			slot: self.slot,
			marker: PhantomData
		}
	}

	/// See [`ConstCursor::is_bound`].
	#[inline]
	pub fn is_bound(&self) -> bool {
		self.slot.is_some()
	}

	/// See [`ConstCursor::offset`].
	#[inline]
	pub fn offset(&self) -> Option<usize> {
		self.as_const().offset()
	}

	/// See [`ConstCursor::is_dereferenceable`].
	#[inline]
	pub fn is_dereferenceable<M: Meta>(&self, vector: &Vector<M, T>) -> bool {
		self.as_const().is_dereferenceable(vector)
	}

	/// Returns a reference to the pointed element.
	///
	/// See [`ConstCursor::get`].
	#[inline]
	pub fn get<'v, M: Meta>(&self, vector: &'v Vector<M, T>) -> Result<&'v T> {
		self.as_const().get(vector)
	}

	/// Returns a mutable reference to the pointed element.
	///
	/// Fails with [`Error::DanglingCursor`] under the same conditions as [`get`](Self::get).
	pub fn get_mut<'v, M: Meta>(&self, vector: &'v mut Vector<M, T>) -> Result<&'v mut T> {
		match self.as_const().checked_offset(vector) {
			Some(offset) => Ok(&mut vector.as_mut_slice()[offset]),
			None => {
				tracing::debug!(cursor = ?self.slot, "dereferenced a dangling cursor");
				Err(Error::DanglingCursor)
			}
		}
	}

	/// Moves the cursor to the next slot, or does nothing if it is not dereferenceable.
	pub fn advance<M: Meta>(&mut self, vector: &Vector<M, T>) -> &mut Self {
		let mut cursor = self.as_const();
		cursor.advance(vector);
		self.slot = cursor.slot;
		self
	}

	/// Same as [`advance`](Self::advance), but returns the cursor as it was before moving.
	pub fn post_advance<M: Meta>(&mut self, vector: &Vector<M, T>) -> Self {
		let previous = *self;
		self.advance(vector);
		previous
	}
}

impl<T> From<Cursor<T>> for ConstCursor<T> {
	#[inline]
	fn from(cursor: Cursor<T>) -> ConstCursor<T> {
		cursor.as_const()
	}
}

impl<'c, T> From<&'c Cursor<T>> for ConstCursor<T> {
	#[inline]
	fn from(cursor: &'c Cursor<T>) -> ConstCursor<T> {
		cursor.as_const()
	}
}

impl<'c, T> From<&'c ConstCursor<T>> for ConstCursor<T> {
	#[inline]
	fn from(cursor: &'c ConstCursor<T>) -> ConstCursor<T> {
		*cursor
	}
}

macro_rules! impl_cursor_common {
	($ty:ident) => {
		impl<T> Clone for $ty<T> {
			#[inline]
			fn clone(&self) -> Self {
				*self
			}
		}

		impl<T> Copy for $ty<T> {}

		impl<T> Default for $ty<T> {
			#[inline]
			fn default() -> Self {
				Self::new()
			}
		}

		impl<T> Eq for $ty<T> {}

		impl<T> Hash for $ty<T> {
			fn hash<H: Hasher>(&self, state: &mut H) {
				self.slot.hash(state)
			}
		}

		impl<T> fmt::Debug for $ty<T> {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				match self.slot {
					Some(slot) => f.debug_struct(stringify!($ty))
						.field("owner", &slot.tag.owner)
						.field("epoch", &slot.tag.epoch)
						.field("offset", &slot.offset)
						.finish(),
					None => write!(f, "{}(unbound)", stringify!($ty))
				}
			}
		}
	}
}

impl_cursor_common!(ConstCursor);
impl_cursor_common!(Cursor);

// Two cursors are equal when they address the same slot of the same buffer.
macro_rules! impl_cursor_eq {
	($lhs:ident, $rhs:ident) => {
		impl<T> PartialEq<$rhs<T>> for $lhs<T> {
			#[inline]
			fn eq(&self, other: &$rhs<T>) -> bool {
				self.slot == other.slot
			}
		}
	}
}

impl_cursor_eq!(ConstCursor, ConstCursor);
impl_cursor_eq!(ConstCursor, Cursor);
impl_cursor_eq!(Cursor, ConstCursor);
impl_cursor_eq!(Cursor, Cursor);

// Distance in elements, from raw offsets. Unbound cursors count as offset 0.
macro_rules! impl_cursor_sub {
	($lhs:ident, $rhs:ident) => {
		impl<T> Sub<$rhs<T>> for $lhs<T> {
			type Output = isize;

			#[inline]
			fn sub(self, other: $rhs<T>) -> isize {
				let lhs = self.offset().unwrap_or(0);
				let rhs = other.offset().unwrap_or(0);
				lhs.wrapping_sub(rhs) as isize
			}
		}
	}
}

impl_cursor_sub!(ConstCursor, ConstCursor);
impl_cursor_sub!(ConstCursor, Cursor);
impl_cursor_sub!(Cursor, ConstCursor);
impl_cursor_sub!(Cursor, Cursor);
