use core::{
	fmt,
	mem,
	ops::{
		self,
		Deref,
		DerefMut,
		Index,
		IndexMut
	},
	ptr,
	slice
};
use std::iter::FromIterator;
use tracing::{
	debug,
	trace
};
use crate::{
	cursor::{
		ConstCursor,
		Cursor,
		Tag
	},
	raw::{
		self,
		RawBuffer
	},
	Error,
	Result
};

/// Smallest capacity a vector can have, except when built from a list of elements.
pub const MIN_CAPACITY: usize = 5;

/// Factor applied to the capacity when pushing or inserting into a full vector.
pub const GROWTH_FACTOR: usize = 2;

/// Metadata representing the length and capacity of the array.
///
/// This crate provides two implementation of this trait:
/// [`wide::Meta`](crate::wide::Meta) stores the length and capacity with two `usize`.
/// Then the maximum size/capacity depends on the bit-depth of the plateform.
/// For 64-bit plateforms, this crate also provides [`lean::Meta`](crate::lean::Meta) that stores both the length
/// and capacity on a single `usize`. As a result, the maximum size/capacity is [`std::u32::MAX`].
pub trait Meta: Copy {
	/// Maximum size/capacity of the array using this metadata format.
	const MAX_LENGTH: usize;

	/// Create a new metadata from an array's length and capacity.
	fn new(len: usize, capacity: usize) -> Self;

	/// Get the length of the array.
	fn len(&self) -> usize;

	/// Get the capacity of the buffer.
	fn capacity(&self) -> usize;

	/// Set the new length of the array.
	fn set_len(&mut self, len: usize);

	/// Set the new capacity of the buffer.
	fn set_capacity(&mut self, capacity: usize);
}

/// Contiguous growable array type with checked cursors.
///
/// The buffer starts with at least [`MIN_CAPACITY`] slots and doubles each time an element
/// is pushed or inserted in a full vector. It never shrinks unless asked to with
/// [`shrink_to_fit`](Vector::shrink_to_fit).
///
/// Positions are given with [`Cursor`]s, which do not borrow the vector.
/// Each time the buffer is reallocated, the cursors created before become stale,
/// which is detected when they are used.
///
/// The maximum capacity depends on the metadata format used,
/// given as type parameter `M` implementing the [`Meta`] trait.
///
/// # Examples
///
/// ```
/// # use epoch_vec::{vector, Vector};
/// let mut v = vector![1, 2, 3, 4, 5, 6, 7];
/// assert_eq!(v.capacity(), 15);
///
/// v.push_back(8);
/// assert_eq!(v.capacity(), 15);
///
/// v.shrink_to_fit();
/// assert_eq!(v.capacity(), 8);
/// assert_eq!(v.to_string(), "[1, 2, 3, 4, 5, 6, 7, 8]");
/// ```
pub struct Vector<M: Meta, T> {
	/// Metadata storing the length and capacity of the array.
	meta: M,

	/// The owned storage, valid up to `meta.len()`.
	buffer: RawBuffer<T>,

	/// Identifies the current buffer, for cursors.
	tag: Tag
}

impl<M: Meta, T> Drop for Vector<M, T> {
	fn drop(&mut self) {
		unsafe {
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buffer.as_mut_ptr(), self.meta.len()));
			self.buffer.deallocate(self.meta.capacity())
		}
	}
}

impl<M: Meta, T> Vector<M, T> {
	/// Creates a new empty vector of capacity [`MIN_CAPACITY`].
	#[inline]
	pub fn new() -> Self {
		Self::with_capacity(MIN_CAPACITY)
	}

	/// Creates a new empty vector with a particular capacity.
	///
	/// The actual capacity of the created vector will be at least [`MIN_CAPACITY`].
	///
	/// # Panics
	///
	/// Panics if the capacity exceeds `M::MAX_LENGTH` or `isize::MAX` bytes.
	#[inline]
	pub fn with_capacity(capacity: usize) -> Self {
		Self::allocate(capacity.max(MIN_CAPACITY))
	}

	/// Allocate an empty vector of exactly `capacity` slots.
	fn allocate(capacity: usize) -> Self {
		if capacity > M::MAX_LENGTH {
			raw::capacity_overflow()
		}

		Vector {
			meta: M::new(0, capacity),
			buffer: RawBuffer::allocate(capacity),
			tag: Tag::fresh()
		}
	}

	/// Capacity given to a vector built from a list of `len` elements.
	fn list_capacity(len: usize) -> usize {
		match len.checked_mul(2).and_then(|n| n.checked_add(1)) {
			Some(capacity) => capacity,
			None => raw::capacity_overflow()
		}
	}

	/// Creates a vector by moving out the elements of `list`.
	///
	/// The capacity is `2 * list.len() + 1`.
	pub fn from_list(mut list: Vec<T>) -> Self {
		let len = list.len();
		let mut vector = Self::allocate(Self::list_capacity(len));

		unsafe {
			// The elements are moved, `list` now only frees its memory.
			list.set_len(0);
			ptr::copy_nonoverlapping(list.as_ptr(), vector.buffer.as_mut_ptr(), len);
			vector.meta.set_len(len)
		}

		vector
	}

	#[inline]
	pub(crate) fn tag(&self) -> Tag {
		self.tag
	}

	/// Returns the number of elements in the vector.
	#[inline]
	pub fn len(&self) -> usize {
		self.meta.len()
	}

	/// Returns the number of slots allocated.
	///
	/// This is always greater than or equal to the length.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.meta.capacity()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns a raw pointer to the vector's buffer.
	///
	/// The pointer is invalidated by any reallocation, just like cursors.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.buffer.as_ptr()
	}

	/// Extracts a slice containing the entire vector.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len()) }
	}

	/// Extracts a mutable slice of the entire vector.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len()) }
	}

	/// Moves the elements into a new buffer of exactly `new_capacity` slots.
	///
	/// Every cursor created before is made stale.
	fn try_relocate(&mut self, new_capacity: usize) -> Result<()> {
		if new_capacity > M::MAX_LENGTH {
			return Err(Error::CapacityOverflow)
		}

		let len = self.len();
		let capacity = self.capacity();
		unsafe {
			self.buffer.try_relocate(len, capacity, new_capacity)?;
		}
		self.meta.set_capacity(new_capacity);
		self.tag = self.tag.next();

		trace!(
			owner = self.tag.owner(),
			epoch = self.tag.epoch(),
			len,
			capacity,
			new_capacity,
			"relocated vector storage"
		);
		Ok(())
	}

	/// Makes sure the vector can hold at least `capacity` elements.
	///
	/// If `capacity` is greater than the current capacity, the buffer is reallocated to
	/// exactly `capacity` slots and every cursor on this vector becomes stale.
	/// Does nothing otherwise.
	///
	/// Returns an error, leaving the vector untouched, if the capacity exceeds
	/// `M::MAX_LENGTH` or `isize::MAX` bytes.
	pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
		if capacity > self.capacity() {
			self.try_relocate(capacity)
		} else {
			Ok(())
		}
	}

	/// Same as [`try_reserve`](Self::try_reserve), but panics on capacity overflow.
	#[inline]
	pub fn reserve(&mut self, capacity: usize) {
		raw::handle_reserve(self.try_reserve(capacity))
	}

	/// Doubles the capacity if the vector is full.
	fn grow_if_full(&mut self) {
		if self.len() == self.capacity() {
			match self.capacity().checked_mul(GROWTH_FACTOR) {
				Some(capacity) => self.reserve(capacity),
				None => raw::capacity_overflow()
			}
		}
	}

	/// Shrinks the buffer down to the length of the vector, but not below [`MIN_CAPACITY`].
	///
	/// Does nothing if the vector is full or its capacity does not exceed [`MIN_CAPACITY`].
	/// Otherwise, every cursor on this vector becomes stale.
	pub fn shrink_to_fit(&mut self) {
		if self.len() < self.capacity() && self.capacity() > MIN_CAPACITY {
			raw::handle_reserve(self.try_relocate(self.len().max(MIN_CAPACITY)))
		}
	}

	/// Removes all the elements.
	///
	/// The capacity is left unchanged and cursors are not made stale,
	/// although none of them is dereferenceable anymore.
	pub fn clear(&mut self) {
		let len = self.len();
		unsafe {
			// Set the length first so a panicking destructor cannot lead to a double drop.
			self.meta.set_len(0);
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buffer.as_mut_ptr(), len))
		}
	}

	/// Returns a reference to the element at `index`.
	///
	/// Fails with [`Error::OutOfRange`] if `index >= len`.
	pub fn at(&self, index: usize) -> Result<&T> {
		let len = self.len();
		if index < len {
			Ok(&self.as_slice()[index])
		} else {
			Err(rejected(Error::OutOfRange { index, len }))
		}
	}

	/// Returns a mutable reference to the element at `index`.
	///
	/// Fails with [`Error::OutOfRange`] if `index >= len`.
	pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
		let len = self.len();
		if index < len {
			Ok(&mut self.as_mut_slice()[index])
		} else {
			Err(rejected(Error::OutOfRange { index, len }))
		}
	}

	/// Appends an element at the end of the vector.
	///
	/// If the vector is full, its capacity is first doubled,
	/// making every cursor on this vector stale.
	pub fn push_back(&mut self, value: T) {
		self.grow_if_full();
		let len = self.len();
		unsafe {
			ptr::write(self.buffer.as_mut_ptr().add(len), value);
		}
		self.meta.set_len(len + 1)
	}

	/// Removes the last element and returns it.
	///
	/// Fails with [`Error::Empty`] if there is no element.
	/// The capacity is left unchanged.
	pub fn pop_back(&mut self) -> Result<T> {
		match self.len() {
			0 => Err(rejected(Error::Empty)),
			len => unsafe {
				self.meta.set_len(len - 1);
				Ok(ptr::read(self.buffer.as_ptr().add(len - 1)))
			}
		}
	}

	/// Offset designated by `position` in the current buffer, if it is not greater than `max`.
	fn position(&self, position: ConstCursor<T>, max: usize) -> Result<usize> {
		match position.offset_in(self.tag) {
			Some(offset) if offset <= max => Ok(offset),
			offset => Err(rejected(Error::InvalidPosition { offset, len: self.len() }))
		}
	}

	/// Inserts an element before `position`, shifting all elements after it to the right.
	///
	/// `position` must be a cursor on the current buffer of this vector,
	/// between the beginning and the end (included).
	/// Fails with [`Error::InvalidPosition`] otherwise, without modifying the vector.
	///
	/// If the vector is full, its capacity is first doubled,
	/// making every cursor on this vector stale.
	/// Returns a cursor on the inserted element.
	pub fn insert<C: Into<ConstCursor<T>>>(&mut self, position: C, value: T) -> Result<Cursor<T>> {
		let offset = self.position(position.into(), self.len())?;
		self.grow_if_full();

		let len = self.len();
		unsafe {
			let p = self.buffer.as_mut_ptr().add(offset);
			ptr::copy(p, p.add(1), len - offset);
			ptr::write(p, value);
		}
		self.meta.set_len(len + 1);

		Ok(Cursor::bound(self.tag, offset))
	}

	/// Removes the element at `position`, shifting all elements after it to the left.
	///
	/// `position` must be a dereferenceable cursor on this vector.
	/// Fails with [`Error::InvalidPosition`] otherwise, without modifying the vector.
	///
	/// Returns a cursor on the element that followed the removed one
	/// (or the end of the vector).
	pub fn erase<C: Into<ConstCursor<T>>>(&mut self, position: C) -> Result<Cursor<T>> {
		let position: ConstCursor<T> = position.into();
		let len = self.len();
		let offset = match len.checked_sub(1) {
			Some(last) => self.position(position, last)?,
			None => return Err(rejected(Error::InvalidPosition { offset: position.offset_in(self.tag), len }))
		};

		let removed = unsafe {
			let p = self.buffer.as_mut_ptr().add(offset);
			let removed = ptr::read(p);
			ptr::copy(p.add(1), p, len - offset - 1);
			removed
		};
		self.meta.set_len(len - 1);
		mem::drop(removed);

		Ok(Cursor::bound(self.tag, offset))
	}

	/// Cursor on the first slot.
	#[inline]
	pub fn begin(&self) -> Cursor<T> {
		Cursor::bound(self.tag, 0)
	}

	/// Cursor right after the last element.
	///
	/// It is never dereferenceable.
	#[inline]
	pub fn end(&self) -> Cursor<T> {
		Cursor::bound(self.tag, self.len())
	}

	/// Read-only cursor on the first slot.
	#[inline]
	pub fn cbegin(&self) -> ConstCursor<T> {
		ConstCursor::bound(self.tag, 0)
	}

	/// Read-only cursor right after the last element.
	#[inline]
	pub fn cend(&self) -> ConstCursor<T> {
		ConstCursor::bound(self.tag, self.len())
	}

	/// Replaces the content of this vector with the content of `source`.
	///
	/// The buffer of `source` is taken over, the old buffer and its elements are dropped.
	/// Every cursor on this vector becomes stale.
	pub fn assign(&mut self, mut source: Self) {
		mem::swap(&mut self.meta, &mut source.meta);
		mem::swap(&mut self.buffer, &mut source.buffer);
		self.tag = self.tag.next();

		trace!(
			owner = self.tag.owner(),
			epoch = self.tag.epoch(),
			len = self.len(),
			capacity = self.capacity(),
			"assigned vector storage"
		);
	}
}

impl<M: Meta, T: Clone> Vector<M, T> {
	/// Creates a vector by cloning the elements of `list`.
	///
	/// The capacity is `2 * list.len() + 1`.
	#[inline]
	pub fn from_slice(list: &[T]) -> Self {
		Self::clone_with_capacity(list, Self::list_capacity(list.len()))
	}

	fn clone_with_capacity(items: &[T], capacity: usize) -> Self {
		struct DropGuard<'a, M: Meta, T> {
			vector: &'a mut Vector<M, T>,
			num_init: usize
		}

		impl<'a, M: Meta, T> Drop for DropGuard<'a, M, T> {
			#[inline]
			fn drop(&mut self) {
				// only the items cloned so far are dropped with the vector.
				self.vector.meta.set_len(self.num_init)
			}
		}

		debug_assert!(items.len() <= capacity);
		let mut vector = Self::allocate(capacity);
		let mut guard = DropGuard { vector: &mut vector, num_init: 0 };

		for (i, item) in items.iter().enumerate() {
			unsafe {
				ptr::write(guard.vector.buffer.as_mut_ptr().add(i), item.clone());
			}
			guard.num_init = i + 1;
		}

		mem::drop(guard);
		vector
	}
}

/// Logs an error returned to the caller.
#[inline]
fn rejected(error: Error) -> Error {
	debug!(%error, "vector operation rejected");
	error
}

unsafe impl<M: Meta + Send, T: Send> Send for Vector<M, T> {}
unsafe impl<M: Meta + Sync, T: Sync> Sync for Vector<M, T> {}

impl<M: Meta, T> Default for Vector<M, T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Meta, T: Clone> Clone for Vector<M, T> {
	/// Deep copy, with the same capacity as `self`.
	fn clone(&self) -> Self {
		Self::clone_with_capacity(self.as_slice(), self.capacity())
	}

	/// Copy-and-swap: `self` takes a copy of `source`, every cursor on `self` becomes stale.
	fn clone_from(&mut self, source: &Self) {
		self.assign(source.clone())
	}
}

impl<M: Meta, T> Deref for Vector<M, T> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<M: Meta, T> DerefMut for Vector<M, T> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<M: Meta, T> Index<usize> for Vector<M, T> {
	type Output = T;

	/// # Panics
	///
	/// Panics with [`Error::OutOfRange`] if `index >= len`.
	#[inline]
	fn index(&self, index: usize) -> &T {
		match self.at(index) {
			Ok(item) => item,
			Err(e) => panic!("{}", e)
		}
	}
}

impl<M: Meta, T> IndexMut<usize> for Vector<M, T> {
	#[inline]
	fn index_mut(&mut self, index: usize) -> &mut T {
		match self.at_mut(index) {
			Ok(item) => item,
			Err(e) => panic!("{}", e)
		}
	}
}

// Ranges go straight to the slice.
macro_rules! impl_range_index {
	($($range:ty),*) => {
		$(
			impl<M: Meta, T> Index<$range> for Vector<M, T> {
				type Output = [T];

				#[inline]
				fn index(&self, range: $range) -> &[T] {
					&self.as_slice()[range]
				}
			}

			impl<M: Meta, T> IndexMut<$range> for Vector<M, T> {
				#[inline]
				fn index_mut(&mut self, range: $range) -> &mut [T] {
					&mut self.as_mut_slice()[range]
				}
			}
		)*
	}
}

impl_range_index!(
	ops::Range<usize>,
	ops::RangeFrom<usize>,
	ops::RangeTo<usize>,
	ops::RangeFull,
	ops::RangeInclusive<usize>,
	ops::RangeToInclusive<usize>
);

impl<'v, M: Meta, T> IntoIterator for &'v Vector<M, T> {
	type Item = &'v T;
	type IntoIter = slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_slice().iter()
	}
}

impl<'v, M: Meta, T> IntoIterator for &'v mut Vector<M, T> {
	type Item = &'v mut T;
	type IntoIter = slice::IterMut<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_mut_slice().iter_mut()
	}
}

/// An iterator that moves out of a vector.
pub struct IntoIter<T> {
	buffer: RawBuffer<T>,
	capacity: usize,
	offset: usize,
	len: usize
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		if self.offset < self.len {
			let i = self.offset;
			self.offset += 1;
			Some(unsafe { ptr::read(self.buffer.as_ptr().add(i)) })
		} else {
			None
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.len - self.offset;
		(remaining, Some(remaining))
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
	fn drop(&mut self) {
		unsafe {
			// only drop remaining elements.
			let remaining = ptr::slice_from_raw_parts_mut(self.buffer.as_mut_ptr().add(self.offset), self.len - self.offset);
			ptr::drop_in_place(remaining);
			self.buffer.deallocate(self.capacity)
		}
	}
}

unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<M: Meta, T> IntoIterator for Vector<M, T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		unsafe {
			let buffer = ptr::read(&self.buffer); // this is safe because `self.buffer` is never used ever after.
			let iter = IntoIter {
				buffer,
				capacity: self.capacity(),
				offset: 0,
				len: self.len()
			};
			mem::forget(self); // there is nothing left to drop in `self`, we can forget it.
			iter
		}
	}
}

impl<M: Meta, T> Extend<T> for Vector<M, T> {
	#[inline]
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterator: I) {
		for element in iterator {
			self.push_back(element)
		}
	}
}

impl<M: Meta, T> FromIterator<T> for Vector<M, T> {
	/// Collects the elements, then builds the vector as from a list.
	fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
		Self::from_list(iterator.into_iter().collect())
	}
}

impl<M: Meta, T> From<Vec<T>> for Vector<M, T> {
	#[inline]
	fn from(list: Vec<T>) -> Self {
		Self::from_list(list)
	}
}

impl<M: Meta, T, const N: usize> From<[T; N]> for Vector<M, T> {
	#[inline]
	fn from(list: [T; N]) -> Self {
		Self::from_list(Vec::from(list))
	}
}

impl<'a, M: Meta, T: Clone> From<&'a [T]> for Vector<M, T> {
	#[inline]
	fn from(list: &'a [T]) -> Self {
		Self::from_slice(list)
	}
}

impl<M: Meta, T: fmt::Debug> fmt::Debug for Vector<M, T> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

/// Renders the elements as `[a, b, c]`.
impl<M: Meta, T: fmt::Display> fmt::Display for Vector<M, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[")?;
		for (i, item) in self.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			fmt::Display::fmt(item, f)?;
		}
		write!(f, "]")
	}
}

impl<M: Meta, T> AsRef<[T]> for Vector<M, T> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<M: Meta, T> AsMut<[T]> for Vector<M, T> {
	#[inline]
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

macro_rules! impl_slice_eq1 {
	([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
		impl<$($vars)*> PartialEq<$rhs> for $lhs where T: PartialEq<U> {
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { AsRef::<[_]>::as_ref(self) == AsRef::<[_]>::as_ref(other) }
			#[inline]
			fn ne(&self, other: &$rhs) -> bool { AsRef::<[_]>::as_ref(self) != AsRef::<[_]>::as_ref(other) }
		}
	}
}

impl_slice_eq1! { [T, U, O: Meta, P: Meta] Vector<O, T>, Vector<P, U> }
impl_slice_eq1! { [T, U, M: Meta] Vector<M, T>, Vec<U> }
impl_slice_eq1! { [T, U, M: Meta] Vec<T>, Vector<M, U> }
impl_slice_eq1! { [T, U, M: Meta] Vector<M, T>, &[U] }
impl_slice_eq1! { [T, U, M: Meta] Vector<M, T>, &mut [U] }
impl_slice_eq1! { [T, U, M: Meta] &[T], Vector<M, U> }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] Vector<M, T>, [U; N] }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] Vector<M, T>, &[U; N] }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] [T; N], Vector<M, U> }

impl<M: Meta, T: Eq> Eq for Vector<M, T> {}

#[cfg(test)]
mod tests {
	use std::{
		cell::Cell,
		panic::{
			self,
			AssertUnwindSafe
		},
		rc::Rc
	};
	use crate::{
		vector,
		Error,
		Vector
	};
	use super::*;

	#[test]
	fn capacity_floor() {
		assert_eq!(Vector::<u8>::new().capacity(), MIN_CAPACITY);
		assert_eq!(Vector::<u8>::with_capacity(0).capacity(), 5);
		assert_eq!(Vector::<u8>::with_capacity(4).capacity(), 5);
		assert_eq!(Vector::<u8>::with_capacity(6).capacity(), 6);
		assert!(Vector::<u8>::new().is_empty());
	}

	#[test]
	fn list_capacity() {
		let v = vector![1, 2, 3, 4, 5, 6, 7];
		assert_eq!(v.len(), 7);
		assert_eq!(v.capacity(), 15);

		let single = vector![1];
		assert_eq!(single.capacity(), 3);

		let empty: Vector<u8> = vector![];
		assert_eq!(empty.capacity(), 1);

		let cloned: Vector<String> = Vector::from_slice(&["a".to_string(), "b".to_string()]);
		assert_eq!(cloned.capacity(), 5);
		assert_eq!(cloned, ["a", "b"]);
	}

	#[test]
	fn push_doubles_when_full() {
		let mut v: Vector<usize> = Vector::new();
		for i in 0..5 {
			v.push_back(i);
		}
		assert_eq!(v.capacity(), 5);
		v.push_back(5);
		assert_eq!(v.capacity(), 10);
		for i in 6..11 {
			v.push_back(i);
		}
		assert_eq!(v.capacity(), 20);
		assert_eq!(v.len(), 11);
		assert!(v.iter().copied().eq(0..11));
	}

	#[test]
	fn growth_from_a_tiny_list() {
		let mut v: Vector<u8> = vector![];
		v.push_back(1);
		assert_eq!(v.capacity(), 1);
		v.push_back(2);
		assert_eq!(v.capacity(), 2);
		v.push_back(3);
		assert_eq!(v.capacity(), 4);
	}

	#[test]
	fn reserve_is_exact_and_never_shrinks() {
		let mut v = vector![1, 2];
		v.reserve(3);
		assert_eq!(v.capacity(), 5);
		v.reserve(42);
		assert_eq!(v.capacity(), 42);
		assert_eq!(v, [1, 2]);
	}

	#[test]
	fn reserve_past_the_limit() {
		let mut v: Vector<u64> = Vector::new();
		assert_eq!(v.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
		assert_eq!(v.capacity(), 5);
		let begin = v.begin();
		assert_eq!(begin, v.begin());
	}

	#[test]
	#[should_panic(expected = "capacity overflow")]
	fn reserve_panics_past_the_limit() {
		let mut v: Vector<u64> = Vector::new();
		v.reserve(usize::MAX);
	}

	#[test]
	fn shrink_to_fit() {
		let mut v = vector![1, 2, 3, 4, 5, 6, 7];
		v.push_back(8);
		v.shrink_to_fit();
		assert_eq!(v.capacity(), 8);

		v.clear();
		v.shrink_to_fit();
		assert_eq!(v.capacity(), MIN_CAPACITY);

		let mut small = vector![1];
		small.shrink_to_fit();
		assert_eq!(small.capacity(), 3);
	}

	#[test]
	fn shrink_does_nothing_when_full() {
		let mut v: Vector<u8> = Vector::with_capacity(8);
		v.extend(0..8);
		let begin = v.begin();
		v.shrink_to_fit();
		assert_eq!(v.capacity(), 8);
		assert_eq!(begin.get(&v), Ok(&0));
	}

	#[test]
	fn shrink_makes_cursors_stale() {
		let mut v: Vector<u8> = Vector::with_capacity(10);
		v.push_back(1);
		let begin = v.begin();
		v.shrink_to_fit();
		assert_eq!(begin.get(&v), Err(Error::DanglingCursor));
	}

	#[test]
	fn clear_keeps_capacity() {
		let mut v = vector![1, 2, 3];
		let capacity = v.capacity();
		v.clear();
		assert_eq!(v.len(), 0);
		assert_eq!(v.capacity(), capacity);
		for i in 0..capacity {
			v.push_back(i as i32);
		}
		assert_eq!(v.capacity(), capacity);
		assert_eq!(v[0], 0);
	}

	#[test]
	fn indexed_access() {
		let mut v = vector![1, 2, 3];
		assert_eq!(v.at(2), Ok(&3));
		assert_eq!(v.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
		*v.at_mut(0).unwrap() = 10;
		v[1] = 20;
		assert_eq!(v, [10, 20, 3]);
		assert_eq!(v.at_mut(3), Err(Error::OutOfRange { index: 3, len: 3 }));
	}

	#[test]
	#[should_panic(expected = "index 3 out of range for vector of length 3")]
	fn index_past_the_end_panics() {
		let v = vector![1, 2, 3];
		let _item = &v[3];
	}

	#[test]
	fn range_indexing() {
		let mut v = vector![1, 2, 3, 4, 5];
		assert_eq!(v[1..3], [2, 3]);
		assert_eq!(v[3..], [4, 5]);
		assert_eq!(v[..2], [1, 2]);
		assert_eq!(v[..=1], [1, 2]);
		assert_eq!(v[1..=2], [2, 3]);
		assert_eq!(v[..].len(), 5);

		v[..2].copy_from_slice(&[10, 20]);
		v[3..].reverse();
		assert_eq!(v, [10, 20, 3, 5, 4]);
	}

	#[test]
	#[should_panic]
	fn range_past_the_end_panics() {
		let v = vector![1, 2, 3];
		let _slice = &v[2..4];
	}

	#[test]
	fn compares_with_other_sequences() {
		let v = vector![1, 2, 3];
		let lean: crate::lean::Vector<i32> = crate::lean::Vector::from_slice(&[1, 2, 3]);
		assert_eq!(v, lean);
		assert_eq!(v, vec![1, 2, 3]);
		assert_eq!(vec![1, 2, 3], v);
		assert_eq!(v, &[1, 2, 3][..]);
		assert_eq!(&[1, 2, 3][..], v);
		assert_eq!([1, 2, 3], v);
		assert_eq!(v, &[1, 2, 3]);
		assert_ne!(v, [1, 2]);
		assert!(v != vector![1, 2, 4]);
	}

	#[test]
	fn pop_back() {
		let mut v: Vector<i32> = Vector::new();
		assert_eq!(v.pop_back(), Err(Error::Empty));
		v.push_back(10);
		assert_eq!(v.pop_back(), Ok(10));
		assert_eq!(v.len(), 0);
		assert_eq!(v.capacity(), MIN_CAPACITY);
	}

	#[test]
	fn insert_and_erase() {
		let mut v = vector!['a', 'b', 'c'];
		let mut position = v.begin();
		position.advance(&v);

		let inserted = v.insert(position, 'x').unwrap();
		assert_eq!(v, ['a', 'x', 'b', 'c']);
		assert_eq!(inserted.get(&v), Ok(&'x'));
		assert_eq!(inserted.offset(), Some(1));

		let next = v.erase(inserted).unwrap();
		assert_eq!(v, ['a', 'b', 'c']);
		assert_eq!(next.get(&v), Ok(&'b'));
	}

	#[test]
	fn insert_at_both_ends() {
		let mut v = vector![2];
		v.insert(v.cbegin(), 1).unwrap();
		let last = v.insert(v.end(), 3).unwrap();
		assert_eq!(v, [1, 2, 3]);
		assert_eq!(last.get(&v), Ok(&3));
	}

	#[test]
	fn insert_into_full_vector_grows() {
		let mut v = vector![1, 2];
		v.push_back(3);
		v.push_back(4);
		v.push_back(5);
		assert_eq!(v.len(), v.capacity());

		let begin = v.begin();
		let inserted = v.insert(begin, 0).unwrap();
		assert_eq!(v.capacity(), 10);
		assert_eq!(v, [0, 1, 2, 3, 4, 5]);
		assert_eq!(inserted, v.begin());
		assert_eq!(begin.get(&v), Err(Error::DanglingCursor));
	}

	#[test]
	fn insert_rejects_foreign_and_stale_cursors() {
		let mut v = vector![1, 2];
		let other = vector![1, 2];

		assert_eq!(v.insert(other.begin(), 0), Err(Error::InvalidPosition { offset: None, len: 2 }));
		assert_eq!(v.insert(Cursor::<i32>::new(), 0), Err(Error::InvalidPosition { offset: None, len: 2 }));

		let stale = v.end();
		v.reserve(100);
		assert_eq!(v.insert(stale, 0), Err(Error::InvalidPosition { offset: None, len: 2 }));
		assert_eq!(v, [1, 2]);
	}

	#[test]
	fn insert_rejects_positions_past_the_end() {
		let mut v = vector![1, 2, 3];
		let end = v.end();
		v.pop_back().unwrap();
		assert_eq!(v.insert(end, 0), Err(Error::InvalidPosition { offset: Some(3), len: 2 }));
		assert_eq!(v, [1, 2]);
	}

	#[test]
	fn erase_rejects_the_end() {
		let mut v = vector![1];
		assert_eq!(v.erase(v.end()), Err(Error::InvalidPosition { offset: Some(1), len: 1 }));
		let end = v.erase(v.begin()).unwrap();
		assert_eq!(end, v.end());
		assert!(v.is_empty());
		assert_eq!(v.erase(v.begin()), Err(Error::InvalidPosition { offset: Some(0), len: 0 }));
	}

	#[test]
	fn clone_is_deep() {
		let mut v: Vector<String> = Vector::with_capacity(12);
		v.push_back("a".to_string());
		v.push_back("b".to_string());

		let mut copy = v.clone();
		assert_eq!(copy.capacity(), 12);
		assert_eq!(copy, v);

		copy[0].push('!');
		copy.push_back("c".to_string());
		assert_eq!(v, ["a", "b"]);
		assert_eq!(copy, ["a!", "b", "c"]);
	}

	#[test]
	fn assignment_swaps_in_a_copy() {
		let mut v = vector![1, 2, 3];
		let source = vector![4, 5];
		let begin = v.begin();

		v.clone_from(&source);
		assert_eq!(v, [4, 5]);
		assert_eq!(v.capacity(), source.capacity());
		assert_eq!(begin.get(&v), Err(Error::DanglingCursor));
		assert_eq!(v.begin().get(&v), Ok(&4));
		assert_eq!(source.begin().get(&v), Err(Error::DanglingCursor));

		v.assign(vector![6]);
		assert_eq!(v, [6]);
	}

	#[test]
	fn display() {
		assert_eq!(vector![1, 2, 3].to_string(), "[1, 2, 3]");
		assert_eq!(vector![1].to_string(), "[1]");
		assert_eq!(Vector::<u8>::new().to_string(), "[]");
		assert_eq!(format!("{:?}", vector!["a"]), "[\"a\"]");
	}

	#[test]
	fn owned_iteration() {
		let v: Vector<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
		assert_eq!(v.capacity(), 7);
		let mut iter = v.into_iter();
		assert_eq!(iter.len(), 3);
		assert_eq!(iter.next().as_deref(), Some("a"));
		// the remaining elements are dropped with the iterator.
	}

	#[derive(Clone)]
	struct Counted(Rc<Cell<usize>>);

	impl Drop for Counted {
		fn drop(&mut self) {
			self.0.set(self.0.get() + 1)
		}
	}

	#[test]
	fn every_element_is_dropped_once() {
		let drops = Rc::new(Cell::new(0));
		{
			let mut v: Vector<Counted> = Vector::new();
			for _ in 0..12 {
				v.push_back(Counted(drops.clone()));
			}
			mem::drop(v.pop_back().unwrap());
			assert_eq!(drops.get(), 1);

			let second = {
				let mut it = v.begin();
				it.advance(&v);
				it
			};
			v.erase(second).unwrap();
			assert_eq!(drops.get(), 2);

			v.clear();
			assert_eq!(drops.get(), 12);

			v.push_back(Counted(drops.clone()));
			v.push_back(Counted(drops.clone()));
			let mut iter = v.into_iter();
			mem::drop(iter.next());
		}
		assert_eq!(drops.get(), 14);
	}

	struct Bomb {
		clones: Rc<Cell<usize>>,
		drops: Rc<Cell<usize>>
	}

	impl Clone for Bomb {
		fn clone(&self) -> Bomb {
			if self.clones.get() == 2 {
				panic!("boom")
			}
			self.clones.set(self.clones.get() + 1);
			Bomb { clones: self.clones.clone(), drops: self.drops.clone() }
		}
	}

	impl Drop for Bomb {
		fn drop(&mut self) {
			self.drops.set(self.drops.get() + 1)
		}
	}

	#[test]
	fn panicking_clone_drops_the_partial_copy() {
		let clones = Rc::new(Cell::new(0));
		let drops = Rc::new(Cell::new(0));
		let v: Vector<Bomb> = (0..4).map(|_| Bomb { clones: clones.clone(), drops: drops.clone() }).collect();

		let result = panic::catch_unwind(AssertUnwindSafe(|| v.clone()));
		assert!(result.is_err());
		assert_eq!(drops.get(), 2);
		assert_eq!(v.len(), 4);
	}

	#[test]
	fn zero_sized_elements() {
		let mut v: Vector<()> = Vector::new();
		for _ in 0..6 {
			v.push_back(());
		}
		assert_eq!(v.len(), 6);
		assert_eq!(v.capacity(), 10);
		assert_eq!(v.pop_back(), Ok(()));
		v.shrink_to_fit();
		assert_eq!(v.capacity(), 5);
	}
}
