use core::{
	alloc::Layout,
	marker::PhantomData,
	mem,
	ptr::{
		self,
		NonNull
	}
};
use std::alloc::{
	self as global,
	handle_alloc_error
};
use crate::Error;

/// A low-level owned buffer of `T` slots.
///
/// This type does not in anyway inspect the memory that it manages.
/// It does not know its own capacity: the capacity is kept by the owner
/// (in its [`Meta`](crate::generic::Meta)) and handed back on every call that needs it.
/// It is never freed automatically, and it *won't* try to drop its contents.
/// It is up to the user of `RawBuffer` to handle the actual things *stored* inside of it
/// and to call [`deallocate`](RawBuffer::deallocate) exactly once.
pub struct RawBuffer<T> {
	ptr: NonNull<T>,
	marker: PhantomData<T>
}

impl<T> RawBuffer<T> {
	/// A buffer that owns no memory.
	///
	/// Used for zero-sized types, and as a placeholder
	/// for buffers that have already been given away.
	#[inline]
	pub const fn dangling() -> Self {
		RawBuffer {
			ptr: NonNull::dangling(),
			marker: PhantomData
		}
	}

	/// Allocates uninitialized room for exactly `capacity` elements.
	///
	/// Zero-sized types never allocate.
	pub fn try_allocate(capacity: usize) -> Result<Self, Error> {
		if mem::size_of::<T>() == 0 || capacity == 0 {
			return Ok(Self::dangling())
		}

		let layout = Layout::array::<T>(capacity).map_err(|_| Error::CapacityOverflow)?;
		alloc_guard(layout.size())?;

		// SAFETY: the layout has a non-zero size.
		let ptr = unsafe { global::alloc(layout) };
		match NonNull::new(ptr as *mut T) {
			Some(ptr) => Ok(RawBuffer { ptr, marker: PhantomData }),
			None => handle_alloc_error(layout)
		}
	}

	/// Same as `try_allocate` but panics on capacity overflow.
	#[inline]
	pub fn allocate(capacity: usize) -> Self {
		handle_reserve(Self::try_allocate(capacity))
	}

	/// Returns a raw pointer to the first slot.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	/// Returns a raw mutable pointer to the first slot.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Moves the first `len` elements into a fresh allocation of exactly `new_capacity`
	/// slots, then frees the old allocation.
	///
	/// On error, the buffer is left untouched.
	///
	/// ## Safety
	///
	/// `capacity` must be the capacity this buffer was allocated with,
	/// the first `len` slots must be initialized and `len <= new_capacity`.
	pub unsafe fn try_relocate(&mut self, len: usize, capacity: usize, new_capacity: usize) -> Result<(), Error> {
		debug_assert!(len <= capacity && len <= new_capacity);

		let mut new_buffer = Self::try_allocate(new_capacity)?;
		ptr::copy_nonoverlapping(self.as_ptr(), new_buffer.as_mut_ptr(), len);
		self.deallocate(capacity);
		*self = new_buffer;
		Ok(())
	}

	/// Frees the allocation, without dropping anything.
	///
	/// ## Safety
	///
	/// `capacity` must be the capacity this buffer was allocated with.
	/// The buffer must not be used afterward.
	pub unsafe fn deallocate(&mut self, capacity: usize) {
		if mem::size_of::<T>() != 0 && capacity != 0 {
			let align = mem::align_of::<T>();
			let size = mem::size_of::<T>() * capacity;
			let layout = Layout::from_size_align_unchecked(size, align);
			global::dealloc(self.ptr.as_ptr() as *mut u8, layout)
		}

		self.ptr = NonNull::dangling()
	}
}

// Central function for reserve error handling.
#[inline]
pub(crate) fn handle_reserve<T>(result: Result<T, Error>) -> T {
	match result {
		Ok(t) => t,
		Err(_) => capacity_overflow()
	}
}

// We need to guarantee the following:
// * We don't ever allocate `> isize::MAX` byte-size objects.
// * We don't overflow `usize::MAX` and actually allocate too little.
//
// On 64-bit we just need to check for overflow since trying to allocate
// `> isize::MAX` bytes will surely fail. On 32-bit and 16-bit we need to add
// an extra guard for this in case we're running on a platform which can use
// all 4GB in user-space, e.g., PAE or x32.
#[inline]
fn alloc_guard(alloc_size: usize) -> Result<(), Error> {
	if usize::BITS < 64 && alloc_size > isize::MAX as usize {
		Err(Error::CapacityOverflow)
	} else {
		Ok(())
	}
}

// One central function responsible for reporting capacity overflows.
pub(crate) fn capacity_overflow() -> ! {
	panic!("{}", Error::CapacityOverflow);
}
