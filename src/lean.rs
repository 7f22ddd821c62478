/// Length and capacity packed in a single `usize`, 32 bits each.
#[derive(Clone, Copy, Debug)]
pub struct Meta {
	data: usize
}

const CAP_MASK: usize = std::u32::MAX as usize;
const LEN_MASK: usize = (std::u32::MAX as usize) << 32;

impl crate::generic::Meta for Meta {
	const MAX_LENGTH: usize = std::u32::MAX as usize;

	fn new(len: usize, capacity: usize) -> Self {
		assert!(len <= Self::MAX_LENGTH);
		assert!(capacity <= Self::MAX_LENGTH);

		Meta {
			data: len << 32 | capacity
		}
	}

	fn len(&self) -> usize {
		self.data >> 32
	}

	fn capacity(&self) -> usize {
		self.data & CAP_MASK
	}

	fn set_len(&mut self, len: usize) {
		assert!(len <= Self::MAX_LENGTH);
		self.data = (len << 32) | (self.data & CAP_MASK)
	}

	fn set_capacity(&mut self, capacity: usize) {
		assert!(capacity <= Self::MAX_LENGTH);
		self.data = (self.data & LEN_MASK) | capacity
	}
}

pub type Vector<T> = crate::generic::Vector<Meta, T>;
