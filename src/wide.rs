/// Length and capacity stored as two `usize`, just like `Vec`.
#[derive(Clone, Copy, Debug)]
pub struct Meta {
	len: usize,
	capacity: usize
}

impl crate::generic::Meta for Meta {
	const MAX_LENGTH: usize = std::usize::MAX;

	fn new(len: usize, capacity: usize) -> Self {
		Meta {
			len,
			capacity
		}
	}

	fn len(&self) -> usize {
		self.len
	}

	fn capacity(&self) -> usize {
		self.capacity
	}

	fn set_len(&mut self, len: usize) {
		self.len = len
	}

	fn set_capacity(&mut self, capacity: usize) {
		self.capacity = capacity
	}
}

pub type Vector<T> = crate::generic::Vector<Meta, T>;
