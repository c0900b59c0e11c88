use crate::data_structures::BitField;
use crate::error::{EcsError, EcsResult};
use std::mem::size_of;

/// Lifecycle hooks for objects living in an [ObjectPool].
///
/// The pool never resets an object by itself; whatever state a released object holds
/// is still there the next time its slot is acquired, unless these hooks clear it.
pub trait Poolable: Default {
	/// Called when the slot is handed out by [ObjectPool::acquire].
	fn init(&mut self) {}

	/// Called when the slot is given back through [ObjectPool::release].
	fn recycle(&mut self) {}
}

/// A handle to a slot of an [ObjectPool].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
	index: usize,
}

impl PoolHandle {
	#[inline(always)]
	pub const fn index(&self) -> usize {
		self.index
	}
}

/// A fixed-capacity slab of uniformly sized objects.
///
/// One contiguous object block and one in-use flag per slot are allocated up front.
/// The capacity never changes: acquiring from a full pool fails instead of growing.
pub struct ObjectPool<T: Poolable> {
	objects: Box<[T]>,
	in_use: BitField,
	used: usize,
}

impl<T: Poolable> ObjectPool<T> {
	pub fn new(capacity: usize) -> Self {
		Self {
			objects: (0..capacity).map(|_| T::default()).collect(),
			in_use: BitField::with_capacity(capacity),
			used: 0,
		}
	}

	/// Mark the first free slot as in use and return a handle to it.
	pub fn acquire(&mut self) -> EcsResult<PoolHandle> {
		let index = match self.in_use.first_unset(self.capacity()) {
			Some(index) => index,
			None => {
				log::warn!("object pool of {} exhausted", self.capacity());
				return Err(EcsError::CapacityExhausted {
					capacity: self.capacity(),
				});
			},
		};

		self.in_use.set(index, true);
		self.used += 1;
		self.objects[index].init();
		Ok(PoolHandle { index })
	}

	/// Give a slot back to the pool. Releasing a slot that is already free does nothing.
	pub fn release(&mut self, handle: PoolHandle) -> EcsResult<()> {
		if !self.is_in_use(handle)? {
			return Ok(());
		}

		self.objects[handle.index].recycle();
		self.in_use.set(handle.index, false);
		self.used -= 1;
		Ok(())
	}

	pub fn is_in_use(&self, handle: PoolHandle) -> EcsResult<bool> {
		self.check(handle)?;
		Ok(self.in_use.get(handle.index))
	}

	/// The object behind `handle`, if its slot is in use.
	pub fn get(&self, handle: PoolHandle) -> Option<&T> {
		match self.in_use.get(handle.index) {
			true => self.objects.get(handle.index),
			false => None,
		}
	}

	pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
		match self.in_use.get(handle.index) {
			true => self.objects.get_mut(handle.index),
			false => None,
		}
	}

	#[inline(always)]
	pub fn capacity(&self) -> usize {
		self.objects.len()
	}

	#[inline(always)]
	pub fn in_use_count(&self) -> usize {
		self.used
	}

	#[inline(always)]
	pub fn available(&self) -> usize {
		self.capacity() - self.used
	}

	/// Size of the object block in bytes.
	pub fn object_block_size(&self) -> usize {
		self.capacity() * size_of::<T>()
	}

	/// Number of in-use flags, one per slot.
	pub fn flag_block_size(&self) -> usize {
		self.capacity()
	}

	fn check(&self, handle: PoolHandle) -> EcsResult<()> {
		match handle.index < self.capacity() {
			true => Ok(()),
			false => Err(EcsError::IndexOutOfRange {
				index: handle.index,
				len: self.capacity(),
			}),
		}
	}
}
