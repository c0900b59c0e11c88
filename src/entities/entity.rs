use std::hash::{Hash, Hasher};
use std::fmt;

/// A unique handle to an entity.
///
/// The handle is only valid while `generation` matches the generation the
/// [registry](crate::entities::EntityRegistry) stores for `index`.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entity {
	pub(crate) index: u32,
	pub(crate) generation: u32,
}

impl Entity {
	#[inline(always)]
	pub const fn index(&self) -> u32 {
		self.index
	}

	#[inline(always)]
	pub const fn generation(&self) -> u32 {
		self.generation
	}

	/// Pack the handle into a single integer.
	#[inline(always)]
	pub const fn to_bits(&self) -> u64 {
		((self.generation as u64) << 32) | self.index as u64
	}
}

impl Hash for Entity {
	#[inline(always)]
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_u64(self.to_bits())
	}
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Entity({}v{})", self.index, self.generation)
	}
}
