use crate::data_structures::BitField;
use crate::error::{EcsError, EcsResult};
use crate::entities::Entity;

/// Allocates and recycles [entity](Entity) handles.
///
/// Each index carries a generation counter that starts at 0 and is bumped when the
/// entity living there is destroyed, so every copy of the old handle goes stale at once.
#[derive(Default)]
pub struct EntityRegistry {
	generations: Vec<u32>,
	available: Vec<u32>,
	alive: BitField,
	alive_count: usize,
}

impl EntityRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			generations: Vec::with_capacity(capacity),
			available: Vec::new(),
			alive: BitField::with_capacity(capacity),
			alive_count: 0,
		}
	}

	/// Creates a new [entity](Entity), reusing a previously destroyed index when one is available.
	pub fn create(&mut self) -> Entity {
		let index = match self.available.pop() {
			Some(index) => index,
			None => {
				self.generations.push(0);
				(self.generations.len() - 1) as u32
			},
		};

		self.alive.set(index as usize, true);
		self.alive_count += 1;

		Entity {
			index,
			generation: self.generations[index as usize],
		}
	}

	/// Creates `count` [entities](Entity) at once.
	pub fn create_many(&mut self, count: usize) -> Vec<Entity> {
		if count > self.available.len() {
			self.generations.reserve(count - self.available.len());
		}
		(0..count).map(|_| self.create()).collect()
	}

	/// Destroys an [entity](Entity), invalidating every copy of its handle.
	///
	/// A stale handle leaves the registry untouched and reports [EcsError::StaleHandle].
	/// An index whose generation reaches `u32::MAX` is retired instead of recycled,
	/// so old handles can never become valid again.
	pub fn destroy(&mut self, entity: Entity) -> EcsResult<()> {
		if !self.is_alive(entity) {
			log::warn!("attempted to destroy stale handle {entity}");
			return Err(EcsError::StaleHandle(entity));
		}

		let index = entity.index as usize;
		self.alive.set(index, false);
		self.alive_count -= 1;

		match self.generations[index].checked_add(1) {
			Some(generation) => {
				self.generations[index] = generation;
				self.available.push(entity.index);
			},
			None => log::warn!("retiring index {index}: its generation counter is exhausted"),
		}
		Ok(())
	}

	/// Checks whether `entity` still refers to a live entity.
	#[inline(always)]
	pub fn is_alive(&self, entity: Entity) -> bool {
		match self.generations.get(entity.index as usize) {
			Some(generation) => *generation == entity.generation && self.alive.get(entity.index as usize),
			None => false,
		}
	}

	/// Like [is_alive](Self::is_alive), but reports a stale handle as an error.
	pub fn validate(&self, entity: Entity) -> EcsResult<()> {
		match self.is_alive(entity) {
			true => Ok(()),
			false => Err(EcsError::StaleHandle(entity)),
		}
	}

	/// The generation currently stored for `index`.
	pub fn generation_of(&self, index: u32) -> Option<u32> {
		self.generations.get(index as usize).copied()
	}

	/// Iterates over all live [entities](Entity) in index order.
	pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
		self.alive.iter_ones().map(|index| Entity {
			index: index as u32,
			generation: self.generations[index],
		})
	}

	#[cfg(test)]
	pub(crate) fn set_generation(&mut self, index: u32, generation: u32) {
		self.generations[index as usize] = generation;
	}

	/// The number of live [entities](Entity).
	#[inline(always)]
	pub fn len(&self) -> usize {
		self.alive_count
	}

	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.alive_count == 0
	}

	/// The number of indices ever handed out.
	pub fn capacity(&self) -> usize {
		self.generations.len()
	}
}
