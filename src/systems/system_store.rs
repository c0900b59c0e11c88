use crate::systems::AnySystem;
use crate::entities::Entity;
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use std::any::TypeId;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

pub(crate) struct SystemSlot {
	pub type_id: TypeId,
	pub system: Box<dyn AnySystem>,
	pub tracked: Vec<Entity>,
}

/// Holds at most one instance per [System](crate::systems::System) type, in registration order.
pub(crate) struct SystemStore {
	indices: HashMap<TypeId, usize, Hasher>,
	slots: Vec<SystemSlot>,
}

impl SystemStore {
	pub fn new() -> Self {
		Self {
			indices: HashMap::default(),
			slots: Vec::default(),
		}
	}

	#[inline(always)]
	pub fn contains(&self, type_id: TypeId) -> bool {
		self.indices.contains_key(&type_id)
	}

	/// Append `system`, returning *None* if its type is already present.
	pub fn insert(&mut self, type_id: TypeId, system: Box<dyn AnySystem>) -> Option<&mut SystemSlot> {
		if self.contains(type_id) {
			return None;
		}

		let index = self.slots.len();
		self.indices.insert(type_id, index);
		self.slots.push(SystemSlot {
			type_id,
			system,
			tracked: Vec::new(),
		});
		self.slots.last_mut()
	}

	/// Remove the system of the given type, keeping the order of the others.
	pub fn remove(&mut self, type_id: TypeId) -> Option<SystemSlot> {
		let index = self.indices.remove(&type_id)?;
		let slot = self.slots.remove(index);
		for moved in &self.slots[index..] {
			if let Some(i) = self.indices.get_mut(&moved.type_id) {
				*i -= 1;
			}
		}
		Some(slot)
	}

	pub fn get(&self, type_id: TypeId) -> Option<&SystemSlot> {
		self.slots.get(*self.indices.get(&type_id)?)
	}

	pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut SystemSlot> {
		self.slots.get_mut(*self.indices.get(&type_id)?)
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SystemSlot> {
		self.slots.iter_mut()
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.slots.len()
	}
}
