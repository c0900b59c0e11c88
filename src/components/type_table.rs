//! The process-wide registration table for [component](Component) types.
//!
//! The table answers the two questions the core asks about a type: what is its
//! identifier, and is it tagged [Singleton](Cardinality::Singleton) or [Plural](Cardinality::Plural).
//! Entries are populated on first use and never change afterwards.

use crate::components::{Cardinality, Component, ComponentId, FieldInfo};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::any::TypeId;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

lazy_static! {
	static ref TYPE_TABLE: RwLock<HashMap<TypeId, ComponentDescriptor, Hasher>> =
		RwLock::new(HashMap::default());
}

/// The registration entry of a [Component] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDescriptor {
	pub id: ComponentId,
	pub cardinality: Cardinality,
	pub fields: &'static [FieldInfo],
}

impl ComponentDescriptor {
	pub fn of<T: Component>() -> Self {
		Self {
			id: ComponentId::of::<T>(),
			cardinality: T::CARDINALITY,
			fields: T::FIELDS,
		}
	}

	#[inline(always)]
	pub fn name(&self) -> &'static str {
		self.id.name()
	}
}

/// Get the registration entry of `T`, adding it to the table on first use.
pub fn describe<T: Component>() -> ComponentDescriptor {
	let key = TypeId::of::<T>();
	if let Some(descriptor) = TYPE_TABLE.read().get(&key) {
		return *descriptor;
	}

	*TYPE_TABLE.write().entry(key).or_insert_with(|| {
		log::debug!("registered component type `{}`", std::any::type_name::<T>());
		ComponentDescriptor::of::<T>()
	})
}

/// Look up a previously [described](describe) type.
pub fn descriptor(id: ComponentId) -> Option<ComponentDescriptor> {
	TYPE_TABLE.read().get(&id.type_id()).copied()
}

/// Whether a previously [described](describe) type is singleton or plural.
pub fn cardinality_of(id: ComponentId) -> Option<Cardinality> {
	descriptor(id).map(|d| d.cardinality)
}
