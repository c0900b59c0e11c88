//! A unique runtime identifier tied to a [Component] type.
//!
//! [Component ids](ComponentId) are stable for the lifetime of the process but not between
//! program re-runs; they are meant to be used as map keys, never persisted.

use crate::components::Component;
use std::hash::{Hash, Hasher};
use std::any::{type_name, TypeId};
use std::fmt;

/// A globally unique identifier for a type implementing the [`Component`] trait.
#[derive(Copy, Clone, Debug)]
pub struct ComponentId {
	type_id: TypeId,
	name: &'static str,
}

impl ComponentId {
	/// Get the [ComponentId] of the type `T`.
	#[inline(always)]
	pub fn of<T: Component>() -> ComponentId {
		ComponentId {
			type_id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	#[inline(always)]
	pub const fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// The Rust type name, for diagnostics only.
	#[inline(always)]
	pub const fn name(&self) -> &'static str {
		self.name
	}
}

impl Eq for ComponentId {}

impl PartialEq<Self> for ComponentId {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Hash for ComponentId {
	#[inline(always)]
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state)
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
