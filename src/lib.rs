extern crate self as cinder_ecs;

pub mod data_structures;
pub mod components;
pub mod entities;
pub mod systems;
pub mod makers;
pub mod config;
pub mod engine;
pub mod error;
pub mod world;

pub mod prelude {
	pub use crate::systems::{AnySystem, System, SystemState};
	pub use crate::components::{
		AnyComponentManager, Cardinality, Component, ComponentId, ComponentManager, FieldInfo,
	};
	pub use crate::data_structures::{ObjectPool, PoolHandle, Poolable, Soa};
	pub use crate::entities::{Entity, EntityRegistry};
	pub use crate::error::{EcsError, EcsResult};
	pub use crate::makers::{Maker, MakerRegistry};
	pub use crate::config::EngineConfig;
	pub use crate::engine::Engine;
	pub use crate::world::World;
}

#[cfg(test)]
mod tests;
