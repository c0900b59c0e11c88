use crate::entities::Entity;
use crate::world::World;
use std::any::{type_name, Any};

/// It provides the logic for modifying the state of [Entities](Entity)
/// and their associated [Components](crate::components::Component).
///
/// Every hook has an empty default, so a system only implements what it needs.
/// The [Engine](crate::engine::Engine) drives the hooks in this order:
/// * [on_before_add_to_engine](System::on_before_add_to_engine) and
///   [on_add_to_engine](System::on_add_to_engine) when the system is attached.
/// * Once per [update](crate::engine::Engine::update):
///   [on_entity_filter](System::on_entity_filter) for every member entity,
///   [on_entity_removed](System::on_entity_removed) /
///   [on_entity_added](System::on_entity_added) for the change in the tracked set,
///   then [on_tick](System::on_tick) and [on_modified](System::on_modified).
/// * [on_remove_from_engine](System::on_remove_from_engine) when the system is detached.
pub trait System: Send + Sync + 'static {
	/// Called before the system is placed in the engine's registry.
	fn on_before_add_to_engine(&mut self) {}

	/// Called once the system is registered.
	fn on_add_to_engine(&mut self) {}

	/// Called when the system is removed from the engine.
	fn on_remove_from_engine(&mut self) {}

	/// Called when `entity` starts being tracked by this system.
	fn on_entity_added(&mut self, _entity: Entity) {}

	/// Called when `entity` stops being tracked by this system.
	fn on_entity_removed(&mut self, _entity: Entity) {}

	/// Decide whether `entity` should be tracked by this system.
	///
	/// The filter must not have side effects: the engine may evaluate it
	/// from several threads at once.
	fn on_entity_filter(&self, _entity: Entity, _world: &World) -> bool {
		false
	}

	/// Process the tracked entities.
	fn on_tick(&mut self, _delta_time: f64, _entities: &[Entity], _world: &mut World) {}

	/// Called after [on_tick](System::on_tick) in every update.
	fn on_modified(&mut self, _delta_time: f64) {}

	fn name(&self) -> &'static str {
		type_name::<Self>()
	}
}

/// A [System] that can be downcast back to its concrete type.
pub trait AnySystem: System {
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: System> AnySystem for T {
	#[inline(always)]
	fn as_any(&self) -> &dyn Any {
		self
	}

	#[inline(always)]
	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// Whether a [System] type is currently attached to an [Engine](crate::engine::Engine).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
	#[default]
	Detached,
	Attached,
}
