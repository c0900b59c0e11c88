use crate::systems::{AnySystem, System, SystemState, SystemStore};
use crate::error::{EcsError, EcsResult};
use crate::makers::MakerRegistry;
use crate::config::EngineConfig;
use std::ops::{Deref, DerefMut};
use crate::entities::Entity;
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashSet;
use std::any::{type_name, TypeId};
use crate::world::World;
use std::sync::Arc;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

/// A container for [systems](System) and the set of [entities](Entity) they may observe.
///
/// The engine dereferences to its [World], so entities and components are managed
/// directly through it. Only entities [added](Engine::add_entity) to the engine are
/// offered to the systems' filters.
pub struct Engine {
	world: World,
	config: EngineConfig,
	makers: Arc<MakerRegistry<dyn AnySystem>>,
	systems: SystemStore,
	members: Vec<Entity>,
	member_set: HashSet<Entity, Hasher>,
}

impl Engine {
	pub fn new() -> Self {
		Self::with_config(EngineConfig::default())
	}

	pub fn with_config(config: EngineConfig) -> Self {
		Self::with_config_and_makers(config, Arc::default())
	}

	/// Creates an engine that constructs its systems through a shared maker registry.
	pub fn with_makers(makers: Arc<MakerRegistry<dyn AnySystem>>) -> Self {
		Self::with_config_and_makers(EngineConfig::default(), makers)
	}

	pub fn with_config_and_makers(config: EngineConfig, makers: Arc<MakerRegistry<dyn AnySystem>>) -> Self {
		let capacity = config.initial_entity_capacity;
		let mut member_set = HashSet::default();
		member_set.reserve(capacity);

		Self {
			world: World::with_config(&config),
			config,
			makers,
			systems: SystemStore::new(),
			members: Vec::with_capacity(capacity),
			member_set,
		}
	}

	pub fn world(&self) -> &World {
		&self.world
	}

	pub fn world_mut(&mut self) -> &mut World {
		&mut self.world
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn system_makers(&self) -> &Arc<MakerRegistry<dyn AnySystem>> {
		&self.makers
	}

	/// Registers a maker that builds `T` through [Default].
	///
	/// Returns *false* if a maker for `T` already exists.
	pub fn register_system<T: System + Default>(&self) -> bool {
		self.makers.register_maker(TypeId::of::<T>(), || Box::new(T::default()) as Box<dyn AnySystem>)
	}

	/// Construct a `T` through the maker registry and add it to the engine.
	///
	/// Returns *false* if `T` is already present or no maker is registered for it.
	pub fn add_system<T: System>(&mut self) -> bool {
		let key = TypeId::of::<T>();
		if self.systems.contains(key) {
			log::warn!("system `{}` is already attached", type_name::<T>());
			return false;
		}

		match self.makers.make(key) {
			Some(system) => self.attach_system(key, system),
			None => {
				log::warn!("no maker is registered for system `{}`", type_name::<T>());
				false
			},
		}
	}

	/// Add an already constructed [system](System) to the engine.
	///
	/// Returns *false* if a system of the same type is already present.
	pub fn add_system_instance<T: System>(&mut self, system: T) -> bool {
		let key = TypeId::of::<T>();
		if self.systems.contains(key) {
			log::warn!("system `{}` is already attached", type_name::<T>());
			return false;
		}
		self.attach_system(key, Box::new(system))
	}

	fn attach_system(&mut self, key: TypeId, mut system: Box<dyn AnySystem>) -> bool {
		system.on_before_add_to_engine();
		let Some(slot) = self.systems.insert(key, system) else {
			return false;
		};

		slot.system.on_add_to_engine();
		log::debug!("attached system `{}`", slot.system.name());
		true
	}

	/// Detach the `T` system, calling its [on_remove_from_engine](System::on_remove_from_engine) hook.
	///
	/// Returns *false* if no `T` is attached.
	pub fn remove_system<T: System>(&mut self) -> bool {
		match self.systems.remove(TypeId::of::<T>()) {
			Some(mut slot) => {
				slot.system.on_remove_from_engine();
				log::debug!("detached system `{}`", slot.system.name());
				true
			},
			None => false,
		}
	}

	#[inline(always)]
	pub fn num_systems(&self) -> usize {
		self.systems.len()
	}

	#[inline(always)]
	pub fn has_system<T: System>(&self) -> bool {
		self.systems.contains(TypeId::of::<T>())
	}

	pub fn system<T: System>(&self) -> Option<&T> {
		self.systems.get(TypeId::of::<T>())?.system.as_any().downcast_ref()
	}

	pub fn system_mut<T: System>(&mut self) -> Option<&mut T> {
		self.systems.get_mut(TypeId::of::<T>())?.system.as_any_mut().downcast_mut()
	}

	pub fn system_state<T: System>(&self) -> SystemState {
		match self.has_system::<T>() {
			true => SystemState::Attached,
			false => SystemState::Detached,
		}
	}

	/// The entities `T` tracked as of the last [update](Engine::update).
	pub fn tracked_entities<T: System>(&self) -> Option<&[Entity]> {
		self.systems.get(TypeId::of::<T>()).map(|slot| slot.tracked.as_slice())
	}

	/// Record `entity` as a member of the engine.
	///
	/// Returns `Ok(false)` if it already was one. System membership is only
	/// decided during the next [update](Engine::update).
	pub fn add_entity(&mut self, entity: Entity) -> EcsResult<bool> {
		if !self.world.is_alive(entity) {
			log::warn!("cannot add {entity} to the engine: stale handle");
			return Err(EcsError::StaleHandle(entity));
		}

		if !self.member_set.insert(entity) {
			return Ok(false);
		}
		self.members.push(entity);
		Ok(true)
	}

	/// Stop offering `entity` to the systems. Systems tracking it are notified on the next update.
	pub fn remove_entity(&mut self, entity: Entity) -> bool {
		if !self.member_set.remove(&entity) {
			return false;
		}
		self.members.retain(|&e| e != entity);
		true
	}

	/// Creates a new entity and adds it to the engine.
	pub fn spawn(&mut self) -> Entity {
		let entity = self.world.create_entity();
		self.member_set.insert(entity);
		self.members.push(entity);
		entity
	}

	/// Removes `entity` from the engine and destroys it along with its components.
	pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
		self.remove_entity(entity);
		self.world.destroy_entity(entity)
	}

	/// The entities that are members of the engine, in the order they were added.
	#[inline(always)]
	pub fn entities(&self) -> &[Entity] {
		&self.members
	}

	#[inline(always)]
	pub fn num_entities(&self) -> usize {
		self.members.len()
	}

	#[inline(always)]
	pub fn contains_entity(&self, entity: Entity) -> bool {
		self.member_set.contains(&entity)
	}

	/// Run one frame.
	///
	/// For every system, in the order they were added, the tracked set is recomputed
	/// from the filter, the difference with the previous set is reported through
	/// [on_entity_removed](System::on_entity_removed) and [on_entity_added](System::on_entity_added),
	/// and the system is ticked. A system observes the changes made by the systems before it.
	pub fn update(&mut self, delta_time: f64) {
		self.prune_members();

		let threshold = self.config.parallel_filter_threshold;
		for slot in self.systems.iter_mut() {
			let tracked = filter_members(&*slot.system, &self.members, &self.world, threshold);

			if tracked != slot.tracked {
				let current: HashSet<Entity, Hasher> = tracked.iter().copied().collect();
				let previous: HashSet<Entity, Hasher> = slot.tracked.iter().copied().collect();

				for &entity in slot.tracked.iter().filter(|e| !current.contains(*e)) {
					log::trace!("{entity} left `{}`", slot.system.name());
					slot.system.on_entity_removed(entity);
				}
				for &entity in tracked.iter().filter(|e| !previous.contains(*e)) {
					log::trace!("{entity} joined `{}`", slot.system.name());
					slot.system.on_entity_added(entity);
				}
				slot.tracked = tracked;
			}

			slot.system.on_tick(delta_time, &slot.tracked, &mut self.world);
			slot.system.on_modified(delta_time);
		}
	}

	fn prune_members(&mut self) {
		let world = &self.world;
		let member_set = &mut self.member_set;
		self.members.retain(|&entity| {
			let alive = world.is_alive(entity);
			if !alive {
				member_set.remove(&entity);
			}
			alive
		});
	}
}

/// Entities destroyed by an earlier system in the same frame are skipped.
#[inline(always)]
fn admits(system: &dyn AnySystem, entity: Entity, world: &World) -> bool {
	world.is_alive(entity) && system.on_entity_filter(entity, world)
}

fn filter_sequential(system: &dyn AnySystem, members: &[Entity], world: &World) -> Vec<Entity> {
	members.iter().copied().filter(|&e| admits(system, e, world)).collect()
}

#[cfg(feature = "parallel")]
fn filter_members(system: &dyn AnySystem, members: &[Entity], world: &World, threshold: usize) -> Vec<Entity> {
	use rayon::prelude::*;

	if members.len() < threshold {
		return filter_sequential(system, members, world);
	}
	members.par_iter().copied().filter(|&e| admits(system, e, world)).collect()
}

#[cfg(not(feature = "parallel"))]
fn filter_members(system: &dyn AnySystem, members: &[Entity], world: &World, _threshold: usize) -> Vec<Entity> {
	filter_sequential(system, members, world)
}

impl Default for Engine {
	fn default() -> Self {
		Self::new()
	}
}

impl Deref for Engine {
	type Target = World;

	#[inline(always)]
	fn deref(&self) -> &Self::Target {
		&self.world
	}
}

impl DerefMut for Engine {
	#[inline(always)]
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.world
	}
}
