//! The [World] ties the [entity registry](EntityRegistry) to the per-type
//! [component managers](ComponentManager).

use crate::components::{type_table, AnyComponentManager, Component, ComponentId, ComponentManager};
use crate::entities::{Entity, EntityRegistry};
use crate::error::{EcsError, EcsResult};
use crate::makers::MakerRegistry;
use crate::config::EngineConfig;
use std::collections::hash_map::Entry;
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use std::any::{type_name, TypeId};

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

/// A container for [entities](Entity) and the [components](Component) attached to them.
///
/// A component type must be [registered](World::register_component) before instances of it
/// can be attached; registration installs the maker that creates the type's manager.
pub struct World {
	entities: EntityRegistry,
	managers: HashMap<TypeId, Box<dyn AnyComponentManager>, Hasher>,
	makers: MakerRegistry<dyn AnyComponentManager>,
	component_capacity: usize,
}

impl World {
	pub fn new() -> Self {
		Self::with_config(&EngineConfig::default())
	}

	pub fn with_config(config: &EngineConfig) -> Self {
		Self {
			entities: EntityRegistry::with_capacity(config.initial_entity_capacity),
			managers: HashMap::default(),
			makers: MakerRegistry::new(),
			component_capacity: config.component_capacity,
		}
	}

	/// Creates a single [entity](Entity) with no [components](Component) attached.
	pub fn create_entity(&mut self) -> Entity {
		self.entities.create()
	}

	/// Creates `count` [entities](Entity) with no [components](Component) attached.
	pub fn create_entities(&mut self, count: usize) -> Vec<Entity> {
		self.entities.create_many(count)
	}

	/// Destroys an [entity](Entity) along with every [component](Component) it owns.
	pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
		self.entities.validate(entity)?;

		let removed: usize = self.managers.values_mut().map(|m| m.remove_entity(entity)).sum();
		log::trace!("destroying {entity} with {removed} component(s)");
		self.entities.destroy(entity)
	}

	#[inline(always)]
	pub fn is_alive(&self, entity: Entity) -> bool {
		self.entities.is_alive(entity)
	}

	pub fn entity_count(&self) -> usize {
		self.entities.len()
	}

	pub fn entities(&self) -> &EntityRegistry {
		&self.entities
	}

	/// Registers the [component](Component) type `C` with this world.
	///
	/// Returns *false* if `C` was already registered.
	pub fn register_component<C: Component>(&mut self) -> bool {
		let descriptor = type_table::describe::<C>();
		let capacity = self.component_capacity;

		let registered = self.makers.register_maker(TypeId::of::<C>(), move || {
			Box::new(ComponentManager::<C>::with_capacity(capacity)) as Box<dyn AnyComponentManager>
		});

		if registered {
			log::debug!("registered component `{}` ({:?})", descriptor.name(), descriptor.cardinality);
		}
		registered
	}

	pub fn is_component_registered<C: Component>(&self) -> bool {
		self.makers.is_maker_registered(TypeId::of::<C>())
	}

	/// The makers used to create component managers, keyed by component type.
	pub fn component_makers(&self) -> &MakerRegistry<dyn AnyComponentManager> {
		&self.makers
	}

	/// Attach `component` to `entity`, returning its row in the type's manager.
	pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<usize> {
		self.entities.validate(entity)?;
		self.manager_entry::<C>()?.attach(entity, component)
	}

	/// Attach a named `component` to `entity`.
	pub fn add_component_named<C: Component>(
		&mut self, entity: Entity, component: C, name: impl Into<String>,
	) -> EcsResult<usize> {
		self.entities.validate(entity)?;
		self.manager_entry::<C>()?.attach_named(entity, component, name)
	}

	/// Attach a default-constructed instance of the type identified by `id` to `entity`.
	pub fn add_component_by_id(&mut self, entity: Entity, id: ComponentId) -> EcsResult<usize> {
		self.entities.validate(entity)?;
		self.erased_entry(id.type_id(), id.name())?.attach_default(entity)
	}

	/// Detach the first `C` owned by `entity`.
	pub fn remove_component<C: Component>(&mut self, entity: Entity) -> EcsResult<C> {
		self.entities.validate(entity)?;
		match self.manager_mut::<C>() {
			Some(manager) => manager.detach(entity),
			None => Err(EcsError::MissingComponent {
				component: type_name::<C>(),
				entity,
			}),
		}
	}

	/// Detach every `C` owned by `entity`.
	pub fn remove_components<C: Component>(&mut self, entity: Entity) -> EcsResult<Vec<C>> {
		self.entities.validate(entity)?;
		Ok(self.manager_mut::<C>().map(|m| m.detach_all(entity)).unwrap_or_default())
	}

	/// The first `C` owned by `entity`, or *None* if it has none.
	pub fn component<C: Component>(&self, entity: Entity) -> Option<C> {
		if !self.is_alive(entity) {
			return None;
		}
		self.manager::<C>()?.component_of(entity)
	}

	/// Every `C` owned by `entity`.
	pub fn components<C: Component>(&self, entity: Entity) -> Vec<C> {
		match (self.is_alive(entity), self.manager::<C>()) {
			(true, Some(manager)) => manager.components_of(entity),
			_ => vec![],
		}
	}

	pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
		self.has_component_id(entity, ComponentId::of::<C>())
	}

	pub fn has_component_id(&self, entity: Entity, id: ComponentId) -> bool {
		self.is_alive(entity)
			&& self.managers.get(&id.type_id()).map(|m| m.count_for(entity) != 0).unwrap_or(false)
	}

	/// The number of [components](Component) of any type owned by `entity`.
	pub fn num_components(&self, entity: Entity) -> usize {
		if !self.is_alive(entity) {
			return 0;
		}
		self.managers.values().map(|m| m.count_for(entity)).sum()
	}

	pub fn manager<C: Component>(&self) -> Option<&ComponentManager<C>> {
		self.managers.get(&TypeId::of::<C>())?.as_any().downcast_ref()
	}

	pub fn manager_mut<C: Component>(&mut self) -> Option<&mut ComponentManager<C>> {
		self.managers.get_mut(&TypeId::of::<C>())?.as_any_mut().downcast_mut()
	}

	fn manager_entry<C: Component>(&mut self) -> EcsResult<&mut ComponentManager<C>> {
		self.erased_entry(TypeId::of::<C>(), type_name::<C>())?
			.as_any_mut()
			.downcast_mut()
			.ok_or(EcsError::UnregisteredType(type_name::<C>()))
	}

	fn erased_entry(&mut self, key: TypeId, name: &'static str) -> EcsResult<&mut Box<dyn AnyComponentManager>> {
		match self.managers.entry(key) {
			Entry::Occupied(entry) => Ok(entry.into_mut()),
			Entry::Vacant(entry) => {
				let manager = self.makers.make(key).ok_or(EcsError::UnregisteredType(name))?;
				log::debug!("created manager for `{name}`");
				Ok(entry.insert(manager))
			},
		}
	}
}

impl Default for World {
	fn default() -> Self {
		Self::new()
	}
}
