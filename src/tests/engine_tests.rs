use crate::components::Component;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::entities::Entity;
use crate::error::EcsError;
use crate::makers::MakerRegistry;
use crate::systems::{AnySystem, System, SystemState};
use crate::world::World;
use std::sync::Arc;

#[derive(Default, Clone, Debug, PartialEq, Component)]
struct Velocity(f32);

#[derive(Default, Clone, Debug, PartialEq, Component)]
struct Distance(f32);

#[derive(Default)]
struct Movement {
	events: Vec<String>,
	added: Vec<Entity>,
	removed: Vec<Entity>,
	ticks: Vec<(f64, usize)>,
}

impl System for Movement {
	fn on_before_add_to_engine(&mut self) {
		self.events.push("before_add".into());
	}

	fn on_add_to_engine(&mut self) {
		self.events.push("add".into());
	}

	fn on_entity_added(&mut self, entity: Entity) {
		self.added.push(entity);
	}

	fn on_entity_removed(&mut self, entity: Entity) {
		self.removed.push(entity);
	}

	fn on_entity_filter(&self, entity: Entity, world: &World) -> bool {
		world.has_component::<Velocity>(entity)
	}

	fn on_tick(&mut self, delta_time: f64, entities: &[Entity], world: &mut World) {
		self.ticks.push((delta_time, entities.len()));
		for entity in entities {
			let velocity = world.component::<Velocity>(*entity).map(|v| v.0).unwrap_or_default();
			let travelled = world.component::<Distance>(*entity).map(|d| d.0).unwrap_or_default();
			world.remove_component::<Distance>(*entity).ok();
			world.add_component(*entity, Distance(travelled + velocity * delta_time as f32)).unwrap();
		}
	}

	fn on_modified(&mut self, _delta_time: f64) {
		self.events.push("modified".into());
	}
}

/// Tracks whatever [Movement] has written a [Distance] for.
#[derive(Default)]
struct Odometer {
	seen: Vec<Entity>,
}

impl System for Odometer {
	fn on_entity_filter(&self, entity: Entity, world: &World) -> bool {
		world.has_component::<Distance>(entity)
	}

	fn on_tick(&mut self, _delta_time: f64, entities: &[Entity], _world: &mut World) {
		self.seen = entities.to_vec();
	}
}

#[derive(Default)]
struct Idle;

impl System for Idle {}

fn engine() -> Engine {
	let mut engine = Engine::with_config(EngineConfig::new().sequential());
	engine.register_component::<Velocity>();
	engine.register_component::<Distance>();
	engine.register_system::<Movement>();
	engine.register_system::<Odometer>();
	engine.register_system::<Idle>();
	engine
}

#[test]
pub fn add_and_remove_systems() {
	let mut engine = engine();
	assert_eq!(engine.num_systems(), 0);

	assert!(engine.add_system::<Idle>());
	assert_eq!(engine.num_systems(), 1);

	assert!(!engine.add_system::<Idle>(), "A system type can only be added once");
	assert_eq!(engine.num_systems(), 1);

	assert!(engine.remove_system::<Idle>());
	assert_eq!(engine.num_systems(), 0);
	assert!(!engine.remove_system::<Idle>(), "Nothing left to remove");
}

#[test]
pub fn add_system_requires_a_maker() {
	#[derive(Default)]
	struct Unregistered;
	impl System for Unregistered {}

	let mut engine = engine();
	assert!(!engine.add_system::<Unregistered>());
	assert_eq!(engine.system_state::<Unregistered>(), SystemState::Detached);

	assert!(engine.add_system_instance(Unregistered));
	assert_eq!(engine.system_state::<Unregistered>(), SystemState::Attached);
	assert!(!engine.add_system_instance(Unregistered));
}

#[test]
pub fn lifecycle_hooks_run_in_order() {
	let mut engine = engine();
	engine.add_system::<Movement>();
	engine.update(0.5);

	let movement = engine.system::<Movement>().unwrap();
	assert_eq!(movement.events, vec!["before_add", "add", "modified"]);
	assert_eq!(movement.ticks, vec![(0.5, 0)]);
}

#[test]
pub fn entity_added_fires_once() {
	let mut engine = engine();
	engine.add_system::<Movement>();

	let entity = engine.spawn();
	engine.add_component(entity, Velocity(2.0)).unwrap();
	let ignored = engine.spawn();

	engine.update(1.0);
	engine.update(1.0);

	let movement = engine.system::<Movement>().unwrap();
	assert_eq!(movement.added, vec![entity], "OnEntityAdded should fire exactly once");
	assert!(movement.removed.is_empty());
	assert_eq!(engine.tracked_entities::<Movement>(), Some([entity].as_slice()));
	assert!(!engine.tracked_entities::<Movement>().unwrap().contains(&ignored));
	assert_eq!(engine.component::<Distance>(entity), Some(Distance(4.0)));
}

#[test]
pub fn filter_changes_are_diffed() {
	let mut engine = engine();
	engine.add_system::<Movement>();

	let a = engine.spawn();
	let b = engine.spawn();
	engine.add_component(a, Velocity(1.0)).unwrap();
	engine.update(1.0);

	engine.remove_component::<Velocity>(a).unwrap();
	engine.add_component(b, Velocity(1.0)).unwrap();
	engine.update(1.0);

	let movement = engine.system::<Movement>().unwrap();
	assert_eq!(movement.added, vec![a, b]);
	assert_eq!(movement.removed, vec![a]);
	assert_eq!(engine.tracked_entities::<Movement>(), Some([b].as_slice()));
}

#[test]
pub fn destroyed_entities_leave_systems() {
	let mut engine = engine();
	engine.add_system::<Movement>();

	let entity = engine.spawn();
	engine.add_component(entity, Velocity(1.0)).unwrap();
	engine.update(1.0);

	engine.destroy_entity(entity).unwrap();
	assert!(!engine.contains_entity(entity));
	engine.update(1.0);

	let movement = engine.system::<Movement>().unwrap();
	assert_eq!(movement.removed, vec![entity]);
	assert_eq!(engine.tracked_entities::<Movement>(), Some([].as_slice()));
}

#[test]
pub fn later_systems_see_earlier_changes() {
	let mut engine = engine();
	engine.add_system::<Movement>();
	engine.add_system::<Odometer>();

	let entity = engine.spawn();
	engine.add_component(entity, Velocity(3.0)).unwrap();
	engine.update(1.0);

	assert_eq!(engine.system::<Odometer>().unwrap().seen, vec![entity]);
}

#[test]
pub fn only_members_are_filtered() {
	let mut engine = engine();
	engine.add_system::<Movement>();

	let outsider = engine.create_entity();
	engine.add_component(outsider, Velocity(1.0)).unwrap();
	engine.update(1.0);
	assert_eq!(engine.tracked_entities::<Movement>(), Some([].as_slice()));

	assert_eq!(engine.add_entity(outsider), Ok(true));
	assert_eq!(engine.add_entity(outsider), Ok(false), "Entities are only recorded once");
	engine.update(1.0);
	assert_eq!(engine.tracked_entities::<Movement>(), Some([outsider].as_slice()));

	assert!(engine.remove_entity(outsider));
	assert!(engine.is_alive(outsider), "Leaving the engine does not destroy the entity");
	engine.update(1.0);
	assert_eq!(engine.system::<Movement>().unwrap().removed, vec![outsider]);
}

#[test]
pub fn stale_entities_cannot_join() {
	let mut engine = engine();
	let entity = engine.create_entity();
	engine.world_mut().destroy_entity(entity).unwrap();

	assert_eq!(engine.add_entity(entity), Err(EcsError::StaleHandle(entity)));
	assert_eq!(engine.num_entities(), 0);
}

#[test]
pub fn removing_a_system_keeps_the_order_of_the_rest() {
	let mut engine = engine();
	engine.add_system::<Idle>();
	engine.add_system::<Movement>();
	engine.add_system::<Odometer>();

	assert!(engine.remove_system::<Idle>());
	assert!(engine.has_system::<Movement>() && engine.has_system::<Odometer>());

	let entity = engine.spawn();
	engine.add_component(entity, Velocity(1.0)).unwrap();
	engine.update(1.0);
	assert_eq!(engine.system::<Odometer>().unwrap().seen, vec![entity], "Movement should still run first");
}

#[test]
pub fn parallel_filtering_matches_sequential() {
	let mut engine = Engine::with_config(EngineConfig::new().with_parallel_filter_threshold(1));
	engine.register_component::<Velocity>();
	engine.register_component::<Distance>();
	engine.register_system::<Movement>();
	engine.add_system::<Movement>();

	let entities = (0..256).map(|_| engine.spawn()).collect::<Vec<_>>();
	for entity in entities.iter().step_by(3) {
		engine.add_component(*entity, Velocity(1.0)).unwrap();
	}
	engine.update(1.0);

	let expected = entities.iter().copied().step_by(3).collect::<Vec<_>>();
	assert_eq!(engine.tracked_entities::<Movement>(), Some(expected.as_slice()));
}

#[test]
pub fn engines_can_share_system_makers() {
	let makers = Arc::new(MakerRegistry::<dyn AnySystem>::new());
	makers.register_maker(std::any::TypeId::of::<Idle>(), || Box::new(Idle) as Box<dyn AnySystem>);

	let mut first = Engine::with_makers(makers.clone());
	let mut second = Engine::with_makers(makers);
	assert!(first.add_system::<Idle>());
	assert!(second.add_system::<Idle>());
	assert!(!first.register_system::<Idle>(), "The maker is already shared");
}

#[derive(Default)]
struct Reaper;

impl System for Reaper {
	fn on_entity_filter(&self, _entity: Entity, _world: &World) -> bool {
		true
	}

	fn on_tick(&mut self, _delta_time: f64, entities: &[Entity], world: &mut World) {
		for entity in entities {
			world.destroy_entity(*entity).unwrap();
		}
	}
}

#[derive(Default)]
struct Watcher {
	added: Vec<Entity>,
	ticked: Vec<Entity>,
}

impl System for Watcher {
	fn on_entity_added(&mut self, entity: Entity) {
		self.added.push(entity);
	}

	fn on_entity_filter(&self, _entity: Entity, _world: &World) -> bool {
		true
	}

	fn on_tick(&mut self, _delta_time: f64, entities: &[Entity], _world: &mut World) {
		self.ticked.extend_from_slice(entities);
	}
}

#[test]
pub fn entities_destroyed_mid_frame_are_not_offered_to_later_systems() {
	let mut engine = engine();
	engine.add_system_instance(Reaper);
	engine.add_system_instance(Watcher::default());

	let entity = engine.spawn();
	engine.update(1.0);

	assert!(!engine.is_alive(entity), "The first system should have destroyed the entity");
	let watcher = engine.system::<Watcher>().unwrap();
	assert!(watcher.added.is_empty(), "A dead entity must not join a later system");
	assert!(watcher.ticked.is_empty(), "A later system must not be ticked with a dead entity");
	assert_eq!(engine.tracked_entities::<Watcher>(), Some([].as_slice()));

	engine.update(1.0);
	assert_eq!(engine.num_entities(), 0, "Dead members are pruned on the next update");
}

#[test]
pub fn parallel_filtering_skips_dead_entities() {
	let mut engine = Engine::with_config(EngineConfig::new().with_parallel_filter_threshold(1));
	engine.add_system_instance(Reaper);
	engine.add_system_instance(Watcher::default());

	for _ in 0..64 {
		engine.spawn();
	}
	engine.update(1.0);

	let watcher = engine.system::<Watcher>().unwrap();
	assert!(watcher.added.is_empty() && watcher.ticked.is_empty());
}
