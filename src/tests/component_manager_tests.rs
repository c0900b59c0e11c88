use crate::components::{type_table, Cardinality, Component, ComponentId, ComponentManager};
use crate::entities::EntityRegistry;
use crate::error::EcsError;

#[derive(Default, Clone, Debug, PartialEq, Component)]
struct Flags {
	flag0: u8,
	flag1: u8,
	flag2: u8,
	flag3: u8,
}

#[derive(Default, Clone, Debug, PartialEq, Component)]
#[component(plural)]
struct Tag(u32, String);

#[derive(Default, Component)]
struct Marker;

#[test]
pub fn derived_metadata() {
	assert_eq!(Flags::CARDINALITY, Cardinality::Singleton, "Components default to singleton");
	assert_eq!(Tag::CARDINALITY, Cardinality::Plural);
	assert_eq!(Marker::FIELDS.len(), 0);

	let names = Flags::FIELDS.iter().map(|f| f.name).collect::<Vec<_>>();
	assert_eq!(names, vec!["flag0", "flag1", "flag2", "flag3"]);
	assert!(Flags::FIELDS.iter().all(|f| f.size == 1));
	assert_eq!(Tag::field_index("1"), Some(1), "Tuple fields are named by position");

	type_table::describe::<Tag>();
	assert_eq!(type_table::cardinality_of(ComponentId::of::<Tag>()), Some(Cardinality::Plural));
}

#[test]
pub fn flags_scenario() {
	let mut registry = EntityRegistry::new();
	let entity = registry.create();
	assert_eq!((entity.index(), entity.generation()), (0, 0));

	let mut flags = ComponentManager::<Flags>::with_capacity(5);
	assert_eq!(flags.capacity(), 5);

	let row = flags.attach(entity, Flags::default()).unwrap();
	let flag1 = flags.field_index("flag1").unwrap();
	flags.set_data(row, flag1, 1u8).unwrap();
	assert_eq!(flags.get_data::<u8>(row, flag1), Ok(1));
	assert_eq!(flags.get::<1>(row), Ok(&1));
	assert_eq!(flags.owner(row), Ok(entity));

	flags.detach(entity).unwrap();
	registry.destroy(entity).unwrap();

	let entity = registry.create();
	assert_eq!((entity.index(), entity.generation()), (0, 1));
}

#[test]
pub fn singleton_cardinality_is_enforced() {
	let mut registry = EntityRegistry::new();
	let entity = registry.create();
	let mut flags = ComponentManager::<Flags>::new();

	let first = Flags {
		flag0: 7,
		..Default::default()
	};
	flags.attach(entity, first.clone()).unwrap();

	let result = flags.attach(entity, Flags::default());
	assert!(matches!(result, Err(EcsError::CardinalityViolation { .. })), "Second singleton attach must fail");
	assert_eq!(flags.count_for(entity), 1, "The entity should still own one instance");
	assert_eq!(flags.component_of(entity), Some(first), "The original instance must not be replaced");
}

#[test]
pub fn plural_components_accumulate() {
	let mut registry = EntityRegistry::new();
	let entity = registry.create();
	let mut tags = ComponentManager::<Tag>::new();

	tags.attach(entity, Tag(1, "one".into())).unwrap();
	tags.attach_named(entity, Tag(2, "two".into()), "second").unwrap();
	assert_eq!(tags.count_for(entity), 2);
	assert_eq!(tags.components_of(entity), vec![Tag(1, "one".into()), Tag(2, "two".into())]);
	assert_eq!(tags.name(1), Ok(Some("second")));
	assert_eq!(tags.name(0), Ok(None));

	assert_eq!(tags.detach_all(entity).len(), 2);
	assert!(!tags.contains(entity));
	assert!(tags.is_empty());
}

#[test]
pub fn detach_remaps_the_moved_row() {
	let mut registry = EntityRegistry::new();
	let entities = registry.create_many(3);
	let mut tags = ComponentManager::<Tag>::new();

	for (i, entity) in entities.iter().enumerate() {
		tags.attach(*entity, Tag(i as u32, String::new())).unwrap();
	}

	let removed = tags.detach(entities[0]).unwrap();
	assert_eq!(removed.0, 0);
	assert_eq!(tags.owners(), &[entities[2], entities[1]], "The last row should fill the hole");
	assert_eq!(tags.row_of(entities[2]), Some(0), "The moved row should be remapped");
	assert_eq!(tags.row_of(entities[1]), Some(1));
	assert_eq!(tags.component_of(entities[2]).map(|t| t.0), Some(2));
	assert_eq!(tags.column::<0>(), &[2, 1]);
}

#[test]
pub fn data_access_errors() {
	let mut registry = EntityRegistry::new();
	let entity = registry.create();
	let mut flags = ComponentManager::<Flags>::new();
	let row = flags.attach(entity, Flags::default()).unwrap();

	assert!(matches!(flags.field_index("flag9"), Err(EcsError::UnknownField { .. })));
	assert!(matches!(flags.set_data(row, 0, 1u32), Err(EcsError::TypeMismatch { .. })));
	assert_eq!(flags.get_data::<u8>(row + 1, 0), Err(EcsError::IndexOutOfRange { index: 1, len: 1 }));
	assert!(matches!(flags.detach(registry.create()), Err(EcsError::MissingComponent { .. })));
}

#[test]
pub fn marker_components() {
	let mut registry = EntityRegistry::new();
	let entity = registry.create();
	let mut markers = ComponentManager::<Marker>::new();

	markers.attach(entity, Marker).unwrap();
	assert!(markers.contains(entity));
	assert_eq!(markers.len(), 1);
	assert!(markers.bytes() > 0, "Owner metadata still takes space");
}

#[test]
pub fn detach_all_with_interleaved_owners() {
	let mut registry = EntityRegistry::new();
	let a = registry.create();
	let b = registry.create();
	let mut tags = ComponentManager::<Tag>::new();

	for i in 0..6 {
		let owner = if i % 2 == 0 { a } else { b };
		tags.attach(owner, Tag(i, String::new())).unwrap();
	}

	let removed = tags.detach_all(a);
	assert_eq!(removed.len(), 3, "Every instance of the entity should be detached");
	assert!(!tags.contains(a));
	assert_eq!(tags.count_for(b), 3);

	let mut remaining = tags.components_of(b).into_iter().map(|t| t.0).collect::<Vec<_>>();
	remaining.sort();
	assert_eq!(remaining, vec![1, 3, 5], "Other owners must keep their instances");
	assert!(tags.rows_of(b).iter().all(|row| tags.owner(*row) == Ok(b)), "Row index out of sync");
}
