use crate::components::{type_table, Cardinality, Component, ComponentDescriptor, ComponentId};
use crate::data_structures::{Column, ColumnOf, Soa};
use crate::error::{EcsError, EcsResult};
use crate::entities::Entity;
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use std::any::Any;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

/// Columnar storage for every instance of one [Component] type.
///
/// Component fields live in one [Soa] with a column per field. A second [Soa], kept in
/// lockstep, records the owning [entity](Entity) of each row by value and an optional
/// display name. Rows are removed with swap-with-last; the manager remaps the row of
/// the moved instance, so any row index obtained before a removal must be looked up again.
pub struct ComponentManager<C: Component> {
	descriptor: ComponentDescriptor,
	data: Soa<C::Columns>,
	meta: Soa<(Entity, Option<String>)>,
	rows: HashMap<Entity, Vec<usize>, Hasher>,
}

impl<C: Component> ComponentManager<C> {
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		let mut manager = Self {
			descriptor: type_table::describe::<C>(),
			data: Soa::new(),
			meta: Soa::new(),
			rows: HashMap::default(),
		};
		manager.alloc(capacity);
		manager
	}

	/// Pre-size the storage for `capacity` instances.
	pub fn alloc(&mut self, capacity: usize) {
		self.data.reserve(capacity);
		self.meta.reserve(capacity);
		self.rows.reserve(capacity.saturating_sub(self.rows.len()));
	}

	/// Attach `component` to `entity` and return its row.
	///
	/// Fails with [EcsError::CardinalityViolation] if `C` is a singleton and `entity`
	/// already owns an instance; the existing instance is left untouched.
	pub fn attach(&mut self, entity: Entity, component: C) -> EcsResult<usize> {
		self.attach_with_name(entity, component, None)
	}

	/// Like [attach](Self::attach), also giving the instance a display name.
	pub fn attach_named(&mut self, entity: Entity, component: C, name: impl Into<String>) -> EcsResult<usize> {
		self.attach_with_name(entity, component, Some(name.into()))
	}

	fn attach_with_name(&mut self, entity: Entity, component: C, name: Option<String>) -> EcsResult<usize> {
		if self.descriptor.cardinality == Cardinality::Singleton && self.contains(entity) {
			log::warn!("{entity} already owns a singleton `{}`", self.descriptor.name());
			return Err(EcsError::CardinalityViolation {
				component: self.descriptor.name(),
				entity,
			});
		}

		let row = self.data.push_back(component.into_columns());
		let meta_row = self.meta.push_back((entity, name));
		debug_assert_eq!(row, meta_row);

		self.rows.entry(entity).or_default().push(row);
		Ok(row)
	}

	/// Remove the instance stored at `row`, returning its owner and value.
	///
	/// The last row is moved into `row`.
	pub fn detach_row(&mut self, row: usize) -> EcsResult<(Entity, C)> {
		let last = self.len().checked_sub(1).ok_or(EcsError::IndexOutOfRange { index: row, len: 0 })?;
		let columns = self.data.swap_remove(row)?;
		let (owner, _) = self.meta.swap_remove(row)?;

		self.unlink(owner, row);
		if row != last {
			let moved = *self.meta.get::<0>(row)?;
			if let Some(rows) = self.rows.get_mut(&moved) {
				if let Some(slot) = rows.iter_mut().find(|r| **r == last) {
					*slot = row;
				}
			}
		}

		Ok((owner, C::from_columns(columns)))
	}

	/// Remove the first instance owned by `entity`.
	pub fn detach(&mut self, entity: Entity) -> EcsResult<C> {
		let row = self.row_of(entity).ok_or(EcsError::MissingComponent {
			component: self.descriptor.name(),
			entity,
		})?;
		self.detach_row(row).map(|(_, component)| component)
	}

	/// Remove every instance owned by `entity`.
	pub fn detach_all(&mut self, entity: Entity) -> Vec<C> {
		let mut detached = vec![];
		while let Some(row) = self.row_of(entity) {
			match self.detach_row(row) {
				Ok((_, component)) => detached.push(component),
				Err(error) => {
					log::error!("failed to detach row {row} of {entity}: {error}");
					debug_assert!(false, "row index out of sync: {error}");
					break;
				},
			}
		}
		detached
	}

	/// The rows of all instances owned by `entity`.
	pub fn rows_of(&self, entity: Entity) -> &[usize] {
		self.rows.get(&entity).map(Vec::as_slice).unwrap_or(&[])
	}

	/// The row of the first instance owned by `entity`.
	#[inline(always)]
	pub fn row_of(&self, entity: Entity) -> Option<usize> {
		self.rows_of(entity).first().copied()
	}

	pub fn count_for(&self, entity: Entity) -> usize {
		self.rows_of(entity).len()
	}

	#[inline(always)]
	pub fn contains(&self, entity: Entity) -> bool {
		self.count_for(entity) != 0
	}

	/// Rebuild the instance stored at `row`.
	pub fn get_component(&self, row: usize) -> EcsResult<C> {
		self.data.read_row(row).map(C::from_columns)
	}

	/// Overwrite every field of the instance stored at `row`.
	pub fn replace(&mut self, row: usize, component: C) -> EcsResult<()> {
		self.data.write_row(row, component.into_columns())
	}

	/// The first instance owned by `entity`.
	pub fn component_of(&self, entity: Entity) -> Option<C> {
		self.row_of(entity).and_then(|row| self.get_component(row).ok())
	}

	/// Every instance owned by `entity`.
	pub fn components_of(&self, entity: Entity) -> Vec<C> {
		self.rows_of(entity).iter().filter_map(|row| self.get_component(*row).ok()).collect()
	}

	/// Resolve a field name to the column index used by [get_data](Self::get_data) and [set_data](Self::set_data).
	pub fn field_index(&self, name: &str) -> EcsResult<usize> {
		C::field_index(name).ok_or_else(|| EcsError::UnknownField {
			component: self.descriptor.name(),
			field: name.to_string(),
		})
	}

	/// Write `value` to field `field` of the instance at `row`.
	///
	/// `T` must be the declared type of the field.
	#[inline(always)]
	pub fn set_data<T: Column>(&mut self, row: usize, field: usize, value: T) -> EcsResult<()> {
		self.data.set_field(row, field, value)
	}

	/// Read field `field` of the instance at `row`.
	#[inline(always)]
	pub fn get_data<T: Column>(&self, row: usize, field: usize) -> EcsResult<T> {
		self.data.field::<T>(row, field).cloned()
	}

	#[inline(always)]
	pub fn get<const I: usize>(&self, row: usize) -> EcsResult<&<C::Columns as ColumnOf<I>>::Item>
	where
		C::Columns: ColumnOf<I>,
	{
		self.data.get::<I>(row)
	}

	#[inline(always)]
	pub fn get_mut<const I: usize>(&mut self, row: usize) -> EcsResult<&mut <C::Columns as ColumnOf<I>>::Item>
	where
		C::Columns: ColumnOf<I>,
	{
		self.data.get_mut::<I>(row)
	}

	#[inline(always)]
	pub fn set<const I: usize>(&mut self, row: usize, value: <C::Columns as ColumnOf<I>>::Item) -> EcsResult<()>
	where
		C::Columns: ColumnOf<I>,
	{
		self.data.set::<I>(row, value)
	}

	/// Field `I` of every instance, in row order.
	#[inline(always)]
	pub fn column<const I: usize>(&self) -> &[<C::Columns as ColumnOf<I>>::Item]
	where
		C::Columns: ColumnOf<I>,
	{
		self.data.column::<I>()
	}

	#[inline(always)]
	pub fn column_mut<const I: usize>(&mut self) -> &mut [<C::Columns as ColumnOf<I>>::Item]
	where
		C::Columns: ColumnOf<I>,
	{
		self.data.column_mut::<I>()
	}

	/// The owner of every instance, in row order.
	pub fn owners(&self) -> &[Entity] {
		self.meta.column::<0>()
	}

	pub fn owner(&self, row: usize) -> EcsResult<Entity> {
		self.meta.get::<0>(row).copied()
	}

	pub fn name(&self, row: usize) -> EcsResult<Option<&str>> {
		self.meta.get::<1>(row).map(Option::as_deref)
	}

	pub fn set_name(&mut self, row: usize, name: Option<String>) -> EcsResult<()> {
		self.meta.set::<1>(row, name)
	}

	pub fn descriptor(&self) -> &ComponentDescriptor {
		&self.descriptor
	}

	pub fn id(&self) -> ComponentId {
		self.descriptor.id
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.data.capacity()
	}

	/// Bytes reserved for component fields and row metadata.
	pub fn bytes(&self) -> usize {
		self.data.bytes() + self.meta.bytes()
	}

	pub fn clear(&mut self) {
		self.data.clear();
		self.meta.clear();
		self.rows.clear();
	}

	fn unlink(&mut self, owner: Entity, row: usize) {
		if let Some(rows) = self.rows.get_mut(&owner) {
			rows.retain(|r| *r != row);
			if rows.is_empty() {
				self.rows.remove(&owner);
			}
		}
	}
}

impl<C: Component> Default for ComponentManager<C> {
	fn default() -> Self {
		Self::new()
	}
}

/// The type-erased surface of a [ComponentManager], so managers of different
/// [component](Component) types can live in one collection.
pub trait AnyComponentManager: Any + Send + Sync {
	fn descriptor(&self) -> &ComponentDescriptor;

	fn len(&self) -> usize;

	fn count_for(&self, entity: Entity) -> usize;

	/// Attach a default-constructed instance to `entity`.
	fn attach_default(&mut self, entity: Entity) -> EcsResult<usize>;

	/// Detach every instance owned by `entity`, returning how many were removed.
	fn remove_entity(&mut self, entity: Entity) -> usize;

	fn as_any(&self) -> &dyn Any;

	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyComponentManager for ComponentManager<C> {
	fn descriptor(&self) -> &ComponentDescriptor {
		&self.descriptor
	}

	fn len(&self) -> usize {
		self.data.len()
	}

	fn count_for(&self, entity: Entity) -> usize {
		ComponentManager::count_for(self, entity)
	}

	fn attach_default(&mut self, entity: Entity) -> EcsResult<usize> {
		self.attach(entity, C::default())
	}

	fn remove_entity(&mut self, entity: Entity) -> usize {
		self.detach_all(entity).len()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
