use crate::data_structures::SoaColumns;

/// How many live instances of a [Component] type a single entity may hold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
	/// At most one instance per entity.
	#[default]
	Singleton,
	/// Any number of instances per entity.
	Plural,
}

/// Static description of one field of a [Component].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
	pub name: &'static str,
	/// Byte offset of the field inside the component struct.
	pub offset: usize,
	pub size: usize,
}

impl FieldInfo {
	pub const fn new(name: &'static str, offset: usize, size: usize) -> Self {
		Self { name, offset, size }
	}
}

/// A data-only payload attached to an entity.
///
/// Each field of the component is stored in its own column, so the type is split into
/// a tuple of [columns](SoaColumns) on attach and rebuilt from it on read.
/// Usually implemented with `#[derive(Component)]`:
///
/// ```ignore
/// #[derive(Default, Component)]
/// #[component(plural)]
/// struct Tag { label: u32 }
/// ```
pub trait Component: 'static + Default + Send + Sync {
	/// The column tuple, one element per field in declaration order.
	type Columns: SoaColumns;

	const CARDINALITY: Cardinality;

	/// One entry per column, in the same order as [Columns](Self::Columns).
	const FIELDS: &'static [FieldInfo];

	fn into_columns(self) -> Self::Columns;

	fn from_columns(columns: Self::Columns) -> Self;

	/// Resolve a field name to its column index.
	fn field_index(name: &str) -> Option<usize> {
		Self::FIELDS.iter().position(|f| f.name == name)
	}
}
