use crate::error::{EcsError, EcsResult};
use std::any::{type_name, Any};
use std::mem::size_of;
use std::ops::Range;
use paste::paste;

/// A value that can be stored in a [Soa] column.
pub trait Column: 'static + Clone + Send + Sync {}

impl<T: 'static + Clone + Send + Sync> Column for T {}

/// A tuple of column types that a [Soa] can store.
///
/// Implemented for tuples of up to twelve [columns](Column), including `()`.
/// A row of the container is one value of the tuple type.
pub trait SoaColumns: Column + Sized {
	/// One `Vec` per column.
	type Buffers: Default + Send + Sync;

	/// The number of columns.
	const COUNT: usize;

	/// The combined size of one row across all columns, in bytes.
	fn row_bytes() -> usize;

	/// Make every column able to hold at least `capacity` rows without reallocating.
	fn grow(buffers: &mut Self::Buffers, capacity: usize);

	fn push(buffers: &mut Self::Buffers, row: Self);

	/// # Panics
	/// If `row` is out of bounds. [Soa] checks this before calling.
	fn swap_remove(buffers: &mut Self::Buffers, row: usize) -> Self;

	/// # Panics
	/// If `row` is out of bounds. [Soa] checks this before calling.
	fn read(buffers: &Self::Buffers, row: usize) -> Self;

	/// # Panics
	/// If `row` is out of bounds. [Soa] checks this before calling.
	fn write(buffers: &mut Self::Buffers, row: usize, value: Self);

	fn clear(buffers: &mut Self::Buffers);

	fn field_any(buffers: &Self::Buffers, field: usize, row: usize) -> Option<&dyn Any>;

	fn field_any_mut(buffers: &mut Self::Buffers, field: usize, row: usize) -> Option<&mut dyn Any>;

	/// The type name of column `field`, used for diagnostics.
	fn field_type_name(field: usize) -> Option<&'static str>;
}

/// Compile-time access to the `I`-th column of a [SoaColumns] tuple.
pub trait ColumnOf<const I: usize>: SoaColumns {
	type Item: Column;
	fn column(buffers: &Self::Buffers) -> &Vec<Self::Item>;
	fn column_mut(buffers: &mut Self::Buffers) -> &mut Vec<Self::Item>;
}

/// A structure-of-arrays container.
///
/// Stores one contiguous buffer per column of `C`, all indexed by the same row position.
/// Every column always has the same length and the same logical capacity.
///
/// Rows are appended at the end and removed with swap-with-last:
/// removing row `i` moves the last row into position `i`. Row indices are therefore
/// stable only until the next removal.
pub struct Soa<C: SoaColumns> {
	buffers: C::Buffers,
	len: usize,
	capacity: usize,
}

impl<C: SoaColumns> Soa<C> {
	pub fn new() -> Self {
		Self {
			buffers: C::Buffers::default(),
			len: 0,
			capacity: 0,
		}
	}

	pub fn with_capacity(capacity: usize) -> Self {
		let mut soa = Self::new();
		soa.reserve(capacity);
		soa
	}

	/// Grow every column to hold at least `capacity` rows, preserving existing contents.
	/// Does nothing if the current capacity already suffices. Never shrinks.
	pub fn reserve(&mut self, capacity: usize) {
		if capacity > self.capacity {
			C::grow(&mut self.buffers, capacity);
			self.capacity = capacity;
		}
	}

	/// Append a row, doubling the capacity (minimum 1) when it is exhausted.
	///
	/// Returns the index of the new row.
	pub fn push_back(&mut self, row: C) -> usize {
		if self.len == self.capacity {
			self.reserve(usize::max(1, self.capacity * 2));
		}

		C::push(&mut self.buffers, row);
		self.len += 1;
		self.len - 1
	}

	/// Append `count` default-initialized rows.
	///
	/// Returns the range of the new rows.
	pub fn push_back_default(&mut self, count: usize) -> Range<usize>
	where
		C: Default,
	{
		let start = self.len;
		let required = start + count;

		if required > self.capacity {
			let mut capacity = usize::max(1, self.capacity);
			while capacity < required {
				capacity *= 2;
			}
			self.reserve(capacity);
		}

		for _ in 0..count {
			C::push(&mut self.buffers, C::default());
		}
		self.len = required;
		start..required
	}

	/// Remove row `row` by moving the last row into its place.
	///
	/// Returns the removed row.
	pub fn swap_remove(&mut self, row: usize) -> EcsResult<C> {
		self.check_row(row)?;
		self.len -= 1;
		Ok(C::swap_remove(&mut self.buffers, row))
	}

	/// Remove all rows. The capacity is kept.
	pub fn clear(&mut self) {
		C::clear(&mut self.buffers);
		self.len = 0;
	}

	#[inline(always)]
	pub fn get<const I: usize>(&self, row: usize) -> EcsResult<&<C as ColumnOf<I>>::Item>
	where
		C: ColumnOf<I>,
	{
		self.check_row(row)?;
		Ok(&<C as ColumnOf<I>>::column(&self.buffers)[row])
	}

	#[inline(always)]
	pub fn get_mut<const I: usize>(&mut self, row: usize) -> EcsResult<&mut <C as ColumnOf<I>>::Item>
	where
		C: ColumnOf<I>,
	{
		self.check_row(row)?;
		Ok(&mut <C as ColumnOf<I>>::column_mut(&mut self.buffers)[row])
	}

	#[inline(always)]
	pub fn set<const I: usize>(&mut self, row: usize, value: <C as ColumnOf<I>>::Item) -> EcsResult<()>
	where
		C: ColumnOf<I>,
	{
		*self.get_mut::<I>(row)? = value;
		Ok(())
	}

	/// The whole `I`-th column as a contiguous slice of [len](Self::len) elements.
	#[inline(always)]
	pub fn column<const I: usize>(&self) -> &[<C as ColumnOf<I>>::Item]
	where
		C: ColumnOf<I>,
	{
		<C as ColumnOf<I>>::column(&self.buffers).as_slice()
	}

	#[inline(always)]
	pub fn column_mut<const I: usize>(&mut self) -> &mut [<C as ColumnOf<I>>::Item]
	where
		C: ColumnOf<I>,
	{
		<C as ColumnOf<I>>::column_mut(&mut self.buffers).as_mut_slice()
	}

	/// Clone row `row` out of the container.
	pub fn read_row(&self, row: usize) -> EcsResult<C> {
		self.check_row(row)?;
		Ok(C::read(&self.buffers, row))
	}

	/// Overwrite every column of row `row`.
	pub fn write_row(&mut self, row: usize, value: C) -> EcsResult<()> {
		self.check_row(row)?;
		C::write(&mut self.buffers, row, value);
		Ok(())
	}

	/// Runtime-indexed access to column `field` of row `row`.
	pub fn field_any(&self, row: usize, field: usize) -> EcsResult<&dyn Any> {
		self.check_row(row)?;
		C::field_any(&self.buffers, field, row).ok_or(EcsError::IndexOutOfRange {
			index: field,
			len: C::COUNT,
		})
	}

	/// Runtime-indexed mutable access to column `field` of row `row`.
	pub fn field_any_mut(&mut self, row: usize, field: usize) -> EcsResult<&mut dyn Any> {
		self.check_row(row)?;
		C::field_any_mut(&mut self.buffers, field, row).ok_or(EcsError::IndexOutOfRange {
			index: field,
			len: C::COUNT,
		})
	}

	/// Typed read of column `field` of row `row`, checked at runtime.
	pub fn field<T: Column>(&self, row: usize, field: usize) -> EcsResult<&T> {
		let value = self.field_any(row, field)?;
		value.downcast_ref::<T>().ok_or_else(|| type_mismatch::<C, T>(field))
	}

	/// Typed write of column `field` of row `row`, checked at runtime.
	pub fn set_field<T: Column>(&mut self, row: usize, field: usize, value: T) -> EcsResult<()> {
		let slot = self.field_any_mut(row, field)?;
		match slot.downcast_mut::<T>() {
			Some(slot) => {
				*slot = value;
				Ok(())
			},
			None => Err(type_mismatch::<C, T>(field)),
		}
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	#[inline(always)]
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// The number of bytes reserved across all columns.
	pub fn bytes(&self) -> usize {
		self.capacity * C::row_bytes()
	}

	pub const fn column_count(&self) -> usize {
		C::COUNT
	}

	#[inline(always)]
	fn check_row(&self, row: usize) -> EcsResult<()> {
		match row < self.len {
			true => Ok(()),
			false => Err(EcsError::IndexOutOfRange {
				index: row,
				len: self.len,
			}),
		}
	}
}

impl<C: SoaColumns> Default for Soa<C> {
	fn default() -> Self {
		Self::new()
	}
}

fn type_mismatch<C: SoaColumns, T>(field: usize) -> EcsError {
	EcsError::TypeMismatch {
		expected: C::field_type_name(field).unwrap_or("<none>"),
		found: type_name::<T>(),
	}
}

impl SoaColumns for () {
	type Buffers = ();
	const COUNT: usize = 0;

	fn row_bytes() -> usize {
		0
	}

	fn grow(_: &mut Self::Buffers, _: usize) {}

	fn push(_: &mut Self::Buffers, _: Self) {}

	fn swap_remove(_: &mut Self::Buffers, _: usize) -> Self {}

	fn read(_: &Self::Buffers, _: usize) -> Self {}

	fn write(_: &mut Self::Buffers, _: usize, _: Self) {}

	fn clear(_: &mut Self::Buffers) {}

	fn field_any(_: &Self::Buffers, _: usize, _: usize) -> Option<&dyn Any> {
		None
	}

	fn field_any_mut(_: &mut Self::Buffers, _: usize, _: usize) -> Option<&mut dyn Any> {
		None
	}

	fn field_type_name(_: usize) -> Option<&'static str> {
		None
	}
}

macro_rules! impl_soa_columns {
	(@one $i: tt) => {
		1
	};

	(@columns $all: tt; $($t: ident $i: tt),*) => {
		$(impl_soa_columns!(@column $all $i $t);)*
	};

	(@column [$($all: ident),*] $i: tt $t: ident) => {
		impl<$($all: Column),*> ColumnOf<$i> for ($($all,)*) {
			type Item = $t;

			#[inline(always)]
			fn column(buffers: &Self::Buffers) -> &Vec<$t> {
				&buffers.$i
			}

			#[inline(always)]
			fn column_mut(buffers: &mut Self::Buffers) -> &mut Vec<$t> {
				&mut buffers.$i
			}
		}
	};

	($($t: ident $i: tt),*) => {
		paste! {
			impl<$($t: Column),*> SoaColumns for ($($t,)*) {
				type Buffers = ($(Vec<$t>,)*);
				const COUNT: usize = 0 $(+ impl_soa_columns!(@one $i))*;

				fn row_bytes() -> usize {
					0 $(+ size_of::<$t>())*
				}

				fn grow(buffers: &mut Self::Buffers, capacity: usize) {
					$(
						let [<$t:lower>] = &mut buffers.$i;
						[<$t:lower>].reserve_exact(capacity.saturating_sub([<$t:lower>].len()));
					)*
				}

				#[inline(always)]
				fn push(buffers: &mut Self::Buffers, row: Self) {
					let ($([<$t:lower>],)*) = row;
					$(buffers.$i.push([<$t:lower>]);)*
				}

				fn swap_remove(buffers: &mut Self::Buffers, row: usize) -> Self {
					($(buffers.$i.swap_remove(row),)*)
				}

				fn read(buffers: &Self::Buffers, row: usize) -> Self {
					($(buffers.$i[row].clone(),)*)
				}

				fn write(buffers: &mut Self::Buffers, row: usize, value: Self) {
					let ($([<$t:lower>],)*) = value;
					$(buffers.$i[row] = [<$t:lower>];)*
				}

				fn clear(buffers: &mut Self::Buffers) {
					$(buffers.$i.clear();)*
				}

				fn field_any(buffers: &Self::Buffers, field: usize, row: usize) -> Option<&dyn Any> {
					match field {
						$($i => buffers.$i.get(row).map(|v| v as &dyn Any),)*
						_ => None,
					}
				}

				fn field_any_mut(buffers: &mut Self::Buffers, field: usize, row: usize) -> Option<&mut dyn Any> {
					match field {
						$($i => buffers.$i.get_mut(row).map(|v| v as &mut dyn Any),)*
						_ => None,
					}
				}

				fn field_type_name(field: usize) -> Option<&'static str> {
					match field {
						$($i => Some(type_name::<$t>()),)*
						_ => None,
					}
				}
			}
		}

		impl_soa_columns!(@columns [$($t),*]; $($t $i),*);
	};
}

impl_soa_columns!(T0 0);
impl_soa_columns!(T0 0, T1 1);
impl_soa_columns!(T0 0, T1 1, T2 2);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
impl_soa_columns!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);
