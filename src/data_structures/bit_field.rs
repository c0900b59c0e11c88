use std::cmp::Ordering;
use std::iter::repeat;

const BITS: usize = 32;
const ALL_BITS_SET: u32 = u32::MAX;
const FIRST_BIT: u32 = 1 << (BITS - 1);

/// A dynamically sized bit-field.
///
/// Bits past the end of the backing storage read as unset.
#[derive(Default, Clone, Debug)]
pub struct BitField {
	values: Vec<u32>,
}

impl BitField {
	/// Create a new [BitField].
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a new [BitField] with the specified capacity.
	///
	/// # Arguments
	/// * `capacity` - A usize representing the container's target capacity in bits
	pub fn with_capacity(capacity: usize) -> Self {
		let mut instance = Self { values: Vec::new() };
		instance.ensure_capacity(capacity);
		instance
	}

	/// Get the value of the bit at index `i`.
	///
	/// # Arguments
	/// * `i` - The index of the element to retrieve
	#[inline(always)]
	pub fn get(&self, i: usize) -> bool {
		let (position, shift) = Self::pos_shift(i);
		match self.values.get(position) {
			Some(value) => (value & (FIRST_BIT >> shift)) != 0,
			None => false,
		}
	}

	/// Set the value of the bit at index `i`, growing the storage if needed.
	///
	/// # Arguments
	/// * `i` - The index of the element to modify
	#[inline(always)]
	pub fn set(&mut self, i: usize, value: bool) {
		let (position, shift) = Self::pos_shift(i);
		let bit = FIRST_BIT >> shift;

		match value {
			true => {
				if self.values.len() <= position {
					self.extend_to_position(position);
				}
				self.values[position] |= bit;
			},

			false => {
				if let Some(value) = self.values.get_mut(position) {
					*value &= !bit;
				}
			},
		}
	}

	/// Find the lowest unset bit below `limit`.
	///
	/// # Arguments
	/// * `limit` - Bits at or above this index are not considered
	pub fn first_unset(&self, limit: usize) -> Option<usize> {
		for (position, value) in self.values.iter().enumerate() {
			let start = position * BITS;
			if start >= limit {
				return None;
			}
			if *value == ALL_BITS_SET {
				continue;
			}
			let index = start + (!*value).leading_zeros() as usize;
			return match index.cmp(&limit) {
				Ordering::Less => Some(index),
				_ => None,
			};
		}

		let index = self.values.len() * BITS;
		(index < limit).then_some(index)
	}

	/// Count the bits that are set.
	pub fn count_ones(&self) -> usize {
		self.values.iter().map(|v| v.count_ones() as usize).sum()
	}

	/// Iterate over the indices of the set bits in ascending order.
	pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
		self.values.iter().enumerate().flat_map(|(position, value)| {
			let value = *value;
			(0..BITS).filter(move |shift| value & (FIRST_BIT >> shift) != 0).map(move |shift| position * BITS + shift)
		})
	}

	/// Set all bits to 0.
	pub fn clear(&mut self) {
		self.values.fill(0);
	}

	/// Set the minimum capacity of the [BitField].
	/// # Arguments
	/// * `capacity` - A usize representing the container's minimum capacity in bits
	pub fn ensure_capacity(&mut self, capacity: usize) {
		let words = capacity.div_ceil(BITS);
		if self.values.len() < words {
			let count = words - self.values.len();
			self.values.extend(repeat(0).take(count));
		}
	}

	/// Get the [BitField]'s capacity in bits.
	pub fn capacity(&self) -> usize {
		self.values.len() * BITS
	}

	#[inline(never)]
	fn extend_to_position(&mut self, position: usize) {
		let count = position - self.values.len() + 1;
		self.values.extend(repeat(0).take(count));
	}

	#[inline(always)]
	fn pos_shift(a: usize) -> (usize, usize) {
		(a / BITS, a % BITS)
	}
}

impl Eq for BitField {}

impl PartialEq<Self> for BitField {
	fn eq(&self, other: &Self) -> bool {
		let (short, long) = match self.values.len().cmp(&other.values.len()) {
			Ordering::Greater => (&other.values, &self.values),
			_ => (&self.values, &other.values),
		};
		long[..short.len()] == short[..] && long[short.len()..].iter().all(|i| *i == 0)
	}
}
