//! A factory registry that constructs objects polymorphically from a type identifier.
//!
//! Every read and write goes through a single mutex, so one registry can be shared
//! between threads (for example behind an `Arc`) and populated lazily from several places.

use crate::error::{EcsError, EcsResult};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use parking_lot::Mutex;
use std::any::TypeId;
use std::sync::Arc;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

/// Something that can produce a fresh `T`.
pub trait Maker<T: ?Sized>: Send + Sync {
	fn make(&self) -> Box<T>;
}

impl<T: ?Sized, F> Maker<T> for F
where
	F: Fn() -> Box<T> + Send + Sync,
{
	#[inline(always)]
	fn make(&self) -> Box<T> {
		self()
	}
}

/// Maps type identifiers to the [makers](Maker) that construct them.
pub struct MakerRegistry<T: ?Sized> {
	makers: Mutex<HashMap<TypeId, Arc<dyn Maker<T>>, Hasher>>,
}

impl<T: ?Sized> MakerRegistry<T> {
	pub fn new() -> Self {
		Self {
			makers: Mutex::new(HashMap::default()),
		}
	}

	/// Register `maker` under `key`.
	///
	/// The first registration wins: returns *false* and leaves the registry untouched
	/// if a maker is already registered for `key`.
	pub fn register_maker(&self, key: TypeId, maker: impl Maker<T> + 'static) -> bool {
		self.try_register_maker(key, maker).is_ok()
	}

	/// Like [register_maker](Self::register_maker), reporting a duplicate as
	/// [EcsError::DuplicateRegistration].
	pub fn try_register_maker(&self, key: TypeId, maker: impl Maker<T> + 'static) -> EcsResult<()> {
		let mut makers = self.makers.lock();
		if makers.contains_key(&key) {
			log::warn!("a maker is already registered for {key:?}");
			return Err(EcsError::DuplicateRegistration("maker"));
		}

		makers.insert(key, Arc::new(maker));
		log::debug!("registered maker for {key:?}");
		Ok(())
	}

	/// Construct a new instance through the maker registered under `key`.
	///
	/// Returns *None* if nothing is registered; callers that care should check
	/// [is_maker_registered](Self::is_maker_registered) first.
	pub fn make(&self, key: TypeId) -> Option<Box<T>> {
		let maker = self.maker(key)?;
		Some(maker.make())
	}

	pub fn is_maker_registered(&self, key: TypeId) -> bool {
		self.makers.lock().contains_key(&key)
	}

	pub fn maker(&self, key: TypeId) -> Option<Arc<dyn Maker<T>>> {
		self.makers.lock().get(&key).cloned()
	}

	/// Remove the maker registered under `key`.
	pub fn unregister_maker(&self, key: TypeId) -> bool {
		self.makers.lock().remove(&key).is_some()
	}

	pub fn len(&self) -> usize {
		self.makers.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.makers.lock().is_empty()
	}

	pub fn clear(&self) {
		self.makers.lock().clear();
	}
}

impl<T: ?Sized> Default for MakerRegistry<T> {
	fn default() -> Self {
		Self::new()
	}
}
