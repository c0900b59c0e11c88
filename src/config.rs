//! Sizing and scheduling knobs for an [Engine](crate::engine::Engine).

/// Configuration for an [Engine](crate::engine::Engine) and the [World](crate::world::World) it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
	/// Entities to pre-size the registry and the membership set for.
	pub initial_entity_capacity: usize,
	/// Capacity a component manager is allocated with when it is first created.
	pub component_capacity: usize,
	/// Member count at or above which entity filters run in parallel.
	/// `usize::MAX` keeps filtering on the calling thread.
	pub parallel_filter_threshold: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			initial_entity_capacity: 64,
			component_capacity: 16,
			parallel_filter_threshold: 4096,
		}
	}
}

impl EngineConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
		self.initial_entity_capacity = capacity;
		self
	}

	pub fn with_component_capacity(mut self, capacity: usize) -> Self {
		self.component_capacity = capacity;
		self
	}

	pub fn with_parallel_filter_threshold(mut self, threshold: usize) -> Self {
		self.parallel_filter_threshold = threshold;
		self
	}

	/// Never evaluate entity filters in parallel.
	pub fn sequential(self) -> Self {
		self.with_parallel_filter_threshold(usize::MAX)
	}
}
