//! Failure kinds reported by the ECS core.
//!
//! Every fallible operation surfaces one of these as a return value; nothing is swallowed.

use crate::entities::Entity;
use thiserror::Error;

pub type EcsResult<T> = Result<T, EcsError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EcsError {
	/// The handle's generation no longer matches the registry. Drop the handle.
	#[error("{0} is stale: its generation no longer matches the registry")]
	StaleHandle(Entity),

	#[error("a {0} is already registered for this type")]
	DuplicateRegistration(&'static str),

	#[error("{entity} already owns a singleton `{component}`")]
	CardinalityViolation { component: &'static str, entity: Entity },

	#[error("object pool exhausted: all {capacity} slots are in use")]
	CapacityExhausted { capacity: usize },

	#[error("index {index} is out of range for length {len}")]
	IndexOutOfRange { index: usize, len: usize },

	#[error("type mismatch: column holds `{expected}`, got `{found}`")]
	TypeMismatch { expected: &'static str, found: &'static str },

	#[error("`{component}` has no field named `{field}`")]
	UnknownField { component: &'static str, field: String },

	#[error("no maker is registered for `{0}`")]
	UnregisteredType(&'static str),

	#[error("{entity} has no `{component}`")]
	MissingComponent { component: &'static str, entity: Entity },
}
