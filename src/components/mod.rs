//! [Components](Component) are the data attached to [entities](crate::entities::Entity),
//! stored per type in columnar [managers](ComponentManager).

mod component;
mod component_id;
mod component_manager;
pub mod type_table;

pub use component::*;
pub use component_id::*;
pub use component_manager::*;
pub use type_table::ComponentDescriptor;
pub use cinder_ecs_derive::Component;
