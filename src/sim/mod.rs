//! Simulation module
//!
//! Shapes, kinematic entities, collision response and the entity world.
//! Nothing in here touches the platform; drawing goes through
//! [`crate::render::Canvas`].

pub mod collision;
pub mod entity;
pub mod env;
pub mod shape;
pub mod world;

pub use collision::{Contact, check_interaction, handle_collision};
pub use entity::{Directions, Entity};
pub use env::Environment;
pub use shape::{Shape, ShapeKind};
pub use world::{TickInput, World};
