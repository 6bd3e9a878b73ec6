//! Shapely type lattice
//!
//! Interned type representation and the assignability relation used to
//! check default values against their annotations.

pub mod assignability;
pub mod context;
pub mod error;
pub mod ty;

pub use assignability::AssignabilityContext;
pub use context::TypeContext;
pub use error::TypeError;
pub use ty::{names, ClassId, PrimitiveType, Type, TypeId};
