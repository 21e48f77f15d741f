pub mod describe;
pub mod type_catalog;

pub use describe::describe;
pub use type_catalog::{element_type, TypeCatalog};
