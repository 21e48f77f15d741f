/*
 * Package description
 *
 * One pass over a package's declarations yields the lookup tables the
 * checkers run against: struct fields with their guard annotations,
 * methods and functions with their lock contracts, package variables,
 * and a purely syntactic catalog for folding access paths into types.
 */

pub mod application;
pub mod domain;

pub use application::{describe, element_type, TypeCatalog};
pub use domain::{FieldDesc, FuncDesc, MethodDesc, PackageDesc, TypeDesc, VarDesc};
