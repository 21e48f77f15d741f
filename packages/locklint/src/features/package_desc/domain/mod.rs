pub mod desc;

pub use desc::{FieldDesc, FuncDesc, MethodDesc, PackageDesc, TypeDesc, VarDesc};
