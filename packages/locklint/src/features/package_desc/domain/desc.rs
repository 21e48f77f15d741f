//! Package description
//!
//! A flat, name-keyed summary of one Go package: its struct types with
//! their fields and methods, its free functions, and its package-level
//! variables, each carrying whatever lock annotations were written in
//! the doc comments. This is the only view of the program the checkers
//! consult for declared intent; everything else they learn from flow.

use crate::features::annotations::Annotation;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct PackageDesc {
    pub name: String,
    pub types: FxHashMap<String, TypeDesc>,
    pub functions: FxHashMap<String, FuncDesc>,
    pub vars: FxHashMap<String, VarDesc>,
}

impl PackageDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn type_desc(&self, name: &str) -> Option<&TypeDesc> {
        self.types.get(name.trim_start_matches('*'))
    }

    pub fn function(&self, name: &str) -> Option<&FuncDesc> {
        self.functions.get(name)
    }

    pub fn var(&self, name: &str) -> Option<&VarDesc> {
        self.vars.get(name)
    }
}

/// A named type and what we know about it. Methods may arrive before
/// the type declaration itself (or without one, for types declared in
/// a file we were not given), so everything here is filled in lazily.
#[derive(Debug, Default)]
pub struct TypeDesc {
    pub name: String,
    pub fields: FxHashMap<String, FieldDesc>,
    pub methods: FxHashMap<String, MethodDesc>,
}

impl TypeDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.get(name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDesc> {
        self.methods.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDesc {
    pub type_text: String,
    /// Locks that must be held to touch this field.
    pub guards: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct MethodDesc {
    pub name: String,
    /// Receiver variable name as written, e.g. `t` in `func (t *T)`.
    pub recv_name: Option<String>,
    /// Lock states the method requires of its caller.
    pub annotations: Vec<Annotation>,
    /// Result type when the method has exactly one, so getter calls
    /// can participate in access paths.
    pub result_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FuncDesc {
    pub name: String,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct VarDesc {
    pub name: String,
    pub type_text: Option<String>,
    pub guards: Vec<Annotation>,
}
