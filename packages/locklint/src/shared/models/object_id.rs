//! Object identity
//!
//! Every tracked object (receiver, field, package variable, lazily
//! discovered lock path) is interned in an arena and referred to by a
//! compact id. Reports never show ids; they render the source path text.

use serde::{Deserialize, Serialize};

/// Arena index of a tracked object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
