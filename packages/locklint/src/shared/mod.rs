//! Shared infrastructure used by all features

pub mod models;
