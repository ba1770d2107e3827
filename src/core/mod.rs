// LasQC - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or filesystem access.

pub mod analysis;
pub mod catalog;
pub mod checks;
pub mod classify;
pub mod export;
pub mod header;
pub mod las;
pub mod model;
pub mod rules;
pub mod services;
