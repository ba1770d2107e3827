// LasQC - app/mod.rs
//
// Application layer: orchestration, catalog loading, file I/O around the
// core analysis.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod analyze;
pub mod archive;
pub mod catalog_mgr;
