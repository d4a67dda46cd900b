// worklog-report - platform/mod.rs
//
// Platform layer: config document loading, export file reading.
// Dependencies: core model and extractor types, directories, serde.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
