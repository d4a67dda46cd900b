// worklog-report - core/mod.rs
//
// Core business logic layer: extraction, aggregation, formatting, rendering.
// Dependencies: chrono, serde, feruca (name collation), csv/serde_json (rendering only).
// Must NOT depend on: platform, app, or touch the filesystem.

pub mod aggregate;
pub mod duration;
pub mod export;
pub mod extract;
pub mod model;
