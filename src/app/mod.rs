// worklog-report - app/mod.rs
//
// Application layer: pipeline orchestration.
// Dependencies: core and platform layers.

pub mod report;
