// src/telemetry/mod.rs

pub mod tracing;
