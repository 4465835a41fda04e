// src/domain/mod.rs

pub mod error;
pub mod model;
