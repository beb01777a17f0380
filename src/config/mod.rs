// src/config/mod.rs
pub mod generator;

pub use generator::GeneratorConfig;
