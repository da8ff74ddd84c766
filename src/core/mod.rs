//! Core generator tying the sampling pipeline together

mod generator;
mod config;

pub use generator::{GaltonWatson, GenerationReport};
pub use config::GeneratorConfig;
