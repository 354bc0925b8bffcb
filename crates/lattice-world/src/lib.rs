//! World grid, block access, and terrain generation.
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod generation;
pub mod noise;
mod store;
mod world;

pub use config::{GenParams, WorldConfig};
pub use error::{ConfigError, GenerationError, NoiseSample, WorldError};
pub use generation::{
    GenerationControl, GenerationPass, GenerationProgress, GenerationReport, TerrainGenerator,
};
pub use noise::{FastNoiseField, NoiseField};
pub use store::{ChunkStore, read_chunk, write_chunk};
pub use world::World;
