use std::fmt;

use lattice_geom::{ChunkCoord, GridExtent, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// A write resolved to a chunk slot outside the configured grid.
    OutOfBounds { coord: ChunkCoord, extent: GridExtent },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::OutOfBounds { coord, extent } => write!(
                f,
                "chunk ({}, {}, {}) outside grid {}x{}x{}",
                coord.cx, coord.cy, coord.cz, extent.x, extent.y, extent.z
            ),
        }
    }
}

impl std::error::Error for WorldError {}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ZeroExtent { field: &'static str },
    WorldTooLarge,
    ChunkTooLarge,
    InvalidStretch(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroExtent { field } => write!(f, "{} must be non-zero on every axis", field),
            ConfigError::WorldTooLarge => write!(f, "world.size exceeds i32 range"),
            ConfigError::ChunkTooLarge => write!(f, "chunk.dims exceeds i32 range"),
            ConfigError::InvalidStretch(v) => {
                write!(f, "generation.horizontal_stretch must be finite and non-zero, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseSample {
    CaveDensity,
    TerrainHeight,
}

impl fmt::Display for NoiseSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseSample::CaveDensity => f.write_str("cave density"),
            NoiseSample::TerrainHeight => f.write_str("terrain height"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GenerationError {
    /// The noise field returned a value the generator cannot turn into blocks.
    InvalidSample {
        field: NoiseSample,
        at: Vec3,
        value: f32,
    },
    OutOfBounds(WorldError),
    Cancelled,
    Panicked,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidSample { field, at, value } => write!(
                f,
                "invalid {} sample {} at ({}, {}, {})",
                field, value, at.x, at.y, at.z
            ),
            GenerationError::OutOfBounds(e) => write!(f, "generation wrote off-grid: {}", e),
            GenerationError::Cancelled => write!(f, "generation cancelled"),
            GenerationError::Panicked => write!(f, "generation thread panicked"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::OutOfBounds(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WorldError> for GenerationError {
    fn from(e: WorldError) -> Self {
        GenerationError::OutOfBounds(e)
    }
}
