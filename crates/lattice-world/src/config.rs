use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use lattice_geom::{ChunkDims, GridExtent, WorldOrigin};

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub chunk: ChunkSection,
    #[serde(default)]
    pub grid: GridSection,
    #[serde(default)]
    pub generation: Generation,
    #[serde(default)]
    pub noise: Noise,
    #[serde(default)]
    pub render: Render,
}

impl WorldConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&s)?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, [usize; 3]); 3] = [
            ("world.size", self.world.size),
            ("chunk.dims", self.chunk.dims),
            ("grid.viewing_distance", self.grid.viewing_distance),
        ];
        for (field, v) in checks {
            if v.contains(&0) {
                return Err(ConfigError::ZeroExtent { field });
            }
        }
        if self.world.size.iter().any(|s| *s > i32::MAX as usize) {
            return Err(ConfigError::WorldTooLarge);
        }
        if self.chunk.dims.iter().any(|d| *d > i32::MAX as usize) {
            return Err(ConfigError::ChunkTooLarge);
        }
        if self.generation.horizontal_stretch == 0.0 || !self.generation.horizontal_stretch.is_finite() {
            return Err(ConfigError::InvalidStretch(self.generation.horizontal_stretch));
        }
        Ok(())
    }

    #[inline]
    pub fn chunk_dims(&self) -> ChunkDims {
        ChunkDims::from(self.chunk.dims)
    }

    #[inline]
    pub fn grid_extent(&self) -> GridExtent {
        GridExtent::from(self.grid.viewing_distance)
    }

    #[inline]
    pub fn origin(&self) -> WorldOrigin {
        WorldOrigin::centered(self.world.size[0], self.world.size[2])
    }

    /// Smallest grid that covers `world.size` with the configured chunk dims.
    pub fn covering_extent(&self) -> GridExtent {
        let [sx, sy, sz] = self.world.size;
        let [dx, dy, dz] = self.chunk.dims;
        GridExtent::new(sx.div_ceil(dx), sy.div_ceil(dy), sz.div_ceil(dz))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_world_size")]
    pub size: [usize; 3],
    #[serde(default = "default_seed")]
    pub seed: i32,
}
fn default_world_size() -> [usize; 3] {
    [1024, 256, 1024]
}
// 31-polynomial string hash of "BLOCKMANIA".
fn default_seed() -> i32 {
    1_784_003_461
}
impl Default for WorldSection {
    fn default() -> Self {
        Self {
            size: default_world_size(),
            seed: default_seed(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChunkSection {
    #[serde(default = "default_chunk_dims")]
    pub dims: [usize; 3],
}
fn default_chunk_dims() -> [usize; 3] {
    [16, 128, 16]
}
impl Default for ChunkSection {
    fn default() -> Self {
        Self {
            dims: default_chunk_dims(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GridSection {
    #[serde(default = "default_viewing_distance")]
    pub viewing_distance: [usize; 3],
}
fn default_viewing_distance() -> [usize; 3] {
    [64, 2, 64]
}
impl Default for GridSection {
    fn default() -> Self {
        Self {
            viewing_distance: default_viewing_distance(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Generation {
    #[serde(default = "default_cave_depth")]
    pub cave_depth: i32,
    #[serde(default = "default_cave_threshold")]
    pub cave_threshold: f32,
    #[serde(default = "default_surface_cave_threshold")]
    pub surface_cave_threshold: f32,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_height_offset")]
    pub height_offset: f32,
    #[serde(default = "default_horizontal_stretch")]
    pub horizontal_stretch: f32,
}
fn default_cave_depth() -> i32 {
    32
}
fn default_cave_threshold() -> f32 {
    0.25
}
fn default_surface_cave_threshold() -> f32 {
    0.5
}
fn default_height_scale() -> f32 {
    256.0
}
fn default_height_offset() -> f32 {
    64.0
}
fn default_horizontal_stretch() -> f32 {
    2.0
}
impl Default for Generation {
    fn default() -> Self {
        Self {
            cave_depth: default_cave_depth(),
            cave_threshold: default_cave_threshold(),
            surface_cave_threshold: default_surface_cave_threshold(),
            height_scale: default_height_scale(),
            height_offset: default_height_offset(),
            horizontal_stretch: default_horizontal_stretch(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Noise {
    #[serde(default = "default_cave_freq")]
    pub cave_frequency: f32,
    #[serde(default = "default_height_freq")]
    pub height_frequency: f32,
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
}
fn default_cave_freq() -> f32 {
    0.04
}
fn default_height_freq() -> f32 {
    0.004
}
fn d_oct() -> i32 {
    4
}
fn d_pers() -> f32 {
    0.5
}
fn d_lac() -> f32 {
    2.0
}
impl Default for Noise {
    fn default() -> Self {
        Self {
            cave_frequency: default_cave_freq(),
            height_frequency: default_height_freq(),
            octaves: d_oct(),
            persistence: d_pers(),
            lacunarity: d_lac(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Render {
    #[serde(default)]
    pub refresh_interval_ms: u64,
}

impl Render {
    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

// Flattened params used in the generation loops (snapshot of config)
#[derive(Clone, Debug, PartialEq)]
pub struct GenParams {
    pub cave_depth: i32,
    pub cave_threshold: f32,
    pub surface_cave_threshold: f32,
    pub height_scale: f32,
    pub height_offset: f32,
    pub horizontal_stretch: f32,
}

impl Default for GenParams {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl GenParams {
    pub fn from_config(cfg: &WorldConfig) -> Self {
        let g = &cfg.generation;
        Self {
            cave_depth: g.cave_depth,
            cave_threshold: g.cave_threshold,
            surface_cave_threshold: g.surface_cave_threshold,
            height_scale: g.height_scale,
            height_offset: g.height_offset,
            horizontal_stretch: g.horizontal_stretch,
        }
    }
}
