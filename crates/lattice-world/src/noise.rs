use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::Noise;

/// Scalar noise samples consumed by the terrain generator.
///
/// Implementations must be deterministic for a fixed seed so that two runs
/// over the same world produce the same blocks.
pub trait NoiseField: Send + Sync {
    /// Density in `[0, 1]`; low values are solid, high values are cave.
    fn cave_density(&self, x: f32, y: f32, z: f32) -> f32;

    /// Unscaled surface elevation, typically in `[-1, 1]`.
    fn terrain_height(&self, x: f32, z: f32) -> f32;
}

pub struct FastNoiseField {
    cave: FastNoiseLite,
    height: FastNoiseLite,
    octaves: i32,
    persistence: f32,
    lacunarity: f32,
}

impl FastNoiseField {
    pub fn new(seed: i32, cfg: &Noise) -> Self {
        let mut cave = FastNoiseLite::with_seed(seed ^ 41_337);
        cave.set_noise_type(Some(NoiseType::OpenSimplex2));
        cave.set_frequency(Some(cfg.cave_frequency));
        let mut height = FastNoiseLite::with_seed(seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(cfg.height_frequency));
        Self {
            cave,
            height,
            octaves: cfg.octaves.max(1),
            persistence: cfg.persistence,
            lacunarity: cfg.lacunarity,
        }
    }

    fn fractal3(&self, x: f32, y: f32, z: f32) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..self.octaves {
            sum += self.cave.get_noise_3d(x * freq, y * freq, z * freq) * amp;
            max_amp += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if max_amp > 0.0 { sum / max_amp } else { sum }
    }

    fn fractal2(&self, x: f32, z: f32) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..self.octaves {
            sum += self.height.get_noise_2d(x * freq, z * freq) * amp;
            max_amp += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if max_amp > 0.0 { sum / max_amp } else { sum }
    }
}

impl NoiseField for FastNoiseField {
    fn cave_density(&self, x: f32, y: f32, z: f32) -> f32 {
        (self.fractal3(x, y, z) * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    fn terrain_height(&self, x: f32, z: f32) -> f32 {
        self.fractal2(x, z)
    }
}
