//! Two-pass terrain generation: caves first, then surface columns.
//!
//! The cave pass finishes over the whole world before the surface pass
//! starts, so every surface column sees its final cave layer.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use lattice_chunk::{BlockType, Chunk};
use lattice_geom::Vec3;

use crate::config::GenParams;
use crate::error::{GenerationError, NoiseSample};
use crate::noise::NoiseField;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationPass {
    Idle,
    Caves,
    Surface,
    Done,
}

impl GenerationPass {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => GenerationPass::Caves,
            2 => GenerationPass::Surface,
            3 => GenerationPass::Done,
            _ => GenerationPass::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationProgress {
    pub pass: GenerationPass,
    pub columns_done: usize,
    pub columns_total: usize,
}

/// Cancel flag and progress counters shared between a generation run and
/// whoever scheduled it. Polled once per column.
#[derive(Debug, Default)]
pub struct GenerationControl {
    cancel: AtomicBool,
    pass: AtomicU8,
    columns_done: AtomicUsize,
    columns_total: AtomicUsize,
}

impl GenerationControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn progress(&self) -> GenerationProgress {
        GenerationProgress {
            pass: GenerationPass::from_u8(self.pass.load(Ordering::Acquire)),
            columns_done: self.columns_done.load(Ordering::Relaxed),
            columns_total: self.columns_total.load(Ordering::Relaxed),
        }
    }

    fn begin_pass(&self, pass: GenerationPass, columns: usize) {
        self.columns_done.store(0, Ordering::Relaxed);
        self.columns_total.store(columns, Ordering::Relaxed);
        self.pass.store(pass as u8, Ordering::Release);
    }

    #[inline]
    fn column_done(&self) {
        self.columns_done.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn checkpoint(&self) -> Result<(), GenerationError> {
        if self.is_cancelled() {
            Err(GenerationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub elapsed: Duration,
    pub cave_blocks: u64,
    pub surface_blocks: u64,
    pub subsurface_blocks: u64,
    /// Rows skipped in the surface pass because density left a void.
    pub cave_voids: u64,
    /// Rows of the surface descent that lay above the world's top.
    pub clipped_rows: u64,
    pub chunks_created: usize,
}

pub struct TerrainGenerator<'n, N: ?Sized> {
    noise: &'n N,
    params: GenParams,
}

impl<'n, N: NoiseField + ?Sized> TerrainGenerator<'n, N> {
    pub fn new(noise: &'n N, params: GenParams) -> Self {
        Self { noise, params }
    }

    pub fn run<C: Chunk>(
        &self,
        world: &World<C>,
        control: &GenerationControl,
    ) -> Result<GenerationReport, GenerationError> {
        let started = Instant::now();
        let columns = world.size_x * world.size_z;
        log::info!(
            target: "gen",
            "generating {}x{}x{} world ({} columns)",
            world.size_x,
            world.size_y,
            world.size_z,
            columns
        );
        let mut report = GenerationReport::default();

        control.begin_pass(GenerationPass::Caves, columns);
        self.cave_pass(world, control, &mut report)?;
        log::debug!(
            target: "gen",
            "cave pass done in {:.3}s: {} filler blocks",
            started.elapsed().as_secs_f64(),
            report.cave_blocks
        );

        control.begin_pass(GenerationPass::Surface, columns);
        self.surface_pass(world, control, &mut report)?;
        control.begin_pass(GenerationPass::Done, columns);
        control.columns_done.store(columns, Ordering::Relaxed);

        report.elapsed = started.elapsed();
        report.chunks_created = world.store().created_count();
        log::info!(target: "gen", "World updated ({:.3}s).", report.elapsed.as_secs_f64());
        log::debug!(target: "gen", "{:?}", report);
        Ok(report)
    }

    fn cave_pass<C: Chunk>(
        &self,
        world: &World<C>,
        control: &GenerationControl,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        let top = i32::try_from(world.size_y).unwrap_or(i32::MAX);
        let depth = self.params.cave_depth.clamp(0, top);
        for x in 0..world.size_x {
            for z in 0..world.size_z {
                control.checkpoint()?;
                let (fx, fz) = (x as f32, z as f32);
                for y in 0..depth {
                    let fy = y as f32;
                    if self.cave_density(fx, fy, fz)? < self.params.cave_threshold {
                        world.set_block(Vec3::new(fx, fy, fz), BlockType::STONE)?;
                        report.cave_blocks += 1;
                    }
                }
                control.column_done();
            }
        }
        Ok(())
    }

    fn surface_pass<C: Chunk>(
        &self,
        world: &World<C>,
        control: &GenerationControl,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        for x in 0..world.size_x {
            for z in 0..world.size_z {
                control.checkpoint()?;
                self.surface_column(world, x as f32, z as f32, report)?;
                control.column_done();
            }
        }
        Ok(())
    }

    /// Descends from the column height toward zero in whole steps. Only the
    /// first row equals `height` exactly, so it alone gets the surface type.
    #[allow(clippy::float_cmp)]
    fn surface_column<C: Chunk>(
        &self,
        world: &World<C>,
        x: f32,
        z: f32,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        let height = self.column_height(x, z)?;
        let top = world.size_y as f32;

        let mut y = height;
        if y >= top {
            let above = y - top;
            report.clipped_rows += above.floor() as u64 + 1;
            // Same fractional phase as the unclipped descent.
            y = top - 1.0 + above.fract();
        }

        while y > 0.0 {
            if self.cave_density(x, y, z)? < self.params.surface_cave_threshold {
                if height == y {
                    world.set_block(Vec3::new(x, y, z), BlockType::SURFACE)?;
                    report.surface_blocks += 1;
                } else {
                    world.set_block(Vec3::new(x, y, z), BlockType::SUBSURFACE)?;
                    report.subsurface_blocks += 1;
                }
            } else {
                report.cave_voids += 1;
            }
            y -= 1.0;
        }
        Ok(())
    }

    /// `|terrain(x / stretch, z / stretch) * scale + offset|`
    pub fn column_height(&self, x: f32, z: f32) -> Result<f32, GenerationError> {
        let p = &self.params;
        let (sx, sz) = (x / p.horizontal_stretch, z / p.horizontal_stretch);
        let raw = self.noise.terrain_height(sx, sz);
        let height = (raw * p.height_scale + p.height_offset).abs();
        if !height.is_finite() {
            return Err(GenerationError::InvalidSample {
                field: NoiseSample::TerrainHeight,
                at: Vec3::new(sx, 0.0, sz),
                value: raw,
            });
        }
        Ok(height)
    }

    #[inline]
    fn cave_density(&self, x: f32, y: f32, z: f32) -> Result<f32, GenerationError> {
        let d = self.noise.cave_density(x, y, z);
        if (0.0..=1.0).contains(&d) {
            Ok(d)
        } else {
            Err(GenerationError::InvalidSample {
                field: NoiseSample::CaveDensity,
                at: Vec3::new(x, y, z),
                value: d,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_chunk::ChunkBuf;
    use lattice_geom::{ChunkDims, GridExtent};

    /// Constant density everywhere, fixed raw height per column.
    struct StubNoise {
        density: f32,
        raw_height: f32,
    }

    impl NoiseField for StubNoise {
        fn cave_density(&self, _x: f32, _y: f32, _z: f32) -> f32 {
            self.density
        }
        fn terrain_height(&self, _x: f32, _z: f32) -> f32 {
            self.raw_height
        }
    }

    /// Solid below y = 10, cave above.
    struct LayeredNoise;

    impl NoiseField for LayeredNoise {
        fn cave_density(&self, _x: f32, y: f32, _z: f32) -> f32 {
            if y < 10.0 { 0.1 } else { 0.9 }
        }
        fn terrain_height(&self, _x: f32, _z: f32) -> f32 {
            0.0
        }
    }

    fn world(size: [usize; 3]) -> World<ChunkBuf> {
        let dims = ChunkDims::new(8, 16, 8);
        let extent = GridExtent::new(
            size[0].div_ceil(8),
            size[1].div_ceil(16),
            size[2].div_ceil(8),
        );
        World::with_layout(size, dims, extent)
    }

    // Raw height h maps to |h * 256 + 64|; pick raw so height is an integer.
    fn params_for_height(h: f32) -> (f32, GenParams) {
        let p = GenParams::default();
        ((h - p.height_offset) / p.height_scale, p)
    }

    #[test]
    fn surface_on_top_subsurface_below() {
        let w = world([4, 64, 4]);
        let (raw, params) = params_for_height(40.0);
        let noise = StubNoise { density: 0.0, raw_height: raw };
        let report = TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();

        for x in 0..4 {
            for z in 0..4 {
                let (fx, fz) = (x as f32, z as f32);
                assert_eq!(w.get_block(Vec3::new(fx, 40.0, fz)), BlockType::SURFACE);
                for y in 1..40 {
                    assert_eq!(
                        w.get_block(Vec3::new(fx, y as f32, fz)),
                        BlockType::SUBSURFACE,
                        "column ({x},{z}) y={y}"
                    );
                }
                // The descent stops before 0; the cave pass left filler there.
                assert_eq!(w.get_block(Vec3::new(fx, 0.0, fz)), BlockType::STONE);
                assert_eq!(w.get_block(Vec3::new(fx, 41.0, fz)), BlockType::AIR);
            }
        }
        assert_eq!(report.surface_blocks, 16);
        assert_eq!(report.subsurface_blocks, 16 * 39);
        assert_eq!(report.cave_blocks, 16 * 32);
    }

    #[test]
    fn fractional_height_places_surface_in_containing_block() {
        let w = world([1, 64, 1]);
        let (raw, params) = params_for_height(20.5);
        let noise = StubNoise { density: 0.0, raw_height: raw };
        TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();
        assert_eq!(w.get_block(Vec3::new(0.0, 20.0, 0.0)), BlockType::SURFACE);
        assert_eq!(w.get_block(Vec3::new(0.0, 19.0, 0.0)), BlockType::SUBSURFACE);
        // Last step is y = 0.5, which lands in row 0.
        assert_eq!(w.get_block(Vec3::new(0.0, 0.0, 0.0)), BlockType::SUBSURFACE);
    }

    #[test]
    fn dense_caves_leave_voids_below_the_surface() {
        let w = world([2, 64, 2]);
        let noise = LayeredNoise;
        let params = GenParams {
            height_offset: 20.0,
            ..GenParams::default()
        };
        let report = TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();
        // Above y = 10 density is 0.9: no surface block at the computed height.
        assert_eq!(w.get_block(Vec3::new(0.0, 20.0, 0.0)), BlockType::AIR);
        assert_eq!(w.get_block(Vec3::new(0.0, 15.0, 0.0)), BlockType::AIR);
        assert_eq!(w.get_block(Vec3::new(0.0, 9.0, 0.0)), BlockType::SUBSURFACE);
        assert_eq!(report.surface_blocks, 0);
        assert_eq!(report.cave_voids, 4 * 11);
    }

    #[test]
    fn cave_pass_only_fills_below_depth() {
        let w = world([2, 64, 2]);
        let params = GenParams {
            height_offset: 0.0,
            ..GenParams::default()
        };
        let noise = StubNoise { density: 0.2, raw_height: 0.0 };
        let report = TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();
        assert_eq!(report.cave_blocks, 4 * 32);
        assert_eq!(w.get_block(Vec3::new(1.0, 31.0, 1.0)), BlockType::STONE);
        assert_eq!(w.get_block(Vec3::new(1.0, 32.0, 1.0)), BlockType::AIR);
    }

    #[test]
    fn heights_above_the_world_are_clipped() {
        let w = world([1, 32, 1]);
        let (raw, params) = params_for_height(40.0);
        let noise = StubNoise { density: 0.0, raw_height: raw };
        let report = TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();
        assert_eq!(report.clipped_rows, 9);
        assert_eq!(report.surface_blocks, 0);
        assert_eq!(w.get_block(Vec3::new(0.0, 31.0, 0.0)), BlockType::SUBSURFACE);
    }

    #[test]
    fn very_tall_columns_still_reach_the_top_row() {
        let w = world([1, 250, 1]);
        let (raw, params) = params_for_height(1.0e8);
        let noise = StubNoise { density: 0.0, raw_height: raw };
        let report = TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();
        assert!(report.clipped_rows > 0);
        assert_eq!(report.surface_blocks, 0);
        assert_eq!(report.subsurface_blocks, 249);
        assert_eq!(w.get_block(Vec3::new(0.0, 249.0, 0.0)), BlockType::SUBSURFACE);
        assert_eq!(w.get_block(Vec3::new(0.0, 1.0, 0.0)), BlockType::SUBSURFACE);
    }

    #[test]
    fn fractional_clipped_height_keeps_its_phase() {
        let w = world([1, 32, 1]);
        let (raw, params) = params_for_height(40.5);
        let noise = StubNoise { density: 0.0, raw_height: raw };
        let report = TerrainGenerator::new(&noise, params).run(&w, &GenerationControl::new()).unwrap();
        // 40.5 down to 32.5 lie above the top.
        assert_eq!(report.clipped_rows, 9);
        // 31.5 down to 0.5: 32 writes, landing in rows 31..=0.
        assert_eq!(report.subsurface_blocks, 32);
        assert_eq!(w.get_block(Vec3::new(0.0, 0.0, 0.0)), BlockType::SUBSURFACE);
    }

    #[test]
    fn invalid_density_aborts() {
        let w = world([2, 16, 2]);
        let noise = StubNoise { density: f32::NAN, raw_height: 0.0 };
        let err = TerrainGenerator::new(&noise, GenParams::default())
            .run(&w, &GenerationControl::new())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidSample {
                field: NoiseSample::CaveDensity,
                ..
            }
        ));
        assert_eq!(w.store().created_count(), 0);
    }

    #[test]
    fn infinite_height_aborts() {
        let w = world([2, 16, 2]);
        let noise = StubNoise { density: 0.9, raw_height: f32::INFINITY };
        let err = TerrainGenerator::new(&noise, GenParams::default())
            .run(&w, &GenerationControl::new())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidSample {
                field: NoiseSample::TerrainHeight,
                ..
            }
        ));
    }

    #[test]
    fn undersized_grid_reports_out_of_bounds() {
        let w: World<ChunkBuf> =
            World::with_layout([16, 16, 16], ChunkDims::new(8, 16, 8), GridExtent::new(1, 1, 1));
        let noise = StubNoise { density: 0.0, raw_height: 0.0 };
        let err = TerrainGenerator::new(&noise, GenParams::default())
            .run(&w, &GenerationControl::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::OutOfBounds(_)));
    }

    #[test]
    fn cancelled_run_stops_before_writing() {
        let w = world([4, 16, 4]);
        let noise = StubNoise { density: 0.0, raw_height: 0.0 };
        let control = GenerationControl::new();
        control.cancel();
        let err = TerrainGenerator::new(&noise, GenParams::default())
            .run(&w, &control)
            .unwrap_err();
        assert_eq!(err, GenerationError::Cancelled);
        assert_eq!(w.store().created_count(), 0);
        assert_eq!(control.progress().pass, GenerationPass::Caves);
    }

    #[test]
    fn progress_reaches_done() {
        let w = world([3, 16, 5]);
        let noise = StubNoise { density: 0.9, raw_height: 0.0 };
        let control = GenerationControl::new();
        assert_eq!(control.progress().pass, GenerationPass::Idle);
        TerrainGenerator::new(&noise, GenParams::default()).run(&w, &control).unwrap();
        let p = control.progress();
        assert_eq!(p.pass, GenerationPass::Done);
        assert_eq!(p.columns_done, 15);
        assert_eq!(p.columns_total, 15);
    }
}
