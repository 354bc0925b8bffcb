//! World lifetime: grid construction, background generation, and frame rendering.
#![forbid(unsafe_code)]

mod task;

use std::io;
use std::sync::Arc;

use lattice_chunk::{Chunk, DrawBackend};
use lattice_render::{FrameStats, RenderDriver};
use lattice_world::{FastNoiseField, GenParams, NoiseField, World, WorldConfig};

pub use task::{GenerationOutcome, GenerationTask};

/// A world plus the generation thread that fills it and the driver that draws it.
///
/// Construction spawns generation immediately; the caller then renders
/// frames from its own thread while generation runs. Dropping the runtime
/// cancels and joins the generation thread before the grid is freed.
pub struct WorldRuntime<C> {
    task: GenerationTask,
    driver: RenderDriver,
    world: Arc<World<C>>,
}

impl<C: Chunk + 'static> WorldRuntime<C> {
    pub fn start(cfg: &WorldConfig) -> io::Result<Self> {
        let noise = Arc::new(FastNoiseField::new(cfg.world.seed, &cfg.noise));
        Self::start_with_noise(cfg, noise)
    }

    pub fn start_with_noise<N>(cfg: &WorldConfig, noise: Arc<N>) -> io::Result<Self>
    where
        N: NoiseField + ?Sized + 'static,
    {
        let world = Arc::new(World::new(cfg));
        let extent = world.store().extent();
        log::info!(
            "world {}x{}x{} blocks, grid {}x{}x{} chunks, seed {}",
            world.size_x,
            world.size_y,
            world.size_z,
            extent.x,
            extent.y,
            extent.z,
            world.seed
        );
        let task = GenerationTask::spawn(Arc::clone(&world), noise, GenParams::from_config(cfg))?;
        let driver = RenderDriver::for_world(world.as_ref(), cfg.render.refresh_interval());
        Ok(Self { task, driver, world })
    }

    #[inline]
    pub fn world(&self) -> &Arc<World<C>> {
        &self.world
    }

    #[inline]
    pub fn task(&self) -> &GenerationTask {
        &self.task
    }

    #[inline]
    pub fn task_mut(&mut self) -> &mut GenerationTask {
        &mut self.task
    }

    #[inline]
    pub fn driver(&self) -> &RenderDriver {
        &self.driver
    }

    pub fn render_frame(&mut self, backend: &mut dyn DrawBackend) -> FrameStats {
        self.driver.render_frame(self.world.as_ref(), backend)
    }
}
