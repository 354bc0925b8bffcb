//! Per-frame traversal of the world grid with throttled display refresh.
#![forbid(unsafe_code)]

use std::time::{Duration, Instant};

use lattice_chunk::{Chunk, DrawBackend};
use lattice_geom::WorldOrigin;
use lattice_world::{World, read_chunk, write_chunk};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub present: usize,
    pub drawn: usize,
    pub refreshed: usize,
}

/// Draws every present chunk each frame and lets at most one chunk rebuild
/// its display list per elapsed refresh interval.
///
/// The throttle is shared across all chunks: a refresh on one chunk closes
/// the window for the rest of the grid until the interval passes again. The
/// frame timestamp is taken once, so a zero interval still means at most one
/// refresh per frame.
pub struct RenderDriver {
    origin: WorldOrigin,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
    frames: u64,
    refreshes: u64,
}

impl RenderDriver {
    pub fn new(origin: WorldOrigin, refresh_interval: Duration) -> Self {
        Self {
            origin,
            refresh_interval,
            last_refresh: None,
            frames: 0,
            refreshes: 0,
        }
    }

    pub fn for_world<C: Chunk>(world: &World<C>, refresh_interval: Duration) -> Self {
        Self::new(world.origin(), refresh_interval)
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn total_refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn render_frame<C: Chunk>(&mut self, world: &World<C>, backend: &mut dyn DrawBackend) -> FrameStats {
        self.render_frame_at(world, backend, Instant::now())
    }

    pub fn render_frame_at<C: Chunk>(
        &mut self,
        world: &World<C>,
        backend: &mut dyn DrawBackend,
        now: Instant,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        backend.push_translation(self.origin.render_translation());

        for (_, cell) in world.store().iter_present() {
            stats.present += 1;
            if self.refresh_due(now) && write_chunk(cell).refresh_display_if_dirty() {
                self.last_refresh = Some(now);
                stats.refreshed += 1;
            }
            read_chunk(cell).draw(backend);
            stats.drawn += 1;
        }

        backend.pop_translation();
        self.frames += 1;
        self.refreshes += stats.refreshed as u64;
        log::trace!(
            target: "render",
            "frame {} present={} drawn={} refreshed={}",
            self.frames,
            stats.present,
            stats.drawn,
            stats.refreshed
        );
        stats
    }

    #[inline]
    fn refresh_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(t) => now.saturating_duration_since(t) > self.refresh_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_chunk::{BlockType, ChunkBuf, DisplayList};
    use lattice_geom::{ChunkCoord, ChunkDims, GridExtent, Vec3};

    #[derive(Default)]
    struct RecordingBackend {
        translations: Vec<Vec3>,
        depth: i32,
        draws: Vec<(ChunkCoord, usize)>,
    }

    impl DrawBackend for RecordingBackend {
        fn push_translation(&mut self, offset: Vec3) {
            self.translations.push(offset);
            self.depth += 1;
        }
        fn pop_translation(&mut self) {
            self.depth -= 1;
        }
        fn draw_display_list(&mut self, coord: ChunkCoord, list: &DisplayList) {
            assert_eq!(self.depth, 1, "draw outside translated frame");
            self.draws.push((coord, list.len()));
        }
    }

    fn world() -> World<ChunkBuf> {
        World::with_layout([32, 8, 32], ChunkDims::new(8, 8, 8), GridExtent::new(4, 1, 4))
    }

    fn touch(w: &World<ChunkBuf>, x: f32, z: f32) {
        w.set_block(Vec3::new(x, 0.0, z), BlockType::SURFACE).unwrap();
    }

    #[test]
    fn empty_grid_draws_nothing() {
        let w = world();
        let mut driver = RenderDriver::for_world(&w, Duration::ZERO);
        let mut backend = RecordingBackend::default();
        let stats = driver.render_frame(&w, &mut backend);
        assert_eq!(stats, FrameStats::default());
        assert_eq!(backend.translations, vec![Vec3::new(-16.0, 0.0, -16.0)]);
        assert_eq!(backend.depth, 0);
    }

    #[test]
    fn one_refresh_per_tick_but_every_chunk_drawn() {
        let w = world();
        touch(&w, 0.0, 0.0);
        touch(&w, 9.0, 0.0);
        touch(&w, 0.0, 9.0);
        let mut driver = RenderDriver::for_world(&w, Duration::ZERO);
        let mut backend = RecordingBackend::default();
        let t0 = Instant::now();

        let stats = driver.render_frame_at(&w, &mut backend, t0);
        assert_eq!(stats, FrameStats { present: 3, drawn: 3, refreshed: 1 });
        // (0,0,0) comes first in grid order and is the one refreshed.
        assert_eq!(
            backend.draws,
            vec![
                (ChunkCoord::new(0, 0, 0), 1),
                (ChunkCoord::new(0, 0, 1), 0),
                (ChunkCoord::new(1, 0, 0), 0),
            ]
        );

        // Same timestamp: the window is still closed.
        let stats = driver.render_frame_at(&w, &mut backend, t0);
        assert_eq!(stats.refreshed, 0);

        let stats = driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(1));
        assert_eq!(stats.refreshed, 1);
        let stats = driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(2));
        assert_eq!(stats.refreshed, 1);
        let stats = driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(3));
        assert_eq!(stats.refreshed, 0);
        assert_eq!(driver.total_refreshes(), 3);
        assert_eq!(driver.frames(), 5);
    }

    #[test]
    fn clean_chunks_do_not_consume_the_window() {
        let w = world();
        touch(&w, 0.0, 0.0);
        let mut driver = RenderDriver::for_world(&w, Duration::ZERO);
        let mut backend = RecordingBackend::default();
        let t0 = Instant::now();
        driver.render_frame_at(&w, &mut backend, t0);

        touch(&w, 20.0, 20.0);
        let stats = driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(1));
        assert_eq!(stats.present, 2);
        assert_eq!(stats.refreshed, 1);
    }

    #[test]
    fn interval_gates_refreshes() {
        let w = world();
        touch(&w, 0.0, 0.0);
        touch(&w, 9.0, 0.0);
        let mut driver = RenderDriver::for_world(&w, Duration::from_millis(10));
        let mut backend = RecordingBackend::default();
        let t0 = Instant::now();
        assert_eq!(driver.render_frame_at(&w, &mut backend, t0).refreshed, 1);
        assert_eq!(
            driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(5)).refreshed,
            0
        );
        assert_eq!(
            driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(10)).refreshed,
            0
        );
        assert_eq!(
            driver.render_frame_at(&w, &mut backend, t0 + Duration::from_millis(11)).refreshed,
            1
        );
    }
}
