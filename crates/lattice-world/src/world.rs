use lattice_chunk::{BlockType, Chunk};
use lattice_geom::{ChunkDims, GridExtent, Vec3, WorldOrigin, to_chunk_and_local};

use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::store::{ChunkStore, read_chunk, write_chunk};

pub struct World<C> {
    pub size_x: usize,
    pub size_y: usize,
    pub size_z: usize,
    pub seed: i32,
    origin: WorldOrigin,
    store: ChunkStore<C>,
}

impl<C: Chunk> World<C> {
    pub fn new(cfg: &WorldConfig) -> Self {
        let [size_x, size_y, size_z] = cfg.world.size;
        Self {
            size_x,
            size_y,
            size_z,
            seed: cfg.world.seed,
            origin: cfg.origin(),
            store: ChunkStore::new(cfg.grid_extent(), cfg.chunk_dims()),
        }
    }

    pub fn with_layout(size: [usize; 3], dims: ChunkDims, extent: GridExtent) -> Self {
        Self {
            size_x: size[0],
            size_y: size[1],
            size_z: size[2],
            seed: 0,
            origin: WorldOrigin::centered(size[0], size[2]),
            store: ChunkStore::new(extent, dims),
        }
    }

    #[inline]
    pub fn store(&self) -> &ChunkStore<C> {
        &self.store
    }

    #[inline]
    pub fn origin(&self) -> WorldOrigin {
        self.origin
    }

    #[inline]
    pub fn chunk_dims(&self) -> ChunkDims {
        self.store.dims()
    }

    /// Writes a block, creating its chunk on first touch.
    pub fn set_block(&self, pos: Vec3, block: BlockType) -> Result<(), WorldError> {
        let (coord, local) = to_chunk_and_local(pos, self.store.dims());
        let cell = self.store.get_or_create(coord)?;
        write_chunk(cell).set_block(local, block);
        Ok(())
    }

    /// Block at a grid-space position. Unknown regions, whether never
    /// generated or off-grid, read as air.
    pub fn get_block(&self, pos: Vec3) -> BlockType {
        let (coord, local) = to_chunk_and_local(pos, self.store.dims());
        match self.store.get(coord) {
            Some(cell) => read_chunk(cell).get_block(local),
            None => BlockType::AIR,
        }
    }

    /// Solid-block test for a render-space position.
    pub fn is_hitting(&self, pos: Vec3) -> bool {
        self.get_block(self.origin.render_to_grid(pos)).is_solid()
    }
}
