//! Chunk block storage, display lists, and the draw seam.
#![forbid(unsafe_code)]

mod block;
mod display;

pub use block::BlockType;
pub use display::{DisplayEntry, DisplayList, DrawBackend};

use lattice_geom::{ChunkCoord, ChunkDims, LocalCoord};

/// Per-chunk block storage and rendering, as seen by the world grid.
///
/// A chunk is built complete by [`Chunk::create`] before the grid publishes
/// it, and afterwards is only reached through the grid's per-cell lock.
pub trait Chunk: Send + Sync {
    fn create(coord: ChunkCoord, dims: ChunkDims) -> Self
    where
        Self: Sized;

    fn coord(&self) -> ChunkCoord;

    fn set_block(&mut self, local: LocalCoord, block: BlockType);

    fn get_block(&self, local: LocalCoord) -> BlockType;

    /// Rebuilds the display data if a block changed since the last rebuild.
    /// Returns true when a rebuild happened.
    fn refresh_display_if_dirty(&mut self) -> bool;

    fn draw(&self, backend: &mut dyn DrawBackend);
}

#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub dims: ChunkDims,
    pub blocks: Vec<BlockType>,
    dirty: bool,
    display: DisplayList,
}

impl ChunkBuf {
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        Self {
            coord,
            dims,
            blocks: vec![BlockType::AIR; dims.volume()],
            dirty: false,
            display: DisplayList::default(),
        }
    }

    pub fn from_blocks_local(coord: ChunkCoord, dims: ChunkDims, blocks: Vec<BlockType>) -> Self {
        let mut b = blocks;
        let expect = dims.volume();
        if b.len() != expect {
            b.resize(expect, BlockType::AIR);
        }
        let dirty = b.iter().any(|t| !t.is_air());
        ChunkBuf {
            coord,
            dims,
            blocks: b,
            dirty,
            display: DisplayList::default(),
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.dims.z + z) * self.dims.x + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }

    pub fn non_air_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    fn rebuild_display(&mut self) {
        let mut entries = Vec::with_capacity(self.display.entries.len());
        for y in 0..self.dims.y {
            for z in 0..self.dims.z {
                for x in 0..self.dims.x {
                    let block = self.get_local(x, y, z);
                    if !block.is_air() {
                        entries.push(DisplayEntry {
                            local: LocalCoord::new(x, y, z),
                            block,
                        });
                    }
                }
            }
        }
        self.display.entries = entries;
        self.display.revision += 1;
    }
}

impl Chunk for ChunkBuf {
    fn create(coord: ChunkCoord, dims: ChunkDims) -> Self {
        ChunkBuf::new(coord, dims)
    }

    fn coord(&self) -> ChunkCoord {
        self.coord
    }

    fn set_block(&mut self, local: LocalCoord, block: BlockType) {
        if !self.dims.contains(local) {
            debug_assert!(false, "local {:?} outside chunk {:?}", local, self.dims);
            return;
        }
        let i = self.idx(local.x, local.y, local.z);
        if self.blocks[i] != block {
            self.blocks[i] = block;
            self.dirty = true;
        }
    }

    fn get_block(&self, local: LocalCoord) -> BlockType {
        if !self.dims.contains(local) {
            return BlockType::AIR;
        }
        self.get_local(local.x, local.y, local.z)
    }

    fn refresh_display_if_dirty(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.rebuild_display();
        self.dirty = false;
        true
    }

    fn draw(&self, backend: &mut dyn DrawBackend) {
        backend.draw_display_list(self.coord, &self.display);
    }
}
