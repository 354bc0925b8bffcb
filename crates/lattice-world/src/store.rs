use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lattice_chunk::Chunk;
use lattice_geom::{ChunkCoord, ChunkDims, GridExtent};

use crate::error::WorldError;

/// Fixed-extent grid of lazily created chunks.
///
/// Each slot is a `OnceLock`: the chunk is constructed in full off-grid and
/// then published by a single initialisation, so a reader either sees no
/// chunk or a complete one behind its lock. Slots never go back to empty.
pub struct ChunkStore<C> {
    extent: GridExtent,
    dims: ChunkDims,
    cells: Box<[OnceLock<RwLock<C>>]>,
    created: AtomicUsize,
}

impl<C: Chunk> ChunkStore<C> {
    pub fn new(extent: GridExtent, dims: ChunkDims) -> Self {
        let cells = (0..extent.cell_count()).map(|_| OnceLock::new()).collect();
        Self {
            extent,
            dims,
            cells,
            created: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn extent(&self) -> GridExtent {
        self.extent
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Read-only lookup; `None` for never-created or out-of-grid slots.
    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&RwLock<C>> {
        let i = self.extent.linear_index(coord)?;
        self.cells[i].get()
    }

    pub fn get_or_create(&self, coord: ChunkCoord) -> Result<&RwLock<C>, WorldError> {
        let i = self
            .extent
            .linear_index(coord)
            .ok_or(WorldError::OutOfBounds {
                coord,
                extent: self.extent,
            })?;
        Ok(self.cells[i].get_or_init(|| {
            log::trace!(
                target: "store",
                "creating chunk ({}, {}, {})",
                coord.cx,
                coord.cy,
                coord.cz
            );
            let chunk = C::create(coord, self.dims);
            self.created.fetch_add(1, Ordering::Relaxed);
            RwLock::new(chunk)
        }))
    }

    /// Present chunks in ascending (x, y, z) order.
    pub fn iter_present(&self) -> impl Iterator<Item = (ChunkCoord, &RwLock<C>)> + '_ {
        let extent = self.extent;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.get().map(|c| (extent.coord_of(i), c)))
    }

    pub fn present_coords(&self) -> Vec<ChunkCoord> {
        self.iter_present().map(|(c, _)| c).collect()
    }

    #[inline]
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

/// Shared access to a chunk slot, recovering from a poisoned lock.
#[inline]
pub fn read_chunk<C>(cell: &RwLock<C>) -> RwLockReadGuard<'_, C> {
    cell.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
pub fn write_chunk<C>(cell: &RwLock<C>) -> RwLockWriteGuard<'_, C> {
    cell.write().unwrap_or_else(PoisonError::into_inner)
}
