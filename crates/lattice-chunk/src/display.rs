use lattice_geom::{ChunkCoord, LocalCoord, Vec3};

use crate::BlockType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayEntry {
    pub local: LocalCoord,
    pub block: BlockType,
}

/// CPU-side draw list for one chunk, rebuilt when the chunk is dirty.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub entries: Vec<DisplayEntry>,
    /// Number of rebuilds so far; 0 means never built.
    pub revision: u64,
}

impl DisplayList {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Graphics submission seam. The render driver brackets a frame with a
/// translation push/pop and each chunk submits its display list in between.
pub trait DrawBackend {
    fn push_translation(&mut self, offset: Vec3);
    fn pop_translation(&mut self);
    fn draw_display_list(&mut self, coord: ChunkCoord, list: &DisplayList);
}
