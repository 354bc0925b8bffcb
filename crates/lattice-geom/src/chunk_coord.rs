#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// World block coordinate of this chunk's (0,0,0) corner.
    #[inline]
    pub fn base_block(self, dims: ChunkDims) -> (i32, i32, i32) {
        (
            self.cx * dims.x as i32,
            self.cy * dims.y as i32,
            self.cz * dims.z as i32,
        )
    }
}

/// Size of one chunk in blocks. Every axis is at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl ChunkDims {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn volume(self) -> usize {
        self.x * self.y * self.z
    }

    #[inline]
    pub fn contains(self, local: LocalCoord) -> bool {
        local.x < self.x && local.y < self.y && local.z < self.z
    }
}

impl From<[usize; 3]> for ChunkDims {
    fn from(v: [usize; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Number of chunk slots along each axis of the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridExtent {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridExtent {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn cell_count(self) -> usize {
        self.x * self.y * self.z
    }

    #[inline]
    pub fn contains(self, coord: ChunkCoord) -> bool {
        coord.cx >= 0
            && coord.cy >= 0
            && coord.cz >= 0
            && (coord.cx as usize) < self.x
            && (coord.cy as usize) < self.y
            && (coord.cz as usize) < self.z
    }

    /// Linear slot index, x-major then y then z, so ascending indices walk the
    /// grid in (x, y, z) order.
    #[inline]
    pub fn linear_index(self, coord: ChunkCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let (x, y, z) = (coord.cx as usize, coord.cy as usize, coord.cz as usize);
        Some((x * self.y + y) * self.z + z)
    }

    #[inline]
    pub fn coord_of(self, index: usize) -> ChunkCoord {
        let z = index % self.z;
        let y = (index / self.z) % self.y;
        let x = index / (self.z * self.y);
        ChunkCoord::new(x as i32, y as i32, z as i32)
    }
}

impl From<[usize; 3]> for GridExtent {
    fn from(v: [usize; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Block position inside a chunk, `0 <= axis < ChunkDims` on every axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalCoord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalCoord {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}
