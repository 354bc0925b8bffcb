//! World-space <-> (chunk, block-local) conversions.
//!
//! Chunk indices come from floor division so that positions just below a
//! chunk boundary land in the lower chunk even when the position is negative.

use crate::{ChunkCoord, ChunkDims, LocalCoord, Vec3};

/// Splits a continuous world position into its owning chunk and the block
/// offset inside that chunk.
#[inline]
pub fn to_chunk_and_local(pos: Vec3, dims: ChunkDims) -> (ChunkCoord, LocalCoord) {
    let (cx, lx) = split_axis(pos.x, dims.x);
    let (cy, ly) = split_axis(pos.y, dims.y);
    let (cz, lz) = split_axis(pos.z, dims.z);
    (ChunkCoord::new(cx, cy, cz), LocalCoord::new(lx, ly, lz))
}

#[inline]
fn split_axis(p: f32, d: usize) -> (i32, usize) {
    // floor(p / d) == floor(floor(p) / d) for integer d.
    let block = p.floor() as i64;
    let d = d.max(1) as i64;
    let chunk = block.div_euclid(d).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    (chunk as i32, block.rem_euclid(d) as usize)
}

/// Integer form of [`to_chunk_and_local`] for block coordinates.
#[inline]
pub fn block_to_chunk_and_local(wx: i32, wy: i32, wz: i32, dims: ChunkDims) -> (ChunkCoord, LocalCoord) {
    let (sx, sy, sz) = (dims.x as i32, dims.y as i32, dims.z as i32);
    (
        ChunkCoord::new(wx.div_euclid(sx), wy.div_euclid(sy), wz.div_euclid(sz)),
        LocalCoord::new(
            wx.rem_euclid(sx) as usize,
            wy.rem_euclid(sy) as usize,
            wz.rem_euclid(sz) as usize,
        ),
    )
}

#[inline]
pub fn chunk_and_local_to_block(coord: ChunkCoord, local: LocalCoord, dims: ChunkDims) -> (i32, i32, i32) {
    let (bx, by, bz) = coord.base_block(dims);
    (bx + local.x as i32, by + local.y as i32, bz + local.z as i32)
}

#[inline]
pub fn chunk_and_local_to_world(coord: ChunkCoord, local: LocalCoord, dims: ChunkDims) -> Vec3 {
    Vec3::from(chunk_and_local_to_block(coord, local, dims))
}
