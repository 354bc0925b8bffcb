//! Geometry and coordinate types shared by the world, chunk, and render crates.
#![forbid(unsafe_code)]

mod chunk_coord;
mod origin;
mod transform;
mod vec3;

pub use chunk_coord::{ChunkCoord, ChunkDims, GridExtent, LocalCoord};
pub use origin::WorldOrigin;
pub use transform::{
    block_to_chunk_and_local, chunk_and_local_to_block, chunk_and_local_to_world,
    to_chunk_and_local,
};
pub use vec3::Vec3;
