use crate::Vec3;

/// Offset between render space, where the world grid is centred on the origin,
/// and grid space, where block (0,0,0) sits at the origin.
///
/// The render driver translates by [`WorldOrigin::render_translation`] and the
/// hit test maps back with [`WorldOrigin::render_to_grid`]; both read the same
/// value so drawing and picking always agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldOrigin {
    offset: Vec3,
}

impl WorldOrigin {
    #[inline]
    pub const fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    /// Centres the horizontal extent; the vertical axis is not shifted.
    #[inline]
    pub fn centered(size_x: usize, size_z: usize) -> Self {
        Self::new(Vec3::new(size_x as f32 * 0.5, 0.0, size_z as f32 * 0.5))
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[inline]
    pub fn render_translation(&self) -> Vec3 {
        -self.offset
    }

    #[inline]
    pub fn render_to_grid(&self, p: Vec3) -> Vec3 {
        p + self.offset
    }

    #[inline]
    pub fn grid_to_render(&self, p: Vec3) -> Vec3 {
        p - self.offset
    }
}
