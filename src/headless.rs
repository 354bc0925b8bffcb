use lattice_chunk::{DisplayList, DrawBackend};
use lattice_geom::{ChunkCoord, Vec3};

/// Draw backend without a window: tracks the translation stack and counts
/// what would have been submitted to the GPU.
#[derive(Default)]
pub struct HeadlessBackend {
    stack: Vec<Vec3>,
    pub lists_drawn: u64,
    pub entries_drawn: u64,
    pub last_translation: Option<Vec3>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl DrawBackend for HeadlessBackend {
    fn push_translation(&mut self, offset: Vec3) {
        let base = self.stack.last().copied().unwrap_or(Vec3::ZERO);
        self.stack.push(base + offset);
        self.last_translation = Some(offset);
    }

    fn pop_translation(&mut self) {
        if self.stack.pop().is_none() {
            log::warn!(target: "render", "translation stack underflow");
        }
    }

    fn draw_display_list(&mut self, _coord: ChunkCoord, list: &DisplayList) {
        self.lists_drawn += 1;
        self.entries_drawn += list.len() as u64;
    }
}
