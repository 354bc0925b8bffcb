/// Small block type code. Only the values below carry meaning to world
/// generation; anything else is passed through to the chunk untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockType(pub u8);

impl BlockType {
    pub const AIR: BlockType = BlockType(0x0);
    pub const SURFACE: BlockType = BlockType(0x1);
    pub const SUBSURFACE: BlockType = BlockType(0x2);
    pub const STONE: BlockType = BlockType(0x3);

    #[inline]
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.0 > 0
    }
}
