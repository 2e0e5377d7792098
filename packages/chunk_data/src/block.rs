//! Per-tile storage of block states within a chunk section.

use crate::coord::NUM_LTIS;
use std::ops::{
    Index,
    IndexMut,
};


/// Raw block state id, as assigned by the server's block data.
///
/// Interpreting it (for example, as a collision shape) is up to whoever owns the block data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct BlockState(pub u16);

/// The "air" block state, which every fresh chunk is filled with.
pub const AIR: BlockState = BlockState(0);


/// Block state of every tile in a chunk section, indexed by local tile index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChunkBlocks(Box<[BlockState]>);

impl ChunkBlocks {
    /// Construct filled with `AIR`.
    pub fn new() -> Self {
        Self::filled(AIR)
    }

    /// Construct with every tile set to `state`.
    pub fn filled(state: BlockState) -> Self {
        ChunkBlocks(vec![state; NUM_LTIS].into_boxed_slice())
    }

    pub fn get(&self, lti: u16) -> BlockState {
        self.0[lti as usize]
    }

    pub fn set(&mut self, lti: u16, state: BlockState) {
        self.0[lti as usize] = state;
    }

    /// Whether every tile is `AIR`.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&state| state == AIR)
    }
}

impl Default for ChunkBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u16> for ChunkBlocks {
    type Output = BlockState;

    fn index(&self, lti: u16) -> &BlockState {
        &self.0[lti as usize]
    }
}

impl IndexMut<u16> for ChunkBlocks {
    fn index_mut(&mut self, lti: u16) -> &mut BlockState {
        &mut self.0[lti as usize]
    }
}
