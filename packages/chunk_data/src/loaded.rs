use crate::{
    block::{
        BlockState,
        ChunkBlocks,
    },
    coord::{
        gtc_get_cc,
        gtc_get_lti,
    },
};
use std::{
    cell::Cell,
    collections::hash_map::{
        self as hmap,
        HashMap,
    },
};
use slab::Slab;
use vek::*;


/// Set of loaded chunk sections and their block states.
///
/// Each loaded chunk is assigned a chunk index (ci), which may be reused after that chunk is
/// unloaded. Blocks in chunks which aren't loaded are unknown rather than air.
#[derive(Debug, Clone, Default)]
pub struct LoadedChunks {
    hmap: HashMap<Vec3<i64>, usize>,
    slab: Slab<(Vec3<i64>, ChunkBlocks)>,
}

impl LoadedChunks {
    /// Construct a new empty set of loaded chunks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk with the given block states, and get its assigned ci.
    ///
    /// If the chunk was already loaded, its blocks are replaced and it keeps its ci.
    pub fn add(&mut self, cc: Vec3<i64>, blocks: ChunkBlocks) -> usize {
        match self.hmap.entry(cc) {
            hmap::Entry::Occupied(occupied) => {
                let ci = *occupied.get();
                self.slab[ci].1 = blocks;
                ci
            }
            hmap::Entry::Vacant(vacant) => {
                let ci = self.slab.insert((cc, blocks));
                vacant.insert(ci);
                ci
            }
        }
    }

    /// Remove a chunk, returning its block states if it was loaded.
    pub fn remove(&mut self, cc: Vec3<i64>) -> Option<ChunkBlocks> {
        let ci = self.hmap.remove(&cc)?;
        Some(self.slab.remove(ci).1)
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    /// Produce a getter, for lookups, which caches the most recently accessed chunk.
    pub fn getter(&self) -> Getter {
        Getter {
            chunks: self,
            cache: Cell::new(None),
        }
    }

    /// Block state at the global tile coordinate, or None if its chunk is not loaded.
    pub fn get_block(&self, gtc: Vec3<i64>) -> Option<BlockState> {
        self.getter().gtc_get(gtc)
    }

    /// Set block state at the global tile coordinate. Returns false, and does nothing, if its
    /// chunk is not loaded.
    pub fn set_block(&mut self, gtc: Vec3<i64>, state: BlockState) -> bool {
        match self.hmap.get(&gtc_get_cc(gtc)) {
            Some(&ci) => {
                self.slab[ci].1.set(gtc_get_lti(gtc), state);
                true
            }
            None => false,
        }
    }
}


/// See `LoadedChunks::getter`.
///
/// Sequential accesses within the same chunk skip the hashmap lookup, which is the common case
/// when sweeping over the handful of tiles around a moving box.
#[derive(Debug, Clone)]
pub struct Getter<'a> {
    chunks: &'a LoadedChunks,
    cache: Cell<Option<(Vec3<i64>, usize)>>,
}

impl<'a> Getter<'a> {
    /// Perform a cc -> ci lookup.
    pub fn get(&self, cc: Vec3<i64>) -> Option<usize> {
        if let Some((cache_cc, cache_ci)) = self.cache.get() {
            if cache_cc == cc {
                return Some(cache_ci);
            }
        }

        let ci = self.chunks.hmap.get(&cc).copied()?;
        self.cache.set(Some((cc, ci)));
        Some(ci)
    }

    /// Block state at the global tile coordinate, or None if its chunk is not loaded.
    pub fn gtc_get(&self, gtc: Vec3<i64>) -> Option<BlockState> {
        let ci = self.get(gtc_get_cc(gtc))?;
        Some(self.chunks.slab[ci].1.get(gtc_get_lti(gtc)))
    }
}


#[test]
fn test_unloaded_is_unknown() {
    let mut chunks = LoadedChunks::new();
    assert_eq!(chunks.get_block(Vec3::new(0, 0, 0)), None);
    assert!(!chunks.set_block(Vec3::new(0, 0, 0), BlockState(1)));

    chunks.add(Vec3::new(0, 0, 0), ChunkBlocks::new());
    assert_eq!(chunks.get_block(Vec3::new(3, 4, 5)), Some(crate::block::AIR));
    assert_eq!(chunks.get_block(Vec3::new(-1, 4, 5)), None);
    assert_eq!(chunks.get_block(Vec3::new(16, 4, 5)), None);
}

#[test]
fn test_set_get_across_chunks() {
    let mut chunks = LoadedChunks::new();
    for cc in [Vec3::new(-1, 0, 0), Vec3::new(0, 0, 0)] {
        chunks.add(cc, ChunkBlocks::new());
    }
    assert!(chunks.set_block(Vec3::new(-1, 2, 3), BlockState(7)));
    assert!(chunks.set_block(Vec3::new(0, 2, 3), BlockState(9)));

    let getter = chunks.getter();
    assert_eq!(getter.gtc_get(Vec3::new(-1, 2, 3)), Some(BlockState(7)));
    assert_eq!(getter.gtc_get(Vec3::new(0, 2, 3)), Some(BlockState(9)));
    assert_eq!(getter.gtc_get(Vec3::new(-2, 2, 3)), Some(crate::block::AIR));
}

#[test]
fn test_remove_reuses_ci() {
    let mut chunks = LoadedChunks::new();
    let ci_a = chunks.add(Vec3::new(0, 0, 0), ChunkBlocks::new());
    chunks.add(Vec3::new(1, 0, 0), ChunkBlocks::new());
    assert!(chunks.remove(Vec3::new(0, 0, 0)).is_some());
    assert!(chunks.remove(Vec3::new(0, 0, 0)).is_none());
    let ci_c = chunks.add(Vec3::new(5, 0, 0), ChunkBlocks::new());
    assert_eq!(ci_a, ci_c);
    assert_eq!(chunks.len(), 2);
}
