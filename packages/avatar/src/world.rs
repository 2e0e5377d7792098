//! The block world, as seen by the physics engine.

use crate::{
    block_data::BlockData,
    physics::{
        aa_box::AaBox,
        shape::Shape,
    },
};
use chunk_data::{
    LoadedChunks,
    BlockState,
};
use std::{
    collections::HashMap,
    sync::Arc,
};
use vek::*;


/// Read-only view of the collision geometry of the block grid.
pub trait WorldGeometry {
    /// Collision shape, _relative to `gtc`_, of the block at `gtc`.
    ///
    /// None if the block is unknown, such as when its chunk isn't loaded. The
    /// physics engine treats unknown blocks as passable.
    fn collision_shape_at(&self, gtc: Vec3<i64>) -> Option<Shape>;
}

impl<'a, W: WorldGeometry> WorldGeometry for &'a W {
    fn collision_shape_at(&self, gtc: Vec3<i64>) -> Option<Shape> {
        W::collision_shape_at(self, gtc)
    }
}

/// Sparse world of explicitly placed shapes. Everything else is unknown.
impl WorldGeometry for HashMap<Vec3<i64>, Shape> {
    fn collision_shape_at(&self, gtc: Vec3<i64>) -> Option<Shape> {
        self.get(&gtc).cloned()
    }
}


/// Broadphase: all obstacle boxes, in world coordinates, which may touch `region`.
pub fn obstacles_in<W: WorldGeometry>(world: &W, region: AaBox) -> Vec<AaBox> {
    let min = region.min.map(|n| n.floor() as i64);
    let max = region.max.map(|n| n.floor() as i64);
    let mut obstacles = Vec::new();
    for x in min.x..=max.x {
        // shapes may stick up out of the block below, such as fences
        for y in min.y - 1..=max.y {
            for z in min.z..=max.z {
                let gtc = Vec3::new(x, y, z);
                let shape = match world.collision_shape_at(gtc) {
                    Some(shape) => shape,
                    None => continue,
                };
                let offset = gtc.map(|n| n as f64);
                let outer = match shape.outer_box() {
                    Some(outer) => outer.translate(offset),
                    None => continue,
                };
                if outer.max.y < region.min.y {
                    continue;
                }
                obstacles.extend(shape.translated(offset));
            }
        }
    }
    obstacles
}


/// Block world made of loaded chunks, with shapes from block data.
#[derive(Debug, Clone)]
pub struct BlockWorld {
    pub chunks: LoadedChunks,
    pub block_data: Arc<BlockData>,
}

impl BlockWorld {
    pub fn new(block_data: Arc<BlockData>) -> Self {
        BlockWorld {
            chunks: LoadedChunks::new(),
            block_data,
        }
    }

    /// Set the block at `gtc`. Returns false if its chunk isn't loaded.
    pub fn set_block(&mut self, gtc: Vec3<i64>, state: BlockState) -> bool {
        self.chunks.set_block(gtc, state)
    }
}

impl WorldGeometry for BlockWorld {
    fn collision_shape_at(&self, gtc: Vec3<i64>) -> Option<Shape> {
        let Some(state) = self.chunks.get_block(gtc) else {
            trace!(?gtc, "block not loaded");
            return None;
        };
        let shape = self.block_data.shape(state).cloned();
        if shape.is_none() {
            trace!(?gtc, ?state, "unknown block state");
        }
        shape
    }
}


#[cfg(test)]
fn test_block_world() -> BlockWorld {
    use chunk_data::ChunkBlocks;

    let mut block_data = BlockData::default();
    block_data.insert(BlockState(0), "air", Shape::empty());
    block_data.insert(BlockState(1), "stone", Shape::solid());
    block_data.insert(BlockState(2), "fence", Shape::new(vec![
        AaBox::new([0.375, 0.0, 0.375], [0.625, 1.5, 0.625]),
    ]));

    let mut world = BlockWorld::new(Arc::new(block_data));
    world.chunks.add(Vec3::new(0, 0, 0), ChunkBlocks::new());
    world
}

#[test]
fn test_block_world_shapes() {
    let mut world = test_block_world();
    assert!(world.set_block(Vec3::new(1, 0, 1), BlockState(1)));
    assert!(world.set_block(Vec3::new(2, 0, 2), BlockState(99)));
    assert!(!world.set_block(Vec3::new(-1, 0, 0), BlockState(1)));

    assert_eq!(world.collision_shape_at(Vec3::new(1, 0, 1)), Some(Shape::solid()));
    assert!(world.collision_shape_at(Vec3::new(0, 0, 0)).unwrap().is_empty());
    // unknown state and unloaded chunk both unknown
    assert_eq!(world.collision_shape_at(Vec3::new(2, 0, 2)), None);
    assert_eq!(world.collision_shape_at(Vec3::new(-1, 0, 0)), None);
}

#[test]
fn test_obstacles_in_region() {
    let mut world = test_block_world();
    world.set_block(Vec3::new(1, 1, 1), BlockState(1));
    world.set_block(Vec3::new(5, 1, 5), BlockState(1));
    world.set_block(Vec3::new(2, 0, 1), BlockState(2));
    world.set_block(Vec3::new(1, 0, 2), BlockState(1));

    let region = AaBox::new([0.5, 1.2, 0.5], [2.9, 2.0, 1.9]);
    let obstacles = obstacles_in(&world, region);

    // the nearby stone, and the fence sticking up from the layer below
    assert_eq!(obstacles.len(), 2);
    assert!(obstacles.contains(&AaBox::UNIT_BOX.translate([1.0, 1.0, 1.0])));
    assert!(obstacles.contains(&AaBox::new([2.375, 0.0, 1.375], [2.625, 1.5, 1.625])));
}
