//! Data structures for the block world as seen by a client.
//!
//! Basic example:
//!
//! ```
//! use chunk_data::{
//!     BlockState,
//!     ChunkBlocks,
//!     LoadedChunks,
//! };
//! use vek::*;
//!
//! let mut chunks = LoadedChunks::new();
//! chunks.add(Vec3::new(0, 0, 0), ChunkBlocks::new());
//!
//! assert!(chunks.set_block(Vec3::new(3, 1, 4), BlockState(1)));
//! assert_eq!(chunks.get_block(Vec3::new(3, 1, 4)), Some(BlockState(1)));
//!
//! // blocks outside of loaded chunks are unknown, not air
//! assert_eq!(chunks.get_block(Vec3::new(3, -1, 4)), None);
//! ```
//!
//! ## tiles, global tile coordinates
//!
//! The world contains a grid of _tiles_ which extends indefinitely in all
//! directions. A tile can be globally identified by a _global tile coordinate_
//! (gtc) a 3-vec of signed integers wherein the physical volume occupied that
//! tile starts at those coordinates and has an extent of <1,1,1>.
//!
//! ## chunks, chunk coordinates
//!
//! Tiles are grouped into _chunk sections_, which are cubes of 16 tiles along
//! every axis, the unit in which a server sends block data. A chunk can be
//! identified by a _chunk coordinate_ (cc), such that the chunk occupies the
//! volume starting at 16 times its cc with an extent of <16,16,16>.
//!
//! ## local tile coordinates and indices
//!
//! Relative to its chunk, a tile is identified by a _local tile coordinate_
//! (ltc) with components in `0..16`, which packs into 12 bits as a _local tile
//! index_ (lti). Per-tile storage is then simply an array of 4096 elements.
//!
//! ## faces
//!
//! The six faces of a box are labeled with `Cardinal` directions, each of which
//! is bound to an `Axis` and a `Pole`. West/east is X, down/up is Y,
//! north/south is Z.

mod axis;
mod coord;
mod block;
mod loaded;


pub use self::{
    axis::{
        NUM_AXES,
        AXES,
        NUM_CARDINALS,
        CARDINALS,
        Axis,
        Pole,
        Cardinal,
    },
    coord::{
        CHUNK_EXTENT,
        MAX_LTC,
        NUM_LTIS,
        MAX_LTI,
        ltc_to_lti,
        lti_to_ltc,
        gtc_get_cc,
        gtc_get_ltc,
        gtc_get_lti,
        cc_ltc_to_gtc,
        pos_to_gtc,
    },
    block::{
        AIR,
        BlockState,
        ChunkBlocks,
    },
    loaded::{
        LoadedChunks,
        Getter,
    },
};
