//! Block collision shape registry, loaded from JSON.
//!
//! Format:
//!
//! ```json
//! {
//!     "shapes": {
//!         "0": [],
//!         "1": [[0, 0, 0, 1, 1, 1]],
//!         "2": [[0, 0, 0, 1, 0.5, 1]]
//!     },
//!     "blocks": [
//!         { "name": "air", "min_state": 0, "states": 1, "shapes": 0 },
//!         { "name": "stone", "min_state": 1, "states": 1, "shapes": 1 },
//!         { "name": "stone_slab", "min_state": 2, "states": 2, "shapes": [2, 1] }
//!     ]
//! }
//! ```
//!
//! Each shape is a list of `[x1, y1, z1, x2, y2, z2]` boxes in block-local
//! coordinates. Each block covers the state ids `min_state..min_state + states`
//! and either gives one shape id for all of them or one per state.

use crate::physics::{
    aa_box::AaBox,
    shape::Shape,
};
use chunk_data::BlockState;
use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::Path,
};
use serde::Deserialize;
use anyhow::*;


#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlockDataFile {
    shapes: HashMap<String, Vec<[f64; 6]>>,
    blocks: Vec<BlockEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlockEntry {
    name: String,
    min_state: u16,
    states: u16,
    shapes: ShapeRefs,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ShapeRefs {
    All(u32),
    PerState(Vec<u32>),
}


/// Collision shape and name of every known block state.
#[derive(Debug, Clone, Default)]
pub struct BlockData {
    shapes: Vec<Option<Shape>>,
    names: Vec<Option<String>>,
    by_name: HashMap<String, BlockState>,
}

impl BlockData {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: BlockDataFile = serde_json::from_str(json)
            .context("parsing block data")?;
        Self::from_file_data(file)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let data = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Self::from_file_data(data)
    }

    fn from_file_data(file: BlockDataFile) -> Result<Self> {
        let mut shapes = HashMap::new();
        for (id, boxes) in file.shapes {
            let id = id.parse::<u32>()
                .with_context(|| format!("invalid shape id {:?}", id))?;
            let boxes = boxes.into_iter()
                .map(|[x1, y1, z1, x2, y2, z2]| {
                    ensure!(
                        x1 <= x2 && y1 <= y2 && z1 <= z2,
                        "shape {} has inverted box", id,
                    );
                    Ok(AaBox::new([x1, y1, z1], [x2, y2, z2]))
                })
                .collect::<Result<Vec<_>>>()?;
            shapes.insert(id, Shape::new(boxes));
        }

        let mut data = BlockData::default();
        for block in file.blocks {
            let shape_ids = match block.shapes {
                ShapeRefs::All(id) => vec![id; block.states as usize],
                ShapeRefs::PerState(ids) => {
                    ensure!(
                        ids.len() == block.states as usize,
                        "block {} has {} states but {} shapes", block.name, block.states, ids.len(),
                    );
                    ids
                }
            };
            for (i, shape_id) in shape_ids.into_iter().enumerate() {
                let state = block.min_state as usize + i;
                let shape = shapes.get(&shape_id)
                    .with_context(|| format!("block {} references unknown shape {}", block.name, shape_id))?
                    .clone();
                if data.shapes.len() <= state {
                    data.shapes.resize(state + 1, None);
                    data.names.resize(state + 1, None);
                }
                data.shapes[state] = Some(shape);
                data.names[state] = Some(block.name.clone());
            }
            data.by_name.insert(block.name, BlockState(block.min_state));
        }
        Ok(data)
    }

    /// Register a block state directly.
    pub fn insert(&mut self, state: BlockState, name: &str, shape: Shape) {
        let i = state.0 as usize;
        if self.shapes.len() <= i {
            self.shapes.resize(i + 1, None);
            self.names.resize(i + 1, None);
        }
        self.shapes[i] = Some(shape);
        self.names[i] = Some(name.to_owned());
        self.by_name.entry(name.to_owned()).or_insert(state);
    }

    /// Collision shape of the block state. None if unknown.
    pub fn shape(&self, state: BlockState) -> Option<&Shape> {
        self.shapes.get(state.0 as usize)?.as_ref()
    }

    pub fn name(&self, state: BlockState) -> Option<&str> {
        self.names.get(state.0 as usize)?.as_deref()
    }

    /// First state of the named block.
    pub fn state_by_name(&self, name: &str) -> Option<BlockState> {
        self.by_name.get(name).copied()
    }
}


#[cfg(test)]
const TEST_JSON: &'static str = r#"{
    "shapes": {
        "0": [],
        "1": [[0, 0, 0, 1, 1, 1]],
        "2": [[0, 0, 0, 1, 0.5, 1]]
    },
    "blocks": [
        { "name": "air", "min_state": 0, "states": 1, "shapes": 0 },
        { "name": "stone", "min_state": 1, "states": 1, "shapes": 1 },
        { "name": "stone_slab", "min_state": 2, "states": 2, "shapes": [2, 1] }
    ]
}"#;

#[test]
fn test_parse_block_data() {
    let data = BlockData::from_json(TEST_JSON).unwrap();

    assert!(data.shape(BlockState(0)).unwrap().is_empty());
    assert_eq!(data.shape(BlockState(1)), Some(&Shape::solid()));
    assert_eq!(data.shape(BlockState(2)).unwrap().outer_box().unwrap().max.y, 0.5);
    assert_eq!(data.shape(BlockState(3)), Some(&Shape::solid()));
    assert_eq!(data.shape(BlockState(4)), None);

    assert_eq!(data.state_by_name("stone_slab"), Some(BlockState(2)));
    assert_eq!(data.name(BlockState(3)), Some("stone_slab"));
    assert_eq!(data.state_by_name("dirt"), None);
}

#[test]
fn test_reject_bad_block_data() {
    let unknown_shape = r#"{
        "shapes": {},
        "blocks": [{ "name": "stone", "min_state": 1, "states": 1, "shapes": 1 }]
    }"#;
    assert!(BlockData::from_json(unknown_shape).is_err());

    let state_count = r#"{
        "shapes": { "0": [] },
        "blocks": [{ "name": "air", "min_state": 0, "states": 2, "shapes": [0] }]
    }"#;
    assert!(BlockData::from_json(state_count).is_err());

    assert!(BlockData::from_json("{").is_err());
}

#[test]
fn test_insert() {
    let mut data = BlockData::default();
    data.insert(BlockState(5), "fence", Shape::new(vec![
        AaBox::new([0.375, 0.0, 0.375], [0.625, 1.5, 0.625]),
    ]));
    assert_eq!(data.state_by_name("fence"), Some(BlockState(5)));
    assert_eq!(data.shape(BlockState(4)), None);
    assert!(data.shape(BlockState(5)).is_some());
}
