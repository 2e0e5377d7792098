//! Collision shapes of blocks.

use crate::physics::aa_box::AaBox;
use std::sync::Arc;
use vek::*;


/// Collision shape of a block, as a list of boxes in block-local coordinates.
///
/// Typically within the unit cube, but may extend beyond it (fences are 1.5 tall).
/// Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape(Arc<[AaBox]>);

impl Shape {
    /// Shape of passable blocks.
    pub fn empty() -> Self {
        Shape::new(Vec::new())
    }

    /// Full unit cube.
    pub fn solid() -> Self {
        Shape::new(vec![AaBox::UNIT_BOX])
    }

    pub fn new(boxes: Vec<AaBox>) -> Self {
        Shape(Arc::from(boxes))
    }

    pub fn boxes(&self) -> &[AaBox] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The single box, or the bounding box of all boxes. None if empty.
    pub fn outer_box(&self) -> Option<AaBox> {
        let mut iter = self.0.iter().copied();
        let first = iter.next()?;
        Some(iter.fold(first, AaBox::union))
    }

    /// The boxes, translated by `v`.
    pub fn translated<'a>(&'a self, v: Vec3<f64>) -> impl Iterator<Item=AaBox> + 'a {
        self.0.iter().map(move |aa_box| aa_box.translate(v))
    }
}


#[test]
fn test_outer_box() {
    assert_eq!(Shape::empty().outer_box(), None);
    assert_eq!(Shape::solid().outer_box(), Some(AaBox::UNIT_BOX));

    let stairs = Shape::new(vec![
        AaBox::new([0.0, 0.0, 0.0], [1.0, 0.5, 1.0]),
        AaBox::new([0.0, 0.5, 0.5], [1.0, 1.0, 1.0]),
    ]);
    assert_eq!(stairs.outer_box(), Some(AaBox::UNIT_BOX));

    let fence = Shape::new(vec![AaBox::new([0.375, 0.0, 0.375], [0.625, 1.5, 0.625])]);
    assert_eq!(fence.outer_box().unwrap().max.y, 1.5);
}

#[test]
fn test_translated() {
    let boxes = Shape::solid()
        .translated(Vec3::new(2.0, -1.0, 0.0))
        .collect::<Vec<_>>();
    assert_eq!(boxes, vec![AaBox::new([2.0, -1.0, 0.0], [3.0, 0.0, 1.0])]);
}
