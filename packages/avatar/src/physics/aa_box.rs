//! Axis-aligned box.

use chunk_data::{
    Axis,
    Cardinal,
    Pole,
};
use vek::*;


/// Axis-aligned box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AaBox {
    /// Box minimum corner position.
    pub min: Vec3<f64>,
    /// Box maximum corner position. Assumed to be component-wise >= `min`.
    pub max: Vec3<f64>,
}

impl AaBox {
    /// Box from <0,0,0> to <1,1,1>.
    pub const UNIT_BOX: AaBox = AaBox {
        min: Vec3 { x: 0.0, y: 0.0, z: 0.0 },
        max: Vec3 { x: 1.0, y: 1.0, z: 1.0 },
    };

    pub fn new<V1, V2>(min: V1, max: V2) -> Self
    where
        V1: Into<Vec3<f64>>,
        V2: Into<Vec3<f64>>,
    {
        AaBox {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Box with the given minimum corner and size.
    pub fn with_size(min: Vec3<f64>, size: Vec3<f64>) -> Self {
        AaBox {
            min,
            max: min + size,
        }
    }

    /// Translate self by `v`.
    pub fn translate<V: Into<Vec3<f64>>>(self, v: V) -> Self {
        let v = v.into();
        AaBox {
            min: self.min + v,
            max: self.max + v,
        }
    }

    pub fn size(self) -> Vec3<f64> {
        self.max - self.min
    }

    pub fn center(self) -> Vec3<f64> {
        (self.min + self.max) / 2.0
    }

    /// Coordinate, along the face's axis, of the plane that face lies in.
    pub fn face_plane(self, face: Cardinal) -> f64 {
        let (axis, pole) = face.to_axis_pole();
        match pole {
            Pole::Neg => self.min[axis as usize],
            Pole::Pos => self.max[axis as usize],
        }
    }

    /// Per-axis penetration depths of `other` into self, expressed as a box.
    ///
    /// `result.min._ > 0` means `other` intrudes from the negative direction,
    /// `result.max._ > 0` means `other` intrudes from the positive direction.
    /// The boxes overlap iff every component of the result is positive.
    pub fn intersection(self, other: AaBox) -> AaBox {
        AaBox {
            min: other.max - self.min,
            max: self.max - other.min,
        }
    }

    /// Whether any penetration depth of this `intersection` result is not positive.
    pub fn is_empty(self) -> bool {
        self.min.x <= 0.0 || self.min.y <= 0.0 || self.min.z <= 0.0
            || self.max.x <= 0.0 || self.max.y <= 0.0 || self.max.z <= 0.0
    }

    /// Does self overlap with `other`? Boxes that merely touch do not.
    pub fn intersects(self, other: AaBox) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Does self overlap with `other` by more than `tolerance` along every axis?
    pub fn penetrates(self, other: AaBox, tolerance: f64) -> bool {
        let depths = self.intersection(other);
        depths.min.reduce_partial_min() > tolerance && depths.max.reduce_partial_min() > tolerance
    }

    /// Smallest box containing both self and `other`.
    pub fn union(self, other: AaBox) -> AaBox {
        AaBox {
            min: Vec3::partial_min(self.min, other.min),
            max: Vec3::partial_max(self.max, other.max),
        }
    }

    /// Is `point` strictly within self's extent on the two axes other than `axis`?
    ///
    /// Points on an edge of the face rectangle do not count.
    pub fn face_rect_contains(self, point: Vec3<f64>, axis: Axis) -> bool {
        axis.other_axes().into_iter().all(|other| {
            let i = other as usize;
            self.min[i] < point[i] && point[i] < self.max[i]
        })
    }

    /// Whether any coordinate is NaN.
    pub fn is_nan(self) -> bool {
        self.min.map(f64::is_nan).reduce_or() || self.max.map(f64::is_nan).reduce_or()
    }
}


#[test]
fn test_touching_boxes_do_not_intersect() {
    let a = AaBox::UNIT_BOX;
    let b = AaBox::UNIT_BOX.translate([1.0, 0.0, 0.0]);
    assert!(!a.intersects(b));
    assert!(!b.intersects(a));
    assert!(a.intersects(AaBox::UNIT_BOX.translate([0.5, 0.5, -0.5])));
}

#[test]
fn test_intersection_direction() {
    let a = AaBox::UNIT_BOX;
    let b = AaBox::UNIT_BOX.translate([-0.25, 0.0, 0.0]);
    let depths = a.intersection(b);
    // b intrudes from the negative x direction
    assert_eq!(depths.min.x, 0.75);
    assert_eq!(depths.max.x, 1.25);
}

#[test]
fn test_penetrates_tolerance() {
    let a = AaBox::UNIT_BOX;
    let b = AaBox::UNIT_BOX.translate([1.0 - 1e-12, 0.0, 0.0]);
    assert!(a.intersects(b));
    assert!(!a.penetrates(b, 1e-9));
    assert!(a.penetrates(AaBox::UNIT_BOX.translate([0.5, 0.0, 0.0]), 1e-9));
}

#[test]
fn test_size_center_union() {
    let a = AaBox::new([-0.3, 0.0, -0.3], [0.3, 1.8, 0.3]);
    assert!((a.size() - Vec3::new(0.6, 1.8, 0.6)).magnitude() < 1e-12);
    assert!((a.center() - Vec3::new(0.0, 0.9, 0.0)).magnitude() < 1e-12);

    let u = a.union(AaBox::UNIT_BOX);
    assert_eq!(u, AaBox::new([-0.3, 0.0, -0.3], [1.0, 1.8, 1.0]));
}

#[test]
fn test_face_planes() {
    let a = AaBox::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
    assert_eq!(a.face_plane(Cardinal::West), 1.0);
    assert_eq!(a.face_plane(Cardinal::East), 4.0);
    assert_eq!(a.face_plane(Cardinal::Down), 2.0);
    assert_eq!(a.face_plane(Cardinal::Up), 5.0);
    assert_eq!(a.face_plane(Cardinal::North), 3.0);
    assert_eq!(a.face_plane(Cardinal::South), 6.0);
}
