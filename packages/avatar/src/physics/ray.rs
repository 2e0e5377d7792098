//! Intersecting line segments with axis-aligned boxes.

use crate::physics::aa_box::AaBox;
use chunk_data::{
    Axis,
    Cardinal,
    CARDINALS,
};
use vek::*;


/// Squared ray delta along an axis below which the ray is considered parallel
/// to the planes orthogonal to that axis.
pub const PARALLEL_EPSILON_SQ: f64 = 0.0000001;

/// Distance below which a point is considered to lie on a surface.
///
/// A plane this close behind the ray start still counts as intersected, which
/// absorbs floating point drift of positions previously placed exactly on it.
pub const SURFACE_EPSILON: f64 = 0.0000001;


/// Line segment from `start` to `start + delta`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub start: Vec3<f64>,
    pub delta: Vec3<f64>,
}

/// Where and through which face a ray intersected a box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayHit {
    pub intercept: Vec3<f64>,
    pub face: Cardinal,
}

impl Ray {
    pub fn new(start: Vec3<f64>, delta: Vec3<f64>) -> Self {
        Ray { start, delta }
    }

    /// Point at which the segment crosses the plane orthogonal to `axis` at
    /// `plane`, if any.
    ///
    /// The returned point's `axis` component is exactly `plane`.
    pub fn intersect_ortho_plane(self, axis: Axis, plane: f64) -> Option<Vec3<f64>> {
        let i = axis as usize;
        let delta = self.delta[i];
        if delta * delta < PARALLEL_EPSILON_SQ {
            return None;
        }

        let t = (plane - self.start[i]) / delta;
        let t_min = -SURFACE_EPSILON / delta.abs();
        if !(t_min..=1.0).contains(&t) {
            return None;
        }

        let mut point = self.start + self.delta * t.max(0.0);
        point[i] = plane;
        Some(point)
    }
}

/// Find the closest point, to the ray start, at which the ray crosses one of
/// the box's faces.
///
/// Crossing points which lie on an edge of a face do not count. Ties between
/// faces go to the first in `CARDINALS` order.
pub fn ray_box_intercept(aa_box: AaBox, ray: Ray) -> Option<RayHit> {
    let mut closest: Option<(RayHit, f64)> = None;
    for face in CARDINALS {
        let axis = face.axis();
        let intercept = match ray.intersect_ortho_plane(axis, aa_box.face_plane(face)) {
            Some(intercept) => intercept,
            None => continue,
        };
        if !aa_box.face_rect_contains(intercept, axis) {
            continue;
        }

        let dist_sq = (intercept - ray.start).magnitude_squared();
        if closest.map(|(_, best)| dist_sq < best).unwrap_or(true) {
            closest = Some((RayHit { intercept, face }, dist_sq));
        }
    }
    closest.map(|(hit, _)| hit)
}


#[cfg(test)]
fn centered_box() -> AaBox {
    AaBox::new([-0.5, -0.5, -0.5], [0.5, 0.5, 0.5])
}

#[test]
fn test_ray_from_center_exits_matching_face() {
    for face in CARDINALS {
        let dir = face.to_vec().map(|n| n as f64);
        let hit = ray_box_intercept(centered_box(), Ray::new(Vec3::zero(), dir))
            .expect("ray from center must exit");
        assert_eq!(hit.face, face);
        assert_eq!(hit.intercept, dir * 0.5);
    }
}

#[test]
fn test_ray_hits_nearest_face_from_outside() {
    let ray = Ray::new(Vec3::new(-2.0, 0.1, 0.2), Vec3::new(4.0, 0.0, 0.0));
    let hit = ray_box_intercept(centered_box(), ray).unwrap();
    assert_eq!(hit.face, Cardinal::West);
    assert_eq!(hit.intercept.x, -0.5);
    assert!((hit.intercept.y - 0.1).abs() < 1e-12);
}

#[test]
fn test_parallel_ray_misses() {
    // zero delta on x, starting beyond the box's x extent
    let ray = Ray::new(Vec3::new(1.0, -2.0, -2.0), Vec3::new(0.0, 4.0, 4.0));
    assert_eq!(ray_box_intercept(centered_box(), ray), None);

    // zero delta on x, within the x extent: only y/z faces can be struck
    let ray = Ray::new(Vec3::new(0.1, -2.0, 0.0), Vec3::new(0.0, 4.0, 0.0));
    let hit = ray_box_intercept(centered_box(), ray).unwrap();
    assert_eq!(hit.face, Cardinal::Down);
}

#[test]
fn test_ray_along_edge_misses() {
    let ray = Ray::new(Vec3::new(-2.0, 0.5, 0.0), Vec3::new(4.0, 0.0, 0.0));
    assert_eq!(ray_box_intercept(centered_box(), ray), None);

    let ray = Ray::new(Vec3::new(-2.0, 0.5, 0.5), Vec3::new(4.0, 0.0, 0.0));
    assert_eq!(ray_box_intercept(centered_box(), ray), None);
}

#[test]
fn test_short_ray_misses() {
    let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(ray_box_intercept(centered_box(), ray), None);
}

#[test]
fn test_ray_starting_on_plane() {
    let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, -0.1, 0.0));
    let hit = ray_box_intercept(centered_box(), ray).unwrap();
    assert_eq!(hit.face, Cardinal::Up);
    assert_eq!(hit.intercept, Vec3::new(0.0, 0.5, 0.0));
}
