//! Resolving a box's movement against static obstacle boxes.
//!
//! The moving box is reduced to its minimum corner, and each obstacle is grown
//! towards negative infinity by the moving box's size, such that the moving
//! box touches an obstacle exactly when its minimum corner touches the grown
//! obstacle. The movement is then a ray cast from the minimum corner, which
//! stops at the first struck face, cancels the movement along that face's
//! axis, and continues with what remains, so as to slide along surfaces.

use crate::physics::{
    aa_box::AaBox,
    ray::{
        PARALLEL_EPSILON_SQ,
        SURFACE_EPSILON,
        Ray,
        RayHit,
        ray_box_intercept,
    },
};
use chunk_data::Cardinal;
use vek::*;


/// Max number of surfaces a single movement can be deflected by. Enough for
/// one per axis.
pub const MAX_RESOLVE_PASSES: usize = 3;


/// Obstacle struck while resolving a movement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Collision {
    /// The obstacle, as it was given.
    pub aa_box: AaBox,
    /// The face of the obstacle that was struck.
    pub face: Cardinal,
}

/// Result of resolving a movement.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAdjust {
    /// Where the moving box ends up.
    pub end_box: AaBox,
    /// Obstacles struck, in the order they were struck.
    pub collisions: Vec<Collision>,
}

impl MoveAdjust {
    /// Displacement of the moving box's minimum corner.
    pub fn displacement(&self, source: AaBox) -> Vec3<f64> {
        self.end_box.min - source.min
    }

    /// Whether an obstacle was struck on the given face.
    pub fn struck(&self, face: Cardinal) -> bool {
        self.collisions.iter().any(|c| c.face == face)
    }

    /// First obstacle struck on a vertical face, if any.
    pub fn wall_collision(&self) -> Option<&Collision> {
        self.collisions.iter().find(|c| c.face.axis().is_horizontal())
    }
}


/// Resolve moving `source` by `move_vec` through `obstacles`.
///
/// Obstacles which `source` already penetrates are ignored, so an embedded
/// box can move out of them freely. Motion components too small to be
/// cast against a plane are dropped.
pub fn calc_move_dest(move_vec: Vec3<f64>, source: AaBox, obstacles: &[AaBox]) -> MoveAdjust {
    let size = source.size();
    let candidates = obstacles.iter()
        .copied()
        .filter(|&obstacle| !source.penetrates(obstacle, SURFACE_EPSILON))
        .map(|obstacle| (obstacle, AaBox {
            min: obstacle.min - size,
            max: obstacle.max,
        }))
        .collect::<Vec<_>>();

    let mut start = source.min;
    let mut remaining = drop_negligible(move_vec);
    let mut collisions = Vec::new();

    for _ in 0..MAX_RESOLVE_PASSES {
        if remaining == Vec3::zero() {
            break;
        }

        let ray = Ray::new(start, remaining);
        let mut closest: Option<(AaBox, RayHit)> = None;
        let mut closest_dist_sq = remaining.magnitude_squared();
        for &(obstacle, grown) in &candidates {
            let hit = match ray_box_intercept(grown, ray) {
                Some(hit) => hit,
                None => continue,
            };

            // passing out through a face is not a collision
            let normal = hit.face.to_vec().map(|n| n as f64);
            if normal.dot(remaining) >= 0.0 {
                continue;
            }

            let dist_sq = (hit.intercept - start).magnitude_squared();
            if dist_sq < closest_dist_sq {
                closest_dist_sq = dist_sq;
                closest = Some((obstacle, hit));
            }
        }

        let (obstacle, hit) = match closest {
            Some(closest) => closest,
            None => break,
        };
        collisions.push(Collision {
            aa_box: obstacle,
            face: hit.face,
        });

        remaining -= hit.intercept - start;
        remaining[hit.face.axis() as usize] = 0.0;
        // a leftover too small to be cast would skip straight through planes
        remaining = drop_negligible(remaining);
        start = hit.intercept;
    }

    MoveAdjust {
        end_box: AaBox::with_size(start + remaining, size),
        collisions,
    }
}

/// Zero out components too small to be cast against a plane.
fn drop_negligible(v: Vec3<f64>) -> Vec3<f64> {
    v.map(|n| if n * n < PARALLEL_EPSILON_SQ { 0.0 } else { n })
}


#[cfg(test)]
fn assert_close(a: Vec3<f64>, b: Vec3<f64>) {
    assert!((a - b).magnitude() < 1e-9, "{:?} != {:?}", a, b);
}

#[cfg(test)]
fn player_at(pos: Vec3<f64>) -> AaBox {
    AaBox::new([-0.3, 0.0, -0.3], [0.3, 1.8, 0.3]).translate(pos)
}

#[test]
fn test_free_movement() {
    let source = player_at(Vec3::new(0.5, 2.0, 0.5));
    let adjust = calc_move_dest(Vec3::new(0.2, -0.1, 0.3), source, &[]);
    assert!(adjust.collisions.is_empty());
    assert_close(adjust.displacement(source), Vec3::new(0.2, -0.1, 0.3));
}

#[test]
fn test_stops_at_block_side() {
    // walking at a block while slightly below its top
    let source = player_at(Vec3::new(-1.0, 1.0, 0.15));
    let adjust = calc_move_dest(Vec3::new(1.0, -0.08, 0.0), source, &[AaBox::UNIT_BOX]);

    assert_eq!(adjust.collisions.len(), 1);
    assert_eq!(adjust.collisions[0].face, Cardinal::West);
    assert_eq!(adjust.collisions[0].aa_box, AaBox::UNIT_BOX);

    let end_pos = adjust.end_box.min + Vec3::new(0.3, 0.0, 0.3);
    assert_close(end_pos, Vec3::new(-0.3, 0.92, 0.15));
}

#[test]
fn test_slides_along_wall() {
    let wall = AaBox::new([1.0, 0.0, -5.0], [2.0, 3.0, 5.0]);
    let source = AaBox::new([0.0, 0.0, 0.0], [0.6, 1.8, 0.6]);
    let adjust = calc_move_dest(Vec3::new(1.0, 0.0, 0.5), source, &[wall]);

    assert_eq!(adjust.collisions.len(), 1);
    assert_eq!(adjust.collisions[0].face, Cardinal::West);
    assert_close(adjust.end_box.min, Vec3::new(0.4, 0.0, 0.5));
    assert!((adjust.end_box.max.x - wall.min.x).abs() < 1e-9);
}

#[test]
fn test_flush_obstacle_blocks_axis() {
    let wall = AaBox::new([1.0, 0.0, -5.0], [2.0, 3.0, 5.0]);
    let source = AaBox::new([0.4, 0.0, 0.0], [1.0, 1.8, 0.6]);
    let adjust = calc_move_dest(Vec3::new(0.5, 0.0, 0.0), source, &[wall]);

    assert_eq!(adjust.collisions.len(), 1);
    assert_eq!(adjust.collisions[0].face, Cardinal::West);
    assert_close(adjust.displacement(source), Vec3::zero());
}

#[test]
fn test_lands_exactly_on_floor() {
    let source = AaBox::with_size(Vec3::new(0.2, 1.05, 0.2), Vec3::new(0.6, 1.8, 0.6));
    let adjust = calc_move_dest(Vec3::new(0.0, -0.1, 0.0), source, &[AaBox::UNIT_BOX]);

    assert!(adjust.struck(Cardinal::Up));
    assert_eq!(adjust.end_box.min.y, 1.0);
    assert!(adjust.wall_collision().is_none());
}

#[test]
fn test_leaving_floor_is_free() {
    let source = AaBox::with_size(Vec3::new(0.2, 1.0, 0.2), Vec3::new(0.6, 1.8, 0.6));
    let adjust = calc_move_dest(Vec3::new(0.0, 0.33, 0.0), source, &[AaBox::UNIT_BOX]);

    assert!(adjust.collisions.is_empty());
    assert_close(adjust.displacement(source), Vec3::new(0.0, 0.33, 0.0));
}

#[test]
fn test_embedded_obstacle_ignored() {
    let source = AaBox::with_size(Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.6, 1.8, 0.6));
    let adjust = calc_move_dest(Vec3::new(0.5, 0.0, 0.0), source, &[AaBox::UNIT_BOX]);

    assert!(adjust.collisions.is_empty());
    assert_close(adjust.displacement(source), Vec3::new(0.5, 0.0, 0.0));
}

#[test]
fn test_corner_deflects_on_every_axis() {
    let floor = AaBox::new([-5.0, -1.0, -5.0], [5.0, 0.0, 5.0]);
    let wall_x = AaBox::new([1.0, 0.0, -5.0], [2.0, 3.0, 5.0]);
    let wall_z = AaBox::new([-5.0, 0.0, 1.0], [5.0, 3.0, 2.0]);
    let source = AaBox::new([0.0, 0.1, 0.0], [0.6, 1.9, 0.6]);
    let adjust = calc_move_dest(
        Vec3::new(0.8, -0.4, 0.8),
        source,
        &[floor, wall_x, wall_z],
    );

    assert_eq!(adjust.collisions.len(), 3);
    assert!(adjust.struck(Cardinal::Up));
    assert!(adjust.struck(Cardinal::West));
    assert!(adjust.struck(Cardinal::North));
    assert_close(adjust.end_box.min, Vec3::new(0.4, 0.0, 0.4));
}

#[test]
fn test_landing_beside_wall_leaves_no_overlap() {
    // lands a hair before reaching the wall, leaving a sliver of x movement
    let floor = AaBox::new([-5.0, -1.0, -5.0], [5.0, 0.0, 5.0]);
    let wall = AaBox::new([1.0, 0.0, -5.0], [2.0, 3.0, 5.0]);
    let size = Vec3::new(0.6, 1.8, 0.6);
    let source = AaBox::with_size(Vec3::new(0.120084, 0.0999, 0.0), size);

    let adjust = calc_move_dest(Vec3::new(0.28, -0.1, 0.0), source, &[floor, wall]);
    assert_eq!(adjust.collisions.len(), 1);
    assert!(adjust.struck(Cardinal::Up));
    assert_eq!(adjust.end_box.min.y, 0.0);
    assert!(adjust.end_box.max.x <= wall.min.x);
    assert!(!adjust.end_box.penetrates(wall, SURFACE_EPSILON));

    // so the wall still stops the next movement
    let next = calc_move_dest(Vec3::new(0.28, -0.0784, 0.0), adjust.end_box, &[floor, wall]);
    assert!(next.struck(Cardinal::West));
    assert!(next.end_box.max.x <= wall.min.x + 1e-12);
}
