//! Walking up ledges without jumping.

use crate::physics::{
    aa_box::AaBox,
    collision::{
        MoveAdjust,
        calc_move_dest,
    },
};
use vek::*;


/// Retry a movement which bumped into a wall, starting `height` higher up and
/// moving horizontally only.
///
/// Gravity would pull the raised box back into the ledge, so the vertical
/// component is dropped; the avatar falls onto the ledge on later ticks.
/// Returns the retried movement if it gets further than `blocked` along at
/// least one axis.
///
/// Headroom above the raised box is not checked beyond what the obstacles
/// given cover.
pub fn try_step_up(
    move_vec: Vec3<f64>,
    source: AaBox,
    obstacles: &[AaBox],
    height: f64,
    blocked: &MoveAdjust,
) -> Option<MoveAdjust> {
    let raised = source.translate([0.0, height, 0.0]);
    let stepped = calc_move_dest(Vec3::new(move_vec.x, 0.0, move_vec.z), raised, obstacles);

    let s = stepped.displacement(raised);
    let n = blocked.displacement(source);
    let further =
        s.x.abs() > n.x.abs()
        || s.y.abs() > n.y.abs()
        || s.z.abs() > n.z.abs();
    if further {
        Some(stepped)
    } else {
        None
    }
}


#[cfg(test)]
fn player_at(pos: Vec3<f64>) -> AaBox {
    AaBox::new([-0.3, 0.0, -0.3], [0.3, 1.8, 0.3]).translate(pos)
}

#[test]
fn test_steps_onto_slab() {
    let slab = AaBox::new([1.0, 0.0, 0.0], [2.0, 0.5, 1.0]);
    let floor = AaBox::new([-2.0, -1.0, -2.0], [4.0, 0.0, 4.0]);
    let obstacles = [slab, floor];
    let source = player_at(Vec3::new(0.6, 0.0, 0.5));
    let move_vec = Vec3::new(0.28, 0.0, 0.0);

    let blocked = calc_move_dest(move_vec, source, &obstacles);
    assert!(blocked.wall_collision().is_some());

    let stepped = try_step_up(move_vec, source, &obstacles, 0.5, &blocked).unwrap();
    assert!(stepped.collisions.is_empty());
    assert_eq!(stepped.end_box.min.y, 0.5);
    assert!((stepped.end_box.min.x - (0.3 + 0.28)).abs() < 1e-9);
}

#[test]
fn test_full_block_too_high() {
    let block = AaBox::new([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
    let source = player_at(Vec3::new(0.6, 0.0, 0.5));
    let move_vec = Vec3::new(0.28, 0.0, 0.0);

    let blocked = calc_move_dest(move_vec, source, &[block]);
    assert!(blocked.wall_collision().is_some());
    assert_eq!(try_step_up(move_vec, source, &[block], 0.5, &blocked), None);

    let stepped = try_step_up(move_vec, source, &[block], 1.0, &blocked).unwrap();
    assert_eq!(stepped.end_box.min.y, 1.0);
    assert!(stepped.end_box.max.x > 1.0);
}
