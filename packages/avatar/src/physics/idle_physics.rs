//! Physics which ignore the world.

use crate::{
    avatar::AvatarState,
    error::{
        MoveError,
        JumpError,
    },
    pending::PendingResult,
    physics::{
        Correction,
        Physics,
    },
    settings::PhysicsSettings,
    world::WorldGeometry,
};
use vek::*;


/// Fastest fall per tick, one pixel, so as to land exactly on the floor.
pub const MAX_FALL_SPEED: f64 = 1.0 / 16.0;


/// Falls straight down until the server corrects the position, which
/// indicates having landed on the floor. Does not support moving or jumping.
///
/// Useful when block collision shapes are not available.
#[derive(Debug, Clone)]
pub struct IdlePhysics {
    gravity: f64,
    drag: f64,
    /// Whether ground contact has been established by a correction yet.
    ground_known: bool,
}

impl IdlePhysics {
    pub fn new(settings: &PhysicsSettings) -> Self {
        IdlePhysics {
            gravity: settings.gravity,
            drag: settings.drag,
            ground_known: false,
        }
    }
}

impl Physics for IdlePhysics {
    fn movement_speed(&self) -> f64 {
        0.0
    }

    fn set_movement_speed(&mut self, speed: f64) {
        warn!(speed, "idle physics cannot move, ignoring movement speed");
    }

    fn move_to(&mut self, _destination: Vec3<f64>) -> PendingResult<(), MoveError> {
        PendingResult::ready(Err(MoveError::Unsupported))
    }

    fn jump(&mut self, _avatar: &AvatarState) -> PendingResult<(), JumpError> {
        PendingResult::ready(Err(JumpError::Unsupported))
    }

    fn tick<W: WorldGeometry>(&mut self, avatar: &mut AvatarState, _world: &W) {
        if !avatar.alive() || avatar.on_ground {
            return;
        }
        let vel_y = ((avatar.vel.y - self.gravity) * self.drag).max(-MAX_FALL_SPEED);
        avatar.vel = Vec3::new(avatar.vel.x, vel_y, avatar.vel.z);
        avatar.pos += avatar.vel;
    }

    fn on_correction(&mut self, avatar: &mut AvatarState, correction: Correction) {
        avatar.vel = Vec3::zero();
        match correction {
            Correction::Vehicle => avatar.on_ground = true,
            Correction::Teleport => {
                // the first correction places us in the air, later ones mean we landed
                avatar.on_ground = self.ground_known && !avatar.on_ground;
                self.ground_known = true;
            }
        }
    }
}


#[test]
fn test_idle_falls_until_corrected() {
    let world: std::collections::HashMap<Vec3<i64>, crate::physics::shape::Shape> = Default::default();
    let mut physics = IdlePhysics::new(&PhysicsSettings::default());
    let mut avatar = AvatarState::at(Vec3::new(0.5, 10.0, 0.5));
    physics.on_correction(&mut avatar, Correction::Teleport);
    assert!(!avatar.on_ground);

    for _ in 0..50 {
        physics.tick(&mut avatar, &world);
        assert!(avatar.vel.y >= -MAX_FALL_SPEED);
    }
    assert_eq!(avatar.vel.y, -MAX_FALL_SPEED);
    assert!(avatar.pos.y < 10.0);
    assert_eq!(avatar.pos.x, 0.5);

    avatar.pos.y = 4.0;
    physics.on_correction(&mut avatar, Correction::Teleport);
    assert!(avatar.on_ground);
    physics.tick(&mut avatar, &world);
    assert_eq!(avatar.pos.y, 4.0);
}

#[test]
fn test_idle_rejects_movement() {
    let mut physics = IdlePhysics::new(&PhysicsSettings::default());
    let avatar = AvatarState::at(Vec3::zero());
    assert_eq!(physics.move_to(Vec3::one()).try_take(), Some(Err(MoveError::Unsupported)));
    assert_eq!(physics.jump(&avatar).try_take(), Some(Err(JumpError::Unsupported)));
    physics.set_movement_speed(1.0);
    assert_eq!(physics.movement_speed(), 0.0);
}
