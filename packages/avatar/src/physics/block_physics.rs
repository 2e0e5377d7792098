//! Physics which collide with blocks' collision shapes.

use crate::{
    avatar::AvatarState,
    error::{
        MoveError,
        JumpError,
    },
    pending::{
        Completer,
        PendingResult,
        pending,
    },
    physics::{
        Correction,
        Physics,
        collision::{
            MoveAdjust,
            calc_move_dest,
        },
        stepping::try_step_up,
    },
    settings::PhysicsSettings,
    world::{
        WorldGeometry,
        obstacles_in,
    },
};
use chunk_data::Cardinal;
use vek::*;


/// Walking, falling, stepping and jumping through the block grid.
///
/// A movement target and a jump can be in flight at the same time.
#[derive(Debug)]
pub struct BlockPhysics {
    settings: PhysicsSettings,
    movement_target: Option<Vec3<f64>>,
    arrival: Option<Completer<(), MoveError>>,
    jump_queued: bool,
    landing: Option<Completer<(), JumpError>>,
}

/// What happened during one tick, beyond what is written to the avatar state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub arrived: bool,
    pub jumped: bool,
    pub stepped: bool,
    pub bumped_into_wall: bool,
    pub bumped_into_ceiling: bool,
    pub landed: bool,
}

impl BlockPhysics {
    pub fn new(settings: PhysicsSettings) -> Self {
        BlockPhysics {
            settings,
            movement_target: None,
            arrival: None,
            jump_queued: false,
            landing: None,
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    pub fn movement_target(&self) -> Option<Vec3<f64>> {
        self.movement_target
    }

    pub fn jump_queued(&self) -> bool {
        self.jump_queued
    }

    /// Forget velocity, ground contact, movement target, and a jump not yet
    /// taken off, failing the pending movement. A pending jump landing stays
    /// pending until the next floor contact.
    pub fn reset(&mut self, avatar: &mut AvatarState) {
        debug!(pos=?avatar.pos, "resetting physics");
        avatar.vel = Vec3::zero();
        avatar.on_ground = false;
        self.movement_target = None;
        self.jump_queued = false;
        if let Some(arrival) = self.arrival.take() {
            arrival.fail(MoveError::Reset);
        }
    }

    /// Drop requests whose callers have given up on them.
    fn forget_cancelled(&mut self) {
        if self.arrival.as_ref().map(Completer::is_cancelled).unwrap_or(false) {
            debug!("movement cancelled by caller");
            self.arrival = None;
            self.movement_target = None;
        }
        if self.landing.as_ref().map(Completer::is_cancelled).unwrap_or(false) {
            debug!("jump cancelled by caller");
            self.landing = None;
            self.jump_queued = false;
        }
    }

    fn fail_arrival(&mut self, error: MoveError) {
        self.movement_target = None;
        if let Some(arrival) = self.arrival.take() {
            arrival.fail(error);
        }
    }

    /// Advance the avatar by one tick, reporting what happened.
    pub fn do_tick<W: WorldGeometry>(&mut self, avatar: &mut AvatarState, world: &W) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !avatar.alive() {
            return outcome;
        }
        self.forget_cancelled();

        // movement target only influences x and z, falling and stepping change y
        let mut move_horiz = Vec3::zero();
        if let Some(target) = self.movement_target {
            let delta = Vec3::new(target.x - avatar.pos.x, 0.0, target.z - avatar.pos.z);
            if delta.magnitude_squared() < self.settings.arrival_epsilon_sq {
                trace!(?target, "arrived");
                self.movement_target = None;
                if let Some(arrival) = self.arrival.take() {
                    arrival.resolve(());
                }
                outcome.arrived = true;
            } else {
                let len = delta.magnitude();
                move_horiz =
                    if len > self.settings.movement_speed { delta * (self.settings.movement_speed / len) }
                    else { delta };
            }
        }

        let mut vel_y = avatar.vel.y;
        if self.jump_queued && avatar.on_ground {
            self.jump_queued = false;
            vel_y = self.settings.jump_force;
            outcome.jumped = true;
        }
        vel_y = (vel_y - self.settings.gravity) * self.settings.drag;
        avatar.vel = Vec3::new(move_horiz.x, vel_y, move_horiz.z);

        // gather obstacles once, with room to also cover stepping
        let player_box = self.settings.player_box();
        let start_box = player_box.translate(avatar.pos);
        let mut region = start_box.union(start_box.translate(avatar.vel));
        region.max.y += self.settings.stepping_height;
        let obstacles = obstacles_in(world, region);

        let mut adjust = calc_move_dest(avatar.vel, start_box, &obstacles);
        if adjust.wall_collision().is_some() {
            let stepped = try_step_up(
                avatar.vel,
                start_box,
                &obstacles,
                self.settings.stepping_height,
                &adjust,
            );
            if let Some(stepped) = stepped {
                trace!(from=?avatar.pos, "stepping up");
                adjust = stepped;
                outcome.stepped = true;
            }
        }
        let MoveAdjust { end_box, collisions } = adjust;
        let wall = collisions.iter().find(|c| c.face.axis().is_horizontal()).copied();
        outcome.bumped_into_ceiling = collisions.iter().any(|c| c.face == Cardinal::Down);
        outcome.landed = collisions.iter().any(|c| c.face == Cardinal::Up);
        outcome.bumped_into_wall = wall.is_some();

        if outcome.bumped_into_ceiling || outcome.landed {
            avatar.vel.y = 0.0;
        }
        if outcome.landed {
            if let Some(landing) = self.landing.take() {
                trace!("jump landed");
                landing.resolve(());
            }
        }
        avatar.on_ground = outcome.landed;

        if end_box.is_nan() {
            warn!(pos=?avatar.pos, vel=?avatar.vel, "physics produced NaN position, staying put");
            avatar.vel = Vec3::zero();
            self.fail_arrival(MoveError::InvalidPosition);
            return outcome;
        }
        avatar.pos = end_box.min - player_box.min;

        if let Some(wall) = wall {
            if self.settings.cancel_move_on_wall_bump && self.arrival.is_some() {
                debug!(pos=?avatar.pos, face=?wall.face, obstacle=?wall.aa_box, "bumped into wall");
                self.fail_arrival(MoveError::BumpedIntoWall);
            }
        }

        outcome
    }
}

impl Physics for BlockPhysics {
    fn movement_speed(&self) -> f64 {
        self.settings.movement_speed
    }

    fn set_movement_speed(&mut self, speed: f64) {
        self.settings.movement_speed = speed;
    }

    fn move_to(&mut self, destination: Vec3<f64>) -> PendingResult<(), MoveError> {
        if let Some(superseded) = self.arrival.take() {
            trace!(?destination, "movement target superseded");
            superseded.resolve(());
        }
        let (completer, pending) = pending();
        self.movement_target = Some(destination);
        self.arrival = Some(completer);
        pending
    }

    fn jump(&mut self, avatar: &AvatarState) -> PendingResult<(), JumpError> {
        if !avatar.on_ground {
            return PendingResult::ready(Err(JumpError::NotOnGround));
        }
        if self.landing.as_ref().map(|landing| !landing.is_cancelled()).unwrap_or(false) {
            return PendingResult::ready(Err(JumpError::AlreadyJumping));
        }
        let (completer, pending) = pending();
        self.jump_queued = true;
        self.landing = Some(completer);
        pending
    }

    fn tick<W: WorldGeometry>(&mut self, avatar: &mut AvatarState, world: &W) {
        self.do_tick(avatar, world);
    }

    fn on_correction(&mut self, avatar: &mut AvatarState, correction: Correction) {
        match correction {
            Correction::Teleport => self.reset(avatar),
            Correction::Vehicle => {
                avatar.on_ground = true;
                avatar.vel = Vec3::zero();
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{
        aa_box::AaBox,
        shape::Shape,
    };
    use std::collections::HashMap;

    /// Stone floor with its top at y = 0 over x, z in -8..8.
    fn floor() -> HashMap<Vec3<i64>, Shape> {
        let mut world = HashMap::new();
        for x in -8..8 {
            for z in -8..8 {
                world.insert(Vec3::new(x, -1, z), Shape::solid());
            }
        }
        world
    }

    /// Avatar standing on the floor, after settling for one tick.
    fn standing(
        physics: &mut BlockPhysics,
        world: &HashMap<Vec3<i64>, Shape>,
        pos: Vec3<f64>,
    ) -> AvatarState {
        let mut avatar = AvatarState::at(pos);
        physics.tick(&mut avatar, world);
        assert!(avatar.on_ground);
        avatar
    }

    fn tick_n(
        physics: &mut BlockPhysics,
        avatar: &mut AvatarState,
        world: &HashMap<Vec3<i64>, Shape>,
        n: usize,
    ) {
        for _ in 0..n {
            physics.tick(avatar, world);
        }
    }

    #[test]
    fn test_falls_and_lands() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = AvatarState::at(Vec3::new(0.5, 3.0, 0.5));

        physics.tick(&mut avatar, &world);
        assert!(!avatar.on_ground);
        assert!((avatar.vel.y - (-0.08 * 0.98)).abs() < 1e-12);
        assert!((avatar.pos.y - (3.0 - 0.0784)).abs() < 1e-12);

        tick_n(&mut physics, &mut avatar, &world, 40);
        assert!(avatar.on_ground);
        assert_eq!(avatar.pos.y, 0.0);
        assert_eq!(avatar.vel.y, 0.0);
        assert_eq!(avatar.pos.x, 0.5);
    }

    #[test]
    fn test_standing_is_stable() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));
        tick_n(&mut physics, &mut avatar, &world, 20);
        assert!(avatar.on_ground);
        assert_eq!(avatar.pos, Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_unloaded_blocks_are_passable() {
        let world: HashMap<Vec3<i64>, Shape> = HashMap::new();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = AvatarState::at(Vec3::new(0.5, 0.0, 0.5));
        tick_n(&mut physics, &mut avatar, &world, 3);
        assert!(avatar.pos.y < 0.0);
        assert!(!avatar.on_ground);
    }

    #[test]
    fn test_move_to_arrives() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(3.0, 7.0, 0.5));
        physics.tick(&mut avatar, &world);
        assert!((avatar.vel.x - physics.movement_speed()).abs() < 1e-12);
        assert!((avatar.pos.x - (0.5 + physics.movement_speed())).abs() < 1e-9);
        assert_eq!(arrival.try_take(), None);

        tick_n(&mut physics, &mut avatar, &world, 20);
        assert_eq!(arrival.try_take(), Some(Ok(())));
        assert_eq!(physics.movement_target(), None);
        assert!((avatar.pos.x - 3.0).abs() < 1e-3);
        // target height is ignored
        assert_eq!(avatar.pos.y, 0.0);
        assert_eq!(avatar.vel, Vec3::zero());
    }

    #[test]
    fn test_move_to_supersedes() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut first = physics.move_to(Vec3::new(5.0, 0.0, 0.5));
        physics.tick(&mut avatar, &world);
        let mut second = physics.move_to(Vec3::new(-5.0, 0.0, 0.5));
        assert_eq!(first.try_take(), Some(Ok(())));
        assert_eq!(second.try_take(), None);
        assert_eq!(physics.movement_target(), Some(Vec3::new(-5.0, 0.0, 0.5)));

        physics.tick(&mut avatar, &world);
        assert!(avatar.vel.x < 0.0);
    }

    #[test]
    fn test_cancelled_move_clears_target() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(5.0, 0.0, 0.5));
        arrival.cancel();
        assert_eq!(arrival.try_take(), Some(Err(MoveError::Cancelled)));

        physics.tick(&mut avatar, &world);
        assert_eq!(physics.movement_target(), None);
        assert_eq!(avatar.pos.x, 0.5);
    }

    #[test]
    fn test_wall_bump_fails_move() {
        let mut world = floor();
        for y in 0..3 {
            for z in -8..8 {
                world.insert(Vec3::new(2, y, z), Shape::solid());
            }
        }
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(5.0, 0.0, 0.5));
        let mut bumped = false;
        for _ in 0..10 {
            if physics.do_tick(&mut avatar, &world).bumped_into_wall {
                bumped = true;
                break;
            }
        }
        assert!(bumped);
        assert_eq!(arrival.try_take(), Some(Err(MoveError::BumpedIntoWall)));
        assert_eq!(physics.movement_target(), None);
        assert!((avatar.pos.x - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_wall_bump_can_be_tolerated() {
        let mut world = floor();
        world.insert(Vec3::new(2, 0, 0), Shape::solid());
        world.insert(Vec3::new(2, 1, 0), Shape::solid());
        let mut settings = PhysicsSettings::default();
        settings.cancel_move_on_wall_bump = false;
        let mut physics = BlockPhysics::new(settings);
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(5.0, 0.0, 0.5));
        tick_n(&mut physics, &mut avatar, &world, 10);
        assert_eq!(arrival.try_take(), None);
        assert!((avatar.pos.x - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_steps_onto_slab() {
        let mut world = floor();
        for z in -8..8 {
            world.insert(Vec3::new(2, 0, z), Shape::new(vec![
                AaBox::new([0.0, 0.0, 0.0], [1.0, 0.5, 1.0]),
            ]));
        }
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(2.5, 0.0, 0.5));
        let mut stepped = false;
        for _ in 0..20 {
            stepped |= physics.do_tick(&mut avatar, &world).stepped;
        }
        assert!(stepped);
        assert_eq!(arrival.try_take(), Some(Ok(())));
        assert_eq!(avatar.pos.y, 0.5);
        assert!(avatar.on_ground);
    }

    #[test]
    fn test_steps_onto_block_with_high_stepping() {
        let mut world = floor();
        for z in -8..8 {
            world.insert(Vec3::new(2, 0, z), Shape::solid());
        }

        // too high by default
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));
        let mut arrival = physics.move_to(Vec3::new(2.5, 0.0, 0.5));
        tick_n(&mut physics, &mut avatar, &world, 20);
        assert_eq!(arrival.try_take(), Some(Err(MoveError::BumpedIntoWall)));
        assert_eq!(avatar.pos.y, 0.0);

        let mut settings = PhysicsSettings::default();
        settings.stepping_height = 1.0;
        let mut physics = BlockPhysics::new(settings);
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));
        let mut arrival = physics.move_to(Vec3::new(2.5, 0.0, 0.5));
        tick_n(&mut physics, &mut avatar, &world, 20);
        assert_eq!(arrival.try_take(), Some(Ok(())));
        assert_eq!(avatar.pos.y, 1.0);
        assert!(avatar.on_ground);
    }

    #[test]
    fn test_jump_arc() {
        let world = floor();
        let settings = PhysicsSettings::default();
        let mut physics = BlockPhysics::new(settings.clone());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut landing = physics.jump(&avatar);
        assert!(physics.jump_queued());

        let outcome = physics.do_tick(&mut avatar, &world);
        assert!(outcome.jumped);
        let rise = (settings.jump_force - settings.gravity) * settings.drag;
        assert!((avatar.vel.y - rise).abs() < 1e-12);
        assert!((avatar.pos.y - rise).abs() < 1e-12);
        assert!(!avatar.on_ground);
        assert_eq!(landing.try_take(), None);

        let mut ticks = 1;
        while !avatar.on_ground {
            physics.tick(&mut avatar, &world);
            ticks += 1;
            assert!(ticks < 30, "never landed");
            assert!(avatar.pos.y < 1.3);
        }
        assert_eq!(landing.try_take(), Some(Ok(())));
        assert_eq!(avatar.pos.y, 0.0);
        assert!(ticks > 5);
    }

    #[test]
    fn test_jump_requires_ground() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = AvatarState::at(Vec3::new(0.5, 2.0, 0.5));
        physics.tick(&mut avatar, &world);
        let before = avatar.clone();

        let mut jump = physics.jump(&avatar);
        assert_eq!(jump.try_take(), Some(Err(JumpError::NotOnGround)));
        assert!(!physics.jump_queued());
        assert_eq!(avatar, before);
    }

    #[test]
    fn test_jump_twice() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut first = physics.jump(&avatar);
        let mut second = physics.jump(&avatar);
        assert_eq!(second.try_take(), Some(Err(JumpError::AlreadyJumping)));
        assert_eq!(first.try_take(), None);
    }

    #[test]
    fn test_reset_fails_move_keeps_landing() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(5.0, 0.0, 0.5));
        let mut landing = physics.jump(&avatar);
        physics.tick(&mut avatar, &world);
        physics.tick(&mut avatar, &world);
        assert!(avatar.pos.y > 0.0);

        avatar.pos = Vec3::new(-3.5, 2.0, -3.5);
        physics.on_correction(&mut avatar, Correction::Teleport);
        assert_eq!(arrival.try_take(), Some(Err(MoveError::Reset)));
        assert_eq!(physics.movement_target(), None);
        assert_eq!(avatar.vel, Vec3::zero());
        assert!(!avatar.on_ground);
        assert_eq!(landing.try_take(), None);

        tick_n(&mut physics, &mut avatar, &world, 40);
        assert!(avatar.on_ground);
        assert_eq!(avatar.pos.y, 0.0);
        assert!((avatar.pos - Vec3::new(-3.5, 0.0, -3.5)).magnitude() < 1e-9);
        assert_eq!(landing.try_take(), Some(Ok(())));
    }

    #[test]
    fn test_reset_drops_jump_not_yet_taken() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut landing = physics.jump(&avatar);
        avatar.pos = Vec3::new(0.5, 1.0, 0.5);
        physics.on_correction(&mut avatar, Correction::Teleport);
        assert!(!physics.jump_queued());
        assert_eq!(landing.try_take(), None);

        let mut ticks = 0;
        while !avatar.on_ground {
            assert!(!physics.do_tick(&mut avatar, &world).jumped);
            ticks += 1;
            assert!(ticks < 30, "never landed");
        }
        assert_eq!(landing.try_take(), Some(Ok(())));

        let outcome = physics.do_tick(&mut avatar, &world);
        assert!(!outcome.jumped);
        assert!(avatar.on_ground);
        assert_eq!(avatar.pos.y, 0.0);
    }

    #[test]
    fn test_jump_bumps_into_ceiling() {
        let mut world = floor();
        world.insert(Vec3::new(0, 2, 0), Shape::solid());
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut landing = physics.jump(&avatar);
        let outcome = physics.do_tick(&mut avatar, &world);
        assert!(outcome.jumped);
        assert!(outcome.bumped_into_ceiling);
        assert!(!outcome.landed);
        assert_eq!(avatar.vel.y, 0.0);
        // head against the block's underside
        assert!((avatar.pos.y - 0.2).abs() < 1e-9);
        assert!(!avatar.on_ground);
        assert_eq!(landing.try_take(), None);

        let mut ticks = 1;
        while !avatar.on_ground {
            physics.tick(&mut avatar, &world);
            ticks += 1;
            assert!(ticks < 30, "never landed");
            assert!(avatar.pos.y < 0.2 + 1e-9);
        }
        assert_eq!(landing.try_take(), Some(Ok(())));
        assert_eq!(avatar.pos.y, 0.0);
    }

    #[test]
    fn test_vehicle_correction() {
        let world: HashMap<Vec3<i64>, Shape> = HashMap::new();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = AvatarState::at(Vec3::new(0.5, 10.0, 0.5));
        physics.tick(&mut avatar, &world);
        assert!(!avatar.on_ground);

        physics.on_correction(&mut avatar, Correction::Vehicle);
        assert!(avatar.on_ground);
        assert_eq!(avatar.vel, Vec3::zero());
    }

    #[test]
    fn test_dead_avatar_does_not_move() {
        let world: HashMap<Vec3<i64>, Shape> = HashMap::new();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = AvatarState::at(Vec3::new(0.5, 10.0, 0.5));
        avatar.health = 0.0;
        tick_n(&mut physics, &mut avatar, &world, 5);
        assert_eq!(avatar.pos, Vec3::new(0.5, 10.0, 0.5));
    }

    #[test]
    fn test_nan_position_stays_put() {
        let world = floor();
        let mut physics = BlockPhysics::new(PhysicsSettings::default());
        let mut avatar = standing(&mut physics, &world, Vec3::new(0.5, 0.0, 0.5));

        let mut arrival = physics.move_to(Vec3::new(f64::NAN, 0.0, 0.5));
        physics.tick(&mut avatar, &world);
        assert_eq!(avatar.pos, Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(arrival.try_take(), Some(Err(MoveError::InvalidPosition)));
    }
}
