//! Movement and collision physics of the avatar.
//!
//! Once per tick, a physics engine turns the avatar's desired movement into
//! velocity, resolves that velocity against the collision shapes of nearby
//! blocks, and writes the resulting position back to the avatar state.
//!
//! Collision resolution works on axis-aligned boxes. The avatar's box is swept
//! through the obstacle boxes by casting a ray from its minimum corner against
//! the obstacles grown by its size (see `collision`). If that leaves it stuck
//! against a wall, the same sweep is retried from slightly higher up, which
//! lets it walk up low ledges such as slabs and stairs (see `stepping`).

pub mod aa_box;
pub mod shape;
pub mod ray;
pub mod collision;
pub mod stepping;
pub mod block_physics;
pub mod idle_physics;

use crate::{
    avatar::AvatarState,
    error::{
        MoveError,
        JumpError,
    },
    pending::PendingResult,
    world::WorldGeometry,
};
use vek::*;


/// Kind of authoritative position correction received from the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Correction {
    /// The server placed the avatar somewhere. The avatar's position and look
    /// have already been updated when this is delivered.
    Teleport,
    /// The vehicle the avatar rides moved, and so did the avatar.
    Vehicle,
}

/// A physics mode the avatar can be driven by.
///
/// Operations are expected to be externally synchronized with ticks by the
/// tick driver.
pub trait Physics {
    /// Max horizontal distance moved per tick.
    fn movement_speed(&self) -> f64;

    fn set_movement_speed(&mut self, speed: f64);

    /// Walk in a straight line towards `destination`, horizontally, relying on
    /// falling and stepping for vertical movement.
    ///
    /// Resolves once arrived, or successfully when superseded by another call.
    fn move_to(&mut self, destination: Vec3<f64>) -> PendingResult<(), MoveError>;

    /// Jump on the next tick. Resolves once the avatar lands on a floor again.
    fn jump(&mut self, avatar: &AvatarState) -> PendingResult<(), JumpError>;

    /// Advance the avatar by one tick.
    fn tick<W: WorldGeometry>(&mut self, avatar: &mut AvatarState, world: &W);

    /// Resync with an authoritative correction from the server.
    fn on_correction(&mut self, avatar: &mut AvatarState, correction: Correction);
}
