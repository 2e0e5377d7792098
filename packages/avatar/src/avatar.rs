//! State of the avatar this client controls.

use std::f64::consts::PI;
use vek::*;


/// Direction the avatar faces, in radians.
///
/// Yaw 0 faces +z (south) and increases clockwise seen from above, so yaw
/// pi/2 faces -x (west). Pitch 0 is level, positive pitch looks down.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Look {
    pub yaw: f64,
    pub pitch: f64,
}

impl Look {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Look { yaw, pitch }
    }

    pub fn from_degrees(yaw: f64, pitch: f64) -> Self {
        Look {
            yaw: yaw.to_radians(),
            pitch: pitch.to_radians(),
        }
    }

    pub fn yaw_degrees(self) -> f64 {
        self.yaw.to_degrees()
    }

    pub fn pitch_degrees(self) -> f64 {
        self.pitch.to_degrees()
    }

    /// Unit vector in the direction of this look.
    pub fn to_vec(self) -> Vec3<f64> {
        Vec3 {
            x: -self.pitch.cos() * self.yaw.sin(),
            y: -self.pitch.sin(),
            z: self.pitch.cos() * self.yaw.cos(),
        }
    }

    /// Look in the direction of `delta`. Self if `delta` is zero.
    pub fn turn_to_vec(self, delta: Vec3<f64>) -> Self {
        let horiz = (delta.x * delta.x + delta.z * delta.z).sqrt();
        if horiz == 0.0 && delta.y == 0.0 {
            return self;
        }
        let yaw =
            if horiz == 0.0 { self.yaw }
            else { (-delta.x).atan2(delta.z) };
        let pitch = (-delta.y).atan2(horiz);
        Look {
            yaw: yaw.rem_euclid(2.0 * PI),
            pitch,
        }
    }

    /// Whether self and other differ by more than float noise.
    pub fn differs(self, other: Look) -> bool {
        (self.yaw - other.yaw).abs() > 1e-9 || (self.pitch - other.pitch).abs() > 1e-9
    }
}


/// The client-controlled avatar.
///
/// Position is the center of the bottom face of its collision box. Velocity
/// is in blocks per tick. While a physics engine is ticking it owns
/// `vel` and `on_ground`, as well as `pos` between server corrections.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarState {
    pub pos: Vec3<f64>,
    pub look: Look,
    pub vel: Vec3<f64>,
    pub on_ground: bool,
    pub health: f32,
    /// Whether the server has placed the avatar in the world yet.
    pub spawned: bool,
}

impl Default for AvatarState {
    fn default() -> Self {
        AvatarState {
            pos: Vec3::zero(),
            look: Look::default(),
            vel: Vec3::zero(),
            on_ground: false,
            health: 20.0,
            spawned: false,
        }
    }
}

impl AvatarState {
    /// Spawned avatar at rest at the given position.
    pub fn at(pos: Vec3<f64>) -> Self {
        AvatarState {
            pos,
            spawned: true,
            ..Default::default()
        }
    }

    pub fn alive(&self) -> bool {
        self.health > 0.0
    }
}


#[test]
fn test_look_degrees() {
    let look = Look::from_degrees(90.0, -45.0);
    assert!((look.yaw - PI / 2.0).abs() < 1e-12);
    assert!((look.yaw_degrees() - 90.0).abs() < 1e-9);
    assert!((look.pitch_degrees() + 45.0).abs() < 1e-9);
}

#[test]
fn test_turn_to_vec() {
    for delta in [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.3, -0.5, -2.0),
        Vec3::new(0.0, 1.0, 0.0),
    ] {
        let look = Look::default().turn_to_vec(delta);
        assert!((look.to_vec() - delta.normalized()).magnitude() < 1e-9, "{:?}", delta);
    }

    let west = Look::default().turn_to_vec(Vec3::new(-1.0, 0.0, 0.0));
    assert!((west.yaw_degrees() - 90.0).abs() < 1e-9);

    let look = Look::new(1.0, 0.5);
    assert_eq!(look.turn_to_vec(Vec3::zero()), look);
}
