//! Tunable physics constants, loadable from JSON.

use crate::physics::aa_box::AaBox;
use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "physics.json";

/// Horizontal distance covered per tick when walking rather than running.
pub const WALK_SPEED: f64 = 4.3 / 20.0;

/// Horizontal distance covered per tick when running. The default movement speed.
pub const RUN_SPEED: f64 = 5.612 / 20.0;


/// Physics constants. Distances are in blocks, durations in ticks.
///
/// Missing fields take their default values, unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsSettings {
    /// Max horizontal distance moved per tick.
    pub movement_speed: f64,
    /// Subtracted from vertical velocity every tick.
    pub gravity: f64,
    /// Vertical velocity multiplier applied every tick, after gravity.
    pub drag: f64,
    /// Vertical velocity set when a jump is applied.
    pub jump_force: f64,
    /// Max height of a ledge the avatar walks onto without jumping.
    pub stepping_height: f64,
    /// Squared horizontal distance to the movement target below which it
    /// counts as reached.
    pub arrival_epsilon_sq: f64,
    /// Half of the avatar's width along x and z.
    pub player_half_width: f64,
    pub player_height: f64,
    /// Whether an unsteppable wall fails the current movement request.
    pub cancel_move_on_wall_bump: bool,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        PhysicsSettings {
            movement_speed: RUN_SPEED,
            gravity: 0.08,
            drag: 0.98,
            jump_force: 0.42,
            stepping_height: 0.5,
            arrival_epsilon_sq: 0.00001,
            player_half_width: 0.3,
            player_height: 1.8,
            cancel_move_on_wall_bump: true,
        }
    }
}

impl PhysicsSettings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::try_read(path).unwrap_or_else(|e| {
            debug!(?path, "using default physics settings: {:#}", e);
            Self::default()
        })
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }

    /// The avatar's collision box, relative to its position, which is the
    /// center of the bottom face.
    pub fn player_box(&self) -> AaBox {
        let w = self.player_half_width;
        AaBox::new([-w, 0.0, -w], [w, self.player_height, w])
    }
}


#[test]
fn test_partial_settings_fill_defaults() {
    let settings: PhysicsSettings = serde_json::from_str(r#"{ "stepping_height": 1.0 }"#).unwrap();
    assert_eq!(settings.stepping_height, 1.0);
    assert_eq!(settings.gravity, 0.08);
    assert_eq!(settings.movement_speed, RUN_SPEED);
}

#[test]
fn test_unknown_settings_rejected() {
    assert!(serde_json::from_str::<PhysicsSettings>(r#"{ "gravitee": 1.0 }"#).is_err());
}

#[test]
fn test_player_box() {
    let player_box = PhysicsSettings::default().player_box();
    assert_eq!(player_box.min, vek::Vec3::new(-0.3, 0.0, -0.3));
    assert_eq!(player_box.max, vek::Vec3::new(0.3, 1.8, 0.3));
}

#[test]
fn test_settings_file_roundtrip() {
    let path = std::env::temp_dir().join(format!("avatar-settings-test-{}.json", std::process::id()));
    let mut settings = PhysicsSettings::default();
    settings.jump_force = 0.5;
    settings.write(&path).unwrap();
    assert_eq!(PhysicsSettings::try_read(&path).unwrap(), settings);
    std::fs::remove_file(&path).unwrap();

    assert!(PhysicsSettings::try_read(&path).is_err());
    assert_eq!(PhysicsSettings::read(&path), PhysicsSettings::default());
}
