//! The avatar together with everything that drives it.

use crate::{
    avatar::AvatarState,
    error::{
        MoveError,
        JumpError,
    },
    message::*,
    outbound::{
        Outbound,
        PosLookTracker,
    },
    pending::PendingResult,
    physics::{
        Correction,
        Physics,
    },
    world::WorldGeometry,
};
use vek::*;


/// Default squared distance between a correction and the last reported
/// position within which the correction is considered an echo of it.
pub const DEFAULT_ECHO_EPSILON_SQ: f64 = 0.00001;


/// Avatar state, world view, physics engine, and link to the server.
///
/// Not internally synchronized; the tick driver serializes access.
#[derive(Debug)]
pub struct Bot<W, O, P> {
    pub avatar: AvatarState,
    pub world: W,
    physics: P,
    outbound: O,
    tracker: PosLookTracker,
    echo_epsilon_sq: f64,
    ticks: u64,
}

impl<W: WorldGeometry, O: Outbound, P: Physics> Bot<W, O, P> {
    pub fn new(world: W, outbound: O, physics: P) -> Self {
        Bot {
            avatar: AvatarState::default(),
            world,
            physics,
            outbound,
            tracker: PosLookTracker::new(),
            echo_epsilon_sq: DEFAULT_ECHO_EPSILON_SQ,
            ticks: 0,
        }
    }

    pub fn with_echo_epsilon_sq(mut self, echo_epsilon_sq: f64) -> Self {
        self.echo_epsilon_sq = echo_epsilon_sq;
        self
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn outbound(&self) -> &O {
        &self.outbound
    }

    pub fn velocity(&self) -> Vec3<f64> {
        self.avatar.vel
    }

    pub fn on_ground(&self) -> bool {
        self.avatar.on_ground
    }

    /// Number of ticks the physics has run for.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn move_to(&mut self, destination: Vec3<f64>) -> PendingResult<(), MoveError> {
        self.physics.move_to(destination)
    }

    pub fn jump(&mut self) -> PendingResult<(), JumpError> {
        self.physics.jump(&self.avatar)
    }

    /// Run physics for one tick and report the result to the server.
    ///
    /// Nothing happens before the avatar is spawned, and nothing moves while it's dead.
    pub fn on_tick(&mut self) {
        if !self.avatar.spawned {
            return;
        }
        if self.avatar.alive() {
            self.physics.tick(&mut self.avatar, &self.world);
        }
        let msg = self.tracker.next_msg(&self.avatar);
        self.outbound.send(msg);
        self.ticks += 1;
    }

    /// Process a message from the server. Returns false if the connection is closing.
    pub fn on_down_msg(&mut self, msg: DownMsg) -> bool {
        match msg {
            DownMsg::PlayerPosLook(msg) => self.on_player_pos_look(msg),
            DownMsg::VehicleMove(msg) => {
                trace!(pos=?msg.pos, "vehicle moved");
                self.avatar.pos = msg.pos;
                self.avatar.look = msg.look;
                self.physics.on_correction(&mut self.avatar, Correction::Vehicle);
            }
            DownMsg::UpdateHealth(health) => {
                if health <= 0.0 && self.avatar.alive() {
                    info!("avatar died");
                }
                self.avatar.health = health;
            }
            DownMsg::Disconnect(reason) => {
                info!(?reason, "disconnected");
                return false;
            }
        }
        true
    }

    fn on_player_pos_look(&mut self, msg: DownMsgPlayerPosLook) {
        // the server confirming where we said we are needn't disrupt physics
        let echo = self.avatar.spawned && self.tracker
            .last_sent_pos()
            .map(|sent| (sent - msg.pos).magnitude_squared() < self.echo_epsilon_sq)
            .unwrap_or(false);

        self.avatar.pos = msg.pos;
        self.avatar.look = msg.look;

        self.outbound.send(UpMsg::TeleportConfirm(msg.teleport_id));
        self.outbound.send(UpMsg::PositionLook(UpMsgPositionLook {
            pos: self.avatar.pos,
            look: self.avatar.look,
            on_ground: self.avatar.on_ground,
        }));
        self.tracker.rebase(self.avatar.pos, self.avatar.look);

        if !self.avatar.spawned {
            info!(pos=?msg.pos, "spawned");
            self.avatar.spawned = true;
        }
        if echo {
            trace!(pos=?msg.pos, "correction echoes reported position");
        } else {
            debug!(pos=?msg.pos, teleport_id=msg.teleport_id, "position corrected by server");
            self.physics.on_correction(&mut self.avatar, Correction::Teleport);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        avatar::Look,
        physics::{
            block_physics::BlockPhysics,
            shape::Shape,
        },
        settings::PhysicsSettings,
    };
    use std::collections::HashMap;

    type TestBot = Bot<HashMap<Vec3<i64>, Shape>, Vec<UpMsg>, BlockPhysics>;

    fn test_bot() -> TestBot {
        let mut world = HashMap::new();
        for x in -8..8 {
            for z in -8..8 {
                world.insert(Vec3::new(x, -1, z), Shape::solid());
            }
        }
        Bot::new(world, Vec::new(), BlockPhysics::new(PhysicsSettings::default()))
    }

    fn spawn(bot: &mut TestBot, pos: Vec3<f64>) {
        assert!(bot.on_down_msg(DownMsg::PlayerPosLook(DownMsgPlayerPosLook {
            pos,
            look: Look::default(),
            teleport_id: 1,
        })));
    }

    #[test]
    fn test_no_ticks_before_spawn() {
        let mut bot = test_bot();
        bot.on_tick();
        assert!(bot.outbound().is_empty());
        assert_eq!(bot.ticks(), 0);
    }

    #[test]
    fn test_spawn_confirms_teleport() {
        let mut bot = test_bot();
        spawn(&mut bot, Vec3::new(0.5, 1.0, 0.5));
        assert!(bot.avatar.spawned);
        assert_eq!(bot.outbound()[0], UpMsg::TeleportConfirm(1));
        assert_eq!(bot.outbound()[1].pos(), Some(Vec3::new(0.5, 1.0, 0.5)));

        bot.on_tick();
        assert!(matches!(bot.outbound()[2], UpMsg::Position(_)));
        assert!(!bot.on_ground());
    }

    #[test]
    fn test_standing_sends_keepalive() {
        let mut bot = test_bot();
        spawn(&mut bot, Vec3::new(0.5, 0.0, 0.5));
        bot.on_tick();
        bot.on_tick();
        assert_eq!(bot.outbound().last(), Some(&UpMsg::OnGround(true)));
        assert!(bot.on_ground());
    }

    #[test]
    fn test_correction_resets_move() {
        let mut bot = test_bot();
        spawn(&mut bot, Vec3::new(0.5, 0.0, 0.5));
        bot.on_tick();

        let mut arrival = bot.move_to(Vec3::new(5.0, 0.0, 0.5));
        bot.on_tick();
        bot.on_down_msg(DownMsg::PlayerPosLook(DownMsgPlayerPosLook {
            pos: Vec3::new(-2.5, 0.0, 0.5),
            look: Look::default(),
            teleport_id: 2,
        }));
        assert_eq!(arrival.try_take(), Some(Err(MoveError::Reset)));
        assert_eq!(bot.velocity(), Vec3::zero());
        assert!(!bot.on_ground());
        assert_eq!(bot.avatar.pos, Vec3::new(-2.5, 0.0, 0.5));
    }

    #[test]
    fn test_echo_correction_keeps_move() {
        let mut bot = test_bot();
        spawn(&mut bot, Vec3::new(0.5, 0.0, 0.5));
        bot.on_tick();

        let mut arrival = bot.move_to(Vec3::new(5.0, 0.0, 0.5));
        bot.on_tick();
        let reported = bot.outbound().last().and_then(UpMsg::pos).unwrap();
        bot.on_down_msg(DownMsg::PlayerPosLook(DownMsgPlayerPosLook {
            pos: reported,
            look: Look::default(),
            teleport_id: 2,
        }));
        assert_eq!(bot.outbound()[bot.outbound().len() - 2], UpMsg::TeleportConfirm(2));
        assert_eq!(arrival.try_take(), None);
        assert_eq!(bot.physics().movement_target(), Some(Vec3::new(5.0, 0.0, 0.5)));
        assert!(bot.on_ground());
    }

    #[test]
    fn test_echo_epsilon_is_adjustable() {
        let mut bot = test_bot().with_echo_epsilon_sq(0.0);
        spawn(&mut bot, Vec3::new(0.5, 0.0, 0.5));
        bot.on_tick();

        let mut arrival = bot.move_to(Vec3::new(5.0, 0.0, 0.5));
        bot.on_tick();
        let reported = bot.outbound().last().and_then(UpMsg::pos).unwrap();
        bot.on_down_msg(DownMsg::PlayerPosLook(DownMsgPlayerPosLook {
            pos: reported,
            look: Look::default(),
            teleport_id: 2,
        }));
        assert_eq!(arrival.try_take(), Some(Err(MoveError::Reset)));
    }

    #[test]
    fn test_dead_avatar_stays_put() {
        let mut bot = test_bot();
        spawn(&mut bot, Vec3::new(0.5, 3.0, 0.5));
        bot.on_down_msg(DownMsg::UpdateHealth(0.0));
        bot.on_tick();
        assert_eq!(bot.avatar.pos, Vec3::new(0.5, 3.0, 0.5));
        assert_eq!(bot.outbound().last(), Some(&UpMsg::OnGround(false)));

        bot.on_down_msg(DownMsg::UpdateHealth(20.0));
        bot.on_tick();
        assert!(bot.avatar.pos.y < 3.0);
    }

    #[test]
    fn test_vehicle_move() {
        let mut bot = test_bot();
        spawn(&mut bot, Vec3::new(0.5, 5.0, 0.5));
        bot.on_tick();
        assert!(bot.on_down_msg(DownMsg::VehicleMove(DownMsgVehicleMove {
            pos: Vec3::new(1.5, 4.0, 0.5),
            look: Look::default(),
        })));
        assert!(bot.on_ground());
        assert_eq!(bot.velocity(), Vec3::zero());
        assert_eq!(bot.avatar.pos, Vec3::new(1.5, 4.0, 0.5));
    }

    #[test]
    fn test_disconnect() {
        let mut bot = test_bot();
        assert!(!bot.on_down_msg(DownMsg::Disconnect(Some("bye".to_owned()))));
    }
}
