//! Sending movement updates to the server.

use crate::{
    avatar::{
        AvatarState,
        Look,
    },
    message::*,
};
use crossbeam_channel::Sender;
use vek::*;


/// Sink for messages to the server.
pub trait Outbound {
    fn send(&mut self, msg: UpMsg);
}

impl Outbound for Vec<UpMsg> {
    fn send(&mut self, msg: UpMsg) {
        self.push(msg);
    }
}

impl Outbound for Sender<UpMsg> {
    fn send(&mut self, msg: UpMsg) {
        if Sender::send(self, msg).is_err() {
            trace!("dropping up msg, connection closed");
        }
    }
}


/// Remembers what was last reported to the server, to pick the smallest
/// message which reports the avatar's current state.
#[derive(Debug, Clone, Default)]
pub struct PosLookTracker {
    sent: Option<(Vec3<f64>, Look)>,
}

impl PosLookTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position most recently reported to the server.
    pub fn last_sent_pos(&self) -> Option<Vec3<f64>> {
        self.sent.map(|(pos, _)| pos)
    }

    /// Consider the given state as reported.
    pub fn rebase(&mut self, pos: Vec3<f64>, look: Look) {
        self.sent = Some((pos, look));
    }

    /// Message reporting the avatar's state, which is then considered reported.
    pub fn next_msg(&mut self, avatar: &AvatarState) -> UpMsg {
        let on_ground = avatar.on_ground;
        let (pos_changed, look_changed) = match self.sent {
            Some((pos, look)) => (pos != avatar.pos, look.differs(avatar.look)),
            None => (true, true),
        };
        self.sent = Some((avatar.pos, avatar.look));

        match (pos_changed, look_changed) {
            (true, true) => UpMsg::PositionLook(UpMsgPositionLook {
                pos: avatar.pos,
                look: avatar.look,
                on_ground,
            }),
            (true, false) => UpMsg::Position(UpMsgPosition {
                pos: avatar.pos,
                on_ground,
            }),
            (false, true) => UpMsg::Look(UpMsgLook {
                look: avatar.look,
                on_ground,
            }),
            (false, false) => UpMsg::OnGround(on_ground),
        }
    }
}


#[test]
fn test_tracker_picks_smallest_msg() {
    let mut tracker = PosLookTracker::new();
    let mut avatar = AvatarState::at(Vec3::new(1.0, 2.0, 3.0));

    assert!(matches!(tracker.next_msg(&avatar), UpMsg::PositionLook(_)));
    assert_eq!(tracker.next_msg(&avatar), UpMsg::OnGround(false));

    avatar.pos.x += 0.25;
    avatar.on_ground = true;
    assert_eq!(
        tracker.next_msg(&avatar),
        UpMsg::Position(UpMsgPosition {
            pos: Vec3::new(1.25, 2.0, 3.0),
            on_ground: true,
        }),
    );

    avatar.look.yaw = 1.0;
    assert!(matches!(tracker.next_msg(&avatar), UpMsg::Look(_)));

    avatar.pos.y = 5.0;
    avatar.look.pitch = 0.2;
    assert!(matches!(tracker.next_msg(&avatar), UpMsg::PositionLook(_)));
    assert_eq!(tracker.last_sent_pos(), Some(Vec3::new(1.25, 5.0, 3.0)));
}

#[test]
fn test_channel_outbound_ignores_closed() {
    let (send, recv) = crossbeam_channel::unbounded();
    let mut send: Sender<UpMsg> = send;
    Outbound::send(&mut send, UpMsg::OnGround(true));
    assert_eq!(recv.try_recv(), Ok(UpMsg::OnGround(true)));
    drop(recv);
    Outbound::send(&mut send, UpMsg::OnGround(true));
}
