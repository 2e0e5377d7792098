//! Messages exchanged with the server which concern the avatar's movement.
//!
//! Only the movement-relevant subset of a connection's traffic. Encoding them
//! on the wire is the connection's business.

use crate::avatar::Look;
use vek::*;


/// Message sent from client to server.
#[derive(Debug, Clone, PartialEq)]
pub enum UpMsg {
    /// Set own position and direction.
    PositionLook(UpMsgPositionLook),
    /// Set own position, direction unchanged.
    Position(UpMsgPosition),
    /// Set own direction, position unchanged.
    Look(UpMsgLook),
    /// Neither position nor direction changed. Sent every tick regardless, as
    /// a keepalive of sorts.
    OnGround(bool),
    /// Acknowledge a server position correction.
    TeleportConfirm(i32),
}

/// Set own position and direction.
#[derive(Debug, Clone, PartialEq)]
pub struct UpMsgPositionLook {
    pub pos: Vec3<f64>,
    pub look: Look,
    pub on_ground: bool,
}

/// Set own position, direction unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct UpMsgPosition {
    pub pos: Vec3<f64>,
    pub on_ground: bool,
}

/// Set own direction, position unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct UpMsgLook {
    pub look: Look,
    pub on_ground: bool,
}

impl UpMsg {
    /// The position this message reports, if it reports one.
    pub fn pos(&self) -> Option<Vec3<f64>> {
        match self {
            &UpMsg::PositionLook(UpMsgPositionLook { pos, .. }) => Some(pos),
            &UpMsg::Position(UpMsgPosition { pos, .. }) => Some(pos),
            _ => None,
        }
    }
}


/// Message sent from server to client.
#[derive(Debug, Clone, PartialEq)]
pub enum DownMsg {
    /// Authoritative correction of the avatar's position and direction.
    ///
    /// The first one places the avatar in the world. Must be confirmed with
    /// `UpMsg::TeleportConfirm`.
    PlayerPosLook(DownMsgPlayerPosLook),
    /// Authoritative position of the vehicle the avatar is riding.
    VehicleMove(DownMsgVehicleMove),
    /// Avatar health changed. Zero or less means dead.
    UpdateHealth(f32),
    /// Connection is closing.
    Disconnect(Option<String>),
}

/// Authoritative correction of the avatar's position and direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DownMsgPlayerPosLook {
    pub pos: Vec3<f64>,
    pub look: Look,
    pub teleport_id: i32,
}

/// Authoritative position of the vehicle the avatar is riding.
#[derive(Debug, Clone, PartialEq)]
pub struct DownMsgVehicleMove {
    pub pos: Vec3<f64>,
    pub look: Look,
}
