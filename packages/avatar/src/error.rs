//! Ways in which movement and jump requests can fail.

use crate::pending::Cancelled;
use std::fmt::{
    self,
    Display,
    Formatter,
};


/// Reason a `move_to` request failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The caller cancelled the request, or the physics engine was dropped.
    Cancelled,
    /// Physics state was reset by a server position correction.
    Reset,
    /// Horizontal movement was blocked by a wall which could not be stepped over.
    BumpedIntoWall,
    /// The computed position became invalid, so the avatar stayed put.
    InvalidPosition,
    /// The active physics mode does not support movement.
    Unsupported,
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            MoveError::Cancelled => "movement cancelled",
            MoveError::Reset => "movement interrupted by physics reset",
            MoveError::BumpedIntoWall => "bumped into wall",
            MoveError::InvalidPosition => "movement produced invalid position",
            MoveError::Unsupported => "movement not supported by physics mode",
        })
    }
}

impl std::error::Error for MoveError {}

impl From<Cancelled> for MoveError {
    fn from(_: Cancelled) -> Self {
        MoveError::Cancelled
    }
}


/// Reason a `jump` request failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JumpError {
    /// Jumping requires standing on a floor.
    NotOnGround,
    /// A previous jump has not landed yet.
    AlreadyJumping,
    /// The caller cancelled the request, or the physics engine was dropped.
    Cancelled,
    /// The active physics mode does not support jumping.
    Unsupported,
}

impl Display for JumpError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            JumpError::NotOnGround => "can only jump when on ground",
            JumpError::AlreadyJumping => "already jumping",
            JumpError::Cancelled => "jump cancelled",
            JumpError::Unsupported => "jumping not supported by physics mode",
        })
    }
}

impl std::error::Error for JumpError {}

impl From<Cancelled> for JumpError {
    fn from(_: Cancelled) -> Self {
        JumpError::Cancelled
    }
}


#[test]
fn test_errors_are_anyhow_compatible() {
    let e = anyhow::Error::from(MoveError::BumpedIntoWall);
    assert_eq!(e.to_string(), "bumped into wall");
    assert_eq!(JumpError::from(Cancelled), JumpError::Cancelled);
}
