//! Movement physics for an autonomous avatar in a block world.
//!
//! The avatar is moved by scripts through `move_to` and `jump` requests,
//! which a physics engine carries out over the following ticks under gravity
//! and collision with the blocks around it, while reporting the avatar's
//! resulting state to the server and resyncing on the server's corrections.

#[macro_use]
extern crate tracing;

pub mod logging;
pub mod settings;
pub mod error;
pub mod pending;
pub mod avatar;
pub mod message;
pub mod outbound;
pub mod block_data;
pub mod world;
pub mod physics;
pub mod bot;
pub mod tick_mgr;
pub mod ticker;
