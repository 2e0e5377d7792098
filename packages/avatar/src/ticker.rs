//! Driving a bot's ticks from an async runtime.

use crate::{
    bot::Bot,
    message::DownMsg,
    outbound::Outbound,
    physics::Physics,
    tick_mgr::TickMgr,
    world::WorldGeometry,
};
use std::sync::Arc;
use crossbeam_channel::{
    Receiver,
    TryRecvError,
};
use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::sleep_until,
};


/// Bot shared between its tick driver and the scripts controlling it.
pub type SharedBot<W, O, P> = Arc<Mutex<Bot<W, O, P>>>;


/// Stops the tick driver when dropped.
#[derive(Debug)]
#[must_use]
pub struct TickerGuard(JoinHandle<()>);

impl TickerGuard {
    /// Whether the tick driver stopped on its own, such as by disconnecting.
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}


/// Spawn a task which, once per tick, feeds the bot every message received
/// from the server so far and then ticks it.
///
/// Stops when the server disconnects or the inbound channel closes.
pub fn spawn_ticker<W, O, P>(
    rt: &Handle,
    tick_mgr: TickMgr,
    bot: SharedBot<W, O, P>,
    inbound: Receiver<DownMsg>,
) -> TickerGuard
where
    W: WorldGeometry + Send + 'static,
    O: Outbound + Send + 'static,
    P: Physics + Send + 'static,
{
    TickerGuard(rt.spawn(run_ticker(tick_mgr, bot, inbound)))
}

async fn run_ticker<W, O, P>(
    mut tick_mgr: TickMgr,
    bot: SharedBot<W, O, P>,
    inbound: Receiver<DownMsg>,
)
where
    W: WorldGeometry,
    O: Outbound,
    P: Physics,
{
    loop {
        sleep_until(tick_mgr.next_tick()).await;

        {
            let mut bot = bot.lock();
            loop {
                match inbound.try_recv() {
                    Ok(msg) => {
                        if !bot.on_down_msg(msg) {
                            return;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("inbound channel closed, stopping ticker");
                        return;
                    }
                }
            }
            bot.on_tick();
        }

        tick_mgr.on_tick_done();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        avatar::Look,
        error::MoveError,
        message::{
            DownMsgPlayerPosLook,
            UpMsg,
        },
        physics::{
            block_physics::BlockPhysics,
            shape::Shape,
        },
        settings::PhysicsSettings,
        tick_mgr::TICK,
    };
    use std::{
        collections::HashMap,
        time::Duration,
    };
    use vek::*;

    type TestBot = Bot<HashMap<Vec3<i64>, Shape>, Vec<UpMsg>, BlockPhysics>;

    fn shared_bot() -> SharedBot<HashMap<Vec3<i64>, Shape>, Vec<UpMsg>, BlockPhysics> {
        let mut world = HashMap::new();
        for x in -8..8 {
            for z in -8..8 {
                world.insert(Vec3::new(x, -1, z), Shape::solid());
            }
        }
        let bot: TestBot = Bot::new(world, Vec::new(), BlockPhysics::new(PhysicsSettings::default()));
        Arc::new(Mutex::new(bot))
    }

    fn spawn_msg(pos: Vec3<f64>) -> DownMsg {
        DownMsg::PlayerPosLook(DownMsgPlayerPosLook {
            pos,
            look: Look::default(),
            teleport_id: 0,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_drives_move_to() {
        let bot = shared_bot();
        let (send, recv) = crossbeam_channel::unbounded();
        send.send(spawn_msg(Vec3::new(0.5, 0.0, 0.5))).unwrap();
        let guard = spawn_ticker(&Handle::current(), TickMgr::new(), Arc::clone(&bot), recv);

        tokio::time::sleep(TICK * 2).await;
        assert!(bot.lock().avatar.spawned);

        let arrival = bot.lock().move_to(Vec3::new(3.5, 0.0, 0.5));
        let result = tokio::time::timeout(Duration::from_secs(5), arrival).await;
        assert_eq!(result.ok(), Some(Ok(())));

        let bot = bot.lock();
        assert!((bot.avatar.pos.x - 3.5).abs() < 1e-3);
        assert!(bot.ticks() > 10);
        drop(guard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_caller_side() {
        let bot = shared_bot();
        let (send, recv) = crossbeam_channel::unbounded();
        send.send(spawn_msg(Vec3::new(0.5, 0.0, 0.5))).unwrap();
        let _guard = spawn_ticker(&Handle::current(), TickMgr::new(), Arc::clone(&bot), recv);
        tokio::time::sleep(TICK * 2).await;

        let arrival = bot.lock().move_to(Vec3::new(7.5, 0.0, 0.5));
        let result = tokio::time::timeout(TICK * 3, arrival).await;
        assert!(result.is_err());

        // dropping the timed out future cancels the request
        tokio::time::sleep(TICK * 2).await;
        assert_eq!(bot.lock().physics().movement_target(), None);

        let mut retry = bot.lock().move_to(Vec3::new(7.5, 0.0, 0.5));
        retry.cancel();
        assert_eq!(retry.await, Err(MoveError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_on_disconnect() {
        let bot = shared_bot();
        let (send, recv) = crossbeam_channel::unbounded();
        let guard = spawn_ticker(&Handle::current(), TickMgr::new(), bot, recv);

        send.send(DownMsg::Disconnect(None)).unwrap();
        tokio::time::sleep(TICK * 2).await;
        assert!(guard.is_finished());
    }
}
