
#[macro_use]
extern crate tracing;

use avatar::{
    logging::init_logging,
    settings::{
        PhysicsSettings,
        SETTINGS_FILE_NAME,
    },
    avatar::Look,
    block_data::BlockData,
    world::BlockWorld,
    message::*,
    physics::block_physics::BlockPhysics,
    bot::Bot,
    tick_mgr::{
        TickMgr,
        TICK,
    },
    ticker::spawn_ticker,
};
use chunk_data::{
    ChunkBlocks,
    AIR,
};
use std::{
    sync::Arc,
    thread,
    time::Duration,
    env::args,
    path::Path,
};
use anyhow::{
    Result,
    Context,
    bail,
};
use parking_lot::Mutex;
use tokio::{
    runtime::{
        Runtime,
        Handle,
    },
    time::{
        sleep,
        timeout,
    },
};
use vek::*;


const CLI_INTRO: &'static str = r#"Avatar physics demo.

Walks an avatar across a small in-memory world, against a loopback server."#;

const CLI_HELP: &'static str = r#"
Examples:

    [this command]
    Walk to the default destination, up a slab ledge.

    [this command] --to=-3.5,0,2.5 --jump
    Jump, then walk to the given position.

    [this command] --settings=physics.json --block-data=blocks.json --log=log
    Run with physics settings, block shapes, and a log file from the given paths.

Env var examples:
    RUST_LOG=avatar=trace
    Changes logging levels"#;

/// Block shapes of the demo world.
const DEMO_BLOCK_DATA: &'static str = r#"{
    "shapes": {
        "0": [],
        "1": [[0, 0, 0, 1, 1, 1]],
        "2": [[0, 0, 0, 1, 0.5, 1]]
    },
    "blocks": [
        { "name": "air", "min_state": 0, "states": 1, "shapes": 0 },
        { "name": "stone", "min_state": 1, "states": 1, "shapes": 1 },
        { "name": "stone_slab", "min_state": 2, "states": 1, "shapes": 2 }
    ]
}"#;

const MOVE_TIMEOUT: Duration = Duration::from_secs(30);


fn main() {
    println!("{}", CLI_INTRO);
    let args = args().collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "--help") {
        println!("{}", CLI_HELP);
        return;
    }
    if let Err(e) = init_logging(arg_value(&args, "--log=").map(Path::new)) {
        // nothing is listening to log events yet
        eprintln!("failed to initialize logging: {:#}", e);
        std::process::exit(1);
    }
    if let Err(e) = run_from_cli(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn arg_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter()
        .filter_map(|arg| arg.strip_prefix(prefix))
        .next()
}

// parse CLI args and run demo from that
fn run_from_cli(args: &[String]) -> Result<()> {
    let settings = PhysicsSettings::read(arg_value(args, "--settings=").unwrap_or(SETTINGS_FILE_NAME));
    let block_data = match arg_value(args, "--block-data=") {
        Some(path) => BlockData::read(path)?,
        None => BlockData::from_json(DEMO_BLOCK_DATA)?,
    };
    let destination = match arg_value(args, "--to=") {
        Some(s) => parse_vec3(s)?,
        None => Vec3::new(5.5, 0.0, 0.5),
    };
    let jump = args.iter().any(|arg| arg == "--jump");

    let world = demo_world(Arc::new(block_data))?;
    let rt = Runtime::new().context("creating tokio runtime")?;
    rt.block_on(run_demo(settings, world, destination, jump))
}

fn parse_vec3(s: &str) -> Result<Vec3<f64>> {
    let parts = s.split(',')
        .map(|part| part.trim().parse::<f64>()
            .with_context(|| format!("invalid coordinate {:?}", part)))
        .collect::<Result<Vec<_>>>()?;
    if parts.len() != 3 {
        bail!("expected 3 coordinates, got {}", parts.len());
    }
    Ok(Vec3::new(parts[0], parts[1], parts[2]))
}

/// Stone floor with its top at y = 0, and a slab ledge along x = 3.
fn demo_world(block_data: Arc<BlockData>) -> Result<BlockWorld> {
    let stone = block_data.state_by_name("stone").context("block data lacks stone")?;
    let slab = block_data.state_by_name("stone_slab").unwrap_or(stone);

    let mut world = BlockWorld::new(block_data);
    for x in -1..=0 {
        for y in -1..=0 {
            for z in -1..=0 {
                world.chunks.add(Vec3::new(x, y, z), ChunkBlocks::filled(AIR));
            }
        }
    }
    for x in -16..16 {
        for z in -16..16 {
            world.set_block(Vec3::new(x, -1, z), stone);
        }
    }
    for z in -16..16 {
        world.set_block(Vec3::new(3, 0, z), slab);
    }
    Ok(world)
}

async fn run_demo(
    settings: PhysicsSettings,
    world: BlockWorld,
    destination: Vec3<f64>,
    jump: bool,
) -> Result<()> {
    let (up_send, up_recv) = crossbeam_channel::unbounded::<UpMsg>();
    let (down_send, down_recv) = crossbeam_channel::unbounded();

    // loopback server which just logs what it receives
    let server = thread::spawn(move || {
        for msg in up_recv {
            trace!(?msg, "server received");
        }
    });

    let bot = Arc::new(Mutex::new(Bot::new(world, up_send, BlockPhysics::new(settings))));
    down_send.send(DownMsg::PlayerPosLook(DownMsgPlayerPosLook {
        pos: Vec3::new(0.5, 0.0, 0.5),
        look: Look::default(),
        teleport_id: 0,
    }))?;
    let ticker = spawn_ticker(&Handle::current(), TickMgr::new(), Arc::clone(&bot), down_recv);
    sleep(TICK * 2).await;

    if jump {
        let landing = bot.lock().jump();
        match timeout(MOVE_TIMEOUT, landing).await {
            Ok(Ok(())) => info!("landed"),
            Ok(Err(e)) => warn!(%e, "jump failed"),
            Err(_) => warn!("jump timed out"),
        }
    }

    let arrival = {
        let mut bot = bot.lock();
        bot.avatar.look = bot.avatar.look.turn_to_vec(destination - bot.avatar.pos);
        bot.move_to(destination)
    };
    match timeout(MOVE_TIMEOUT, arrival).await {
        Ok(Ok(())) => info!(pos=?bot.lock().avatar.pos, "arrived"),
        Ok(Err(e)) => warn!(%e, pos=?bot.lock().avatar.pos, "movement failed"),
        Err(_) => warn!(pos=?bot.lock().avatar.pos, "movement timed out"),
    }
    info!(ticks=bot.lock().ticks(), "done");

    down_send.send(DownMsg::Disconnect(None))?;
    sleep(TICK * 2).await;
    drop(ticker);
    drop(bot);
    if server.join().is_err() {
        bail!("loopback server panicked");
    }
    Ok(())
}
