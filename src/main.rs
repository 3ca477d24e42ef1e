//! Star Scramble headless runner
//!
//! Drives the simulation at the fixed frame rate with an autopilot standing in
//! for every player, then reports the outcome. Pass a JSON settings file as
//! the first argument to override the defaults.

fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use star_scramble::Settings;
    use star_scramble::sim::{GameEvent, World};

    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).with_context(|| format!("loading {}", path))?,
        None => Settings {
            seed: seed_from_clock(),
            ..Settings::default()
        },
    };
    log::info!("Star Scramble (headless) starting with seed {}", settings.seed);

    let mut world = World::new(settings).context("invalid settings")?;

    // Five minutes of play at most
    let max_ticks = 60 * 60 * 5;
    while !world.is_over() && world.time_ticks < max_ticks {
        let inputs = autopilot::inputs(&world);
        world.update(&inputs);

        for event in &world.events {
            if let GameEvent::Collected { .. } = event {
                log::debug!("{}", world.snapshot().score_labels().join("  "));
            }
        }
    }

    let snapshot = world.snapshot();
    println!("Tick {}, wave {}", snapshot.tick, snapshot.wave);
    println!("Scores: {}", snapshot.score_labels().join("  "));
    match world.winner_text() {
        Some(text) => println!("{}", text),
        None => println!("Time limit reached with no winner"),
    }
    Ok(())
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Simple bot that chases the nearest star and hops over hazards
mod autopilot {
    use star_scramble::RawInput;
    use star_scramble::sim::{Player, World};

    /// How close (horizontally) a target must be before the bot stops steering
    const DEADZONE: f32 = 6.0;
    /// Hazards closer than this trigger a jump
    const DANGER_RADIUS: f32 = 70.0;
    /// Stars this far above the player are worth jumping for
    const JUMP_REACH: f32 = 40.0;

    pub fn inputs(world: &World) -> Vec<RawInput> {
        world.players.iter().map(|p| steer(world, p)).collect()
    }

    fn steer(world: &World, player: &Player) -> RawInput {
        let pos = player.body.pos;

        let target = world
            .collectibles
            .iter()
            .filter(|c| c.active)
            .min_by(|a, b| {
                let da = a.body.pos.distance_squared(pos);
                let db = b.body.pos.distance_squared(pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|c| c.body.pos);

        let danger = world
            .hazards
            .iter()
            .filter(|h| h.active)
            .any(|h| h.body.pos.distance(pos) < DANGER_RADIUS);

        let mut input = RawInput {
            jump: danger,
            ..Default::default()
        };
        if let Some(target) = target {
            let dx = target.x - pos.x;
            input.left = dx < -DEADZONE;
            input.right = dx > DEADZONE;
            input.jump |= pos.y - target.y > JUMP_REACH;
        }
        input
    }
}
