//! Space Invaders entry point
//!
//! Runs the simulation headless with a simple autopilot and prints the final
//! frame as JSON. Usage: `space-invaders [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use space_invaders::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use space_invaders::sim::{Snapshot, World};
#[cfg(not(target_arch = "wasm32"))]
use space_invaders::{Presenter, Session, Settings};

/// Hard stop for a demo run (two minutes of game time)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICK_LIMIT: u64 = 60 * 120;

/// Logs what a real presenter would draw and keeps the latest frame
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct LogPresenter {
    last: Option<Snapshot>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Presenter for LogPresenter {
    fn score_changed(&mut self, score: u64) {
        log::debug!("Score: {}", score);
    }

    fn game_over(&mut self, score: u64) {
        log::info!("GAME OVER (score {})", score);
    }

    fn wave_spawned(&mut self, columns: u32, rows: u32) {
        log::info!("Incoming wave {}x{}", columns, rows);
    }

    fn render(&mut self, snapshot: &Snapshot) {
        self.last = Some(snapshot.clone());
    }
}

/// Steer under the closest invader column. Returns (left, right).
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(world: &World) -> (bool, bool) {
    let Some(bounds) = world.player.bounds() else {
        return (false, false);
    };
    let ship_x = bounds.center().x;
    let target = world
        .waves
        .iter()
        .flat_map(|w| w.invaders.iter())
        .filter_map(|i| i.bounds())
        .map(|b| b.center().x)
        .min_by(|a, b| (a - ship_x).abs().total_cmp(&(b - ship_x).abs()));

    match target {
        Some(x) if x < ship_x - world.settings.player_speed => (true, false),
        Some(x) if x > ship_x + world.settings.player_speed => (false, true),
        _ => (false, false),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Invaders (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut session = match Session::new(settings, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    let field = session.settings().playfield;
    log::info!("Playfield {}x{}, seed {}", field.x, field.y, seed);

    let mut presenter = LogPresenter::default();
    let mut frame = 0u64;
    while !session.world().is_over() && session.world().time_ticks < DEMO_TICK_LIMIT {
        let (left, right) = autopilot(session.world());
        session.set_movement(left, right);
        if frame % 2 == 0 {
            session.press_fire();
        } else {
            session.release_fire();
        }
        session.frame(SIM_DT, &mut presenter);
        frame += 1;
    }

    log::info!(
        "Run finished after {} ticks with score {}",
        session.world().time_ticks,
        session.world().score
    );

    if let Some(snapshot) = presenter.last {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; the library is driven by the host page
}
