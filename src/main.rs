//! Arena Defense headless driver
//!
//! Runs a seeded session with a scripted sweep of the player and logs the
//! event stream. Rendering and audio hosts drive the library the same way.
//!
//! Usage: `arena-defense [seed] [frames] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use arena_defense::Settings;
    use arena_defense::consts::FRAME_DT;
    use arena_defense::sim::{
        GameEvent, GamePhase, GameState, InputEvent, Key, RenderSnapshot, TickInput, tick,
    };

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5);
    let settings = args
        .next()
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();

    log::info!(
        "Arena Defense (headless) seed={} frames={} quality={}",
        seed,
        frames,
        settings.quality.as_str()
    );

    let mut state = GameState::with_settings(seed, settings);
    let mut snapshot = RenderSnapshot::with_capacity();
    state.start();

    // Sweep left and right so the fan covers the whole field
    const SWEEP_FRAMES: u64 = 90;
    let mut holding = Key::Right;

    for frame in 0..frames {
        let mut input = TickInput::default();
        if frame % SWEEP_FRAMES == 0 {
            let next = if holding == Key::Right { Key::Left } else { Key::Right };
            input.events.push(InputEvent::KeyUp(holding));
            input.events.push(InputEvent::KeyDown(next));
            holding = next;
        }

        tick(&mut state, &input, FRAME_DT);

        let events: Vec<GameEvent> = state.drain_events().collect();
        for event in events {
            match event {
                GameEvent::Notification { text, .. } => log::info!("[frame {}] {}", state.frame, text),
                GameEvent::SuperRewardRequested(choices) => {
                    if let Some(choice) = choices.first() {
                        log::info!("Auto-selecting {}", choice.name);
                        state.select_super_reward(&choice.id);
                    }
                }
                GameEvent::GameOver { score, wave, kills } => {
                    log::info!("Game over: score {} wave {} kills {}", score, wave, kills);
                }
                other => log::debug!("{:?}", other),
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    state.write_snapshot(&mut snapshot);
    log::info!(
        "Final frame {}: {} zombies, {} projectiles, {} particles on screen",
        snapshot.frame,
        snapshot.walkers.len() + snapshot.runners.len() + snapshot.tanks.len() + snapshot.bosses.len(),
        snapshot.projectiles.len(),
        snapshot.particles.len()
    );

    match serde_json::to_string_pretty(&state.hud()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host embeds the library directly; there is no standalone wasm entry
}
