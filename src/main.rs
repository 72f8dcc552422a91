//! Bubble Pop headless driver
//!
//! Runs a session in idle mode with simulated frame timing and prints the run
//! summary as JSON. Rendering and real audio belong to a host; here cues are
//! only logged.
//!
//! Usage: `bubble-pop [settings.json] [seconds]`

use std::path::Path;

use bubble_pop::audio::LogAudioSink;
use bubble_pop::consts::CAMERA_HALF_HEIGHT;
use bubble_pop::effects::LogEffectPlayer;
use bubble_pop::sim::Camera;
use bubble_pop::{FrameInput, Session, Settings};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Nominal frame rate of the simulated display
const FRAME_RATE: f32 = 60.0;
/// Default run length in seconds
const DEFAULT_SECONDS: f32 = 30.0;
/// Simulated screen size in pixels
const SCREEN_SIZE: (f32, f32) = (1280.0, 720.0);

fn main() {
    env_logger::init();
    log::info!("Bubble Pop (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let camera = Camera::for_screen(SCREEN_SIZE.0, SCREEN_SIZE.1, CAMERA_HALF_HEIGHT);
    let mut session = Session::new(settings, camera, seed)
        .with_audio_sink(Box::new(LogAudioSink::default()))
        .with_effect_player(Box::new(LogEffectPlayer::default()));

    log::info!("Running {seconds:.1}s with seed {seed}");

    // Frame times wobble around the nominal rate like a real display loop
    let mut jitter = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let input = FrameInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut elapsed = 0.0;
    let mut frames = 0u64;
    while elapsed < seconds {
        let dt = (1.0 / FRAME_RATE) * jitter.random_range(0.8..1.25);
        session.frame(dt, &input);
        elapsed += dt;
        frames += 1;
    }

    let hud = session.hud();
    log::info!("{} | {} after {frames} frames", hud.score_text, hud.level_text);

    match serde_json::to_string_pretty(&session.summary()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize summary: {e}"),
    }
}
