//! Tomato Tank - headless driver
//!
//! Loads a scene (argument 1, or the built-in tank), plays a short scripted
//! round against a recording renderer and logs the HUD as JSON.
//!
//! Usage: `tomato-tank [scene.json] [best-score.json]`

use std::path::PathBuf;

use tomato_tank::highscores::{JsonFileStore, MemoryStore, ScoreStore};
use tomato_tank::renderer::{DrawStyle, RecordingRenderer};
use tomato_tank::scene::{DEFAULT_SCENE, SceneGraph};
use tomato_tank::{Game, Settings};

const FRAME_DT: f32 = 1.0 / 60.0;
const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

/// Key held for a number of frames
struct Step {
    key: &'static str,
    frames: u32,
}

const SCRIPT: &[Step] = &[
    Step { key: "g", frames: 1 },
    Step { key: "a", frames: 30 },
    Step { key: "w", frames: 20 },
    Step { key: "z", frames: 90 },
    Step { key: "e", frames: 20 },
    Step { key: "0", frames: 1 },
    Step { key: "z", frames: 60 },
];

fn main() {
    env_logger::init();
    log::info!("Tomato Tank (headless) starting...");

    let mut args = std::env::args().skip(1);
    let graph = match args.next() {
        Some(path) => match SceneGraph::load(&path) {
            Ok(graph) => graph,
            Err(err) => {
                log::error!("Could not load scene {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => match SceneGraph::from_json(DEFAULT_SCENE) {
            Ok(graph) => graph,
            Err(err) => {
                log::error!("Built-in scene is broken: {}", err);
                std::process::exit(1);
            }
        },
    };

    let store: Box<dyn ScoreStore> = match args.next() {
        Some(path) => {
            let store = JsonFileStore::new(PathBuf::from(path));
            log::info!("Best score file: {}", store.path().display());
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    };

    let settings_path = std::env::temp_dir().join("tomato-tank-settings.json");
    let settings = Settings::load_from(&settings_path);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = Game::new(graph, seed, store).with_settings(settings);
    let mut renderer = RecordingRenderer::new();

    for step in SCRIPT {
        game.key_down(step.key);
        for _ in 0..step.frames {
            renderer.clear();
            for event in game.frame(FRAME_DT, WIDTH, HEIGHT, &mut renderer) {
                log::debug!("{:?}", event);
            }
        }
        game.key_up(step.key);
    }

    log::info!(
        "Last frame: {} passes, {} outlines, {} fills",
        renderer.passes.len(),
        renderer.count(DrawStyle::Outline),
        renderer.count(DrawStyle::Filled)
    );
    match serde_json::to_string(&game.hud()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Could not encode HUD: {}", err),
    }

    if let Err(err) = game.settings().save_to(&settings_path) {
        log::warn!("Could not save settings: {}", err);
    }
}
