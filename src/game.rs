//! Game driver
//!
//! Owns every piece of state and runs the frame loop: fixed-timestep ticks
//! with continuous input sampled once per tick, then one render pass per
//! viewport. Discrete commands are applied as soon as their key goes down.

use serde::Serialize;

use crate::audio::AudioManager;
use crate::camera::{Camera, ViewKind};
use crate::consts::*;
use crate::highscores::{HighScore, ScoreStore, load_best, save_best};
use crate::input::{Command, InputState, Key};
use crate::renderer::RenderService;
use crate::scene::{DrawOptions, SceneContext, SceneGraph, TransformStack, render_scene};
use crate::settings::Settings;
use crate::sim::{Anchors, ControlState, GameEvent, GameRound, RoundSnapshot, TickInput, Trigger, tick};

/// Shown when the target starts its victory dance
pub const LOSER_POPUP: &str = "Archibald says \"Loser >:P\"";

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    #[serde(flatten)]
    pub round: RoundSnapshot,
    pub popup: Option<&'static str>,
    pub show_panel: bool,
    pub muted: bool,
}

/// Game instance holding all state
pub struct Game {
    graph: SceneGraph,
    round: GameRound,
    controls: ControlState,
    camera: Camera,
    settings: Settings,
    audio: AudioManager,
    store: Box<dyn ScoreStore>,
    input: InputState,
    accumulator: f32,
    anchors: Anchors,
    stack: TransformStack,
    popup: Option<&'static str>,
}

impl Game {
    /// New game in practice mode. Reads the stored best score once.
    pub fn new(graph: SceneGraph, seed: u64, mut store: Box<dyn ScoreStore>) -> Self {
        let best = load_best(store.as_mut());
        Self {
            graph,
            round: GameRound::new(seed, best),
            controls: ControlState::default(),
            camera: Camera::default(),
            settings: Settings::default(),
            audio: AudioManager::default(),
            store,
            input: InputState::new(),
            accumulator: 0.0,
            anchors: Anchors::default(),
            stack: TransformStack::new(),
            popup: None,
        }
    }

    pub fn with_audio(mut self, audio: AudioManager) -> Self {
        self.audio = audio;
        self.audio.set_master_volume(self.settings.master_volume);
        self.audio.set_muted(self.settings.muted);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.camera.oblique = settings.oblique;
        self.camera.perspective = settings.perspective;
        self.camera.multi_view = settings.multi_view;
        self.audio.set_master_volume(settings.master_volume);
        self.audio.set_muted(settings.muted);
        self.settings = settings;
        self
    }

    pub fn round(&self) -> &GameRound {
        &self.round
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store_mut(&mut self) -> &mut dyn ScoreStore {
        self.store.as_mut()
    }

    /// Key pressed (DOM-style key name)
    pub fn key_down(&mut self, name: &str) {
        if let Some(command) = self.input.key_down(Key::parse(name)) {
            self.apply(command);
        }
    }

    pub fn key_up(&mut self, name: &str) {
        self.input.key_up(Key::parse(name));
    }

    /// Focus lost: nothing stays held
    pub fn blur(&mut self) {
        self.input.release_all();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.camera.wheel(delta_y);
    }

    /// Apply a discrete command immediately
    pub fn apply(&mut self, command: Command) {
        log::debug!("Command {:?}", command);
        match command {
            Command::SelectView(view) => self.camera.view = view,
            Command::ToggleOblique => {
                self.camera.oblique = !self.camera.oblique;
                self.settings.oblique = self.camera.oblique;
            }
            Command::TogglePerspective => {
                self.camera.perspective = !self.camera.perspective;
                self.settings.perspective = self.camera.perspective;
            }
            Command::ToggleMultiView => {
                self.camera.multi_view = !self.camera.multi_view;
                self.settings.multi_view = self.camera.multi_view;
            }
            Command::ToggleSolid => self.settings.solid = !self.settings.solid,
            Command::ToggleTexture => self.settings.textured = !self.settings.textured,
            Command::TogglePanel => {
                if self.round.is_playing() {
                    log::debug!("Help panel locked while playing");
                } else {
                    self.settings.show_panel = !self.settings.show_panel;
                }
            }
            Command::ResetView => self.camera.reset(),
            Command::Nudge(nudge) => self.camera.nudge(nudge),
            Command::ToggleMute => {
                self.settings.muted = !self.settings.muted;
                self.audio.set_muted(self.settings.muted);
            }
            Command::ClearLanded => {
                self.round.clear_landed();
            }
            Command::ToggleRound => {
                if self.round.transition(Trigger::Toggle) && self.round.is_playing() {
                    self.controls.reset();
                }
            }
        }
    }

    /// Advance by `dt` seconds of wall time and draw. Returns the events raised.
    pub fn frame<R: RenderService + ?Sized>(
        &mut self,
        dt: f32,
        width: u32,
        height: u32,
        renderer: &mut R,
    ) -> Vec<GameEvent> {
        self.update(dt);
        self.render(width, height, renderer);
        self.dispatch_events()
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let axes = self.input.axes();
        self.audio.set_moving(axes.is_moving());
        let input = TickInput { axes };

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(
                &mut self.round,
                &mut self.controls,
                &input,
                &self.anchors,
                SIM_DT,
            );
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// One pass per viewport. Captured anchors feed the next tick.
    fn render<R: RenderService + ?Sized>(&mut self, width: u32, height: u32, renderer: &mut R) {
        let ctx = SceneContext {
            graph: &self.graph,
            controls: &self.controls,
            round: &self.round,
            options: DrawOptions {
                solid: self.settings.solid,
                textured: self.settings.textured,
            },
            floor: true,
        };
        for pass in self.camera.passes(width, height) {
            renderer.set_viewport(pass.viewport);
            renderer.set_projection(&pass.projection);
            self.anchors = render_scene(&ctx, pass.view, &mut self.stack, renderer);
        }
    }

    fn dispatch_events(&mut self) -> Vec<GameEvent> {
        let events = self.round.drain_events();
        for event in &events {
            self.audio.handle(event);
            match event {
                GameEvent::RoundStarted => self.popup = None,
                GameEvent::DanceStarted => self.popup = Some(LOSER_POPUP),
                GameEvent::RoundEnded { score, new_best } => {
                    self.popup = None;
                    if *new_best {
                        let record = HighScore {
                            best: *score,
                            level: self.round.level,
                        };
                        save_best(self.store.as_mut(), record);
                    }
                }
                _ => {}
            }
        }
        events
    }

    pub fn hud(&self) -> Hud {
        Hud {
            round: self.round.snapshot(),
            popup: self.popup,
            show_panel: self.settings.show_panel,
            muted: self.settings.muted,
        }
    }

    /// True while the main viewport shows the fourth view
    pub fn is_fourth_view(&self) -> bool {
        self.camera.view == ViewKind::Fourth
    }
}
