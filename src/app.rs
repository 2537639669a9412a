use crate::config::Theme;
use crate::engine::{Clock, Millis, Stage};
use crate::letter::SpeedFactor;
use crate::media::{MediaTransport, PlayOutcome};
use crate::models::{Action, AudioState, CelebrationPhase, Effect, PresentationMode, WishUi};
use crate::prefs::{self, PreferenceStore};
use crate::scene::driver::TerminalAnimator;
use crate::scene::SceneLoop;
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tracing::{info, warn};

pub const SPEED_STEP: f64 = 0.05;

/// What the renderer shows. Only effects coming out of the stage write here.
#[derive(Debug)]
pub struct View {
    pub mode: PresentationMode,
    pub sequence_rendered: bool,
    pub full_text_rendered: bool,
    pub active: Option<usize>,
    /// Set when the active line changed through navigation, for the fade-in.
    pub activated_at: Option<Millis>,
    pub progress: (usize, usize),
    pub playing: bool,
    pub full_text: bool,
    pub prompt: Option<String>,
    pub wish_ui: WishUi,
}

impl View {
    fn new() -> Self {
        Self {
            mode: PresentationMode::Reading,
            sequence_rendered: false,
            full_text_rendered: false,
            active: None,
            activated_at: None,
            progress: (0, 0),
            playing: false,
            full_text: false,
            prompt: None,
            wish_ui: WishUi::Hidden,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub theme: Theme,
    pub stage: Stage,
    pub view: View,
    pub audio: AudioState,
    pub animator: TerminalAnimator,
    pub scene: SceneLoop,
    screen: Rect,
    unlock_armed: bool,
    media: Box<dyn MediaTransport>,
    prefs: Box<dyn PreferenceStore>,
    clock: Box<dyn Clock>,
}

impl App {
    pub fn new(
        stage: Stage,
        theme: Theme,
        mut media: Box<dyn MediaTransport>,
        prefs: Box<dyn PreferenceStore>,
        clock: Box<dyn Clock>,
        volume: f32,
    ) -> Self {
        media.set_volume(volume);

        Self {
            should_quit: false,
            theme,
            stage,
            view: View::new(),
            audio: AudioState::Paused,
            animator: TerminalAnimator::default(),
            scene: SceneLoop::default(),
            screen: Rect::default(),
            unlock_armed: false,
            media,
            prefs,
            clock,
        }
    }

    pub fn start(&mut self, autoplay: bool) {
        let now = self.now();
        let effects = self.stage.start(autoplay, now);
        self.apply(effects, now);

        // music starts on its own even when the lines wait for the reader
        if !autoplay {
            self.try_play_audio();
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn dispatch(&mut self, action: Action) {
        let now = self.now();
        let effects = self.stage.handle(action, now);
        self.apply(effects, now);
    }

    /// Fires due timers, then runs any animation frame that came due.
    pub fn tick(&mut self) {
        let now = self.now();
        let effects = self.stage.tick(now);
        self.apply(effects, now);

        for handle in self.animator.fire() {
            self.scene
                .on_frame(handle, self.stage.celebration(), now, &mut self.animator);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        let (cols, rows) = ui::celebration::canvas_viewport(width, height);
        self.animator.resize(cols, rows);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('m') => self.toggle_music(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.on_user_input();
                self.adjust_speed(SPEED_STEP);
            }
            KeyCode::Char('-') => {
                self.on_user_input();
                self.adjust_speed(-SPEED_STEP);
            }
            _ => {
                self.on_user_input();
                if let Some(action) = self.action_for_key(key) {
                    self.dispatch(action);
                }
            }
        }
    }

    /// A press anywhere retries blocked audio; a press on a line in the
    /// reading window jumps to that line.
    pub fn on_mouse(&mut self, column: u16, row: u16) {
        self.on_user_input();
        if self.stage.mode() != PresentationMode::Reading || self.stage.is_full_text_open() {
            return;
        }
        if let Some(index) = ui::reading::sentence_at(self, self.screen, column, row) {
            self.dispatch(Action::GoTo(index));
        }
    }

    pub fn action_for_key(&self, key: KeyEvent) -> Option<Action> {
        if self.stage.is_full_text_open() {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseFullText),
                _ => None,
            };
        }

        match self.stage.mode() {
            PresentationMode::Reading => match key.code {
                KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => Some(Action::Next),
                KeyCode::Left | KeyCode::Char('h') => Some(Action::Previous),
                KeyCode::Home => Some(Action::GoTo(0)),
                KeyCode::End | KeyCode::Char('e') => Some(Action::JumpToEnd),
                KeyCode::Char('p') => Some(Action::ToggleAutoplay),
                KeyCode::Char('o') => Some(Action::OpenFullText),
                _ => None,
            },
            PresentationMode::Celebration => match (key.code, self.stage.phase()) {
                (KeyCode::Enter | KeyCode::Char(' '), Some(CelebrationPhase::AwaitingWish)) => {
                    Some(Action::ConfirmWish)
                }
                (KeyCode::Char('r'), _) => Some(Action::Replay),
                (KeyCode::Char('o'), _) => Some(Action::OpenFullText),
                _ => None,
            },
        }
    }

    pub fn adjust_speed(&mut self, delta: f64) {
        let next = self.stage.playback().speed().value() + delta;
        let rounded = (next * 100.0).round() / 100.0;
        self.dispatch(Action::SetSpeed(rounded));
    }

    pub fn toggle_music(&mut self) {
        if self.media.is_paused() {
            self.unlock_armed = false;
            self.try_play_audio();
        } else {
            self.media.pause();
            self.audio = AudioState::Paused;
        }
    }

    fn on_user_input(&mut self) {
        if self.unlock_armed {
            self.unlock_armed = false;
            info!("retrying music after user input");
            self.try_play_audio();
        }
    }

    fn try_play_audio(&mut self) -> PlayOutcome {
        let outcome = self.media.play();
        match outcome {
            PlayOutcome::Started => self.audio = AudioState::Playing,
            PlayOutcome::Blocked => {
                warn!("music blocked, waiting for input");
                self.audio = AudioState::Blocked;
                self.unlock_armed = true;
            }
        }
        outcome
    }

    fn apply(&mut self, effects: Vec<Effect>, now: Millis) {
        for effect in effects {
            match effect {
                Effect::RenderSequence => self.view.sequence_rendered = true,
                Effect::SetActive { index, scroll } => {
                    self.view.active = Some(index);
                    self.view.activated_at = scroll.then_some(now);
                }
                Effect::UpdateProgress { position, total } => self.view.progress = (position, total),
                Effect::RenderFullText => self.view.full_text_rendered = true,
                Effect::ShowFullText(visible) => self.view.full_text = visible,
                Effect::ModeChanged(mode) => {
                    info!(?mode, "mode changed");
                    self.view.mode = mode;
                }
                Effect::PlayingChanged(playing) => self.view.playing = playing,
                Effect::PlayAudio => {
                    self.try_play_audio();
                }
                Effect::PauseAudio => {
                    self.media.pause();
                    self.audio = AudioState::Paused;
                }
                Effect::RewindAudio => self.media.rewind(),
                Effect::Prompt(prompt) => self.view.prompt = prompt,
                Effect::WishUi(wish_ui) => self.view.wish_ui = wish_ui,
                Effect::StartAnimation => self.scene.start(&mut self.animator),
                Effect::StopAnimation => self.scene.stop(&mut self.animator),
                Effect::AttachResize => self.scene.attach(&mut self.animator),
                Effect::DetachResize => self.scene.detach(&mut self.animator),
                Effect::PersistSpeed(value) => {
                    prefs::store_speed(self.prefs.as_mut(), SpeedFactor::new(value))
                }
            }
        }
    }
}
