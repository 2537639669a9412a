use crate::engine::celebration::Celebration;
use crate::engine::clock::Millis;
use crate::engine::playback::{Advance, Playback};
use crate::letter::{Letter, SpeedFactor};
use crate::models::{Action, CelebrationPhase, Effect, PresentationMode};
use tracing::{debug, info};

/// Top-level presentation state: reading the letter line by line, or the
/// birthday scene.
///
/// All transitions go through [`Stage::handle`] and [`Stage::tick`], which
/// return the effects the shell has to apply. Requests that do not make sense
/// in the current state are dropped silently.
pub struct Stage {
    letter: Letter,
    playback: Playback,
    mode: PresentationMode,
    celebration: Option<Celebration>,
    full_text_open: bool,
}

impl Stage {
    pub fn new(letter: Letter, speed: SpeedFactor) -> Self {
        let playback = Playback::new(letter.sentences().to_vec(), speed);
        Self {
            letter,
            playback,
            mode: PresentationMode::Reading,
            celebration: None,
            full_text_open: false,
        }
    }

    pub fn letter(&self) -> &Letter {
        &self.letter
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    pub fn phase(&self) -> Option<CelebrationPhase> {
        self.celebration.as_ref().map(Celebration::phase)
    }

    pub fn is_full_text_open(&self) -> bool {
        self.full_text_open
    }

    /// Renders everything and shows the first line, optionally starting
    /// autoplay.
    pub fn start(&mut self, autoplay: bool, now: Millis) -> Vec<Effect> {
        let mut fx = vec![
            Effect::RenderFullText,
            Effect::RenderSequence,
            Effect::ModeChanged(PresentationMode::Reading),
        ];
        self.playback.go_to(0, false, now, &mut fx);
        if autoplay {
            self.playback.play(now, &mut fx);
        }
        fx
    }

    pub fn handle(&mut self, action: Action, now: Millis) -> Vec<Effect> {
        let mut fx = Vec::new();

        if self.full_text_open && !matches!(action, Action::CloseFullText | Action::SetSpeed(_)) {
            return fx;
        }

        match action {
            Action::Next => {
                if self.mode == PresentationMode::Reading
                    && self.playback.next(now, &mut fx) == Advance::ReachedEnd
                {
                    self.enter_celebration(true, now, &mut fx);
                }
            }
            Action::Previous => {
                if self.mode == PresentationMode::Reading {
                    self.playback.previous(now, &mut fx);
                }
            }
            Action::GoTo(index) => {
                if self.mode == PresentationMode::Reading {
                    self.playback.go_to(index, true, now, &mut fx);
                }
            }
            Action::ToggleAutoplay => {
                if self.mode == PresentationMode::Reading {
                    if self.playback.is_playing() {
                        self.playback.pause(false, &mut fx);
                    } else {
                        self.playback.play(now, &mut fx);
                    }
                }
            }
            Action::JumpToEnd => {
                if self.mode == PresentationMode::Reading {
                    self.enter_celebration(true, now, &mut fx);
                }
            }
            Action::ConfirmWish => {
                if let Some(celebration) = self.celebration.as_mut() {
                    celebration.confirm_wish(now, &mut fx);
                }
            }
            Action::Replay => {
                if self.phase() == Some(CelebrationPhase::Outro) {
                    self.replay(now, &mut fx);
                }
            }
            Action::OpenFullText => {
                let allowed = match self.mode {
                    PresentationMode::Reading => true,
                    PresentationMode::Celebration => self.phase() == Some(CelebrationPhase::Outro),
                };
                if allowed {
                    self.playback.pause(false, &mut fx);
                    self.full_text_open = true;
                    fx.push(Effect::ShowFullText(true));
                }
            }
            Action::CloseFullText => {
                if self.full_text_open {
                    self.full_text_open = false;
                    fx.push(Effect::ShowFullText(false));
                    if self.mode == PresentationMode::Reading {
                        fx.push(Effect::RenderSequence);
                        self.playback.go_to(self.playback.position(), false, now, &mut fx);
                    }
                }
            }
            Action::SetSpeed(value) => {
                let speed = self.playback.set_speed(value, now, &mut fx);
                debug!(%speed, "speed changed");
            }
        }

        fx
    }

    /// Fires whichever single-shot timer is due for the current mode.
    pub fn tick(&mut self, now: Millis) -> Vec<Effect> {
        let mut fx = Vec::new();
        match self.mode {
            PresentationMode::Reading => {
                if self.playback.poll(now, &mut fx) == Some(Advance::ReachedEnd) {
                    self.enter_celebration(true, now, &mut fx);
                }
            }
            PresentationMode::Celebration => {
                if let Some(celebration) = self.celebration.as_mut() {
                    celebration.poll(now, &mut fx);
                }
            }
        }
        fx
    }

    fn enter_celebration(&mut self, keep_audio: bool, now: Millis, fx: &mut Vec<Effect>) {
        if self.mode == PresentationMode::Celebration {
            return;
        }
        self.playback.pause(keep_audio, fx);
        self.mode = PresentationMode::Celebration;
        fx.push(Effect::ModeChanged(PresentationMode::Celebration));
        self.celebration = Some(Celebration::enter(now, fx));
        info!(position = self.playback.position(), "entered celebration");
    }

    fn replay(&mut self, now: Millis, fx: &mut Vec<Effect>) {
        if let Some(celebration) = self.celebration.take() {
            celebration.teardown(fx);
        }
        self.full_text_open = false;
        self.mode = PresentationMode::Reading;
        fx.push(Effect::ModeChanged(PresentationMode::Reading));
        fx.push(Effect::RenderSequence);
        self.playback.go_to(0, false, now, fx);
        fx.push(Effect::RewindAudio);
        self.playback.play(now, fx);
        info!("replay");
    }
}
