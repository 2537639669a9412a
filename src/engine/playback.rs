use crate::engine::clock::{Millis, Timer, TimerSlot};
use crate::letter::{timing, SpeedFactor};
use crate::models::Effect;
use tracing::debug;

/// Outcome of a forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// Already on the last sentence; the caller decides what comes next.
    ReachedEnd,
}

/// Owns the position pointer, the play flag and the single pending
/// auto-advance timer.
///
/// Every scheduled advance is a one-shot timer. Moving with [`Playback::go_to`]
/// while playing arms the next one, so the chain sustains itself and any speed
/// or position change takes effect on the very next tick.
pub struct Playback {
    sentences: Vec<String>,
    position: usize,
    playing: bool,
    speed: SpeedFactor,
    advance: TimerSlot,
}

impl Playback {
    pub fn new(sentences: Vec<String>, speed: SpeedFactor) -> Self {
        Self {
            sentences,
            position: 0,
            playing: false,
            speed,
            advance: TimerSlot::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> SpeedFactor {
        self.speed
    }

    pub fn pending_advance(&self) -> Option<Timer> {
        self.advance.pending()
    }

    pub fn scheduled_count(&self) -> u64 {
        self.advance.armed_count()
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.sentences.len()
    }

    pub fn go_to(&mut self, index: usize, scroll: bool, now: Millis, fx: &mut Vec<Effect>) -> bool {
        if index >= self.sentences.len() {
            return false;
        }
        self.position = index;
        fx.push(Effect::SetActive { index, scroll });
        fx.push(Effect::UpdateProgress {
            position: index,
            total: self.sentences.len(),
        });
        if self.playing {
            self.schedule(now);
        }
        true
    }

    pub fn next(&mut self, now: Millis, fx: &mut Vec<Effect>) -> Advance {
        if self.is_last() {
            return Advance::ReachedEnd;
        }
        self.go_to(self.position + 1, true, now, fx);
        Advance::Moved
    }

    pub fn previous(&mut self, now: Millis, fx: &mut Vec<Effect>) {
        self.go_to(self.position.saturating_sub(1), true, now, fx);
    }

    pub fn play(&mut self, now: Millis, fx: &mut Vec<Effect>) -> bool {
        if self.playing || self.sentences.is_empty() {
            return false;
        }
        self.playing = true;
        fx.push(Effect::PlayingChanged(true));
        fx.push(Effect::PlayAudio);
        self.schedule(now);
        true
    }

    pub fn pause(&mut self, keep_audio: bool, fx: &mut Vec<Effect>) -> bool {
        if !self.playing {
            return false;
        }
        self.playing = false;
        self.advance.cancel();
        fx.push(Effect::PlayingChanged(false));
        if !keep_audio {
            fx.push(Effect::PauseAudio);
        }
        true
    }

    pub fn set_speed(&mut self, value: f64, now: Millis, fx: &mut Vec<Effect>) -> SpeedFactor {
        self.speed = SpeedFactor::new(value);
        fx.push(Effect::PersistSpeed(self.speed.value()));
        if self.advance.pending().is_some() {
            self.schedule(now);
        }
        self.speed
    }

    /// Fires the pending advance if it is due.
    pub fn poll(&mut self, now: Millis, fx: &mut Vec<Effect>) -> Option<Advance> {
        let timer = self.advance.take_due(now)?;
        debug!(timer = ?timer.id, position = self.position, "auto-advance fired");
        if self.is_last() {
            return Some(Advance::ReachedEnd);
        }
        self.go_to(self.position + 1, true, now, fx);
        Some(Advance::Moved)
    }

    fn schedule(&mut self, now: Millis) {
        let Some(sentence) = self.sentences.get(self.position) else {
            return;
        };
        let delay = timing::delay(sentence, self.speed);
        let timer = self.advance.arm(now, delay);
        debug!(timer = ?timer.id, delay, position = self.position, "auto-advance scheduled");
    }
}
