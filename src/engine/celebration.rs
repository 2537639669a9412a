use crate::engine::clock::{Millis, TimerSlot};
use crate::models::{CelebrationPhase, Effect, WishUi};
use tracing::info;

/// Length of the curve morph that starts when the wish is made.
pub const MORPH_MS: Millis = 1800;
/// Time spent in `Resolving` before the outro.
pub const OUTRO_DELAY_MS: Millis = 2200;

pub const WISH_PROMPT: &str = "Today is your birthday. Make a wish.";
pub const RESOLVING_PROMPT: &str = "…";
pub const OUTRO_PROMPT: &str = "Wish sealed.\nHappy birthday, my love.";

/// The birthday scene's own phase machine. Created fresh on every entry into
/// celebration mode and consumed by [`Celebration::teardown`].
#[derive(Debug)]
pub struct Celebration {
    entered_at: Millis,
    phase: CelebrationPhase,
    resolve_started_at: Option<Millis>,
    outro: TimerSlot,
}

impl Celebration {
    pub fn enter(now: Millis, fx: &mut Vec<Effect>) -> Self {
        fx.push(Effect::AttachResize);
        fx.push(Effect::StartAnimation);
        fx.push(Effect::Prompt(Some(WISH_PROMPT.to_string())));
        fx.push(Effect::WishUi(WishUi::Wish));

        Self {
            entered_at: now,
            phase: CelebrationPhase::AwaitingWish,
            resolve_started_at: None,
            outro: TimerSlot::default(),
        }
    }

    pub fn phase(&self) -> CelebrationPhase {
        self.phase
    }

    pub fn confirm_wish(&mut self, now: Millis, fx: &mut Vec<Effect>) -> bool {
        if self.phase != CelebrationPhase::AwaitingWish {
            return false;
        }
        self.phase = CelebrationPhase::Resolving;
        self.resolve_started_at = Some(now);
        self.outro.arm(now, OUTRO_DELAY_MS);
        fx.push(Effect::WishUi(WishUi::Hidden));
        fx.push(Effect::Prompt(Some(RESOLVING_PROMPT.to_string())));
        info!("wish made");
        true
    }

    /// Moves `Resolving` to `Outro` once the delay has elapsed.
    pub fn poll(&mut self, now: Millis, fx: &mut Vec<Effect>) -> bool {
        if self.outro.take_due(now).is_none() {
            return false;
        }
        self.phase = CelebrationPhase::Outro;
        fx.push(Effect::WishUi(WishUi::Outro));
        fx.push(Effect::Prompt(Some(OUTRO_PROMPT.to_string())));
        info!("celebration outro");
        true
    }

    /// Heart morph progress in `[0, 1]`; zero until the wish is made.
    pub fn morph_progress(&self, now: Millis) -> f64 {
        match self.resolve_started_at {
            Some(start) => (now.saturating_sub(start) as f64 / MORPH_MS as f64).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.entered_at)
    }

    pub fn teardown(mut self, fx: &mut Vec<Effect>) {
        self.outro.cancel();
        fx.push(Effect::StopAnimation);
        fx.push(Effect::DetachResize);
        fx.push(Effect::WishUi(WishUi::Hidden));
        fx.push(Effect::Prompt(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_starts_awaiting_a_wish() {
        let mut fx = Vec::new();
        let c = Celebration::enter(1_000, &mut fx);
        assert_eq!(c.phase(), CelebrationPhase::AwaitingWish);
        assert_eq!(c.morph_progress(5_000), 0.0);
        assert!(fx.contains(&Effect::StartAnimation));
        assert!(fx.contains(&Effect::AttachResize));
        assert!(fx.contains(&Effect::WishUi(WishUi::Wish)));
    }

    #[test]
    fn outro_follows_exactly_after_the_delay() {
        let mut fx = Vec::new();
        let mut c = Celebration::enter(0, &mut fx);

        assert!(c.confirm_wish(500, &mut fx));
        assert_eq!(c.phase(), CelebrationPhase::Resolving);

        assert!(!c.poll(500 + OUTRO_DELAY_MS - 1, &mut fx));
        assert_eq!(c.phase(), CelebrationPhase::Resolving);

        assert!(c.poll(500 + OUTRO_DELAY_MS, &mut fx));
        assert_eq!(c.phase(), CelebrationPhase::Outro);

        assert!(!c.poll(60_000, &mut fx));
        assert_eq!(c.phase(), CelebrationPhase::Outro);
    }

    #[test]
    fn confirming_twice_is_ignored() {
        let mut fx = Vec::new();
        let mut c = Celebration::enter(0, &mut fx);
        assert!(c.confirm_wish(100, &mut fx));
        assert!(!c.confirm_wish(900, &mut fx));
        // the outro timer keeps the first deadline
        assert!(c.poll(100 + OUTRO_DELAY_MS, &mut fx));
    }

    #[test]
    fn morph_progress_is_a_function_of_elapsed_time() {
        let mut fx = Vec::new();
        let mut c = Celebration::enter(0, &mut fx);
        c.confirm_wish(1_000, &mut fx);
        assert_eq!(c.morph_progress(1_000), 0.0);
        assert!((c.morph_progress(1_900) - 0.5).abs() < 1e-9);
        assert_eq!(c.morph_progress(1_000 + MORPH_MS), 1.0);
        assert_eq!(c.morph_progress(99_000), 1.0);
    }

    #[test]
    fn teardown_releases_loop_and_observer() {
        let mut fx = Vec::new();
        let mut c = Celebration::enter(0, &mut fx);
        c.confirm_wish(10, &mut fx);
        fx.clear();
        c.teardown(&mut fx);
        assert!(fx.contains(&Effect::StopAnimation));
        assert!(fx.contains(&Effect::DetachResize));
        assert!(fx.contains(&Effect::Prompt(None)));
    }
}
