use super::celebration::OUTRO_DELAY_MS;
use super::playback::Playback;
use super::*;
use crate::letter::{timing, Letter, SpeedFactor};
use crate::models::{Action, CelebrationPhase, Effect, PresentationMode, SegmenterKind};

const TEXT: &str = "Hello there. It is me.\n\nI choose you.";

fn stage() -> Stage {
    let letter = Letter::parse(TEXT, SegmenterKind::Unicode).unwrap();
    Stage::new(letter, SpeedFactor::new(1.0))
}

fn started(autoplay: bool) -> Stage {
    let mut s = stage();
    s.start(autoplay, 0);
    s
}

fn count_mode_changes(fx: &[Effect], mode: PresentationMode) -> usize {
    fx.iter().filter(|e| **e == Effect::ModeChanged(mode)).count()
}

#[test]
fn start_shows_first_line_and_schedules() {
    let mut s = stage();
    let fx = s.start(true, 0);
    assert!(fx.contains(&Effect::RenderSequence));
    assert!(fx.contains(&Effect::RenderFullText));
    assert!(fx.contains(&Effect::SetActive { index: 0, scroll: false }));
    assert!(fx.contains(&Effect::UpdateProgress { position: 0, total: 3 }));
    assert!(fx.contains(&Effect::PlayAudio));
    assert!(s.playback().is_playing());

    let due = s.playback().pending_advance().unwrap().due_at;
    assert_eq!(due, timing::delay("Hello there.", SpeedFactor::new(1.0)));
}

#[test]
fn position_stays_in_bounds_under_any_navigation() {
    let mut s = started(false);
    let script = [
        Action::Previous,
        Action::Previous,
        Action::GoTo(99),
        Action::Next,
        Action::GoTo(2),
        Action::GoTo(3),
        Action::Previous,
        Action::Next,
        Action::Next,
        Action::Next,
        Action::Previous,
        Action::GoTo(0),
    ];
    for (i, action) in script.into_iter().enumerate() {
        s.handle(action, i as u64);
        assert!(s.playback().position() < s.playback().len());
    }
}

#[test]
fn out_of_range_goto_is_a_silent_noop() {
    let mut s = started(false);
    s.handle(Action::GoTo(1), 0);
    let fx = s.handle(Action::GoTo(3), 0);
    assert!(fx.is_empty());
    assert_eq!(s.playback().position(), 1);
}

#[test]
fn next_at_last_line_enters_celebration_once() {
    let mut s = started(true);
    s.handle(Action::GoTo(2), 100);
    let scheduled = s.playback().scheduled_count();

    let fx = s.handle(Action::Next, 200);
    assert_eq!(s.mode(), PresentationMode::Celebration);
    assert_eq!(count_mode_changes(&fx, PresentationMode::Celebration), 1);
    assert_eq!(s.phase(), Some(CelebrationPhase::AwaitingWish));
    // audio keeps playing into the scene
    assert!(!fx.contains(&Effect::PauseAudio));
    assert!(!s.playback().is_playing());
    assert!(s.playback().pending_advance().is_none());
    assert_eq!(s.playback().scheduled_count(), scheduled);

    let fx = s.handle(Action::Next, 300);
    assert!(fx.is_empty());
    let fx = s.handle(Action::JumpToEnd, 300);
    assert!(fx.is_empty());
    assert_eq!(s.playback().position(), 2);
}

#[test]
fn play_while_playing_is_a_noop() {
    let mut s = started(true);
    let before = s.playback().pending_advance();
    let count = s.playback().scheduled_count();

    assert!(s.handle(Action::ToggleAutoplay, 10).contains(&Effect::PauseAudio));
    assert!(!s.playback().is_playing());
    assert!(s.playback().pending_advance().is_none());

    s.handle(Action::ToggleAutoplay, 20);
    assert!(s.playback().is_playing());
    assert_ne!(s.playback().pending_advance(), before);
    assert_eq!(s.playback().scheduled_count(), count + 1);
}

#[test]
fn second_play_does_not_arm_another_timer() {
    let mut playback = Playback::new(vec!["One.".to_string(), "Two.".to_string()], SpeedFactor::default());
    let mut fx = Vec::new();
    assert!(playback.play(0, &mut fx));
    let pending = playback.pending_advance();
    let armed = playback.scheduled_count();

    fx.clear();
    assert!(!playback.play(50, &mut fx));
    assert!(fx.is_empty());
    assert!(playback.is_playing());
    assert_eq!(playback.pending_advance(), pending);
    assert_eq!(playback.scheduled_count(), armed);
}

#[test]
fn auto_advance_chains_through_the_letter() {
    let mut s = started(true);
    let speed = SpeedFactor::new(1.0);

    let first = timing::delay("Hello there.", speed);
    assert!(s.tick(first - 1).is_empty());

    let fx = s.tick(first);
    assert!(fx.contains(&Effect::SetActive { index: 1, scroll: true }));
    assert_eq!(s.playback().position(), 1);

    let second = first + timing::delay("It is me.", speed);
    assert_eq!(s.playback().pending_advance().unwrap().due_at, second);
    s.tick(second);
    assert_eq!(s.playback().position(), 2);

    let third = second + timing::delay("I choose you.", speed);
    let fx = s.tick(third);
    assert_eq!(s.mode(), PresentationMode::Celebration);
    assert!(!fx.contains(&Effect::PauseAudio));
    assert!(fx.contains(&Effect::StartAnimation));
    assert!(s.playback().pending_advance().is_none());
}

#[test]
fn manual_navigation_replaces_the_pending_timer() {
    let mut s = started(true);
    let first = s.playback().pending_advance().unwrap();

    s.handle(Action::Next, 1_000);
    let replaced = s.playback().pending_advance().unwrap();
    assert_ne!(first.id, replaced.id);
    assert_eq!(replaced.due_at, 1_000 + timing::delay("It is me.", SpeedFactor::new(1.0)));

    // the stale deadline no longer fires
    assert!(s.tick(first.due_at).is_empty());
    assert_eq!(s.playback().position(), 1);
}

#[test]
fn speed_change_reschedules_immediately() {
    let mut s = started(true);
    let fx = s.handle(Action::SetSpeed(1.4), 500);
    assert!(fx.contains(&Effect::PersistSpeed(1.4)));
    let due = s.playback().pending_advance().unwrap().due_at;
    assert_eq!(due, 500 + timing::delay("Hello there.", SpeedFactor::new(1.4)));

    // without a pending timer the speed is stored but nothing is armed
    s.handle(Action::ToggleAutoplay, 600);
    s.handle(Action::SetSpeed(0.1), 700);
    assert_eq!(s.playback().speed().value(), SpeedFactor::MIN);
    assert!(s.playback().pending_advance().is_none());
}

#[test]
fn wish_resolves_then_outro_after_exact_delay() {
    let mut s = started(false);
    s.handle(Action::JumpToEnd, 1_000);

    let fx = s.handle(Action::ConfirmWish, 2_000);
    assert!(!fx.is_empty());
    assert_eq!(s.phase(), Some(CelebrationPhase::Resolving));

    assert!(s.tick(2_000 + OUTRO_DELAY_MS - 1).is_empty());
    assert_eq!(s.phase(), Some(CelebrationPhase::Resolving));

    s.tick(2_000 + OUTRO_DELAY_MS);
    assert_eq!(s.phase(), Some(CelebrationPhase::Outro));
}

#[test]
fn replay_from_outro_starts_over() {
    let mut s = started(true);
    s.handle(Action::JumpToEnd, 0);

    // replay is only offered in the outro
    assert!(s.handle(Action::Replay, 10).is_empty());

    s.handle(Action::ConfirmWish, 100);
    s.tick(100 + OUTRO_DELAY_MS);

    let fx = s.handle(Action::Replay, 5_000);
    assert_eq!(s.mode(), PresentationMode::Reading);
    assert_eq!(s.playback().position(), 0);
    assert!(s.phase().is_none());
    assert!(s.playback().is_playing());
    assert!(fx.contains(&Effect::StopAnimation));
    assert!(fx.contains(&Effect::DetachResize));
    assert!(fx.contains(&Effect::RewindAudio));

    s.handle(Action::JumpToEnd, 6_000);
    assert_eq!(s.phase(), Some(CelebrationPhase::AwaitingWish));
}

#[test]
fn reading_controls_are_ignored_in_celebration() {
    let mut s = started(false);
    s.handle(Action::GoTo(1), 0);
    s.handle(Action::JumpToEnd, 0);
    for action in [Action::Previous, Action::GoTo(0), Action::ToggleAutoplay] {
        assert!(s.handle(action, 10).is_empty());
    }
    assert_eq!(s.playback().position(), 1);
    assert!(!s.playback().is_playing());
}

#[test]
fn full_text_pauses_and_blocks_other_input() {
    let mut s = started(true);
    s.handle(Action::GoTo(1), 0);

    let fx = s.handle(Action::OpenFullText, 10);
    assert!(fx.contains(&Effect::ShowFullText(true)));
    assert!(fx.contains(&Effect::PauseAudio));
    assert!(!s.playback().is_playing());

    assert!(s.handle(Action::Next, 20).is_empty());
    assert!(s.handle(Action::JumpToEnd, 20).is_empty());

    let fx = s.handle(Action::CloseFullText, 30);
    assert!(fx.contains(&Effect::ShowFullText(false)));
    assert!(fx.contains(&Effect::RenderSequence));
    assert!(fx.contains(&Effect::SetActive { index: 1, scroll: false }));
    // closing does not resume autoplay
    assert!(!s.playback().is_playing());
}

#[test]
fn full_text_in_celebration_only_from_outro() {
    let mut s = started(false);
    s.handle(Action::JumpToEnd, 0);
    assert!(s.handle(Action::OpenFullText, 1).is_empty());

    s.handle(Action::ConfirmWish, 2);
    s.tick(2 + OUTRO_DELAY_MS);
    assert!(s.handle(Action::OpenFullText, 3_000).contains(&Effect::ShowFullText(true)));

    let fx = s.handle(Action::CloseFullText, 3_100);
    assert_eq!(fx, vec![Effect::ShowFullText(false)]);
    assert_eq!(s.mode(), PresentationMode::Celebration);
}

#[test]
fn celebration_survives_repeated_entries_without_stacking() {
    let mut s = started(true);
    let mut starts = 0;
    let mut stops = 0;
    for round in 0..3u64 {
        let base = round * 100_000;
        let mut fx = s.handle(Action::JumpToEnd, base);
        fx.extend(s.handle(Action::JumpToEnd, base + 1));
        fx.extend(s.handle(Action::ConfirmWish, base + 2));
        fx.extend(s.tick(base + 2 + OUTRO_DELAY_MS));
        fx.extend(s.handle(Action::Replay, base + 10_000));
        starts += fx.iter().filter(|e| **e == Effect::StartAnimation).count();
        stops += fx.iter().filter(|e| **e == Effect::StopAnimation).count();
    }
    assert_eq!(starts, 3);
    assert_eq!(stops, 3);
}
