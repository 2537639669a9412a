use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Reading,
    Celebration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationPhase {
    AwaitingWish,
    Resolving,
    Outro,
}

/// Which actions the celebration overlay offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishUi {
    Hidden,
    Wish,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Playing,
    Paused,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    /// UAX #29 sentence boundaries
    #[default]
    Unicode,
    /// Split after . ! ? followed by a capital letter or quote
    Heuristic,
}

/// Discrete user requests the core understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Next,
    Previous,
    GoTo(usize),
    ToggleAutoplay,
    JumpToEnd,
    ConfirmWish,
    Replay,
    OpenFullText,
    CloseFullText,
    SetSpeed(f64),
}

/// Side effects requested by a state transition. The shell applies them to
/// the view, the media transport, the preference store and the animator.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderSequence,
    SetActive { index: usize, scroll: bool },
    UpdateProgress { position: usize, total: usize },
    RenderFullText,
    ShowFullText(bool),
    ModeChanged(PresentationMode),
    PlayingChanged(bool),
    PlayAudio,
    PauseAudio,
    RewindAudio,
    Prompt(Option<String>),
    WishUi(WishUi),
    StartAnimation,
    StopAnimation,
    AttachResize,
    DetachResize,
    PersistSpeed(f64),
}
