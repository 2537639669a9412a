pub mod celebration;
pub mod clock;
pub mod playback;
pub mod stage;

pub use clock::{Clock, Millis, SystemClock};
pub use stage::Stage;

#[cfg(test)]
mod tests;
