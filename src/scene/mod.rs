pub mod driver;
pub mod geometry;

use crate::engine::celebration::Celebration;
use crate::engine::Millis;
use driver::{AnimationDriver, FrameHandle, ResizeSubscription};

/// Everything the renderer needs to draw one frame of the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFrame {
    pub time_s: f64,
    pub morph: f64,
}

/// The celebration's per-frame loop. Holds at most one outstanding frame
/// request and at most one resize subscription.
#[derive(Debug, Default)]
pub struct SceneLoop {
    frame: Option<FrameHandle>,
    resize: Option<ResizeSubscription>,
    latest: Option<SceneFrame>,
}

impl SceneLoop {
    pub fn start(&mut self, driver: &mut dyn AnimationDriver) {
        if self.frame.is_none() {
            self.frame = Some(driver.request_frame());
        }
    }

    pub fn stop(&mut self, driver: &mut dyn AnimationDriver) {
        if let Some(handle) = self.frame.take() {
            driver.cancel_frame(handle);
        }
        self.latest = None;
    }

    pub fn attach(&mut self, driver: &mut dyn AnimationDriver) {
        if self.resize.is_none() {
            self.resize = Some(driver.on_resize());
        }
    }

    pub fn detach(&mut self, driver: &mut dyn AnimationDriver) {
        if let Some(sub) = self.resize.take() {
            driver.unsubscribe(sub);
        }
    }

    /// Frame callback: samples the celebration clock and requests the next
    /// frame. Stale handles and a missing celebration end the loop.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        celebration: Option<&Celebration>,
        now: Millis,
        driver: &mut dyn AnimationDriver,
    ) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;

        let Some(celebration) = celebration else {
            return false;
        };

        self.latest = Some(SceneFrame {
            time_s: celebration.elapsed(now) as f64 / 1000.0,
            morph: celebration.morph_progress(now),
        });
        self.frame = Some(driver.request_frame());
        true
    }

    pub fn latest(&self) -> Option<SceneFrame> {
        self.latest
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::driver::TerminalAnimator;
    use super::*;

    #[test]
    fn loop_reschedules_itself_while_celebrating() {
        let mut animator = TerminalAnimator::new(80, 24);
        let mut scene = SceneLoop::default();
        let mut fx = Vec::new();
        let mut celebration = Celebration::enter(1_000, &mut fx);

        scene.start(&mut animator);
        scene.start(&mut animator);
        assert_eq!(animator.pending_frames(), 1);

        let fired = animator.fire();
        assert!(scene.on_frame(fired[0], Some(&celebration), 1_500, &mut animator));
        assert_eq!(scene.latest().unwrap().time_s, 0.5);
        assert_eq!(animator.pending_frames(), 1);

        celebration.confirm_wish(2_000, &mut fx);
        let fired = animator.fire();
        scene.on_frame(fired[0], Some(&celebration), 2_900, &mut animator);
        assert!((scene.latest().unwrap().morph - 0.5).abs() < 1e-9);
    }

    #[test]
    fn stop_cancels_and_ignores_stale_frames() {
        let mut animator = TerminalAnimator::new(80, 24);
        let mut scene = SceneLoop::default();
        let mut fx = Vec::new();
        let celebration = Celebration::enter(0, &mut fx);

        scene.start(&mut animator);
        scene.attach(&mut animator);
        let stale = animator.fire()[0];
        scene.stop(&mut animator);
        scene.detach(&mut animator);

        assert!(!scene.on_frame(stale, Some(&celebration), 10, &mut animator));
        assert_eq!(animator.pending_frames(), 0);
        assert_eq!(animator.subscriber_count(), 0);
        assert!(!scene.is_running());
    }
}
