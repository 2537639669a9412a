/// Braille markers pack 2x4 dots into each terminal cell.
pub const DOTS_PER_CELL: (u32, u32) = (2, 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSubscription(u64);

/// Drawing surface size in dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    /// Pixel size from the displayed size in cells and the dot density.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: (cols.max(1) as u32) * DOTS_PER_CELL.0,
            height: (rows.max(1) as u32) * DOTS_PER_CELL.1,
        }
    }
}

pub trait AnimationDriver {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn on_resize(&mut self) -> ResizeSubscription;
    fn unsubscribe(&mut self, subscription: ResizeSubscription);
}

/// Frame and resize plumbing for the terminal loop.
///
/// A requested frame fires once, on the next pass of the event loop. Resize
/// events only recompute the surface while someone is subscribed.
#[derive(Debug, Default)]
pub struct TerminalAnimator {
    next_id: u64,
    queued: Vec<FrameHandle>,
    subscribers: Vec<ResizeSubscription>,
    viewport: (u16, u16),
    surface: Surface,
}

impl TerminalAnimator {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            viewport: (cols, rows),
            ..Self::default()
        }
    }

    fn issue(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Drains the frames requested since the last pass.
    pub fn fire(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queued)
    }

    /// Records a new viewport for the canvas area, in cells.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = (cols, rows);
        if !self.subscribers.is_empty() {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.surface = Surface::from_cells(self.viewport.0, self.viewport.1);
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn pending_frames(&self) -> usize {
        self.queued.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl AnimationDriver for TerminalAnimator {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.issue());
        self.queued.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queued.retain(|h| *h != handle);
    }

    fn on_resize(&mut self) -> ResizeSubscription {
        let sub = ResizeSubscription(self.issue());
        self.subscribers.push(sub);
        self.recompute();
        sub
    }

    fn unsubscribe(&mut self, subscription: ResizeSubscription) {
        self.subscribers.retain(|s| *s != subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_fire_once() {
        let mut animator = TerminalAnimator::new(80, 24);
        let h = animator.request_frame();
        assert_eq!(animator.fire(), vec![h]);
        assert!(animator.fire().is_empty());
    }

    #[test]
    fn cancelled_frames_never_fire() {
        let mut animator = TerminalAnimator::new(80, 24);
        let h = animator.request_frame();
        animator.cancel_frame(h);
        assert!(animator.fire().is_empty());
    }

    #[test]
    fn surface_follows_resizes_only_while_subscribed() {
        let mut animator = TerminalAnimator::new(40, 10);
        animator.resize(50, 12);
        assert_eq!(animator.surface(), Surface::default());

        let sub = animator.on_resize();
        assert_eq!(animator.surface(), Surface { width: 100, height: 48 });

        animator.resize(60, 20);
        assert_eq!(animator.surface(), Surface { width: 120, height: 80 });

        animator.unsubscribe(sub);
        animator.resize(10, 5);
        assert_eq!(animator.surface(), Surface { width: 120, height: 80 });
        assert_eq!(animator.subscriber_count(), 0);
    }
}
