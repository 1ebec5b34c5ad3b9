// SPDX-License-Identifier: GPL-3.0-only

//! Sources of the primary display's work area.

use tokio::sync::watch;

use super::geometry::WorkArea;

/// Provides the current work area. Queried once per geometry operation.
pub trait ScreenSource: Send {
    fn work_area(&self) -> WorkArea;
}

/// A work area that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedScreen(pub WorkArea);

impl ScreenSource for FixedScreen {
    fn work_area(&self) -> WorkArea {
        self.0
    }
}

/// A work area kept up to date by the UI side.
///
/// The UI owns the [`watch::Sender`] and publishes the monitor size whenever
/// it learns about it; the host reads the latest value on every operation.
#[derive(Debug, Clone)]
pub struct WatchedScreen {
    rx: watch::Receiver<WorkArea>,
}

impl WatchedScreen {
    pub fn new(rx: watch::Receiver<WorkArea>) -> Self {
        Self { rx }
    }

    /// Creates a linked sender/source pair starting at `initial`.
    pub fn channel(initial: WorkArea) -> (watch::Sender<WorkArea>, Self) {
        let (tx, rx) = watch::channel(initial);
        (tx, Self::new(rx))
    }
}

impl ScreenSource for WatchedScreen {
    fn work_area(&self) -> WorkArea {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: the watched screen always reports the latest published area.
    #[test]
    fn test_watched_screen_reads_latest() {
        let (tx, screen) = WatchedScreen::channel(WorkArea::new(1920, 1080));
        assert_eq!(screen.work_area(), WorkArea::new(1920, 1080));

        tx.send_replace(WorkArea::new(2560, 1400));
        assert_eq!(screen.work_area(), WorkArea::new(2560, 1400));
    }

    /// Test: the fixed screen is constant.
    #[test]
    fn test_fixed_screen() {
        let screen = FixedScreen(WorkArea::new(800, 600));
        assert_eq!(screen.work_area(), WorkArea::new(800, 600));
    }
}
