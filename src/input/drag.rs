// SPDX-License-Identifier: GPL-3.0-only

//! Pointer drag tracking for the collapsed ball.
//!
//! The tracker never touches the window. It turns pointer events into host
//! commands and keeps just enough local state to tell a drag from a click:
//!
//! 1. [`DragTracker::pointer_down`] fetches the window position and a drag
//!    session token from the host in a single `StartDrag` call. The resulting
//!    [`DragBaseline`] is handed back through [`DragTracker::arm`].
//! 2. [`DragTracker::pointer_move`] accumulates per-event deltas and sends
//!    fire-and-forget `SetWindowPosition` notifications.
//! 3. [`DragTracker::pointer_up`] detaches and asks the host to finalize.
//!
//! The press/move/release flags outlive the gesture by a short grace period
//! so the click that follows a drag can still be recognised and swallowed.
//! Grace deadlines are evaluated lazily against [`tokio::time::Instant`].

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time::Instant;

use crate::app_settings::CLICK_GRACE_MS;
use crate::ipc::{DragSessionId, HostClient, IpcError};
use crate::window::Position;

/// Where a drag starts: the window position and the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragBaseline {
    pub position: Position,
    pub session: DragSessionId,
    /// Press this baseline was requested for.
    generation: u64,
}

/// Tracked coordinates of an armed press.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tracked {
    x: f64,
    y: f64,
    session: DragSessionId,
}

/// UI-side drag state machine.
#[derive(Debug)]
pub struct DragTracker {
    host: HostClient,
    grace: Duration,
    generation: u64,
    pressed: bool,
    tracked: Option<Tracked>,
    dragging: bool,
    moved: bool,
    dragging_until: Option<Instant>,
    moved_until: Option<Instant>,
}

impl DragTracker {
    /// Creates a tracker with the default click grace period.
    pub fn new(host: HostClient) -> Self {
        Self::with_grace(host, Duration::from_millis(CLICK_GRACE_MS))
    }

    pub fn with_grace(host: HostClient, grace: Duration) -> Self {
        Self {
            host,
            grace,
            generation: 0,
            pressed: false,
            tracked: None,
            dragging: false,
            moved: false,
            dragging_until: None,
            moved_until: None,
        }
    }

    pub fn set_grace(&mut self, grace: Duration) {
        self.grace = grace;
    }

    /// Starts a press and returns the future resolving its baseline.
    ///
    /// Dragging is not marked here; only the first nonzero move does that.
    pub fn pointer_down(&mut self) -> BoxFuture<'static, Result<DragBaseline, IpcError>> {
        self.generation += 1;
        self.pressed = true;
        self.tracked = None;
        self.dragging = false;
        self.moved = false;
        self.dragging_until = None;
        self.moved_until = None;

        let host = self.host.clone();
        let generation = self.generation;
        async move {
            let start = host.start_drag().await?;
            Ok(DragBaseline {
                position: start.position,
                session: start.session,
                generation,
            })
        }
        .boxed()
    }

    /// Arms the current press with its baseline.
    ///
    /// Returns `false` for a baseline of an earlier press or of a press that
    /// was already released.
    pub fn arm(&mut self, baseline: DragBaseline) -> bool {
        if baseline.generation != self.generation || !self.pressed {
            tracing::debug!("Discarding drag baseline of an earlier press");
            return false;
        }
        self.tracked = Some(Tracked {
            x: f64::from(baseline.position.x),
            y: f64::from(baseline.position.y),
            session: baseline.session,
        });
        true
    }

    /// Applies one pointer delta. Returns `true` if a move was sent.
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        let Some(tracked) = self.tracked.as_mut() else {
            return false;
        };

        tracked.x += dx;
        tracked.y += dy;
        self.dragging = true;
        self.moved = true;

        if let Err(e) = self
            .host
            .set_window_position(tracked.x, tracked.y, Some(tracked.session))
        {
            tracing::warn!("Failed to send drag position: {}", e);
        }
        true
    }

    /// Ends the press and returns the future finalizing the drag.
    pub fn pointer_up(&mut self) -> BoxFuture<'static, Result<bool, IpcError>> {
        self.pressed = false;
        self.tracked = None;
        self.dragging_until = Some(Instant::now() + self.grace);

        let host = self.host.clone();
        async move { host.finalize_drag().await }.boxed()
    }

    /// Whether the click that ends this gesture must be swallowed.
    ///
    /// A positive answer schedules the moved flag to clear after the grace
    /// period.
    pub fn should_block_click(&mut self) -> bool {
        let moved = self.has_moved();
        if moved && self.moved_until.is_none() {
            self.moved_until = Some(Instant::now() + self.grace);
        }
        moved
    }

    /// A drag is in progress or ended less than the grace period ago.
    pub fn is_dragging(&self) -> bool {
        self.dragging && self.dragging_until.is_none_or(|until| Instant::now() < until)
    }

    pub fn has_moved(&self) -> bool {
        self.moved && self.moved_until.is_none_or(|until| Instant::now() < until)
    }

    /// The pointer is down and the press has its baseline.
    pub fn is_armed(&self) -> bool {
        self.tracked.is_some()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Last position sent to the host, if armed.
    pub fn tracked_position(&self) -> Option<(f64, f64)> {
        self.tracked.map(|tracked| (tracked.x, tracked.y))
    }
}

/// Turns window-relative cursor positions into screen-space deltas.
///
/// The window follows the pointer, so a window-relative cursor position only
/// means something together with the window origin it was reported against.
/// The UI updates the origin whenever it applies a move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrabAnchor {
    origin: (f64, f64),
    last: Option<(f64, f64)>,
}

impl GrabAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records where the window currently is.
    pub fn set_origin(&mut self, position: Position) {
        self.origin = (f64::from(position.x), f64::from(position.y));
    }

    /// Grabs at a window-relative cursor position.
    pub fn press(&mut self, x: f32, y: f32) {
        self.last = Some(self.to_screen(x, y));
    }

    /// Delta since the previous cursor position, `None` when not grabbed.
    pub fn motion(&mut self, x: f32, y: f32) -> Option<(f64, f64)> {
        let last = self.last?;
        let current = self.to_screen(x, y);
        self.last = Some(current);
        Some((current.0 - last.0, current.1 - last.1))
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_grabbed(&self) -> bool {
        self.last.is_some()
    }

    fn to_screen(&self, x: f32, y: f32) -> (f64, f64) {
        (self.origin.0 + f64::from(x), self.origin.1 + f64::from(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::{self, Command, DragStart, Envelope, Reply};
    use futures::channel::mpsc;
    use futures::StreamExt;

    /// Answers calls like a host at `position` with session `session`.
    fn spawn_host(
        mut rx: mpsc::UnboundedReceiver<Envelope>,
        position: Position,
        session: u64,
    ) -> tokio::task::JoinHandle<Vec<Command>> {
        tokio::spawn(async move {
            let mut notified = Vec::new();
            while let Some(envelope) = rx.next().await {
                match envelope {
                    Envelope::Notify(command) => notified.push(command),
                    Envelope::Call(command, reply) => {
                        let answer = match command {
                            Command::StartDrag => Reply::DragStarted(DragStart {
                                session: DragSessionId(session),
                                position,
                            }),
                            Command::FinalizeDrag => Reply::Finalized(true),
                            _ => Reply::Ack,
                        };
                        let _ = reply.send(answer);
                    }
                }
            }
            notified
        })
    }

    /// Test: moves accumulate per-event deltas from the baseline.
    #[tokio::test]
    async fn test_moves_accumulate_from_baseline() {
        let (client, rx) = ipc::channel();
        let host = spawn_host(rx, Position::new(100, 200), 7);
        let mut tracker = DragTracker::new(client);

        let baseline = tracker.pointer_down().await.unwrap();
        assert_eq!(baseline.position, Position::new(100, 200));
        assert!(tracker.arm(baseline));
        assert!(!tracker.is_dragging(), "pointer down alone is not a drag");

        assert!(tracker.pointer_move(5.0, -3.0));
        assert!(tracker.pointer_move(2.5, 1.0));
        assert!(tracker.is_dragging());
        assert_eq!(tracker.tracked_position(), Some((107.5, 198.0)));

        assert_eq!(tracker.pointer_up().await, Ok(true));
        drop(tracker);

        let session = Some(DragSessionId(7));
        assert_eq!(
            host.await.unwrap(),
            vec![
                Command::SetWindowPosition { x: 105.0, y: 197.0, session },
                Command::SetWindowPosition { x: 107.5, y: 198.0, session },
            ]
        );
    }

    /// Test: zero deltas are ignored and do not start a drag.
    #[tokio::test]
    async fn test_zero_delta_is_noop() {
        let (client, rx) = ipc::channel();
        let host = spawn_host(rx, Position::new(0, 0), 0);
        let mut tracker = DragTracker::new(client);
        let baseline = tracker.pointer_down().await.unwrap();
        tracker.arm(baseline);

        assert!(!tracker.pointer_move(0.0, 0.0));
        assert!(!tracker.is_dragging());
        assert!(!tracker.should_block_click());
        drop(tracker);
        assert!(host.await.unwrap().is_empty());
    }

    /// Test: moves before arming and after release are ignored.
    #[tokio::test]
    async fn test_moves_outside_press_are_ignored() {
        let (client, rx) = ipc::channel();
        let host = spawn_host(rx, Position::new(0, 0), 0);
        let mut tracker = DragTracker::new(client);

        assert!(!tracker.pointer_move(1.0, 1.0), "no press yet");
        let pending = tracker.pointer_down();
        assert!(!tracker.pointer_move(1.0, 1.0), "baseline not yet armed");
        let baseline = pending.await.unwrap();
        tracker.arm(baseline);
        tracker.pointer_up().await.unwrap();
        assert!(!tracker.pointer_move(1.0, 1.0), "released");

        drop(tracker);
        assert!(host.await.unwrap().is_empty());
    }

    /// Test: a baseline arriving after release or for an older press is dropped.
    #[tokio::test]
    async fn test_stale_baseline_is_discarded() {
        let (client, rx) = ipc::channel();
        let _host = spawn_host(rx, Position::new(0, 0), 0);
        let mut tracker = DragTracker::new(client);

        let first = tracker.pointer_down().await.unwrap();
        let second = tracker.pointer_down().await.unwrap();
        assert!(!tracker.arm(first), "older press");
        assert!(tracker.arm(second));

        let late = tracker.pointer_down();
        let _ = tracker.pointer_up();
        assert!(!tracker.arm(late.await.unwrap()), "press already released");
        assert!(!tracker.is_armed());
    }

    /// Test: a drag blocks the following click, a plain click does not.
    #[tokio::test(start_paused = true)]
    async fn test_click_suppression() {
        let (client, rx) = ipc::channel();
        let _host = spawn_host(rx, Position::new(0, 0), 0);
        let mut tracker = DragTracker::new(client);

        let baseline = tracker.pointer_down().await.unwrap();
        tracker.arm(baseline);
        tracker.pointer_move(10.0, 0.0);
        tracker.pointer_up().await.unwrap();
        assert!(tracker.should_block_click());
        assert!(tracker.is_dragging(), "still dragging within the grace period");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!tracker.is_dragging());
        assert!(!tracker.should_block_click(), "flag cleared after the grace period");

        let baseline = tracker.pointer_down().await.unwrap();
        tracker.arm(baseline);
        tracker.pointer_up().await.unwrap();
        assert!(!tracker.should_block_click(), "no move, no suppression");
    }

    /// Test: a press costs exactly one round trip, StartDrag.
    #[tokio::test]
    async fn test_pointer_down_single_call() {
        let (client, mut rx) = ipc::channel();
        let host = tokio::spawn(async move {
            let mut calls = Vec::new();
            while let Some(envelope) = rx.next().await {
                if let Envelope::Call(command, reply) = envelope {
                    let answer = match command {
                        Command::StartDrag => Reply::DragStarted(DragStart {
                            session: DragSessionId(3),
                            position: Position::new(40, 50),
                        }),
                        _ => Reply::Ack,
                    };
                    calls.push(command);
                    let _ = reply.send(answer);
                }
            }
            calls
        });

        let mut tracker = DragTracker::new(client);
        let baseline = tracker.pointer_down().await.unwrap();
        assert_eq!(baseline.position, Position::new(40, 50));
        assert_eq!(baseline.session, DragSessionId(3));
        drop(tracker);

        assert_eq!(host.await.unwrap(), vec![Command::StartDrag]);
    }

    /// Test: the grab anchor reports screen-space deltas.
    #[test]
    fn test_grab_anchor_deltas() {
        let mut anchor = GrabAnchor::new();
        anchor.set_origin(Position::new(100, 100));
        assert_eq!(anchor.motion(10.0, 10.0), None, "not grabbed");

        anchor.press(40.0, 40.0);
        assert_eq!(anchor.motion(45.0, 38.0), Some((5.0, -2.0)));

        // The window followed; the cursor is back at the grab point.
        anchor.set_origin(Position::new(105, 98));
        assert_eq!(anchor.motion(40.0, 40.0), Some((0.0, 0.0)));
        assert_eq!(anchor.motion(41.0, 40.0), Some((1.0, 0.0)));

        anchor.release();
        assert!(!anchor.is_grabbed());
    }
}
