// SPDX-License-Identifier: GPL-3.0-only

//! Juno - A floating sticky-notes widget for COSMIC desktop
//!
//! The widget is a small ball that floats above other windows. Clicking it
//! expands a notes panel; collapsing the panel turns it back into the ball,
//! which then settles onto the nearest screen edge or corner.
//!
//! # Architecture
//!
//! 1. **Host controller** (`host`): owns the single widget window and all
//!    geometry rules (clamping, expand/collapse, snapping, persistence). It
//!    runs on its own thread and is driven by commands over an in-process
//!    channel (`ipc`).
//!
//! 2. **Main Application** (`juno`): the COSMIC window. It renders the ball
//!    or the panel, turns pointer gestures into host commands (`input`) and
//!    applies the window changes the host sends back.
//!
//! 3. **System Tray Applet** (`juno-applet`): a panel applet that shows,
//!    hides, expands or quits the widget over D-Bus.
//!
//! The `juno` binary doubles as a D-Bus remote (`juno toggle-expand`).
//!
//! # Modules
//!
//! - `app`: Main application model and COSMIC Application trait implementation
//! - `applet`: System tray applet for panel integration
//! - `app_settings`: Centralized application constants
//! - `cli`: Command-line arguments and tracing setup
//! - `config`: User configuration with cosmic_config persistence
//! - `dbus`: D-Bus interface for inter-process communication
//! - `host`: Window controller and its event loop
//! - `i18n`: Localization support using fluent translations
//! - `input`: Drag tracking and click suppression
//! - `ipc`: Commands, replies and events between UI and host
//! - `state`: Persistent key/value store (position, theme)
//! - `theme`: Widget color themes
//! - `window`: Geometry, snapping and the window handle abstraction

pub mod app;
pub mod app_settings;
pub mod applet;
pub mod cli;
pub mod config;
pub mod dbus;
pub mod host;
pub mod i18n;
pub mod input;
pub mod ipc;
pub mod state;
pub mod theme;
pub mod window;

// Re-export the fl! macro for localization
pub use crate::i18n::LANGUAGE_LOADER;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use std::time::Duration;

    use futures::channel::mpsc;
    use tokio::task::JoinHandle;

    use crate::host::{collapsed_size, HostController, HostSettings};
    use crate::input::DragTracker;
    use crate::ipc::{self, HostClient, HostEvent};
    use crate::state::{KvStore, WINDOW_X, WINDOW_Y};
    use crate::window::{
        FixedScreen, Position, ShadowWindow, Size, SnapTarget, WindowOp, WorkArea,
    };

    const SCREEN: WorkArea = WorkArea::new(1920, 1080);

    fn host() -> HostController {
        let mut host = HostController::new(
            KvStore::in_memory(),
            Box::new(FixedScreen(SCREEN)),
            HostSettings::default(),
        );
        host.create_window(Box::new(ShadowWindow::new(
            Position::default(),
            collapsed_size(),
        )));
        host
    }

    fn spawn(host: HostController) -> (HostClient, JoinHandle<HostController>) {
        let (client, rx) = ipc::channel();
        (client, tokio::spawn(host.run(rx)))
    }

    /// Stops the loop and hands the controller back for inspection.
    async fn stop(client: HostClient, handle: JoinHandle<HostController>) -> HostController {
        client.quit().unwrap();
        handle.await.unwrap()
    }

    fn persisted(host: &HostController) -> Position {
        Position::new(
            host.store().get(WINDOW_X, i32::MIN),
            host.store().get(WINDOW_Y, i32::MIN),
        )
    }

    /// Integration Test 1: Drag the ball and release it
    ///
    /// Pointer deltas accumulate from the baseline, the host clamps each
    /// request, and the release locks the ball where it was dropped.
    #[tokio::test]
    async fn test_drag_then_finalize() {
        let (client, handle) = spawn(host());
        let mut tracker = DragTracker::new(client.clone());

        let baseline = tracker.pointer_down().await.unwrap();
        assert_eq!(
            baseline.position,
            Position::new(1820, 980),
            "New widget should start in the bottom-right corner"
        );
        assert!(tracker.arm(baseline));

        assert!(tracker.pointer_move(-300.0, -200.0));
        assert_eq!(
            client.get_window_position().await.unwrap(),
            Position::new(1520, 780)
        );

        // Far past the right edge: at most half the ball may leave the screen
        assert!(tracker.pointer_move(5000.0, 0.0));
        assert!(tracker.pointer_up().await.unwrap(), "Collapsed drag should finalize");
        assert!(tracker.should_block_click(), "The release of a drag is not a click");

        let host = stop(client, handle).await;
        let window = host.window().unwrap();
        assert_eq!(window.position(), Position::new(1880, 780));
        assert_eq!(window.size(), collapsed_size());
        assert!(!window.is_movable() && !window.is_resizable());
        assert_eq!(persisted(&host), Position::new(1880, 780));
        assert_eq!(host.snap_deadline(), None, "Finalizing never schedules a snap");
    }

    /// Integration Test 2: A press without motion is a click
    #[tokio::test]
    async fn test_click_expands() {
        let (client, handle) = spawn(host());
        let mut tracker = DragTracker::new(client.clone());

        let baseline = tracker.pointer_down().await.unwrap();
        tracker.arm(baseline);
        assert!(!tracker.pointer_move(0.0, 0.0), "Zero deltas are not a drag");
        tracker.pointer_up().await.unwrap();

        assert!(!tracker.should_block_click());
        assert!(client.toggle_expand(true).await.unwrap());

        let host = stop(client, handle).await;
        assert!(host.is_expanded());
        assert_eq!(
            host.window_position(),
            Position::new(1720, 780),
            "Expanding from the corner keeps the panel on screen"
        );
    }

    /// Integration Test 3: Collapsing settles the ball onto an anchor
    #[tokio::test(start_paused = true)]
    async fn test_collapse_snaps_after_settle_delay() {
        let (client, handle) = spawn(host());

        assert!(client.toggle_expand(true).await.unwrap());
        client.set_window_position(900.0, 20.0, None).unwrap();
        assert!(!client.toggle_expand(false).await.unwrap());
        assert_eq!(
            client.get_window_position().await.unwrap(),
            Position::new(900, 20),
            "The snap waits for the settle delay"
        );

        tokio::time::sleep(Duration::from_millis(150)).await;

        let position = client.get_window_position().await.unwrap();
        let anchors: Vec<Position> = SnapTarget::ALL
            .iter()
            .map(|target| {
                let (x, y) = target.anchor(collapsed_size(), SCREEN, 20);
                Position::new(x.round() as i32, y.round() as i32)
            })
            .collect();
        assert!(anchors.contains(&position), "{position:?} is not an anchor");
        assert_eq!(position, Position::new(920, 20));

        let host = stop(client, handle).await;
        assert_eq!(persisted(&host), Position::new(920, 20));
    }

    /// Integration Test 4: Re-expanding before the delay cancels the snap
    #[tokio::test(start_paused = true)]
    async fn test_reexpand_skips_snap() {
        let (client, handle) = spawn(host());

        client.toggle_expand(true).await.unwrap();
        client.set_window_position(900.0, 20.0, None).unwrap();
        client.toggle_expand(false).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(client.toggle_expand(true).await.unwrap());
        let expanded_at = client.get_window_position().await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(client.get_window_position().await.unwrap(), expanded_at);
        let host = stop(client, handle).await;
        assert!(host.is_expanded());
        assert_eq!(host.snap_deadline(), None);
    }

    /// Integration Test 5: A tray toggle invalidates the running drag
    #[tokio::test]
    async fn test_toggle_during_drag_ignores_stale_moves() {
        let (client, handle) = spawn(host());
        let mut tracker = DragTracker::new(client.clone());

        let baseline = tracker.pointer_down().await.unwrap();
        tracker.arm(baseline);
        assert!(tracker.pointer_move(-10.0, -10.0));
        assert_eq!(
            client.get_window_position().await.unwrap(),
            Position::new(1810, 970)
        );

        // The applet expands the widget while the button is still held
        assert!(client.toggle_expanded().await.unwrap());
        let after_toggle = client.get_window_position().await.unwrap();

        assert!(tracker.pointer_move(-500.0, -500.0));
        assert_eq!(
            client.get_window_position().await.unwrap(),
            after_toggle,
            "Moves of the old drag session must not move the panel"
        );

        // Untokened moves are always applied
        client.set_window_position(100.0, 100.0, None).unwrap();
        assert_eq!(
            client.get_window_position().await.unwrap(),
            Position::new(100, 100)
        );

        stop(client, handle).await;
    }

    /// Integration Test 6: Rapid drag notifications apply in order
    #[tokio::test]
    async fn test_rapid_moves_keep_order() {
        let (client, handle) = spawn(host());
        let mut tracker = DragTracker::new(client.clone());

        let baseline = tracker.pointer_down().await.unwrap();
        tracker.arm(baseline);
        for _ in 0..50 {
            tracker.pointer_move(-10.0, -5.0);
        }
        tracker.pointer_up().await.unwrap();

        let host = stop(client, handle).await;
        assert_eq!(host.window_position(), Position::new(1320, 730));
        assert_eq!(persisted(&host), Position::new(1320, 730));
    }

    /// Integration Test 7: A resized panel is clamped with its real size
    #[tokio::test]
    async fn test_resized_panel_native_move() {
        let (client, handle) = spawn(host());

        assert!(client.toggle_expand(true).await.unwrap());
        client.window_resized(Size::new(800, 1000)).unwrap();
        client.window_moved(Position::new(1600, 100)).unwrap();
        assert_eq!(
            client.get_window_position().await.unwrap(),
            Position::new(1520, 100),
            "At most half of the 800 px panel may leave the screen"
        );

        let host = stop(client, handle).await;
        assert_eq!(persisted(&host), Position::new(1520, 100));
    }

    /// Integration Test 8: Config changes reach the running host
    #[tokio::test]
    async fn test_live_settings_update() {
        let (client, handle) = spawn(host());

        client
            .update_settings(HostSettings {
                snap_padding: 0,
                settle_delay: Duration::from_millis(100),
            })
            .unwrap();
        let snap = client.snap_to_edge().await.unwrap().unwrap();
        assert_eq!(snap.target, SnapTarget::BottomRight);
        assert_eq!(snap.position, Position::new(1840, 1000));

        stop(client, handle).await;
    }

    /// Integration Test 9: Window changes reach the UI through the sink
    #[test]
    fn test_window_ops_forwarded_to_ui() {
        let (events_tx, mut events_rx) = mpsc::unbounded();
        let mut host = HostController::new(
            KvStore::in_memory(),
            Box::new(FixedScreen(SCREEN)),
            HostSettings::default(),
        )
        .with_events(events_tx.clone());
        host.create_window(Box::new(
            ShadowWindow::new(Position::default(), collapsed_size()).with_sink(events_tx),
        ));

        let mut events = Vec::new();
        while let Ok(Some(event)) = events_rx.try_next() {
            events.push(event);
        }
        assert_eq!(
            events.last(),
            Some(&HostEvent::Window(WindowOp::SetBounds(
                Position::new(1820, 980),
                collapsed_size()
            ))),
            "Startup should place the ball in one step"
        );

        host.toggle_expand(true);
        let mut events = Vec::new();
        while let Ok(Some(event)) = events_rx.try_next() {
            events.push(event);
        }
        assert!(events.contains(&HostEvent::Window(WindowOp::SetResizable(true))));
        assert!(events.contains(&HostEvent::Window(WindowOp::Move(Position::new(1720, 780)))));
        assert_eq!(events.last(), Some(&HostEvent::ExpandedChanged(true)));
    }
}
