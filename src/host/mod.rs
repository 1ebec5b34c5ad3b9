// SPDX-License-Identifier: GPL-3.0-only

//! Host controller: the single authority for widget geometry.
//!
//! The controller owns the window (through [`WindowManager`]), the expanded
//! flag, the key-value store and the deferred snap timer. It is driven by one
//! event loop ([`HostController::run`]) that consumes [`Envelope`]s in order,
//! so no state here is ever shared or locked.
//!
//! # Transitions
//!
//! ```text
//!             toggle_expand(true)
//!   Collapsed ───────────────────▶ Expanded
//!   80×80, locked                   400×600, resizable, movable
//!       ▲                                │
//!       │ settle delay ─▶ snap           │ toggle_expand(false)
//!       └────────────────────────────────┘
//! ```
//!
//! # Drag sessions
//!
//! `StartDrag` hands out the current session token. `ToggleExpand` and
//! `FinalizeDrag` advance it, so position updates still in flight from an
//! earlier gesture are ignored instead of fighting the new state.

use std::time::Duration;

use futures::channel::mpsc;
use futures::StreamExt;
use tokio::time::{sleep_until, Instant};

use crate::app_settings::{
    COLLAPSED_SIZE, EXPANDED_HEIGHT, EXPANDED_WIDTH, MAX_EXPANDED_HEIGHT, MAX_EXPANDED_WIDTH,
    MIN_EXPANDED_HEIGHT, MIN_EXPANDED_WIDTH, SETTLE_DELAY_MS, SNAP_PADDING,
};
use crate::config::Config;
use crate::ipc::{Command, DragSessionId, DragStart, Envelope, HostEvent, Reply};
use crate::state::KvStore;
use crate::theme::Theme;
use crate::window::geometry::{clamp_drag, clamp_expand, clamp_moved};
use crate::window::{snap, Position, ScreenSource, Size, Snap, WindowHandle, WindowManager};

/// Tunables of the host controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSettings {
    /// Distance between a snapped ball and the screen edge.
    pub snap_padding: i32,
    /// Delay between a collapse and the automatic snap.
    pub settle_delay: Duration,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            snap_padding: SNAP_PADDING,
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
        }
    }
}

impl From<&Config> for HostSettings {
    fn from(config: &Config) -> Self {
        Self {
            snap_padding: config.snap_padding,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }
}

/// Size of the collapsed ball.
pub const fn collapsed_size() -> Size {
    Size::square(COLLAPSED_SIZE)
}

/// Default size of the expanded panel.
pub const fn expanded_size() -> Size {
    Size::new(EXPANDED_WIDTH, EXPANDED_HEIGHT)
}

/// Size limits of the expanded panel as `(min, max)`.
pub const fn expanded_limits() -> (Size, Size) {
    (
        Size::new(MIN_EXPANDED_WIDTH, MIN_EXPANDED_HEIGHT),
        Size::new(MAX_EXPANDED_WIDTH, MAX_EXPANDED_HEIGHT),
    )
}

/// The host-side geometry state machine.
pub struct HostController {
    window: WindowManager,
    screen: Box<dyn ScreenSource>,
    store: KvStore,
    settings: HostSettings,
    expanded: bool,
    drag_epoch: u64,
    snap_deadline: Option<Instant>,
    events: Option<mpsc::UnboundedSender<HostEvent>>,
    quit: bool,
}

impl std::fmt::Debug for HostController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostController")
            .field("window", &self.window)
            .field("expanded", &self.expanded)
            .field("drag_epoch", &self.drag_epoch)
            .field("snap_deadline", &self.snap_deadline)
            .finish_non_exhaustive()
    }
}

impl HostController {
    /// Creates a controller without a window.
    pub fn new(store: KvStore, screen: Box<dyn ScreenSource>, settings: HostSettings) -> Self {
        Self {
            window: WindowManager::new(),
            screen,
            store,
            settings,
            expanded: false,
            drag_epoch: 0,
            snap_deadline: None,
            events: None,
            quit: false,
        }
    }

    /// Sends host events (expanded/theme/visibility changes) to `events`.
    #[must_use]
    pub fn with_events(mut self, events: mpsc::UnboundedSender<HostEvent>) -> Self {
        self.events = Some(events);
        self
    }

    // ========================================================================
    // Window Lifecycle
    // ========================================================================

    /// Installs the widget window collapsed at its restored position.
    ///
    /// The last persisted position is used when present, otherwise the ball
    /// starts in the bottom-right corner. Either way it is clamped with the
    /// drag policy so a stale position from a larger screen stays reachable.
    pub fn create_window(&mut self, mut handle: Box<dyn WindowHandle>) {
        let area = self.screen.work_area();
        let size = collapsed_size();
        let default = Position::new(
            area.width as i32 - size.width as i32 - self.settings.snap_padding,
            area.height as i32 - size.height as i32 - self.settings.snap_padding,
        );
        let saved = self.store.position(default);
        let position = clamp_drag(f64::from(saved.x), f64::from(saved.y), size, area)
            .unwrap_or(default);

        handle.set_size_limits(size, size);
        handle.set_resizable(false);
        handle.set_movable(false);
        handle.set_bounds(position, size);
        self.window.create(handle);
        self.expanded = false;

        tracing::info!(
            "Widget window created at ({}, {}) on a {}x{} work area",
            position.x,
            position.y,
            area.width,
            area.height
        );
    }

    /// Drops the widget window. Later geometry commands become no-ops.
    pub fn destroy_window(&mut self) -> Option<Box<dyn WindowHandle>> {
        self.snap_deadline = None;
        self.window.destroy()
    }

    /// The managed window, if any.
    pub fn window(&self) -> Option<&dyn WindowHandle> {
        self.window.get()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// When the deferred snap fires, if one is scheduled.
    pub fn snap_deadline(&self) -> Option<Instant> {
        self.snap_deadline
    }

    /// The store holding persisted position and theme.
    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Replaces the tunables (config reload).
    ///
    /// A snap already scheduled keeps its deadline; the new padding applies
    /// to it.
    pub fn set_settings(&mut self, settings: HostSettings) {
        tracing::debug!("Host settings updated: {:?}", settings);
        self.settings = settings;
    }

    // ========================================================================
    // Geometry Commands
    // ========================================================================

    /// Current window position, `(0, 0)` without a window.
    pub fn window_position(&self) -> Position {
        self.window.position().unwrap_or_default()
    }

    /// Clamps and applies a drag position.
    ///
    /// Returns the applied position, or `None` when the request was dropped
    /// (no window, non-finite coordinates, or a stale drag session).
    pub fn set_position(
        &mut self,
        x: f64,
        y: f64,
        session: Option<DragSessionId>,
    ) -> Option<Position> {
        if let Some(session) = session {
            if session.0 != self.drag_epoch {
                tracing::debug!(
                    "Ignoring position from stale drag session {} (current {})",
                    session.0,
                    self.drag_epoch
                );
                return None;
            }
        }

        let area = self.screen.work_area();
        let expanded = self.expanded;
        let window = self.window.get_mut()?;
        let size = window.size();
        let Some(position) = clamp_drag(x, y, size, area) else {
            tracing::debug!("Rejecting non-finite window position ({}, {})", x, y);
            return None;
        };

        if expanded {
            window.set_position(position);
        } else {
            window.set_bounds(position, collapsed_size());
        }
        self.store.save_position(position);
        Some(position)
    }

    /// Runs the expand or collapse transition and returns the new state.
    ///
    /// Without a window this is a no-op that reports the unchanged state.
    pub fn toggle_expand(&mut self, expanded: bool) -> bool {
        self.drag_epoch += 1;
        let area = self.screen.work_area();
        let Some(window) = self.window.get_mut() else {
            tracing::debug!("toggle-expand ignored, no window");
            return self.expanded;
        };
        self.expanded = expanded;

        if expanded {
            let (min, max) = expanded_limits();
            window.set_resizable(true);
            window.set_movable(true);
            window.set_size_limits(min, max);
            window.set_size(expanded_size());

            let position = clamp_expand(window.position(), area);
            window.set_position(position);
            self.snap_deadline = None;
            tracing::info!("Expanded at ({}, {})", position.x, position.y);
        } else {
            let size = collapsed_size();
            window.set_resizable(false);
            window.set_movable(false);
            window.set_size_limits(size, size);
            window.set_size(size);
            self.snap_deadline = Some(Instant::now() + self.settings.settle_delay);
            tracing::info!("Collapsed, snapping in {:?}", self.settings.settle_delay);
        }

        let position = window.position();
        self.store.save_position(position);
        self.emit(HostEvent::ExpandedChanged(expanded));
        expanded
    }

    /// Locks the collapsed ball after a drag. Returns `false` while expanded.
    pub fn finalize_drag(&mut self) -> bool {
        self.drag_epoch += 1;
        if self.expanded {
            return false;
        }
        let Some(window) = self.window.get_mut() else {
            return false;
        };
        window.set_size(collapsed_size());
        window.set_resizable(false);
        window.set_movable(false);
        true
    }

    /// Moves the collapsed ball to the nearest anchor.
    ///
    /// Returns `None` while expanded or without a window.
    pub fn snap_to_edge(&mut self) -> Option<Snap> {
        if self.expanded {
            return None;
        }
        let area = self.screen.work_area();
        let padding = self.settings.snap_padding;
        let window = self.window.get_mut()?;

        let snap = snap::nearest(window.position(), window.size(), area, padding);
        window.set_position(snap.position);
        self.store.save_position(snap.position);
        tracing::debug!(
            "Snapped to {} at ({}, {})",
            snap.target,
            snap.position.x,
            snap.position.y
        );
        Some(snap)
    }

    /// Current drag session token and window position. Does not change any
    /// state.
    pub fn start_drag(&self) -> DragStart {
        DragStart {
            session: DragSessionId(self.drag_epoch),
            position: self.window_position(),
        }
    }

    /// Records a native move and corrects it while expanded.
    pub fn window_moved(&mut self, position: Position) -> Position {
        let area = self.screen.work_area();
        let expanded = self.expanded;
        let Some(window) = self.window.get_mut() else {
            return position;
        };
        window.record_moved(position);

        let mut applied = position;
        if expanded {
            if let Some(corrected) = clamp_moved(position, window.size(), area) {
                tracing::debug!(
                    "Correcting native move ({}, {}) to ({}, {})",
                    position.x,
                    position.y,
                    corrected.x,
                    corrected.y
                );
                window.set_position(corrected);
                applied = corrected;
            }
        }
        self.store.save_position(applied);
        applied
    }

    /// Records a native resize of the expanded panel.
    ///
    /// The collapsed ball is locked, so reports arriving while collapsed are
    /// ignored. Returns the size the host now assumes.
    pub fn window_resized(&mut self, size: Size) -> Option<Size> {
        let expanded = self.expanded;
        let window = self.window.get_mut()?;
        if !expanded {
            tracing::debug!("Ignoring resize of the collapsed ball to {:?}", size);
            return Some(window.size());
        }
        let (min, max) = expanded_limits();
        let size = size.limited(min, max);
        window.record_resized(size);
        tracing::debug!("Panel resized to {}x{}", size.width, size.height);
        Some(size)
    }

    /// Runs the snap scheduled by a collapse if it is still relevant.
    ///
    /// Returns `None` when the widget was expanded again in the meantime.
    pub fn fire_deferred_snap(&mut self) -> Option<Snap> {
        self.snap_deadline = None;
        if self.expanded {
            tracing::debug!("Deferred snap skipped, widget expanded meanwhile");
            return None;
        }
        self.snap_to_edge()
    }

    // ========================================================================
    // Theme and Visibility
    // ========================================================================

    pub fn theme(&self) -> Theme {
        self.store.theme()
    }

    /// Persists and broadcasts a theme.
    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        if let Err(e) = self.store.save_theme(theme) {
            tracing::warn!("Failed to save theme: {}", e);
        }
        self.emit(HostEvent::ThemeChanged(theme));
        theme
    }

    /// Shows or hides the window; returns the resulting visibility.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let Some(window) = self.window.get_mut() else {
            return false;
        };
        if window.is_visible() != visible {
            window.set_visible(visible);
            self.emit(HostEvent::VisibilityChanged(visible));
        }
        visible
    }

    pub fn is_visible(&self) -> bool {
        self.window.get().is_some_and(|window| window.is_visible())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Applies one command and produces its reply.
    pub fn handle(&mut self, command: Command) -> Reply {
        tracing::trace!("Host command: {}", command.name());
        match command {
            Command::GetWindowPosition => Reply::Position(self.window_position()),
            Command::SetWindowPosition { x, y, session } => {
                self.set_position(x, y, session);
                Reply::Ack
            }
            Command::ToggleExpand(expanded) => Reply::Expanded(self.toggle_expand(expanded)),
            Command::ToggleExpanded => Reply::Expanded(self.toggle_expand(!self.expanded)),
            Command::FinalizeDrag => Reply::Finalized(self.finalize_drag()),
            Command::SnapToEdge => Reply::Snapped(self.snap_to_edge()),
            Command::StartDrag => Reply::DragStarted(self.start_drag()),
            Command::WindowMoved(position) => Reply::Position(self.window_moved(position)),
            Command::WindowResized(size) => {
                self.window_resized(size);
                Reply::Ack
            }
            Command::UpdateSettings(settings) => {
                self.set_settings(settings);
                Reply::Ack
            }
            Command::GetTheme => Reply::Theme(self.theme()),
            Command::SetTheme(theme) => Reply::Theme(self.set_theme(theme)),
            Command::Show => Reply::Visible(self.set_visible(true)),
            Command::Hide => Reply::Visible(self.set_visible(false)),
            Command::ToggleVisibility => {
                let visible = !self.is_visible();
                Reply::Visible(self.set_visible(visible))
            }
            Command::Quit => {
                tracing::info!("Quit requested");
                self.quit = true;
                self.emit(HostEvent::Quit);
                Reply::Ack
            }
        }
    }

    /// Handles one envelope, answering calls.
    pub fn dispatch(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::Notify(command) => {
                self.handle(command);
            }
            Envelope::Call(command, reply_tx) => {
                let name = command.name();
                let reply = self.handle(command);
                if reply_tx.send(reply).is_err() {
                    tracing::debug!("Caller of {} went away before the reply", name);
                }
            }
        }
    }

    /// Runs the host event loop until every client is gone or quit is
    /// requested.
    ///
    /// The deferred snap runs on this loop's own timer and therefore fires
    /// even when no further commands arrive.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Envelope>) -> Self {
        tracing::info!("Host controller running");
        while !self.quit {
            let deadline = self.snap_deadline;
            tokio::select! {
                envelope = rx.next() => match envelope {
                    Some(envelope) => self.dispatch(envelope),
                    None => break,
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_deferred_snap();
                }
            }
        }
        tracing::info!("Host controller stopped");
        self
    }

    fn emit(&self, event: HostEvent) {
        if let Some(events) = &self.events {
            if events.unbounded_send(event).is_err() {
                tracing::debug!("Host event dropped, UI side is gone");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
