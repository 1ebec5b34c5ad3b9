// SPDX-License-Identifier: GPL-3.0-only

//! Command channel between the UI side and the host controller.
//!
//! Every geometry-affecting action travels as a [`Command`] over one ordered
//! channel. Two envelope kinds share that channel:
//!
//! - [`Envelope::Notify`]: fire-and-forget. The sender never waits, which is
//!   what the drag loop uses for position updates.
//! - [`Envelope::Call`]: request/response. Exactly one [`Reply`] is sent back
//!   on the attached responder.
//!
//! Because both kinds share one FIFO, a call issued after a burst of
//! notifications is answered only after all of them were applied.
//!
//! The host talks back through [`HostEvent`]s on a separate channel.

use futures::channel::{mpsc, oneshot};

use crate::host::HostSettings;
use crate::theme::Theme;
use crate::window::{Position, Size, Snap, WindowOp};

/// Token identifying the drag session a position update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DragSessionId(pub u64);

/// Answer to [`Command::StartDrag`]: the baseline of a new drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragStart {
    /// Token to attach to the drag's position updates.
    pub session: DragSessionId,
    /// Window position at the moment the drag started.
    pub position: Position,
}

/// Commands understood by the host controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Current window position.
    GetWindowPosition,
    /// Clamp and apply a drag position.
    SetWindowPosition {
        x: f64,
        y: f64,
        session: Option<DragSessionId>,
    },
    /// Expand (`true`) or collapse (`false`) the widget.
    ToggleExpand(bool),
    /// Flip the expanded state (tray menu, hotkey).
    ToggleExpanded,
    /// Re-assert the collapsed size after a drag.
    FinalizeDrag,
    /// Snap the collapsed ball to the nearest anchor now.
    SnapToEdge,
    /// Hand out the current session token together with the window position.
    StartDrag,
    /// The window was moved natively (compositor drag).
    WindowMoved(Position),
    /// The window was resized natively (resize border).
    WindowResized(Size),
    /// Replace the host tunables after a config change.
    UpdateSettings(HostSettings),
    /// Persisted theme.
    GetTheme,
    /// Persist and broadcast a theme.
    SetTheme(Theme),
    /// Show the window.
    Show,
    /// Hide the window.
    Hide,
    /// Flip window visibility.
    ToggleVisibility,
    /// Shut the widget down.
    Quit,
}

impl Command {
    /// Name used in logs and on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetWindowPosition => "get-window-position",
            Command::SetWindowPosition { .. } => "set-window-position",
            Command::ToggleExpand(_) => "toggle-expand",
            Command::ToggleExpanded => "toggle-expanded",
            Command::FinalizeDrag => "finalize-drag",
            Command::SnapToEdge => "snap-to-edge",
            Command::StartDrag => "start-drag",
            Command::WindowMoved(_) => "window-moved",
            Command::WindowResized(_) => "window-resized",
            Command::UpdateSettings(_) => "update-settings",
            Command::GetTheme => "get-theme",
            Command::SetTheme(_) => "set-theme",
            Command::Show => "show",
            Command::Hide => "hide",
            Command::ToggleVisibility => "toggle-visibility",
            Command::Quit => "quit",
        }
    }
}

/// Replies to [`Envelope::Call`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Position(Position),
    Expanded(bool),
    Finalized(bool),
    Snapped(Option<Snap>),
    DragStarted(DragStart),
    Theme(Theme),
    Visible(bool),
    Ack,
}

/// A command plus its delivery semantics.
#[derive(Debug)]
pub enum Envelope {
    Notify(Command),
    Call(Command, oneshot::Sender<Reply>),
}

/// Events pushed from the host to the UI side.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Apply a geometry change to the real window.
    Window(WindowOp),
    /// The expanded state changed.
    ExpandedChanged(bool),
    /// The theme changed.
    ThemeChanged(Theme),
    /// The window was shown or hidden.
    VisibilityChanged(bool),
    /// The host is shutting down.
    Quit,
}

/// Errors seen by callers of the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpcError {
    /// The host loop has stopped.
    #[error("host controller is not running")]
    HostGone,
    /// The host answered with a reply of the wrong kind.
    #[error("unexpected reply to {command}: {reply}")]
    UnexpectedReply { command: &'static str, reply: String },
}

/// Creates a connected client and the receiver the host loop consumes.
pub fn channel() -> (HostClient, mpsc::UnboundedReceiver<Envelope>) {
    let (tx, rx) = mpsc::unbounded();
    (HostClient { tx }, rx)
}

/// Cheap, cloneable handle for sending commands to the host.
#[derive(Debug, Clone)]
pub struct HostClient {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl HostClient {
    /// Sends a command without waiting for it to be applied.
    pub fn notify(&self, command: Command) -> Result<(), IpcError> {
        self.tx
            .unbounded_send(Envelope::Notify(command))
            .map_err(|_| IpcError::HostGone)
    }

    /// Sends a command and waits for its reply.
    pub async fn call(&self, command: Command) -> Result<Reply, IpcError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .unbounded_send(Envelope::Call(command, reply_tx))
            .map_err(|_| IpcError::HostGone)?;
        reply_rx.await.map_err(|_| IpcError::HostGone)
    }

    /// Returns `true` once the host loop has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    // ========================================================================
    // Typed Commands
    // ========================================================================

    pub async fn get_window_position(&self) -> Result<Position, IpcError> {
        match self.call(Command::GetWindowPosition).await? {
            Reply::Position(position) => Ok(position),
            other => Err(unexpected("get-window-position", other)),
        }
    }

    /// Fire-and-forget position update.
    pub fn set_window_position(
        &self,
        x: f64,
        y: f64,
        session: Option<DragSessionId>,
    ) -> Result<(), IpcError> {
        self.notify(Command::SetWindowPosition { x, y, session })
    }

    pub async fn toggle_expand(&self, expanded: bool) -> Result<bool, IpcError> {
        match self.call(Command::ToggleExpand(expanded)).await? {
            Reply::Expanded(expanded) => Ok(expanded),
            other => Err(unexpected("toggle-expand", other)),
        }
    }

    pub async fn toggle_expanded(&self) -> Result<bool, IpcError> {
        match self.call(Command::ToggleExpanded).await? {
            Reply::Expanded(expanded) => Ok(expanded),
            other => Err(unexpected("toggle-expanded", other)),
        }
    }

    pub async fn finalize_drag(&self) -> Result<bool, IpcError> {
        match self.call(Command::FinalizeDrag).await? {
            Reply::Finalized(done) => Ok(done),
            other => Err(unexpected("finalize-drag", other)),
        }
    }

    pub async fn snap_to_edge(&self) -> Result<Option<Snap>, IpcError> {
        match self.call(Command::SnapToEdge).await? {
            Reply::Snapped(snap) => Ok(snap),
            other => Err(unexpected("snap-to-edge", other)),
        }
    }

    /// Session token and window position, read in one host turn.
    pub async fn start_drag(&self) -> Result<DragStart, IpcError> {
        match self.call(Command::StartDrag).await? {
            Reply::DragStarted(start) => Ok(start),
            other => Err(unexpected("start-drag", other)),
        }
    }

    /// Reports a native move; fire-and-forget.
    pub fn window_moved(&self, position: Position) -> Result<(), IpcError> {
        self.notify(Command::WindowMoved(position))
    }

    /// Reports a native resize; fire-and-forget.
    pub fn window_resized(&self, size: Size) -> Result<(), IpcError> {
        self.notify(Command::WindowResized(size))
    }

    pub fn update_settings(&self, settings: HostSettings) -> Result<(), IpcError> {
        self.notify(Command::UpdateSettings(settings))
    }

    pub async fn get_theme(&self) -> Result<Theme, IpcError> {
        match self.call(Command::GetTheme).await? {
            Reply::Theme(theme) => Ok(theme),
            other => Err(unexpected("get-theme", other)),
        }
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<Theme, IpcError> {
        match self.call(Command::SetTheme(theme)).await? {
            Reply::Theme(theme) => Ok(theme),
            other => Err(unexpected("set-theme", other)),
        }
    }

    pub async fn show(&self) -> Result<bool, IpcError> {
        self.visibility(Command::Show).await
    }

    pub async fn hide(&self) -> Result<bool, IpcError> {
        self.visibility(Command::Hide).await
    }

    pub async fn toggle_visibility(&self) -> Result<bool, IpcError> {
        self.visibility(Command::ToggleVisibility).await
    }

    pub fn quit(&self) -> Result<(), IpcError> {
        self.notify(Command::Quit)
    }

    async fn visibility(&self, command: Command) -> Result<bool, IpcError> {
        let name = command.name();
        match self.call(command).await? {
            Reply::Visible(visible) => Ok(visible),
            other => Err(unexpected(name, other)),
        }
    }
}

fn unexpected(command: &'static str, reply: Reply) -> IpcError {
    IpcError::UnexpectedReply {
        command,
        reply: format!("{reply:?}"),
    }
}
