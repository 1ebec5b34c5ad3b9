// SPDX-License-Identifier: GPL-3.0-only

//! D-Bus interface for controlling the Juno widget.
//!
//! This module exposes the host's command surface on the session bus so the
//! panel applet and the command-line remote can drive the widget.
//!
//! # Architecture
//!
//! The D-Bus interface consists of two parts:
//! - **Server**: The main application registers as a D-Bus service. Every
//!   method forwards to the host controller through a [`HostClient`], so
//!   D-Bus calls are ordered with the UI's own commands.
//! - **Client**: The applet and the CLI connect to the service and invoke
//!   methods on it.
//!
//! # Interface
//!
//! - Object path: `/io/github/juno/Juno`
//! - Interface name: `io.github.juno.Juno`
//! - Methods: `GetWindowPosition()`, `SetWindowPosition(x, y)`,
//!   `ToggleExpand(expanded)`, `Toggle()`, `FinalizeDrag()`, `SnapToEdge()`,
//!   `StartDrag()`, `GetTheme()`, `SetTheme(name)`, `Show()`, `Hide()`,
//!   `ToggleVisibility()`, `Quit()`
//! - Signals: `ExpandedChanged(expanded: bool)`,
//!   `VisibilityChanged(visible: bool)`

use crate::app_settings::{DBUS_INTERFACE, DBUS_PATH};
use crate::ipc::{HostClient, IpcError};
use crate::theme::{Theme, UnknownTheme};
use futures::stream::{self, BoxStream};
use futures::{future, StreamExt};
use zbus::interface;
use zbus::object_server::SignalEmitter;

/// The D-Bus interface implementation for Juno.
///
/// Registered as a D-Bus object; each method is one host command.
pub struct JunoInterface {
    host: HostClient,
}

impl JunoInterface {
    pub fn new(host: HostClient) -> Self {
        Self { host }
    }
}

fn failed(e: IpcError) -> zbus::fdo::Error {
    zbus::fdo::Error::Failed(e.to_string())
}

#[interface(name = "io.github.juno.Juno")]
impl JunoInterface {
    /// Current window position.
    async fn get_window_position(&self) -> zbus::fdo::Result<(i32, i32)> {
        let position = self.host.get_window_position().await.map_err(failed)?;
        Ok((position.x, position.y))
    }

    /// Clamp and apply a position. External callers carry no drag session.
    async fn set_window_position(&self, x: f64, y: f64) -> zbus::fdo::Result<()> {
        tracing::debug!("D-Bus: SetWindowPosition({}, {}) called", x, y);
        self.host.set_window_position(x, y, None).map_err(failed)
    }

    /// Expand or collapse the widget.
    async fn toggle_expand(&self, expanded: bool) -> zbus::fdo::Result<bool> {
        tracing::debug!("D-Bus: ToggleExpand({}) called", expanded);
        self.host.toggle_expand(expanded).await.map_err(failed)
    }

    /// Flip the expanded state.
    async fn toggle(&self) -> zbus::fdo::Result<bool> {
        tracing::debug!("D-Bus: Toggle() called");
        self.host.toggle_expanded().await.map_err(failed)
    }

    async fn finalize_drag(&self) -> zbus::fdo::Result<bool> {
        self.host.finalize_drag().await.map_err(failed)
    }

    /// Snap to the nearest anchor.
    ///
    /// Returns the new position and the anchor name, or the unchanged
    /// position and an empty name when nothing was snapped.
    async fn snap_to_edge(&self) -> zbus::fdo::Result<(i32, i32, String)> {
        tracing::debug!("D-Bus: SnapToEdge() called");
        match self.host.snap_to_edge().await.map_err(failed)? {
            Some(snap) => Ok((
                snap.position.x,
                snap.position.y,
                snap.target.as_str().to_string(),
            )),
            None => {
                let position = self.host.get_window_position().await.map_err(failed)?;
                Ok((position.x, position.y, String::new()))
            }
        }
    }

    async fn start_drag(&self) -> zbus::fdo::Result<u64> {
        let start = self.host.start_drag().await.map_err(failed)?;
        Ok(start.session.0)
    }

    async fn get_theme(&self) -> zbus::fdo::Result<String> {
        let theme = self.host.get_theme().await.map_err(failed)?;
        Ok(theme.as_str().to_string())
    }

    /// Select a theme by name.
    async fn set_theme(&self, name: String) -> zbus::fdo::Result<String> {
        tracing::debug!("D-Bus: SetTheme({}) called", name);
        let theme: Theme = name
            .parse()
            .map_err(|e: UnknownTheme| zbus::fdo::Error::InvalidArgs(e.to_string()))?;
        let theme = self.host.set_theme(theme).await.map_err(failed)?;
        Ok(theme.as_str().to_string())
    }

    /// Show the widget window.
    async fn show(&self) -> zbus::fdo::Result<bool> {
        tracing::debug!("D-Bus: Show() called");
        self.host.show().await.map_err(failed)
    }

    /// Hide the widget window.
    async fn hide(&self) -> zbus::fdo::Result<bool> {
        tracing::debug!("D-Bus: Hide() called");
        self.host.hide().await.map_err(failed)
    }

    /// Toggle the widget window visibility.
    async fn toggle_visibility(&self) -> zbus::fdo::Result<bool> {
        tracing::debug!("D-Bus: ToggleVisibility() called");
        self.host.toggle_visibility().await.map_err(failed)
    }

    /// Quit the application.
    async fn quit(&self) -> zbus::fdo::Result<()> {
        tracing::debug!("D-Bus: Quit() called");
        self.host.quit().map_err(failed)
    }

    /// Signal emitted when the widget expands or collapses.
    #[zbus(signal)]
    async fn expanded_changed(emitter: &SignalEmitter<'_>, expanded: bool) -> zbus::Result<()>;

    /// Signal emitted when visibility changes.
    #[zbus(signal)]
    async fn visibility_changed(emitter: &SignalEmitter<'_>, visible: bool) -> zbus::Result<()>;
}

/// Result type for D-Bus operations.
pub type DbusResult<T> = Result<T, DbusError>;

/// Errors that can occur during D-Bus operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DbusError {
    /// Failed to connect to the session bus.
    #[error("D-Bus connection failed: {0}")]
    ConnectionFailed(String),
    /// Failed to register the service.
    #[error("D-Bus service registration failed: {0}")]
    RegistrationFailed(String),
    /// Failed to call a method.
    #[error("D-Bus method call failed: {0}")]
    MethodCallFailed(String),
}

fn call_failed(e: zbus::Error) -> DbusError {
    DbusError::MethodCallFailed(e.to_string())
}

/// D-Bus server handle for the main application.
pub struct DbusServer {
    connection: zbus::Connection,
}

impl std::fmt::Debug for DbusServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbusServer").finish_non_exhaustive()
    }
}

impl DbusServer {
    /// Start the D-Bus server and register the Juno interface.
    ///
    /// # Arguments
    /// * `host` - Client of the host controller that serves every method.
    pub async fn start(host: HostClient) -> DbusResult<Self> {
        let interface = JunoInterface::new(host);

        let connection = zbus::connection::Builder::session()
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?
            .name(DBUS_INTERFACE)
            .map_err(|e| DbusError::RegistrationFailed(e.to_string()))?
            .serve_at(DBUS_PATH, interface)
            .map_err(|e| DbusError::RegistrationFailed(e.to_string()))?
            .build()
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        tracing::info!(
            "D-Bus service registered: {} at {}",
            DBUS_INTERFACE,
            DBUS_PATH
        );

        Ok(Self { connection })
    }

    pub fn connection(&self) -> &zbus::Connection {
        &self.connection
    }

    /// Emit an `ExpandedChanged` signal.
    pub async fn emit_expanded_changed(&self, expanded: bool) -> DbusResult<()> {
        let iface_ref = self.interface().await?;
        JunoInterface::expanded_changed(iface_ref.signal_emitter(), expanded)
            .await
            .map_err(call_failed)?;
        tracing::debug!("D-Bus: ExpandedChanged({}) signal emitted", expanded);
        Ok(())
    }

    /// Emit a `VisibilityChanged` signal.
    pub async fn emit_visibility_changed(&self, visible: bool) -> DbusResult<()> {
        let iface_ref = self.interface().await?;
        JunoInterface::visibility_changed(iface_ref.signal_emitter(), visible)
            .await
            .map_err(call_failed)?;
        tracing::debug!("D-Bus: VisibilityChanged({}) signal emitted", visible);
        Ok(())
    }

    async fn interface(&self) -> DbusResult<zbus::object_server::InterfaceRef<JunoInterface>> {
        self.connection
            .object_server()
            .interface::<_, JunoInterface>(DBUS_PATH)
            .await
            .map_err(call_failed)
    }
}

// ============================================================================
// D-Bus Client for Applet and CLI
// ============================================================================

/// D-Bus proxy for connecting to the Juno service.
#[zbus::proxy(
    interface = "io.github.juno.Juno",
    default_service = "io.github.juno.Juno",
    default_path = "/io/github/juno/Juno"
)]
trait Juno {
    async fn get_window_position(&self) -> zbus::Result<(i32, i32)>;

    #[zbus(no_reply)]
    async fn set_window_position(&self, x: f64, y: f64) -> zbus::Result<()>;

    async fn toggle_expand(&self, expanded: bool) -> zbus::Result<bool>;

    async fn toggle(&self) -> zbus::Result<bool>;

    async fn finalize_drag(&self) -> zbus::Result<bool>;

    async fn snap_to_edge(&self) -> zbus::Result<(i32, i32, String)>;

    async fn start_drag(&self) -> zbus::Result<u64>;

    async fn get_theme(&self) -> zbus::Result<String>;

    async fn set_theme(&self, name: &str) -> zbus::Result<String>;

    async fn show(&self) -> zbus::Result<bool>;

    async fn hide(&self) -> zbus::Result<bool>;

    async fn toggle_visibility(&self) -> zbus::Result<bool>;

    async fn quit(&self) -> zbus::Result<()>;

    #[zbus(signal)]
    async fn expanded_changed(&self, expanded: bool) -> zbus::Result<()>;

    #[zbus(signal)]
    async fn visibility_changed(&self, visible: bool) -> zbus::Result<()>;
}

/// D-Bus client for the applet and the command-line remote.
pub struct DbusClient {
    proxy: JunoProxy<'static>,
}

impl DbusClient {
    /// Connect to the Juno D-Bus service.
    pub async fn connect() -> DbusResult<Self> {
        let connection = zbus::Connection::session()
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        let proxy = JunoProxy::new(&connection)
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        Ok(Self { proxy })
    }

    /// Connect to the Juno D-Bus service with retries.
    ///
    /// This will attempt to connect multiple times with exponential backoff.
    ///
    /// # Arguments
    /// * `max_retries` - Maximum number of connection attempts.
    /// * `initial_delay_ms` - Initial delay between retries in milliseconds.
    pub async fn connect_with_retries(
        max_retries: u32,
        initial_delay_ms: u64,
    ) -> DbusResult<Self> {
        let mut attempts = 0;
        let mut delay = initial_delay_ms;

        loop {
            match Self::connect().await {
                Ok(client) => return Ok(client),
                Err(e) => {
                    attempts += 1;
                    if attempts >= max_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        "D-Bus connection attempt {} failed, retrying in {}ms: {}",
                        attempts,
                        delay,
                        e
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                    delay *= 2; // Exponential backoff
                }
            }
        }
    }

    /// Flip the expanded state. Returns the new state.
    pub async fn toggle_expand(&self) -> DbusResult<bool> {
        self.proxy.toggle().await.map_err(call_failed)
    }

    /// Snap now. Returns the position and the anchor name (empty if none).
    pub async fn snap_to_edge(&self) -> DbusResult<(i32, i32, String)> {
        self.proxy.snap_to_edge().await.map_err(call_failed)
    }

    pub async fn set_theme(&self, name: &str) -> DbusResult<String> {
        self.proxy.set_theme(name).await.map_err(call_failed)
    }

    pub async fn show(&self) -> DbusResult<bool> {
        self.proxy.show().await.map_err(call_failed)
    }

    pub async fn hide(&self) -> DbusResult<bool> {
        self.proxy.hide().await.map_err(call_failed)
    }

    pub async fn toggle_visibility(&self) -> DbusResult<bool> {
        self.proxy.toggle_visibility().await.map_err(call_failed)
    }

    pub async fn quit(&self) -> DbusResult<()> {
        self.proxy.quit().await.map_err(call_failed)
    }

    /// Stream of the widget's state signals.
    ///
    /// The stream keeps following the service name, so it survives a widget
    /// restart.
    pub async fn signals(&self) -> DbusResult<BoxStream<'static, WidgetSignal>> {
        let expanded = self
            .proxy
            .receive_expanded_changed()
            .await
            .map_err(call_failed)?
            .filter_map(|signal| {
                future::ready(
                    signal
                        .args()
                        .ok()
                        .map(|args| WidgetSignal::Expanded(*args.expanded())),
                )
            });
        let visibility = self
            .proxy
            .receive_visibility_changed()
            .await
            .map_err(call_failed)?
            .filter_map(|signal| {
                future::ready(
                    signal
                        .args()
                        .ok()
                        .map(|args| WidgetSignal::Visibility(*args.visible())),
                )
            });
        Ok(stream::select(expanded, visibility).boxed())
    }
}

/// State change announced by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSignal {
    Expanded(bool),
    Visibility(bool),
}

// ============================================================================
// Blocking Client API
// ============================================================================

/// Blocking D-Bus client for the command-line remote.
pub struct DbusClientBlocking {
    runtime: tokio::runtime::Runtime,
}

impl DbusClientBlocking {
    /// Create a new blocking client.
    pub fn new() -> DbusResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;
        Ok(Self { runtime })
    }

    /// Flip the expanded state (blocking).
    pub fn toggle_expand(&self) -> DbusResult<bool> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.toggle_expand().await
        })
    }

    /// Show the widget window (blocking).
    pub fn show(&self) -> DbusResult<bool> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.show().await
        })
    }

    /// Hide the widget window (blocking).
    pub fn hide(&self) -> DbusResult<bool> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.hide().await
        })
    }

    /// Toggle the widget window visibility (blocking).
    pub fn toggle_visibility(&self) -> DbusResult<bool> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.toggle_visibility().await
        })
    }

    /// Snap to the nearest anchor (blocking).
    pub fn snap_to_edge(&self) -> DbusResult<(i32, i32, String)> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.snap_to_edge().await
        })
    }

    /// Select a theme by name (blocking).
    pub fn set_theme(&self, name: &str) -> DbusResult<String> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.set_theme(name).await
        })
    }

    /// Quit the application (blocking).
    pub fn quit(&self) -> DbusResult<()> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.quit().await
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
