// SPDX-License-Identifier: GPL-3.0-only

//! System tray applet for Juno.
//!
//! The applet is a separate process living in the COSMIC panel. It has no
//! widget state of its own: every menu entry is a D-Bus call to the running
//! widget, and the menu labels follow the replies and the widget's
//! `ExpandedChanged`/`VisibilityChanged` signals.
//!
//! - Left-click: open the popup menu
//! - Menu: Show / Hide, Toggle expand, Quit
//!
//! # Running the Applet
//!
//! ```bash
//! cargo run --bin juno-applet
//! ```

use crate::dbus::{DbusClient, DbusResult, WidgetSignal};
use crate::fl;
use cosmic::app::{Core, Task};
use cosmic::iced::window::Id;
use cosmic::iced::{Rectangle, Subscription};
use cosmic::surface::action::{app_popup, destroy_popup};
use cosmic::widget::{self, divider, list_column};
use cosmic::Element;
use futures::stream::{self, BoxStream};
use futures::{future, StreamExt};

/// The applet Application ID (distinct from the main application).
pub const APPLET_ID: &str = "io.github.juno.Juno.Applet";

/// Panel icon of the applet.
pub const APPLET_ICON: &str = "accessories-text-editor-symbolic";

/// Connection attempts before a menu action gives up.
const CONNECT_RETRIES: u32 = 3;

/// Delay before the first connection retry, in milliseconds.
const CONNECT_RETRY_DELAY_MS: u64 = 100;

/// The applet model stores state for the system tray applet.
#[derive(Default)]
pub struct AppletModel {
    /// Application core state managed by the COSMIC runtime.
    core: Core,
    /// Whether the popup menu is currently open.
    popup: Option<Id>,
    /// Last visibility reported by the widget.
    widget_visible: bool,
    /// Last expanded state reported by the widget.
    widget_expanded: bool,
    /// Whether the last D-Bus call reached the widget.
    widget_reachable: bool,
}

/// Messages emitted by the applet and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// Show the widget.
    Show,
    /// Hide the widget.
    Hide,
    /// Expand or collapse the widget.
    ToggleExpand,
    /// Quit the widget.
    Quit,
    /// Visibility reported after Show/Hide.
    Visibility(Result<bool, String>),
    /// Expanded state reported after ToggleExpand.
    Expanded(Result<bool, String>),
    /// The widget acknowledged Quit.
    QuitSent(Result<(), String>),
    /// The widget announced a state change.
    Signal(WidgetSignal),
    /// Popup menu closed.
    PopupClosed(Id),
    /// Handle surface actions (for popup management).
    Surface(cosmic::surface::Action),
}

/// Connects to the widget and runs one call.
async fn call<T, F, Fut>(f: F) -> Result<T, String>
where
    F: FnOnce(DbusClient) -> Fut,
    Fut: std::future::Future<Output = DbusResult<T>>,
{
    let client = DbusClient::connect_with_retries(CONNECT_RETRIES, CONNECT_RETRY_DELAY_MS)
        .await
        .map_err(|e| e.to_string())?;
    f(client).await.map_err(|e| e.to_string())
}

/// Signals of the running widget, mapped to applet messages.
///
/// Ends quietly when the session bus is unreachable.
fn widget_signals() -> BoxStream<'static, Message> {
    stream::once(async {
        let client =
            DbusClient::connect_with_retries(CONNECT_RETRIES, CONNECT_RETRY_DELAY_MS).await?;
        client.signals().await
    })
    .filter_map(|signals| {
        future::ready(
            signals
                .map_err(|e| tracing::warn!("Widget signals unavailable: {}", e))
                .ok(),
        )
    })
    .flatten()
    .map(Message::Signal)
    .boxed()
}

impl AppletModel {
    /// Close the popup, if open, before running `task`.
    fn close_popup_then(&mut self, task: Task<Message>) -> Task<Message> {
        match self.popup.take() {
            Some(popup_id) => Task::batch([
                cosmic::task::message(cosmic::Action::<Message>::Cosmic(
                    cosmic::app::Action::Surface(destroy_popup(popup_id)),
                )),
                task,
            ]),
            None => task,
        }
    }

    fn record_reachable<T>(&mut self, result: &Result<T, String>) {
        self.widget_reachable = result.is_ok();
        if let Err(e) = result {
            tracing::warn!("Juno widget unreachable: {}", e);
        }
    }
}

impl cosmic::Application for AppletModel {
    /// The async executor for running application tasks.
    type Executor = cosmic::SingleThreadExecutor;

    /// Data that the application receives at initialization.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN format.
    const APP_ID: &'static str = APPLET_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, _flags: Self::Flags) -> (Self, Task<Self::Message>) {
        let applet = AppletModel {
            core,
            widget_visible: true,
            widget_reachable: true,
            ..Default::default()
        };
        (applet, Task::none())
    }

    /// Follow the widget's state signals.
    fn subscription(&self) -> Subscription<Message> {
        Subscription::run(widget_signals)
    }

    /// Handle popup close requests.
    fn on_close_requested(&self, id: Id) -> Option<Message> {
        Some(Message::PopupClosed(id))
    }

    /// Handle messages emitted by the applet.
    fn update(&mut self, message: Message) -> Task<Self::Message> {
        match message {
            Message::Show => {
                let task = Task::perform(
                    call(|client| async move { client.show().await }),
                    |visible| cosmic::Action::App(Message::Visibility(visible)),
                );
                return self.close_popup_then(task);
            }
            Message::Hide => {
                let task = Task::perform(
                    call(|client| async move { client.hide().await }),
                    |visible| cosmic::Action::App(Message::Visibility(visible)),
                );
                return self.close_popup_then(task);
            }
            Message::ToggleExpand => {
                let task = Task::perform(
                    call(|client| async move { client.toggle_expand().await }),
                    |expanded| cosmic::Action::App(Message::Expanded(expanded)),
                );
                return self.close_popup_then(task);
            }
            Message::Quit => {
                let task = Task::perform(
                    call(|client| async move { client.quit().await }),
                    |done| cosmic::Action::App(Message::QuitSent(done)),
                );
                return self.close_popup_then(task);
            }
            Message::Visibility(result) => {
                self.record_reachable(&result);
                if let Ok(visible) = result {
                    self.widget_visible = visible;
                }
            }
            Message::Expanded(result) => {
                self.record_reachable(&result);
                if let Ok(expanded) = result {
                    self.widget_expanded = expanded;
                    tracing::debug!("Widget expanded: {}", expanded);
                }
            }
            Message::QuitSent(result) => {
                self.record_reachable(&result);
                if result.is_ok() {
                    tracing::info!("Juno widget asked to quit");
                }
            }
            Message::Signal(signal) => {
                self.widget_reachable = true;
                match signal {
                    WidgetSignal::Expanded(expanded) => self.widget_expanded = expanded,
                    WidgetSignal::Visibility(visible) => self.widget_visible = visible,
                }
            }
            Message::PopupClosed(id) => {
                if self.popup.as_ref() == Some(&id) {
                    self.popup = None;
                }
            }
            Message::Surface(action) => {
                return cosmic::task::message(cosmic::Action::<Message>::Cosmic(
                    cosmic::app::Action::Surface(action),
                ));
            }
        }
        Task::none()
    }

    /// Render the applet icon button.
    fn view(&self) -> Element<'_, Message> {
        let has_popup = self.popup.is_some();
        let popup_id = self.popup;
        let main_id = self.core.main_window_id();

        let btn = self
            .core
            .applet
            .icon_button(APPLET_ICON)
            .on_press_with_rectangle(move |offset, bounds| match (popup_id, main_id) {
                // Close popup if already open
                (Some(id), _) => Message::Surface(destroy_popup(id)),
                (None, Some(main_id)) => Message::Surface(app_popup::<AppletModel>(
                    move |state: &mut AppletModel| {
                        let new_id = Id::unique();
                        state.popup = Some(new_id);
                        let mut popup_settings = state
                            .core
                            .applet
                            .get_popup_settings(main_id, new_id, None, None, None);

                        popup_settings.positioner.anchor_rect = Rectangle {
                            x: (bounds.x - offset.x) as i32,
                            y: (bounds.y - offset.y) as i32,
                            width: bounds.width as i32,
                            height: bounds.height as i32,
                        };

                        popup_settings
                    },
                    Some(Box::new(|state: &AppletModel| {
                        Element::from(state.core.applet.popup_container(state.menu()))
                            .map(cosmic::Action::App)
                    })),
                )),
                // No panel surface to anchor a popup to
                (None, None) => Message::ToggleExpand,
            });

        Element::from(self.core.applet.applet_tooltip::<Message>(
            btn,
            fl!("toggle-widget"),
            has_popup,
            |a| Message::Surface(a),
            None,
        ))
    }

    /// Set the applet style (transparent background).
    fn style(&self) -> Option<cosmic::iced_runtime::Appearance> {
        Some(cosmic::applet::style())
    }
}

impl AppletModel {
    fn expand_label(&self) -> String {
        if self.widget_expanded {
            fl!("collapse-widget")
        } else {
            fl!("expand-widget")
        }
    }

    /// Popup menu content.
    fn menu(&self) -> Element<'_, Message> {
        let (visibility_label, visibility_message) = if self.widget_visible {
            (fl!("hide-widget"), Message::Hide)
        } else {
            (fl!("show-widget"), Message::Show)
        };

        let mut content = list_column().padding(8).spacing(0);

        if !self.widget_reachable {
            content = content.add(cosmic::applet::padded_control(widget::text::caption(
                fl!("widget-unavailable"),
            )));
        }

        content
            .add(
                cosmic::applet::menu_button(widget::text::body(visibility_label))
                    .on_press(visibility_message),
            )
            .add(
                cosmic::applet::menu_button(widget::text::body(self.expand_label()))
                    .on_press(Message::ToggleExpand),
            )
            // Separator
            .add(cosmic::applet::padded_control(divider::horizontal::default()).padding([8, 0]))
            .add(
                cosmic::applet::menu_button(widget::text::body(fl!("quit")))
                    .on_press(Message::Quit),
            )
            .into()
    }
}

// ============================================================================
// Applet Entry Point
// ============================================================================

/// Run the applet.
///
/// This function should be called from a separate binary entry point.
/// It sets up the COSMIC applet runtime and launches the AppletModel.
pub fn run() -> cosmic::iced::Result {
    // Initialize localization
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    crate::i18n::init(&requested_languages);

    cosmic::applet::run::<AppletModel>(())
}

// ============================================================================
// Tests
// ============================================================================
