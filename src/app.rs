// SPDX-License-Identifier: GPL-3.0-only

//! The widget window: a draggable ball that expands into a panel.
//!
//! The UI never decides geometry. Pointer input goes through the
//! [`DragTracker`] to the host controller, and the host answers with
//! [`HostEvent`]s that this model applies to the real window.

use crate::app_settings::{self, BALL_DIAMETER};
use crate::config::Config;
use crate::dbus::DbusServer;
use crate::fl;
use crate::host::HostSettings;
use crate::input::{DragBaseline, DragTracker, GrabAnchor};
use crate::ipc::{HostClient, HostEvent, IpcError};
use crate::theme::Theme;
use crate::window::{Position, Size, WindowOp, WorkArea};
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::gradient::Linear;
use cosmic::iced::{
    alignment, event, keyboard, mouse, window, Background, Border, Color, Event, Length, Point,
    Radians, Shadow, Subscription, Vector,
};
use cosmic::prelude::*;
use cosmic::widget::{self, button, container, icon, mouse_area, row, Space};
use futures::channel::mpsc;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

/// Shared D-Bus server handle wrapped in Arc<Mutex> for thread-safe access.
type SharedDbusServer = Arc<Mutex<Option<DbusServer>>>;

/// Receiver of host events, shared so every poll can borrow it again.
pub type SharedHostEvents = Arc<Mutex<mpsc::UnboundedReceiver<HostEvent>>>;

/// Corner radius of the expanded panel.
const PANEL_RADIUS: f32 = 16.0;

/// Everything the UI needs to reach the host controller.
#[derive(Clone)]
pub struct Flags {
    pub host: HostClient,
    pub events: SharedHostEvents,
    /// Publishes the monitor size to the host's screen source.
    pub screen: Arc<watch::Sender<WorkArea>>,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    core: cosmic::Core,
    /// Configuration data that persists between application runs.
    config: Config,
    host: HostClient,
    events: SharedHostEvents,
    screen: Arc<watch::Sender<WorkArea>>,
    /// D-Bus server handle (kept alive to maintain the service).
    dbus_server: SharedDbusServer,
    tracker: DragTracker,
    anchor: GrabAnchor,
    /// Last cursor position relative to the window.
    cursor: Point,
    /// Mirror of the host's expanded flag.
    expanded: bool,
    /// Hide/Quit menu shown in place of the ball.
    menu_open: bool,
    theme: Theme,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// Configuration has been updated.
    UpdateConfig(Config),
    /// D-Bus server started successfully.
    DbusServerStarted,
    /// D-Bus server failed to start.
    DbusServerFailed(String),
    /// Next event from the host controller; `None` once it stopped.
    Host(Option<HostEvent>),
    /// The monitor size was queried.
    MonitorSize(Option<cosmic::iced::Size>),
    /// Cursor moved inside the window.
    CursorMoved(Point),
    /// Left button pressed on the ball.
    BallPressed,
    /// Right button pressed on the ball: open or close its menu.
    ToggleMenu,
    /// Left button released anywhere.
    PointerReleased,
    /// The drag baseline for the current press arrived.
    DragArmed(Result<DragBaseline, IpcError>),
    /// The press ended; carries the new expanded state if it was a click.
    Released(Result<Option<bool>, IpcError>),
    /// Left button pressed on the panel header.
    HeaderPressed,
    /// The compositor moved the window.
    WindowMoved(Point),
    /// The window was resized (resize border of the panel).
    WindowResized(cosmic::iced::Size),
    /// Collapse the panel into the ball.
    Collapse,
    /// Switch to the next theme.
    CycleTheme,
    /// Hide the widget.
    Hide,
    /// Quit the widget.
    Quit,
    /// Theme reported by the host.
    ThemeLoaded(Result<Theme, IpcError>),
    /// Result of a command whose reply carries nothing the UI needs.
    HostDone(Result<(), IpcError>),
}

/// Create a COSMIC application from the app model
impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = Flags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_settings::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        mut core: cosmic::Core,
        flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Load configuration
        let config = cosmic_config::Config::new(Self::APP_ID, Config::VERSION)
            .map(|context| match Config::get_entry(&context) {
                Ok(config) => config,
                Err((_errors, config)) => config,
            })
            .unwrap_or_default();

        // Chromeless: the ball and the panel draw everything themselves
        core.window.show_headerbar = false;

        let tracker = DragTracker::with_grace(
            flags.host.clone(),
            Duration::from_millis(config.click_grace_ms),
        );

        let dbus_server: SharedDbusServer = Arc::new(Mutex::new(None));
        let dbus_server_clone = Arc::clone(&dbus_server);
        let dbus_host = flags.host.clone();
        let theme_host = flags.host.clone();

        let app = AppModel {
            core,
            config,
            host: flags.host,
            events: flags.events,
            screen: flags.screen,
            dbus_server,
            tracker,
            anchor: GrabAnchor::new(),
            cursor: Point::ORIGIN,
            expanded: false,
            menu_open: false,
            theme: Theme::default(),
        };

        // Start D-Bus server asynchronously
        let start_dbus_task = Task::perform(
            async move {
                match DbusServer::start(dbus_host).await {
                    Ok(server) => {
                        let mut guard = dbus_server_clone.lock().await;
                        *guard = Some(server);
                        Message::DbusServerStarted
                    }
                    Err(e) => Message::DbusServerFailed(e.to_string()),
                }
            },
            cosmic::Action::App,
        );

        let theme_task = Task::perform(
            async move { theme_host.get_theme().await },
            |theme| cosmic::Action::App(Message::ThemeLoaded(theme)),
        );

        let mut tasks = vec![start_dbus_task, theme_task, app.poll_host_events()];
        if let Some(id) = app.core.main_window_id() {
            tasks.push(window::set_level(id, window::Level::AlwaysOnTop));
            tasks.push(app.query_monitor_size());
        }

        (app, Task::batch(tasks))
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        if self.expanded {
            self.view_panel()
        } else {
            self.view_ball()
        }
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let mut subscriptions = vec![];

        // Watch for configuration changes
        let config_subscription = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));
        subscriptions.push(config_subscription);

        subscriptions.push(event::listen_with(|event, _, _id| match event {
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                Some(Message::CursorMoved(position))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(Message::PointerReleased)
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            }) => Some(Message::Collapse),
            Event::Window(window::Event::Moved(position)) => Some(Message::WindowMoved(position)),
            Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            _ => None,
        }));

        Subscription::batch(subscriptions)
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Message::UpdateConfig(config) => {
                self.tracker
                    .set_grace(Duration::from_millis(config.click_grace_ms));
                let settings = HostSettings::from(&config);
                if settings != HostSettings::from(&self.config) {
                    if let Err(e) = self.host.update_settings(settings) {
                        tracing::warn!("Failed to update host settings: {}", e);
                    }
                }
                self.config = config;
            }
            Message::DbusServerStarted => {
                tracing::info!("D-Bus server started successfully");
            }
            Message::DbusServerFailed(error) => {
                // The widget still works, only remote control is unavailable
                tracing::error!("Failed to start D-Bus server: {}", error);
            }
            Message::Host(Some(event)) => {
                let applied = self.apply_host_event(event);
                return Task::batch([applied, self.poll_host_events()]);
            }
            Message::Host(None) => {
                tracing::warn!("Host controller stopped, exiting");
                return cosmic::iced::exit();
            }
            Message::MonitorSize(Some(size)) => {
                let area = WorkArea::new(size.width as u32, size.height as u32);
                tracing::debug!("Monitor size: {}x{}", area.width, area.height);
                self.screen.send_replace(area);
            }
            Message::MonitorSize(None) => {
                tracing::debug!("Monitor size unavailable, keeping the last work area");
            }
            Message::CursorMoved(position) => {
                self.cursor = position;
                if let Some((dx, dy)) = self.anchor.motion(position.x, position.y) {
                    self.tracker.pointer_move(dx, dy);
                }
            }
            Message::BallPressed => {
                if self.expanded || self.menu_open {
                    return Task::none();
                }
                self.anchor.press(self.cursor.x, self.cursor.y);
                return Task::perform(self.tracker.pointer_down(), |baseline| {
                    cosmic::Action::App(Message::DragArmed(baseline))
                });
            }
            Message::ToggleMenu => {
                if !self.expanded && !self.tracker.is_pressed() {
                    self.menu_open = !self.menu_open;
                }
            }
            Message::DragArmed(Ok(baseline)) => {
                self.tracker.arm(baseline);
            }
            Message::DragArmed(Err(e)) => {
                tracing::warn!("Failed to start drag: {}", e);
                self.anchor.release();
            }
            Message::PointerReleased => {
                if !self.tracker.is_pressed() {
                    return Task::none();
                }
                self.anchor.release();
                let finalize = self.tracker.pointer_up();
                let expand = !self.tracker.should_block_click() && !self.expanded;
                let host = self.host.clone();
                return Task::perform(
                    async move {
                        finalize.await?;
                        if expand {
                            host.toggle_expand(true).await.map(Some)
                        } else {
                            Ok(None)
                        }
                    },
                    |released| cosmic::Action::App(Message::Released(released)),
                );
            }
            Message::Released(Ok(expanded)) => {
                if let Some(expanded) = expanded {
                    tracing::debug!("Click toggled expanded to {}", expanded);
                }
            }
            Message::Released(Err(e)) => {
                tracing::warn!("Failed to finish drag: {}", e);
            }
            Message::HeaderPressed => {
                if let Some(id) = self.core.main_window_id() {
                    return window::drag(id);
                }
            }
            Message::WindowResized(size) => {
                // Collapsed sizes all originate from the host already
                if self.expanded {
                    let size = Size::new(size.width.round() as u32, size.height.round() as u32);
                    if let Err(e) = self.host.window_resized(size) {
                        tracing::warn!("Failed to report window resize: {}", e);
                    }
                }
            }
            Message::WindowMoved(point) => {
                let position = Position::new(point.x.round() as i32, point.y.round() as i32);
                self.anchor.set_origin(position);
                // Collapsed moves all originate from the host already
                if self.expanded {
                    if let Err(e) = self.host.window_moved(position) {
                        tracing::warn!("Failed to report window move: {}", e);
                    }
                }
            }
            Message::Collapse => {
                if self.menu_open {
                    self.menu_open = false;
                    return Task::none();
                }
                if !self.expanded {
                    return Task::none();
                }
                let host = self.host.clone();
                return Task::perform(
                    async move { host.toggle_expand(false).await.map(|_| ()) },
                    |done| cosmic::Action::App(Message::HostDone(done)),
                );
            }
            Message::CycleTheme => {
                let host = self.host.clone();
                let next = self.theme.next();
                return Task::perform(async move { host.set_theme(next).await }, |theme| {
                    cosmic::Action::App(Message::ThemeLoaded(theme))
                });
            }
            Message::Hide => {
                self.menu_open = false;
                let host = self.host.clone();
                return Task::perform(async move { host.hide().await.map(|_| ()) }, |done| {
                    cosmic::Action::App(Message::HostDone(done))
                });
            }
            Message::Quit => {
                self.menu_open = false;
                if let Err(e) = self.host.quit() {
                    tracing::warn!("Host unavailable on quit: {}", e);
                    return cosmic::iced::exit();
                }
            }
            Message::ThemeLoaded(Ok(theme)) => {
                self.theme = theme;
            }
            Message::ThemeLoaded(Err(e)) | Message::HostDone(Err(e)) => {
                tracing::warn!("Host command failed: {}", e);
            }
            Message::HostDone(Ok(())) => {}
        }

        Task::none()
    }
}

impl AppModel {
    /// The collapsed ball.
    fn view_ball(&self) -> Element<'_, Message> {
        let (start, end) = self.theme.ball_colors();
        let gradient = Linear::new(Radians(std::f32::consts::FRAC_PI_4 * 3.0))
            .add_stop(0.0, start)
            .add_stop(1.0, end);

        let ball = container(Space::new(
            Length::Fixed(BALL_DIAMETER),
            Length::Fixed(BALL_DIAMETER),
        ))
        .class(cosmic::style::Container::custom(move |_theme| {
            container::Style {
                background: Some(Background::Gradient(gradient.into())),
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: (BALL_DIAMETER / 2.0).into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                    offset: Vector::new(0.0, 4.0),
                    blur_radius: 12.0,
                },
                ..Default::default()
            }
        }));

        if self.menu_open {
            return self.view_ball_menu();
        }

        let interaction = if self.tracker.is_dragging() {
            mouse::Interaction::Grabbing
        } else {
            mouse::Interaction::Pointer
        };

        container(
            mouse_area(ball)
                .on_press(Message::BallPressed)
                .on_right_press(Message::ToggleMenu)
                .interaction(interaction),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
    }

    /// Hide and Quit, drawn over the collapsed ball after a right click.
    fn view_ball_menu(&self) -> Element<'_, Message> {
        let background = self.theme.panel_background();
        let buttons = widget::column::column()
            .push(
                button::icon(icon::from_name("view-conceal-symbolic"))
                    .tooltip(fl!("hide"))
                    .on_press(Message::Hide),
            )
            .push(
                button::icon(icon::from_name("window-close-symbolic"))
                    .tooltip(fl!("quit"))
                    .on_press(Message::Quit),
            )
            .align_x(alignment::Horizontal::Center);

        let menu = container(buttons)
            .width(Length::Fixed(BALL_DIAMETER))
            .height(Length::Fixed(BALL_DIAMETER))
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .class(cosmic::style::Container::custom(move |_theme| {
                container::Style {
                    background: Some(Background::Color(background)),
                    border: Border {
                        color: Color::TRANSPARENT,
                        width: 0.0,
                        radius: (BALL_DIAMETER / 2.0).into(),
                    },
                    ..Default::default()
                }
            }));

        container(mouse_area(menu).on_right_press(Message::ToggleMenu))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .into()
    }

    /// The expanded panel.
    fn view_panel(&self) -> Element<'_, Message> {
        let background = self.theme.panel_background();
        let text_color = self.theme.text_color();

        let header = row::row()
            .push(widget::text::title4(fl!("app-title")))
            .push(widget::text::caption(theme_label(self.theme)))
            .push(Space::new(Length::Fill, Length::Shrink))
            .push(
                button::icon(icon::from_name("applications-graphics-symbolic"))
                    .tooltip(fl!("next-theme"))
                    .on_press(Message::CycleTheme),
            )
            .push(
                button::icon(icon::from_name("go-down-symbolic"))
                    .tooltip(fl!("collapse"))
                    .on_press(Message::Collapse),
            )
            .push(
                button::icon(icon::from_name("view-conceal-symbolic"))
                    .tooltip(fl!("hide"))
                    .on_press(Message::Hide),
            )
            .push(
                button::icon(icon::from_name("window-close-symbolic"))
                    .tooltip(fl!("quit"))
                    .on_press(Message::Quit),
            )
            .spacing(4)
            .padding(12)
            .align_y(alignment::Vertical::Center);

        let header = mouse_area(header)
            .on_press(Message::HeaderPressed)
            .interaction(mouse::Interaction::Grab);

        let body = widget::column::column()
            .push(widget::text::body(fl!("panel-empty")))
            .push(widget::text::caption(fl!("panel-hint")))
            .spacing(8)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill);

        container(widget::column::column().push(header).push(body))
            .width(Length::Fill)
            .height(Length::Fill)
            .class(cosmic::style::Container::custom(move |_theme| {
                container::Style {
                    background: Some(Background::Color(background)),
                    text_color: Some(text_color),
                    border: Border {
                        color: Color::TRANSPARENT,
                        width: 0.0,
                        radius: PANEL_RADIUS.into(),
                    },
                    ..Default::default()
                }
            }))
            .into()
    }

    /// Waits for the next host event.
    fn poll_host_events(&self) -> Task<cosmic::Action<Message>> {
        let events = Arc::clone(&self.events);
        Task::perform(
            async move { events.lock().await.next().await },
            |event| cosmic::Action::App(Message::Host(event)),
        )
    }

    fn query_monitor_size(&self) -> Task<cosmic::Action<Message>> {
        match self.core.main_window_id() {
            Some(id) => window::monitor_size(id)
                .map(|size| cosmic::Action::App(Message::MonitorSize(size))),
            None => Task::none(),
        }
    }

    fn apply_host_event(&mut self, event: HostEvent) -> Task<cosmic::Action<Message>> {
        match event {
            HostEvent::Window(op) => self.apply_window_op(op),
            HostEvent::ExpandedChanged(expanded) => {
                self.expanded = expanded;
                self.emit_dbus_signal(DbusSignal::Expanded(expanded));
                // The panel may have been moved to another monitor
                self.query_monitor_size()
            }
            HostEvent::ThemeChanged(theme) => {
                self.theme = theme;
                Task::none()
            }
            HostEvent::VisibilityChanged(visible) => {
                self.emit_dbus_signal(DbusSignal::Visibility(visible));
                Task::none()
            }
            HostEvent::Quit => {
                tracing::info!("Quitting application");
                cosmic::iced::exit()
            }
        }
    }

    /// Applies a host geometry change to the real window.
    fn apply_window_op(&mut self, op: WindowOp) -> Task<cosmic::Action<Message>> {
        let Some(id) = self.core.main_window_id() else {
            return Task::none();
        };
        match op {
            WindowOp::Move(position) => {
                self.anchor.set_origin(position);
                window::move_to(id, to_point(position))
            }
            WindowOp::Resize(size) => window::resize(id, to_size(size)),
            WindowOp::SetBounds(position, size) => {
                self.anchor.set_origin(position);
                // iced has no combined bounds call; both tasks run back to back
                Task::batch([
                    window::resize(id, to_size(size)),
                    window::move_to(id, to_point(position)),
                ])
            }
            WindowOp::SetSizeLimits { min, max } => Task::batch([
                window::set_min_size(id, Some(to_size(min))),
                window::set_max_size(id, Some(to_size(max))),
            ]),
            WindowOp::SetResizable(resizable) => window::set_resizable(id, resizable),
            WindowOp::SetVisible(visible) => {
                let mode = if visible {
                    window::Mode::Windowed
                } else {
                    window::Mode::Hidden
                };
                window::set_mode(id, mode)
            }
        }
    }

    /// Emit a D-Bus signal on the shared server, if it is running.
    fn emit_dbus_signal(&self, signal: DbusSignal) {
        let dbus_server = Arc::clone(&self.dbus_server);
        tokio::spawn(async move {
            let guard = dbus_server.lock().await;
            if let Some(ref server) = *guard {
                let result = match signal {
                    DbusSignal::Expanded(expanded) => server.emit_expanded_changed(expanded).await,
                    DbusSignal::Visibility(visible) => {
                        server.emit_visibility_changed(visible).await
                    }
                };
                if let Err(e) = result {
                    tracing::error!("Failed to emit D-Bus signal: {}", e);
                }
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum DbusSignal {
    Expanded(bool),
    Visibility(bool),
}

/// Localized theme name.
fn theme_label(theme: Theme) -> String {
    match theme {
        Theme::Light => fl!("theme-light"),
        Theme::Dark => fl!("theme-dark"),
        Theme::Midnight => fl!("theme-midnight"),
        Theme::Nebula => fl!("theme-nebula"),
    }
}

fn to_point(position: Position) -> Point {
    Point::new(position.x as f32, position.y as f32)
}

fn to_size(size: Size) -> cosmic::iced::Size {
    cosmic::iced::Size::new(size.width as f32, size.height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::{self, Command, Envelope};
    use cosmic::Application;

    fn model() -> (AppModel, mpsc::UnboundedReceiver<Envelope>) {
        let (host, rx) = ipc::channel();
        let (_events_tx, events_rx) = mpsc::unbounded();
        let (screen, _screen_rx) = watch::channel(WorkArea::new(1920, 1080));
        let app = AppModel {
            core: cosmic::Core::default(),
            config: Config::default(),
            host: host.clone(),
            events: Arc::new(Mutex::new(events_rx)),
            screen: Arc::new(screen),
            dbus_server: Arc::new(Mutex::new(None)),
            tracker: DragTracker::new(host),
            anchor: GrabAnchor::new(),
            cursor: Point::ORIGIN,
            expanded: false,
            menu_open: false,
            theme: Theme::default(),
        };
        (app, rx)
    }

    /// Test: right click opens the ball menu; Escape and Hide close it.
    #[test]
    fn test_ball_menu() {
        let (mut app, mut rx) = model();

        let _ = app.update(Message::ToggleMenu);
        assert!(app.menu_open);
        let _ = app.update(Message::Collapse);
        assert!(!app.menu_open, "Escape closes the menu first");
        assert!(rx.try_next().is_err(), "closing the menu sends nothing");

        let _ = app.update(Message::ToggleMenu);
        let _ = app.update(Message::Hide);
        assert!(!app.menu_open);

        app.expanded = true;
        let _ = app.update(Message::ToggleMenu);
        assert!(!app.menu_open, "no ball menu on the panel");
    }

    /// Test: native resizes of the panel are reported, ball resizes are not.
    #[test]
    fn test_resize_reported_while_expanded() {
        let (mut app, mut rx) = model();

        let _ = app.update(Message::WindowResized(cosmic::iced::Size::new(80.0, 80.0)));
        assert!(rx.try_next().is_err());

        app.expanded = true;
        let _ = app.update(Message::WindowResized(cosmic::iced::Size::new(799.6, 1000.0)));
        assert!(matches!(
            rx.try_next(),
            Ok(Some(Envelope::Notify(Command::WindowResized(size)))) if size == Size::new(800, 1000)
        ));
    }

    /// Test: host tunables are forwarded only when they change.
    #[test]
    fn test_config_update_forwards_host_settings() {
        let (mut app, mut rx) = model();

        let _ = app.update(Message::UpdateConfig(Config {
            click_grace_ms: 250,
            ..Config::default()
        }));
        assert!(rx.try_next().is_err(), "click grace stays in the UI");

        let _ = app.update(Message::UpdateConfig(Config {
            snap_padding: 4,
            ..Config::default()
        }));
        assert!(matches!(
            rx.try_next(),
            Ok(Some(Envelope::Notify(Command::UpdateSettings(settings)))) if settings.snap_padding == 4
        ));
    }

    /// Test: host positions convert to window points unchanged.
    #[test]
    fn test_position_conversion() {
        let point = to_point(Position::new(-40, 1820));
        assert_eq!(point, Point::new(-40.0, 1820.0));
    }

    /// Test: host sizes convert to window sizes unchanged.
    #[test]
    fn test_size_conversion() {
        let size = to_size(Size::new(400, 600));
        assert_eq!(size, cosmic::iced::Size::new(400.0, 600.0));
    }

    /// Test: every theme has its own label.
    #[test]
    fn test_theme_labels_distinct() {
        let labels: std::collections::HashSet<String> =
            Theme::ALL.iter().map(|theme| theme_label(*theme)).collect();
        assert_eq!(labels.len(), Theme::ALL.len());
    }

    /// Test: Config struct has correct version for cosmic_config
    #[test]
    fn test_config_version() {
        assert_eq!(Config::VERSION, 1, "Config::VERSION should be 1");
    }

    /// Test: the ball fits inside the collapsed window.
    #[test]
    fn test_ball_fits_collapsed_window() {
        assert!(
            BALL_DIAMETER <= app_settings::COLLAPSED_SIZE as f32,
            "Ball should fit inside the collapsed window"
        );
    }

    /// Test: D-Bus message variants for server lifecycle
    #[test]
    fn test_dbus_server_message_variants() {
        let fail_msg = Message::DbusServerFailed("test error".to_string());
        match fail_msg {
            Message::DbusServerFailed(err) => {
                assert_eq!(err, "test error");
            }
            _ => panic!("Expected DbusServerFailed message"),
        }

        let start_msg = Message::DbusServerStarted;
        assert!(matches!(start_msg, Message::DbusServerStarted));
    }
}
