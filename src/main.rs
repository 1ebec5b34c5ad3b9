// SPDX-License-Identifier: GPL-3.0-only

//! Juno Main Application
//!
//! Starts the floating widget: the host controller on its own thread and the
//! COSMIC window on the main thread. With a subcommand the binary instead
//! acts as a remote for an already running widget.

use std::sync::Arc;

use cosmic::cosmic_config::{self, CosmicConfigEntry};
use futures::channel::mpsc;
use juno::app_settings::{
    APP_ID, COLLAPSED_SIZE, FALLBACK_SCREEN_HEIGHT, FALLBACK_SCREEN_WIDTH,
};
use juno::config::Config;
use juno::dbus::DbusClientBlocking;
use juno::host::{collapsed_size, HostController, HostSettings};
use juno::state::KvStore;
use juno::window::{Position, ShadowWindow, WatchedScreen, WorkArea};
use juno::{app, cli, i18n, ipc};

fn main() -> cosmic::iced::Result {
    let args = cli::parse();
    cli::init_tracing(args.log_level.as_deref());

    if let Some(remote) = args.command {
        run_remote(&remote);
        return Ok(());
    }

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let config = cosmic_config::Config::new(APP_ID, Config::VERSION)
        .map(|context| match Config::get_entry(&context) {
            Ok(config) => config,
            Err((_errors, config)) => config,
        })
        .unwrap_or_default();

    // Wire the host: commands in, host events out, monitor size published by the UI
    let (screen_tx, screen) =
        WatchedScreen::channel(WorkArea::new(FALLBACK_SCREEN_WIDTH, FALLBACK_SCREEN_HEIGHT));
    let (events_tx, events_rx) = mpsc::unbounded();
    let (host_client, host_rx) = ipc::channel();

    let mut host = HostController::new(
        KvStore::open_or_memory(APP_ID),
        Box::new(screen),
        HostSettings::from(&config),
    )
    .with_events(events_tx.clone());
    host.create_window(Box::new(
        ShadowWindow::new(Position::default(), collapsed_size()).with_sink(events_tx),
    ));

    let spawned = std::thread::Builder::new()
        .name("juno-host".to_string())
        .spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    runtime.block_on(host.run(host_rx));
                }
                Err(e) => tracing::error!("Failed to create host runtime: {}", e),
            }
        });
    if let Err(e) = spawned {
        tracing::error!("Failed to spawn host thread: {}", e);
        std::process::exit(1);
    }

    // The window starts as the collapsed ball; the host resizes it from here on.
    let edge = COLLAPSED_SIZE as f32;
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(edge, edge))
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(edge)
                .max_width(edge)
                .min_height(edge)
                .max_height(edge),
        )
        // No resize border while collapsed
        .resizable(None)
        // Use client-side decorations (no window manager decorations)
        .client_decorations(true)
        // The ball is round; everything around it stays transparent
        .transparent(true)
        .exit_on_close(true);

    let flags = app::Flags {
        host: host_client,
        events: Arc::new(tokio::sync::Mutex::new(events_rx)),
        screen: Arc::new(screen_tx),
    };

    tracing::info!("Starting Juno widget");
    cosmic::app::run::<app::AppModel>(settings, flags)
}

/// Sends one remote command to the running widget and exits on failure.
fn run_remote(remote: &cli::Remote) {
    let outcome = DbusClientBlocking::new().and_then(|client| remote.run(&client));
    match outcome {
        Ok(result) => println!("{result}"),
        Err(e) => {
            tracing::error!("{:?} failed: {}", remote, e);
            std::process::exit(1);
        }
    }
}
