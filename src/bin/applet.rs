// SPDX-License-Identifier: GPL-3.0-only

//! Juno System Tray Applet
//!
//! This binary provides a panel applet for the COSMIC panel that controls a
//! running Juno widget.
//!
//! # Usage
//!
//! The applet is launched by the COSMIC panel when configured. It can also be
//! run standalone for testing:
//!
//! ```bash
//! cargo run --bin juno-applet
//! ```
//!
//! # Features
//!
//! - Shows a notes icon in the panel
//! - Click: Open popup menu with show/hide, toggle expand and quit
//! - Communicates with the main Juno application via D-Bus

use juno::{applet, cli};

fn main() -> cosmic::iced::Result {
    // Initialize logging for the applet
    let args = cli::parse_applet();
    cli::init_tracing(args.log_level.as_deref());

    tracing::info!("Starting Juno applet");

    // Run the applet
    applet::run()
}
