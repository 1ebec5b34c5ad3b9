// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.juno.Juno";

/// D-Bus well-known name of the widget service.
pub const DBUS_INTERFACE: &str = "io.github.juno.Juno";

/// D-Bus object path of the widget service.
pub const DBUS_PATH: &str = "/io/github/juno/Juno";

// ============================================================================
// Window Geometry
// ============================================================================

/// Edge length of the collapsed ball window in pixels.
pub const COLLAPSED_SIZE: u32 = 80;

/// Default expanded panel width in pixels.
pub const EXPANDED_WIDTH: u32 = 400;

/// Default expanded panel height in pixels.
pub const EXPANDED_HEIGHT: u32 = 600;

/// Minimum expanded panel width in pixels.
pub const MIN_EXPANDED_WIDTH: u32 = 300;

/// Minimum expanded panel height in pixels.
pub const MIN_EXPANDED_HEIGHT: u32 = 400;

/// Maximum expanded panel width in pixels.
pub const MAX_EXPANDED_WIDTH: u32 = 800;

/// Maximum expanded panel height in pixels.
pub const MAX_EXPANDED_HEIGHT: u32 = 1000;

/// Distance kept between a snapped ball and the screen edge.
pub const SNAP_PADDING: i32 = 20;

/// Delay between a collapse and the automatic snap, in milliseconds.
pub const SETTLE_DELAY_MS: u64 = 100;

/// Grace period after pointer release during which a click is still
/// attributed to the drag, in milliseconds.
pub const CLICK_GRACE_MS: u64 = 100;

/// Work area assumed until the UI reports the monitor size.
pub const FALLBACK_SCREEN_WIDTH: u32 = 1920;

/// Work area assumed until the UI reports the monitor size.
pub const FALLBACK_SCREEN_HEIGHT: u32 = 1080;

/// Diameter of the rendered ball inside the collapsed window.
pub const BALL_DIAMETER: f32 = 64.0;
