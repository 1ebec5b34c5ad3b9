// SPDX-License-Identifier: GPL-3.0-only

//! Pointer input handling for the widget.
//!
//! # Features
//!
//! - **Drag tracking**: turn press/move/release into host commands without
//!   ever touching the window directly
//! - **Click suppression**: recognise the click that ends a drag
//! - **Grab anchor**: derive per-event deltas from window-relative cursor
//!   positions
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use juno::input::DragTracker;
//!
//! let mut tracker = DragTracker::new(host.clone());
//!
//! // Pointer down: resolve the baseline, then arm
//! let baseline = tracker.pointer_down().await?;
//! tracker.arm(baseline);
//!
//! // Pointer moves are fire-and-forget
//! tracker.pointer_move(4.0, -2.0);
//!
//! // Release and finalize
//! tracker.pointer_up().await?;
//! if tracker.should_block_click() {
//!     // swallow the click
//! }
//! ```

pub mod drag;

pub use drag::{DragBaseline, DragTracker, GrabAnchor};
