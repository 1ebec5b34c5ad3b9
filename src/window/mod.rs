// SPDX-License-Identifier: GPL-3.0-only

//! Window geometry for the floating widget.
//!
//! # Modules
//!
//! - `geometry`: position/size types and the clamp policies
//! - `snap`: nearest edge/corner selection for the collapsed ball
//! - `screen`: work-area sources
//! - `shadow`: in-memory window handle that forwards changes to the UI
//!
//! The host owns exactly one window through [`WindowManager`]. Every query
//! returns `None` while no window exists, so callers decide explicitly what an
//! absent window means for them.

pub mod geometry;
pub mod screen;
pub mod shadow;
pub mod snap;

pub use geometry::{Position, Size, WorkArea};
pub use screen::{FixedScreen, ScreenSource, WatchedScreen};
pub use shadow::ShadowWindow;
pub use snap::{Snap, SnapTarget};

/// A geometry change the owner of the real toplevel has to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    /// Move the top-left corner.
    Move(Position),
    /// Resize without moving.
    Resize(Size),
    /// Move and resize in one step.
    SetBounds(Position, Size),
    /// Update the size limits.
    SetSizeLimits { min: Size, max: Size },
    /// Allow or forbid interactive resizing.
    SetResizable(bool),
    /// Show or hide the window.
    SetVisible(bool),
}

/// Operations the host performs on its window.
pub trait WindowHandle: Send {
    fn position(&self) -> Position;
    fn size(&self) -> Size;
    fn is_resizable(&self) -> bool;
    fn is_movable(&self) -> bool;
    fn is_visible(&self) -> bool;

    fn set_position(&mut self, position: Position);
    /// Resizes within the current size limits.
    fn set_size(&mut self, size: Size);
    /// Moves and resizes as one change, with no intermediate frame.
    fn set_bounds(&mut self, position: Position, size: Size);
    fn set_size_limits(&mut self, min: Size, max: Size);
    fn set_resizable(&mut self, resizable: bool);
    fn set_movable(&mut self, movable: bool);
    fn set_visible(&mut self, visible: bool);

    /// Records a move performed outside the host (a native drag).
    fn record_moved(&mut self, position: Position);
    /// Records a resize performed outside the host.
    fn record_resized(&mut self, size: Size);
}

/// Owner of the single widget window.
#[derive(Default)]
pub struct WindowManager {
    handle: Option<Box<dyn WindowHandle>>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("present", &self.is_present())
            .finish()
    }
}

impl WindowManager {
    /// Creates a manager without a window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the window, replacing any previous one.
    pub fn create(&mut self, handle: Box<dyn WindowHandle>) {
        if self.handle.replace(handle).is_some() {
            tracing::warn!("Replacing an existing widget window");
        }
    }

    /// Removes and returns the window.
    pub fn destroy(&mut self) -> Option<Box<dyn WindowHandle>> {
        self.handle.take()
    }

    pub fn is_present(&self) -> bool {
        self.handle.is_some()
    }

    pub fn get(&self) -> Option<&dyn WindowHandle> {
        self.handle.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn WindowHandle + 'static)> {
        self.handle.as_deref_mut()
    }

    pub fn position(&self) -> Option<Position> {
        self.get().map(|window| window.position())
    }

    pub fn size(&self) -> Option<Size> {
        self.get().map(|window| window.size())
    }
}
