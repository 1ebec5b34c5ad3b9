// SPDX-License-Identifier: GPL-3.0-only

//! In-process window handle that keeps the authoritative geometry.
//!
//! The host never waits for the real toplevel to confirm a change. Instead it
//! records the intended geometry here and forwards each change as a
//! [`WindowOp`] to whoever owns the real surface (the UI event loop). Without a
//! sink the handle is fully headless, which is what tests use.

use futures::channel::mpsc;

use super::geometry::{Position, Size};
use super::{WindowHandle, WindowOp};
use crate::ipc::HostEvent;

/// Window handle backed by in-memory geometry.
#[derive(Debug)]
pub struct ShadowWindow {
    position: Position,
    size: Size,
    min_size: Size,
    max_size: Size,
    resizable: bool,
    movable: bool,
    visible: bool,
    sink: Option<mpsc::UnboundedSender<HostEvent>>,
}

impl ShadowWindow {
    /// Creates a visible, fixed-size window at `position`.
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            position,
            size,
            min_size: size,
            max_size: size,
            resizable: false,
            movable: false,
            visible: true,
            sink: None,
        }
    }

    /// Forwards every applied change to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: mpsc::UnboundedSender<HostEvent>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Current size limits as `(min, max)`.
    pub fn size_limits(&self) -> (Size, Size) {
        (self.min_size, self.max_size)
    }

    fn forward(&self, op: WindowOp) {
        if let Some(sink) = &self.sink {
            if sink.unbounded_send(HostEvent::Window(op)).is_err() {
                tracing::debug!("Window op dropped, UI side is gone: {:?}", op);
            }
        }
    }
}

impl WindowHandle for ShadowWindow {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> Size {
        self.size
    }

    fn is_resizable(&self) -> bool {
        self.resizable
    }

    fn is_movable(&self) -> bool {
        self.movable
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
        self.forward(WindowOp::Move(position));
    }

    fn set_size(&mut self, size: Size) {
        self.size = size.limited(self.min_size, self.max_size);
        self.forward(WindowOp::Resize(self.size));
    }

    fn set_bounds(&mut self, position: Position, size: Size) {
        self.position = position;
        self.size = size.limited(self.min_size, self.max_size);
        self.forward(WindowOp::SetBounds(position, self.size));
    }

    fn set_size_limits(&mut self, min: Size, max: Size) {
        self.min_size = min;
        self.max_size = max;
        self.forward(WindowOp::SetSizeLimits { min, max });
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
        self.forward(WindowOp::SetResizable(resizable));
    }

    fn set_movable(&mut self, movable: bool) {
        self.movable = movable;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.forward(WindowOp::SetVisible(visible));
    }

    fn record_moved(&mut self, position: Position) {
        self.position = position;
    }

    fn record_resized(&mut self, size: Size) {
        self.size = size;
    }
}
