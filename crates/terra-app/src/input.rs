//! Pointer state for the globe window.
//!
//! [`PointerState`] accumulates winit mouse events and tells press-and-drag
//! (pan) apart from press-and-release in place (click).

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Movement beyond which a press becomes a drag instead of a click.
pub const DRAG_THRESHOLD_PX: f32 = 4.0;

/// What a left-button release amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Released near where it was pressed.
    Click(Vec2),
    /// Released after panning.
    DragEnd,
}

#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Vec2,
    press_origin: Option<Vec2>,
    dragging: bool,
    cursor_in_window: bool,
}

impl PointerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. Returns the drag delta while the left
    /// button is held and the drag threshold has been crossed.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<Vec2> {
        let new_pos = Vec2::new(x as f32, y as f32);
        let delta = new_pos - self.position;
        self.position = new_pos;

        let origin = self.press_origin?;
        if !self.dragging && origin.distance(new_pos) > DRAG_THRESHOLD_PX {
            self.dragging = true;
            return Some(new_pos - origin);
        }
        self.dragging.then_some(delta)
    }

    /// Process a `MouseInput` event. Only the left button is tracked.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) -> Option<Release> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                self.press_origin = Some(self.position);
                self.dragging = false;
                None
            }
            ElementState::Released => {
                self.press_origin.take()?;
                if std::mem::take(&mut self.dragging) {
                    Some(Release::DragEnd)
                } else {
                    Some(Release::Click(self.position))
                }
            }
        }
    }

    /// Wheel movement in lines, positive = scroll up.
    pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            // ~40 pixels ≈ 1 line
            MouseScrollDelta::PixelDelta(pos) => (pos.y / 40.0) as f32,
        }
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    /// Leaving the window also abandons any press in progress.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.press_origin = None;
        self.dragging = false;
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}
