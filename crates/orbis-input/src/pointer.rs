//! Frame-coherent pointer state tracker.
//!
//! [`PointerState`] accumulates winit cursor, button, wheel and pinch events
//! during a frame. The primary (left) button doubles as orbit drag and click:
//! a press that travels less than the drag threshold before release is a
//! click, anything further is a drag and never clicks.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Wheel lines per unit of pinch magnification.
const LINES_PER_PINCH: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
struct Press {
    origin: Vec2,
    dragging: bool,
}

/// What the camera and picker need from one frame of pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerFrame {
    /// Cursor position in physical pixels, if inside the window.
    pub position: Option<Vec2>,
    /// Drag movement this frame, zero unless a drag is in progress.
    pub drag_delta: Vec2,
    /// Zoom in wheel lines, positive = toward the globe.
    pub zoom: f32,
    /// Position of a completed click this frame.
    pub click: Option<Vec2>,
    /// A drag is in progress.
    pub dragging: bool,
}

/// Frame-coherent pointer state.
///
/// 1. Forward winit events via the `on_*` methods during event collection.
/// 2. Read [`frame`](Self::frame) once per update.
/// 3. Call [`clear_transients`](Self::clear_transients) at end of frame.
#[derive(Debug, Clone)]
pub struct PointerState {
    position: Vec2,
    delta: Vec2,
    press: Option<Press>,
    click: Option<Vec2>,
    zoom: f32,
    cursor_in_window: bool,
    drag_threshold: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl PointerState {
    #[must_use]
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            delta: Vec2::ZERO,
            press: None,
            click: None,
            zoom: 0.0,
            cursor_in_window: false,
            drag_threshold: drag_threshold.max(0.0),
        }
    }

    // ── Event handlers ──────────────────────────────────────────────

    /// Process a `CursorMoved` event.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        self.cursor_in_window = true;

        if let Some(press) = &mut self.press {
            if !press.dragging && new_pos.distance(press.origin) > self.drag_threshold {
                press.dragging = true;
                // The travel that crossed the threshold counts toward the drag.
                self.delta += new_pos - press.origin;
            } else if press.dragging {
                self.delta += new_pos - self.position;
            }
        }
        self.position = new_pos;
    }

    /// Process a `MouseInput` event. Only the left button is tracked.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.press = Some(Press {
                    origin: self.position,
                    dragging: false,
                });
            }
            ElementState::Released => {
                if let Some(press) = self.press.take()
                    && !press.dragging
                {
                    tracing::trace!(x = self.position.x, y = self.position.y, "pointer click");
                    self.click = Some(self.position);
                }
            }
        }
    }

    /// Process a `MouseWheel` event.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => {
                self.zoom += y;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.zoom += (pos.y / PIXELS_PER_LINE) as f32;
            }
        }
    }

    /// Process a `PinchGesture` delta (positive = magnify).
    pub fn on_pinch(&mut self, delta: f64) {
        self.zoom += (delta * LINES_PER_PINCH) as f32;
    }

    /// Process a `CursorEntered` event.
    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    /// Process a `CursorLeft` event. An open press is dropped without a click.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.press = None;
    }

    /// Clears per-frame transients: delta, zoom and click.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.zoom = 0.0;
        self.click = None;
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Snapshot of this frame's input.
    #[must_use]
    pub fn frame(&self) -> PointerFrame {
        PointerFrame {
            position: self.cursor_in_window.then_some(self.position),
            drag_delta: self.delta,
            zoom: self.zoom,
            click: self.click,
            dragging: self.is_dragging(),
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed_at(x: f64, y: f64) -> PointerState {
        let mut ps = PointerState::new(4.0);
        ps.on_cursor_moved(x, y);
        ps.on_button(MouseButton::Left, ElementState::Pressed);
        ps
    }

    #[test]
    fn test_small_travel_is_a_click() {
        let mut ps = pressed_at(100.0, 100.0);
        ps.on_cursor_moved(102.0, 101.0);
        ps.on_button(MouseButton::Left, ElementState::Released);
        let frame = ps.frame();
        assert_eq!(frame.click, Some(Vec2::new(102.0, 101.0)));
        assert_eq!(frame.drag_delta, Vec2::ZERO);
        assert!(!frame.dragging);
    }

    #[test]
    fn test_drag_never_clicks() {
        let mut ps = pressed_at(100.0, 100.0);
        ps.on_cursor_moved(110.0, 100.0);
        ps.on_cursor_moved(120.0, 95.0);
        assert!(ps.is_dragging());
        assert_eq!(ps.frame().drag_delta, Vec2::new(20.0, -5.0));
        ps.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(ps.frame().click, None);
        assert!(!ps.is_dragging());
    }

    #[test]
    fn test_hover_motion_is_not_drag() {
        let mut ps = PointerState::new(4.0);
        ps.on_cursor_moved(10.0, 10.0);
        ps.on_cursor_moved(300.0, 200.0);
        assert_eq!(ps.frame().drag_delta, Vec2::ZERO);
        assert_eq!(ps.frame().position, Some(Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn test_right_button_ignored() {
        let mut ps = PointerState::new(4.0);
        ps.on_cursor_moved(5.0, 5.0);
        ps.on_button(MouseButton::Right, ElementState::Pressed);
        ps.on_button(MouseButton::Right, ElementState::Released);
        assert_eq!(ps.frame().click, None);
    }

    #[test]
    fn test_scroll_and_pinch_accumulate() {
        let mut ps = PointerState::new(4.0);
        ps.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ps.on_scroll(MouseScrollDelta::LineDelta(0.0, 0.5));
        ps.on_pinch(0.05);
        assert!((ps.frame().zoom - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_transients_clear() {
        let mut ps = pressed_at(0.0, 0.0);
        ps.on_cursor_moved(50.0, 0.0);
        ps.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ps.clear_transients();
        let frame = ps.frame();
        assert_eq!(frame.drag_delta, Vec2::ZERO);
        assert_eq!(frame.zoom, 0.0);
        assert!(frame.dragging, "drag survives the frame boundary");
    }

    #[test]
    fn test_leaving_window_cancels_press() {
        let mut ps = pressed_at(10.0, 10.0);
        ps.on_cursor_left();
        ps.on_button(MouseButton::Left, ElementState::Released);
        let frame = ps.frame();
        assert_eq!(frame.click, None);
        assert_eq!(frame.position, None);
    }
}
