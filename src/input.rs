//! Input events from the platform layer
//!
//! The windowing layer polls its own event queue and forwards each event as
//! an [`InputEvent`]. [`InputState`] folds them into the next frame's
//! [`TickInput`], tracking held mouse buttons and the pointer between frames.

use glam::Vec2;

use crate::sim::TickInput;

/// Keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Space,
    Tab,
    Plus,
    Equals,
    Minus,
    Escape,
    /// Anything else (including pan/zoom keys owned by the view layer)
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Other,
}

/// One discrete platform event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Pointer moved, in world coordinates
    MouseMotion(Vec2),
}

/// Held state carried between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pushing: bool,
    pulling: bool,
    pointer: Option<Vec2>,
    quit: bool,
    pending: TickInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a quit was requested
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => self.quit = true,
            InputEvent::KeyDown(key) => match key {
                Key::Right => self.pending.add_batch = true,
                Key::Left => self.pending.remove_batch = true,
                Key::Space => self.pending.toggle_strategy = !self.pending.toggle_strategy,
                Key::Tab => self.pending.toggle_pause = !self.pending.toggle_pause,
                Key::Plus | Key::Equals => self.pending.speed_up = true,
                Key::Minus => self.pending.slow_down = true,
                Key::Escape | Key::Other => {}
            },
            InputEvent::MouseDown(MouseButton::Left) => self.pushing = true,
            InputEvent::MouseDown(MouseButton::Right) => self.pulling = true,
            InputEvent::MouseUp(MouseButton::Left) => self.pushing = false,
            InputEvent::MouseUp(MouseButton::Right) => self.pulling = false,
            InputEvent::MouseDown(MouseButton::Other) | InputEvent::MouseUp(MouseButton::Other) => {}
            InputEvent::MouseMotion(pos) => self.pointer = Some(pos),
        }
    }

    /// Feed a batch of events, e.g. everything polled this frame
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Commands for the coming frame; one-shot flags are consumed
    pub fn take_frame(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.pointer = self.pointer;
        input.push = self.pushing;
        input.pull = self.pulling;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_commands() {
        let mut state = InputState::new();
        state.handle_all([
            InputEvent::KeyDown(Key::Right),
            InputEvent::KeyDown(Key::Equals),
            InputEvent::KeyDown(Key::Tab),
            InputEvent::KeyDown(Key::Other),
        ]);
        let frame = state.take_frame();
        assert!(frame.add_batch && frame.speed_up && frame.toggle_pause);
        assert!(!frame.remove_batch && !frame.slow_down && !frame.toggle_strategy);

        // One-shot commands do not repeat
        let frame = state.take_frame();
        assert!(!frame.add_batch && !frame.toggle_pause);
    }

    #[test]
    fn test_double_toggle_cancels() {
        let mut state = InputState::new();
        state.handle_all([InputEvent::KeyDown(Key::Space), InputEvent::KeyDown(Key::Space)]);
        assert!(!state.take_frame().toggle_strategy);
    }

    #[test]
    fn test_held_buttons_persist_across_frames() {
        let mut state = InputState::new();
        state.handle_all([
            InputEvent::MouseMotion(Vec2::new(10.0, 20.0)),
            InputEvent::MouseDown(MouseButton::Left),
        ]);
        assert!(state.take_frame().push);

        let frame = state.take_frame();
        assert!(frame.push && !frame.pull);
        assert_eq!(frame.pointer, Some(Vec2::new(10.0, 20.0)));

        state.handle(InputEvent::MouseUp(MouseButton::Left));
        assert!(!state.take_frame().push);
    }

    #[test]
    fn test_quit() {
        let mut state = InputState::new();
        assert!(!state.quit_requested());
        state.handle(InputEvent::KeyDown(Key::Escape));
        assert!(state.quit_requested());

        let mut state = InputState::new();
        state.handle(InputEvent::Quit);
        assert!(state.quit_requested());
    }
}
