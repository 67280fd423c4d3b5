//! Per-step input sample.

/// Raw control state sampled once at the start of a step.
///
/// The pointer is already in world pixels; camera transforms belong to the
/// presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    /// Jump held.
    pub jump: bool,
    /// Jump went down this step (edge). Needed for mid-air jumps.
    pub jump_pressed: bool,
    pub dash: bool,
    /// Primary button held: attack, cast or mine.
    pub primary: bool,
    /// Secondary button held: place.
    pub secondary: bool,
    pub pointer: (f32, f32),
}

impl InputState {
    /// No keys held, pointer at the origin.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Horizontal intent: -1, 0 or 1. Left wins when both are held.
    pub fn horizontal(&self) -> i8 {
        if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        }
    }
}
