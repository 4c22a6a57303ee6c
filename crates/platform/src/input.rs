//! Input device abstraction
//!
//! Whatever backs the buttons (polled GPIO lines, an interrupt-fed queue,
//! or nothing at all) the consumer sees the same thing: one [`ButtonSource::poll`]
//! per scheduler tick returning the presses that happened since the last one.

/// The eight logical buttons on the HAT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    /// Joystick up
    Up,
    /// Joystick down
    Down,
    /// Joystick left
    Left,
    /// Joystick right
    Right,
    /// Joystick press
    Center,
    /// Side key 1
    Key1,
    /// Side key 2
    Key2,
    /// Side key 3
    Key3,
}

impl Button {
    /// All buttons, in the fixed order used for pin tables and poll results
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Center,
        Button::Key1,
        Button::Key2,
        Button::Key3,
    ];

    /// Position in [`Button::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label for logs
    pub const fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::Center => "center",
            Button::Key1 => "key1",
            Button::Key2 => "key2",
            Button::Key3 => "key3",
        }
    }
}

/// Presses reported by one poll. At most one entry per button.
pub type Presses = heapless::Vec<Button, 8>;

/// A source of debounced, falling-edge button presses.
///
/// `poll` must never block. If the underlying lines are unavailable it
/// returns an empty list and the rest of the system keeps running.
pub trait ButtonSource {
    /// Presses since the previous call, in [`Button::ALL`] order.
    fn poll(&mut self) -> Presses;
}

impl<T: ButtonSource + ?Sized> ButtonSource for &mut T {
    fn poll(&mut self) -> Presses {
        (**self).poll()
    }
}

/// Monotonic millisecond clock used for debouncing.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Source for when no input hardware is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoButtons;

impl ButtonSource for NoButtons {
    fn poll(&mut self) -> Presses {
        Presses::new()
    }
}
