//! GPIO-polled button source
//!
//! Samples eight active-low `embedded-hal` input lines once per tick. The
//! HAT wires every button to ground with the SoC pull-up enabled, so a low
//! level means pressed.

use embedded_hal::digital::InputPin;

use crate::debounce::{Debouncer, EdgeDetector};
use crate::input::{Button, ButtonSource, Clock, Presses};

/// Button source backed by raw line reads.
pub struct GpioButtons<P, C> {
    lines: [P; 8],
    clock: C,
    edges: EdgeDetector,
    debouncer: Debouncer,
    faulted: [bool; 8],
}

impl<P, C> GpioButtons<P, C>
where
    P: InputPin,
    C: Clock,
{
    /// Create a source over `lines`, indexed in [`Button::ALL`] order.
    pub fn new(lines: [P; 8], clock: C) -> Self {
        Self::with_debouncer(lines, clock, Debouncer::default())
    }

    /// Create a source with a custom quiet window.
    pub fn with_debouncer(lines: [P; 8], clock: C, debouncer: Debouncer) -> Self {
        Self {
            lines,
            clock,
            edges: EdgeDetector::new(),
            debouncer,
            faulted: [false; 8],
        }
    }

    /// Whether the last read of `button`'s line failed.
    pub fn is_faulted(&self, button: Button) -> bool {
        self.faulted.get(button.index()).copied().unwrap_or(true)
    }

    /// Release the underlying lines.
    pub fn release(self) -> [P; 8] {
        self.lines
    }
}

impl<P, C> ButtonSource for GpioButtons<P, C>
where
    P: InputPin,
    C: Clock,
{
    fn poll(&mut self) -> Presses {
        let now = self.clock.now_ms();
        let mut presses = Presses::new();
        for ((button, line), faulted) in Button::ALL
            .into_iter()
            .zip(self.lines.iter_mut())
            .zip(self.faulted.iter_mut())
        {
            // A line we cannot read counts as released
            let level = line.is_low();
            *faulted = level.is_err();
            let down = level.unwrap_or(false);
            if self.edges.update(button, down) && self.debouncer.accept(button, now) {
                // Capacity is 8 and each button appears once
                let _ = presses.push(button);
            }
        }
        presses
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::ManualClock;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    fn lines(levels: [&[State]; 8]) -> [PinMock; 8] {
        levels.map(|states| {
            let expectations: Vec<Transaction> =
                states.iter().map(|s| Transaction::get(s.clone())).collect();
            PinMock::new(&expectations)
        })
    }

    #[test]
    fn test_active_low_press_is_reported_once_while_held() {
        use State::{High, Low};
        let idle: &[State] = &[High, High, High];
        let clock = ManualClock::new();
        let mut src = GpioButtons::new(
            lines([idle, &[High, Low, Low], idle, idle, idle, idle, idle, idle]),
            &clock,
        );

        assert!(src.poll().is_empty());
        clock.advance(50);
        assert_eq!(src.poll().as_slice(), &[Button::Down]);
        clock.advance(50);
        assert!(src.poll().is_empty(), "held button must not repeat");

        for mut line in src.release() {
            line.done();
        }
    }

    #[test]
    fn test_bounce_inside_window_is_suppressed() {
        use State::{High, Low};
        let idle: &[State] = &[High, High, High, High];
        let clock = ManualClock::new();
        let mut src = GpioButtons::new(
            lines([idle, idle, idle, idle, &[Low, High, Low, Low], idle, idle, idle]),
            &clock,
        );

        assert_eq!(src.poll().as_slice(), &[Button::Center]);
        clock.advance(20);
        assert!(src.poll().is_empty());
        clock.advance(20);
        // second falling edge, 40 ms after the first: bounce
        assert!(src.poll().is_empty());
        clock.advance(20);
        assert!(src.poll().is_empty());

        for mut line in src.release() {
            line.done();
        }
    }

    #[test]
    fn test_simultaneous_presses_keep_fixed_order() {
        use State::Low;
        let down: &[State] = &[Low];
        let clock = ManualClock::new();
        let mut src = GpioButtons::new(lines([down; 8]), &clock);

        assert_eq!(src.poll().as_slice(), &Button::ALL);

        for mut line in src.release() {
            line.done();
        }
    }
}
