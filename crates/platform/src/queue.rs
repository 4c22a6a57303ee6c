//! Interrupt-fed button source
//!
//! Edge-interrupt callbacks run on threads the UI loop does not own. They
//! push raw presses through an [`EdgeSender`]; the loop drains them with the
//! same `poll()` contract as the GPIO-polled source, so the mode controller
//! cannot tell the two apart.
//!
//! The launcher polls the pins today. This source is the backing for an
//! edge-triggered setup (sysfs `edge` files or gpio-cdev line events),
//! where a watcher thread owns the lines and holds the [`EdgeSender`].

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::debounce::Debouncer;
use crate::input::{Button, ButtonSource, Clock, Presses};

/// Cloneable handle for interrupt callbacks.
#[derive(Debug, Clone)]
pub struct EdgeSender(Sender<Button>);

impl EdgeSender {
    /// Report a falling edge on `button`. Dropped silently if the queue is gone.
    pub fn press(&self, button: Button) {
        let _ = self.0.send(button);
    }
}

/// Owner of the channel; split into a sender and a [`QueuedButtons`] source.
pub struct ButtonQueue {
    tx: Sender<Button>,
    rx: Receiver<Button>,
}

impl Default for ButtonQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// A handle for interrupt callbacks.
    pub fn sender(&self) -> EdgeSender {
        EdgeSender(self.tx.clone())
    }

    /// Turn the receiving side into a button source.
    pub fn into_source<C: Clock>(self, clock: C, debouncer: Debouncer) -> QueuedButtons<C> {
        QueuedButtons {
            rx: self.rx,
            clock,
            debouncer,
        }
    }
}

/// Button source draining interrupt callbacks.
pub struct QueuedButtons<C> {
    rx: Receiver<Button>,
    clock: C,
    debouncer: Debouncer,
}

impl<C: Clock> ButtonSource for QueuedButtons<C> {
    fn poll(&mut self) -> Presses {
        let now = self.clock.now_ms();
        let mut seen = [false; 8];
        for button in self.rx.try_iter() {
            if self.debouncer.accept(button, now) {
                if let Some(flag) = seen.get_mut(button.index()) {
                    *flag = true;
                }
            }
        }
        Button::ALL
            .into_iter()
            .zip(seen)
            .filter_map(|(b, hit)| hit.then_some(b))
            .collect()
    }
}
