// Repeat-suppressed continuous panning driven by key-down/key-up.
use crate::model::Direction;

/// Interval between repeated pan steps while a key is held.
pub const PAN_INTERVAL_MS: i32 = 16;

/// A cancellable fixed-interval callback. The callback itself is bound by the
/// implementor; the driver only starts and stops it.
pub trait Ticker {
    fn start(&mut self, period_ms: i32);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Auto-repeat key-down; the running movement (if any) is left alone.
    Suppressed,
    /// Not an arrow key: any movement was cancelled, nothing started.
    Ignored,
    /// First step was taken and the repeating pan is running.
    Started(Direction),
    /// Already at the bound; nothing moved.
    Blocked(Direction),
}

#[derive(Debug)]
pub struct PanDriver<T: Ticker> {
    ticker: T,
    active: Option<Direction>,
}

impl<T: Ticker> PanDriver<T> {
    pub fn new(ticker: T) -> Self {
        Self {
            ticker,
            active: None,
        }
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn active(&self) -> Option<Direction> {
        self.active
    }

    /// Handles a key-down. `pan` performs one camera step and reports whether it moved.
    pub fn key_down(
        &mut self,
        key: &str,
        repeat: bool,
        pan: impl FnMut(Direction) -> bool,
    ) -> KeyOutcome {
        if repeat {
            return KeyOutcome::Suppressed;
        }
        self.stop();
        match Direction::from_key(key) {
            Some(dir) => self.begin(dir, pan),
            None => KeyOutcome::Ignored,
        }
    }

    /// Same as a non-repeat key-down of the matching arrow key.
    pub fn click(&mut self, dir: Direction, pan: impl FnMut(Direction) -> bool) -> KeyOutcome {
        self.key_down(dir.key(), false, pan)
    }

    pub fn key_up(&mut self) {
        self.stop();
    }

    /// One interval callback. Returns whether the camera moved.
    pub fn tick(&mut self, mut pan: impl FnMut(Direction) -> bool) -> bool {
        let Some(dir) = self.active else {
            self.ticker.stop();
            return false;
        };
        let moved = pan(dir);
        if !moved {
            self.stop();
        }
        moved
    }

    pub fn stop(&mut self) {
        self.active = None;
        self.ticker.stop();
    }

    fn begin(&mut self, dir: Direction, mut pan: impl FnMut(Direction) -> bool) -> KeyOutcome {
        if !pan(dir) {
            return KeyOutcome::Blocked(dir);
        }
        self.active = Some(dir);
        self.ticker.start(PAN_INTERVAL_MS);
        KeyOutcome::Started(dir)
    }
}
