//! Input-side data models: arrow directions and the held-key display state.

use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[cfg(test)]
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Maps a `KeyboardEvent.key` value to a pan direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }

    pub fn help_label(self) -> &'static str {
        match self {
            Direction::Up => "Key Up",
            Direction::Down => "Key Down",
            Direction::Left => "Key Left",
            Direction::Right => "Key Right",
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Which arrow keys are currently held. Display only; movement never reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrowKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ArrowKeys {
    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn slot(&mut self, dir: Direction) -> &mut bool {
        match dir {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrowKeysAction {
    /// Raw `key` values straight from the DOM; non-arrow keys are ignored.
    KeyDown(String),
    KeyUp(String),
    ReleaseAll,
}

impl Reducible for ArrowKeys {
    type Action = ArrowKeysAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use ArrowKeysAction::*;
        let (dir, held) = match action {
            KeyDown(key) => match Direction::from_key(&key) {
                Some(d) => (d, true),
                None => return self,
            },
            KeyUp(key) => match Direction::from_key(&key) {
                Some(d) => (d, false),
                None => return self,
            },
            ReleaseAll => {
                if *self == ArrowKeys::default() {
                    return self;
                }
                return Rc::new(ArrowKeys::default());
            }
        };
        if self.is_held(dir) == held {
            return self;
        }
        let mut new = *self;
        *new.slot(dir) = held;
        Rc::new(new)
    }
}
