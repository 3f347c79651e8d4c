//! Live keyboard state, polled by the simulation once per frame.
//!
//! Input collaborators flip entries on key-down/key-up; the simulation only
//! reads. Keys never pressed read as up.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Debug, Default)]
pub struct KeyTable {
    down: HashMap<Key, bool>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.down.insert(key, down);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.get(&key).copied().unwrap_or(false)
    }

    pub fn release_all(&mut self) {
        self.down.clear();
    }
}
