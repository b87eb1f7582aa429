//! Keyboard mapping
//!
//! Motion keys (q/e, a/d, w/s) and the fire key are level-triggered: they
//! stay in effect while held and are sampled once per simulation tick.
//! Everything else is edge-triggered and turns into a [`Command`].

use std::collections::BTreeSet;

use crate::camera::{Nudge, ViewKind};
use crate::sim::HeldAxes;

/// A key as reported by the platform, case-folded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Char(char),
    Arrow(Arrow),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

impl From<Arrow> for Nudge {
    fn from(arrow: Arrow) -> Self {
        match arrow {
            Arrow::Left => Nudge::Left,
            Arrow::Right => Nudge::Right,
            Arrow::Up => Nudge::Up,
            Arrow::Down => Nudge::Down,
        }
    }
}

impl Key {
    /// Parse a DOM-style key name ("q", "Q", " ", "ArrowLeft", ...)
    pub fn parse(name: &str) -> Self {
        match name {
            "ArrowLeft" => return Key::Arrow(Arrow::Left),
            "ArrowRight" => return Key::Arrow(Arrow::Right),
            "ArrowUp" => return Key::Arrow(Arrow::Up),
            "ArrowDown" => return Key::Arrow(Arrow::Down),
            "Space" | "Spacebar" => return Key::Char(' '),
            _ => {}
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
            _ => Key::Other,
        }
    }
}

/// Edge-triggered actions, applied once per key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectView(ViewKind),
    ToggleOblique,
    TogglePerspective,
    ToggleMultiView,
    ToggleSolid,
    ToggleTexture,
    TogglePanel,
    ResetView,
    Nudge(Nudge),
    ToggleMute,
    ClearLanded,
    ToggleRound,
}

impl Command {
    /// Command bound to a key, if any
    pub fn for_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Char('1') => Command::SelectView(ViewKind::Front),
            Key::Char('2') => Command::SelectView(ViewKind::Left),
            Key::Char('3') => Command::SelectView(ViewKind::Top),
            Key::Char('4') => Command::SelectView(ViewKind::Fourth),
            Key::Char('8') => Command::ToggleOblique,
            Key::Char('9') => Command::TogglePerspective,
            Key::Char('0') => Command::ToggleMultiView,
            Key::Char(' ') => Command::ToggleSolid,
            Key::Char('.') => Command::ToggleTexture,
            Key::Char('h') => Command::TogglePanel,
            Key::Char('r') => Command::ResetView,
            Key::Char('m') => Command::ToggleMute,
            Key::Char('c') => Command::ClearLanded,
            Key::Char('g') => Command::ToggleRound,
            Key::Arrow(arrow) => Command::Nudge(arrow.into()),
            _ => return None,
        };
        Some(command)
    }
}

/// Keys that feed [`HeldAxes`]
fn is_motion_key(key: Key) -> bool {
    matches!(
        key,
        Key::Char('q' | 'e' | 'a' | 'd' | 'w' | 's' | 'z')
    )
}

/// Held-key tracker
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat of a held key yields no new command,
    /// except for the arrows, which keep nudging the view while held.
    pub fn key_down(&mut self, key: Key) -> Option<Command> {
        if !self.held.insert(key) && !matches!(key, Key::Arrow(_)) {
            return None;
        }
        if is_motion_key(key) {
            return None;
        }
        Command::for_key(key)
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Drop everything (focus loss)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Current continuous input
    pub fn axes(&self) -> HeldAxes {
        let axis = |neg: char, pos: char| -> i8 {
            let mut v = 0;
            if self.is_held(Key::Char(neg)) {
                v -= 1;
            }
            if self.is_held(Key::Char(pos)) {
                v += 1;
            }
            v
        };
        HeldAxes {
            drive: axis('q', 'e'),
            traverse: axis('d', 'a'),
            elevate: axis('s', 'w'),
            fire: self.is_held(Key::Char('z')),
        }
    }
}
