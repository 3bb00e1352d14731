use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| key_event_matches(k, event))
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::ctrl())
}

pub fn key_alt(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(KeyModifiers::alt())
}

/// Movement and activation keys shared by every navigable collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavBindings {
    pub up: Binding,
    pub down: Binding,
    pub left: Binding,
    pub right: Binding,
    pub first: Binding,
    pub last: Binding,
    pub activate: Binding,
}

impl Default for NavBindings {
    fn default() -> Self {
        Self {
            up: Binding::new("↑/k", "up", vec![key(KeyCode::Up), key_char('k')]),
            down: Binding::new("↓/j", "down", vec![key(KeyCode::Down), key_char('j')]),
            left: Binding::new("←/h", "left", vec![key(KeyCode::Left), key_char('h')]),
            right: Binding::new("→/l", "right", vec![key(KeyCode::Right), key_char('l')]),
            first: Binding::new("home/g", "first", vec![key(KeyCode::Home), key_char('g')]),
            last: Binding::new("end/G", "last", vec![key(KeyCode::End), key_char('G')]),
            activate: Binding::new(
                "enter",
                "open",
                vec![key(KeyCode::Enter), key_char(' ')],
            ),
        }
    }
}

impl NavBindings {
    pub fn help(&self) -> Vec<&Binding> {
        vec![&self.up, &self.down, &self.activate]
    }
}
