//! Terminal-agnostic input events. The crossterm conversions live behind the `tui` feature.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Printable rune, including space.
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    BackTab,
    /// Anything the dashboard does not bind.
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
    };

    pub const CONTROL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
    };

    pub fn is_empty(self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn char(ch: char) -> Self {
        Self::simple(KeyCode::Char(ch))
    }

    /// The rune this key types, if any. Ctrl/Alt chords type nothing.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch) if !self.modifiers.ctrl && !self.modifiers.alt && !ch.is_control() => {
                Some(ch)
            }
            _ => None,
        }
    }

    pub fn is_quit(&self) -> bool {
        self.modifiers.ctrl && matches!(self.code, KeyCode::Char('c') | KeyCode::Char('C'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),
    Resize(u16, u16),
    Paste(String),
}

impl InputEvent {
    pub fn is_key(&self) -> bool {
        matches!(self, InputEvent::Key(_))
    }

    pub fn as_key(&self) -> Option<&KeyInput> {
        match self {
            InputEvent::Key(k) => Some(k),
            _ => None,
        }
    }
}

impl From<KeyInput> for InputEvent {
    fn from(key: KeyInput) -> Self {
        InputEvent::Key(key)
    }
}

#[cfg(feature = "tui")]
impl From<crossterm::event::KeyEvent> for KeyInput {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode as Ct;
        use crossterm::event::KeyModifiers as CtMods;

        let code = match event.code {
            Ct::Char(ch) => KeyCode::Char(ch),
            Ct::Enter => KeyCode::Enter,
            Ct::Esc => KeyCode::Esc,
            Ct::Backspace => KeyCode::Backspace,
            Ct::Delete => KeyCode::Delete,
            Ct::Left => KeyCode::Left,
            Ct::Right => KeyCode::Right,
            Ct::Up => KeyCode::Up,
            Ct::Down => KeyCode::Down,
            Ct::Home => KeyCode::Home,
            Ct::End => KeyCode::End,
            Ct::Tab => KeyCode::Tab,
            Ct::BackTab => KeyCode::BackTab,
            _ => KeyCode::Null,
        };
        let modifiers = KeyModifiers {
            ctrl: event.modifiers.contains(CtMods::CONTROL),
            alt: event.modifiers.contains(CtMods::ALT),
            shift: event.modifiers.contains(CtMods::SHIFT),
        };
        KeyInput::new(code, modifiers)
    }
}

#[cfg(feature = "tui")]
impl InputEvent {
    /// Key releases and mouse/focus events map to `None`.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::{Event, KeyEventKind};

        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                Some(InputEvent::Key(key.into()))
            }
            Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
            Event::Paste(text) => Some(InputEvent::Paste(text)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/event.rs"]
mod tests;
