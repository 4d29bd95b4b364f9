//! Frontend-neutral building blocks: key input and the exit signal.

pub mod event;
pub mod exit;

pub use event::{InputEvent, KeyCode, KeyInput, KeyModifiers};
pub use exit::ExitSignal;
