//! Keyboard handling: the Normal/Editing state machine.

use crate::core::event::{KeyCode, KeyInput};
use crate::engine::TriggerOutcome;
use crate::handler::{HandlerVariant, Operation};

use super::{navigation, DevDash, EventResult};

pub(super) fn handle_key(dash: &mut DevDash, key: &KeyInput) -> EventResult {
    if key.is_quit() {
        dash.exit.close();
        return EventResult::Quit;
    }
    if dash.edit_mode {
        handle_editing(dash, key)
    } else {
        handle_normal(dash, key)
    }
}

pub(super) fn handle_paste(dash: &mut DevDash, text: &str) -> EventResult {
    if !dash.edit_mode {
        return EventResult::Ignored;
    }
    let width = dash.available_text_width();
    let text: String = text.chars().filter(|c| !c.is_control()).collect();
    match focused_field_mut(dash) {
        Some(field) => {
            field.buffer_mut().insert(&text, width);
            EventResult::Consumed
        }
        None => EventResult::Ignored,
    }
}

fn handle_normal(dash: &mut DevDash, key: &KeyInput) -> EventResult {
    let handled = match key.code {
        KeyCode::Left => navigation::cycle_field(dash, false),
        KeyCode::Right => navigation::cycle_field(dash, true),
        KeyCode::Tab if key.modifiers.shift => navigation::cycle_tab(dash, false),
        KeyCode::Tab => navigation::cycle_tab(dash, true),
        KeyCode::BackTab => navigation::cycle_tab(dash, false),
        KeyCode::Enter => return activate_focused(dash),
        KeyCode::Esc => cancel_focused(dash),
        KeyCode::Char(_) => match key.printable() {
            Some(ch) => return dispatch_shortcut(dash, ch),
            None => false,
        },
        _ => false,
    };
    if handled {
        EventResult::Consumed
    } else {
        EventResult::Ignored
    }
}

fn handle_editing(dash: &mut DevDash, key: &KeyInput) -> EventResult {
    match key.code {
        KeyCode::Enter => {
            commit(dash);
            return EventResult::Consumed;
        }
        KeyCode::Esc => {
            navigation::leave_edit_mode(dash);
            return EventResult::Consumed;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            navigation::leave_edit_mode(dash);
            let forward = key.code == KeyCode::Tab && !key.modifiers.shift;
            navigation::cycle_tab(dash, forward);
            return EventResult::Consumed;
        }
        _ => {}
    }

    let width = dash.available_text_width();
    let Some(field) = focused_field_mut(dash) else {
        return EventResult::Ignored;
    };
    let buffer = field.buffer_mut();
    match key.code {
        KeyCode::Left => {
            buffer.move_left();
        }
        KeyCode::Right => {
            buffer.move_right();
        }
        KeyCode::Home => {
            buffer.move_home();
        }
        KeyCode::End => {
            buffer.move_end();
        }
        KeyCode::Backspace => {
            buffer.backspace();
        }
        KeyCode::Delete => {
            buffer.delete();
        }
        KeyCode::Char(_) => match key.printable() {
            Some(ch) => {
                let mut utf8 = [0u8; 4];
                buffer.insert(ch.encode_utf8(&mut utf8), width);
            }
            None => return EventResult::Ignored,
        },
        _ => return EventResult::Ignored,
    }
    EventResult::Consumed
}

/// Hands the buffer to the engine when it differs from the current value.
fn commit(dash: &mut DevDash) {
    dash.edit_mode = false;
    let tab_index = dash.active_tab;
    let Some(field) = focused_field_mut(dash) else {
        return;
    };
    let field_index = field.index();
    let pending = field.buffer_differs().then(|| field.buffer().text());
    field.buffer_mut().clear();

    if let Some(value) = pending {
        if let Some(TriggerOutcome::Busy) =
            dash.trigger(tab_index, field_index, Operation::Change(value))
        {
            tracing::warn!(
                tab = tab_index,
                field = field_index,
                "field still running, edit discarded"
            );
        }
    }
    navigation::refresh_auto_edit(dash);
}

/// Normal-mode Enter: edit, execute or refresh depending on the handler.
fn activate_focused(dash: &mut DevDash) -> EventResult {
    let tab_index = dash.active_tab;
    let Some(field) = dash.tabs.get(tab_index).and_then(|tab| tab.focused()) else {
        return EventResult::Ignored;
    };
    if field.editable() {
        navigation::enter_edit_mode(dash);
        return EventResult::Consumed;
    }

    let field_index = field.index();
    let op = match field.handler().variant() {
        HandlerVariant::Execution => Operation::Execute,
        HandlerVariant::Interactive => Operation::Change(field.value()),
        _ => return EventResult::Ignored,
    };
    dash.trigger(tab_index, field_index, op);
    EventResult::Consumed
}

fn cancel_focused(dash: &mut DevDash) -> bool {
    match dash.tabs.get(dash.active_tab).and_then(|tab| tab.focused()) {
        Some(field) if field.is_running() => dash.engine.cancel(field),
        _ => false,
    }
}

fn dispatch_shortcut(dash: &mut DevDash, key: char) -> EventResult {
    let Some(entry) = dash.shortcuts.get(key) else {
        return EventResult::Ignored;
    };
    if let Err(e) = entry.validate(&dash.tabs) {
        tracing::warn!(key = %key, error = %e, "stale shortcut ignored");
        return EventResult::Ignored;
    }

    navigation::focus(dash, entry.tab_index, entry.field_index);
    tracing::debug!(key = %key, handler = %entry.handler_name, "shortcut dispatched");
    if let Some(TriggerOutcome::Busy) = dash.trigger(
        entry.tab_index,
        entry.field_index,
        Operation::Change(entry.value),
    ) {
        tracing::warn!(
            key = %key,
            tab = entry.tab_index,
            field = entry.field_index,
            "field still running, shortcut dropped"
        );
    }
    navigation::refresh_auto_edit(dash);
    EventResult::Consumed
}

fn focused_field_mut(dash: &mut DevDash) -> Option<&mut crate::field::Field> {
    dash.tabs
        .get_mut(dash.active_tab)
        .and_then(|tab| tab.focused_mut())
}
