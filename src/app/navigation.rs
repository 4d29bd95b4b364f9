use crate::handler::Operation;

use super::DevDash;

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

/// Moves focus to the next/previous field of the active tab, wrapping around.
pub(super) fn cycle_field(dash: &mut DevDash, forward: bool) -> bool {
    let Some(tab) = dash.tabs.get_mut(dash.active_tab) else {
        return false;
    };
    if tab.is_empty() {
        return false;
    }
    let next = cycle(tab.active_field(), tab.len(), forward);
    if !tab.set_active_field(next) {
        return false;
    }
    refresh_auto_edit(dash);
    true
}

/// Switches to the next/previous tab, wrapping around.
pub(super) fn cycle_tab(dash: &mut DevDash, forward: bool) -> bool {
    if dash.tabs.len() < 2 {
        return false;
    }
    dash.active_tab = cycle(dash.active_tab, dash.tabs.len(), forward);
    tracing::debug!(tab = dash.active_tab, "tab switched");
    on_tab_entered(dash);
    true
}

/// Runs the focused Interactive handler so its content shows, then re-evaluates edit mode.
pub(super) fn on_tab_entered(dash: &mut DevDash) {
    let tab_index = dash.active_tab;
    let refresh = dash
        .tabs
        .get(tab_index)
        .and_then(|tab| tab.focused())
        .filter(|field| field.handler().is_interactive() && !field.is_running())
        .map(|field| (field.index(), field.value()));

    if let Some((field_index, value)) = refresh {
        dash.trigger(tab_index, field_index, Operation::Change(value));
    }
    refresh_auto_edit(dash);
}

/// Enters edit mode on its own when the focused field asks for input: an Interactive
/// handler waiting for the user, or the only field of its tab being editable.
pub(super) fn refresh_auto_edit(dash: &mut DevDash) {
    if dash.edit_mode {
        return;
    }
    let prefill = dash.config.prefill_edit_buffer;
    let Some(tab) = dash.tabs.get_mut(dash.active_tab) else {
        return;
    };
    let only_field = tab.len() == 1;
    let Some(field) = tab.focused_mut() else {
        return;
    };
    if field.is_running() || !field.editable() {
        return;
    }
    let waiting = field.handler().is_interactive() && field.handler().waiting_for_user();
    if waiting || only_field {
        field.begin_edit(prefill);
        dash.edit_mode = true;
        tracing::debug!(field = %field.name(), waiting, "edit mode entered automatically");
    }
}

/// Starts editing the focused field. `false` when it is not editable right now.
pub(super) fn enter_edit_mode(dash: &mut DevDash) -> bool {
    let prefill = dash.config.prefill_edit_buffer;
    let Some(field) = dash
        .tabs
        .get_mut(dash.active_tab)
        .and_then(|tab| tab.focused_mut())
    else {
        return false;
    };
    if !field.editable() {
        return false;
    }
    field.begin_edit(prefill);
    dash.edit_mode = true;
    true
}

/// Leaves edit mode, clearing the focused field's buffer.
pub(super) fn leave_edit_mode(dash: &mut DevDash) {
    dash.edit_mode = false;
    if let Some(field) = dash
        .tabs
        .get_mut(dash.active_tab)
        .and_then(|tab| tab.focused_mut())
    {
        field.buffer_mut().clear();
    }
}

/// Jumps straight to a field; the caller has validated the address.
pub(super) fn focus(dash: &mut DevDash, tab_index: usize, field_index: usize) {
    if dash.edit_mode {
        leave_edit_mode(dash);
    }
    dash.active_tab = tab_index;
    if let Some(tab) = dash.tabs.get_mut(tab_index) {
        tab.set_active_field(field_index);
    }
}
