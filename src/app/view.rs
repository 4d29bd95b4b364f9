//! Read-only projection of the dashboard for renderers.

use crate::handler::HandlerVariant;
use crate::ledger::MessageEntry;

use super::shortcuts::ShortcutEntry;
use super::DevDash;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub index: usize,
    pub name: String,
    pub variant: HandlerVariant,
    pub label: String,
    /// Display content, the button label for actions, the current value otherwise.
    pub value: String,
    pub editable: bool,
    pub focused: bool,
    /// Buffer text and cursor while this field is being edited.
    pub editing: Option<(String, usize)>,
    pub running: bool,
    pub color: Option<String>,
    pub latest: Option<MessageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashView {
    pub tabs: Vec<TabView>,
    pub active_tab: usize,
    pub fields: Vec<FieldView>,
    pub messages: Vec<MessageEntry>,
    pub edit_mode: bool,
    pub shortcuts: Vec<ShortcutEntry>,
}

impl DashView {
    pub fn focused_field(&self) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.focused)
    }

    pub fn active_tab_view(&self) -> Option<&TabView> {
        self.tabs.get(self.active_tab)
    }
}

pub(super) fn project(dash: &DevDash) -> DashView {
    let tabs = dash
        .tabs
        .iter()
        .enumerate()
        .map(|(index, tab)| TabView {
            index,
            title: tab.title().to_string(),
            description: tab.description().to_string(),
            active: index == dash.active_tab,
        })
        .collect();

    let (fields, messages) = match dash.tabs.get(dash.active_tab) {
        Some(tab) => {
            let fields = tab
                .fields()
                .iter()
                .map(|field| {
                    let handler = field.handler();
                    let focused = field.index() == tab.active_field();
                    FieldView {
                        index: field.index(),
                        name: field.name().to_string(),
                        variant: handler.variant(),
                        label: handler.label(),
                        value: handler.value(),
                        editable: field.editable(),
                        focused,
                        editing: (focused && dash.edit_mode)
                            .then(|| (field.buffer().text(), field.buffer().cursor())),
                        running: field.is_running(),
                        color: field.color().map(str::to_string),
                        latest: tab.ledger().latest_for(field.name()),
                    }
                })
                .collect();
            (fields, tab.messages())
        }
        None => (Vec::new(), Vec::new()),
    };

    DashView {
        tabs,
        active_tab: dash.active_tab,
        fields,
        messages,
        edit_mode: dash.edit_mode,
        shortcuts: dash.shortcuts.entries(),
    }
}
