use super::*;
use crate::core::event::{KeyCode, KeyInput, KeyModifiers};
use crate::ledger::MessageType;
use crate::test_support::{Action, ActionBehavior, InfoDisplay, ValueEdit, Wizard};

fn dash() -> DevDash {
    DevDash::new(DashConfig::default()).unwrap()
}

fn press(dash: &mut DevDash, code: KeyCode) -> EventResult {
    dash.handle_input(&InputEvent::Key(KeyInput::simple(code)))
}

fn type_text(dash: &mut DevDash, text: &str) {
    for ch in text.chars() {
        dash.handle_input(&InputEvent::Key(KeyInput::char(ch)));
    }
}

fn buffer(dash: &DevDash) -> (String, usize) {
    let field = dash.active_tab_section().unwrap().focused().unwrap();
    (field.buffer().text(), field.buffer().cursor())
}

fn three_displays(dash: &mut DevDash) -> usize {
    let tab = dash.new_tab("Info", "read only");
    for name in ["a", "b", "c"] {
        dash.add_field(tab, HandlerFacade::display(InfoDisplay::new(name, name)), None);
    }
    tab
}

#[test]
fn left_and_right_wrap_around_fields() {
    let mut dash = dash();
    three_displays(&mut dash);

    assert!(press(&mut dash, KeyCode::Left).is_consumed());
    assert_eq!(dash.active_tab_section().unwrap().active_field(), 2);
    press(&mut dash, KeyCode::Right);
    assert_eq!(dash.active_tab_section().unwrap().active_field(), 0);
    assert!(!dash.edit_mode());
}

#[test]
fn tab_and_back_tab_wrap_around_tabs() {
    let mut dash = dash();
    three_displays(&mut dash);
    three_displays(&mut dash);
    three_displays(&mut dash);

    press(&mut dash, KeyCode::BackTab);
    assert_eq!(dash.active_tab(), 2);
    press(&mut dash, KeyCode::Tab);
    assert_eq!(dash.active_tab(), 0);
    dash.handle_input(&InputEvent::Key(KeyInput::new(
        KeyCode::Tab,
        KeyModifiers::SHIFT,
    )));
    assert_eq!(dash.active_tab(), 2);
}

#[test]
fn enter_edits_with_blank_buffer_and_commits_change() {
    let mut dash = dash();
    let tab = three_displays(&mut dash);
    let port = Arc::new(ValueEdit::new("port", "8080"));
    let index = dash
        .add_field(tab, HandlerFacade::edit(port.clone()), None)
        .unwrap();
    dash.tab_mut(tab).unwrap().set_active_field(index);

    press(&mut dash, KeyCode::Enter);
    assert!(dash.edit_mode());
    assert_eq!(buffer(&dash), (String::new(), 0));

    type_text(&mut dash, "9090");
    press(&mut dash, KeyCode::Enter);

    assert!(!dash.edit_mode());
    assert_eq!(port.current(), "9090");
    assert_eq!(buffer(&dash).0, "");
    let row = dash.tab(tab).unwrap().ledger().last().unwrap();
    assert_eq!(row.handler_name, "port");
    assert_eq!(row.content, "9090");
}

#[test]
fn esc_discards_without_calling_handler() {
    let mut dash = dash();
    let tab = three_displays(&mut dash);
    let port = Arc::new(ValueEdit::new("port", "8080"));
    let index = dash
        .add_field(tab, HandlerFacade::edit(port.clone()), None)
        .unwrap();
    dash.tab_mut(tab).unwrap().set_active_field(index);

    press(&mut dash, KeyCode::Enter);
    type_text(&mut dash, "1");
    press(&mut dash, KeyCode::Esc);

    assert!(!dash.edit_mode());
    assert_eq!(port.calls(), 0);
    assert_eq!(buffer(&dash).0, "");
    assert!(dash.tab(tab).unwrap().ledger().is_empty());
}

#[test]
fn prefilled_buffer_inserts_at_cursor() {
    let config = DashConfig {
        prefill_edit_buffer: true,
        ..DashConfig::default()
    };
    let mut dash = DevDash::new(config).unwrap();
    let tab = three_displays(&mut dash);
    let port = Arc::new(ValueEdit::new("port", "8080"));
    let index = dash
        .add_field(tab, HandlerFacade::edit(port.clone()), None)
        .unwrap();
    dash.tab_mut(tab).unwrap().set_active_field(index);

    press(&mut dash, KeyCode::Enter);
    assert_eq!(buffer(&dash), ("8080".to_string(), 4));
    for _ in 0..4 {
        press(&mut dash, KeyCode::Left);
    }
    type_text(&mut dash, "9");
    assert_eq!(buffer(&dash), ("98080".to_string(), 1));
    press(&mut dash, KeyCode::Esc);

    press(&mut dash, KeyCode::Enter);
    type_text(&mut dash, "9");
    assert_eq!(buffer(&dash), ("80809".to_string(), 5));

    // Committing the unchanged value is a no-op.
    press(&mut dash, KeyCode::Backspace);
    press(&mut dash, KeyCode::Enter);
    assert_eq!(port.calls(), 0);
}

#[test]
fn insertion_respects_available_width() {
    let mut dash = dash();
    let tab = three_displays(&mut dash);
    let index = dash
        .add_field(tab, HandlerFacade::edit(Arc::new(ValueEdit::new("n", ""))), None)
        .unwrap();
    dash.tab_mut(tab).unwrap().set_active_field(index);
    let chrome = dash.config().label_width + crate::config::FIELD_CHROME_WIDTH;
    dash.handle_input(&InputEvent::Resize((chrome + 3) as u16, 24));
    assert_eq!(dash.available_text_width(), 3);

    press(&mut dash, KeyCode::Enter);
    type_text(&mut dash, "abc");
    assert_eq!(buffer(&dash), ("ab".to_string(), 2));

    dash.handle_input(&InputEvent::Paste("xy".into()));
    assert_eq!(buffer(&dash).0, "ab");
}

#[test]
fn failing_execution_writes_one_error_row() {
    let mut dash = dash();
    let tab = dash.new_tab("Deploy", "");
    dash.add_field(
        tab,
        HandlerFacade::execution(Arc::new(Action::new(
            "deploy",
            ActionBehavior::Fail("registry unreachable".into()),
        ))),
        None,
    );
    dash.add_field(tab, HandlerFacade::display(InfoDisplay::new("about", "")), None);

    assert!(press(&mut dash, KeyCode::Enter).is_consumed());

    let rows = dash.tab(tab).unwrap().messages();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, MessageType::Error);
    assert!(rows[0].content.contains("deploy"));
    assert!(rows[0].content.contains("registry unreachable"));
    let view = dash.view();
    assert_eq!(view.fields[0].value, "Run deploy");
    assert!(!dash.edit_mode());
}

#[test]
fn waiting_interactive_updates_a_single_row() {
    let mut dash = dash();
    let tab = dash.new_tab("Setup", "");
    let wizard = Arc::new(Wizard::new("lang", "EN", true));
    dash.add_field(tab, HandlerFacade::interactive(wizard.clone()), None);
    dash.add_field(tab, HandlerFacade::display(InfoDisplay::new("about", "")), None);

    dash.activate();
    assert!(dash.edit_mode());
    let ledger = Arc::clone(dash.tab(tab).unwrap().ledger());
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.last().unwrap().content, "EN");

    type_text(&mut dash, "ES");
    press(&mut dash, KeyCode::Enter);
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.last().unwrap().content, "ES");
    assert!(dash.edit_mode(), "still waiting for the user");

    dash.trigger(tab, 0, Operation::Change("ES".into()));
    assert_eq!(ledger.len(), 1);
    dash.trigger(tab, 0, Operation::Change("FR".into()));
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.last().unwrap().content, "FR");
}

#[test]
fn idle_interactive_refreshes_on_enter() {
    let mut dash = dash();
    let tab = three_displays(&mut dash);
    let wizard = Arc::new(Wizard::new("lang", "EN", false));
    let index = dash
        .add_field(tab, HandlerFacade::interactive(wizard.clone()), None)
        .unwrap();
    dash.tab_mut(tab).unwrap().set_active_field(index);

    press(&mut dash, KeyCode::Enter);
    assert!(!dash.edit_mode());
    assert_eq!(wizard.calls(), 1);
    assert_eq!(dash.tab(tab).unwrap().ledger().last().unwrap().content, "EN");
}

#[test]
fn switching_tabs_runs_interactive_content() {
    let mut dash = dash();
    three_displays(&mut dash);
    let tab = dash.new_tab("Setup", "");
    let wizard = Arc::new(Wizard::new("lang", "EN", false));
    dash.add_field(tab, HandlerFacade::interactive(wizard.clone()), None);
    dash.add_field(tab, HandlerFacade::display(InfoDisplay::new("about", "")), None);

    press(&mut dash, KeyCode::Tab);
    assert_eq!(dash.active_tab(), tab);
    assert_eq!(wizard.calls(), 1);
    assert!(!dash.edit_mode());

    wizard.waiting.store(true, std::sync::atomic::Ordering::SeqCst);
    press(&mut dash, KeyCode::Tab);
    press(&mut dash, KeyCode::Tab);
    assert_eq!(wizard.calls(), 2);
    assert!(dash.edit_mode());
}

#[test]
fn single_editable_field_enters_edit_mode_automatically() {
    let mut dash = dash();
    let tab = dash.new_tab("Name", "");
    let name = Arc::new(ValueEdit::new("name", "demo"));
    dash.add_field(tab, HandlerFacade::edit(name.clone()), None);

    dash.activate();
    assert!(dash.edit_mode());

    type_text(&mut dash, "app");
    press(&mut dash, KeyCode::Enter);
    assert_eq!(name.current(), "app");
    assert!(dash.edit_mode());
}

#[test]
fn shortcut_jumps_focus_and_changes_value() {
    let mut dash = dash();
    three_displays(&mut dash);
    let tab = dash.new_tab("Settings", "");
    dash.add_field(tab, HandlerFacade::display(InfoDisplay::new("about", "")), None);
    let lang = Arc::new(ValueEdit::new("lang", "es").shortcut('e', "en"));
    dash.add_field(tab, HandlerFacade::edit(lang.clone()), None);
    assert_eq!(dash.shortcuts().len(), 1);

    assert!(press(&mut dash, KeyCode::Char('e')).is_consumed());

    assert_eq!(dash.active_tab(), tab);
    assert_eq!(dash.active_tab_section().unwrap().active_field(), 1);
    assert_eq!(lang.current(), "en");
    assert!(press(&mut dash, KeyCode::Char('q')).is_ignored());
}

#[test]
fn shortcut_on_running_field_is_dropped() {
    let mut dash = dash();
    let tab = dash.new_tab("Settings", "");
    let lang = Arc::new(
        ValueEdit::new("lang", "es")
            .timeout(Duration::from_secs(2))
            .delay(Duration::from_millis(200))
            .shortcut('e', "en")
            .shortcut('f', "fr"),
    );
    dash.add_field(tab, HandlerFacade::edit(lang.clone()), None);
    dash.add_field(tab, HandlerFacade::display(InfoDisplay::new("about", "")), None);

    assert!(press(&mut dash, KeyCode::Char('e')).is_consumed());
    assert!(dash.view().fields[0].running);
    assert!(press(&mut dash, KeyCode::Char('f')).is_consumed());

    assert!(dash.wait_idle(Duration::from_secs(3)));
    assert_eq!(lang.calls(), 1);
    assert_eq!(lang.current(), "en");
}

#[test]
fn shortcuts_register_for_fields_added_after_tab() {
    let mut dash = dash();
    let mut section = TabSection::new("Built", "");
    section.add_edit(Arc::new(ValueEdit::new("host", "localhost").shortcut('h', "0.0.0.0")));
    let built = dash.add_tab(section);
    let later = three_displays(&mut dash);
    let port = Arc::new(ValueEdit::new("port", "8080").shortcut('p', "9090"));
    let port_index = dash
        .add_field(later, HandlerFacade::edit(port.clone()), None)
        .unwrap();

    let keys: Vec<(char, usize, usize)> = dash
        .shortcuts()
        .entries()
        .into_iter()
        .map(|e| (e.key, e.tab_index, e.field_index))
        .collect();
    assert_eq!(keys, vec![('h', built, 0), ('p', later, port_index)]);

    press(&mut dash, KeyCode::Char('p'));
    assert_eq!(port.current(), "9090");
    assert_eq!(dash.active_tab(), later);
}

#[test]
fn stale_shortcut_is_ignored() {
    let mut dash = dash();
    let tab = three_displays(&mut dash);
    let lang = Arc::new(ValueEdit::new("lang", "es"));
    dash.add_field(tab, HandlerFacade::edit(lang.clone()), None);
    dash.shortcuts().register(ShortcutEntry {
        key: 'x',
        description: "points at a display".into(),
        tab_index: tab,
        field_index: 1,
        handler_name: "lang".into(),
        value: "en".into(),
    });
    dash.shortcuts().register(ShortcutEntry {
        key: 'y',
        description: "missing tab".into(),
        tab_index: 9,
        field_index: 0,
        handler_name: "lang".into(),
        value: "en".into(),
    });

    assert!(press(&mut dash, KeyCode::Char('x')).is_ignored());
    assert!(press(&mut dash, KeyCode::Char('y')).is_ignored());
    assert_eq!(lang.calls(), 0);
    assert_eq!(dash.active_tab_section().unwrap().active_field(), 0);
}

#[test]
fn ctrl_c_quits_from_any_mode() {
    let mut dash = dash();
    let tab = dash.new_tab("Name", "");
    dash.add_field(tab, HandlerFacade::edit(Arc::new(ValueEdit::new("n", ""))), None);
    dash.activate();
    assert!(dash.edit_mode());

    let quit = dash.handle_input(&InputEvent::Key(KeyInput::ctrl(KeyCode::Char('c'))));
    assert!(quit.is_quit());
    assert!(dash.exit_signal().is_closed());

    let again = dash.handle_input(&InputEvent::Key(KeyInput::ctrl(KeyCode::Char('c'))));
    assert!(again.is_quit());
}

#[test]
fn running_field_rejects_retrigger_and_esc_cancels() {
    let mut dash = dash();
    let tab = dash.new_tab("Build", "");
    let action = Arc::new(
        Action::new(
            "build",
            ActionBehavior::Slow {
                total: Duration::from_secs(5),
                cooperative: true,
            },
        )
        .timeout(Duration::from_secs(10)),
    );
    dash.add_field(tab, HandlerFacade::execution(action.clone()), None);
    dash.add_field(tab, HandlerFacade::display(InfoDisplay::new("about", "")), None);

    press(&mut dash, KeyCode::Enter);
    assert!(dash.view().fields[0].running);
    press(&mut dash, KeyCode::Enter);
    assert!(press(&mut dash, KeyCode::Esc).is_consumed());

    assert!(dash.wait_idle(Duration::from_secs(3)));
    assert_eq!(action.calls(), 1);
    let row = dash.tab(tab).unwrap().ledger().last().unwrap();
    assert_eq!(row.kind, MessageType::Warning);
    assert!(row.content.contains("operation cancelled"));
    assert!(press(&mut dash, KeyCode::Esc).is_ignored());
}

#[test]
fn view_projects_active_tab() {
    let mut dash = dash();
    let tab = dash.new_tab("Info", "about this tool");
    dash.add_field(
        tab,
        HandlerFacade::display(InfoDisplay::new("about", "v1.0")),
        Some("cyan".into()),
    );
    let port = Arc::new(ValueEdit::new("port", "8080"));
    dash.add_field(tab, HandlerFacade::edit(port), None);
    dash.handle_input(&InputEvent::Key(KeyInput::simple(KeyCode::Right)));
    press(&mut dash, KeyCode::Enter);
    type_text(&mut dash, "90");

    let view = dash.view();
    assert_eq!(view.tabs.len(), 1);
    assert_eq!(view.active_tab_view().unwrap().description, "about this tool");
    assert_eq!(view.fields[0].value, "v1.0");
    assert_eq!(view.fields[0].label, "about label");
    assert_eq!(view.fields[0].color.as_deref(), Some("cyan"));
    let focused = view.focused_field().unwrap();
    assert_eq!(focused.name, "port");
    assert_eq!(focused.value, "8080");
    assert_eq!(focused.editing, Some(("90".to_string(), 2)));
    assert!(view.edit_mode);
}
