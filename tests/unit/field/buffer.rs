use super::*;

fn buffer_with(text: &str) -> EditBuffer {
    let mut buffer = EditBuffer::new();
    buffer.set(text);
    buffer
}

#[test]
fn insert_at_start_and_end() {
    let mut buffer = buffer_with("8080");
    buffer.move_home();
    assert!(buffer.insert("9", 40));
    assert_eq!(buffer.text(), "98080");
    assert_eq!(buffer.cursor(), 1);

    let mut buffer = buffer_with("8080");
    assert!(buffer.insert("9", 40));
    assert_eq!(buffer.text(), "80809");
    assert_eq!(buffer.cursor(), 5);
}

#[test]
fn cursor_moves_are_clamped() {
    let mut buffer = buffer_with("ab");
    assert!(!buffer.move_right());
    assert_eq!(buffer.cursor(), 2);
    assert!(buffer.move_left());
    assert!(buffer.move_left());
    assert!(!buffer.move_left());
    assert_eq!(buffer.cursor(), 0);

    buffer.set_cursor(99);
    assert_eq!(buffer.cursor(), 2);
}

#[test]
fn backspace_removes_rune_left_of_cursor() {
    let mut buffer = buffer_with("héllo");
    buffer.move_left();
    buffer.move_left();
    buffer.move_left();
    assert!(buffer.backspace());
    assert_eq!(buffer.text(), "hllo");
    assert_eq!(buffer.cursor(), 1);

    buffer.move_home();
    assert!(!buffer.backspace());
    assert_eq!(buffer.text(), "hllo");
}

#[test]
fn delete_removes_rune_under_cursor() {
    let mut buffer = buffer_with("abc");
    assert!(!buffer.delete());
    buffer.move_home();
    assert!(buffer.delete());
    assert_eq!(buffer.text(), "bc");
    assert_eq!(buffer.cursor(), 0);
}

#[test]
fn multibyte_runes_are_single_positions() {
    let mut buffer = EditBuffer::new();
    assert!(buffer.insert("日本", 10));
    buffer.move_left();
    assert!(buffer.insert("語", 10));
    assert_eq!(buffer.text(), "日語本");
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.cursor(), 2);
    assert_eq!(buffer.split_at_cursor(), ("日語".to_string(), "本".to_string()));
}

#[test]
fn width_guard_drops_insert_that_reaches_budget() {
    let mut buffer = buffer_with("abcd");
    assert!(!buffer.insert("e", 5));
    assert_eq!(buffer.text(), "abcd");
    assert_eq!(buffer.cursor(), 4);

    assert!(!buffer.insert("xy", 6));
    assert_eq!(buffer.text(), "abcd");

    assert!(buffer.insert("x", 6));
    assert_eq!(buffer.text(), "abcdx");
}

#[test]
fn empty_insert_is_noop() {
    let mut buffer = EditBuffer::new();
    assert!(!buffer.insert("", 10));
    assert!(buffer.is_empty());
}

#[test]
fn cursor_stays_in_bounds_for_mixed_sequence() {
    let mut buffer = EditBuffer::new();
    let width = 8;
    let ops: &[&str] = &[
        "ins:a", "ins:ñ", "left", "left", "left", "bs", "ins:xyz", "right", "right", "right",
        "ins:1234567", "bs", "bs", "home", "ins:é", "end", "bs", "bs", "bs", "bs", "bs", "bs",
        "left", "right", "ins:ok",
    ];

    for op in ops {
        match *op {
            "left" => {
                buffer.move_left();
            }
            "right" => {
                buffer.move_right();
            }
            "bs" => {
                buffer.backspace();
            }
            "home" => {
                buffer.move_home();
            }
            "end" => {
                buffer.move_end();
            }
            other => {
                let text = other.strip_prefix("ins:").unwrap();
                buffer.insert(text, width);
            }
        }
        assert!(buffer.cursor() <= buffer.len(), "after {op}: {buffer:?}");
        assert!(buffer.len() < width, "after {op}: {buffer:?}");
    }
}
