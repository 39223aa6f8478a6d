//! End-to-end editing flows through `EditingSession`.

use kurbo::{Point, Vec2};
use postercraft_core::{
    CommitPolicy, EditingSession, EditorConfig, ElementId, KeyEvent, PointerEvent, PointerTarget,
};
use std::time::{Duration, Instant};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_session() -> EditingSession {
    init_logging();
    let mut session: EditingSession = EditingSession::default();
    session.load_sample().unwrap();
    session
}

fn element_with_class(session: &EditingSession, class: &str) -> ElementId {
    session
        .store()
        .document()
        .elements_ordered()
        .find(|e| e.attribute("class") == Some(class))
        .unwrap()
        .id()
}

fn origin_of(session: &EditingSession, id: ElementId) -> Point {
    session.store().rect_of(id).unwrap().origin()
}

/// Drag the selected element so its top-left corner lands on `target`.
fn drag_selected_to(session: &mut EditingSession, target: Point) {
    let rect = session.selected_rect().unwrap();
    let handle = session.overlay().unwrap().move_handle().unwrap().position;
    let delta: Vec2 = target - rect.origin();
    assert!(session.pointer_event(PointerEvent::Down { position: handle }).unwrap());
    session.pointer_event(PointerEvent::Move { position: handle + delta * 0.5 }).unwrap();
    session.pointer_event(PointerEvent::Move { position: handle + delta }).unwrap();
    assert!(session.pointer_event(PointerEvent::Up { position: handle + delta }).unwrap());
}

#[test]
fn test_sample_loads_as_single_entry() {
    let session = sample_session();
    assert_eq!(session.history().len(), 1);
    assert!(!session.can_undo());
    assert!(!session.can_redo());
    // poster, h1, p, strong, img
    assert_eq!(session.store().len(), 5);
    assert_eq!(
        session.status_line(),
        "No element selected • Click an element to edit"
    );
}

#[test]
fn test_drag_is_clamped_and_undoable() {
    let mut session = sample_session();
    let hero = element_with_class(&session, "hero");

    assert!(session.click_at(Point::new(500.0, 500.0)));
    assert_eq!(session.selected_id(), Some(hero));

    drag_selected_to(&mut session, Point::new(100.0, 100.0));
    assert_eq!(origin_of(&session, hero), Point::new(100.0, 100.0));
    assert_eq!(session.history().len(), 2);

    // Past the bottom-right corner the 380px image stops at 340.
    drag_selected_to(&mut session, Point::new(720.0, 720.0));
    assert_eq!(origin_of(&session, hero), Point::new(340.0, 340.0));
    assert_eq!(session.history().len(), 3);

    assert!(session.undo().unwrap());
    assert_eq!(origin_of(&session, hero), Point::new(100.0, 100.0));
    assert_eq!(session.selected_id(), None);

    assert!(session.redo().unwrap());
    assert_eq!(origin_of(&session, hero), Point::new(340.0, 340.0));
    assert!(!session.can_redo());
}

#[test]
fn test_clamped_drag_without_movement_records_nothing() {
    let mut session = sample_session();
    let hero = element_with_class(&session, "hero");
    session.click(PointerTarget::Element(hero));

    drag_selected_to(&mut session, Point::new(720.0, 720.0));
    assert_eq!(origin_of(&session, hero), Point::new(340.0, 340.0));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_new_edit_discards_redo_branch() {
    let mut session = sample_session();
    let hero = element_with_class(&session, "hero");
    session.click(PointerTarget::Element(hero));
    drag_selected_to(&mut session, Point::new(0.0, 0.0));
    session.undo().unwrap();
    assert!(session.can_redo());

    session.click(PointerTarget::Element(hero));
    drag_selected_to(&mut session, Point::new(50.0, 50.0));
    assert!(!session.can_redo());
    assert_eq!(session.history().len(), 2);

    session.undo().unwrap();
    assert_eq!(origin_of(&session, hero), Point::new(340.0, 340.0));
}

#[test]
fn test_history_is_bounded() {
    init_logging();
    let config = EditorConfig {
        max_history: 3,
        ..EditorConfig::default()
    };
    let mut session = EditingSession::new(config).unwrap();
    session.load_sample().unwrap();
    let hero = element_with_class(&session, "hero");

    for step in 1..=5 {
        session.click(PointerTarget::Element(hero));
        drag_selected_to(&mut session, Point::new(step as f64 * 10.0, 0.0));
    }
    assert_eq!(session.history().len(), 3);

    let mut undos = 0;
    while session.undo().unwrap() {
        undos += 1;
    }
    assert_eq!(undos, 2);
    assert_eq!(origin_of(&session, hero), Point::new(30.0, 0.0));
}

#[test]
fn test_selection_invalidated_by_delete_and_undo() {
    let mut session = sample_session();
    let title = element_with_class(&session, "title");
    session.click(PointerTarget::Element(title));

    assert!(session.key_down(&KeyEvent::plain("Delete")).unwrap());
    assert_eq!(session.selected_id(), None);
    assert!(session.overlay().is_none());
    assert!(!session.store().contains(title));

    session.commit_now().unwrap();
    session.undo().unwrap();
    assert!(session.store().contains(title));
    assert_eq!(session.selected_id(), None);
    assert!(session.properties().is_none());
}

#[test]
fn test_debounced_commits() {
    let mut session = sample_session();
    let before = Instant::now();
    session.add_text().unwrap();
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.poll_commits(before).unwrap(), 0);

    let due = session.next_commit_due().unwrap();
    assert!(due >= before + Duration::from_millis(50));
    assert_eq!(session.poll_commits(due + Duration::from_secs(1)).unwrap(), 1);
    assert_eq!(session.history().len(), 2);
    assert!(session.next_commit_due().is_none());
}

#[test]
fn test_fire_each_records_every_timer() {
    let mut session = sample_session();
    let title = element_with_class(&session, "title");
    session.click(PointerTarget::Element(title));
    session.update_property("fontSize", "30");
    session.update_property("fontSize", "32");
    session.update_property("fontSize", "34");

    let later = Instant::now() + Duration::from_secs(1);
    assert_eq!(session.poll_commits(later).unwrap(), 3);
    assert_eq!(session.history().len(), 4);
}

#[test]
fn test_coalesce_records_one_entry() {
    init_logging();
    let config = EditorConfig {
        commit_policy: CommitPolicy::Coalesce,
        ..EditorConfig::default()
    };
    let mut session = EditingSession::new(config).unwrap();
    session.load_sample().unwrap();
    let title = element_with_class(&session, "title");
    session.click(PointerTarget::Element(title));
    session.update_property("fontSize", "30");
    session.update_property("fontSize", "34");

    let later = Instant::now() + Duration::from_secs(1);
    assert_eq!(session.poll_commits(later).unwrap(), 1);
    assert_eq!(session.history().len(), 2);
    assert_eq!(
        session.store().get(title).unwrap().style.get("font-size"),
        Some("34px")
    );
}

#[test]
fn test_import_sanitizes_and_export_round_trips() {
    init_logging();
    let mut session: EditingSession = EditingSession::default();
    session
        .import(
            r#"<div class="poster" onclick="steal()"><script>alert(1)</script><p style="left: 10px; top: 20px;">Hi &amp; bye</p><a href="javascript:alert(1)">link</a></div>"#,
        )
        .unwrap();

    let markup = session.markup();
    assert!(!markup.contains("script"));
    assert!(!markup.contains("onclick"));
    assert!(!markup.contains("javascript:"));

    let exported = session.export();
    assert_eq!(exported.filename, "edited-poster.html");
    assert!(exported.content.contains("Hi &amp; bye"));

    // Re-importing the exported body yields the same document structure.
    let mut second: EditingSession = EditingSession::default();
    second.import(&exported.content).unwrap();
    assert_eq!(second.markup(), markup);
}

#[test]
fn test_editing_text_then_exporting() {
    let mut session = sample_session();
    let subtitle = element_with_class(&session, "subtitle");
    session.click(PointerTarget::Element(subtitle));
    assert!(session.double_click());
    assert!(session.markup().contains("contenteditable"));

    // Undo is typed into the text, not applied to the document.
    assert!(!session.key_down(&KeyEvent::ctrl("z")).unwrap());
    session.set_text_content("Everything must go");
    assert!(session.end_text_edit().unwrap());

    let exported = session.export();
    assert!(exported.content.contains("Everything must go"));
    assert!(!exported.content.contains("contenteditable"));
    assert!(!exported.content.contains("<strong>"));
}

#[test]
fn test_image_upload() {
    let mut session = sample_session();
    let hero = element_with_class(&session, "hero");
    session.click(PointerTarget::Element(hero));

    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    assert!(session.set_image_data(&png).unwrap());
    let src = session.store().get(hero).unwrap().attribute("src").unwrap();
    assert!(src.starts_with("data:image/png;base64,"));

    assert!(session.set_image_data(b"plain text").is_err());
    assert!(
        session
            .store()
            .get(hero)
            .unwrap()
            .attribute("src")
            .unwrap()
            .starts_with("data:image/png")
    );
}

#[test]
fn test_redo_clears_live_selection() {
    let mut session = sample_session();
    let hero = element_with_class(&session, "hero");
    let title = element_with_class(&session, "title");
    session.click(PointerTarget::Element(hero));
    drag_selected_to(&mut session, Point::new(100.0, 100.0));
    session.click(PointerTarget::Element(hero));
    drag_selected_to(&mut session, Point::new(200.0, 200.0));
    session.undo().unwrap();
    session.undo().unwrap();

    session.click(PointerTarget::Element(title));
    assert!(session.redo().unwrap());
    assert_eq!(session.selected_id(), None);
    assert!(session.overlay().is_none());
    assert_eq!(origin_of(&session, hero), Point::new(100.0, 100.0));

    session.click(PointerTarget::Element(title));
    assert!(session.key_down(&KeyEvent::ctrl("y")).unwrap());
    assert_eq!(session.selected_id(), None);
    assert!(session.overlay().is_none());
    assert_eq!(origin_of(&session, hero), Point::new(200.0, 200.0));
}

#[test]
fn test_extreme_inline_offsets_do_not_break_clicks() {
    init_logging();
    let mut session: EditingSession = EditingSession::default();
    session
        .import(r#"<img style="left: 2147483000px; top: 0px; width: 1000px; height: 10px;">"#)
        .unwrap();
    assert!(!session.click_at(Point::new(5.0, 5.0)));
    assert_eq!(session.selected_id(), None);

    session
        .import(r#"<div style="left: 2000000000px;"><p style="left: 2000000000px;">far</p></div>"#)
        .unwrap();
    let p = session
        .store()
        .document()
        .elements_ordered()
        .find(|e| e.tag == "p")
        .unwrap()
        .id();
    assert!(session.click(PointerTarget::Element(p)));
    assert_eq!(session.selected_rect().map(|r| r.x0), Some(2_000_000.0));
}
