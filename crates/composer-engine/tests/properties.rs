//! End-to-end behaviour of the composer core: editing, merge tags and preview
//! working together the way a host application drives them.

use composer_engine::merge_tags::{StaticCatalogSource, default_catalog, default_groups};
use composer_engine::{
    Editor, EditorMode, FormatCommand, PreviewFormat, TagPicker, TextRange, render, resolve,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

// ============ Editing ============

#[rstest]
#[case("<p>Hello <b>{{resident.first_name}}</b></p>")]
#[case("<P>Dear {{resident.name}},<P>Your balance is {{financial.balance}}.")]
#[case("<ul><li>One<li>Two</ul><p style=\"text-align: center;\">Thanks</p>")]
#[case("Plain text with {{date.today}}")]
fn mode_round_trip_only_normalizes(#[case] content: &str) {
    let mut editor = Editor::with_mode(content, EditorMode::Source);
    assert_eq!(editor.get_content(), content);

    editor.switch_mode(EditorMode::Visual);
    let normalized = editor.get_content();
    editor.switch_mode(EditorMode::Source);
    editor.switch_mode(EditorMode::Visual);

    assert_eq!(editor.get_content(), normalized);
    assert_eq!(composer_html::normalize_html(content), normalized);
}

#[rstest]
fn formatted_content_survives_mode_round_trip(
    #[values(
        "<p>Hello world</p>",
        "<li>Pool hours</li>",
        "<ul><li><b><p>xy</p></b></li></ul>",
        "<b><p>xy</p></b>"
    )]
    content: &str,
    #[values(
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::UnorderedList,
        FormatCommand::OrderedList,
        FormatCommand::JustifyLeft,
        FormatCommand::JustifyCenter,
        FormatCommand::JustifyRight,
        FormatCommand::CreateLink("https://example.com".into()),
        FormatCommand::InsertImage("cid:logo".into())
    )]
    command: FormatCommand,
) {
    let mut editor = Editor::new(content);
    assert!(editor.select_visual_text(0..2));
    assert!(editor.format(&command), "{} did nothing", command.name());
    let formatted = editor.get_content();
    assert_eq!(composer_html::normalize_html(&formatted), formatted);

    editor.switch_mode(EditorMode::Source);
    editor.switch_mode(EditorMode::Visual);
    assert_eq!(editor.get_content(), formatted);
}

#[rstest]
#[case(EditorMode::Visual)]
#[case(EditorMode::Source)]
fn consecutive_inserts_at_anchor(#[case] mode: EditorMode) {
    let mut editor = Editor::with_mode("AB", mode);
    let selected = match mode {
        EditorMode::Visual => editor.select_visual_text(1..1),
        EditorMode::Source => editor.select_source(TextRange::caret(1)),
    };
    assert!(selected);
    editor.insert_at_cursor("X");
    assert_eq!(editor.get_content(), "AXB");
    editor.insert_at_cursor("Y");
    assert_eq!(editor.get_content(), "AXYB");
}

#[rstest]
#[case(EditorMode::Visual)]
#[case(EditorMode::Source)]
fn insert_without_anchor_appends(#[case] mode: EditorMode) {
    let mut editor = Editor::with_mode("AB", mode);
    editor.insert_at_cursor("Z");
    assert_eq!(editor.get_content(), "ABZ");
}

#[test]
fn focus_lost_to_dialog_appends_unless_restored() {
    let mut editor = Editor::new("AB");
    editor.select_visual_text(1..1);
    editor.blur();
    editor.insert_at_cursor("Z");
    assert_eq!(editor.get_content(), "ABZ");
}

#[rstest]
#[case(EditorMode::Visual)]
#[case(EditorMode::Source)]
fn read_only_editor_ignores_local_changes(#[case] mode: EditorMode) {
    let mut editor = Editor::with_mode("<p>Hello</p>", mode);
    editor.focus();
    editor.set_read_only(true);
    for command in [
        FormatCommand::Bold,
        FormatCommand::UnorderedList,
        FormatCommand::JustifyCenter,
        FormatCommand::CreateLink("https://example.com".into()),
        FormatCommand::InsertImage("cid:logo".into()),
    ] {
        assert!(!editor.format(&command));
    }
    editor.insert_at_cursor("{{resident.name}}");
    assert_eq!(editor.get_content(), "<p>Hello</p>");
}

#[test]
fn same_content_notifies_once() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);

    let mut editor = Editor::with_mode("", EditorMode::Source);
    editor.on_change(move |content| sink.borrow_mut().push(content.to_string()));
    editor.focus();
    editor.type_text("Hi");
    editor.commit();
    editor.switch_mode(EditorMode::Visual);
    editor.switch_mode(EditorMode::Source);
    editor.commit();

    assert_eq!(*changes.borrow(), vec!["Hi".to_string()]);
}

// ============ Merge tags ============

#[rstest]
#[case("Hello {{resident.first_name}}, {{unknown.field}}!")]
#[case("{{{{resident.first_name}}}}")]
#[case("<p>{{ association.name }} &amp; {{financial.balance}}</p>")]
#[case("no tags at all")]
fn resolving_is_idempotent(#[case] content: &str) {
    let context = default_catalog().example_context();
    let once = resolve(content, &context);
    let twice = resolve(&once.text, &context);
    assert_eq!(twice.text, once.text);
}

#[test]
fn unknown_tag_is_reported() {
    let resolved = resolve("Hello {{unknown.field}}", &json!({}));
    assert_eq!(resolved.text, "Hello {{unknown.field}}");
    assert_eq!(resolved.unresolved_tags, vec!["{{unknown.field}}".to_string()]);
}

#[test]
fn catalog_search() {
    let catalog = default_catalog();
    let found = catalog.search("resident");
    let tags: Vec<(&str, &str)> = found
        .iter()
        .flat_map(|g| g.tags.iter())
        .map(|t| (t.tag.as_str(), t.name.as_str()))
        .collect();
    assert!(tags.contains(&("{{resident.name}}", "Resident Name")));
    assert!(catalog.search("zzz-no-match").is_empty());
}

#[tokio::test]
async fn picker_flow_inserts_into_source_mode() {
    let mut editor = Editor::with_mode("<p>Balance: </p>", EditorMode::Source);
    editor.select_source(TextRange::caret(12));
    let anchor = editor.capture_anchor();
    editor.blur();

    let mut picker = TagPicker::default();
    picker
        .open_with(&StaticCatalogSource::new(default_groups()))
        .await;
    assert!(picker.set_category("financial"));
    let tag = picker.visible_groups()[0].tags[0].clone();

    editor.restore_anchor(&anchor);
    picker.apply(&tag, &mut editor);
    assert_eq!(editor.get_content(), "<p>Balance: {{financial.balance}}</p>");
    assert!(editor.get_content().contains(&tag.tag));
}

// ============ Preview ============

#[rstest]
#[case(PreviewFormat::Html)]
#[case(PreviewFormat::Plain)]
fn empty_preview_is_a_stable_placeholder(#[case] format: PreviewFormat) {
    let first = render("", format);
    let second = render("", format);
    assert!(!first.content().is_empty());
    assert_eq!(first, second);
}

#[test]
fn preview_of_resolved_editor_content() {
    let mut editor = Editor::new("<p>Dear </p>");
    editor.select_visual_text(5..5);
    editor.insert_at_cursor("{{resident.first_name}}");

    let context = default_catalog().example_context();
    let resolved = resolve(&editor.get_content(), &context);
    let output = render(&resolved.text, PreviewFormat::Html);
    assert!(output.content().contains("<p>Dear Ann</p>"));
    assert!(resolved.is_complete());
}
