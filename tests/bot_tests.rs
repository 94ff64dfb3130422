//! Pure bot-logic tests: field validators, the callback vocabulary, locale
//! lookup, menu-label mapping, and reply/export formatting.

use chrono::{NaiveDate, Utc};
use dream_diary_bot::bot::callback::{self, CallbackAction};
use dream_diary_bot::bot::{
    MenuAction, format, is_cancel_signal, is_skip_signal, is_today_signal, keyboards,
};
use dream_diary_bot::core::fields::{self, DreamField, FieldError, FieldValue};
use dream_diary_bot::infrastructure::entities::Dream;
use dream_diary_bot::locales::{self, Lang};

fn make_dream(id: i64, title: &str) -> Dream {
    Dream {
        id,
        user_id: 1,
        title: title.to_owned(),
        description: String::new(),
        tags: String::new(),
        notes: String::new(),
        dream_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        created_at: Utc::now(),
    }
}

// ---- Field validation ----

#[test]
fn test_title_accepts_up_to_limit() {
    let max = "x".repeat(255);
    assert_eq!(fields::title(&max).unwrap(), max);
}

#[test]
fn test_title_rejects_over_limit() {
    let long = "x".repeat(256);
    assert_eq!(fields::title(&long), Err(FieldError::TitleTooLong));
}

#[test]
fn test_title_rejects_blank() {
    assert_eq!(fields::title("   "), Err(FieldError::Empty));
    assert_eq!(fields::title(""), Err(FieldError::Empty));
}

#[test]
fn test_title_trims_whitespace() {
    assert_eq!(fields::title("  Flying  ").unwrap(), "Flying");
}

#[test]
fn test_tags_limit() {
    assert!(fields::tags(&"t".repeat(500)).is_ok());
    assert_eq!(fields::tags(&"t".repeat(501)), Err(FieldError::TagsTooLong));
}

#[test]
fn test_free_text_rejects_blank() {
    assert_eq!(fields::free_text(" \n "), Err(FieldError::Empty));
    assert_eq!(fields::free_text(" hello ").unwrap(), "hello");
}

#[test]
fn test_dream_date_parses_iso() {
    assert_eq!(
        fields::dream_date("2026-02-28").unwrap(),
        NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
    );
    // Leap day.
    assert!(fields::dream_date("2024-02-29").is_ok());
}

#[test]
fn test_dream_date_rejects_garbage() {
    assert_eq!(fields::dream_date("2024-13-40"), Err(FieldError::InvalidDate));
    assert_eq!(fields::dream_date("2023-02-29"), Err(FieldError::InvalidDate));
    assert_eq!(fields::dream_date("yesterday"), Err(FieldError::InvalidDate));
    assert_eq!(fields::dream_date(""), Err(FieldError::InvalidDate));
}

#[test]
fn test_field_validate_produces_matching_value() {
    assert_eq!(
        DreamField::Title.validate("Flying").unwrap(),
        FieldValue::Title("Flying".to_owned())
    );
    assert_eq!(
        DreamField::DreamDate.validate("2026-01-01").unwrap(),
        FieldValue::DreamDate(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    );
    assert_eq!(
        DreamField::Title.validate(&"x".repeat(256)),
        Err(FieldError::TitleTooLong)
    );
}

#[test]
fn test_field_callback_keys_round_trip() {
    for field in DreamField::ALL {
        assert_eq!(DreamField::from_callback_key(field.callback_key()), Some(field));
    }
    assert_eq!(DreamField::from_callback_key("bogus"), None);
}

// ---- Callback vocabulary ----

#[test]
fn test_callback_round_trips() {
    assert_eq!(callback::parse(&callback::page(3)), Some(CallbackAction::Page(3)));
    assert_eq!(
        callback::parse(&callback::edit_field(DreamField::DreamDate)),
        Some(CallbackAction::EditField(DreamField::DreamDate))
    );
    assert_eq!(callback::parse(&callback::edit_cancel()), Some(CallbackAction::EditCancel));
    assert_eq!(
        callback::parse(&callback::delete_confirm(7)),
        Some(CallbackAction::DeleteConfirm(7))
    );
    assert_eq!(callback::parse(&callback::delete_cancel()), Some(CallbackAction::DeleteCancel));
    assert_eq!(
        callback::parse(&callback::lang(Lang::Ru)),
        Some(CallbackAction::SetLanguage(Lang::Ru))
    );
}

#[test]
fn test_callback_rejects_malformed_payloads() {
    for data in [
        "",
        "page",
        "page:",
        "page:abc",
        "page:1:2",
        "edit:",
        "edit:bogus",
        "delete:confirm",
        "delete:confirm:x",
        "delete:confirm:1:2",
        "lang:de",
        "bogus:1",
    ] {
        assert_eq!(callback::parse(data), None, "payload {data:?} should not parse");
    }
}

// ---- Locales ----

#[test]
fn test_translations_exist_in_both_languages() {
    let keys = [
        "welcome",
        "help",
        "not_registered",
        "cancel.nothing",
        "cancel.cancelled",
        "language.choose",
        "new_dream.creating",
        "new_dream.step_2",
        "new_dream.step_3",
        "new_dream.step_4",
        "new_dream.step_5",
        "new_dream.saved",
        "new_dream.title_too_long",
        "new_dream.tags_too_long",
        "new_dream.invalid_date",
        "list.empty",
        "list.header",
        "list.total",
        "list.view_hint",
        "view.usage",
        "view.invalid_id",
        "view.not_found",
        "edit.usage",
        "edit.header",
        "edit.cancelled",
        "edit.updated",
        "edit.not_found",
        "delete.usage",
        "delete.confirm",
        "delete.cancelled",
        "delete.deleted",
        "delete.not_found",
        "search.usage",
        "search.prompt",
        "search.no_results",
        "search.header",
        "search.found",
        "search.truncated",
        "export.empty",
        "export.header",
        "export.dream_header",
        "export.caption",
        "buttons.new_dream",
        "buttons.my_dreams",
        "buttons.search",
        "buttons.export",
        "buttons.help",
        "buttons.skip",
        "buttons.cancel",
        "buttons.today",
        "buttons.prev",
        "buttons.next",
        "buttons.yes_delete",
        "buttons.no_cancel",
        "placeholders.main_menu",
        "placeholders.skip_cancel",
        "placeholders.cancel",
        "placeholders.today_cancel",
    ];
    for lang in Lang::ALL {
        for key in keys {
            assert_ne!(locales::text(lang, key), key, "missing {key} for {:?}", lang);
        }
    }
}

#[test]
fn test_missing_key_falls_back_to_key() {
    assert_eq!(locales::text(Lang::En, "no.such.key"), "no.such.key");
}

#[test]
fn test_placeholder_substitution() {
    let text = locales::text_with(
        Lang::En,
        "view.not_found",
        &[("id", "7".to_owned())],
    );
    assert!(text.contains("#7"));
    assert!(!text.contains("{id}"));
}

#[test]
fn test_lang_codes() {
    assert_eq!(Lang::from_code("ru"), Lang::Ru);
    assert_eq!(Lang::from_code("en"), Lang::En);
    // Unknown codes read as English, mirroring the storage default.
    assert_eq!(Lang::from_code("de"), Lang::En);
    assert_eq!(Lang::try_from_code("de"), None);
}

// ---- Menu labels and signals ----

#[test]
fn test_menu_labels_map_to_actions_in_every_language() {
    assert_eq!(
        MenuAction::from_text(&locales::text(Lang::En, "buttons.new_dream")),
        Some(MenuAction::NewDream)
    );
    assert_eq!(
        MenuAction::from_text(&locales::text(Lang::Ru, "buttons.my_dreams")),
        Some(MenuAction::MyDreams)
    );
    assert_eq!(
        MenuAction::from_text(&locales::text(Lang::Ru, "buttons.export")),
        Some(MenuAction::Export)
    );
    assert_eq!(MenuAction::from_text("just some text"), None);
}

#[test]
fn test_signals_match_commands_and_labels() {
    assert!(is_cancel_signal("/cancel"));
    assert!(is_cancel_signal(&locales::text(Lang::En, "buttons.cancel")));
    assert!(is_cancel_signal(&locales::text(Lang::Ru, "buttons.cancel")));
    assert!(!is_cancel_signal("cancel culture"));

    assert!(is_skip_signal("/skip"));
    assert!(is_skip_signal(&locales::text(Lang::Ru, "buttons.skip")));
    assert!(!is_skip_signal("skipping stones"));

    assert!(is_today_signal("/today"));
    assert!(is_today_signal(&locales::text(Lang::En, "buttons.today")));
    assert!(!is_today_signal("2026-01-15"));
}

// ---- Formatting ----

#[test]
fn test_dream_line_escapes_user_content() {
    let mut dream = make_dream(3, "<b>sneaky</b>");
    dream.tags = "a&b".to_owned();
    let line = format::dream_line(&dream);

    assert!(line.starts_with("<b>#3</b> 2026-01-15 | "));
    assert!(line.contains("&lt;b&gt;sneaky&lt;/b&gt;"));
    assert!(line.contains("[a&amp;b]"));
}

#[test]
fn test_dream_line_omits_empty_tags() {
    let line = format::dream_line(&make_dream(1, "Plain"));
    assert!(!line.contains('['));
}

#[test]
fn test_dream_full_shows_empty_markers() {
    let full = format::dream_full(&make_dream(9, "Falling"), Lang::En);
    assert!(full.contains("ID: 9"));
    assert!(full.contains("Title: Falling"));
    assert!(full.contains("(empty)"));
    assert!(full.contains("(none)"));
}

#[test]
fn test_export_document_structure() {
    let mut rich = make_dream(1, "Rich");
    rich.description = "Long story".to_owned();
    rich.tags = "epic".to_owned();
    let plain = make_dream(2, "Plain");

    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let doc = format::export_document(&[rich, plain], Lang::En, date);

    assert!(doc.contains("Entries: 2"));
    assert_eq!(doc.matches("========================================").count(), 2);
    assert!(doc.contains("Dream #1 — 2026-01-15"));
    assert!(doc.contains("Dream #2 — 2026-01-15"));
    assert!(doc.contains("Description:\nLong story"));
    assert!(doc.contains("Tags: epic"));
    // The plain dream has exactly one Title label and no optional sections.
    assert_eq!(doc.matches("Description:").count(), 1);
    assert_eq!(doc.matches("Notes:").count(), 0);
}

// ---- Pagination keyboard ----

fn row_len(markup: &teloxide::types::InlineKeyboardMarkup) -> usize {
    markup.inline_keyboard[0].len()
}

#[test]
fn test_pagination_keyboard_edges() {
    assert!(keyboards::pagination(0, 1, Lang::En).is_none());
    assert!(keyboards::pagination(0, 0, Lang::En).is_none());

    let first = keyboards::pagination(0, 3, Lang::En).unwrap();
    assert_eq!(row_len(&first), 1);

    let middle = keyboards::pagination(1, 3, Lang::En).unwrap();
    assert_eq!(row_len(&middle), 2);

    let last = keyboards::pagination(2, 3, Lang::En).unwrap();
    assert_eq!(row_len(&last), 1);
}

#[test]
fn test_pagination_keyboard_targets_neighbor_pages() {
    use teloxide::types::InlineKeyboardButtonKind;

    let middle = keyboards::pagination(1, 3, Lang::En).unwrap();
    let payloads: Vec<String> = middle.inline_keyboard[0]
        .iter()
        .map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
            other => panic!("unexpected button kind: {other:?}"),
        })
        .collect();

    assert_eq!(payloads, vec!["page:0".to_owned(), "page:2".to_owned()]);
}
