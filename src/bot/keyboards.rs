//! Keyboard layouts for the bot.

use crate::bot::callback;
use crate::core::fields::DreamField;
use crate::locales::{self, Lang};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

pub fn main_menu(lang: Lang) -> KeyboardMarkup {
    let t = |key: &str| locales::text(lang, key);
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(t("buttons.new_dream")),
            KeyboardButton::new(t("buttons.my_dreams")),
        ],
        vec![
            KeyboardButton::new(t("buttons.search")),
            KeyboardButton::new(t("buttons.export")),
        ],
        vec![KeyboardButton::new(t("buttons.help"))],
    ])
    .resize_keyboard()
    .input_field_placeholder(t("placeholders.main_menu"))
}

/// Cancel as the only escape hatch, for required fields.
pub fn cancel_only(lang: Lang) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(locales::text(
        lang,
        "buttons.cancel",
    ))]])
    .resize_keyboard()
    .input_field_placeholder(locales::text(lang, "placeholders.cancel"))
}

pub fn skip_cancel(lang: Lang) -> KeyboardMarkup {
    let t = |key: &str| locales::text(lang, key);
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(t("buttons.skip")),
        KeyboardButton::new(t("buttons.cancel")),
    ]])
    .resize_keyboard()
    .input_field_placeholder(t("placeholders.skip_cancel"))
}

pub fn today_cancel(lang: Lang) -> KeyboardMarkup {
    let t = |key: &str| locales::text(lang, key);
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(t("buttons.today")),
        KeyboardButton::new(t("buttons.cancel")),
    ]])
    .resize_keyboard()
    .input_field_placeholder(t("placeholders.today_cancel"))
}

// Language names stay untranslated.
pub fn language_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("English", callback::lang(Lang::En)),
        InlineKeyboardButton::callback("Русский", callback::lang(Lang::Ru)),
    ]])
}

/// Prev/next arrows; `None` when a single page needs no keyboard.
pub fn pagination(page: u32, total_pages: u32, lang: Lang) -> Option<InlineKeyboardMarkup> {
    if total_pages <= 1 {
        return None;
    }

    let mut row = Vec::new();
    if page > 0 {
        row.push(InlineKeyboardButton::callback(
            locales::text(lang, "buttons.prev"),
            callback::page(page - 1),
        ));
    }
    if page + 1 < total_pages {
        row.push(InlineKeyboardButton::callback(
            locales::text(lang, "buttons.next"),
            callback::page(page + 1),
        ));
    }

    Some(InlineKeyboardMarkup::new(vec![row]))
}

pub fn edit_menu(lang: Lang) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = DreamField::ALL
        .into_iter()
        .map(|field| {
            vec![InlineKeyboardButton::callback(
                locales::text(lang, field.label_key()),
                callback::edit_field(field),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        locales::text(lang, "edit.field_cancel"),
        callback::edit_cancel(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn delete_confirm(dream_id: i64, lang: Lang) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            locales::text(lang, "buttons.yes_delete"),
            callback::delete_confirm(dream_id),
        ),
        InlineKeyboardButton::callback(
            locales::text(lang, "buttons.no_cancel"),
            callback::delete_cancel(),
        ),
    ]])
}
