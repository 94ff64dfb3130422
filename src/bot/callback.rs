//! Stable callback-data vocabulary.
//!
//! Inline buttons carry these payloads. Display labels live in the locale
//! tables and never participate in dispatch, so a keyboard built in one
//! language keeps working after the user switches to another.

use crate::bot::{HandlerResult, dreams, start};
use crate::core::fields::DreamField;
use crate::locales::Lang;
use di::ServiceProvider;
use teloxide::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Page(u32),
    EditField(DreamField),
    EditCancel,
    DeleteConfirm(i64),
    DeleteCancel,
    SetLanguage(Lang),
}

pub fn page(page: u32) -> String {
    format!("page:{page}")
}

pub fn edit_field(field: DreamField) -> String {
    format!("edit:{}", field.callback_key())
}

pub fn edit_cancel() -> String {
    "edit:cancel".to_owned()
}

pub fn delete_confirm(dream_id: i64) -> String {
    format!("delete:confirm:{dream_id}")
}

pub fn delete_cancel() -> String {
    "delete:cancel".to_owned()
}

pub fn lang(lang: Lang) -> String {
    format!("lang:{}", lang.code())
}

pub fn parse(data: &str) -> Option<CallbackAction> {
    let mut parts = data.split(':');
    let action = match (parts.next()?, parts.next()) {
        ("page", Some(number)) => CallbackAction::Page(number.parse().ok()?),
        ("edit", Some("cancel")) => CallbackAction::EditCancel,
        ("edit", Some(key)) => CallbackAction::EditField(DreamField::from_callback_key(key)?),
        ("delete", Some("cancel")) => CallbackAction::DeleteCancel,
        ("delete", Some("confirm")) => CallbackAction::DeleteConfirm(parts.next()?.parse().ok()?),
        ("lang", Some(code)) => CallbackAction::SetLanguage(Lang::try_from_code(code)?),
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(action)
}

pub fn is_edit(q: &CallbackQuery) -> bool {
    q.data.as_deref().is_some_and(|data| data.starts_with("edit:"))
}

/// Callback fallback for payloads that are valid in any conversation state.
/// Field-selection payloads only mean something while an edit dialogue is
/// active, so a press on a stale edit keyboard lands here and is dropped.
pub async fn dispatch(bot: Bot, q: CallbackQuery, provider: ServiceProvider) -> HandlerResult {
    let Some(action) = q.data.as_deref().and_then(parse) else {
        return Ok(());
    };

    match action {
        CallbackAction::Page(page) => dreams::page_requested(&bot, &q, &provider, page).await,
        CallbackAction::DeleteConfirm(dream_id) => {
            dreams::delete_confirmed(&bot, &q, &provider, dream_id).await
        }
        CallbackAction::DeleteCancel => dreams::delete_cancelled(&bot, &q, &provider).await,
        CallbackAction::SetLanguage(lang) => start::language_chosen(&bot, &q, &provider, lang).await,
        CallbackAction::EditField(_) | CallbackAction::EditCancel => Ok(()),
    }
}
